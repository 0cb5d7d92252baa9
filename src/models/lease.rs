//! Lease model and lifecycle status derivation
//!
//! A lease moves from Active to Returned exactly once; Expiring and Expired
//! are time-derived presentations of the Active state, recomputed against
//! "now" on every read rather than stored.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Days before the expire date during which an active lease reads as Expiring
pub const EXPIRING_WINDOW_DAYS: i64 = 2;

/// Lease model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lease {
    pub id: Uuid,
    pub student_id: i32,
    pub book_isbn: String,
    pub issue_date: DateTime<Utc>,
    pub expire_date: NaiveDate,
    pub return_date: Option<DateTime<Utc>>,
}

/// Derived lifecycle status of a lease
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LeaseStatus {
    Active,
    Expiring,
    Expired,
    Returned,
}

impl Lease {
    /// A lease is active until its return date is set
    pub fn is_active(&self) -> bool {
        self.return_date.is_none()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.is_active() && self.expire_date < now.date_naive()
    }

    pub fn is_expiring(&self, now: DateTime<Utc>) -> bool {
        self.is_active() && self.expire_date < now.date_naive() + Duration::days(EXPIRING_WINDOW_DAYS)
    }

    /// Status against `now`, priority Returned > Expired > Expiring > Active
    pub fn status(&self, now: DateTime<Utc>) -> LeaseStatus {
        if !self.is_active() {
            LeaseStatus::Returned
        } else if self.is_expired(now) {
            LeaseStatus::Expired
        } else if self.is_expiring(now) {
            LeaseStatus::Expiring
        } else {
            LeaseStatus::Active
        }
    }
}

/// Reject an expire date that is not strictly in the future
pub fn validate_expire_date(expire_date: NaiveDate, now: DateTime<Utc>) -> AppResult<()> {
    if expire_date <= now.date_naive() {
        return Err(AppError::Validation(
            "Expire date must be in the future".to_string(),
        ));
    }
    Ok(())
}

/// Lease with display fields for detail views, lists and reports
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaseDetails {
    pub id: Uuid,
    pub student_id: i32,
    pub student_name: String,
    pub book_isbn: String,
    pub book_formatted_isbn: String,
    pub book_name: String,
    pub issue_date: DateTime<Utc>,
    pub expire_date: NaiveDate,
    pub return_date: Option<DateTime<Utc>>,
    pub status: LeaseStatus,
}

/// Create lease request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLease {
    /// Borrowing student's user ID
    pub student_id: i32,
    /// ISBN-10 or ISBN-13 of the book to lease
    pub book_isbn: String,
    /// Date the lease expires; must be strictly in the future
    pub expire_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn lease(expire_date: NaiveDate, return_date: Option<DateTime<Utc>>) -> Lease {
        Lease {
            id: Uuid::new_v4(),
            student_id: 1,
            book_isbn: "9780000000002".to_string(),
            issue_date: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
            expire_date,
            return_date,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn fresh_lease_is_active() {
        let l = lease(day(30), None);
        assert!(l.is_active());
        assert_eq!(l.status(now()), LeaseStatus::Active);
    }

    #[test]
    fn lease_expiring_within_two_days() {
        // expire on the 16th, today the 15th: inside the 2-day window
        let l = lease(day(16), None);
        assert!(l.is_expiring(now()));
        assert!(!l.is_expired(now()));
        assert_eq!(l.status(now()), LeaseStatus::Expiring);
    }

    #[test]
    fn lease_expiring_boundary_is_exclusive() {
        // expire exactly today + 2 days is not yet expiring
        let l = lease(day(17), None);
        assert_eq!(l.status(now()), LeaseStatus::Active);
    }

    #[test]
    fn lease_expired_yesterday() {
        let l = lease(day(14), None);
        assert!(l.is_expired(now()));
        assert_eq!(l.status(now()), LeaseStatus::Expired);
    }

    #[test]
    fn expire_date_today_reads_expiring_not_expired() {
        // strictly before today is expired; today itself is still expiring
        let l = lease(day(15), None);
        assert!(!l.is_expired(now()));
        assert_eq!(l.status(now()), LeaseStatus::Expiring);
    }

    #[test]
    fn returned_overrides_all_date_states() {
        let returned = Some(now());
        assert_eq!(lease(day(1), returned).status(now()), LeaseStatus::Returned);
        assert_eq!(lease(day(16), returned).status(now()), LeaseStatus::Returned);
        assert_eq!(lease(day(30), returned).status(now()), LeaseStatus::Returned);
        assert!(!lease(day(1), returned).is_active());
    }

    #[test]
    fn expire_date_must_be_in_future() {
        assert!(validate_expire_date(day(16), now()).is_ok());
        // today and earlier are rejected
        assert!(validate_expire_date(day(15), now()).is_err());
        assert!(validate_expire_date(day(14), now()).is_err());
    }
}
