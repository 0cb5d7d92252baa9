//! Book model and availability accounting
//!
//! `available_count`, `is_available` and the count/lease validations are the
//! business core: pure functions of a book's copy count and the number of
//! leases currently out on it. Availability is derived on every read, never
//! stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::isbn;

/// Book model from database. Keyed by canonical ISBN-13.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub isbn: String,
    pub name: String,
    pub authors: String,
    pub added_date: DateTime<Utc>,
    pub count: i32,
}

impl Book {
    /// ISBN hyphenated for display
    pub fn formatted_isbn(&self) -> String {
        isbn::hyphenate(&self.isbn)
    }
}

/// Book with its derived availability, for detail views and lists
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetails {
    pub isbn: String,
    pub formatted_isbn: String,
    pub name: String,
    pub authors: String,
    pub added_date: DateTime<Utc>,
    pub count: i32,
    pub available_count: i64,
    pub is_available: bool,
}

impl BookDetails {
    pub fn build(book: Book, active_lease_count: i64) -> Self {
        let available = available_count(book.count, active_lease_count);
        Self {
            formatted_isbn: book.formatted_isbn(),
            is_available: is_book_available(book.count, active_lease_count),
            available_count: available,
            isbn: book.isbn,
            name: book.name,
            authors: book.authors,
            added_date: book.added_date,
            count: book.count,
        }
    }
}

/// Copies not currently out on an active lease, clamped at zero.
///
/// The clamp also covers the state where `count` was edited below the number
/// of active leases; the edit-time validation guards against that, but the
/// accounting must not assume the invariant holds.
pub fn available_count(count: i32, active_lease_count: i64) -> i64 {
    (count as i64 - active_lease_count).max(0)
}

/// A book is available when it has copies at all and at least one of them is
/// not out on lease. `count > 0` is kept alongside the availability check so
/// a book created with zero copies reads as unavailable, not as "available
/// with zero copies".
pub fn is_book_available(count: i32, active_lease_count: i64) -> bool {
    count > 0 && available_count(count, active_lease_count) > 0
}

/// Reject lease creation against a book with no available copies
pub fn can_create_lease(count: i32, active_lease_count: i64) -> AppResult<()> {
    if is_book_available(count, active_lease_count) {
        Ok(())
    } else {
        Err(AppError::Validation("Book is not available".to_string()))
    }
}

/// Reject a count edit that would drop the total below the number of copies
/// currently out on lease
pub fn validate_count_on_edit(new_count: i32, active_lease_count: i64) -> AppResult<()> {
    if new_count < 0 {
        return Err(AppError::Validation(
            "Count must not be negative".to_string(),
        ));
    }
    if (new_count as i64) < active_lease_count {
        return Err(AppError::Validation(format!(
            "Count {} is below the number of active leases ({})",
            new_count, active_lease_count
        )));
    }
    Ok(())
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    /// ISBN-10 or ISBN-13, with or without separators
    pub isbn: String,
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
    #[validate(length(max = 255, message = "Authors must be at most 255 characters"))]
    pub authors: String,
    /// Total owned copies. Zero is allowed; the book reads as unavailable
    /// until copies are added.
    #[validate(range(min = 0, message = "Count must not be negative"))]
    pub count: i32,
}

/// Update book request. Omitted fields are left unchanged.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 255, message = "Authors must be at most 255 characters"))]
    pub authors: Option<String>,
    #[validate(range(min = 0, message = "Count must not be negative"))]
    pub count: Option<i32>,
}

/// Book query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Case-insensitive name substring filter
    pub q: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_with_copies_and_no_leases_is_available() {
        assert_eq!(available_count(2, 0), 2);
        assert!(is_book_available(2, 0));
    }

    #[test]
    fn one_active_lease_leaves_one_copy() {
        assert_eq!(available_count(2, 1), 1);
        assert!(is_book_available(2, 1));
    }

    #[test]
    fn fully_leased_book_is_unavailable() {
        assert_eq!(available_count(2, 2), 0);
        assert!(!is_book_available(2, 2));
        assert!(can_create_lease(2, 2).is_err());
    }

    #[test]
    fn available_count_clamps_at_zero() {
        // count edited down below the active leases; must not go negative
        assert_eq!(available_count(1, 3), 0);
        assert!(!is_book_available(1, 3));
    }

    #[test]
    fn zero_count_book_is_inactive_not_available() {
        assert_eq!(available_count(0, 0), 0);
        assert!(!is_book_available(0, 0));
        assert!(can_create_lease(0, 0).is_err());
    }

    #[test]
    fn can_create_lease_on_available_book() {
        assert!(can_create_lease(2, 1).is_ok());
    }

    #[test]
    fn count_edit_below_active_leases_is_rejected() {
        assert!(validate_count_on_edit(1, 2).is_err());
        assert!(validate_count_on_edit(2, 2).is_ok());
        assert!(validate_count_on_edit(5, 2).is_ok());
        assert!(validate_count_on_edit(-1, 0).is_err());
    }

    #[test]
    fn availability_matches_available_count() {
        for count in 0..5 {
            for active in 0..5i64 {
                assert_eq!(
                    is_book_available(count, active),
                    available_count(count, active) > 0
                );
            }
        }
    }
}
