//! Leases repository for database operations

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    isbn,
    models::{
        book::can_create_lease,
        lease::{CreateLease, Lease, LeaseDetails},
    },
};

/// Joined row for lease detail queries
#[derive(Debug, FromRow)]
struct LeaseJoinRow {
    id: Uuid,
    student_id: i32,
    student_name: String,
    book_isbn: String,
    book_name: String,
    issue_date: DateTime<Utc>,
    expire_date: NaiveDate,
    return_date: Option<DateTime<Utc>>,
}

impl LeaseJoinRow {
    fn into_details(self, now: DateTime<Utc>) -> LeaseDetails {
        let lease = Lease {
            id: self.id,
            student_id: self.student_id,
            book_isbn: self.book_isbn.clone(),
            issue_date: self.issue_date,
            expire_date: self.expire_date,
            return_date: self.return_date,
        };
        LeaseDetails {
            status: lease.status(now),
            id: self.id,
            student_id: self.student_id,
            student_name: self.student_name,
            book_formatted_isbn: isbn::hyphenate(&self.book_isbn),
            book_isbn: self.book_isbn,
            book_name: self.book_name,
            issue_date: self.issue_date,
            expire_date: self.expire_date,
            return_date: self.return_date,
        }
    }
}

const DETAILS_SELECT: &str = r#"
    SELECT l.id, l.student_id, u.username AS student_name,
           l.book_isbn, b.name AS book_name,
           l.issue_date, l.expire_date, l.return_date
    FROM leases l
    JOIN users u ON u.id = l.student_id
    JOIN books b ON b.isbn = l.book_isbn
"#;

#[derive(Clone)]
pub struct LeasesRepository {
    pool: Pool<Postgres>,
}

impl LeasesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get lease by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Lease> {
        sqlx::query_as::<_, Lease>("SELECT * FROM leases WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Lease with id {} not found", id)))
    }

    /// Get lease with display fields and derived status
    pub async fn get_details(&self, id: Uuid) -> AppResult<LeaseDetails> {
        let row =
            sqlx::query_as::<_, LeaseJoinRow>(&format!("{} WHERE l.id = $1", DETAILS_SELECT))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Lease with id {} not found", id)))?;
        Ok(row.into_details(Utc::now()))
    }

    /// Create a new lease.
    ///
    /// Availability is re-checked inside a transaction holding a row lock on
    /// the book, so two concurrent creations cannot both take the last copy.
    /// The expire date must already be validated by the caller.
    pub async fn create(&self, lease: &CreateLease, book_isbn: &str) -> AppResult<Lease> {
        let mut tx = self.pool.begin().await?;

        let count: Option<i32> =
            sqlx::query_scalar("SELECT count FROM books WHERE isbn = $1 FOR UPDATE")
                .bind(book_isbn)
                .fetch_optional(&mut *tx)
                .await?;
        let count = count
            .ok_or_else(|| AppError::NotFound(format!("Book with ISBN {} not found", book_isbn)))?;

        let student_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                .bind(lease.student_id)
                .fetch_one(&mut *tx)
                .await?;
        if !student_exists {
            return Err(AppError::NotFound(format!(
                "User with id {} not found",
                lease.student_id
            )));
        }

        let active: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM leases WHERE book_isbn = $1 AND return_date IS NULL",
        )
        .bind(book_isbn)
        .fetch_one(&mut *tx)
        .await?;

        can_create_lease(count, active)?;

        let created = sqlx::query_as::<_, Lease>(
            r#"
            INSERT INTO leases (id, student_id, book_isbn, expire_date)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(lease.student_id)
        .bind(book_isbn)
        .bind(lease.expire_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    /// Return a lease. Sets the return date exactly once; returning an
    /// already-returned lease is a no-op that succeeds with the original
    /// return date unchanged.
    pub async fn return_lease(&self, id: Uuid) -> AppResult<Lease> {
        let updated = sqlx::query_as::<_, Lease>(
            r#"
            UPDATE leases SET return_date = NOW()
            WHERE id = $1 AND return_date IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(lease) => Ok(lease),
            // Either already returned or missing entirely
            None => self.get_by_id(id).await,
        }
    }

    /// All leases ordered by expire date
    pub async fn list_by_expire_date(&self) -> AppResult<Vec<LeaseDetails>> {
        let rows = sqlx::query_as::<_, LeaseJoinRow>(&format!(
            "{} ORDER BY l.expire_date",
            DETAILS_SELECT
        ))
        .fetch_all(&self.pool)
        .await?;
        let now = Utc::now();
        Ok(rows.into_iter().map(|r| r.into_details(now)).collect())
    }

    /// Leases of a book, active first, then by expire date
    pub async fn list_for_book(&self, isbn: &str) -> AppResult<Vec<LeaseDetails>> {
        let rows = sqlx::query_as::<_, LeaseJoinRow>(&format!(
            "{} WHERE l.book_isbn = $1 ORDER BY l.return_date IS NOT NULL, l.expire_date",
            DETAILS_SELECT
        ))
        .bind(isbn)
        .fetch_all(&self.pool)
        .await?;
        let now = Utc::now();
        Ok(rows.into_iter().map(|r| r.into_details(now)).collect())
    }

    /// A student's active leases ordered by expire date
    pub async fn active_for_student(&self, student_id: i32) -> AppResult<Vec<LeaseDetails>> {
        let rows = sqlx::query_as::<_, LeaseJoinRow>(&format!(
            "{} WHERE l.student_id = $1 AND l.return_date IS NULL ORDER BY l.expire_date",
            DETAILS_SELECT
        ))
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        let now = Utc::now();
        Ok(rows.into_iter().map(|r| r.into_details(now)).collect())
    }

    /// Active leases closest to their expire date (dashboard)
    pub async fn nearest_expiring(&self, limit: i64) -> AppResult<Vec<LeaseDetails>> {
        let rows = sqlx::query_as::<_, LeaseJoinRow>(&format!(
            "{} WHERE l.return_date IS NULL ORDER BY l.expire_date LIMIT $1",
            DETAILS_SELECT
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        let now = Utc::now();
        Ok(rows.into_iter().map(|r| r.into_details(now)).collect())
    }

    /// All leases ordered by issue date (report export)
    pub async fn list_by_issue_date(&self) -> AppResult<Vec<LeaseDetails>> {
        let rows = sqlx::query_as::<_, LeaseJoinRow>(&format!(
            "{} ORDER BY l.issue_date",
            DETAILS_SELECT
        ))
        .fetch_all(&self.pool)
        .await?;
        let now = Utc::now();
        Ok(rows.into_iter().map(|r| r.into_details(now)).collect())
    }
}
