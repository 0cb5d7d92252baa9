//! Lease management service

use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::AppResult,
    isbn,
    models::{
        audit::AuditAction,
        lease::{validate_expire_date, CreateLease, LeaseDetails},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct LeasesService {
    repository: Repository,
}

impl LeasesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a new lease (check a book out to a student)
    pub async fn create_lease(&self, actor_id: i32, lease: &CreateLease) -> AppResult<LeaseDetails> {
        validate_expire_date(lease.expire_date, Utc::now())?;
        let isbn13 = isbn::to_isbn13(&lease.book_isbn)?;

        let created = self.repository.leases.create(lease, &isbn13).await?;

        self.audit(
            actor_id,
            AuditAction::LeaseCreated,
            created.id,
            &format!("book={} student={}", isbn13, lease.student_id),
        )
        .await;

        self.repository.leases.get_details(created.id).await
    }

    /// Return a leased book. Idempotent: re-returning an already-returned
    /// lease succeeds without changing its return date.
    pub async fn return_lease(&self, actor_id: i32, lease_id: Uuid) -> AppResult<LeaseDetails> {
        let was_active = self.repository.leases.get_by_id(lease_id).await?.is_active();
        let lease = self.repository.leases.return_lease(lease_id).await?;

        if was_active {
            self.audit(
                actor_id,
                AuditAction::LeaseReturned,
                lease.id,
                &format!("book={}", lease.book_isbn),
            )
            .await;
        }

        self.repository.leases.get_details(lease_id).await
    }

    /// Get a lease with its derived status
    pub async fn get_lease(&self, lease_id: Uuid) -> AppResult<LeaseDetails> {
        self.repository.leases.get_details(lease_id).await
    }

    /// All leases ordered by expire date
    pub async fn list_leases(&self) -> AppResult<Vec<LeaseDetails>> {
        self.repository.leases.list_by_expire_date().await
    }

    /// Leases of one book
    pub async fn book_leases(&self, raw_isbn: &str) -> AppResult<Vec<LeaseDetails>> {
        let isbn13 = isbn::to_isbn13(raw_isbn)?;
        // Surface NotFound for unknown books rather than an empty list
        self.repository.books.get_by_isbn(&isbn13).await?;
        self.repository.leases.list_for_book(&isbn13).await
    }

    /// A student's own active leases
    pub async fn student_leases(&self, student_id: i32) -> AppResult<Vec<LeaseDetails>> {
        self.repository.leases.active_for_student(student_id).await
    }

    /// Dashboard data: active leases closest to expiry
    pub async fn nearest_leases(&self, limit: i64) -> AppResult<Vec<LeaseDetails>> {
        self.repository.leases.nearest_expiring(limit).await
    }

    async fn audit(&self, actor_id: i32, action: AuditAction, lease_id: Uuid, detail: &str) {
        if let Err(e) = self
            .repository
            .audit
            .record(actor_id, action, &lease_id.to_string(), Some(detail))
            .await
        {
            tracing::error!("Failed to write audit entry for lease {}: {}", lease_id, e);
        }
    }
}
