//! Audit log entries for mutating operations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// Audited operation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    BookCreated,
    BookUpdated,
    LeaseCreated,
    LeaseReturned,
    RoleChanged,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::BookCreated => "book_created",
            AuditAction::BookUpdated => "book_updated",
            AuditAction::LeaseCreated => "lease_created",
            AuditAction::LeaseReturned => "lease_returned",
            AuditAction::RoleChanged => "role_changed",
        }
    }
}

/// Audit log entry from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AuditEntry {
    pub id: i64,
    pub actor_id: i32,
    pub action: String,
    /// Primary key of the affected record (ISBN, lease UUID, user id)
    pub subject: String,
    pub detail: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Audit query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct AuditQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
