//! Audit log repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::audit::{AuditAction, AuditEntry, AuditQuery},
};

#[derive(Clone)]
pub struct AuditRepository {
    pool: Pool<Postgres>,
}

impl AuditRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Record a mutating operation
    pub async fn record(
        &self,
        actor_id: i32,
        action: AuditAction,
        subject: &str,
        detail: Option<&str>,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_log (actor_id, action, subject, detail)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(actor_id)
        .bind(action.as_str())
        .bind(subject)
        .bind(detail)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// List audit entries, newest first
    pub async fn list(&self, query: &AuditQuery) -> AppResult<Vec<AuditEntry>> {
        let (per_page, offset) = super::page_window(query.page, query.per_page, 50, 200);

        let entries = sqlx::query_as::<_, AuditEntry>(
            "SELECT * FROM audit_log ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2",
        )
        .bind(per_page)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
