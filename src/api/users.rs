//! User administration and audit log endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::{
        audit::{AuditEntry, AuditQuery},
        user::{UpdateRole, User},
    },
};

use super::AuthenticatedUser;

/// List all users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All users", body = Vec<User>),
        (status = 403, description = "Administrator privileges required")
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<User>>> {
    claims.require_admin()?;

    let users = state.services.users.list_users().await?;
    Ok(Json(users))
}

/// Change a user's role
#[utoipa::path(
    put,
    path = "/users/{id}/role",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = UpdateRole,
    responses(
        (status = 200, description = "Role updated", body = User),
        (status = 403, description = "Administrator privileges required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_role(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(user_id): Path<i32>,
    Json(request): Json<UpdateRole>,
) -> AppResult<Json<User>> {
    claims.require_admin()?;

    let user = state
        .services
        .users
        .update_role(claims.user_id, user_id, request.role)
        .await?;
    Ok(Json(user))
}

/// List audit log entries, newest first
#[utoipa::path(
    get,
    path = "/audit",
    tag = "audit",
    security(("bearer_auth" = [])),
    params(AuditQuery),
    responses(
        (status = 200, description = "Audit entries", body = Vec<AuditEntry>),
        (status = 403, description = "Administrator privileges required")
    )
)]
pub async fn list_audit(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<AuditQuery>,
) -> AppResult<Json<Vec<AuditEntry>>> {
    claims.require_admin()?;

    let entries = state.services.users.list_audit(&query).await?;
    Ok(Json(entries))
}
