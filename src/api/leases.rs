//! Lease management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::lease::{CreateLease, LeaseDetails},
};

use super::AuthenticatedUser;

/// List all leases ordered by expire date
#[utoipa::path(
    get,
    path = "/leases",
    tag = "leases",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All leases", body = Vec<LeaseDetails>),
        (status = 403, description = "Librarian privileges required")
    )
)]
pub async fn list_leases(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<LeaseDetails>>> {
    claims.require_librarian()?;

    let leases = state.services.leases.list_leases().await?;
    Ok(Json(leases))
}

/// Create a new lease (check a book out to a student)
#[utoipa::path(
    post,
    path = "/leases",
    tag = "leases",
    security(("bearer_auth" = [])),
    request_body = CreateLease,
    responses(
        (status = 201, description = "Lease created", body = LeaseDetails),
        (status = 400, description = "Book not available or expire date not in future"),
        (status = 404, description = "Book or student not found")
    )
)]
pub async fn create_lease(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateLease>,
) -> AppResult<(StatusCode, Json<LeaseDetails>)> {
    claims.require_librarian()?;

    let lease = state
        .services
        .leases
        .create_lease(claims.user_id, &request)
        .await?;
    Ok((StatusCode::CREATED, Json(lease)))
}

/// Get a lease with its derived status
#[utoipa::path(
    get,
    path = "/leases/{id}",
    tag = "leases",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Lease ID")
    ),
    responses(
        (status = 200, description = "Lease details", body = LeaseDetails),
        (status = 404, description = "Lease not found")
    )
)]
pub async fn get_lease(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(lease_id): Path<Uuid>,
) -> AppResult<Json<LeaseDetails>> {
    claims.require_librarian()?;

    let lease = state.services.leases.get_lease(lease_id).await?;
    Ok(Json(lease))
}

/// Return a leased book. Idempotent on already-returned leases.
#[utoipa::path(
    post,
    path = "/leases/{id}/return",
    tag = "leases",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Lease ID")
    ),
    responses(
        (status = 200, description = "Lease returned", body = LeaseDetails),
        (status = 404, description = "Lease not found")
    )
)]
pub async fn return_lease(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(lease_id): Path<Uuid>,
) -> AppResult<Json<LeaseDetails>> {
    claims.require_librarian()?;

    let lease = state
        .services
        .leases
        .return_lease(claims.user_id, lease_id)
        .await?;
    Ok(Json(lease))
}

/// Get the authenticated student's own active leases
#[utoipa::path(
    get,
    path = "/me/leases",
    tag = "leases",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own active leases", body = Vec<LeaseDetails>),
        (status = 403, description = "Student privileges required")
    )
)]
pub async fn my_leases(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<LeaseDetails>>> {
    claims.require_student()?;

    let leases = state.services.leases.student_leases(claims.user_id).await?;
    Ok(Json(leases))
}
