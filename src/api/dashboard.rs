//! Librarian dashboard endpoint

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{book::Book, lease::LeaseDetails},
};

use super::AuthenticatedUser;

/// Number of entries per dashboard list
const DASHBOARD_LIMIT: i64 = 5;

#[derive(Serialize, ToSchema)]
pub struct DashboardResponse {
    /// Active leases closest to their expire date
    pub nearest_leases: Vec<LeaseDetails>,
    /// Most recently added books with copies
    pub latest_books: Vec<Book>,
}

/// Librarian dashboard: nearest-expiring leases and latest books
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard data", body = DashboardResponse),
        (status = 403, description = "Librarian privileges required")
    )
)]
pub async fn dashboard(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<DashboardResponse>> {
    claims.require_librarian()?;

    let nearest_leases = state.services.leases.nearest_leases(DASHBOARD_LIMIT).await?;
    let latest_books = state.services.catalog.latest_books(DASHBOARD_LIMIT).await?;

    Ok(Json(DashboardResponse {
        nearest_leases,
        latest_books,
    }))
}
