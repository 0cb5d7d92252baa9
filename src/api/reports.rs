//! Report export endpoints

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
};

use crate::error::AppResult;

use super::AuthenticatedUser;

fn csv_headers(filename: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    if let Ok(value) =
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
    {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    headers
}

/// Export all books as CSV, ordered by added date
#[utoipa::path(
    get,
    path = "/reports/books.csv",
    tag = "reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Books CSV", content_type = "text/csv"),
        (status = 403, description = "Librarian privileges required")
    )
)]
pub async fn books_csv(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<(HeaderMap, String)> {
    claims.require_librarian()?;

    let csv = state.services.reports.books_csv().await?;
    Ok((csv_headers("books.csv"), csv))
}

/// Export all leases as CSV, ordered by issue date
#[utoipa::path(
    get,
    path = "/reports/leases.csv",
    tag = "reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Leases CSV", content_type = "text/csv"),
        (status = 403, description = "Librarian privileges required")
    )
)]
pub async fn leases_csv(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<(HeaderMap, String)> {
    claims.require_librarian()?;

    let csv = state.services.reports.leases_csv().await?;
    Ok((csv_headers("leases.csv"), csv))
}
