//! Book catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookDetails, BookQuery, CreateBook, UpdateBook},
        lease::LeaseDetails,
    },
};

use super::AuthenticatedUser;

/// List books, newest first, with optional name filter
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    params(BookQuery),
    responses(
        (status = 200, description = "Books", body = Vec<Book>),
        (status = 403, description = "Librarian privileges required")
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<Vec<Book>>> {
    claims.require_librarian()?;

    let books = state.services.catalog.list_books(&query).await?;
    Ok(Json(books))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = BookDetails),
        (status = 400, description = "Invalid ISBN or payload"),
        (status = 409, description = "ISBN already exists")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<BookDetails>)> {
    claims.require_librarian()?;
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let book = state
        .services
        .catalog
        .create_book(claims.user_id, &request)
        .await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Get a book with its derived availability
#[utoipa::path(
    get,
    path = "/books/{isbn}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("isbn" = String, Path, description = "ISBN-10 or ISBN-13")
    ),
    responses(
        (status = 200, description = "Book details", body = BookDetails),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(isbn): Path<String>,
) -> AppResult<Json<BookDetails>> {
    claims.require_librarian()?;

    let book = state.services.catalog.get_book(&isbn).await?;
    Ok(Json(book))
}

/// Update a book's name, authors or copy count
#[utoipa::path(
    put,
    path = "/books/{isbn}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("isbn" = String, Path, description = "ISBN-10 or ISBN-13")
    ),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = BookDetails),
        (status = 400, description = "Count below active lease count"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(isbn): Path<String>,
    Json(request): Json<UpdateBook>,
) -> AppResult<Json<BookDetails>> {
    claims.require_librarian()?;
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let book = state
        .services
        .catalog
        .update_book(claims.user_id, &isbn, &request)
        .await?;
    Ok(Json(book))
}

/// List leases of a book
#[utoipa::path(
    get,
    path = "/books/{isbn}/leases",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("isbn" = String, Path, description = "ISBN-10 or ISBN-13")
    ),
    responses(
        (status = 200, description = "Leases of the book", body = Vec<LeaseDetails>),
        (status = 404, description = "Book not found")
    )
)]
pub async fn book_leases(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(isbn): Path<String>,
) -> AppResult<Json<Vec<LeaseDetails>>> {
    claims.require_librarian()?;

    let leases = state.services.leases.book_leases(&isbn).await?;
    Ok(Json(leases))
}
