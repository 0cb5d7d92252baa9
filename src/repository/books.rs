//! Books repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::book::{validate_count_on_edit, Book, BookQuery, UpdateBook},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by canonical ISBN-13
    pub async fn get_by_isbn(&self, isbn: &str) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE isbn = $1")
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with ISBN {} not found", isbn)))
    }

    /// Number of leases on this book with no return date yet
    pub async fn active_lease_count(&self, isbn: &str) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM leases WHERE book_isbn = $1 AND return_date IS NULL",
        )
        .bind(isbn)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// List books, newest first, with optional name substring filter
    pub async fn list(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        let (per_page, offset) = super::page_window(query.page, query.per_page, 25, 100);

        let books = match &query.q {
            Some(q) if !q.is_empty() => {
                sqlx::query_as::<_, Book>(
                    r#"
                    SELECT * FROM books
                    WHERE name ILIKE '%' || $1 || '%'
                    ORDER BY added_date DESC
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(q)
                .bind(per_page)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            _ => {
                sqlx::query_as::<_, Book>(
                    "SELECT * FROM books ORDER BY added_date DESC LIMIT $1 OFFSET $2",
                )
                .bind(per_page)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(books)
    }

    /// Most recently added books that have copies at all (dashboard)
    pub async fn latest_active(&self, limit: i64) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT * FROM books WHERE count > 0 ORDER BY added_date DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    /// All books ordered by added date (report export)
    pub async fn list_by_added_date(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY added_date")
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    /// Create a new book. The ISBN must already be normalized.
    pub async fn create(&self, isbn: &str, name: &str, authors: &str, count: i32) -> AppResult<Book> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (isbn, name, authors, count)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(isbn)
        .bind(name)
        .bind(authors)
        .bind(count)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict(format!("Book with ISBN {} already exists", isbn))
            }
            other => AppError::Database(other),
        })?;

        Ok(book)
    }

    /// Update a book. The count check runs against the live active-lease
    /// count while holding a row lock, so a concurrent lease creation cannot
    /// slip in between the check and the write.
    pub async fn update(&self, isbn: &str, update: &UpdateBook) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE isbn = $1 FOR UPDATE")
            .bind(isbn)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with ISBN {} not found", isbn)))?;

        let new_count = match update.count {
            Some(new_count) => {
                let active: i64 = sqlx::query_scalar(
                    "SELECT COUNT(*) FROM leases WHERE book_isbn = $1 AND return_date IS NULL",
                )
                .bind(isbn)
                .fetch_one(&mut *tx)
                .await?;
                validate_count_on_edit(new_count, active)?;
                new_count
            }
            None => book.count,
        };

        let updated = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET name = $1, authors = $2, count = $3
            WHERE isbn = $4
            RETURNING *
            "#,
        )
        .bind(update.name.as_deref().unwrap_or(&book.name))
        .bind(update.authors.as_deref().unwrap_or(&book.authors))
        .bind(new_count)
        .bind(isbn)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }
}
