//! Book catalog service

use crate::{
    error::AppResult,
    isbn,
    models::{
        audit::AuditAction,
        book::{Book, BookDetails, BookQuery, CreateBook, UpdateBook},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List books with optional name filter
    pub async fn list_books(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        self.repository.books.list(query).await
    }

    /// Get a book with its derived availability
    pub async fn get_book(&self, raw_isbn: &str) -> AppResult<BookDetails> {
        let isbn13 = isbn::to_isbn13(raw_isbn)?;
        let book = self.repository.books.get_by_isbn(&isbn13).await?;
        let active = self.repository.books.active_lease_count(&isbn13).await?;
        Ok(BookDetails::build(book, active))
    }

    /// Create a new book. The ISBN is normalized to ISBN-13 before storage.
    pub async fn create_book(&self, actor_id: i32, book: &CreateBook) -> AppResult<BookDetails> {
        let isbn13 = isbn::to_isbn13(&book.isbn)?;
        let created = self
            .repository
            .books
            .create(&isbn13, &book.name, &book.authors, book.count)
            .await?;

        self.audit(actor_id, AuditAction::BookCreated, &isbn13, &created.name)
            .await;

        let active = self.repository.books.active_lease_count(&isbn13).await?;
        Ok(BookDetails::build(created, active))
    }

    /// Update a book's descriptive fields and copy count
    pub async fn update_book(
        &self,
        actor_id: i32,
        raw_isbn: &str,
        update: &UpdateBook,
    ) -> AppResult<BookDetails> {
        let isbn13 = isbn::to_isbn13(raw_isbn)?;
        let updated = self.repository.books.update(&isbn13, update).await?;

        self.audit(
            actor_id,
            AuditAction::BookUpdated,
            &isbn13,
            &format!("count={}", updated.count),
        )
        .await;

        let active = self.repository.books.active_lease_count(&isbn13).await?;
        Ok(BookDetails::build(updated, active))
    }

    /// Dashboard data: the most recently added books that have copies
    pub async fn latest_books(&self, limit: i64) -> AppResult<Vec<Book>> {
        self.repository.books.latest_active(limit).await
    }

    /// The mutation already committed; a failed audit write is logged, not
    /// surfaced to the caller.
    async fn audit(&self, actor_id: i32, action: AuditAction, subject: &str, detail: &str) {
        if let Err(e) = self
            .repository
            .audit
            .record(actor_id, action, subject, Some(detail))
            .await
        {
            tracing::error!("Failed to write audit entry for {}: {}", subject, e);
        }
    }
}
