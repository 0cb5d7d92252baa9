//! Report export service
//!
//! Produces the two tabular exports with fixed column headers: books ordered
//! by added date and leases ordered by issue date. Served as CSV.

use crate::{
    error::{AppError, AppResult},
    models::{book::Book, lease::LeaseDetails},
    repository::Repository,
};

const BOOKS_HEADERS: [&str; 5] = ["ISBN", "Name", "Authors", "Added date", "Count"];
const LEASES_HEADERS: [&str; 6] = [
    "ID",
    "Student",
    "Book ISBN",
    "Issue date",
    "Expire date",
    "Return date",
];

#[derive(Clone)]
pub struct ReportsService {
    repository: Repository,
}

impl ReportsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Books sheet as CSV, ordered by added date
    pub async fn books_csv(&self) -> AppResult<String> {
        let books = self.repository.books.list_by_added_date().await?;
        write_books_csv(&books)
    }

    /// Leases sheet as CSV, ordered by issue date
    pub async fn leases_csv(&self) -> AppResult<String> {
        let leases = self.repository.leases.list_by_issue_date().await?;
        write_leases_csv(&leases)
    }
}

fn write_books_csv(books: &[Book]) -> AppResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(BOOKS_HEADERS)
        .map_err(|e| AppError::Internal(format!("CSV write failed: {}", e)))?;
    for book in books {
        writer
            .write_record([
                book.formatted_isbn(),
                book.name.clone(),
                book.authors.clone(),
                book.added_date.to_rfc3339(),
                book.count.to_string(),
            ])
            .map_err(|e| AppError::Internal(format!("CSV write failed: {}", e)))?;
    }
    finish(writer)
}

fn write_leases_csv(leases: &[LeaseDetails]) -> AppResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(LEASES_HEADERS)
        .map_err(|e| AppError::Internal(format!("CSV write failed: {}", e)))?;
    for lease in leases {
        writer
            .write_record([
                lease.id.to_string(),
                lease.student_name.clone(),
                lease.book_formatted_isbn.clone(),
                lease.issue_date.to_rfc3339(),
                lease.expire_date.to_string(),
                lease
                    .return_date
                    .map(|d| d.to_rfc3339())
                    .unwrap_or_default(),
            ])
            .map_err(|e| AppError::Internal(format!("CSV write failed: {}", e)))?;
    }
    finish(writer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> AppResult<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV write failed: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("CSV encoding failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::lease::LeaseStatus;
    use chrono::{NaiveDate, TimeZone, Utc};
    use uuid::Uuid;

    #[test]
    fn empty_books_report_has_only_headers() {
        let csv = write_books_csv(&[]).unwrap();
        assert_eq!(csv.trim_end(), "ISBN,Name,Authors,Added date,Count");
    }

    #[test]
    fn books_report_uses_hyphenated_isbn() {
        let books = vec![Book {
            isbn: "9780000000002".to_string(),
            name: "Test Book".to_string(),
            authors: "Some Author".to_string(),
            added_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            count: 3,
        }];
        let csv = write_books_csv(&books).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), "ISBN,Name,Authors,Added date,Count");
        let row = lines.next().unwrap();
        assert!(row.starts_with("978-0-00-000000-2,Test Book,Some Author,"));
        assert!(row.ends_with(",3"));
    }

    #[test]
    fn leases_report_leaves_return_date_empty_for_active_leases() {
        let leases = vec![LeaseDetails {
            id: Uuid::nil(),
            student_id: 1,
            student_name: "student1".to_string(),
            book_isbn: "9780000000002".to_string(),
            book_formatted_isbn: "978-0-00-000000-2".to_string(),
            book_name: "Test Book".to_string(),
            issue_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            expire_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            return_date: None,
            status: LeaseStatus::Active,
        }];
        let csv = write_leases_csv(&leases).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert!(row.contains(",student1,978-0-00-000000-2,"));
        assert!(row.ends_with("2024-02-01,"));
    }
}
