//! Repository layer for database operations

pub mod audit;
pub mod books;
pub mod leases;
pub mod users;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub books: books::BooksRepository,
    pub leases: leases::LeasesRepository,
    pub users: users::UsersRepository,
    pub audit: audit::AuditRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            leases: leases::LeasesRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            audit: audit::AuditRepository::new(pool.clone()),
            pool,
        }
    }
}

/// Turn caller-supplied pagination parameters into a (limit, offset) pair.
/// Values are clamped and the offset saturates, so absurd page numbers
/// produce an empty result instead of arithmetic overflow.
pub(crate) fn page_window(
    page: Option<i64>,
    per_page: Option<i64>,
    default_per_page: i64,
    max_per_page: i64,
) -> (i64, i64) {
    let limit = per_page.unwrap_or(default_per_page).clamp(1, max_per_page);
    let page = page.unwrap_or(1).max(1);
    let offset = (page - 1).saturating_mul(limit);
    (limit, offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_window_defaults_and_clamps() {
        assert_eq!(page_window(None, None, 25, 100), (25, 0));
        assert_eq!(page_window(Some(3), Some(10), 25, 100), (10, 20));
        assert_eq!(page_window(Some(0), Some(500), 25, 100), (100, 0));
        assert_eq!(page_window(Some(-5), Some(-1), 25, 100), (1, 0));
    }

    #[test]
    fn page_window_saturates_on_huge_pages() {
        let (limit, offset) = page_window(Some(i64::MAX), Some(100), 25, 100);
        assert_eq!(limit, 100);
        assert_eq!(offset, i64::MAX);

        let (_, offset) = page_window(Some(i64::MAX), Some(1), 25, 100);
        assert_eq!(offset, i64::MAX - 1);
    }
}
