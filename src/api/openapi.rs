//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, dashboard, health, leases, reports, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LMS API",
        version = "0.1.0",
        description = "Library Management System REST API",
        license(name = "GPL-3.0", url = "https://www.gnu.org/licenses/gpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::register,
        auth::me,
        // Books
        books::list_books,
        books::create_book,
        books::get_book,
        books::update_book,
        books::book_leases,
        // Leases
        leases::list_leases,
        leases::create_lease,
        leases::get_lease,
        leases::return_lease,
        leases::my_leases,
        // Dashboard
        dashboard::dashboard,
        // Reports
        reports::books_csv,
        reports::leases_csv,
        // Users & audit
        users::list_users,
        users::update_role,
        users::list_audit,
    ),
    components(
        schemas(
            health::HealthResponse,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            dashboard::DashboardResponse,
            crate::error::ErrorResponse,
            crate::models::book::Book,
            crate::models::book::BookDetails,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::lease::LeaseDetails,
            crate::models::lease::LeaseStatus,
            crate::models::lease::CreateLease,
            crate::models::user::User,
            crate::models::user::Role,
            crate::models::user::RegisterUser,
            crate::models::user::UpdateRole,
            crate::models::audit::AuditEntry,
            crate::models::audit::AuditAction,
        )
    ),
    tags(
        (name = "health", description = "Service health"),
        (name = "auth", description = "Authentication"),
        (name = "books", description = "Book catalog"),
        (name = "leases", description = "Lease lifecycle"),
        (name = "dashboard", description = "Librarian dashboard"),
        (name = "reports", description = "Tabular exports"),
        (name = "users", description = "User administration"),
        (name = "audit", description = "Audit log"),
    )
)]
pub struct ApiDoc;

/// Create the router serving Swagger UI and the OpenAPI document
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
