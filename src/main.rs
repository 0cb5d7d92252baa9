//! LMS Server - Library Management System
//!
//! REST API server for tracking books and leases.

use axum::{
    routing::{get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lms_server::{api, config::AppConfig, repository::Repository, services::Services, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().map_err(|e| anyhow::anyhow!("Failed to load configuration: {e}"))?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("lms_server={},tower_http=debug", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting LMS Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository, config.auth.clone());

    // Make sure a fresh database has an account that can manage roles
    services.users.ensure_initial_admin().await?;

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    let app = create_router(state);

    let addr = SocketAddr::new(server_host.parse()?, server_port);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/login", post(api::auth::login))
        .route("/auth/register", post(api::auth::register))
        .route("/auth/me", get(api::auth::me))
        // Books
        .route("/books", get(api::books::list_books))
        .route("/books", post(api::books::create_book))
        .route("/books/:isbn", get(api::books::get_book))
        .route("/books/:isbn", put(api::books::update_book))
        .route("/books/:isbn/leases", get(api::books::book_leases))
        // Leases
        .route("/leases", get(api::leases::list_leases))
        .route("/leases", post(api::leases::create_lease))
        .route("/leases/:id", get(api::leases::get_lease))
        .route("/leases/:id/return", post(api::leases::return_lease))
        .route("/me/leases", get(api::leases::my_leases))
        // Dashboard
        .route("/dashboard", get(api::dashboard::dashboard))
        // Reports
        .route("/reports/books.csv", get(api::reports::books_csv))
        .route("/reports/leases.csv", get(api::reports::leases_csv))
        // Users & audit
        .route("/users", get(api::users::list_users))
        .route("/users/:id/role", put(api::users::update_role))
        .route("/audit", get(api::users::list_audit))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
