//! # Ledger Backend
//!
//! HTTP service exposing CRUD operations over accounts and transactions,
//! plus a total endpoint for each.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST handlers, error rendering)
//!     ↓
//! Domain Layer (account and transaction services)
//!     ↓
//! Storage Layer (SQLite connection pool, repositories)
//! ```
//!
//! The connection pool is opened once at startup and handed to every handler
//! through [`AppState`].

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use axum::{http::Method, Router};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::domain::{AccountService, TransactionService};
use crate::io::rest::{account_apis, error, transaction_apis};
use crate::storage::DbConnection;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub account_service: AccountService,
    pub transaction_service: TransactionService,
}

impl AppState {
    pub fn new(db: DbConnection) -> Self {
        Self {
            account_service: AccountService::new(db.clone()),
            transaction_service: TransactionService::new(db),
        }
    }
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    let api_routes = Router::new()
        .nest("/accounts", account_apis::router())
        .nest("/transactions", transaction_apis::router());

    with_middleware(Router::new().nest("/api", api_routes)).with_state(app_state)
}

/// Terminal error handling, request tracing and CORS. Must be applied after
/// every route is added.
fn with_middleware(routes: Router<AppState>) -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    // Unsupported methods on a known path are answered like unknown routes
    routes
        .fallback(error::route_not_found)
        .method_not_allowed_fallback(error::route_not_found)
        .layer(CatchPanicLayer::custom(error::handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
