//! rastreo-web library - package tracking web service
//!
//! Public search page plus a password-protected admin panel, both backed by
//! the `envios` table through JSON endpoints.

use axum::Router;
use rastreo_common::auth::SessionSecret;
use sqlx::SqlitePool;

pub mod api;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Admin secret backing the session cookie check
    pub secret: SessionSecret,
    /// Max-Age applied to the session cookie at login, in seconds
    pub session_max_age_secs: i64,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, secret: SessionSecret, session_max_age_secs: i64) -> Self {
        Self {
            db,
            secret,
            session_max_age_secs,
        }
    }
}

/// Build application router
///
/// Mutation endpoints and the admin views require a valid session; search,
/// the state filter, login, and health do not.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};
    use tower_http::cors::CorsLayer;
    use tower_http::trace::TraceLayer;

    // Protected routes (require admin session)
    let protected = Router::new()
        .route("/admin", get(api::serve_admin))
        .route("/api/admin/all-shipments", get(api::all_shipments))
        .route("/api/update", post(api::update_field))
        .route("/api/update-full", post(api::update_full))
        .route("/api/create", post(api::create_shipment))
        .route("/api/delete", post(api::delete_shipment))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::require_session,
        ));

    // Public routes (no authentication)
    let public = Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .route("/api/search", get(api::search))
        .route("/api/filter-by-state", get(api::filter_by_state))
        .route("/admin-login", get(api::serve_login).post(api::login))
        .merge(api::health_routes());

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        // Enable CORS for local access
        .layer(CorsLayer::permissive())
        .with_state(state)
}
