//! Session middleware and admin login
//!
//! The session is a single cookie whose value is checked (constant-time)
//! against the configured admin secret. There is no per-user identity; the
//! cookie expires via Max-Age set at login.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use rastreo_common::auth::{cookie_value, SESSION_COOKIE};

use crate::AppState;

/// Login form fields
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub password: String,
}

/// Authentication middleware for admin routes
///
/// Page routes redirect to the login form on failure; API routes answer
/// 401 JSON so the client script can surface the error.
pub async fn require_session(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let authorized = request
        .headers()
        .get(header::COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| cookie_value(h, SESSION_COOKIE))
        .map(|presented| state.secret.verify(presented))
        .unwrap_or(false);

    if authorized {
        return next.run(request).await;
    }

    if request.uri().path().starts_with("/api/") {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Not authorized" })),
        )
            .into_response()
    } else {
        Redirect::to("/admin-login").into_response()
    }
}

/// POST /admin-login
///
/// On a matching password, sets the session cookie and redirects to the
/// admin panel; otherwise back to the login form with an error flag.
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    if !state.secret.verify(&form.password) {
        warn!("Failed admin login attempt");
        return Redirect::to("/admin-login?error=1").into_response();
    }

    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        state.secret.cookie_value(),
        state.session_max_age_secs
    );

    (
        [(header::SET_COOKIE, cookie)],
        Redirect::to("/admin"),
    )
        .into_response()
}
