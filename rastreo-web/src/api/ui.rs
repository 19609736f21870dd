//! UI serving routes
//!
//! Serves the embedded HTML/JS for the public search page, the admin login
//! form, and the admin panel.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

const INDEX_HTML: &str = include_str!("../ui/index.html");
const LOGIN_HTML: &str = include_str!("../ui/login.html");
const ADMIN_HTML: &str = include_str!("../ui/admin.html");
const APP_JS: &str = include_str!("../ui/app.js");

/// GET /
///
/// Public search page
pub async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /admin-login
///
/// Admin login form
pub async fn serve_login() -> Html<&'static str> {
    Html(LOGIN_HTML)
}

/// GET /admin
///
/// Admin panel page (behind the session middleware)
pub async fn serve_admin() -> Html<&'static str> {
    Html(ADMIN_HTML)
}

/// GET /static/app.js
///
/// Shared client script for both views
pub async fn serve_app_js() -> Response {
    (
        StatusCode::OK,
        [("content-type", "application/javascript")],
        APP_JS,
    )
        .into_response()
}
