//! HTTP API handlers for rastreo-web

pub mod admin;
pub mod auth;
pub mod filters;
pub mod health;
pub mod mutations;
pub mod search;
pub mod ui;

pub use admin::all_shipments;
pub use auth::{login, require_session};
pub use filters::filter_by_state;
pub use health::health_routes;
pub use mutations::{create_shipment, delete_shipment, update_field, update_full};
pub use search::search;
pub use ui::{serve_admin, serve_app_js, serve_index, serve_login};
