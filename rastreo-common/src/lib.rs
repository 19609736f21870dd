//! # Rastreo Common Library
//!
//! Shared code for the rastreo package-tracking service:
//! - Database schema, models, and shipment queries
//! - Field validation/normalization contract
//! - Configuration loading
//! - Admin session secret handling

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod validate;

pub use error::{Error, Result};
