//! Database schema, models, and shipment queries

pub mod init;
pub mod models;
pub mod shipments;

pub use init::*;
pub use models::*;
