//! Admin bulk listing

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use rastreo_common::db::models::Shipment;
use rastreo_common::db::shipments;

use crate::AppState;

/// Bulk listing response for the admin table view
#[derive(Debug, Serialize)]
pub struct AllShipmentsResponse {
    pub packages: Vec<Shipment>,
}

/// GET /api/admin/all-shipments
///
/// Every record in insertion order. No pagination; the admin table view
/// consumes the whole set.
pub async fn all_shipments(
    State(state): State<AppState>,
) -> Result<Json<AllShipmentsResponse>, AdminError> {
    let packages = shipments::list_all(&state.db)
        .await
        .map_err(|e| AdminError::DatabaseError(e.to_string()))?;

    Ok(Json(AllShipmentsResponse { packages }))
}

/// Admin listing errors
#[derive(Debug)]
pub enum AdminError {
    DatabaseError(String),
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let AdminError::DatabaseError(msg) = self;
        let body = Json(json!({
            "error": format!("Database error: {}", msg),
        }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
