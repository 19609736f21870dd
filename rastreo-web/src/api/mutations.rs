//! Mutation endpoints: field update, full update, create, delete
//!
//! Every handler validates and normalizes its input, then executes exactly
//! one statement. Failures always come back with an explicit success flag;
//! there is no silent failure path. Zero-row updates and deletes are
//! idempotent no-ops, logged but not surfaced as errors.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::str::FromStr;
use tracing::{info, warn};

use rastreo_common::db::models::ShipmentField;
use rastreo_common::db::shipments;
use rastreo_common::validate;

use crate::AppState;

/// POST /api/update  `{id, field, value}`
///
/// Updates one column of one row. The field name must be a member of the
/// mutable-column allow-list; `id` and the timestamp columns are rejected.
pub async fn update_field(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, MutationError> {
    let id = parse_id(body.get("id"))?;

    let field_name = body
        .get("field")
        .and_then(Value::as_str)
        .ok_or_else(|| MutationError::InvalidInput("Missing field name".to_string()))?;
    let field = ShipmentField::from_str(field_name)?;

    let value = validate::normalize(field, body.get("value").unwrap_or(&Value::Null))?;

    let affected = shipments::update_field(&state.db, id, field, &value).await?;
    if affected == 0 {
        warn!("Update of {} on id {} matched no row", field.column(), id);
    }

    Ok(Json(json!({
        "success": true,
        "message": format!("Field '{}' updated", field.column()),
    })))
}

/// POST /api/update-full  full record + `{id}`
///
/// Replaces every mutable column in one statement. Fields absent from the
/// body reset to their defaults; they are not left untouched.
pub async fn update_full(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, MutationError> {
    let id = parse_id(body.get("id"))?;
    let values = validate::normalize_record(&body)?;

    let affected = shipments::update_full(&state.db, id, &values).await?;
    if affected == 0 {
        warn!("Full update of id {} matched no row", id);
    }

    Ok(Json(json!({
        "success": true,
        "message": format!("Record {} updated", id),
    })))
}

/// POST /api/create  record fields (no id)
///
/// Inserts a new record with the same default-filling rule as update-full
/// and returns the assigned id. No uniqueness is enforced here.
pub async fn create_shipment(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, MutationError> {
    let values = validate::normalize_record(&body)?;

    let id = shipments::create(&state.db, &values).await?;
    info!("Created shipment {}", id);

    Ok(Json(json!({
        "success": true,
        "id": id,
    })))
}

/// POST /api/delete  `{id}`
///
/// Deletes at most one row. Deleting a non-existent id is a success with
/// zero effect.
pub async fn delete_shipment(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, MutationError> {
    let id = parse_id(body.get("id"))?;

    let affected = shipments::delete(&state.db, id).await?;
    if affected == 0 {
        warn!("Delete of id {} matched no row", id);
    }

    Ok(Json(json!({ "success": true })))
}

/// Parse a positive integer id from a JSON number or numeric string
fn parse_id(value: Option<&Value>) -> Result<i64, MutationError> {
    let id = match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    id.filter(|id| *id > 0).ok_or_else(|| {
        MutationError::InvalidInput("id must be a positive integer".to_string())
    })
}

/// Mutation errors; always answered with `{success: false, error}`
#[derive(Debug)]
pub enum MutationError {
    InvalidInput(String),
    StorageError(String),
}

impl From<rastreo_common::Error> for MutationError {
    fn from(e: rastreo_common::Error) -> Self {
        match e {
            rastreo_common::Error::InvalidInput(msg) => MutationError::InvalidInput(msg),
            other => MutationError::StorageError(other.to_string()),
        }
    }
}

impl IntoResponse for MutationError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            MutationError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            MutationError::StorageError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "success": false,
            "error": message,
        }));

        (status, body).into_response()
    }
}
