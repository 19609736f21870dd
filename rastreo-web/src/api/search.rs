//! Public search endpoint
//!
//! One dispatcher over the five search types. The value is trimmed and
//! upper-cased before matching, except when interpreted as a numeric id.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use rastreo_common::db::models::Shipment;
use rastreo_common::db::shipments;

use crate::AppState;

/// Query parameters for /api/search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(rename = "type")]
    pub search_type: Option<String>,
    pub value: Option<String>,
}

/// Search response: matching records in insertion order, plus their count
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub count: usize,
    pub packages: Vec<Shipment>,
}

/// GET /api/search?type=...&value=...
///
/// type is one of tracking | ddp | receptor | dbid | state. A zero-match
/// result is a success with count 0, not an error.
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, SearchError> {
    let search_type = query
        .search_type
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .ok_or(SearchError::MissingParams)?;

    let raw_value = query
        .value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(SearchError::MissingParams)?;

    let term = raw_value.to_uppercase();

    let packages = match search_type {
        "tracking" => shipments::by_tracking(&state.db, &term).await?,
        "ddp" => {
            // Only the digits of the submitted code participate in the match
            let digits: String = term.chars().filter(|c| c.is_ascii_digit()).collect();
            shipments::by_ddp(&state.db, &digits).await?
        }
        "receptor" => shipments::by_receptor(&state.db, &term).await?,
        "dbid" => {
            let id = raw_value
                .parse::<i64>()
                .ok()
                .filter(|id| *id > 0)
                .ok_or_else(|| SearchError::InvalidId(raw_value.to_string()))?;
            shipments::by_id(&state.db, id).await?
        }
        "state" => shipments::by_state(&state.db, &term).await?,
        other => return Err(SearchError::UnknownType(other.to_string())),
    };

    Ok(Json(SearchResponse {
        count: packages.len(),
        packages,
    }))
}

/// Search errors
#[derive(Debug)]
pub enum SearchError {
    MissingParams,
    UnknownType(String),
    InvalidId(String),
    DatabaseError(String),
}

impl From<rastreo_common::Error> for SearchError {
    fn from(e: rastreo_common::Error) -> Self {
        SearchError::DatabaseError(e.to_string())
    }
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            SearchError::MissingParams => (
                StatusCode::BAD_REQUEST,
                "Missing search parameters".to_string(),
            ),
            SearchError::UnknownType(t) => {
                (StatusCode::BAD_REQUEST, format!("Invalid search type: {}", t))
            }
            SearchError::InvalidId(v) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid id (must be a positive integer): {}", v),
            ),
            SearchError::DatabaseError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Database error: {}", msg))
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
