//! Predefined state filter

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use rastreo_common::db::shipments;

use crate::api::search::SearchResponse;
use crate::AppState;

/// Query parameters for /api/filter-by-state
#[derive(Debug, Deserialize)]
pub struct StateQuery {
    pub state: Option<String>,
}

/// GET /api/filter-by-state?state=...
///
/// Exact match on the status label.
pub async fn filter_by_state(
    State(state): State<AppState>,
    Query(query): Query<StateQuery>,
) -> Result<Json<SearchResponse>, FilterError> {
    let label = query
        .state
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(FilterError::MissingState)?
        .to_uppercase();

    let packages = shipments::by_state(&state.db, &label)
        .await
        .map_err(|e| FilterError::DatabaseError(e.to_string()))?;

    Ok(Json(SearchResponse {
        count: packages.len(),
        packages,
    }))
}

/// Filter errors
#[derive(Debug)]
pub enum FilterError {
    MissingState,
    DatabaseError(String),
}

impl IntoResponse for FilterError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            FilterError::MissingState => {
                (StatusCode::BAD_REQUEST, "Missing state parameter".to_string())
            }
            FilterError::DatabaseError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Database error: {}", msg))
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
