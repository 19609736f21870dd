//! Integration tests for the rastreo-web API endpoints
//!
//! Tests cover:
//! - Search dispatch (tracking, ddp, receptor, dbid, state)
//! - State filter
//! - Field update, full update, create, delete semantics
//! - Validation contract (dates, numerics, field allow-list)
//! - Health endpoint

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot` method

use rastreo_common::auth::SessionSecret;
use rastreo_common::db::init::init_database;
use rastreo_web::{build_router, AppState};

const TEST_SECRET: &str = "test-secret";

/// Test helper: fresh database + app router
async fn setup_app() -> (tempfile::TempDir, axum::Router) {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let pool = init_database(&dir.path().join("envios.db"))
        .await
        .expect("Should initialize test database");

    let secret = SessionSecret::new(TEST_SECRET.to_string()).unwrap();
    let state = AppState::new(pool, secret, 3600);
    (dir, build_router(state))
}

/// Test helper: GET request (no session)
fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Test helper: GET request with a valid admin session cookie
fn get_admin(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("cookie", format!("rastreo_session={}", TEST_SECRET))
        .body(Body::empty())
        .unwrap()
}

/// Test helper: JSON POST with a valid admin session cookie
fn post_admin(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("cookie", format!("rastreo_session={}", TEST_SECRET))
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

/// Test helper: create a record through the API, returning its id
async fn create_record(app: &axum::Router, record: Value) -> i64 {
    let response = app
        .clone()
        .oneshot(post_admin("/api/create", record))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], true);
    body["id"].as_i64().expect("create should return an id")
}

// =============================================================================
// Health Endpoint
// =============================================================================

#[tokio::test]
async fn test_health_endpoint_no_auth_required() {
    let (_dir, app) = setup_app().await;

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "rastreo-web");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_cors_headers_present() {
    let (_dir, app) = setup_app().await;

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .header("origin", "http://localhost:8080")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}

// =============================================================================
// Search
// =============================================================================

#[tokio::test]
async fn test_search_missing_params_rejected() {
    let (_dir, app) = setup_app().await;

    for uri in [
        "/api/search",
        "/api/search?type=tracking",
        "/api/search?type=tracking&value=",
        "/api/search?value=ABC123",
    ] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri {}", uri);

        let body = extract_json(response.into_body()).await;
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn test_search_unknown_type_rejected() {
    let (_dir, app) = setup_app().await;

    let response = app
        .oneshot(get("/api/search?type=telepathy&value=x"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Invalid search type"));
}

#[tokio::test]
async fn test_search_no_match_is_zero_count_success() {
    let (_dir, app) = setup_app().await;

    let response = app
        .oneshot(get("/api/search?type=tracking&value=NOPE"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["count"], 0);
    assert_eq!(body["packages"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_search_tracking_upper_cases_input() {
    let (_dir, app) = setup_app().await;
    create_record(&app, json!({"numero_seguimiento": "ZX99"})).await;

    let response = app
        .oneshot(get("/api/search?type=tracking&value=zx99"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["packages"][0]["numero_seguimiento"], "ZX99");
}

#[tokio::test]
async fn test_search_ddp_ignores_non_digits() {
    let (_dir, app) = setup_app().await;
    // Stored code is stripped to digits on write
    create_record(&app, json!({"codigo_ddp": "DDP-00123"})).await;

    let response = app
        .oneshot(get("/api/search?type=ddp&value=ddp%2000123"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["packages"][0]["codigo_ddp"], "00123");
}

#[tokio::test]
async fn test_search_receptor_substring_case_insensitive() {
    let (_dir, app) = setup_app().await;
    create_record(&app, json!({"nombre_receptor": "maria perez"})).await;
    create_record(&app, json!({"nombre_receptor": "jose rodriguez"})).await;

    let response = app
        .oneshot(get("/api/search?type=receptor&value=perez"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["packages"][0]["nombre_receptor"], "MARIA PEREZ");
}

#[tokio::test]
async fn test_search_dbid_requires_positive_integer() {
    let (_dir, app) = setup_app().await;

    for value in ["abc", "0", "-3", "1.5"] {
        let response = app
            .clone()
            .oneshot(get(&format!("/api/search?type=dbid&value={}", value)))
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "value {}",
            value
        );
    }
}

#[tokio::test]
async fn test_create_then_search_dbid_round_trip() {
    let (_dir, app) = setup_app().await;
    let id = create_record(
        &app,
        json!({
            "numero_seguimiento": "AB123",
            "nombre_receptor": "ana diaz",
            "costo": 25.5,
        }),
    )
    .await;

    let response = app
        .oneshot(get(&format!("/api/search?type=dbid&value={}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["count"], 1);

    let pkg = &body["packages"][0];
    assert_eq!(pkg["id"], id);
    assert_eq!(pkg["numero_seguimiento"], "AB123");
    assert_eq!(pkg["nombre_receptor"], "ANA DIAZ");
    assert_eq!(pkg["costo"], 25.5);
    // Defaults for omitted fields
    assert_eq!(pkg["peso"], 0.0);
    assert_eq!(pkg["moneda_costo"], "USD");
    assert_eq!(pkg["estado"], "RECIBIDO EN CUCUTA");
    assert_eq!(pkg["fecha_envio"], Value::Null);
}

#[tokio::test]
async fn test_search_results_in_insertion_order() {
    let (_dir, app) = setup_app().await;
    create_record(&app, json!({"nombre_receptor": "ana", "estado": "ENVIADO A CLIENTE"})).await;
    create_record(&app, json!({"nombre_receptor": "luis", "estado": "ENVIADO A CLIENTE"})).await;

    let response = app
        .oneshot(get("/api/search?type=state&value=ENVIADO%20A%20CLIENTE"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;

    assert_eq!(body["count"], 2);
    let ids: Vec<i64> = body["packages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
}

// =============================================================================
// State Filter
// =============================================================================

#[tokio::test]
async fn test_filter_by_state() {
    let (_dir, app) = setup_app().await;
    create_record(&app, json!({"estado": "ENVIADO A TACHIRA"})).await;
    create_record(&app, json!({"estado": "ENVIADO A CLIENTE"})).await;

    let response = app
        .oneshot(get("/api/filter-by-state?state=ENVIADO%20A%20TACHIRA"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["packages"][0]["estado"], "ENVIADO A TACHIRA");
}

#[tokio::test]
async fn test_filter_by_state_missing_param_rejected() {
    let (_dir, app) = setup_app().await;

    for uri in ["/api/filter-by-state", "/api/filter-by-state?state="] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri {}", uri);
    }
}

// =============================================================================
// Admin Bulk Listing
// =============================================================================

#[tokio::test]
async fn test_all_shipments_lists_everything() {
    let (_dir, app) = setup_app().await;
    create_record(&app, json!({"nombre_receptor": "ana"})).await;
    create_record(&app, json!({"nombre_receptor": "luis"})).await;

    let response = app
        .oneshot(get_admin("/api/admin/all-shipments"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["packages"].as_array().unwrap().len(), 2);
}

// =============================================================================
// Field Update
// =============================================================================

#[tokio::test]
async fn test_update_field_success() {
    let (_dir, app) = setup_app().await;
    let id = create_record(&app, json!({"nombre_receptor": "ana"})).await;

    let response = app
        .clone()
        .oneshot(post_admin(
            "/api/update",
            json!({"id": id, "field": "contenido", "value": "zapatos"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], true);
    assert!(body["message"].as_str().unwrap().contains("contenido"));

    let search = app
        .oneshot(get(&format!("/api/search?type=dbid&value={}", id)))
        .await
        .unwrap();
    let found = extract_json(search.into_body()).await;
    assert_eq!(found["packages"][0]["contenido"], "zapatos");
}

#[tokio::test]
async fn test_update_field_id_always_rejected() {
    let (_dir, app) = setup_app().await;
    let id = create_record(&app, json!({"nombre_receptor": "ana"})).await;

    for value in [json!(7), json!("7"), Value::Null] {
        let response = app
            .clone()
            .oneshot(post_admin(
                "/api/update",
                json!({"id": id, "field": "id", "value": value}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = extract_json(response.into_body()).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn test_update_field_timestamps_rejected() {
    let (_dir, app) = setup_app().await;
    let id = create_record(&app, json!({"nombre_receptor": "ana"})).await;

    for field in ["created_at", "updated_at", "no_such_column"] {
        let response = app
            .clone()
            .oneshot(post_admin(
                "/api/update",
                json!({"id": id, "field": field, "value": "x"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "field {}", field);
    }
}

#[tokio::test]
async fn test_update_field_invalid_id_rejected() {
    let (_dir, app) = setup_app().await;

    for id in [json!(0), json!(-1), json!("abc"), Value::Null] {
        let response = app
            .clone()
            .oneshot(post_admin(
                "/api/update",
                json!({"id": id, "field": "contenido", "value": "x"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_update_field_zero_rows_is_success() {
    let (_dir, app) = setup_app().await;

    let response = app
        .oneshot(post_admin(
            "/api/update",
            json!({"id": 9999, "field": "contenido", "value": "nada"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], true);
}

// =============================================================================
// Validation Contract
// =============================================================================

#[tokio::test]
async fn test_date_validation_on_update() {
    let (_dir, app) = setup_app().await;
    let id = create_record(&app, json!({"nombre_receptor": "ana"})).await;

    // Accepted
    let response = app
        .clone()
        .oneshot(post_admin(
            "/api/update",
            json!({"id": id, "field": "fecha_envio", "value": "2024-01-05"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Wrong separator rejected
    let response = app
        .clone()
        .oneshot(post_admin(
            "/api/update",
            json!({"id": id, "field": "fecha_envio", "value": "2024/01/05"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // N/A (any case) and empty normalize to null
    for value in ["N/A", "n/a", ""] {
        let response = app
            .clone()
            .oneshot(post_admin(
                "/api/update",
                json!({"id": id, "field": "fecha_envio", "value": value}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "value {:?}", value);
    }

    let search = app
        .oneshot(get(&format!("/api/search?type=dbid&value={}", id)))
        .await
        .unwrap();
    let found = extract_json(search.into_body()).await;
    assert_eq!(found["packages"][0]["fecha_envio"], Value::Null);
}

#[tokio::test]
async fn test_numeric_validation_on_update() {
    let (_dir, app) = setup_app().await;
    let id = create_record(&app, json!({"nombre_receptor": "ana"})).await;

    // String that fully parses is accepted
    let response = app
        .clone()
        .oneshot(post_admin(
            "/api/update",
            json!({"id": id, "field": "costo", "value": "12.5"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let search = app
        .clone()
        .oneshot(get(&format!("/api/search?type=dbid&value={}", id)))
        .await
        .unwrap();
    let found = extract_json(search.into_body()).await;
    assert_eq!(found["packages"][0]["costo"], 12.5);

    // Garbage rejected
    let response = app
        .oneshot(post_admin(
            "/api/update",
            json!({"id": id, "field": "costo", "value": "abc"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_negative_numeric_values_accepted() {
    let (_dir, app) = setup_app().await;
    let id = create_record(&app, json!({"nombre_receptor": "ana"})).await;

    // Any fully-parsing decimal is storable; corrections and refunds can go
    // below zero
    for (field, value) in [("costo", json!("-5")), ("peso", json!(-0.25))] {
        let response = app
            .clone()
            .oneshot(post_admin(
                "/api/update",
                json!({"id": id, "field": field, "value": value}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "field {}", field);

        let body = extract_json(response.into_body()).await;
        assert_eq!(body["success"], true);
    }

    let search = app
        .oneshot(get(&format!("/api/search?type=dbid&value={}", id)))
        .await
        .unwrap();
    let found = extract_json(search.into_body()).await;
    assert_eq!(found["packages"][0]["costo"], -5.0);
    assert_eq!(found["packages"][0]["peso"], -0.25);
}

#[tokio::test]
async fn test_status_closed_set_on_update() {
    let (_dir, app) = setup_app().await;
    let id = create_record(&app, json!({"nombre_receptor": "ana"})).await;

    let response = app
        .clone()
        .oneshot(post_admin(
            "/api/update",
            json!({"id": id, "field": "estado", "value": "ENVIADO A CLIENTE"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(post_admin(
            "/api/update",
            json!({"id": id, "field": "estado", "value": "PERDIDO"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Full Update
// =============================================================================

#[tokio::test]
async fn test_update_full_resets_absent_fields_to_defaults() {
    let (_dir, app) = setup_app().await;
    let id = create_record(
        &app,
        json!({
            "nombre_receptor": "ana",
            "costo": 99.0,
            "moneda_costo": "EUR",
            "estado": "ENVIADO A CLIENTE",
        }),
    )
    .await;

    let response = app
        .clone()
        .oneshot(post_admin(
            "/api/update-full",
            json!({"id": id, "nombre_receptor": "ana"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let search = app
        .oneshot(get(&format!("/api/search?type=dbid&value={}", id)))
        .await
        .unwrap();
    let found = extract_json(search.into_body()).await;
    let pkg = &found["packages"][0];
    assert_eq!(pkg["costo"], 0.0);
    assert_eq!(pkg["moneda_costo"], "USD");
    assert_eq!(pkg["estado"], "RECIBIDO EN CUCUTA");
}

#[tokio::test]
async fn test_update_full_invalid_date_rejected_before_write() {
    let (_dir, app) = setup_app().await;
    let id = create_record(&app, json!({"contenido": "ropa"})).await;

    let response = app
        .clone()
        .oneshot(post_admin(
            "/api/update-full",
            json!({"id": id, "fecha_envio": "05-01-2024x"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Record untouched
    let search = app
        .oneshot(get(&format!("/api/search?type=dbid&value={}", id)))
        .await
        .unwrap();
    let found = extract_json(search.into_body()).await;
    assert_eq!(found["packages"][0]["contenido"], "ropa");
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_then_search_returns_nothing() {
    let (_dir, app) = setup_app().await;
    let id = create_record(&app, json!({"nombre_receptor": "ana"})).await;

    let response = app
        .clone()
        .oneshot(post_admin("/api/delete", json!({"id": id})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], true);

    let search = app
        .oneshot(get(&format!("/api/search?type=dbid&value={}", id)))
        .await
        .unwrap();
    let found = extract_json(search.into_body()).await;
    assert_eq!(found["count"], 0);
}

#[tokio::test]
async fn test_delete_nonexistent_id_is_success() {
    let (_dir, app) = setup_app().await;

    let response = app
        .oneshot(post_admin("/api/delete", json!({"id": 4242})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_delete_invalid_id_rejected() {
    let (_dir, app) = setup_app().await;

    for id in [json!("abc"), json!(0), Value::Null] {
        let response = app
            .clone()
            .oneshot(post_admin("/api/delete", json!({"id": id})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
