//! API integration tests for the Vinolab server
//!
//! These tests drive the full router (middleware included) against an
//! in-memory store and check status codes and response envelopes.
//!
//! Coverage includes:
//! - Health and summary
//! - Sample add, list, get, delete
//! - Bulk import and batch cascade deletion
//! - Error cases (400, 404, 422)
//! - Analysis outcomes (no_data, ok, insufficient data)

use axum::http::StatusCode;
use serde_json::json;

mod common;

use common::{clustered_rows, sample_row, TestApp};

// ============================================================================
// Health & Summary
// ============================================================================

#[tokio::test]
async fn test_health_reports_connected_store() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_health_reports_closed_store() {
    let app = TestApp::new().await;
    app.pool.close().await;

    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unhealthy");
}

#[tokio::test]
async fn test_unknown_route_uses_error_envelope() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/no-such-page").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_summary_of_empty_store() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/v1/summary").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["database_ok"], true);
    assert_eq!(body["data"]["count_samples"], 0);
    assert_eq!(body["data"]["count_batches"], 0);
    assert!(body["data"]["latest_sample"].is_null());
}

#[tokio::test]
async fn test_summary_tracks_latest_sample() {
    let app = TestApp::new().await;
    app.post(
        "/api/v1/samples",
        json!({"source": "manual", "alcohol": 13.2, "malic_acid": 1.78, "color_intensity": 4.38, "target": 0}),
    )
    .await;
    app.post(
        "/api/v1/samples",
        json!({"source": "lab", "alcohol": 12.1, "malic_acid": 2.0, "color_intensity": 3.1, "target": 1}),
    )
    .await;

    let (_, body) = app.get("/api/v1/summary").await;

    assert_eq!(body["data"]["count_samples"], 2);
    assert_eq!(body["data"]["count_batches"], 2);
    assert_eq!(body["data"]["latest_sample"]["target"], 1);
    assert_eq!(body["data"]["latest_batch"]["source"], "lab");
}

// ============================================================================
// Samples
// ============================================================================

#[tokio::test]
async fn test_add_sample_then_get_and_list() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post(
            "/api/v1/samples",
            json!({"source": "manual", "alcohol": 13.2, "malic_acid": 1.78, "color_intensity": 4.38, "target": 2}),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["source"], "manual");
    assert_eq!(body["data"]["batch_created"], true);
    assert_eq!(body["data"]["target"], 2);
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = app.get(&format!("/api/v1/samples/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["alcohol"], 13.2);
    assert_eq!(body["data"]["batch"]["source"], "manual");

    let (status, body) = app.get("/api/v1/samples").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["id"], id);
}

#[tokio::test]
async fn test_add_sample_without_source_uses_placeholder_batch() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post(
            "/api/v1/samples",
            json!({"alcohol": 12.0, "malic_acid": 1.0, "color_intensity": 3.0, "target": 0}),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["source"], "-");
}

#[tokio::test]
async fn test_add_sample_reuses_batch_for_same_source() {
    let app = TestApp::new().await;
    let payload =
        json!({"source": "manual", "alcohol": 12.0, "malic_acid": 1.0, "color_intensity": 3.0, "target": 0});

    let (_, first) = app.post("/api/v1/samples", payload.clone()).await;
    let (_, second) = app.post("/api/v1/samples", payload).await;

    assert_eq!(second["data"]["batch_created"], false);
    assert_eq!(first["data"]["batch_id"], second["data"]["batch_id"]);
}

#[tokio::test]
async fn test_add_sample_rejects_invalid_target() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post(
            "/api/v1/samples",
            json!({"source": "manual", "alcohol": 12.0, "malic_acid": 1.0, "color_intensity": 3.0, "target": 3}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (_, summary) = app.get("/api/v1/summary").await;
    assert_eq!(summary["data"]["count_samples"], 0);
    assert_eq!(summary["data"]["count_batches"], 0);
}

#[tokio::test]
async fn test_add_sample_rejects_missing_feature() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post(
            "/api/v1/samples",
            json!({"source": "manual", "alcohol": 12.0, "color_intensity": 3.0, "target": 1}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].as_str().unwrap().contains("malic_acid"));
}

#[tokio::test]
async fn test_add_sample_rejects_blank_source() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post(
            "/api/v1/samples",
            json!({"source": "   ", "alcohol": 12.0, "malic_acid": 1.0, "color_intensity": 3.0, "target": 1}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_add_sample_rejects_non_numeric_feature() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post(
            "/api/v1/samples",
            json!({"source": "manual", "alcohol": "abc", "malic_acid": 1.0, "color_intensity": 3.0, "target": 1}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["message"].as_str().unwrap().contains("abc"));

    let (_, summary) = app.get("/api/v1/summary").await;
    assert_eq!(summary["data"]["count_samples"], 0);
    assert_eq!(summary["data"]["count_batches"], 0);
}

#[tokio::test]
async fn test_import_rejects_non_numeric_feature() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post(
            "/api/v1/samples/import",
            json!({
                "source": "sklearn",
                "rows": [
                    sample_row(12.0, 1.0, 3.0, 0),
                    {"alcohol": 13.0, "malic_acid": 2.0, "color_intensity": "dark", "target": 1}
                ]
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (_, summary) = app.get("/api/v1/summary").await;
    assert_eq!(summary["data"]["count_samples"], 0);
}

#[tokio::test]
async fn test_malformed_ids_use_error_envelope() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/v1/samples/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, body) = app.delete("/api/v1/batches/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, body) = app.get("/api/v1/samples?batch_id=first").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_get_missing_sample_is_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/v1/samples/999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_delete_sample() {
    let app = TestApp::new().await;
    let (_, body) = app
        .post(
            "/api/v1/samples",
            json!({"source": "manual", "alcohol": 12.0, "malic_acid": 1.0, "color_intensity": 3.0, "target": 0}),
        )
        .await;
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = app.delete(&format!("/api/v1/samples/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted"], true);

    let (status, _) = app.delete(&format!("/api/v1/samples/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The batch outlives its last sample
    let (_, batches) = app.get("/api/v1/batches").await;
    assert_eq!(batches["meta"]["total"], 1);
    assert_eq!(batches["data"][0]["sample_count"], 0);
}

#[tokio::test]
async fn test_list_samples_filters_by_batch() {
    let app = TestApp::new().await;
    let first = app.import("first", vec![sample_row(12.0, 1.0, 3.0, 0)]).await;
    app.import(
        "second",
        vec![sample_row(13.0, 2.0, 5.0, 1), sample_row(14.0, 3.0, 7.0, 2)],
    )
    .await;

    let (_, all) = app.get("/api/v1/samples").await;
    assert_eq!(all["meta"]["total"], 3);

    let (status, filtered) = app.get(&format!("/api/v1/samples?batch_id={}", first)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(filtered["meta"]["total"], 1);
    assert_eq!(filtered["data"][0]["batch_id"], first);
}

// ============================================================================
// Import & Batches
// ============================================================================

#[tokio::test]
async fn test_import_with_reset_replaces_samples() {
    let app = TestApp::new().await;
    app.import("sklearn", clustered_rows(2)).await;

    let (status, body) = app
        .post(
            "/api/v1/samples/import",
            json!({"source": "sklearn", "reset": true, "rows": [sample_row(12.0, 1.0, 3.0, 0)]}),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["removed"], 6);
    assert_eq!(body["data"]["inserted"], 1);
    assert_eq!(body["data"]["batch_created"], false);

    let (_, summary) = app.get("/api/v1/summary").await;
    assert_eq!(summary["data"]["count_samples"], 1);
}

#[tokio::test]
async fn test_import_with_bad_row_writes_nothing() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post(
            "/api/v1/samples/import",
            json!({
                "source": "sklearn",
                "rows": [sample_row(12.0, 1.0, 3.0, 0), sample_row(13.0, 2.0, 5.0, 9)]
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"]["row"], 1);

    let (_, summary) = app.get("/api/v1/summary").await;
    assert_eq!(summary["data"]["count_samples"], 0);
    assert_eq!(summary["data"]["count_batches"], 0);
}

#[tokio::test]
async fn test_delete_batch_cascades_to_samples() {
    let app = TestApp::new().await;
    let doomed = app.import("doomed", clustered_rows(2)).await;
    app.import("kept", vec![sample_row(12.0, 1.0, 3.0, 0)]).await;

    let (status, body) = app.delete(&format!("/api/v1/batches/{}", doomed)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted_samples"], 6);

    let (_, batches) = app.get("/api/v1/batches").await;
    assert_eq!(batches["meta"]["total"], 1);
    assert_eq!(batches["data"][0]["source"], "kept");

    let (_, samples) = app.get("/api/v1/samples").await;
    assert_eq!(samples["meta"]["total"], 1);
}

#[tokio::test]
async fn test_delete_missing_batch_is_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app.delete("/api/v1/batches/42").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

// ============================================================================
// Analysis
// ============================================================================

#[tokio::test]
async fn test_analysis_of_empty_store_is_no_data() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/v1/analysis").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!({
            "status": "no_data",
            "message": "no data available for analysis",
            "labels": [0, 1, 2]
        })
    );
}

#[tokio::test]
async fn test_analysis_of_single_class_is_insufficient_data() {
    let app = TestApp::new().await;
    app.import(
        "sklearn",
        (0..5).map(|i| sample_row(12.0 + i as f64, 1.0, 3.0, 1)).collect(),
    )
    .await;

    let (status, body) = app.get("/api/v1/analysis").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "INSUFFICIENT_DATA");
    assert_eq!(body["error"]["details"]["class_counts"], json!([0, 5, 0]));
    assert_eq!(body["error"]["details"]["reason"]["kind"], "single_class");
}

#[tokio::test]
async fn test_analysis_of_balanced_store() {
    let app = TestApp::new().await;
    app.import("sklearn", clustered_rows(10)).await;

    let (status, body) = app.get("/api/v1/analysis").await;

    assert_eq!(status, StatusCode::OK);
    let report = &body["data"];
    assert_eq!(report["status"], "ok");
    assert_eq!(report["train_size"], 24);
    assert_eq!(report["test_size"], 6);
    assert_eq!(report["random_state"], 42);
    assert_eq!(report["labels"], json!([0, 1, 2]));
    assert_eq!(report["accuracy"], 1.0);

    let names: Vec<&str> = report["feature_importances"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["feature"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["alcohol", "malic_acid", "color_intensity"]);

    let matrix_total: u64 = report["confusion_matrix"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|row| row.as_array().unwrap())
        .map(|cell| cell.as_u64().unwrap())
        .sum();
    assert_eq!(matrix_total, 6);

    // Unchanged data gives an identical report
    let (_, again) = app.get("/api/v1/analysis").await;
    assert_eq!(again["data"], body["data"]);
}
