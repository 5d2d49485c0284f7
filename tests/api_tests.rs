use axum::body::Body;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use phainspect::config::Config;
use phainspect::db::pool::DbPool;
use phainspect::server::{AppState, router};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app() -> axum::Router {
    app_with(Config::with_database(":memory:"))
}

fn app_with(cfg: Config) -> axum::Router {
    let pool = DbPool::open_in_memory().expect("in-memory db");
    router(AppState::new(pool, cfg))
}

async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send_raw(app, method, uri, body.map(|v| v.to_string())).await
}

async fn send_raw(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<String>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(text) => {
            builder = builder.header("content-type", "application/json");
            Body::from(text)
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn create(app: &axum::Router) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/inspections",
        Some(json!({
            "unitNumber": "041529",
            "siteCode": "901",
            "siteName": "Haddington",
            "address": "123 Main St",
            "startDate": "2025-05-02"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["soNumber"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_reports_version() {
    let app = app();
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn create_then_fetch_inspection() {
    let app = app();
    let so = create(&app).await;
    assert_eq!(so, "3184948");

    let (status, body) = send(&app, "GET", &format!("/inspections/{so}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "New");
    assert_eq!(body["unitNumber"], "041529");

    let (status, body) = send(&app, "GET", "/inspections?siteCode=901&size=5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalElements"], 1);
    assert_eq!(body["inspections"][0]["soDate"], "2025-05-02");
}

#[tokio::test]
async fn validation_errors_are_bad_requests() {
    let app = app();
    let (status, body) = send(&app, "POST", "/inspections", Some(json!({ "siteCode": "901" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("unitNumber is required"));

    let (status, _) = send(&app, "GET", "/inspections?status=done", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/dashboard/summary?month=13", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_inspection_is_not_found() {
    let app = app();
    let (status, body) = send(&app, "GET", "/inspections/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Inspection not found: 999");
}

#[tokio::test]
async fn closed_inspection_rejects_writes_with_conflict() {
    let app = app();
    let so = create(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/inspections/{so}/responses"),
        Some(json!({
            "itemId": "K001",
            "response": "Def",
            "scopeOfWork": "Fix leak",
            "serviceId": "PLB",
            "activityCode": "A1",
            "urgent": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["response"], "Def");
    assert_eq!(body["urgent"], true);

    let (status, body) = send(&app, "POST", &format!("/inspections/{so}/submit"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Closed");

    let (status, _) = send(
        &app,
        "POST",
        &format!("/inspections/{so}/responses"),
        Some(json!({ "itemId": "K002", "response": "OK" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/inspections/{so}"),
        Some(json!({ "tenantName": "Late Edit" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&app, "GET", &format!("/inspections/{so}/responses"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn backwards_status_change_is_conflict() {
    let app = app();
    let so = create(&app).await;

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/inspections/{so}"),
        Some(json!({ "status": "InProgress" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/inspections/{so}"),
        Some(json!({ "status": "New" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn signature_round_trip() {
    let app = app();
    let so = create(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/inspections/{so}/signatures"),
        Some(json!({
            "signatureType": "inspector",
            "signedBy": "CASTOR_USER5",
            "signatureData": "data:image/png;base64,aGVsbG8="
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["signatureType"], "inspector");

    let (status, body) = send(
        &app,
        "GET",
        &format!("/inspections/{so}/signatures/inspector"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["signatureData"], "aGVsbG8=");
    assert_eq!(body["signedBy"], "CASTOR_USER5");

    let (status, _) = send(&app, "GET", &format!("/inspections/{so}/signatures/tenant"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", &format!("/inspections/{so}/signatures/witness"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn catalog_and_dashboard() {
    let app = app();
    create(&app).await;

    let (status, body) = send(&app, "GET", "/areas", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 8);
    assert_eq!(body[0]["areaName"], "Site and Building Exterior");

    let (status, body) = send(&app, "GET", "/pmi/categories/CAT002/items", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 4);

    let (status, body) = send(&app, "GET", "/dashboard/summary?area=SS", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sites"][0]["siteCode"], "901");
    assert_eq!(body["sites"][0]["totalCount"], 1);
    assert_eq!(body["totals"]["new"], 1);
}

#[tokio::test]
async fn extractor_failures_use_json_errors() {
    let app = app();
    let so = create(&app).await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/inspections/{so}"),
        Some(json!({ "status": "Bogus" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Bogus"));

    let (status, body) = send_raw(
        &app,
        "POST",
        &format!("/inspections/{so}/responses"),
        Some("{not json".to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(&app, "GET", "/dashboard/summary?year=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(&app, "GET", "/inspections?page=first", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send_raw(
        &app,
        "POST",
        &format!("/inspections/{so}/submit"),
        Some("closing now".to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn uploads_above_default_body_limit_are_accepted() {
    let app = app();
    let so = create(&app).await;
    let bytes = vec![0xAB_u8; 3 * 1024 * 1024];

    let (status, body) = send(
        &app,
        "POST",
        &format!("/inspections/{so}/images/upload"),
        Some(json!({
            "imageData": STANDARD.encode(&bytes),
            "mimeType": "image/jpeg",
            "caption": "Kitchen ceiling"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["fileSize"], 3 * 1024 * 1024);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/inspections/{so}/signatures/upload"),
        Some(json!({
            "signatureType": "tenant",
            "signedBy": "J. Doe",
            "signatureData": STANDARD.encode(&bytes)
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["signatureType"], "tenant");
}

#[tokio::test]
async fn uploads_over_attachment_limit_are_bad_requests() {
    let mut cfg = Config::with_database(":memory:");
    cfg.max_attachment_bytes = 1024 * 1024;
    let app = app_with(cfg);
    let so = create(&app).await;

    // fits the request body, fails the decoded size check
    let (status, body) = send(
        &app,
        "POST",
        &format!("/inspections/{so}/images"),
        Some(json!({
            "imageData": STANDARD.encode(vec![1_u8; 1024 * 1024 + 1]),
            "mimeType": "image/png"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("limit is 1048576"));

    // too large to buffer at all
    let (status, body) = send(
        &app,
        "POST",
        &format!("/inspections/{so}/images/upload"),
        Some(json!({
            "imageData": STANDARD.encode(vec![1_u8; 2 * 1024 * 1024]),
            "mimeType": "image/png"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (_, body) = send(&app, "GET", &format!("/inspections/{so}/images"), None).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn mobile_client_paths_are_served() {
    let app = app();
    let so = create(&app).await;

    let (status, body) = send(&app, "GET", "/inspections/areas", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 8);

    let (status, body) = send(&app, "GET", "/inspections/areas/items?areaName=Kitchen", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 8);
    assert_eq!(body[0]["itemId"], "K001");

    let (status, body) = send(&app, "GET", "/inspections/areas/items", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(
        &app,
        "POST",
        &format!("/pmi/inspections/{so}/responses"),
        Some(json!({ "itemId": "PMI001", "categoryId": "CAT001", "notes": "Filter replaced" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["itemId"], "PMI001");

    let (status, body) = send(&app, "GET", &format!("/pmi/inspections/{so}/responses"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/pmi/inspections/{so}/responses/PMI001"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/pmi/inspections/{so}/responses/PMI001"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
