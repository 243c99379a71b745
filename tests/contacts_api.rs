use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use contacts_api::{app, AppState, ContactService, MemoryContactStore, BODY_LIMIT_BYTES};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn test_app() -> (Arc<MemoryContactStore>, Router) {
    let store = Arc::new(MemoryContactStore::new());
    let state = AppState::new(ContactService::new(store.clone()));
    (store, app(state))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(b) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn ken() -> Value {
    json!({"firstName": "Ken", "lastName": "Mbuyi", "email": "ken.m@example.com"})
}

async fn create_ken(app: &Router) -> String {
    let (status, body) = send(app, Method::POST, "/contacts", Some(ken())).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn full_lifecycle() {
    let (_, app) = test_app();

    let mut payload = ken();
    payload["birthday"] = json!("1998-09-10");
    let (status, created) = send(&app, Method::POST, "/contacts", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 24);
    assert_eq!(created["firstName"], "Ken");
    assert_eq!(created["birthday"], "1998-09-10");

    let (status, fetched) = send(&app, Method::GET, &format!("/contacts/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/contacts/{id}"),
        Some(json!({"favoriteColor": "Teal"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["favoriteColor"], "Teal");
    assert_eq!(updated["firstName"], "Ken");
    assert_eq!(updated["lastName"], "Mbuyi");
    assert_eq!(updated["email"], "ken.m@example.com");
    assert_eq!(updated["birthday"], "1998-09-10");

    let (status, receipt) = send(&app, Method::DELETE, &format!("/contacts/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        receipt,
        json!({"message": "Contact deleted successfully", "deletedCount": 1})
    );

    let (status, body) = send(&app, Method::GET, &format!("/contacts/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Contact not found"}));
}

#[tokio::test]
async fn blank_favorite_color_is_dropped_on_create_and_rejected_on_update() {
    let (_, app) = test_app();

    let mut payload = ken();
    payload["favoriteColor"] = json!("   ");
    let (status, created) = send(&app, Method::POST, "/contacts", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created.get("favoriteColor").is_none());
    let id = created["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/contacts/{id}"),
        Some(json!({"favoriteColor": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "favoriteColor");
    assert_eq!(body["errors"][0]["message"], "Favorite color cannot be empty");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/contacts/{id}"),
        Some(json!({"favoriteColor": 7})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["message"], "Favorite color must be text");
}

#[tokio::test]
async fn invalid_ids_are_rejected_without_touching_the_store() {
    let (store, app) = test_app();

    let (status, body) = send(&app, Method::GET, "/contacts/not-a-valid-id", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid ID format"}));

    let (status, body) = send(
        &app,
        Method::PUT,
        "/contacts/not-a-valid-id",
        Some(json!({"favoriteColor": "Teal"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid ID format"}));

    let (status, body) = send(&app, Method::DELETE, "/contacts/not-a-valid-id", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid ID format"}));

    assert_eq!(store.round_trips(), 0);
}

#[tokio::test]
async fn malformed_create_persists_nothing() {
    let (_, app) = test_app();
    create_ken(&app).await;

    let bad_payloads = [
        json!({"lastName": "Mbuyi", "email": "ken.m@example.com"}),
        json!({"firstName": "Ken", "email": "ken.m@example.com"}),
        json!({"firstName": "Ken", "lastName": "Mbuyi"}),
        json!({"firstName": "Ken", "lastName": "Mbuyi", "email": "not-an-email"}),
        json!({"firstName": "Ken", "lastName": "Mbuyi", "email": "ken.m@example.com", "birthday": "1998-02-30"}),
    ];
    for payload in bad_payloads {
        let (status, body) = send(&app, Method::POST, "/contacts", Some(payload.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {payload}");
        let errors = body["errors"].as_array().unwrap();
        assert!(!errors.is_empty());
        assert!(errors[0]["field"].is_string());
        assert!(errors[0]["message"].is_string());
    }

    let (status, list) = send(&app, Method::GET, "/contacts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn empty_update_is_a_validation_error_even_for_bad_ids() {
    let (_, app) = test_app();
    let id = create_ken(&app).await;

    for uri in [format!("/contacts/{id}"), "/contacts/not-a-valid-id".to_string()] {
        let (status, body) = send(&app, Method::PUT, &uri, Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"errors": [{"field": "body", "message": "At least one field must be provided for update"}]})
        );
    }
}

#[tokio::test]
async fn update_reports_field_violations_and_leaves_contact_alone() {
    let (_, app) = test_app();
    let id = create_ken(&app).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/contacts/{id}"),
        Some(json!({"firstName": "   ", "favoriteColor": "Teal"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "firstName");
    assert_eq!(body["errors"][0]["message"], "First name cannot be empty");

    let (_, fetched) = send(&app, Method::GET, &format!("/contacts/{id}"), None).await;
    assert_eq!(fetched["firstName"], "Ken");
    assert!(fetched.get("favoriteColor").is_none());
}

#[tokio::test]
async fn missing_contacts_are_not_found() {
    let (_, app) = test_app();
    let id = "686ec65ce7b6f972022c8c91";

    let (status, _) = send(&app, Method::GET, &format!("/contacts/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/contacts/{id}"),
        Some(json!({"lastName": "Mbuyi"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Contact not found"}));

    let (status, _) = send(&app, Method::DELETE, &format!("/contacts/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_normalizes_email_and_keeps_optional_fields() {
    let (_, app) = test_app();
    let (status, created) = send(
        &app,
        Method::POST,
        "/contacts",
        Some(json!({
            "firstName": " Ken ",
            "lastName": "Mbuyi",
            "email": "Ken.M@Example.com",
            "favoriteColor": "Teal",
            "birthday": "1998-09-10",
            "role": "admin"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["firstName"], "Ken");
    assert_eq!(created["email"], "ken.m@example.com");
    assert_eq!(created["birthday"], "1998-09-10");
    assert!(created.get("role").is_none());
}

#[tokio::test]
async fn store_failures_become_generic_server_errors() {
    let (store, app) = test_app();
    let id = create_ken(&app).await;
    store.set_unavailable(true);

    let (status, body) = send(&app, Method::GET, "/contacts", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Server error"}));

    let (status, body) = send(&app, Method::POST, "/contacts", Some(ken())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Server error"}));

    let (status, _) = send(&app, Method::DELETE, &format!("/contacts/{id}"), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn unreadable_bodies_are_validation_errors() {
    let (_, app) = test_app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/contacts")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::POST, "/contacts", Some(json!(["Ken"]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "body");
}

#[tokio::test]
async fn oversized_bodies_are_refused() {
    let (_, app) = test_app();
    let payload = "x".repeat(BODY_LIMIT_BYTES + 1);
    let request = Request::builder()
        .method(Method::POST)
        .uri("/contacts")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, payload.len())
        .body(Body::from(payload))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn health_and_readiness() {
    let (store, app) = test_app();

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    let ts = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok());

    let (status, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "ok");

    store.set_unavailable(true);
    let (status, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");

    // Liveness does not depend on the store.
    let (status, _) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn banner_and_version() {
    let (_, app) = test_app();
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"Contacts API is running!");

    let (status, body) = send(&app, Method::GET, "/version", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "contacts-api");
}
