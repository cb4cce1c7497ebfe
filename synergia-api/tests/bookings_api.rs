use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use synergia_api::{app, AppState};
use synergia_core::BookingId;
use synergia_store::{MemoryBookingRepository, OfflineBookingRepository};
use tower::ServiceExt;

fn test_app() -> Router {
    app(AppState::new(Arc::new(MemoryBookingRepository::new())))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn create(app: &Router, body: Value) -> Value {
    let (status, body) = send(app, Method::POST, "/api/bookings", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"].clone()
}

async fn count(app: &Router) -> usize {
    let (status, body) = send(app, Method::GET, "/api/bookings", None).await;
    assert_eq!(status, StatusCode::OK);
    body["data"].as_array().unwrap().len()
}

fn alice() -> Value {
    json!({
        "name": "Alice",
        "email": "Alice@Example.com",
        "event": "TechConf2024",
        "ticketType": "Standard"
    })
}

#[tokio::test]
async fn test_create_then_get() {
    let app = test_app();
    let (status, body) = send(&app, Method::POST, "/api/bookings", Some(alice())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Booking created successfully");

    let created = &body["data"];
    let id = created["id"].as_str().unwrap();
    assert!(!id.is_empty());
    assert_eq!(created["name"], "Alice");
    assert_eq!(created["email"], "Alice@Example.com");
    assert_eq!(created["event"], "TechConf2024");
    assert_eq!(created["ticketType"], "Standard");
    assert!(created["createdAt"].is_string());

    let (status, body) = send(&app, Method::GET, &format!("/api/bookings/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(&body["data"], created);
}

#[tokio::test]
async fn test_create_without_ticket_type_omits_it() {
    let app = test_app();
    let created = create(
        &app,
        json!({ "name": "Bob", "email": "bob@example.com", "event": "RustFest" }),
    )
    .await;

    assert!(created.get("ticketType").is_none());
}

#[tokio::test]
async fn test_identical_creates_make_distinct_records() {
    let app = test_app();
    let a = create(&app, alice()).await;
    let b = create(&app, alice()).await;

    assert_ne!(a["id"], b["id"]);
    assert_eq!(count(&app).await, 2);
}

#[tokio::test]
async fn test_create_missing_required_fields() {
    let app = test_app();
    create(&app, alice()).await;

    let bodies = [
        json!({ "email": "a@b.c", "event": "Conf" }),
        json!({ "name": "A", "event": "Conf" }),
        json!({ "name": "A", "email": "a@b.c" }),
        json!({ "name": "", "email": "a@b.c", "event": "Conf" }),
        json!({ "ticketType": "VIP" }),
        json!({}),
    ];
    for body in bodies {
        let (status, response) = send(&app, Method::POST, "/api/bookings", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["success"], false);
        assert_eq!(response["message"], "Please provide name, email, and event details");
    }

    assert_eq!(count(&app).await, 1);
}

#[tokio::test]
async fn test_create_without_json_body() {
    let app = test_app();
    let (status, body) = send(&app, Method::POST, "/api/bookings", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(count(&app).await, 0);
}

#[tokio::test]
async fn test_list_bookings() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/api/bookings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "All event bookings retrieved successfully");
    assert_eq!(body["data"], json!([]));

    let first = create(&app, alice()).await;
    let second = create(&app, json!({ "name": "Bob", "email": "bob@example.com", "event": "RustFest" })).await;

    let (_, body) = send(&app, Method::GET, "/api/bookings", None).await;
    assert_eq!(body["data"], json!([first, second]));
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let app = test_app();
    let uri = format!("/api/bookings/{}", BookingId::new());

    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Booking not found");

    let (status, _) = send(&app, Method::PUT, &uri, Some(json!({ "ticketType": "VIP" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_id_is_storage_error() {
    let app = test_app();

    let (status, body) = send(&app, Method::GET, "/api/bookings/not-an-id", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Error retrieving booking");
    assert!(body["error"].as_str().unwrap().contains("not-an-id"));

    let (status, body) = send(&app, Method::DELETE, "/api/bookings/not-an-id", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Error deleting booking");
}

#[tokio::test]
async fn test_update_merges_supplied_fields() {
    let app = test_app();
    let created = create(&app, alice()).await;
    let uri = format!("/api/bookings/{}", created["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "ticketType": "VIP" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Booking updated successfully");

    let updated = &body["data"];
    assert_eq!(updated["ticketType"], "VIP");
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["name"], created["name"]);
    assert_eq!(updated["email"], created["email"]);
    assert_eq!(updated["event"], created["event"]);
    assert_eq!(updated["createdAt"], created["createdAt"]);

    let (_, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(&body["data"], updated);
}

#[tokio::test]
async fn test_update_does_not_revalidate() {
    let app = test_app();
    let created = create(&app, alice()).await;
    let uri = format!("/api/bookings/{}", created["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "name": "", "ticketType": null }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "");
    assert!(body["data"].get("ticketType").is_none());
}

#[tokio::test]
async fn test_delete_then_get() {
    let app = test_app();
    let created = create(&app, alice()).await;
    let uri = format!("/api/bookings/{}", created["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Booking deleted successfully");
    assert!(body.get("data").is_none());

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_by_email() {
    let app = test_app();
    create(&app, alice()).await;
    create(&app, json!({ "name": "Bob", "email": "bob@example.com", "event": "RustFest" })).await;

    let (status, body) = send(&app, Method::GET, "/api/bookings/search?email=alice", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["email"], "Alice@Example.com");

    let (status, body) = send(&app, Method::GET, "/api/bookings/search?email=carol", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No bookings found for this email");
}

#[tokio::test]
async fn test_filter_by_event() {
    let app = test_app();
    create(&app, alice()).await;

    let (status, body) = send(&app, Method::GET, "/api/bookings/filter?event=Conf", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["event"], "TechConf2024");

    let (status, body) = send(&app, Method::GET, "/api/bookings/filter?event=Meetup", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No bookings found for this event");
}

#[tokio::test]
async fn test_missing_query_parameters() {
    let app = test_app();
    create(&app, alice()).await;

    let (status, body) = send(&app, Method::GET, "/api/bookings/search", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email query parameter required");

    let (status, _) = send(&app, Method::GET, "/api/bookings/search?email=", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::GET, "/api/bookings/filter", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Event query parameter required");
}

#[tokio::test]
async fn test_offline_store_reports_storage_errors() {
    let app = app(AppState::new(Arc::new(OfflineBookingRepository::new("connection refused"))));

    let (status, body) = send(&app, Method::GET, "/api/bookings", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Error retrieving bookings");
    assert!(body["error"].as_str().unwrap().contains("connection refused"));

    let (status, body) = send(&app, Method::POST, "/api/bookings", Some(alice())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Error creating booking");

    let (status, body) = send(&app, Method::GET, "/api/bookings/search?email=alice", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Error searching bookings");

    let (status, body) = send(&app, Method::GET, "/api/bookings/filter?event=Conf", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Error filtering bookings");
}

#[tokio::test]
async fn test_update_without_body_leaves_booking_unchanged() {
    let app = test_app();
    let created = create(&app, alice()).await;
    let uri = format!("/api/bookings/{}", created["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::PUT, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Booking updated successfully");
    assert_eq!(body["data"], created);
}

#[tokio::test]
async fn test_update_with_mistyped_field_is_cast_error() {
    let app = test_app();
    let created = create(&app, alice()).await;
    let uri = format!("/api/bookings/{}", created["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "createdAt": "garbage" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Error updating booking");
    assert!(body["error"].is_string());

    let (_, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(body["data"], created);
}

#[tokio::test]
async fn test_update_with_malformed_json_is_bad_request() {
    let app = test_app();
    let created = create(&app, alice()).await;
    let uri = format!("/api/bookings/{}", created["id"].as_str().unwrap());

    let request = Request::builder()
        .method(Method::PUT)
        .uri(&uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"ticketType\":"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
