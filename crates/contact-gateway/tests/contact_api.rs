use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use contact_core::{Contact, Phone};
use contact_gateway::model::{ContactStatusResponse, SaveContactResponse};
use contact_gateway::App;
use contact_storage::InMemoryRepository;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    App::router(Arc::new(InMemoryRepository::new()), false)
}

fn raw_request(method: Method, uri: &str, content_type: Option<&str>, body: String) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder.body(Body::from(body)).unwrap()
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn send<T: DeserializeOwned>(app: &Router, request: Request<Body>) -> (StatusCode, T) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn alice() -> Value {
    json!({
        "username": "alice",
        "email": "alice@example.com",
        "telephone": { "mobile": "555-0100", "home": "555-0101" }
    })
}

#[tokio::test]
async fn create_fetch_delete_lifecycle() {
    let app = app();

    let (status, saved): (_, SaveContactResponse) =
        send(&app, json_request(Method::POST, "/v1/contact", alice())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved.msg, "successful save contact");
    assert_eq!(saved.id.len(), 24);

    let uri = format!("/v1/contact/{}", saved.id);
    let (status, fetched): (_, Contact) = send(&app, empty_request(Method::GET, &uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        fetched,
        Contact {
            id: saved.id.clone(),
            user_name: "alice".to_string(),
            email: "alice@example.com".to_string(),
            telephone: Phone {
                mobile: "555-0100".to_string(),
                home: "555-0101".to_string(),
            },
        }
    );

    let (status, deleted): (_, ContactStatusResponse) =
        send(&app, empty_request(Method::DELETE, &uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(deleted.ok);
    assert_eq!(
        deleted.msg,
        format!("complete deleting item with id: {}", saved.id)
    );

    let (status, body): (_, Value) = send(&app, empty_request(Method::DELETE, &uri)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["slug"], "contact not found");

    let (status, body): (_, Value) = send(&app, empty_request(Method::GET, &uri)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["slug"], "contact not found");
}

#[tokio::test]
async fn malformed_id_is_not_found() {
    let app = app();

    let (status, body): (_, Value) =
        send(&app, empty_request(Method::GET, "/v1/contact/not-a-valid-id")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["slug"], "contact not found");
}

#[tokio::test]
async fn list_then_delete_all() {
    let app = app();

    let (status, contacts): (_, Vec<Contact>) =
        send(&app, empty_request(Method::GET, "/v1/contact")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(contacts.is_empty());

    for name in ["alice", "bob"] {
        let mut body = alice();
        body["username"] = json!(name);
        let (status, _): (_, SaveContactResponse) =
            send(&app, json_request(Method::POST, "/v1/contact", body)).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, contacts): (_, Vec<Contact>) =
        send(&app, empty_request(Method::GET, "/v1/contact")).await;
    let mut names: Vec<_> = contacts.into_iter().map(|c| c.user_name).collect();
    names.sort();
    assert_eq!(names, ["alice", "bob"]);

    let (status, message): (_, String) =
        send(&app, empty_request(Method::DELETE, "/v1/contact")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(message, "deleting 2 records complete successfully");

    let (_, contacts): (_, Vec<Contact>) =
        send(&app, empty_request(Method::GET, "/v1/contact")).await;
    assert!(contacts.is_empty());
}

#[tokio::test]
async fn update_replaces_contact_under_path_id() {
    let app = app();
    let (_, saved): (_, SaveContactResponse) =
        send(&app, json_request(Method::POST, "/v1/contact", alice())).await;
    let uri = format!("/v1/contact/{}", saved.id);

    let replacement = json!({
        "_id": "ffffffffffffffffffffffff",
        "username": "alice2",
        "email": "alice2@example.com",
        "telephone": { "mobile": "555-0199" }
    });
    let (status, updated): (_, ContactStatusResponse) =
        send(&app, json_request(Method::PUT, &uri, replacement)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(updated.ok);
    assert_eq!(
        updated.msg,
        format!("successful update item with id: {}", saved.id)
    );

    let (_, fetched): (_, Contact) = send(&app, empty_request(Method::GET, &uri)).await;
    assert_eq!(fetched.id, saved.id);
    assert_eq!(fetched.user_name, "alice2");
    assert_eq!(fetched.telephone.home, "");
}

#[tokio::test]
async fn update_unknown_contact_is_not_found() {
    let app = app();

    let (status, body): (_, Value) = send(
        &app,
        json_request(Method::PUT, "/v1/contact/65f1c0ffee0000000000abcd", alice()),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["slug"], "contact not found");
}

#[tokio::test]
async fn update_with_undecodable_body_is_internal() {
    let app = app();
    let request = Request::builder()
        .method(Method::PUT)
        .uri("/v1/contact/65f1c0ffee0000000000abcd")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"username\": 42"))
        .unwrap();

    let (status, body): (_, Value) = send(&app, request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["slug"], "error parsing request body");
}

#[tokio::test]
async fn save_with_malformed_json_is_bad_request() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/contact")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body): (_, Value) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["slug"], "request error");

    let (_, contacts): (_, Vec<Contact>) =
        send(&app, empty_request(Method::GET, "/v1/contact")).await;
    assert!(contacts.is_empty());
}

#[tokio::test]
async fn save_accepts_json_body_without_json_content_type() {
    let app = app();

    for content_type in [None, Some("application/x-www-form-urlencoded"), Some("text/plain")] {
        let request = raw_request(Method::POST, "/v1/contact", content_type, alice().to_string());
        let (status, saved): (_, SaveContactResponse) = send(&app, request).await;

        assert_eq!(status, StatusCode::OK, "content type {content_type:?}");
        assert_eq!(saved.msg, "successful save contact");
    }

    let (_, contacts): (_, Vec<Contact>) =
        send(&app, empty_request(Method::GET, "/v1/contact")).await;
    assert_eq!(contacts.len(), 3);
}

#[tokio::test]
async fn update_accepts_json_body_without_content_type() {
    let app = app();
    let (_, saved): (_, SaveContactResponse) =
        send(&app, json_request(Method::POST, "/v1/contact", alice())).await;
    let uri = format!("/v1/contact/{}", saved.id);

    let mut replacement = alice();
    replacement["username"] = json!("carol");
    let (status, updated): (_, ContactStatusResponse) = send(
        &app,
        raw_request(Method::PUT, &uri, None, replacement.to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(updated.ok);

    let (_, fetched): (_, Contact) = send(&app, empty_request(Method::GET, &uri)).await;
    assert_eq!(fetched.user_name, "carol");
}

#[tokio::test]
async fn error_detail_follows_router_setting() {
    let quiet = App::router(Arc::new(InMemoryRepository::new()), false);
    let verbose = App::router(Arc::new(InMemoryRepository::new()), true);
    let uri = "/v1/contact/not-a-valid-id";

    let (status, body): (_, Value) = send(&quiet, empty_request(Method::GET, uri)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "slug": "contact not found" }));

    let (status, body): (_, Value) = send(&verbose, empty_request(Method::GET, uri)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["slug"], "contact not found");
    assert!(body["error"].as_str().unwrap().contains("not-a-valid-id"));
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, body): (_, Value) = send(&app(), empty_request(Method::GET, "/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn cors_preflight_is_answered() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/v1/contact")
        .header(header::ORIGIN, "https://contacts.example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    let headers = response.headers();

    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://contacts.example.com"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "300");
}
