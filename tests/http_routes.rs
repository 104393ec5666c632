//! Router-level tests driven in-process with `Full<Bytes>` request bodies

use bytes::Bytes;
use clap::Parser;
use http_body_util::{BodyExt, Full};
use hyper::header::{self, HeaderValue};
use hyper::{Method, Request, Response, StatusCode};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_test::assert_ok;

use legacy_vault::auth::TokenInput;
use legacy_vault::db::MemoryStore;
use legacy_vault::routes::BoxBody;
use legacy_vault::server::handle_request;
use legacy_vault::{AppState, Args};

struct Harness {
    state: Arc<AppState>,
}

impl Harness {
    fn new() -> Self {
        let args = Args::try_parse_from(["legacy-vault", "--dev-mode", "--max-body-bytes", "4096"])
            .unwrap();
        let state = AppState::new(args, Arc::new(MemoryStore::new())).unwrap();
        Self {
            state: Arc::new(state),
        }
    }

    fn token(&self, user_id: &str) -> String {
        self.state
            .jwt
            .generate_token(TokenInput {
                user_id: user_id.into(),
                email: format!("{}@example.com", user_id),
            })
            .unwrap()
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        user: Option<&str>,
        body: Option<Value>,
    ) -> Response<BoxBody> {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(user) = user {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token(user)));
        }
        let body = match body {
            Some(json) => Full::new(Bytes::from(json.to_string())),
            None => Full::new(Bytes::new()),
        };
        let request = builder.body(body).unwrap();
        let addr: SocketAddr = "127.0.0.1:9".parse().unwrap();
        handle_request(Arc::clone(&self.state), addr, request)
            .await
            .unwrap()
    }

    async fn json(
        &self,
        method: Method,
        path: &str,
        user: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.send(method, path, user, body).await;
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn create_scenario_will(&self, user: &str) -> String {
        let (status, body) = self
            .json(
                Method::POST,
                "/wills",
                Some(user),
                Some(json!({
                    "title": "Last Will and Testament",
                    "executor": "Jane Doe",
                    "beneficiaries": [{
                        "name": "Alice",
                        "email": "alice@example.com",
                        "phone": "0700000000",
                        "relationship": "Daughter",
                        "address": "Nairobi",
                        "percentage": 100
                    }],
                    "witnesses": [
                        {"name": "Bob Witness", "idNumber": "11111111", "phone": "0711"},
                        {"name": "Carol Witness", "idNumber": "22222222", "phone": "0722"}
                    ]
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"]["id"].as_str().unwrap().to_string()
    }
}

fn contains(haystack: &[u8], needle: &str) -> bool {
    haystack
        .windows(needle.len())
        .any(|w| w == needle.as_bytes())
}

fn count(haystack: &[u8], needle: &str) -> usize {
    haystack
        .windows(needle.len())
        .filter(|w| *w == needle.as_bytes())
        .count()
}

async fn body_bytes(response: Response<BoxBody>) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

#[tokio::test]
async fn health_is_public() {
    let harness = Harness::new();
    let (status, body) = harness.json(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["storage"], "memory");

    let (status, _) = harness.json(Method::GET, "/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let harness = Harness::new();
    for path in ["/wills", "/wills/abc", "/wills/abc/pdf", "/memorials/abc/pdf"] {
        let (status, body) = harness.json(Method::GET, path, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", path);
        assert_eq!(body["success"], false);
        assert!(body["message"].is_string());
    }
}

#[tokio::test]
async fn invalid_token_is_unauthorized() {
    let harness = Harness::new();
    let request = Request::builder()
        .uri("/wills")
        .header(header::AUTHORIZATION, HeaderValue::from_static("Bearer not-a-jwt"))
        .body(Full::new(Bytes::new()))
        .unwrap();
    let addr: SocketAddr = "127.0.0.1:9".parse().unwrap();
    let response = handle_request(Arc::clone(&harness.state), addr, request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_route_and_preflight() {
    let harness = Harness::new();
    let (status, body) = harness.json(Method::GET, "/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let response = harness.send(Method::OPTIONS, "/wills", None, None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (status, _) = harness.json(Method::PATCH, "/wills/abc", Some("alice"), None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn will_crud_round_trip() {
    let harness = Harness::new();
    let id = harness.create_scenario_will("alice").await;

    let (status, body) = harness.json(Method::GET, "/wills", Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = harness
        .json(
            Method::PUT,
            &format!("/wills/{}", id),
            Some("alice"),
            Some(json!({"status": "completed"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "completed");
    assert_eq!(body["data"]["executor"], "Jane Doe");
    assert_eq!(body["data"]["witnesses"].as_array().unwrap().len(), 2);

    let (status, body) = harness
        .json(Method::DELETE, &format!("/wills/{}", id), Some("alice"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = harness
        .json(Method::GET, &format!("/wills/{}", id), Some("alice"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_applies_defaults() {
    let harness = Harness::new();
    let (status, body) = harness
        .json(Method::POST, "/wills", Some("alice"), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["title"], "Last Will and Testament");
    assert_eq!(body["data"]["executor"], "Not specified");
    assert_eq!(body["data"]["status"], "draft");
}

#[tokio::test]
async fn invalid_input_is_rejected() {
    let harness = Harness::new();

    let (status, body) = harness
        .json(
            Method::POST,
            "/wills",
            Some("alice"),
            Some(json!({"beneficiaries": [{"name": "Alice", "percentage": 150}]})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = harness
        .json(
            Method::POST,
            "/wills",
            Some("alice"),
            Some(json!({"assets": [{"name": "Car", "type": "spaceship", "value": 1}]})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = harness
        .json(
            Method::POST,
            "/memorials",
            Some("alice"),
            Some(json!({"title": "In Memory", "name": "  "})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let oversized = json!({"title": "x".repeat(8192)});
    let (status, _) = harness
        .json(Method::POST, "/wills", Some("alice"), Some(oversized))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unbalanced_percentages_and_single_witness_are_accepted() {
    let harness = Harness::new();
    let (status, _) = harness
        .json(
            Method::POST,
            "/wills",
            Some("alice"),
            Some(json!({
                "beneficiaries": [
                    {"name": "A", "relationship": "Son", "percentage": 30},
                    {"name": "B", "relationship": "Son", "percentage": 30}
                ],
                "witnesses": [{"name": "Only One", "idNumber": "1", "phone": ""}]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn other_owner_gets_not_found() {
    let harness = Harness::new();
    let id = harness.create_scenario_will("alice").await;

    for path in [format!("/wills/{}", id), format!("/wills/{}/pdf", id)] {
        let (status, body) = harness.json(Method::GET, &path, Some("mallory"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", path);
        assert_eq!(body["message"], "Will not found");
    }

    let (_, missing) = harness
        .json(Method::GET, "/wills/does-not-exist/pdf", Some("mallory"), None)
        .await;
    assert_eq!(missing["message"], "Will not found");

    let (status, _) = harness
        .json(Method::DELETE, &format!("/wills/{}", id), Some("mallory"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = harness.json(Method::GET, "/wills", Some("mallory"), None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn will_pdf_end_to_end() {
    let harness = Harness::new();
    let id = harness.create_scenario_will("alice").await;

    let response = harness
        .send(Method::GET, &format!("/wills/{}/pdf", id), Some("alice"), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        format!("attachment; filename=will_{}.pdf", id).as_str()
    );

    let pdf = body_bytes(response).await;
    assert!(pdf.starts_with(b"%PDF-"));
    assert!(contains(&pdf, "%%EOF"));
    assert!(contains(&pdf, "LAST WILL AND TESTAMENT"));
    assert!(contains(&pdf, "Title: Last Will and Testament"));
    assert!(contains(&pdf, "Executor: Jane Doe"));

    assert!(contains(&pdf, "Beneficiaries"));
    assert!(contains(&pdf, "1. Alice"));
    assert!(!contains(&pdf, "2. Alice"));

    assert!(!contains(&pdf, "Assets"));
    assert!(!contains(&pdf, "Value: KES"));

    assert!(contains(&pdf, "Witnesses"));
    assert!(contains(&pdf, "1. Bob Witness"));
    assert!(contains(&pdf, "2. Carol Witness"));
    assert_eq!(count(&pdf, "ID Number: "), 2);
}

#[tokio::test]
async fn will_pdf_is_repeatable() {
    let harness = Harness::new();
    let id = harness.create_scenario_will("alice").await;
    let path = format!("/wills/{}/pdf", id);

    let day = chrono::Utc::now().date_naive();
    let first = body_bytes(harness.send(Method::GET, &path, Some("alice"), None).await).await;
    let second = body_bytes(harness.send(Method::GET, &path, Some("alice"), None).await).await;

    // The generated-on line is the only input that changes between calls
    if chrono::Utc::now().date_naive() == day {
        assert_eq!(first, second);
    }
}

#[tokio::test]
async fn memorial_pdf_filename_is_sanitized() {
    let harness = Harness::new();
    let (status, body) = harness
        .json(
            Method::POST,
            "/memorials",
            Some("alice"),
            Some(json!({
                "title": "In Loving Memory",
                "name": "John O'Brien / Jr.",
                "deathDate": "2020-03-12",
                "biography": "He loved the sea."
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let response = harness
        .send(Method::GET, &format!("/memorials/{}/pdf", id), Some("alice"), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=memorial_John_O_Brien___Jr_.pdf"
    );

    let pdf = body_bytes(response).await;
    assert!(contains(&pdf, "In Loving Memory"));
    assert!(contains(&pdf, "Biography"));
    assert!(contains(&pdf, "He loved the sea."));
}

#[tokio::test]
async fn memorial_update_replaces_all_fields() {
    let harness = Harness::new();
    let (_, created) = harness
        .json(
            Method::POST,
            "/memorials",
            Some("alice"),
            Some(json!({
                "title": "In Loving Memory",
                "name": "Grace",
                "birth_date": "1940-01-05",
                "biography": "Schoolteacher"
            })),
        )
        .await;
    assert_eq!(created["data"]["birthDate"], "1940-01-05");
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, updated) = harness
        .json(
            Method::PUT,
            &format!("/memorials/{}", id),
            Some("alice"),
            Some(json!({"title": "Remembering", "name": "Grace W."})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["name"], "Grace W.");
    assert!(updated["data"]["birthDate"].is_null());
    assert!(updated["data"]["biography"].is_null());
}

#[tokio::test]
async fn store_errors_surface_as_envelopes() {
    let harness = Harness::new();
    let response = harness
        .send(Method::GET, "/memorials/missing", Some("alice"), None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = assert_ok!(serde_json::from_slice(&body_bytes(response).await));
    assert_eq!(body, json!({"success": false, "message": "Memorial not found"}));
}
