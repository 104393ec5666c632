//! Full TCP round trip through the hyper accept loop

use clap::Parser;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

use legacy_vault::auth::TokenInput;
use legacy_vault::db::MemoryStore;
use legacy_vault::{serve, AppState, Args};

async fn start() -> (String, Arc<AppState>) {
    let args = Args::try_parse_from(["legacy-vault", "--dev-mode"]).unwrap();
    let state = Arc::new(AppState::new(args, Arc::new(MemoryStore::new())).unwrap());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(serve(listener, Arc::clone(&state)));
    (base, state)
}

fn token(state: &AppState, user_id: &str) -> String {
    state
        .jwt
        .generate_token(TokenInput {
            user_id: user_id.into(),
            email: format!("{}@example.com", user_id),
        })
        .unwrap()
}

#[tokio::test]
async fn pdf_download_over_tcp() {
    let (base, state) = start().await;
    let client = reqwest::Client::new();
    let auth = format!("Bearer {}", token(&state, "alice"));

    let created: Value = client
        .post(format!("{}/wills", base))
        .header("Authorization", &auth)
        .json(&json!({
            "executor": "Jane Doe",
            "assets": [{"name": "Family home", "type": "property", "value": 5000000}]
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let response = client
        .get(format!("{}/wills/{}/pdf", base, id))
        .header("Authorization", &auth)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let headers = response.headers().clone();
    assert_eq!(headers["content-type"], "application/pdf");
    assert_eq!(
        headers["content-disposition"],
        format!("attachment; filename=will_{}.pdf", id).as_str()
    );
    assert_eq!(headers["cache-control"], "no-store");

    let bytes = response.bytes().await.unwrap();
    let length: usize = headers["content-length"].to_str().unwrap().parse().unwrap();
    assert_eq!(bytes.len(), length);
    assert!(bytes.starts_with(b"%PDF-"));
    assert!(bytes
        .windows("Value: KES 5,000,000".len())
        .any(|w| w == b"Value: KES 5,000,000"));
}

#[tokio::test]
async fn unauthenticated_over_tcp() {
    let (base, _state) = start().await;
    let response = reqwest::get(format!("{}/memorials", base)).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
}
