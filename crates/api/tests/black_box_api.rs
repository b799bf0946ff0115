use std::collections::HashMap;

use chrono::{Duration as ChronoDuration, Utc};
use finapi_auth::JwtClaims;
use finapi_core::UserId;
use finapi_infra::config::AppConfig;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::{json, Value};

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory stores, cheap hashing, ephemeral port.
        let env: HashMap<&str, &str> = HashMap::from([
            ("JWT_SECRET", JWT_SECRET),
            ("ARGON2_MEMORY_KIB", "1024"),
            ("ARGON2_ITERATIONS", "1"),
        ]);
        let config = AppConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()))
            .expect("valid test config");
        let app = finapi_api::app::build_app(&config)
            .await
            .expect("failed to build app");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}/api/v1", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(jwt_secret: &str, sub: UserId) -> String {
    let now = Utc::now();
    let claims = JwtClaims {
        sub,
        issued_at: now,
        expires_at: now + ChronoDuration::minutes(10),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

async fn register(client: &reqwest::Client, srv: &TestServer, name: &str, email: &str) {
    let res = client
        .post(srv.url("/users"))
        .json(&json!({ "name": name, "email": email, "password": "user123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
}

/// Register and log in; returns (token, user id).
async fn login(client: &reqwest::Client, srv: &TestServer, email: &str) -> (String, String) {
    let res = client
        .post(srv.url("/sessions"))
        .json(&json!({ "email": email, "password": "user123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    (
        body["token"].as_str().unwrap().to_string(),
        body["user"]["id"].as_str().unwrap().to_string(),
    )
}

async fn post_statement(
    client: &reqwest::Client,
    srv: &TestServer,
    token: &str,
    path: &str,
    amount: f64,
) -> reqwest::Response {
    client
        .post(srv.url(path))
        .bearer_auth(token)
        .json(&json!({ "amount": amount, "description": "description" }))
        .send()
        .await
        .unwrap()
}

async fn balance(client: &reqwest::Client, srv: &TestServer, token: &str) -> Value {
    let res = client
        .get(srv.url("/statements/balance"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

#[tokio::test]
async fn health_is_outside_the_api_prefix() {
    let srv = TestServer::spawn().await;
    let root = srv.base_url.trim_end_matches("/api/v1");

    let res = reqwest::get(format!("{}/health", root)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for path in ["/profile", "/statements/balance"] {
        let res = client.get(srv.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"], "unauthorized");
    }

    let res = client
        .get(srv.url("/profile"))
        .bearer_auth(mint_jwt("another-secret", UserId::new()))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn registration_login_and_profile() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    register(&client, &srv, "test-user", "user@finapi.com.br").await;

    // Same email again.
    let res = client
        .post(srv.url("/users"))
        .json(&json!({ "name": "other", "email": "user@finapi.com.br", "password": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "User already exists");

    let (token, id) = login(&client, &srv, "user@finapi.com.br").await;

    let res = client.get(srv.url("/profile")).bearer_auth(&token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let profile: Value = res.json().await.unwrap();
    assert_eq!(profile["id"], id);
    assert_eq!(profile["name"], "test-user");
    assert_eq!(profile["email"], "user@finapi.com.br");
    assert!(profile.get("password").is_none());
    assert!(profile.get("password_hash").is_none());
}

#[tokio::test]
async fn wrong_password_and_unknown_email_are_unauthorized() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    register(&client, &srv, "test-user", "user@finapi.com.br").await;

    for (email, password) in [("user@finapi.com.br", "wrong"), ("nobody@finapi.com.br", "user123")] {
        let res = client
            .post(srv.url("/sessions"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["message"], "Incorrect email or password");
    }
}

#[tokio::test]
async fn deposit_then_withdraw_everything() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    register(&client, &srv, "test-user", "user@finapi.com.br").await;
    let (token, id) = login(&client, &srv, "user@finapi.com.br").await;

    let res = post_statement(&client, &srv, &token, "/statements/deposit", 100.0).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let deposit: Value = res.json().await.unwrap();
    assert_eq!(deposit["user_id"], id);
    assert_eq!(deposit["type"], "deposit");
    assert_eq!(deposit["amount"].as_f64(), Some(100.0));
    assert_eq!(deposit["description"], "description");

    let res = post_statement(&client, &srv, &token, "/statements/withdraw", 100.0).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let withdraw: Value = res.json().await.unwrap();
    assert_eq!(withdraw["type"], "withdraw");

    let report = balance(&client, &srv, &token).await;
    assert_eq!(report["balance"].as_f64(), Some(0.0));
    assert_eq!(report["statement"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn overdraft_is_rejected_and_balance_unchanged() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    register(&client, &srv, "test-user", "user@finapi.com.br").await;
    let (token, _) = login(&client, &srv, "user@finapi.com.br").await;

    post_statement(&client, &srv, &token, "/statements/deposit", 100.0).await;
    let res = post_statement(&client, &srv, &token, "/statements/withdraw", 300.0).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "insufficient_funds");

    let report = balance(&client, &srv, &token).await;
    assert_eq!(report["balance"].as_f64(), Some(100.0));
    assert_eq!(report["statement"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn transfer_moves_funds_between_users() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    register(&client, &srv, "test-user", "user@finapi.com.br").await;
    register(&client, &srv, "test-user2", "user2@finapi.com.br").await;
    let (sender_token, sender_id) = login(&client, &srv, "user@finapi.com.br").await;
    let (receiver_token, receiver_id) = login(&client, &srv, "user2@finapi.com.br").await;

    post_statement(&client, &srv, &sender_token, "/statements/deposit", 100.0).await;

    // More than the sender holds.
    let path = format!("/statements/transfers/{}", receiver_id);
    let res = post_statement(&client, &srv, &sender_token, &path, 300.0).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = post_statement(&client, &srv, &sender_token, &path, 100.0).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let transfer: Value = res.json().await.unwrap();
    assert_eq!(transfer["type"], "transfers");
    assert_eq!(transfer["user_id"], receiver_id);
    assert_eq!(transfer["sender_id"], sender_id);

    assert_eq!(balance(&client, &srv, &sender_token).await["balance"].as_f64(), Some(0.0));
    assert_eq!(balance(&client, &srv, &receiver_token).await["balance"].as_f64(), Some(100.0));

    // The receiver owns the transfer; the sender cannot look it up by id.
    let statement_path = format!("/statements/{}", transfer["id"].as_str().unwrap());
    let res = client.get(srv.url(&statement_path)).bearer_auth(&receiver_token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let res = client.get(srv.url(&statement_path)).bearer_auth(&sender_token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn transfer_to_unknown_or_self_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    register(&client, &srv, "test-user", "user@finapi.com.br").await;
    let (token, id) = login(&client, &srv, "user@finapi.com.br").await;
    post_statement(&client, &srv, &token, "/statements/deposit", 100.0).await;

    let path = format!("/statements/transfers/{}", UserId::new());
    let res = post_statement(&client, &srv, &token, &path, 10.0).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let path = format!("/statements/transfers/{}", id);
    let res = post_statement(&client, &srv, &token, &path, 10.0).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = post_statement(&client, &srv, &token, "/statements/transfers/not-a-uuid", 10.0).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn statement_lookup_by_owner() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    register(&client, &srv, "test-user", "user@finapi.com.br").await;
    register(&client, &srv, "test-user2", "user2@finapi.com.br").await;
    let (owner_token, _) = login(&client, &srv, "user@finapi.com.br").await;
    let (other_token, _) = login(&client, &srv, "user2@finapi.com.br").await;

    let res = post_statement(&client, &srv, &owner_token, "/statements/deposit", 42.5).await;
    let created: Value = res.json().await.unwrap();
    let path = format!("/statements/{}", created["id"].as_str().unwrap());

    let res = client.get(srv.url(&path)).bearer_auth(&owner_token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let found: Value = res.json().await.unwrap();
    assert_eq!(found, created);

    let res = client.get(srv.url(&path)).bearer_auth(&other_token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Statement not found");
}

#[tokio::test]
async fn invalid_amounts_are_bad_requests() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    register(&client, &srv, "test-user", "user@finapi.com.br").await;
    let (token, _) = login(&client, &srv, "user@finapi.com.br").await;

    for amount in [0.0, -5.0] {
        let res = post_statement(&client, &srv, &token, "/statements/deposit", amount).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    let res = client
        .post(srv.url("/statements/deposit"))
        .bearer_auth(&token)
        .json(&json!({ "description": "no amount" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn valid_token_for_unknown_user_is_not_found() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = mint_jwt(JWT_SECRET, UserId::new());

    let res = client.get(srv.url("/profile")).bearer_auth(&token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(srv.url("/statements/balance"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = post_statement(&client, &srv, &token, "/statements/deposit", 10.0).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn deposits_near_the_balance_limit_keep_the_account_usable() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    register(&client, &srv, "test-user", "user@finapi.com.br").await;
    let (token, _) = login(&client, &srv, "user@finapi.com.br").await;

    let res = post_statement(&client, &srv, &token, "/statements/deposit", 7e28).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    // A second one would push the balance out of range.
    let res = post_statement(&client, &srv, &token, "/statements/deposit", 7e28).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");

    let report = balance(&client, &srv, &token).await;
    assert_eq!(report["statement"].as_array().unwrap().len(), 1);

    let res = post_statement(&client, &srv, &token, "/statements/withdraw", 1.0).await;
    assert_eq!(res.status(), StatusCode::CREATED);
}
