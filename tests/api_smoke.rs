use fanzone_api::{
    app,
    config::Config,
    service::config::ConfigServiceImpl,
    state::AppState,
};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Deserialize)]
struct AccountResponse {
    id: String,
    username: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    code: String,
    field: Option<String>,
}

struct TestServer {
    base_url: String,
    client: reqwest::Client,
}

impl TestServer {
    async fn start() -> Self {
        let config = ConfigServiceImpl::from_config(Config {
            database_url: Some("sqlite::memory:".to_string()),
            default_time_zone: "Africa/Nairobi".to_string(),
            ..Config::default()
        });
        let state = AppState::new(Arc::new(config)).await.expect("state");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            axum::serve(listener, app(state)).await.expect("serve");
        });
        Self {
            base_url: format!("http://{addr}"),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn as_user(&self, method: reqwest::Method, path: &str, account_id: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header("x-account-id", account_id)
    }

    fn as_admin(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.as_user(method, path, "staff")
            .header("x-account-admin", "1")
    }

    async fn signup(&self, username: &str, phone: &str, role: &str) -> AccountResponse {
        let response = self
            .as_admin(reqwest::Method::POST, "/api/v1/accounts")
            .json(&json!({
                "username": username,
                "email": format!("{username}@example.com"),
                "phone_number": phone,
                "password": "s3cret-pass",
                "role": role
            }))
            .send()
            .await
            .expect("create account");
        assert_eq!(response.status(), StatusCode::CREATED);
        response.json().await.expect("account body")
    }
}

#[tokio::test]
async fn health_needs_no_identity() {
    let server = TestServer::start().await;
    let response = server
        .client
        .get(server.url("/api/v1/health"))
        .send()
        .await
        .expect("health");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("health body");
    assert_eq!(body["status"], "ok");

    let response = server
        .client
        .get(server.url("/api/v1/accounts"))
        .send()
        .await
        .expect("accounts");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: ErrorResponse = response.json().await.expect("error body");
    assert_eq!(body.code, "unauthenticated");
}

#[tokio::test]
async fn follow_flow_over_http() {
    let server = TestServer::start().await;
    let alice = server.signup("alice", "+254700000001", "REGULAR").await;
    let bob = server.signup("bob", "+254700000002", "REGULAR").await;

    for _ in 0..2 {
        let response = server
            .as_user(
                reqwest::Method::POST,
                &format!("/api/v1/accounts/{}/follow", bob.id),
                &alice.id,
            )
            .send()
            .await
            .expect("follow");
        assert_eq!(response.status(), StatusCode::OK);
    }

    let followers: Vec<AccountResponse> = server
        .as_user(
            reqwest::Method::GET,
            &format!("/api/v1/accounts/{}/followers", bob.id),
            &alice.id,
        )
        .send()
        .await
        .expect("followers")
        .json()
        .await
        .expect("followers body");
    assert_eq!(followers.len(), 1);
    assert_eq!(followers[0].username, "alice");

    let detail: Value = server
        .as_user(reqwest::Method::GET, &format!("/api/v1/accounts/{}", bob.id), &alice.id)
        .send()
        .await
        .expect("detail")
        .json()
        .await
        .expect("detail body");
    assert_eq!(detail["followers_count"], 1);
    assert_eq!(detail["profile"]["variant"], "REGULAR");
    assert_eq!(detail["profile"]["time_zone"], "Africa/Nairobi");

    let response = server
        .as_user(
            reqwest::Method::POST,
            &format!("/api/v1/accounts/{}/follow", alice.id),
            &alice.id,
        )
        .send()
        .await
        .expect("self follow");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = server
        .as_user(
            reqwest::Method::POST,
            &format!("/api/v1/accounts/{}/unfollow", bob.id),
            &alice.id,
        )
        .send()
        .await
        .expect("unfollow");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn duplicate_username_is_a_conflict() {
    let server = TestServer::start().await;
    server.signup("alice", "+254700000001", "REGULAR").await;

    let response = server
        .as_admin(reqwest::Method::POST, "/api/v1/accounts")
        .json(&json!({
            "username": "alice",
            "email": "other@example.com",
            "phone_number": "+254700000009",
            "password": "pw"
        }))
        .send()
        .await
        .expect("duplicate");
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: ErrorResponse = response.json().await.expect("error body");
    assert_eq!(body.code, "uniqueness_error");
    assert_eq!(body.field.as_deref(), Some("username"));
}

#[tokio::test]
async fn striker_verification_and_suspension() {
    let server = TestServer::start().await;
    let striker = server.signup("striker", "+254700000003", "FOOTBALLER").await;

    let response = server
        .as_user(
            reqwest::Method::GET,
            &format!("/api/v1/accounts/{}/profile", striker.id),
            &striker.id,
        )
        .send()
        .await
        .expect("profile before verification");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Owners may not verify themselves.
    let response = server
        .as_user(
            reqwest::Method::PATCH,
            &format!("/api/v1/accounts/{}", striker.id),
            &striker.id,
        )
        .json(&json!({ "is_verified": true }))
        .send()
        .await
        .expect("self verify");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = server
        .as_admin(
            reqwest::Method::PATCH,
            &format!("/api/v1/accounts/{}", striker.id),
        )
        .json(&json!({ "is_verified": true }))
        .send()
        .await
        .expect("verify");
    assert_eq!(response.status(), StatusCode::OK);

    let profile: Value = server
        .as_user(
            reqwest::Method::GET,
            &format!("/api/v1/accounts/{}/profile", striker.id),
            &striker.id,
        )
        .send()
        .await
        .expect("profile")
        .json()
        .await
        .expect("profile body");
    assert_eq!(profile["variant"], "FOOTBALLER");
    let profile_id = profile["id"].as_str().expect("profile id").to_string();

    let response = server
        .as_user(
            reqwest::Method::PATCH,
            &format!("/api/v1/profiles/{profile_id}"),
            &striker.id,
        )
        .json(&json!({ "position": "Striker", "coaching_style": "gegenpress" }))
        .send()
        .await
        .expect("foreign field");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = server
        .as_user(reqwest::Method::POST, "/api/v1/profile-statuses", &striker.id)
        .json(&json!({ "footballer_profile": profile_id, "status": "suspended" }))
        .send()
        .await
        .expect("status as owner");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let status: Value = server
        .as_admin(reqwest::Method::POST, "/api/v1/profile-statuses")
        .json(&json!({
            "footballer_profile": profile_id,
            "status": "suspended",
            "reason": "Doping test pending"
        }))
        .send()
        .await
        .expect("status")
        .json()
        .await
        .expect("status body");
    assert_eq!(status["status"], "suspended");
    assert_eq!(status["footballer_profile"], profile_id.as_str());
    assert!(status["regular_profile"].is_null());
    assert!(status["manager_profile"].is_null());
    assert!(status["organisation_profile"].is_null());

    let response = server
        .as_admin(reqwest::Method::POST, "/api/v1/profile-statuses")
        .json(&json!({ "regular_profile": "a", "manager_profile": "b" }))
        .send()
        .await
        .expect("two owners");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn league_rename_moves_slug() {
    let server = TestServer::start().await;

    let response = server
        .as_user(reqwest::Method::POST, "/api/v1/leagues", "fan")
        .json(&json!({ "name": "Premier League", "short_name": "EPL", "country": "GB" }))
        .send()
        .await
        .expect("league as fan");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let league: Value = server
        .as_admin(reqwest::Method::POST, "/api/v1/leagues")
        .json(&json!({
            "name": "Premier League",
            "short_name": "EPL",
            "country": "GB",
            "continent": "EU"
        }))
        .send()
        .await
        .expect("league")
        .json()
        .await
        .expect("league body");
    assert_eq!(league["slug"], "premier-league");

    let renamed: Value = server
        .as_admin(reqwest::Method::PATCH, "/api/v1/leagues/premier-league")
        .json(&json!({ "name": "English Premier League" }))
        .send()
        .await
        .expect("rename")
        .json()
        .await
        .expect("rename body");
    assert_eq!(renamed["slug"], "english-premier-league");
    assert_eq!(renamed["id"], league["id"]);

    let response = server
        .as_user(reqwest::Method::GET, "/api/v1/leagues/premier-league", "fan")
        .send()
        .await
        .expect("old slug");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = server
        .as_admin(reqwest::Method::POST, "/api/v1/leagues")
        .json(&json!({
            "name": "English Premier-League",
            "short_name": "EPL",
            "country": "GB"
        }))
        .send()
        .await
        .expect("colliding league");
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: ErrorResponse = response.json().await.expect("error body");
    assert_eq!(body.code, "conflict");
}

#[tokio::test]
async fn default_flags_do_not_need_an_administrator() {
    let server = TestServer::start().await;
    let response = server
        .as_user(reqwest::Method::POST, "/api/v1/accounts", "someone")
        .json(&json!({
            "username": "fan",
            "email": "fan@example.com",
            "phone_number": "+254700000021",
            "password": "pw",
            "is_active": true,
            "is_verified": false
        }))
        .send()
        .await
        .expect("create with defaults");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = server
        .as_user(reqwest::Method::POST, "/api/v1/accounts", "someone")
        .json(&json!({
            "username": "insider",
            "email": "insider@example.com",
            "phone_number": "+254700000022",
            "password": "pw",
            "is_verified": true
        }))
        .send()
        .await
        .expect("create verified");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
