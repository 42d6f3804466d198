use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use tempfile::TempDir;

use prompthub_server::config::{
    AdminConfig, AppConfig, AuthConfig, CorsConfig, DatabaseConfig, ServerConfig, SlackConfig,
};
use prompthub_server::identity::{ExternalProfile, IdentityProvider, ProviderError};
use prompthub_server::state::AppState;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin-password";

pub mod routes {
    pub const LOGIN: &str = "/api/v1/auth/login";
    pub const SLACK_AUTHORIZE_URL: &str = "/api/v1/auth/slack/authorize-url";
    pub const SLACK_CALLBACK: &str = "/api/v1/auth/slack/callback";
    pub const ME: &str = "/api/v1/auth/me";
    pub const CATEGORIES: &str = "/api/v1/categories";
    pub const PROMPTS: &str = "/api/v1/prompts";
    pub const PROMPT_TAGS: &str = "/api/v1/prompts/tags";
    pub const PENDING: &str = "/api/v1/admin/prompts/pending";

    pub fn rating(id: i32) -> String {
        format!("/api/v1/prompts/{id}/rating")
    }

    pub fn vote(id: i32) -> String {
        format!("/api/v1/prompts/{id}/vote")
    }

    pub fn approve(id: i32) -> String {
        format!("/api/v1/admin/prompts/{id}/approve")
    }

    pub fn reject(id: i32) -> String {
        format!("/api/v1/admin/prompts/{id}/reject")
    }
}

/// Identity provider that knows a fixed set of authorization codes.
///
/// `<name>-code` logs in as `<name>` with external id `U-<name>`; `nameless`
/// returns a profile without a display name; anything else is rejected.
struct FakeSlack;

#[async_trait]
impl IdentityProvider for FakeSlack {
    fn authorize_url(&self) -> Result<String, ProviderError> {
        Ok("https://slack.test/oauth/v2/authorize?client_id=test-client".into())
    }

    async fn exchange_code(&self, code: &str) -> Result<ExternalProfile, ProviderError> {
        if code == "nameless" {
            return Ok(ExternalProfile {
                external_id: "U-nameless".into(),
                display_name: "Slack User".into(),
            });
        }
        match code.strip_suffix("-code") {
            Some(name) if !name.is_empty() => Ok(ExternalProfile {
                external_id: format!("U-{name}"),
                display_name: name.to_string(),
            }),
            _ => Err(ProviderError::Rejected("invalid_code".into())),
        }
    }
}

/// A running test server backed by a throwaway SQLite file.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
    _dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestResponse {
    async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.expect("Failed to read response body");
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }

    pub fn id(&self) -> i32 {
        self.body["id"]
            .as_i64()
            .unwrap_or_else(|| panic!("Response has no id: {}", self.text)) as i32
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());

        let database = DatabaseConfig {
            url: db_url,
            max_connections: 1,
        };
        let db = prompthub_server::database::init_db(&database)
            .await
            .expect("Failed to initialize test database");

        let admin = AdminConfig {
            username: ADMIN_USERNAME.into(),
            password: ADMIN_PASSWORD.into(),
        };
        prompthub_server::seed::seed_admin(&db, &admin)
            .await
            .expect("Failed to seed admin");
        prompthub_server::seed::ensure_indexes(&db)
            .await
            .expect("Failed to create indexes");

        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database,
            auth: AuthConfig {
                jwt_secret: "test-secret-for-integration-tests".to_string(),
                token_ttl_hours: 1,
            },
            slack: SlackConfig {
                client_id: "test-client".into(),
                client_secret: "test-secret".into(),
                redirect_uri: "http://localhost/callback".into(),
                user_scopes: "identity.basic,identity.email".into(),
                authorize_endpoint: "https://slack.test/oauth/v2/authorize".into(),
                token_endpoint: "https://slack.test/api/oauth.v2.access".into(),
            },
            admin: Some(admin),
        };

        let state = AppState {
            db: db.clone(),
            config,
            identity: Arc::new(FakeSlack),
        };

        let app = prompthub_server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            db,
            _dir: dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    /// Log in as the seeded administrator and return the token.
    pub async fn admin_token(&self) -> String {
        let res = self
            .post_without_token(
                routes::LOGIN,
                &json!({"username": ADMIN_USERNAME, "password": ADMIN_PASSWORD}),
            )
            .await;
        assert_eq!(res.status, 200, "Admin login failed: {}", res.text);
        token_of(&res)
    }

    /// Log in through the fake Slack provider as `name` and return the token.
    pub async fn member_token(&self, name: &str) -> String {
        let res = self
            .post_without_token(routes::SLACK_CALLBACK, &json!({"code": format!("{name}-code")}))
            .await;
        assert_eq!(res.status, 200, "Slack login failed: {}", res.text);
        token_of(&res)
    }

    /// Submit a prompt via the API and return its `id`.
    pub async fn submit_prompt(&self, token: &str, title: &str, custom_tags: &str) -> i32 {
        let res = self
            .post_with_token(
                routes::PROMPTS,
                &json!({
                    "title": title,
                    "prompt_text": format!("{title}: explain it step by step."),
                    "category": "Miscellaneous",
                    "custom_tags": custom_tags,
                }),
                token,
            )
            .await;
        assert_eq!(res.status, 201, "submit_prompt failed: {}", res.text);
        res.id()
    }

    /// Approve a prompt via the API.
    pub async fn approve(&self, id: i32, admin_token: &str) {
        let res = self
            .post_with_token(&routes::approve(id), &json!({}), admin_token)
            .await;
        assert_eq!(res.status, 200, "approve failed: {}", res.text);
    }

    /// Submit and approve in one go, returning the prompt `id`.
    pub async fn published_prompt(&self, title: &str, custom_tags: &str) -> i32 {
        let author = self.member_token("author").await;
        let admin = self.admin_token().await;
        let id = self.submit_prompt(&author, title, custom_tags).await;
        self.approve(id, &admin).await;
        id
    }
}

fn token_of(res: &TestResponse) -> String {
    res.body["token"]
        .as_str()
        .expect("Login response should contain a token")
        .to_string()
}

/// Ids of the prompts in a list response, in response order.
pub fn ids(res: &TestResponse) -> Vec<i32> {
    res.body["data"]
        .as_array()
        .unwrap_or_else(|| panic!("Response has no data array: {}", res.text))
        .iter()
        .map(|p| p["id"].as_i64().unwrap() as i32)
        .collect()
}
