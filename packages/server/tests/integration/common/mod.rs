use std::net::SocketAddr;

use reqwest::Client;
use serde_json::Value;
use tempfile::TempDir;

use quote_server::config::{AppConfig, AuthConfig, CorsConfig, DatabaseConfig, ServerConfig};
use quote_server::database::Store;
use quote_server::state::AppState;

pub const JWT_SECRET: &str = "test-secret-for-integration-tests";

pub mod routes {
    pub const HEALTH: &str = "/health";
    pub const REGISTER: &str = "/register";
    pub const LOGIN: &str = "/login";
    pub const QUOTES: &str = "/quotes";

    pub fn quote(id: i32) -> String {
        format!("/quotes/{id}")
    }

    pub fn vote(quote_id: i32) -> String {
        format!("/quotes/{quote_id}/vote")
    }

    pub fn vote_count(quote_id: i32) -> String {
        format!("/quotes/{quote_id}/vote/count")
    }

    pub fn vote_check(quote_id: i32) -> String {
        format!("/quotes/{quote_id}/vote/check")
    }
}

/// A running test server backed by its own SQLite file.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub store: Store,
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

impl TestApp {
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        let app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig {
                url: dir.path().join("quotes.db").display().to_string(),
                reader_max_connections: 4,
                write_timeout_ms: 5000,
                busy_timeout_ms: 5000,
            },
            auth: AuthConfig {
                jwt_secret: JWT_SECRET.to_string(),
                token_ttl_hours: 1,
            },
            ledger: Default::default(),
        };

        let store = Store::open(&app_config.database)
            .await
            .expect("Failed to open test store");

        let state = AppState::new(store.clone(), app_config);
        let app = quote_server::build_router(state);

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
            store,
            _dir: dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn send(&self, req: reqwest::RequestBuilder, token: Option<&str>) -> TestResponse {
        let req = match token {
            Some(token) => req.header("Authorization", format!("Bearer {token}")),
            None => req,
        };
        let res = req.send().await.expect("Failed to send request");
        TestResponse::from_response(res).await
    }

    pub async fn post_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        self.send(self.client.post(self.url(path)).json(body), Some(token))
            .await
    }

    pub async fn post_without_token(&self, path: &str, body: &Value) -> TestResponse {
        self.send(self.client.post(self.url(path)).json(body), None)
            .await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        self.send(self.client.get(self.url(path)), Some(token)).await
    }

    pub async fn get_without_token(&self, path: &str) -> TestResponse {
        self.send(self.client.get(self.url(path)), None).await
    }

    /// GET with a raw `Authorization` header value.
    pub async fn get_with_authorization(&self, path: &str, value: &str) -> TestResponse {
        self.send(
            self.client.get(self.url(path)).header("Authorization", value),
            None,
        )
        .await
    }

    pub async fn put_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        self.send(self.client.put(self.url(path)).json(body), Some(token))
            .await
    }

    pub async fn delete_with_token(&self, path: &str, token: &str) -> TestResponse {
        self.send(self.client.delete(self.url(path)), Some(token))
            .await
    }

    pub async fn delete_without_token(&self, path: &str) -> TestResponse {
        self.send(self.client.delete(self.url(path)), None).await
    }

    /// Register a user and log in, returning the auth token.
    pub async fn create_authenticated_user(&self, username: &str, password: &str) -> String {
        let body = serde_json::json!({
            "username": username,
            "password": password,
        });

        let reg = self.post_without_token(routes::REGISTER, &body).await;
        assert_eq!(reg.status, 201, "Registration failed: {}", reg.text);

        let res = self.post_without_token(routes::LOGIN, &body).await;
        assert_eq!(res.status, 200, "Login failed: {}", res.text);

        res.body["token"]
            .as_str()
            .expect("Login response should contain a token")
            .to_string()
    }

    /// Create a quote via the API and return its `id`.
    pub async fn create_quote(&self, token: &str, content: &str, author: &str) -> i32 {
        let res = self
            .post_with_token(
                routes::QUOTES,
                &serde_json::json!({
                    "content": content,
                    "author": author,
                }),
                token,
            )
            .await;
        assert_eq!(res.status, 201, "create_quote failed: {}", res.text);
        res.id()
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }

    pub fn id(&self) -> i32 {
        self.body["id"]
            .as_i64()
            .expect("response body should contain 'id'") as i32
    }
}
