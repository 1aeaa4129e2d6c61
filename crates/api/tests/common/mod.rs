#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use ivv_api::auth::jwt::{generate_access_token, JwtConfig};
use ivv_api::config::{LogFormat, ServerConfig};
use ivv_api::router::build_app_router;
use ivv_api::state::AppState;
use ivv_core::roles::{Actor, Role};
use ivv_db::models::user::CreateUser;
use ivv_workflow::{EngineConfig, MemoryStore, ProjectWorkflowEngine, WorkflowStore};

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        db_max_connections: 1,
        generated_password_length: 16,
        log_format: LogFormat::Pretty,
        bootstrap_admin: None,
        jwt: JwtConfig {
            secret: "integration-test-secret-for-hs256".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// The production router over an in-memory store, with one ETS user and
/// two vendors already seeded.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub engine: Arc<ProjectWorkflowEngine>,
    pub config: ServerConfig,
    pub ets: Actor,
    pub vendor: Actor,
    pub other_vendor: Actor,
}

pub async fn build_test_app() -> TestApp {
    let config = test_config();
    let store = Arc::new(MemoryStore::new());
    let ets = seed_user(&store, "ets@example.com", Role::Ets).await;
    let vendor = seed_user(&store, "vendor@example.com", Role::Vendor).await;
    let other_vendor = seed_user(&store, "other@example.com", Role::Vendor).await;

    let engine = Arc::new(ProjectWorkflowEngine::new(
        store.clone(),
        EngineConfig::default(),
    ));
    let state = AppState {
        engine: Arc::clone(&engine),
        config: Arc::new(config.clone()),
    };

    TestApp {
        router: build_app_router(state, &config),
        store,
        engine,
        config,
        ets,
        vendor,
        other_vendor,
    }
}

async fn seed_user(store: &MemoryStore, email: &str, role: Role) -> Actor {
    store
        .create_user(&CreateUser {
            first_name: "Test".to_string(),
            last_name: email.to_string(),
            email: email.to_string(),
            password_hash: "!".to_string(),
            role,
        })
        .await
        .unwrap()
        .actor()
}

impl TestApp {
    /// A valid bearer token for `actor`.
    pub fn token(&self, actor: &Actor) -> String {
        generate_access_token(actor.id, actor.role, &self.config.jwt).unwrap()
    }

    /// Send one request through the full middleware stack and return the
    /// status with the parsed JSON body (`Null` for empty bodies).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    /// Send as `actor`.
    pub async fn send_as(
        &self,
        actor: &Actor,
        method: Method,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let token = self.token(actor);
        self.send(method, uri, Some(&token), body).await
    }

    /// Create a PENDING project owned by `self.vendor` and return its id.
    pub async fn create_project(&self) -> i64 {
        let (status, json) = self
            .send_as(
                &self.vendor,
                Method::POST,
                "/api/v1/projects",
                Some(serde_json::json!({
                    "name": "Child Welfare System",
                    "description": "CCWIS implementation",
                    "original_contract_award_cents": 120_000_000,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{json}");
        json["data"]["id"].as_i64().unwrap()
    }
}
