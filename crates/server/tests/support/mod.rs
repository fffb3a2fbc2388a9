use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;
use tower_http::cors::CorsLayer;

use server::routes::{self, auth::ServerState};
use service::auth::repository::memory::InMemoryAccountRepository;
use service::booking::repository::memory::InMemoryBookingRepository;

pub struct TestApp {
    pub router: Router,
    pub accounts: Arc<InMemoryAccountRepository>,
}

pub fn app() -> TestApp {
    let accounts = Arc::new(InMemoryAccountRepository::new());
    let cfg = service::test_support::test_auth_config();
    let state = ServerState::with_repositories(accounts.clone(), Arc::new(InMemoryBookingRepository::new()), &cfg)
        .expect("test state");
    TestApp { router: routes::build_router(state, CorsLayer::very_permissive()), accounts }
}

impl TestApp {
    pub async fn call(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {t}"));
        }
        let req = match body {
            Some(v) => req.header(header::CONTENT_TYPE, "application/json").body(Body::from(serde_json::to_vec(&v)?))?,
            None => req.body(Body::empty())?,
        };
        let resp = self.router.clone().oneshot(req).await?;
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
        let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
        Ok((status, json))
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> anyhow::Result<Value> {
        let (status, body) = self
            .call("POST", "/api/register", None, Some(serde_json::json!({"username": username, "email": email, "password": password})))
            .await?;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        Ok(body)
    }

    /// Returns `(access, refresh)`.
    pub async fn login(&self, identifier: &str, password: &str) -> anyhow::Result<(String, String)> {
        let (status, body) = self
            .call("POST", "/api/login", None, Some(serde_json::json!({"username": identifier, "password": password})))
            .await?;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        let access = body["access"].as_str().unwrap_or_default().to_string();
        let refresh = body["refresh"].as_str().unwrap_or_default().to_string();
        Ok((access, refresh))
    }
}
