mod support;

use axum::http::StatusCode;
use serde_json::json;

use service::auth::token::{SigningKeys, TokenIssuer, TokenSettings};
use service::test_support::alice;
use support::app;

#[tokio::test]
async fn register_returns_created_account() -> anyhow::Result<()> {
    let app = app();
    let body = app.register("alice", "Alice@X.com", "p1").await?;
    assert_eq!(body["username"], "alice");
    assert_eq!(body["email"], "alice@x.com");
    assert!(body.get("password_hash").is_none());
    Ok(())
}

#[tokio::test]
async fn duplicate_registration_is_400_with_kind() -> anyhow::Result<()> {
    let app = app();
    app.register("alice", "alice@x.com", "p1").await?;
    let (status, body) = app
        .call("POST", "/api/register", None, Some(json!({"username": "alice2", "email": "alice@x.com", "password": "p1"})))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "duplicate_email");
    Ok(())
}

#[tokio::test]
async fn malformed_body_is_400_json() -> anyhow::Result<()> {
    let app = app();
    let (status, body) = app.call("POST", "/api/login", None, Some(json!(["not", "an", "object"]))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
    Ok(())
}

#[tokio::test]
async fn login_by_username_or_email_and_token_alias() -> anyhow::Result<()> {
    let app = app();
    let created = app.register("alice", "alice@x.com", "p1").await?;

    let (status, by_email) = app
        .call("POST", "/api/token", None, Some(json!({"username": "alice@x.com", "password": "p1"})))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_email["user_id"], created["id"]);

    let (status, by_name) = app
        .call("POST", "/api/login", None, Some(json!({"username": "alice", "password": "p1"})))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_name["user_id"], by_email["user_id"]);
    assert_eq!(by_name["email"], "alice@x.com");
    Ok(())
}

#[tokio::test]
async fn bad_credentials_are_uniform_401() -> anyhow::Result<()> {
    let app = app();
    app.register("alice", "alice@x.com", "p1").await?;
    let (s1, b1) = app.call("POST", "/api/login", None, Some(json!({"username": "alice", "password": "wrong"}))).await?;
    let (s2, b2) = app.call("POST", "/api/login", None, Some(json!({"username": "nobody", "password": "p1"}))).await?;
    assert_eq!((s1, s2), (StatusCode::UNAUTHORIZED, StatusCode::UNAUTHORIZED));
    assert_eq!(b1, b2);

    let (s, _) = app.call("POST", "/api/login", None, Some(json!({"password": "p1"}))).await?;
    assert_eq!(s, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn store_outage_is_503_not_401() -> anyhow::Result<()> {
    let app = app();
    app.register("alice", "alice@x.com", "p1").await?;
    app.accounts.set_unavailable(true);
    let (status, body) = app.call("POST", "/api/login", None, Some(json!({"username": "alice", "password": "p1"}))).await?;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "store_unavailable");
    Ok(())
}

#[tokio::test]
async fn refresh_flow_and_wrong_type() -> anyhow::Result<()> {
    let app = app();
    app.register("alice", "alice@x.com", "p1").await?;
    let (access, refresh) = app.login("alice", "p1").await?;

    let (status, body) = app.call("POST", "/api/token/refresh", None, Some(json!({"refresh": refresh}))).await?;
    assert_eq!(status, StatusCode::OK);
    let new_access = body["access"].as_str().unwrap_or_default().to_string();
    let (status, me) = app.call("GET", "/api/me", Some(&new_access), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "alice");

    let (status, body) = app.call("POST", "/api/token/refresh", None, Some(json!({"refresh": access}))).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "token_invalid");

    let (status, _) = app.call("GET", "/api/me", Some(&refresh), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn protected_routes_need_bearer() -> anyhow::Result<()> {
    let app = app();
    for uri in ["/api/me", "/api/bookings"] {
        let (status, body) = app.call("GET", uri, None, None).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "not_authenticated");
    }
    let (status, _) = app.call("GET", "/api/me", Some("not-a-jwt"), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn health_metrics_and_openapi_are_public() -> anyhow::Result<()> {
    let app = app();
    let (status, body) = app.call("GET", "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    app.register("alice", "alice@x.com", "p1").await?;
    app.login("alice", "p1").await?;
    let (status, _) = app.call("GET", "/metrics", None, None).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, doc) = app.call("GET", "/api-docs/openapi.json", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"].get("/api/bookings").is_some());
    Ok(())
}

#[tokio::test]
async fn rejected_refresh_tokens_share_one_response() -> anyhow::Result<()> {
    let app = app();
    app.register("alice", "alice@x.com", "p1").await?;
    let (access, _) = app.login("alice", "p1").await?;
    let foreign = TokenIssuer::new(SigningKeys::new(b"other-access", b"other-refresh"), TokenSettings::default())
        .issue_refresh_token(&alice())?;

    let mut bodies = Vec::new();
    for token in [access.as_str(), foreign.as_str(), "x.y.z"] {
        let (status, body) = app.call("POST", "/api/token/refresh", None, Some(json!({"refresh": token}))).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        bodies.push(body);
    }
    assert_eq!(bodies[0], json!({"error": "token invalid", "code": "token_invalid"}));
    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(bodies[1], bodies[2]);
    Ok(())
}

#[tokio::test]
async fn non_object_bodies_are_400_everywhere() -> anyhow::Result<()> {
    let app = app();
    for uri in ["/api/register", "/api/login", "/api/token/refresh"] {
        for body in [json!(["alice", "alice@x.com", "p1"]), json!("alice"), json!(null)] {
            let (status, err) = app.call("POST", uri, None, Some(body)).await?;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(err["code"], "validation_error");
        }
    }
    Ok(())
}
