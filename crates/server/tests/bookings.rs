mod support;

use axum::http::StatusCode;
use serde_json::json;

use service::test_support::test_issuer;
use support::app;

#[tokio::test]
async fn end_to_end_owner_isolation() -> anyhow::Result<()> {
    let app = app();
    let alice = app.register("alice", "alice@x.com", "p1").await?;
    app.register("bob", "bob@x.com", "p2").await?;

    let (alice_access, _) = app.login("alice@x.com", "p1").await?;
    let (bob_access, _) = app.login("bob", "p2").await?;

    // owner in the body is ignored
    let (status, booking) = app
        .call(
            "POST",
            "/api/bookings",
            Some(&alice_access),
            Some(json!({"destination": "Paris", "date": "2099-01-01", "guests": 2, "owner": 999})),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(booking["owner_id"], alice["id"]);
    let id = booking["id"].as_i64().unwrap_or_default();

    let (status, list) = app.call("GET", "/api/bookings", Some(&alice_access), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(1));

    let (_, list) = app.call("GET", "/api/bookings", Some(&bob_access), None).await?;
    assert_eq!(list.as_array().map(Vec::len), Some(0));

    let uri = format!("/api/bookings/{id}");
    for method in ["GET", "DELETE"] {
        let (status, body) = app.call(method, &uri, Some(&bob_access), None).await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "not_found");
    }
    let (status, _) = app.call("PATCH", &uri, Some(&bob_access), Some(json!({"guests": 9}))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, updated) = app.call("PUT", &uri, Some(&alice_access), Some(json!({"guests": 3}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["guests"], 3);
    assert_eq!(updated["destination"], "Paris");

    let (status, _) = app.call("DELETE", &uri, Some(&alice_access), None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.call("GET", &uri, Some(&alice_access), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn invalid_bookings_are_400() -> anyhow::Result<()> {
    let app = app();
    app.register("alice", "alice@x.com", "p1").await?;
    let (access, _) = app.login("alice", "p1").await?;

    let bodies = [
        json!({"destination": "", "date": "2099-01-01", "guests": 1}),
        json!({"destination": "Rome", "date": "2000-01-01", "guests": 1}),
        json!({"destination": "Rome", "date": "tomorrow", "guests": 1}),
        json!({"destination": "Rome", "date": "2099-01-01", "guests": 0}),
    ];
    for body in bodies {
        let (status, err) = app.call("POST", "/api/bookings", Some(&access), Some(body)).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["code"], "validation_error");
    }
    Ok(())
}

#[tokio::test]
async fn unparsable_ids_are_json_404() -> anyhow::Result<()> {
    let app = app();
    app.register("alice", "alice@x.com", "p1").await?;
    let (access, _) = app.login("alice", "p1").await?;

    for uri in ["/api/bookings/abc", "/api/bookings/99999999999999999999"] {
        for method in ["GET", "DELETE"] {
            let (status, body) = app.call(method, uri, Some(&access), None).await?;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body["code"], "not_found");
        }
        let (status, body) = app.call("PATCH", uri, Some(&access), Some(json!({"guests": 2}))).await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "not_found");
    }
    Ok(())
}

#[tokio::test]
async fn array_booking_body_is_400() -> anyhow::Result<()> {
    let app = app();
    app.register("alice", "alice@x.com", "p1").await?;
    let (access, _) = app.login("alice", "p1").await?;
    let (status, body) = app
        .call("POST", "/api/bookings", Some(&access), Some(json!(["Paris", "2099-01-01", 2])))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
    Ok(())
}

#[tokio::test]
async fn expired_access_token_cannot_create_bookings() -> anyhow::Result<()> {
    let app = app();
    let created = app.register("alice", "alice@x.com", "p1").await?;
    let identity = service::auth::domain::Identity {
        account_id: created["id"].as_i64().unwrap_or_default(),
        username: "alice".into(),
        email: "alice@x.com".into(),
    };
    let expired = test_issuer().issue_access_token_at(&identity, chrono::Utc::now().timestamp() - 10_000)?;

    let (status, body) = app
        .call(
            "POST",
            "/api/bookings",
            Some(&expired),
            Some(json!({"destination": "Paris", "date": "2099-01-01", "guests": 2})),
        )
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "not_authenticated");
    Ok(())
}
