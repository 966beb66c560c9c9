/// End-to-end tests for the dashboard API
///
/// Every test drives the full router in-process. Most run over a repository
/// that was never connected, so reads exercise the fallback data; the rest
/// use a scripted store for the live path.
mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use common::{expired_token, ScriptedStore, TestContext, PASSWORD, SECRET};
use dashboard_shared::auth::jwt::validate_token;
use serde_json::json;
use std::sync::Arc;

fn ids(body: &serde_json::Value) -> Vec<String> {
    body["data"]["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_is_public() {
    let ctx = TestContext::disconnected();

    let (status, body) = ctx.get_with("/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Server is running");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["timestamp"].is_string());
    assert_eq!(
        body["database"],
        json!({"store1Connected": false, "store2Connected": false})
    );
}

#[tokio::test]
async fn test_health_reports_live_store() {
    let ctx = TestContext::with_store(Arc::new(ScriptedStore::live()));

    let (_, body) = ctx.get_with("/api/health", None).await;
    assert_eq!(
        body["database"],
        json!({"store1Connected": true, "store2Connected": true})
    );
}

#[tokio::test]
async fn test_login_success() {
    let ctx = TestContext::disconnected();

    let (status, body) = ctx.login("admin", PASSWORD).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["data"]["user"],
        json!({"id": "1", "username": "admin", "email": "admin@dashboard.local"})
    );

    let token = body["data"]["token"].as_str().unwrap();
    let claims = validate_token(token, SECRET).unwrap();
    assert_eq!(claims.username, "admin");
    assert_eq!(claims.exp - claims.iat, 24 * 3600);

    // The issued token opens the protected routes
    let (status, _) = ctx
        .get_with("/api/dashboard/stats", Some(&format!("Bearer {}", token)))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_wrong_credentials() {
    let ctx = TestContext::disconnected();

    for (username, password) in [("admin", "wrong"), ("root", PASSWORD)] {
        let (status, body) = ctx.login(username, password).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"success": false, "error": "Invalid credentials"}));
    }
}

#[tokio::test]
async fn test_login_missing_fields() {
    let ctx = TestContext::disconnected();

    let (status, body) = ctx.login("admin", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Username and password are required");
    assert_eq!(body["details"][0]["field"], "password");

    // Absent fields behave like empty ones
    let (status, body) = ctx.login_raw("{}".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_login_malformed_body() {
    let ctx = TestContext::disconnected();

    let (status, body) = ctx.login_raw("{not json".to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let ctx = TestContext::disconnected();

    for uri in ["/api/clients", "/api/clients/1", "/api/dashboard/stats"] {
        let (status, body) = ctx.get_with(uri, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        assert_eq!(body, json!({"success": false, "error": "Access token required"}));
    }

    // Wrong scheme counts as no token
    let (status, _) = ctx.get_with("/api/clients", Some("Basic YWRtaW46YWRtaW4=")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = ctx.get_with("/api/clients", Some("Bearer ")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bad_tokens_are_forbidden() {
    let ctx = TestContext::disconnected();

    let expired = format!("Bearer {}", expired_token());
    for authorization in ["Bearer not-a-jwt", expired.as_str()] {
        let (status, body) = ctx.get_with("/api/clients", Some(authorization)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({"success": false, "error": "Invalid token"}));
    }

    // Signed with another secret
    let foreign = dashboard_shared::auth::jwt::create_token(
        &dashboard_shared::auth::jwt::Claims::new(&common::admin()),
        "some-other-secret-that-is-long-enough",
    )
    .unwrap();
    let (status, _) = ctx
        .get_with("/api/clients", Some(&format!("Bearer {}", foreign)))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_fallback_second_page() {
    let ctx = TestContext::disconnected();

    let (status, body) = ctx.get("/api/clients?page=2&limit=10").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["degraded"], true);
    assert_eq!(
        body["data"]["pagination"],
        json!({"page": 2, "limit": 10, "total": 20, "totalPages": 2})
    );
    assert_eq!(
        ids(&body),
        (11..=20).map(|i| i.to_string()).collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn test_fallback_filters_and_sorting() {
    let ctx = TestContext::disconnected();

    let (_, body) = ctx.get("/api/clients?search=dupont").await;
    assert_eq!(ids(&body), vec!["2"]);
    assert_eq!(body["data"]["pagination"]["total"], 1);

    let (_, body) = ctx
        .get("/api/clients?sortBy=factures_count&sortOrder=desc&limit=3")
        .await;
    assert_eq!(ids(&body), vec!["5", "16", "20"]);

    // Unknown sort parameters fall back to name ascending
    let (status, body) = ctx
        .get("/api/clients?sortBy=password&sortOrder=sideways&limit=2")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec!["1", "2"]);
}

#[tokio::test]
async fn test_fallback_date_range_includes_end_day() {
    let ctx = TestContext::disconnected();

    let (status, body) = ctx
        .get("/api/clients?dateFrom=2024-01-15&dateTo=2024-03-19")
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec!["14", "15", "16"]);
    assert_eq!(body["data"]["pagination"]["totalPages"], 1);
}

#[tokio::test]
async fn test_invalid_query_parameters() {
    let ctx = TestContext::disconnected();

    for uri in [
        "/api/clients?limit=0",
        "/api/clients?limit=101",
        "/api/clients?page=0",
        "/api/clients?page=abc",
    ] {
        let (status, body) = ctx.get(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["success"], false);
    }

    let (status, body) = ctx.get("/api/clients?dateFrom=yesterday").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid query parameters");
    assert_eq!(body["details"][0]["field"], "dateFrom");
}

#[tokio::test]
async fn test_fallback_client_detail() {
    let ctx = TestContext::disconnected();

    let (status, body) = ctx.get("/api/clients/3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["degraded"], true);
    assert_eq!(body["data"]["id"], "3");
    assert_eq!(body["data"]["societe_name"], "Cabinet Peeters");
    assert_eq!(body["data"]["has_legal_unit"], false);

    let (status, body) = ctx.get("/api/clients/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"success": false, "error": "Client not found"}));
}

#[tokio::test]
async fn test_fallback_stats() {
    let ctx = TestContext::disconnected();

    let (status, body) = ctx.get("/api/dashboard/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "data": {
                "totalClients": "20",
                "totalFactures": "2847",
                "totalContacts": "98",
                "totalEntreprises": "98",
                "totalFacturesFournisseurs": "623"
            },
            "degraded": true
        })
    );
}

#[tokio::test]
async fn test_live_store() {
    let ctx = TestContext::with_store(Arc::new(ScriptedStore::live()));

    let (status, body) = ctx.get("/api/clients").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("degraded").is_none());
    assert_eq!(ids(&body), vec!["102", "101", "103"]);
    assert_eq!(
        body["data"]["pagination"],
        json!({"page": 1, "limit": 10, "total": 3, "totalPages": 1})
    );

    let (status, body) = ctx.get("/api/clients/101").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["societe_name"], "Brasserie Live");
    assert!(body.get("degraded").is_none());

    // A connected store is authoritative: no fallback lookup on a miss
    let (status, _) = ctx.get("/api/clients/5").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = ctx.get("/api/dashboard/stats").await;
    assert_eq!(body["data"]["totalFactures"], "42");
    assert!(body.get("degraded").is_none());
}

#[tokio::test]
async fn test_failing_store() {
    let ctx = TestContext::with_store(Arc::new(ScriptedStore::failing()));

    // Listing and stats degrade to the fallback data
    let (status, body) = ctx.get("/api/clients?limit=5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["degraded"], true);
    assert_eq!(body["data"]["pagination"]["total"], 20);

    let (_, body) = ctx.get("/api/dashboard/stats").await;
    assert_eq!(body["degraded"], true);
    assert_eq!(body["data"]["totalClients"], "20");

    // Detail does not: the error is not hidden
    let (status, body) = ctx.get("/api/clients/3").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"success": false, "error": "Internal server error"}));
}

#[tokio::test]
async fn test_unknown_route() {
    let ctx = TestContext::disconnected();

    for (uri, authorization) in [
        ("/api/nope", None),
        ("/nope", None),
        ("/api/nope", Some(ctx.auth_header())),
    ] {
        let (status, body) = ctx.get_with(uri, authorization.as_deref()).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(body, json!({"success": false, "error": "Route not found"}));
    }
}

#[tokio::test]
async fn test_wrong_method() {
    let ctx = TestContext::disconnected();

    for (method, uri) in [
        (Method::GET, "/api/auth/login"),
        (Method::POST, "/api/health"),
        (Method::DELETE, "/api/clients/1"),
        (Method::PUT, "/api/dashboard/stats"),
    ] {
        let request = Request::builder()
            .method(method.clone())
            .uri(uri)
            .header(header::AUTHORIZATION, ctx.auth_header())
            .body(Body::empty())
            .unwrap();
        let (status, _, body) = ctx.send(request).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{} {}", method, uri);
        assert_eq!(body, json!({"success": false, "error": "Method not allowed"}));
    }
}

#[tokio::test]
async fn test_security_headers() {
    let ctx = TestContext::disconnected();

    let request = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();
    let (_, headers, _) = ctx.send(request).await;

    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert_eq!(headers.get("cache-control").unwrap(), "no-store");
    assert!(headers.get("strict-transport-security").is_none());
}

#[tokio::test]
async fn test_cors_preflight() {
    let ctx = TestContext::disconnected();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/clients")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization")
        .body(Body::empty())
        .unwrap();
    let (status, headers, _) = ctx.send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:5173"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
}
