//! Authentication and permission gates of the HTTP API

mod common;

use common::{ADMIN, MEMBER, SUPPORT, TestApp, code};
use http::StatusCode;

#[tokio::test]
async fn health_is_public() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], true);
}

#[tokio::test]
async fn anonymous_is_401_and_member_is_403() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/roles", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(code(&body), 1001);

    let member = app.token("plain-user");
    let (status, body) = app.get("/api/roles", Some(&member)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(code(&body), 2001);
}

#[tokio::test]
async fn invalid_token_is_rejected_even_on_public_routes() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/api/forum/categories", Some("not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(code(&body), 1004);
}

#[tokio::test]
async fn support_sees_panel_but_cannot_manage_roles() {
    let app = TestApp::new().await;
    let support = app.user_with_roles("helpdesk", &[SUPPORT]).await;

    let (status, body) = app.get("/api/roles", Some(&support)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    let (status, _) = app.get("/api/admin/stats", Some(&support)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get("/api/moderation-logs", Some(&support)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post(
            "/api/roles",
            Some(&support),
            serde_json::json!({ "name": "vip", "display_name": "VIP" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(code(&body), 2001);

    let (status, _) = app.get("/api/permissions/matrix", Some(&support)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.get("/api/users", Some(&support)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.get("/api/category-permissions", Some(&support)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn my_permissions_reflect_roles() {
    let app = TestApp::new().await;

    let member = app.token("newcomer");
    let (status, body) = app.get("/api/me/permissions", Some(&member)).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["primary_role"]["name"], "member");
    assert_eq!(data["is_staff"], false);
    assert_eq!(data["can_access_admin_panel"], false);
    assert_eq!(data["permissions"].as_array().unwrap().len(), 0);

    let admin = app.user_with_roles("boss", &[MEMBER, ADMIN]).await;
    let (_, body) = app.get("/api/me/permissions", Some(&admin)).await;
    let data = &body["data"];
    assert_eq!(data["primary_role"]["name"], "admin");
    assert_eq!(data["is_staff"], true);
    assert_eq!(data["can_access_admin_panel"], true);
    assert_eq!(data["permissions"].as_array().unwrap().len(), 8);
}

#[tokio::test]
async fn role_change_applies_on_next_request() {
    let app = TestApp::new().await;
    let token = app.token("climber");

    let (status, _) = app.get("/api/moderation/posts", Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    app.assign("climber", &[SUPPORT]).await;
    let (status, _) = app.get("/api/moderation/posts", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn profile_update_round_trip() {
    let app = TestApp::new().await;
    let token = app.token("u-profile");

    let (status, body) = app.get("/api/me/profile", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].is_null());

    let (status, body) = app
        .put(
            "/api/me/profile",
            Some(&token),
            serde_json::json!({ "display_name": "  Jamie " }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["display_name"], "Jamie");

    let (status, _) = app
        .put("/api/me/profile", None, serde_json::json!({ "display_name": "x" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn websocket_route_requires_a_caller() {
    let app = TestApp::new().await;
    let (status, _) = app.get("/api/notifications/ws", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // token accepted from the query string; plain GET is not an upgrade
    let token = app.token("ws-user");
    let (status, _) = app
        .get(&format!("/api/notifications/ws?token={token}"), None)
        .await;
    assert_ne!(status, StatusCode::UNAUTHORIZED);
    assert!(status.is_client_error());
}
