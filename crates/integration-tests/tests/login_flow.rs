//! Integration tests for sign-in, redirect-back and sign-out.

use clearpath_core::Role;
use clearpath_integration_tests::fake_backend::USERS;
use clearpath_integration_tests::{TestContext, closed_backend_url, redirect_location};
use clearpath_portal::middleware::session::SESSION_COOKIE_NAME;
use reqwest::StatusCode;

#[tokio::test]
async fn test_login_redirects_back_to_blocked_page() {
    let ctx = TestContext::new().await;

    let login_page = redirect_location(&ctx.get("/member/enrollments").await);
    assert_eq!(login_page, "/login?from=%2Fmember%2Fenrollments");

    let form = ctx.get(&login_page).await.text().await.expect("body");
    assert!(form.contains(r#"name="from""#));

    let resp = ctx.login_as("member", Some("/member/enrollments")).await;
    assert_eq!(redirect_location(&resp), "/member/enrollments");

    let resp = ctx.get("/member/enrollments").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("body");
    assert!(body.contains("Saying No With Confidence"));
    assert!(body.contains("In progress"));
}

#[tokio::test]
async fn test_login_without_target_goes_to_role_home() {
    for (username, _, role) in USERS {
        let ctx = TestContext::new().await;
        let role: Role = role.parse().expect("fixture role");

        let resp = ctx.login_as(username, None).await;

        assert_eq!(redirect_location(&resp), role.home_path(), "{username}");
    }
}

#[tokio::test]
async fn test_offsite_redirect_target_is_ignored() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .login_as("manager", Some("//evil.example/phish"))
        .await;

    assert_eq!(redirect_location(&resp), "/manager");
}

#[tokio::test]
async fn test_invalid_credentials_rerender_form() {
    let ctx = TestContext::new().await;

    let resp = ctx.login_with("admin", "wrong", Some("/admin")).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("body");
    assert!(body.contains("Invalid username or password."));

    // No role was stored
    assert!(redirect_location(&ctx.get("/admin").await).starts_with("/login"));
}

#[tokio::test]
async fn test_blank_fields_are_rejected_without_backend_call() {
    let ctx = TestContext::new().await;

    let resp = ctx.login_with("   ", "", None).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("body");
    assert!(body.contains("Enter your username and password."));
}

#[tokio::test]
async fn test_logout_clears_role() {
    let ctx = TestContext::new().await;
    ctx.login_as("admin", None).await;
    assert_eq!(ctx.get("/admin").await.status(), StatusCode::OK);

    let resp = ctx.logout().await;
    assert_eq!(redirect_location(&resp), "/login");

    assert!(redirect_location(&ctx.get("/admin").await).starts_with("/login"));
}

#[tokio::test]
async fn test_relogin_replaces_role() {
    let ctx = TestContext::new().await;
    ctx.login_as("admin", None).await;
    ctx.login_as("staff", None).await;

    assert_eq!(ctx.get("/staff").await.status(), StatusCode::OK);
    assert_eq!(ctx.get("/admin").await.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_root_redirects_by_session() {
    let ctx = TestContext::new().await;
    assert_eq!(redirect_location(&ctx.get("/").await), "/courses");

    ctx.login_as("member", None).await;
    assert_eq!(redirect_location(&ctx.get("/").await), "/member/enrollments");
}

#[tokio::test]
async fn test_backend_outage_keeps_login_page_usable() {
    let ctx = TestContext::with_backend(closed_backend_url().await).await;

    let resp = ctx.login_as("admin", None).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("body");
    assert!(body.contains("Sign-in is temporarily unavailable"));
}

#[tokio::test]
async fn test_session_cookie_attributes() {
    let ctx = TestContext::new().await;

    let resp = ctx.login_as("member", None).await;

    let cookie = resp
        .headers()
        .get(reqwest::header::SET_COOKIE)
        .expect("login sets a cookie")
        .to_str()
        .expect("ASCII cookie");
    assert!(cookie.starts_with(&format!("{SESSION_COOKIE_NAME}=")));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    // Served over plain HTTP locally
    assert!(!cookie.contains("Secure"));
}
