//! Integration tests for role-gated routes.
//!
//! Every test runs against a live portal and fake backend; see
//! `clearpath_integration_tests::TestContext`.

use clearpath_integration_tests::{FailingStore, TestContext, fake_backend, redirect_location};
use reqwest::StatusCode;

/// Dashboard path and the username holding its role.
const DASHBOARDS: &[(&str, &str)] = &[
    ("/admin", "admin"),
    ("/manager", "manager"),
    ("/consultant", "consultant"),
    ("/staff", "staff"),
    ("/member/enrollments", "member"),
];

// =============================================================================
// Unauthenticated
// =============================================================================

#[tokio::test]
async fn test_anonymous_visitor_is_sent_to_login() {
    let ctx = TestContext::new().await;

    let resp = ctx.get("/admin").await;

    assert_eq!(redirect_location(&resp), "/login?from=%2Fadmin");
}

#[tokio::test]
async fn test_redirect_keeps_query_string() {
    let ctx = TestContext::new().await;

    let resp = ctx.get("/member/enrollments?sort=recent").await;

    assert_eq!(
        redirect_location(&resp),
        "/login?from=%2Fmember%2Fenrollments%3Fsort%3Drecent"
    );
}

#[tokio::test]
async fn test_every_guarded_route_redirects_anonymous_visitors() {
    let ctx = TestContext::new().await;

    for path in [
        "/admin",
        "/manager",
        "/consultant",
        "/staff",
        "/member/enrollments",
        "/member/courses/c-1/certificate",
        "/member/courses/c-1/quiz",
    ] {
        let resp = ctx.get(path).await;
        assert!(
            redirect_location(&resp).starts_with("/login?from="),
            "{path} should redirect to login"
        );
    }
}

#[tokio::test]
async fn test_public_pages_need_no_session() {
    let ctx = TestContext::new().await;

    for path in ["/health", "/courses", "/courses/c-1", "/activities", "/login"] {
        let resp = ctx.get(path).await;
        assert_eq!(resp.status(), StatusCode::OK, "{path}");
    }
}

#[tokio::test]
async fn test_unknown_route_is_not_found_not_redirected() {
    let ctx = TestContext::new().await;

    let resp = ctx.get("/admin/does-not-exist").await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Authenticated
// =============================================================================

#[tokio::test]
async fn test_wrong_role_gets_access_denied() {
    let ctx = TestContext::new().await;
    ctx.login_as("member", None).await;

    let resp = ctx.get("/admin").await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body = resp.text().await.expect("body");
    assert!(body.contains("Access Denied"));
    assert!(body.contains("Administrator"));
}

#[tokio::test]
async fn test_matching_role_sees_content() {
    let ctx = TestContext::new().await;
    ctx.login_as("admin", None).await;

    let resp = ctx.get("/admin").await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("body");
    assert!(body.contains("Administration"));
    assert!(body.contains("Saying No With Confidence"));
}

#[tokio::test]
async fn test_each_role_reaches_only_its_own_dashboard() {
    for (own_path, username) in DASHBOARDS {
        let ctx = TestContext::new().await;
        ctx.login_as(username, None).await;

        for (path, _) in DASHBOARDS {
            let status = ctx.get(path).await.status();
            let expected = if path == own_path {
                StatusCode::OK
            } else {
                StatusCode::FORBIDDEN
            };
            assert_eq!(status, expected, "{username} on {path}");
        }
    }
}

#[tokio::test]
async fn test_admin_does_not_inherit_member_access() {
    let ctx = TestContext::new().await;
    ctx.login_as("admin", None).await;

    let resp = ctx.get("/member/enrollments").await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_repeated_checks_give_the_same_answer() {
    let ctx = TestContext::new().await;
    ctx.login_as("staff", None).await;

    for _ in 0..3 {
        assert_eq!(ctx.get("/staff").await.status(), StatusCode::OK);
        assert_eq!(ctx.get("/manager").await.status(), StatusCode::FORBIDDEN);
    }
}

#[tokio::test]
async fn test_sessions_are_isolated_between_clients() {
    let admin = TestContext::new().await;
    admin.login_as("admin", None).await;

    // Same portal, fresh cookie jar
    let stranger = TestContext {
        client: reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("client"),
        portal_url: admin.portal_url.clone(),
    };

    assert_eq!(admin.get("/admin").await.status(), StatusCode::OK);
    assert!(redirect_location(&stranger.get("/admin").await).starts_with("/login"));
}

#[tokio::test]
async fn test_unreadable_session_counts_as_logged_out() {
    let store = FailingStore::default();
    let ctx = TestContext::with_store(fake_backend::spawn().await, store.clone()).await;
    ctx.login_as("admin", None).await;
    assert_eq!(ctx.get("/admin").await.status(), StatusCode::OK);

    store.fail_loads();
    let resp = ctx.get("/admin").await;

    assert_eq!(redirect_location(&resp), "/login?from=%2Fadmin");
}
