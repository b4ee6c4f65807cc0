//! Backend client behavior on authorization failures

mod common;

use adlens_core::credentials::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use adlens_core::session::SessionProfile;
use adlens_core::{ApiError, Router, View};
use chrono::Duration;
use common::{ProfileMode, RefreshMode, TestServer, mint_token};
use serde::Deserialize;
use tokio_test::{assert_err, assert_ok};

#[derive(Debug, Deserialize)]
struct AdAccount {
    id: String,
    name: String,
}

fn sign_in(server: &TestServer) -> adlens_core::SessionLifecycle {
    let lc = server.lifecycle();
    let creds = lc.api().credentials();
    creds.write(
        ACCESS_TOKEN_COOKIE,
        &mint_token(Duration::hours(1), "li-42", "u-42"),
    );
    creds.write(REFRESH_TOKEN_COOKIE, "refresh-1");
    lc.api().session().establish(SessionProfile {
        email: "ada@example.com".to_string(),
        account_id: "508123456".to_string(),
        linkedin_id: "li-42".to_string(),
        user_id: "u-42".to_string(),
    });
    lc
}

#[tokio::test]
async fn unauthorized_off_entry_view_forces_logout() {
    let server = TestServer::spawn(ProfileMode::Unauthorized, RefreshMode::Body).await;
    let lc = sign_in(&server);
    let api = lc.api();
    api.navigator().replace(View::History);

    let result = api.user_profile().await;

    assert!(matches!(result, Err(ApiError::Unauthorized)));
    assert!(!api.session().is_logged_in());
    assert_eq!(api.credentials().access_token(), None);
    assert_eq!(api.credentials().refresh_token(), None);
    assert_eq!(api.navigator().current(), View::Index);
}

#[tokio::test]
async fn forced_logout_clears_server_set_cookie() {
    let server = TestServer::spawn(ProfileMode::Ok, RefreshMode::SetCookieDefaultPath).await;
    let lc = server.lifecycle();
    lc.api().credentials().write(
        ACCESS_TOKEN_COOKIE,
        &mint_token(-Duration::minutes(5), "li-old", "u-old"),
    );
    assert!(lc.check_auth_status().await.is_authenticated());

    let api = lc.api();
    api.navigator().replace(View::History);
    server.backend.set_profile_mode(ProfileMode::Unauthorized);

    let result = api.user_profile().await;

    assert!(matches!(result, Err(ApiError::Unauthorized)));
    assert_eq!(api.credentials().access_token(), None);
    assert_eq!(api.navigator().current(), View::Index);

    // Nothing left in the store for the next request to carry
    let _ = api.user_profile().await;
    let cookie = server.backend.last_cookie().unwrap_or_default();
    assert!(!cookie.contains("accessToken="));
}

#[tokio::test]
async fn unauthorized_on_entry_view_is_only_returned() {
    let server = TestServer::spawn(ProfileMode::Unauthorized, RefreshMode::Body).await;
    let lc = sign_in(&server);
    let api = lc.api();
    assert_eq!(api.navigator().current(), View::Index);

    let result = api.user_profile().await;

    assert!(matches!(result, Err(ApiError::Unauthorized)));
    assert!(api.session().is_logged_in());
    assert!(api.credentials().access_token().is_some());
    assert_eq!(api.credentials().refresh_token().as_deref(), Some("refresh-1"));
    assert_eq!(api.navigator().current(), View::Index);
}

#[tokio::test]
async fn repeated_unauthorized_settles_on_entry_view() {
    let server = TestServer::spawn(ProfileMode::Unauthorized, RefreshMode::Body).await;
    let lc = sign_in(&server);
    let api = lc.api();
    api.navigator().replace(View::Profile);

    for _ in 0..3 {
        let result = api.user_profile().await;
        assert!(result.unwrap_err().is_unauthorized());
        assert_eq!(api.navigator().current(), View::Index);
    }
    assert_eq!(server.backend.profile_calls(), 3);
}

#[tokio::test]
async fn guarded_navigation_after_forced_logout() {
    let server = TestServer::spawn(ProfileMode::Unauthorized, RefreshMode::Body).await;
    let lc = sign_in(&server);
    let api = lc.api();
    let router = Router::new(api.session().clone(), api.navigator().clone());

    assert_eq!(router.push(View::History), View::History);
    let _ = api.user_profile().await;
    assert_eq!(router.current(), View::Index);

    assert_eq!(router.push(View::Profile), View::Index);
}

#[tokio::test]
async fn server_error_is_not_a_logout() {
    let server = TestServer::spawn(ProfileMode::ServerError, RefreshMode::Body).await;
    let lc = sign_in(&server);
    let api = lc.api();
    api.navigator().replace(View::History);

    let err = assert_err!(api.user_profile().await);

    match err {
        ApiError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "database unavailable");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(api.session().is_logged_in());
    assert!(api.credentials().access_token().is_some());
    assert_eq!(api.navigator().current(), View::History);
}

#[tokio::test]
async fn requests_carry_session_cookies() {
    let server = TestServer::spawn(ProfileMode::Ok, RefreshMode::Body).await;
    let lc = sign_in(&server);
    let api = lc.api();

    let accounts: Vec<AdAccount> = assert_ok!(api.get_json("/ad-accounts").await);

    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[0].id, "508123456");
    assert_eq!(accounts[1].name, "Lead Gen EMEA");

    let cookie = server.backend.last_cookie().unwrap_or_default();
    assert!(cookie.contains("accessToken="));
    assert!(cookie.contains("refreshToken=refresh-1"));
}

#[tokio::test]
async fn refresh_writes_body_token_to_jar() {
    let server = TestServer::spawn(ProfileMode::Ok, RefreshMode::Body).await;
    let lc = server.lifecycle();
    let api = lc.api();
    api.credentials().write(REFRESH_TOKEN_COOKIE, "refresh-1");

    let refreshed = assert_ok!(api.refresh_token().await);

    assert_eq!(
        refreshed.access_token.as_deref(),
        Some(server.backend.fresh_token.as_str())
    );
    assert_eq!(
        api.credentials().access_token().as_deref(),
        Some(server.backend.fresh_token.as_str())
    );
    let cookie = server.backend.last_cookie().unwrap_or_default();
    assert!(cookie.contains("refreshToken=refresh-1"));
}

#[tokio::test]
async fn post_json_decodes_reply() {
    let server = TestServer::spawn(ProfileMode::Ok, RefreshMode::Body).await;
    let lc = server.lifecycle();

    let reply: serde_json::Value = assert_ok!(
        lc.api()
            .post_json("/refresh-token", &serde_json::json!({ "reason": "manual" }))
            .await
    );

    assert_eq!(reply["accessToken"], server.backend.fresh_token.as_str());
    assert_eq!(server.backend.refresh_calls(), 1);
}
