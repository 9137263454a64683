//! Login, profile and logout through the storefront.

#![allow(clippy::unwrap_used)]

use std::sync::atomic::Ordering;

use bazaar_integration_tests::{
    FakeApi, Storefront, USER_EMAIL, USER_PASSWORD, VALID_RESET_TOKEN, location,
    unreachable_api_url,
};
use reqwest::{StatusCode, header, multipart};

#[tokio::test]
async fn test_login_sets_token_cookie_and_lands_home() {
    let api = FakeApi::spawn().await;
    let storefront = Storefront::spawn(&api.base_url).await;

    let response = storefront.login(USER_EMAIL, USER_PASSWORD).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/"));
    let cookies: Vec<&str> = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();
    assert!(cookies.iter().any(|c| c.starts_with("accessToken=tok-user")));
    assert!(cookies.iter().any(|c| c.contains("HttpOnly")));

    let home = storefront.get("/").await.text().await.unwrap();
    assert!(home.contains("Ada Lovelace"));
}

#[tokio::test]
async fn test_failed_login_rerenders_form_with_error() {
    let api = FakeApi::spawn().await;
    let storefront = Storefront::spawn(&api.base_url).await;

    let response = storefront.login(USER_EMAIL, "nope").await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.text().await.unwrap();
    assert!(body.contains("Invalid email or password"));
    assert!(body.contains(USER_EMAIL));
}

#[tokio::test]
async fn test_login_when_api_is_down() {
    let storefront = Storefront::spawn(&unreachable_api_url().await).await;

    let response = storefront.login(USER_EMAIL, USER_PASSWORD).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_register_logs_new_user_in() {
    let api = FakeApi::spawn().await;
    let storefront = Storefront::spawn(&api.base_url).await;

    let response = storefront
        .post_form(
            "/register",
            &[
                ("name", "Grace Hopper"),
                ("email", "grace@example.com"),
                ("password", "cobol1959"),
                ("password_confirm", "cobol1959"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let profile = storefront.get("/account/profile").await;
    assert_eq!(profile.status(), StatusCode::OK);
    assert!(profile.text().await.unwrap().contains("Grace Hopper"));
}

#[tokio::test]
async fn test_profile_requires_login() {
    let api = FakeApi::spawn().await;
    let storefront = Storefront::spawn(&api.base_url).await;

    let response = storefront.get("/account/profile").await;

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), Some("/login"));
}

#[tokio::test]
async fn test_profile_update_refreshes_session_user() {
    let api = FakeApi::spawn().await;
    let storefront = Storefront::spawn(&api.base_url).await;
    storefront.login(USER_EMAIL, USER_PASSWORD).await;

    let form = multipart::Form::new()
        .text("name", "Ada King")
        .text("email", "")
        .text("city", "London");
    let response = storefront
        .client
        .post(storefront.url("/account/profile"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("Profile updated"));
    assert_eq!(
        *api.recorded.profile_fields.lock().await,
        ["name", "address"]
    );

    let page = storefront.get("/account/profile").await.text().await.unwrap();
    assert!(page.contains("Ada King"));
    assert!(page.contains("London"));
}

#[tokio::test]
async fn test_logout_clears_session_and_cookie() {
    let api = FakeApi::spawn().await;
    let storefront = Storefront::spawn(&api.base_url).await;
    storefront.login(USER_EMAIL, USER_PASSWORD).await;

    let response = storefront.post_form("/logout", &[]).await;

    assert_eq!(location(&response), Some("/login?notice=logged-out"));
    assert_eq!(api.recorded.logouts.load(Ordering::SeqCst), 1);
    let profile = storefront.get("/account/profile").await;
    assert_eq!(location(&profile), Some("/login"));
    let login = storefront.get("/login").await;
    assert_eq!(login.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_logout_clears_session_when_remote_fails() {
    let api = FakeApi::spawn().await;
    api.recorded.fail_logout.store(true, Ordering::SeqCst);
    let storefront = Storefront::spawn(&api.base_url).await;
    storefront.login(USER_EMAIL, USER_PASSWORD).await;

    let response = storefront.post_form("/logout", &[]).await;

    assert_eq!(location(&response), Some("/login?notice=logged-out"));
    let profile = storefront.get("/account/profile").await;
    assert_eq!(location(&profile), Some("/login"));
}

#[tokio::test]
async fn test_reset_password_redirects_to_login_with_notice() {
    let api = FakeApi::spawn().await;
    let storefront = Storefront::spawn(&api.base_url).await;

    let response = storefront
        .post_form(
            "/reset-password",
            &[
                ("token", VALID_RESET_TOKEN),
                ("password", "brand-new-pass"),
                ("password_confirm", "brand-new-pass"),
            ],
        )
        .await;
    assert_eq!(location(&response), Some("/login?notice=password-reset"));

    let login = storefront
        .get("/login?notice=password-reset")
        .await
        .text()
        .await
        .unwrap();
    assert!(login.contains("Your password has been reset."));
}

#[tokio::test]
async fn test_reset_page_without_token_goes_to_forgot_password() {
    let api = FakeApi::spawn().await;
    let storefront = Storefront::spawn(&api.base_url).await;

    let response = storefront.get("/reset-password").await;

    assert_eq!(location(&response), Some("/forgot-password"));
}
