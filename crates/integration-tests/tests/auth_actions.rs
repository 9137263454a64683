//! Auth actions against the fake remote API.

#![allow(clippy::unwrap_used)]

use std::sync::atomic::Ordering;

use bazaar_core::{AccessToken, Role};
use bazaar_integration_tests::{
    FakeApi, USER_EMAIL, USER_PASSWORD, VALID_RESET_TOKEN, unreachable_api_url,
};
use bazaar_storefront::api::{
    ApiClient, ErrorKind, ForgotPasswordForm, LoginForm, ProfileForm, RegisterForm,
    ResetPasswordForm,
};
use bazaar_storefront::config::ApiConfig;

fn login_form(email: &str, password: &str) -> LoginForm {
    LoginForm {
        email: email.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn test_login_success_copies_user_and_token() {
    let api = FakeApi::spawn().await;

    let result = api
        .client()
        .login_user(&login_form(USER_EMAIL, USER_PASSWORD))
        .await;

    assert!(result.success);
    assert_eq!(result.message.as_deref(), Some("Logged in"));
    let auth = result.data.unwrap();
    assert_eq!(auth.access_token.expose(), "tok-user");
    assert_eq!(auth.user.email.as_str(), USER_EMAIL);
    assert_eq!(auth.user.role, Role::User);
}

#[tokio::test]
async fn test_login_rejected_is_a_failed_result() {
    let api = FakeApi::spawn().await;

    let result = api
        .client()
        .login_user(&login_form(USER_EMAIL, "wrong"))
        .await;

    assert!(!result.success);
    assert!(result.data.is_none());
    assert_eq!(result.kind, Some(ErrorKind::Client));
    assert_eq!(result.error.as_deref(), Some("Invalid email or password"));
}

#[tokio::test]
async fn test_unreachable_api_is_a_network_failure() {
    let url = unreachable_api_url().await;
    let config = ApiConfig::new(&url, std::time::Duration::from_secs(2)).unwrap();
    let client = ApiClient::new(&config).unwrap();

    let result = client
        .login_user(&login_form(USER_EMAIL, USER_PASSWORD))
        .await;

    assert!(!result.success);
    assert_eq!(result.kind, Some(ErrorKind::Network));
}

#[tokio::test]
async fn test_register_sends_fixed_role_and_honors_misspelled_flag() {
    let api = FakeApi::spawn().await;
    let form = RegisterForm {
        name: "Grace Hopper".to_string(),
        email: "grace@example.com".to_string(),
        password: "cobol1959".to_string(),
        password_confirm: Some("cobol1959".to_string()),
    };

    let result = api.client().register_user(&form).await;

    assert!(result.success);
    assert_eq!(result.data.unwrap().user.name, "Grace Hopper");
    let sent = api.recorded.register_fields.lock().await.clone();
    let names: Vec<&str> = sent.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, ["name", "email", "password", "role"]);
    assert!(sent.contains(&("role".to_string(), "user".to_string())));
}

#[tokio::test]
async fn test_register_duplicate_email_reports_field_error() {
    let api = FakeApi::spawn().await;
    let form = RegisterForm {
        name: "Ada".to_string(),
        email: USER_EMAIL.to_string(),
        password: "whatever1".to_string(),
        password_confirm: None,
    };

    let result = api.client().register_user(&form).await;

    assert!(!result.success);
    assert_eq!(result.field_error("email"), Some("Email already registered"));
}

#[tokio::test]
async fn test_register_confirm_mismatch_never_reaches_api() {
    let api = FakeApi::spawn().await;
    let form = RegisterForm {
        name: "Ada".to_string(),
        email: "new@example.com".to_string(),
        password: "one-password".to_string(),
        password_confirm: Some("another".to_string()),
    };

    let result = api.client().register_user(&form).await;

    assert!(!result.success);
    assert!(result.field_error("password_confirm").is_some());
    assert_eq!(api.request_count(), 0);
}

#[tokio::test]
async fn test_logout_without_token_makes_no_request() {
    let api = FakeApi::spawn().await;

    let result = api.client().logout_user(None).await;

    assert!(!result.success);
    assert_eq!(result.kind, Some(ErrorKind::Unauthenticated));
    assert_eq!(api.request_count(), 0);
}

#[tokio::test]
async fn test_logout_sends_bearer_token() {
    let api = FakeApi::spawn().await;
    let token = AccessToken::new("tok-user");

    let result = api.client().logout_user(Some(&token)).await;

    assert!(result.success);
    assert_eq!(api.recorded.logouts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_profile_update_sends_only_populated_fields() {
    let api = FakeApi::spawn().await;
    let token = AccessToken::new("tok-user");
    let form = ProfileForm {
        name: Some("Ada King".to_string()),
        email: Some("   ".to_string()),
        ..ProfileForm::default()
    };

    let result = api.client().update_user_profile(&form, Some(&token)).await;

    assert!(result.success);
    assert_eq!(result.data.unwrap().name, "Ada King");
    assert_eq!(*api.recorded.profile_fields.lock().await, ["name"]);
}

#[tokio::test]
async fn test_profile_update_sends_address_as_one_field() {
    let api = FakeApi::spawn().await;
    let token = AccessToken::new("tok-user");
    let mut form = ProfileForm::default();
    form.address.city = Some("London".to_string());

    let result = api.client().update_user_profile(&form, Some(&token)).await;

    assert!(result.success);
    assert_eq!(*api.recorded.profile_fields.lock().await, ["address"]);
    let address = result.data.unwrap().address.unwrap();
    assert_eq!(address.city.as_deref(), Some("London"));
    assert!(address.street.is_none());
}

#[tokio::test]
async fn test_profile_update_without_token_makes_no_request() {
    let api = FakeApi::spawn().await;
    let form = ProfileForm {
        name: Some("Ada".to_string()),
        ..ProfileForm::default()
    };

    let result = api.client().update_user_profile(&form, None).await;

    assert!(!result.success);
    assert_eq!(result.kind, Some(ErrorKind::Unauthenticated));
    assert_eq!(api.request_count(), 0);
}

#[tokio::test]
async fn test_password_reset_flow() {
    let api = FakeApi::spawn().await;
    let client = api.client();

    let requested = client
        .request_password_reset(&ForgotPasswordForm {
            email: USER_EMAIL.to_string(),
        })
        .await;
    assert!(requested.success);
    assert_eq!(
        requested.message.as_deref(),
        Some("Check your inbox for a reset link.")
    );

    let expired = client
        .reset_password(&ResetPasswordForm {
            token: "stale".to_string(),
            password: "new-password".to_string(),
            password_confirm: None,
        })
        .await;
    assert!(!expired.success);
    assert_eq!(expired.error.as_deref(), Some("Reset link has expired"));

    let reset = client
        .reset_password(&ResetPasswordForm {
            token: VALID_RESET_TOKEN.to_string(),
            password: "new-password".to_string(),
            password_confirm: Some("new-password".to_string()),
        })
        .await;
    assert!(reset.success);
}
