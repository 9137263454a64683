//! Admin dashboard access and status changes.

#![allow(clippy::unwrap_used)]

use bazaar_integration_tests::{
    ADMIN_EMAIL, ADMIN_PASSWORD, FakeApi, Storefront, USER_EMAIL, USER_PASSWORD, location,
};
use reqwest::StatusCode;

async fn admin_storefront() -> (FakeApi, Storefront) {
    let api = FakeApi::spawn().await;
    let storefront = Storefront::spawn(&api.base_url).await;
    let response = storefront.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    assert_eq!(location(&response), Some("/dashboard"));
    (api, storefront)
}

#[tokio::test]
async fn test_anonymous_is_sent_to_login() {
    let api = FakeApi::spawn().await;
    let storefront = Storefront::spawn(&api.base_url).await;

    for path in ["/dashboard", "/dashboard/orders", "/dashboard/reviews"] {
        let response = storefront.get(path).await;
        assert_eq!(location(&response), Some("/login"), "{path}");
    }
}

#[tokio::test]
async fn test_customer_is_forbidden() {
    let api = FakeApi::spawn().await;
    let storefront = Storefront::spawn(&api.base_url).await;
    storefront.login(USER_EMAIL, USER_PASSWORD).await;

    let response = storefront.get("/dashboard").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = storefront
        .post_form("/dashboard/orders/ord_1004/status", &[("status", "processing")])
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_sees_every_screen() {
    let (_api, storefront) = admin_storefront().await;

    for path in [
        "/dashboard",
        "/dashboard/users",
        "/dashboard/products",
        "/dashboard/orders",
        "/dashboard/orders?status=pending",
        "/dashboard/orders/ord_1001",
        "/dashboard/reviews",
        "/dashboard/reviews?status=pending",
    ] {
        let response = storefront.get(path).await;
        assert_eq!(response.status(), StatusCode::OK, "{path}");
    }
}

#[tokio::test]
async fn test_unknown_filter_and_order() {
    let (_api, storefront) = admin_storefront().await;

    let response = storefront.get("/dashboard/orders?status=lost").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = storefront.get("/dashboard/orders/ord_9999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_order_moves_forward() {
    let (_api, storefront) = admin_storefront().await;

    let response = storefront
        .post_form("/dashboard/orders/ord_1004/status", &[("status", "processing")])
        .await;
    assert_eq!(location(&response), Some("/dashboard/orders/ord_1004"));

    let page = storefront
        .get("/dashboard/orders?status=processing")
        .await
        .text()
        .await
        .unwrap();
    assert!(page.contains("ord_1004"));
}

#[tokio::test]
async fn test_illegal_order_move_is_a_conflict_and_changes_nothing() {
    let (_api, storefront) = admin_storefront().await;

    let response = storefront
        .post_form("/dashboard/orders/ord_1001/status", &[("status", "pending")])
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = response.text().await.unwrap();
    assert!(body.contains("cannot move order from delivered to pending"));

    let page = storefront
        .get("/dashboard/orders?status=delivered")
        .await
        .text()
        .await
        .unwrap();
    assert!(page.contains("ord_1001"));
}

#[tokio::test]
async fn test_review_moderation() {
    let (_api, storefront) = admin_storefront().await;

    let response = storefront
        .post_form("/dashboard/reviews/rev_502/status", &[("status", "approved")])
        .await;
    assert_eq!(location(&response), Some("/dashboard/reviews"));

    let response = storefront
        .post_form("/dashboard/reviews/rev_501/status", &[("status", "pending")])
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
