//! Checkout session tests with a recording payment provider

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::util::ServiceExt;

use academy_portal::db::checkout::count_sessions;
use academy_portal::db::init_database;
use academy_portal::payments::{
    CheckoutOrder, DisabledProvider, PaymentError, PaymentProvider, ProviderSession,
};
use academy_portal::{build_router, AppState};

/// Records every order and answers with a canned session
#[derive(Default)]
struct RecordingProvider {
    orders: Mutex<Vec<CheckoutOrder>>,
    fail_with: Option<u16>,
}

#[async_trait]
impl PaymentProvider for RecordingProvider {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn create_checkout_session(
        &self,
        order: &CheckoutOrder,
    ) -> Result<ProviderSession, PaymentError> {
        self.orders.lock().unwrap().push(order.clone());
        if let Some(status) = self.fail_with {
            return Err(PaymentError::Rejected {
                status,
                message: "card_declined".to_string(),
            });
        }
        Ok(ProviderSession {
            id: "cs_test_123".to_string(),
            url: "https://checkout.example.com/c/cs_test_123".to_string(),
        })
    }
}

async fn setup(provider: Arc<dyn PaymentProvider>) -> (TempDir, SqlitePool, axum::Router) {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("academy.db")).await.unwrap();
    let state = AppState::new(pool.clone(), 0, provider);
    (dir, pool, build_router(state))
}

fn checkout(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/checkout/session")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_checkout_creates_session() {
    let provider = Arc::new(RecordingProvider::default());
    let (_dir, pool, app) = setup(provider.clone()).await;

    let response = app
        .oneshot(checkout(json!({
            "productIds": ["performance-lab", "skills-lab", "performance-lab"],
            "email": "Parent@Example.com"
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["session_id"], "cs_test_123");
    assert_eq!(body["url"], "https://checkout.example.com/c/cs_test_123");

    let orders = provider.orders.lock().unwrap();
    assert_eq!(orders.len(), 1);
    let order = &orders[0];
    assert_eq!(order.line_items.len(), 2);
    assert_eq!(order.line_items[0].slug, "performance-lab");
    assert_eq!(order.line_items[0].quantity, 2);
    assert_eq!(order.line_items[0].unit_amount_cents, 24_500);
    assert_eq!(order.total_cents(), 2 * 24_500 + 1_000);
    assert_eq!(order.customer_email.as_deref(), Some("parent@example.com"));
    drop(orders);

    assert_eq!(count_sessions(&pool).await.unwrap(), 1);
}

#[tokio::test]
async fn test_blank_email_and_stored_slugs_are_normalized() {
    let provider = Arc::new(RecordingProvider::default());
    let (_dir, pool, app) = setup(provider.clone()).await;

    let response = app
        .oneshot(checkout(json!({
            "product_ids": [" skills-lab ", "performance-lab", "skills-lab"],
            "email": ""
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let orders = provider.orders.lock().unwrap();
    assert!(orders[0].customer_email.is_none());
    assert_eq!(orders[0].line_items[0].quantity, 2);
    drop(orders);

    let (slugs, email): (String, Option<String>) =
        sqlx::query_as("SELECT program_slugs, customer_email FROM checkout_sessions")
            .fetch_one(&pool)
            .await
            .unwrap();
    let slugs: Vec<String> = serde_json::from_str(&slugs).unwrap();
    assert_eq!(slugs, vec!["skills-lab", "skills-lab", "performance-lab"]);
    assert!(email.is_none());
}

#[tokio::test]
async fn test_empty_cart_rejected_before_provider() {
    let provider = Arc::new(RecordingProvider::default());
    let (_dir, _pool, app) = setup(provider.clone()).await;

    let response = app
        .oneshot(checkout(json!({"product_ids": []})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(provider.orders.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_oversized_cart_rejected() {
    let provider = Arc::new(RecordingProvider::default());
    let (_dir, _pool, app) = setup(provider.clone()).await;

    let ids: Vec<&str> = std::iter::repeat("skills-lab").take(11).collect();
    let response = app
        .oneshot(checkout(json!({"product_ids": ids})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(provider.orders.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_program_rejected() {
    let provider = Arc::new(RecordingProvider::default());
    let (_dir, _pool, app) = setup(provider.clone()).await;

    let response = app
        .oneshot(checkout(json!({"product_ids": ["skills-lab", "archery"]})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["fields"][0]["field"], "product_ids");
    assert!(provider.orders.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_disabled_provider_is_503() {
    let (_dir, pool, app) = setup(Arc::new(DisabledProvider)).await;

    let response = app
        .oneshot(checkout(json!({"product_ids": ["skills-lab"]})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(count_sessions(&pool).await.unwrap(), 0);
}

#[tokio::test]
async fn test_provider_rejection_is_502() {
    let provider = Arc::new(RecordingProvider {
        fail_with: Some(402),
        ..Default::default()
    });
    let (_dir, pool, app) = setup(provider).await;

    let response = app
        .oneshot(checkout(json!({"product_ids": ["private-training"]})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(count_sessions(&pool).await.unwrap(), 0);
}
