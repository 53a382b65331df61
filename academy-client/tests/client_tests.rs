//! Client-side checks that must hold without a running portal

use academy_client::{ClientError, PortalClient};

/// Nothing listens here; any request that escapes fails with `Http`
const UNREACHABLE: &str = "http://127.0.0.1:9";

#[tokio::test]
async fn test_empty_cart_rejected_before_network() {
    let client = PortalClient::new(UNREACHABLE).unwrap();

    let result = client.create_checkout(vec![], None).await;
    assert!(matches!(result, Err(ClientError::EmptyCart)));
}

#[tokio::test]
async fn test_oversized_cart_rejected_locally() {
    let client = PortalClient::new(UNREACHABLE).unwrap();

    let ids = vec!["skills-lab".to_string(); 11];
    let result = client.create_checkout(ids, None).await;
    assert!(matches!(result, Err(ClientError::Validation(_))));
}

#[tokio::test]
async fn test_non_empty_cart_reaches_network() {
    let client = PortalClient::new(UNREACHABLE).unwrap();

    let result = client
        .create_checkout(vec!["skills-lab".to_string()], None)
        .await;
    assert!(matches!(result, Err(ClientError::Http(_))));
}
