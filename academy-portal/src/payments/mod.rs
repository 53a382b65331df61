//! Hosted checkout providers
//!
//! The portal never sees card data. It turns a cart of program slugs into a
//! provider checkout session and hands the browser the provider's URL.

use async_trait::async_trait;
use thiserror::Error;

pub mod stripe;

pub use stripe::StripeProvider;

/// Payment provider errors
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Checkout is not configured")]
    NotConfigured,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

/// One purchasable line on the hosted page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub slug: String,
    pub name: String,
    pub unit_amount_cents: i64,
    pub quantity: u32,
}

/// Everything a provider needs to open a session
#[derive(Debug, Clone)]
pub struct CheckoutOrder {
    /// Our checkout_sessions.guid, echoed back by the provider
    pub reference: String,
    pub line_items: Vec<LineItem>,
    pub customer_email: Option<String>,
}

impl CheckoutOrder {
    pub fn total_cents(&self) -> i64 {
        self.line_items
            .iter()
            .map(|item| item.unit_amount_cents * i64::from(item.quantity))
            .sum()
    }
}

/// Session created by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSession {
    pub id: String,
    pub url: String,
}

/// Creates hosted checkout sessions
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Provider identifier for logs
    fn name(&self) -> &'static str;

    async fn create_checkout_session(
        &self,
        order: &CheckoutOrder,
    ) -> Result<ProviderSession, PaymentError>;
}

/// Stand-in used when no provider key is configured
#[derive(Debug, Default)]
pub struct DisabledProvider;

#[async_trait]
impl PaymentProvider for DisabledProvider {
    fn name(&self) -> &'static str {
        "disabled"
    }

    async fn create_checkout_session(
        &self,
        _order: &CheckoutOrder,
    ) -> Result<ProviderSession, PaymentError> {
        Err(PaymentError::NotConfigured)
    }
}
