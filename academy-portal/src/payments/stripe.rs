//! Stripe Checkout client
//!
//! Creates `mode=payment` Checkout Sessions through the form-encoded REST API.
//! Each program becomes an inline `price_data` line item, so no products need
//! to exist in the Stripe dashboard.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{CheckoutOrder, PaymentError, PaymentProvider, ProviderSession};
use academy_common::config::PaymentConfig;

const USER_AGENT: &str = concat!("academy-portal/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorPayload,
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    message: Option<String>,
}

/// Stripe API client
pub struct StripeProvider {
    http_client: reqwest::Client,
    secret_key: String,
    api_base: String,
    success_url: String,
    cancel_url: String,
    currency: String,
}

impl StripeProvider {
    pub fn new(secret_key: String, config: &PaymentConfig) -> Result<Self, PaymentError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| PaymentError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            secret_key,
            api_base: config.stripe_api_base.trim_end_matches('/').to_string(),
            success_url: config.success_url.clone(),
            cancel_url: config.cancel_url.clone(),
            currency: config.currency.clone(),
        })
    }

    /// Form fields for `POST /v1/checkout/sessions`
    pub fn form_params(&self, order: &CheckoutOrder) -> Vec<(String, String)> {
        let mut params = vec![
            ("mode".to_string(), "payment".to_string()),
            ("success_url".to_string(), self.success_url.clone()),
            ("cancel_url".to_string(), self.cancel_url.clone()),
            ("client_reference_id".to_string(), order.reference.clone()),
        ];

        if let Some(email) = &order.customer_email {
            params.push(("customer_email".to_string(), email.clone()));
        }

        let slugs: Vec<&str> = order.line_items.iter().map(|i| i.slug.as_str()).collect();
        params.push(("metadata[program_slugs]".to_string(), slugs.join(",")));

        for (i, item) in order.line_items.iter().enumerate() {
            let prefix = format!("line_items[{}]", i);
            params.push((format!("{}[price_data][currency]", prefix), self.currency.clone()));
            params.push((
                format!("{}[price_data][product_data][name]", prefix),
                item.name.clone(),
            ));
            params.push((
                format!("{}[price_data][unit_amount]", prefix),
                item.unit_amount_cents.to_string(),
            ));
            params.push((format!("{}[quantity]", prefix), item.quantity.to_string()));
        }

        params
    }
}

#[async_trait]
impl PaymentProvider for StripeProvider {
    fn name(&self) -> &'static str {
        "stripe"
    }

    async fn create_checkout_session(
        &self,
        order: &CheckoutOrder,
    ) -> Result<ProviderSession, PaymentError> {
        let url = format!("{}/v1/checkout/sessions", self.api_base);
        debug!(reference = %order.reference, "Creating Stripe checkout session");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(&self.form_params(order))
            .send()
            .await
            .map_err(|e| PaymentError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .ok()
                .and_then(|e| e.error.message)
                .unwrap_or_else(|| status.to_string());
            warn!(status = status.as_u16(), "Stripe rejected checkout: {}", message);
            return Err(PaymentError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let session: SessionResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::Parse(e.to_string()))?;

        let url = session
            .url
            .ok_or_else(|| PaymentError::Parse("session has no redirect url".to_string()))?;

        Ok(ProviderSession { id: session.id, url })
    }
}
