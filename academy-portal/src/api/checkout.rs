//! Hosted checkout session creation
//!
//! The cart is a list of program slugs. Repeated slugs become one line item
//! with a larger quantity. Prices always come from the database, never from
//! the request.

use axum::{extract::State, routing::post, Json, Router};
use tracing::{info, warn};

use academy_common::api::types::{CheckoutRequest, CheckoutResponse, Program};
use academy_common::FieldError;

use super::extract::ApiJson;
use crate::db::checkout::{insert_session, NewCheckoutSession};
use crate::db::{new_guid, programs as program_store};
use crate::payments::{CheckoutOrder, LineItem, PaymentError};
use crate::{ApiError, ApiResult, AppState};

/// Collapse repeated slugs, keeping first-seen order
fn group_slugs(product_ids: &[String]) -> Vec<(String, u32)> {
    let mut grouped: Vec<(String, u32)> = Vec::new();
    for id in product_ids {
        let slug = id.trim();
        match grouped.iter_mut().find(|(s, _)| s == slug) {
            Some((_, qty)) => *qty += 1,
            None => grouped.push((slug.to_string(), 1)),
        }
    }
    grouped
}

fn build_line_items(
    grouped: &[(String, u32)],
    programs: &[Program],
) -> Result<Vec<LineItem>, ApiError> {
    let mut missing = Vec::new();
    let mut items = Vec::with_capacity(grouped.len());

    for (slug, quantity) in grouped {
        match programs.iter().find(|p| &p.slug == slug) {
            Some(program) => items.push(LineItem {
                slug: program.slug.clone(),
                name: program.name.clone(),
                unit_amount_cents: program.price_cents,
                quantity: *quantity,
            }),
            None => missing.push(slug.as_str()),
        }
    }

    if !missing.is_empty() {
        return Err(ApiError::Validation(vec![FieldError::new(
            "product_ids",
            format!("unknown program: {}", missing.join(", ")),
        )]));
    }
    Ok(items)
}

/// One trimmed slug per unit charged, in line item order
fn charged_slugs(items: &[LineItem]) -> Vec<String> {
    items
        .iter()
        .flat_map(|item| std::iter::repeat(item.slug.clone()).take(item.quantity as usize))
        .collect()
}

/// POST /api/checkout/session
pub async fn create_session(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CheckoutRequest>,
) -> ApiResult<Json<CheckoutResponse>> {
    request.validate()?;

    let grouped = group_slugs(&request.product_ids);
    let slugs: Vec<String> = grouped.iter().map(|(s, _)| s.clone()).collect();
    let programs = program_store::find_active_by_slugs(&state.db, &slugs).await?;
    let line_items = build_line_items(&grouped, &programs)?;

    let customer_email = request.normalized_email();

    let order = CheckoutOrder {
        reference: new_guid(),
        line_items,
        customer_email,
    };

    let session = state
        .payments
        .create_checkout_session(&order)
        .await
        .map_err(|e| match e {
            PaymentError::NotConfigured => {
                ApiError::PaymentUnavailable("Online checkout is not available".to_string())
            }
            other => {
                warn!(provider = state.payments.name(), "Checkout failed: {}", other);
                ApiError::Upstream(other.to_string())
            }
        })?;

    let amount_cents = order.total_cents();
    let program_slugs = charged_slugs(&order.line_items);
    insert_session(
        &state.db,
        &NewCheckoutSession {
            guid: &order.reference,
            provider_session_id: &session.id,
            program_slugs: &program_slugs,
            customer_email: order.customer_email.as_deref(),
            amount_cents,
            url: &session.url,
        },
    )
    .await?;

    info!(
        provider = state.payments.name(),
        session_id = %session.id,
        amount_cents,
        "Checkout session created"
    );

    Ok(Json(CheckoutResponse {
        session_id: session.id,
        url: session.url,
    }))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/checkout/session", post(create_session))
}
