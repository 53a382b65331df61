//! Lead intake and the admin lead listing

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use academy_common::api::types::{Lead, LeadRequest, LeadResponse, Page, RecommendationView};
use academy_common::recommend;

use super::extract::{ApiJson, ApiQuery};
use crate::db::leads as store;
use crate::pagination::Pagination;
use crate::{ApiResult, AppState};

/// POST /api/leads
///
/// When quiz answers accompany the form, the recommendation is computed here
/// and stored with the lead so the dashboard shows what the family saw.
pub async fn submit_lead(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LeadRequest>,
) -> ApiResult<(StatusCode, Json<LeadResponse>)> {
    request.validate()?;

    let recommendation = request
        .quiz
        .map(|q| recommend(q.age, q.sport, q.goal));

    let id = store::insert_lead(&state.db, &request, recommendation.map(|r| r.slug)).await?;
    info!(
        lead_id = %id,
        recommended = recommendation.map(|r| r.slug.as_str()).unwrap_or("-"),
        "Lead received"
    );

    Ok((
        StatusCode::CREATED,
        Json(LeadResponse {
            id,
            recommendation: recommendation.map(RecommendationView::from),
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct LeadListQuery {
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}

/// GET /api/admin/leads?page=N (newest first)
pub async fn list_leads(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<LeadListQuery>,
) -> ApiResult<Json<Page<Lead>>> {
    let total = store::count_leads(&state.db).await?;
    let pagination = Pagination::new(total, query.page);
    let items = store::list_leads(&state.db, pagination.page_size, pagination.offset()).await?;
    Ok(Json(pagination.into_page(items)))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/leads", post(submit_lead))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/api/admin/leads", get(list_leads))
}
