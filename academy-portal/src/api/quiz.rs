//! Quiz recommendation endpoint

use axum::{routing::post, Json, Router};

use academy_common::api::types::{QuizAnswers, RecommendationView};
use academy_common::recommend;

use super::extract::ApiJson;
use crate::AppState;

/// POST /api/quiz/recommend
///
/// Pure rule evaluation; nothing is stored. Leads carry their own answers.
pub async fn recommend_program(
    ApiJson(answers): ApiJson<QuizAnswers>,
) -> Json<RecommendationView> {
    Json(recommend(answers.age, answers.sport, answers.goal).into())
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/quiz/recommend", post(recommend_program))
}
