use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::domain::AnswerSubmission;
use super::repository::{TagStatsRepository, UserWeightStore};
use super::service::{AnswerScoringService, AnswerServiceError};

/// Router builder exposing the answer-scoring endpoint.
pub fn answer_router<S, U>(service: Arc<AnswerScoringService<S, U>>) -> Router
where
    S: TagStatsRepository + 'static,
    U: UserWeightStore + 'static,
{
    Router::new()
        .route("/api/v1/tagging/answers", post(score_handler::<S, U>))
        .with_state(service)
}

pub(crate) async fn score_handler<S, U>(
    State(service): State<Arc<AnswerScoringService<S, U>>>,
    axum::Json(submission): axum::Json<AnswerSubmission>,
) -> Response
where
    S: TagStatsRepository + 'static,
    U: UserWeightStore + 'static,
{
    match service.score_submission(submission) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(AnswerServiceError::Submission(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(AnswerServiceError::UnknownUser(user)) => {
            let payload = json!({
                "error": format!("user id {:?} not found", user.0),
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
