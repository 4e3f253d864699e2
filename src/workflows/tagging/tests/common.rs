use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::workflows::tagging::domain::{
    AnswerSubmission, ImageId, ShownImage, TaggedImage, TrialAnswer, UserId,
};
use crate::workflows::tagging::repository::{
    MemoryTagStats, MemoryUserDirectory, StatsError, TagStatsRepository,
};
use crate::workflows::tagging::scoring::{AnswerScorer, ScoringConfig};
use crate::workflows::tagging::service::AnswerScoringService;
use crate::workflows::tagging::SubmissionGuard;

pub(super) const REWARD: f64 = 0.1;
pub(super) const INVALID_RATE: f64 = 0.05;
pub(super) const VALID_RATE: f64 = 0.02;

pub(super) const EPSILON: f64 = 1e-12;

pub(super) fn scoring_config() -> ScoringConfig {
    ScoringConfig {
        reward_amount: REWARD,
        invalid_tag_penalty_rate: INVALID_RATE,
        valid_tag_penalty_rate: VALID_RATE,
    }
}

pub(super) fn image(id: &str) -> ImageId {
    ImageId(id.to_string())
}

pub(super) fn user() -> UserId {
    UserId("tagger-7".to_string())
}

pub(super) fn shown(id: &str, concept: &str, valid: bool) -> ShownImage {
    ShownImage {
        id: image(id),
        concept: concept.to_string(),
        valid,
    }
}

pub(super) fn tag(id: &str, valid: bool) -> TaggedImage {
    TaggedImage {
        id: image(id),
        valid,
    }
}

/// Five images shown for the "cat" concept with two "dog" distractors.
pub(super) fn cat_trial_shown() -> Vec<ShownImage> {
    vec![
        shown("I1", "dog", false),
        shown("V1", "cat", true),
        shown("I2", "dog", false),
        shown("V2", "cat", true),
        shown("V3", "cat", true),
    ]
}

pub(super) fn perfect_tags() -> Vec<TaggedImage> {
    vec![tag("I1", false), tag("I2", false)]
}

pub(super) fn submission(tagged: Vec<TaggedImage>) -> AnswerSubmission {
    AnswerSubmission {
        user_id: user(),
        target_concept: "cat".to_string(),
        shown_images: cat_trial_shown(),
        tagged_images: tagged,
        invalid_shown_count: 2,
    }
}

pub(super) fn answer(tagged: Vec<TaggedImage>) -> TrialAnswer {
    TrialAnswer {
        user_id: user(),
        target_concept: "cat".to_string(),
        shown_images: cat_trial_shown(),
        tagged_images: tagged,
        invalid_shown_count: 2,
    }
}

pub(super) fn scorer() -> AnswerScorer {
    AnswerScorer::new(scoring_config())
}

pub(super) fn guard() -> SubmissionGuard {
    SubmissionGuard::default()
}

pub(super) fn build_service() -> (
    AnswerScoringService<MemoryTagStats, MemoryUserDirectory>,
    Arc<MemoryTagStats>,
    Arc<MemoryUserDirectory>,
) {
    let stats = Arc::new(MemoryTagStats::default());
    let users = Arc::new(MemoryUserDirectory::default());
    users.insert(user(), 0.8);

    let service = AnswerScoringService::new(stats.clone(), users.clone(), scoring_config());
    (service, stats, users)
}

pub(super) struct UnavailableStats;

impl TagStatsRepository for UnavailableStats {
    fn bump_image_displays(&self, _images: &[ImageId]) -> Result<(), StatsError> {
        Err(StatsError::Unavailable("stats store offline".to_string()))
    }

    fn bump_concept_display(&self, _concept: &str) -> Result<(), StatsError> {
        Err(StatsError::Unavailable("stats store offline".to_string()))
    }

    fn record_invalid_tags(&self, _images: &[ImageId], _weight: f64) -> Result<(), StatsError> {
        Err(StatsError::Unavailable("stats store offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
