use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use super::domain::{AnswerSubmission, UserId};
use super::intake::{SubmissionGuard, SubmissionViolation};
use super::repository::{StatsError, TagStatsRepository, UserWeightStore, WeightStoreError};
use super::scoring::{AnswerOutcome, AnswerScorer, ScoringConfig};

/// Service composing the intake guard, the scorer, and the persistence
/// collaborators. This is the caller the scorer is written for: the
/// evaluation is fully computed before any store call is attempted.
pub struct AnswerScoringService<S, U> {
    guard: SubmissionGuard,
    stats: Arc<S>,
    users: Arc<U>,
    scorer: AnswerScorer,
}

impl<S, U> AnswerScoringService<S, U>
where
    S: TagStatsRepository + 'static,
    U: UserWeightStore + 'static,
{
    pub fn new(stats: Arc<S>, users: Arc<U>, config: ScoringConfig) -> Self {
        Self {
            guard: SubmissionGuard::default(),
            stats,
            users,
            scorer: AnswerScorer::new(config),
        }
    }

    /// Score one submission and apply its persistence side effects.
    pub fn score_submission(
        &self,
        submission: AnswerSubmission,
    ) -> Result<ScoredAnswerView, AnswerServiceError> {
        let answer = self.guard.answer_from_submission(submission)?;
        let user = self
            .users
            .fetch(&answer.user_id)?
            .ok_or_else(|| AnswerServiceError::UnknownUser(answer.user_id.clone()))?;

        let evaluation = self.scorer.score(&answer, user.weight)?;

        // Display counters move regardless of the outcome branch.
        self.stats.bump_image_displays(&evaluation.images_to_bump)?;
        if let Some(concept) = evaluation.concept_to_bump.as_deref() {
            self.stats.bump_concept_display(concept)?;
        }

        if let Some(weight) = evaluation.updated_weight {
            self.stats
                .record_invalid_tags(&answer.valid_tagged_ids(), weight)?;
            self.users.store(&answer.user_id, weight)?;
        }

        info!(
            user = %answer.user_id.0,
            outcome = %evaluation.outcome.summary(),
            "scored answer batch"
        );

        Ok(ScoredAnswerView::new(answer.user_id, &evaluation.outcome))
    }
}

/// Error raised by the scoring service.
#[derive(Debug, thiserror::Error)]
pub enum AnswerServiceError {
    #[error(transparent)]
    Submission(#[from] SubmissionViolation),
    #[error("no trust weight on record for user {0:?}")]
    UnknownUser(UserId),
    #[error(transparent)]
    Stats(#[from] StatsError),
    #[error(transparent)]
    Weights(#[from] WeightStoreError),
}

/// Response payload for a scored answer: exactly one of `reward` and
/// `penalty` is present.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredAnswerView {
    pub user_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub penalty: Option<f64>,
    pub scored_at: DateTime<Utc>,
}

impl ScoredAnswerView {
    fn new(user_id: UserId, outcome: &AnswerOutcome) -> Self {
        let (reward, penalty) = match outcome {
            AnswerOutcome::Reward(amount) => (Some(*amount), None),
            AnswerOutcome::Penalty(factor) => (None, Some(*factor)),
        };

        Self {
            user_id,
            reward,
            penalty,
            scored_at: Utc::now(),
        }
    }
}
