mod config;
mod policy;
mod rules;

pub use config::ScoringConfig;
pub use policy::AnswerOutcome;

use serde::{Deserialize, Serialize};

use super::domain::{ImageId, TrialAnswer};
use super::intake::SubmissionViolation;

/// Stateless scorer applying the configured rates to a sanitized answer.
pub struct AnswerScorer {
    config: ScoringConfig,
}

impl AnswerScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Score one answer batch against the user's current trust weight.
    ///
    /// Pure: no I/O happens here. The caller acts on the returned
    /// evaluation, applying the display bumps on every path and the
    /// invalid-tag record plus weight write on the penalty path only.
    pub fn score(
        &self,
        answer: &TrialAnswer,
        current_weight: f64,
    ) -> Result<AnswerEvaluation, SubmissionViolation> {
        if answer.shown_images.is_empty() {
            return Err(SubmissionViolation::EmptyTrial);
        }
        if answer.invalid_shown_count > answer.shown_images.len() {
            return Err(SubmissionViolation::CountOutOfRange {
                count: answer.invalid_shown_count as i64,
                shown: answer.shown_images.len(),
            });
        }

        // Display counters move on every outcome path.
        let concept_to_bump = rules::attributed_distractor(answer);
        let images_to_bump = rules::invalid_shown_ids(answer);

        let tally = rules::tally_tags(answer);
        if policy::is_perfect_detection(&tally, answer) {
            return Ok(AnswerEvaluation {
                outcome: AnswerOutcome::Reward(self.config.reward_amount),
                updated_weight: None,
                concept_to_bump,
                images_to_bump,
                components: Vec::new(),
            });
        }

        let (components, total_penalty) = rules::penalty_components(answer, &tally, &self.config);

        Ok(AnswerEvaluation {
            outcome: AnswerOutcome::Penalty(1.0 - total_penalty),
            updated_weight: Some(policy::apply_penalty(current_weight, total_penalty)),
            concept_to_bump,
            images_to_bump,
            components,
        })
    }
}

/// Discrete contribution to a penalty, allowing transparent audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyComponent {
    pub source: PenaltySource,
    pub amount: f64,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PenaltySource {
    MissedInvalid,
    ExtraValid,
}

/// Everything the caller needs to act on one scored answer.
///
/// `concept_to_bump` is `None` only for the degenerate trial where every
/// shown image already carries the target concept; the caller skips the
/// concept bump in that case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerEvaluation {
    pub outcome: AnswerOutcome,
    pub updated_weight: Option<f64>,
    pub concept_to_bump: Option<String>,
    pub images_to_bump: Vec<ImageId>,
    pub components: Vec<PenaltyComponent>,
}
