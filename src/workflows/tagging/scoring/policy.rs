use serde::{Deserialize, Serialize};

use super::super::domain::TrialAnswer;
use super::rules::TagTally;

/// Outcome of scoring one answer batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AnswerOutcome {
    /// Flat reward for tagging every invalid image and nothing else.
    Reward(f64),
    /// Multiplicative factor `1 - total_penalty` applied to the trust weight.
    Penalty(f64),
}

impl AnswerOutcome {
    pub fn summary(&self) -> String {
        match self {
            AnswerOutcome::Reward(amount) => format!("reward {amount:.3}"),
            AnswerOutcome::Penalty(factor) => format!("penalty factor {factor:.3}"),
        }
    }
}

/// Bounds for the persisted trust weight.
const WEIGHT_FLOOR: f64 = 0.0;
const WEIGHT_CEILING: f64 = 1.0;

/// A perfect answer tags every declared invalid image and nothing else.
pub(crate) fn is_perfect_detection(tally: &TagTally, answer: &TrialAnswer) -> bool {
    tally.invalid_tagged == answer.invalid_shown_count
        && answer.tagged_images.len() == tally.invalid_tagged
}

/// Apply the penalty to the current weight.
///
/// The product is kept inside `[0, 1]`: the returned penalty factor stays
/// exact, but sustained over- or under-performance cannot drift the stored
/// weight out of its working range.
pub(crate) fn apply_penalty(current_weight: f64, total_penalty: f64) -> f64 {
    (current_weight * (1.0 - total_penalty)).clamp(WEIGHT_FLOOR, WEIGHT_CEILING)
}
