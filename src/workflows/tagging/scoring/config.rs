use serde::{Deserialize, Serialize};

/// Reward and penalty rates applied when scoring an answer batch.
///
/// Owned and loaded by the caller, passed explicitly into every scorer;
/// nothing in the scoring path reads process-wide state. Both penalty
/// rates are expected in `(0, 1]`, enforced where the values are loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub reward_amount: f64,
    pub invalid_tag_penalty_rate: f64,
    pub valid_tag_penalty_rate: f64,
}
