//! Tagging answer intake, scoring, and trust-weight upkeep.
//!
//! The request layer hands a raw [`AnswerSubmission`] to the
//! [`AnswerScoringService`]; the intake guard sanitizes it, the scorer
//! produces a reward-or-penalty evaluation, and the service applies the
//! resulting counter bumps and weight update through the repository traits.

pub mod domain;
pub mod intake;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AnswerSubmission, ImageId, ShownImage, TaggedImage, TrialAnswer, UserId, UserState,
};
pub use intake::{SubmissionGuard, SubmissionViolation};
pub use repository::{
    MemoryTagStats, MemoryUserDirectory, StatsError, TagStatsRepository, UserWeightStore,
    WeightStoreError,
};
pub use router::answer_router;
pub use scoring::{
    AnswerEvaluation, AnswerOutcome, AnswerScorer, PenaltyComponent, PenaltySource, ScoringConfig,
};
pub use service::{AnswerScoringService, AnswerServiceError, ScoredAnswerView};
