use serde::{Deserialize, Serialize};

/// Identifier wrapper for gallery images.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageId(pub String);

/// Identifier wrapper for tagging users.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// One image presented during a trial. `valid` is the ground truth for the
/// trial's target concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShownImage {
    pub id: ImageId,
    pub concept: String,
    pub valid: bool,
}

/// An image the user marked as not belonging to the target concept.
///
/// `valid` echoes the ground truth of the marked image, so `false` means
/// the mark was correct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedImage {
    pub id: ImageId,
    pub valid: bool,
}

/// Inbound answer payload exactly as the request layer receives it.
///
/// `invalid_shown_count` stays signed here so an out-of-range value survives
/// deserialization long enough to be rejected with a proper violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSubmission {
    pub user_id: UserId,
    pub target_concept: String,
    pub shown_images: Vec<ShownImage>,
    pub tagged_images: Vec<TaggedImage>,
    pub invalid_shown_count: i64,
}

/// The sanitized answer the intake guard produces for scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialAnswer {
    pub user_id: UserId,
    pub target_concept: String,
    pub shown_images: Vec<ShownImage>,
    pub tagged_images: Vec<TaggedImage>,
    pub invalid_shown_count: usize,
}

impl TrialAnswer {
    /// Ids of tagged images whose ground truth is valid, in tagging order.
    /// These are the user's false positives.
    pub fn valid_tagged_ids(&self) -> Vec<ImageId> {
        self.tagged_images
            .iter()
            .filter(|tag| tag.valid)
            .map(|tag| tag.id.clone())
            .collect()
    }
}

/// Externally owned per-user trust state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserState {
    pub id: UserId,
    pub weight: f64,
}
