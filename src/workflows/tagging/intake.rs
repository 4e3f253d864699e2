use std::collections::HashSet;

use super::domain::{AnswerSubmission, ImageId, TrialAnswer};

/// Validation errors raised by the intake guard and the scorer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionViolation {
    #[error("submission contains no shown images")]
    EmptyTrial,
    #[error("target concept is blank")]
    BlankTargetConcept,
    #[error("invalid-shown count {count} out of range for {shown} shown images")]
    CountOutOfRange { count: i64, shown: usize },
    #[error("declared invalid-shown count {declared} disagrees with ground truth {actual}")]
    CountMismatch { declared: usize, actual: usize },
    #[error("tagged image {0:?} was not part of the shown set")]
    UnknownTaggedImage(ImageId),
    #[error("image {0:?} tagged more than once")]
    DuplicateTag(ImageId),
    #[error("tag for image {0:?} contradicts the shown ground truth")]
    ContradictoryTag(ImageId),
}

/// Guard converting raw submissions into sanitized [`TrialAnswer`] values.
///
/// The guard owns every shape check: the scorer downstream assumes a
/// well-formed answer. The declared invalid-shown count is cross-checked
/// against the recount of ground-truth-invalid shown images, so a client
/// cannot understate or inflate it.
#[derive(Debug, Clone, Default)]
pub struct SubmissionGuard;

impl SubmissionGuard {
    pub fn answer_from_submission(
        &self,
        submission: AnswerSubmission,
    ) -> Result<TrialAnswer, SubmissionViolation> {
        if submission.shown_images.is_empty() {
            return Err(SubmissionViolation::EmptyTrial);
        }
        if submission.target_concept.trim().is_empty() {
            return Err(SubmissionViolation::BlankTargetConcept);
        }

        let shown = submission.shown_images.len();
        if submission.invalid_shown_count < 0 || submission.invalid_shown_count as usize > shown {
            return Err(SubmissionViolation::CountOutOfRange {
                count: submission.invalid_shown_count,
                shown,
            });
        }
        let declared = submission.invalid_shown_count as usize;

        let actual = submission
            .shown_images
            .iter()
            .filter(|image| !image.valid)
            .count();
        if declared != actual {
            return Err(SubmissionViolation::CountMismatch { declared, actual });
        }

        let mut seen: HashSet<&ImageId> = HashSet::new();
        for tag in &submission.tagged_images {
            let shown_image = submission
                .shown_images
                .iter()
                .find(|image| image.id == tag.id)
                .ok_or_else(|| SubmissionViolation::UnknownTaggedImage(tag.id.clone()))?;
            if !seen.insert(&tag.id) {
                return Err(SubmissionViolation::DuplicateTag(tag.id.clone()));
            }
            if shown_image.valid != tag.valid {
                return Err(SubmissionViolation::ContradictoryTag(tag.id.clone()));
            }
        }

        Ok(TrialAnswer {
            user_id: submission.user_id,
            target_concept: submission.target_concept,
            shown_images: submission.shown_images,
            tagged_images: submission.tagged_images,
            invalid_shown_count: declared,
        })
    }
}
