use super::super::domain::{ImageId, TrialAnswer};
use super::config::ScoringConfig;
use super::{PenaltyComponent, PenaltySource};

pub(crate) struct TagTally {
    pub invalid_tagged: usize,
    pub valid_tagged: usize,
}

pub(crate) fn tally_tags(answer: &TrialAnswer) -> TagTally {
    let invalid_tagged = answer
        .tagged_images
        .iter()
        .filter(|tag| !tag.valid)
        .count();

    TagTally {
        invalid_tagged,
        valid_tagged: answer.tagged_images.len() - invalid_tagged,
    }
}

/// First concept among the shown images differing from the target.
///
/// Trials are built around a single distractor concept; when more than one
/// appears, the first in shown order wins and the rest are ignored. That
/// tie-break is deliberate, not an error.
pub(crate) fn attributed_distractor(answer: &TrialAnswer) -> Option<String> {
    answer
        .shown_images
        .iter()
        .map(|image| image.concept.as_str())
        .find(|concept| *concept != answer.target_concept)
        .map(str::to_owned)
}

/// Shown images with ground-truth `valid == false`, in shown order.
pub(crate) fn invalid_shown_ids(answer: &TrialAnswer) -> Vec<ImageId> {
    answer
        .shown_images
        .iter()
        .filter(|image| !image.valid)
        .map(|image| image.id.clone())
        .collect()
}

pub(crate) fn penalty_components(
    answer: &TrialAnswer,
    tally: &TagTally,
    config: &ScoringConfig,
) -> (Vec<PenaltyComponent>, f64) {
    let mut components = Vec::new();
    let mut total = 0.0;

    // Missed invalid images accrue at the invalid-tag rate. Tagging more
    // invalids than the declared count drives this negative; the amount is
    // left unclamped.
    let missed = answer.invalid_shown_count as f64 - tally.invalid_tagged as f64;
    let missed_amount = missed * config.invalid_tag_penalty_rate;
    components.push(PenaltyComponent {
        source: PenaltySource::MissedInvalid,
        amount: missed_amount,
        notes: format!(
            "{} of {} invalid images tagged",
            tally.invalid_tagged, answer.invalid_shown_count
        ),
    });
    total += missed_amount;

    if tally.valid_tagged > 1 {
        let amount = (tally.valid_tagged - 1) as f64 * config.valid_tag_penalty_rate;
        components.push(PenaltyComponent {
            source: PenaltySource::ExtraValid,
            amount,
            notes: format!("{} valid images tagged, first one free", tally.valid_tagged),
        });
        total += amount;
    }

    (components, total)
}
