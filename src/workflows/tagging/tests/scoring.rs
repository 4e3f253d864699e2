use super::common::*;
use crate::workflows::tagging::intake::SubmissionViolation;
use crate::workflows::tagging::scoring::{AnswerOutcome, AnswerScorer, PenaltySource};

fn penalty_factor(outcome: AnswerOutcome) -> f64 {
    match outcome {
        AnswerOutcome::Penalty(factor) => factor,
        other => panic!("expected penalty outcome, got {other:?}"),
    }
}

#[test]
fn perfect_detection_earns_flat_reward() {
    let evaluation = scorer()
        .score(&answer(perfect_tags()), 0.8)
        .expect("scores");

    assert_eq!(evaluation.outcome, AnswerOutcome::Reward(REWARD));
    assert_eq!(evaluation.updated_weight, None);
    assert!(evaluation.components.is_empty());
}

#[test]
fn reward_path_still_reports_display_bumps() {
    let evaluation = scorer()
        .score(&answer(perfect_tags()), 0.8)
        .expect("scores");

    assert_eq!(evaluation.images_to_bump, vec![image("I1"), image("I2")]);
    assert_eq!(evaluation.concept_to_bump.as_deref(), Some("dog"));
}

#[test]
fn missed_invalid_and_extra_valid_accrue_penalty() {
    // One of two invalids caught, two valid images wrongly tagged.
    let tags = vec![tag("I1", false), tag("V1", true), tag("V2", true)];
    let evaluation = scorer().score(&answer(tags), 0.8).expect("scores");

    let expected_total = INVALID_RATE + VALID_RATE;
    let factor = penalty_factor(evaluation.outcome);
    assert!((factor - (1.0 - expected_total)).abs() < EPSILON);

    let updated = evaluation.updated_weight.expect("penalty path updates weight");
    assert!((updated - 0.8 * (1.0 - expected_total)).abs() < EPSILON);
}

#[test]
fn penalty_path_reports_same_display_bumps() {
    let tags = vec![tag("V1", true), tag("V2", true)];
    let evaluation = scorer().score(&answer(tags), 0.8).expect("scores");

    assert_eq!(evaluation.images_to_bump, vec![image("I1"), image("I2")]);
    assert_eq!(evaluation.concept_to_bump.as_deref(), Some("dog"));
}

#[test]
fn first_valid_tag_is_free() {
    // Both invalids caught plus exactly one valid tag: penalty path, but no
    // contribution from either rule.
    let tags = vec![tag("I1", false), tag("I2", false), tag("V1", true)];
    let evaluation = scorer().score(&answer(tags), 0.5).expect("scores");

    let factor = penalty_factor(evaluation.outcome);
    assert!((factor - 1.0).abs() < EPSILON);
    assert!(!evaluation
        .components
        .iter()
        .any(|component| component.source == PenaltySource::ExtraValid));

    let updated = evaluation.updated_weight.expect("weight still recomputed");
    assert!((updated - 0.5).abs() < EPSILON);
}

#[test]
fn penalty_grows_linearly_with_extra_valid_tags() {
    let valid_ids = ["V1", "V2", "V3"];
    let mut previous_factor = None;

    for extra in 1..=valid_ids.len() {
        let mut tags = vec![tag("I1", false), tag("I2", false)];
        tags.extend(valid_ids.iter().take(extra).map(|id| tag(id, true)));

        let evaluation = scorer().score(&answer(tags), 1.0).expect("scores");
        let factor = penalty_factor(evaluation.outcome);

        let expected = 1.0 - (extra as f64 - 1.0) * VALID_RATE;
        assert!((factor - expected).abs() < EPSILON);

        if let Some(previous) = previous_factor {
            let step: f64 = previous - factor;
            assert!((step - VALID_RATE).abs() < EPSILON);
        }
        previous_factor = Some(factor);
    }
}

#[test]
fn over_tagging_invalids_raises_the_factor() {
    // Declared count of one, but both ground-truth-invalid images tagged:
    // the missed-invalid contribution goes negative and stays unclamped.
    let mut answer = answer(vec![tag("I1", false), tag("I2", false)]);
    answer.invalid_shown_count = 1;

    let evaluation = scorer().score(&answer, 0.5).expect("scores");
    let factor = penalty_factor(evaluation.outcome);
    assert!((factor - (1.0 + INVALID_RATE)).abs() < EPSILON);

    let updated = evaluation.updated_weight.expect("weight recomputed");
    assert!((updated - 0.5 * (1.0 + INVALID_RATE)).abs() < EPSILON);
}

#[test]
fn weight_is_clamped_to_unit_interval() {
    // Ceiling: a negative total penalty cannot push the weight past 1.
    let mut over = answer(vec![tag("I1", false), tag("I2", false)]);
    over.invalid_shown_count = 1;
    let evaluation = scorer().score(&over, 1.0).expect("scores");
    assert_eq!(evaluation.updated_weight, Some(1.0));

    // Floor: a total penalty above 1 cannot drive the weight negative.
    let harsh = AnswerScorer::new(crate::workflows::tagging::scoring::ScoringConfig {
        reward_amount: REWARD,
        invalid_tag_penalty_rate: 0.9,
        valid_tag_penalty_rate: VALID_RATE,
    });
    let evaluation = harsh.score(&answer(Vec::new()), 0.7).expect("scores");
    let factor = penalty_factor(evaluation.outcome);
    assert!((factor - (1.0 - 1.8)).abs() < EPSILON);
    assert_eq!(evaluation.updated_weight, Some(0.0));
}

#[test]
fn multiple_distractor_concepts_use_first_in_shown_order() {
    let mut mixed = answer(perfect_tags());
    mixed.shown_images[0].concept = "fox".to_string();

    let evaluation = scorer().score(&mixed, 0.8).expect("scores");
    assert_eq!(evaluation.concept_to_bump.as_deref(), Some("fox"));
}

#[test]
fn trial_without_distractor_reports_no_concept() {
    let all_target = crate::workflows::tagging::domain::TrialAnswer {
        user_id: user(),
        target_concept: "cat".to_string(),
        shown_images: vec![
            shown("V1", "cat", true),
            shown("V2", "cat", true),
            shown("V3", "cat", true),
        ],
        tagged_images: Vec::new(),
        invalid_shown_count: 0,
    };

    let evaluation = scorer().score(&all_target, 0.8).expect("scores");
    assert_eq!(evaluation.outcome, AnswerOutcome::Reward(REWARD));
    assert_eq!(evaluation.concept_to_bump, None);
    assert!(evaluation.images_to_bump.is_empty());
}

#[test]
fn scorer_rejects_empty_shown_set() {
    let mut empty = answer(Vec::new());
    empty.shown_images.clear();
    empty.invalid_shown_count = 0;

    assert_eq!(
        scorer().score(&empty, 0.8),
        Err(SubmissionViolation::EmptyTrial)
    );
}

#[test]
fn scorer_rejects_count_beyond_shown() {
    let mut bad = answer(Vec::new());
    bad.invalid_shown_count = 6;

    assert_eq!(
        scorer().score(&bad, 0.8),
        Err(SubmissionViolation::CountOutOfRange { count: 6, shown: 5 })
    );
}
