//! End-to-end checks of the evaluation pipeline on whole sessions.

use proptest::prelude::*;

use gonogo_analysis::{
    AgeBracket, Evaluation, Evaluator, Rating, SessionReport, evaluate,
};
use gonogo_core::{Sex, SessionProfile, StimulusCategory, TrialResult};

/// 14 Go presses at 200, 210, ... 330 ms interleaved with 6 withheld NoGo trials.
fn reference_session() -> Vec<TrialResult> {
    let mut rts = (0..14).map(|i| 200.0 + 10.0 * i as f64);
    (0..20)
        .map(|round| {
            if round % 10 < 3 {
                TrialResult::timed_out(round, StimulusCategory::NoGo)
            } else {
                TrialResult::pressed(round, StimulusCategory::Go, rts.next().unwrap())
            }
        })
        .collect()
}

#[test]
fn reference_session_young_male() {
    let results = reference_session();
    let profile = SessionProfile::new(25, Sex::Male).unwrap();
    let report = SessionReport::new(&results, profile, &Evaluator::default());

    assert_eq!(report.total_trials, 20);
    assert_eq!(report.accuracy, Some(1.0));
    assert_eq!(report.inhibition_rate, Some(1.0));

    let Evaluation::Scored(s) = &report.evaluation else {
        panic!("expected a score, got {:?}", report.evaluation);
    };
    assert_eq!(s.counts.eligible, 14);
    assert_eq!(s.counts.kept, 14);
    assert_eq!(s.filtered_median_ms, 265.0);
    assert_eq!(s.q1_ms, 230.0);
    assert_eq!(s.q3_ms, 300.0);
    assert_eq!(s.bracket, AgeBracket::Twenties);
    assert_eq!(s.group_mean_ms, 320.0);
    assert_eq!(s.group_sd_ms, 45.0);
    assert_eq!(s.diff_ms, -55.0);
    assert!((s.z_score - (-55.0 / 45.0)).abs() < 1e-12);
    assert_eq!(s.rating, Rating::Good);
}

#[test]
fn report_serializes_with_status_tag() {
    let profile = SessionProfile::new(25, Sex::Male).unwrap();
    let report = SessionReport::new(&reference_session(), profile, &Evaluator::default());
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["evaluation"]["status"], "scored");
    assert_eq!(json["evaluation"]["rating"], "Good");
    assert_eq!(json["evaluation"]["bracket"], "20s");
    assert_eq!(json["profile"]["sex"], "male");

    let empty = SessionReport::new(&[], profile, &Evaluator::default());
    let json = serde_json::to_value(&empty).unwrap();
    assert_eq!(json["evaluation"]["status"], "insufficient_data");
    assert!(json["accuracy"].is_null());
}

fn result_strategy() -> impl Strategy<Value = (bool, Option<f64>)> {
    (any::<bool>(), prop::option::of(0.0..3000.0f64))
}

proptest! {
    // evaluate is a pure function of its inputs
    #[test]
    fn evaluate_is_deterministic(
        trials in prop::collection::vec(result_strategy(), 0..60),
        age in 0..=120u32,
        female in any::<bool>(),
    ) {
        let results: Vec<TrialResult> = trials
            .iter()
            .enumerate()
            .map(|(i, (go, rt))| {
                let category = if *go { StimulusCategory::Go } else { StimulusCategory::NoGo };
                match rt {
                    Some(rt) => TrialResult::pressed(i, category, *rt),
                    None => TrialResult::timed_out(i, category),
                }
            })
            .collect();
        let sex = if female { Sex::Female } else { Sex::Male };
        let profile = SessionProfile::new(age, sex).unwrap();
        let snapshot = results.clone();

        let first = evaluate(&results, &profile);
        let second = evaluate(&results, &profile);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(&results, &snapshot);

        let c = first.counts();
        prop_assert!(c.kept <= c.eligible);
        if let Evaluation::Scored(s) = &first {
            prop_assert!(s.q1_ms <= s.filtered_median_ms && s.filtered_median_ms <= s.q3_ms);
            prop_assert!(s.filtered_median_ms >= 120.0);
            prop_assert!(s.filtered_median_ms < s.cutoff_ms);
            prop_assert_eq!(
                c.eligible,
                c.anticipatory + c.over_cutoff + c.outliers + c.kept
            );
        }
    }
}
