use gonogo_core::{SessionProfile, StimulusCategory, TrialResult};
use serde::Serialize;

use crate::pipeline::{Evaluation, Evaluator};

/// Share of all trials answered correctly. `None` for an empty list.
pub fn accuracy(results: &[TrialResult]) -> Option<f64> {
    if results.is_empty() {
        return None;
    }
    let correct = results.iter().filter(|r| r.correct).count();
    Some(correct as f64 / results.len() as f64)
}

/// Share of NoGo trials where the response was withheld. `None` when the
/// session had no NoGo trials.
pub fn inhibition_rate(results: &[TrialResult]) -> Option<f64> {
    let (withheld, total) = results
        .iter()
        .filter(|r| r.category == StimulusCategory::NoGo)
        .fold((0usize, 0usize), |(w, t), r| (w + r.correct as usize, t + 1));
    (total > 0).then(|| withheld as f64 / total as f64)
}

/// Everything the results screen shows for one completed session.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionReport {
    pub profile: SessionProfile,
    pub total_trials: usize,
    pub correct_trials: usize,
    pub accuracy: Option<f64>,
    pub inhibition_rate: Option<f64>,
    pub evaluation: Evaluation,
}

impl SessionReport {
    pub fn new(results: &[TrialResult], profile: SessionProfile, evaluator: &Evaluator) -> Self {
        Self {
            profile,
            total_trials: results.len(),
            correct_trials: results.iter().filter(|r| r.correct).count(),
            accuracy: accuracy(results),
            inhibition_rate: inhibition_rate(results),
            evaluation: evaluator.evaluate(results, &profile),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gonogo_core::StimulusCategory::*;

    #[test]
    fn proportions_ignore_filtering() {
        let results = vec![
            TrialResult::pressed(0, Go, 40.0),
            TrialResult::pressed(1, Go, 5000.0),
            TrialResult::timed_out(2, Go),
            TrialResult::timed_out(3, NoGo),
            TrialResult::pressed(4, NoGo, 280.0),
        ];
        assert_eq!(accuracy(&results), Some(0.6));
        assert_eq!(inhibition_rate(&results), Some(0.5));
    }

    #[test]
    fn empty_denominators_are_none() {
        assert_eq!(accuracy(&[]), None);
        assert_eq!(inhibition_rate(&[TrialResult::pressed(0, Go, 300.0)]), None);
    }
}
