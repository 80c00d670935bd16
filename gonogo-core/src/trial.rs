use serde::{Deserialize, Serialize};

use crate::stimulus::StimulusCategory;

/// How a trial was resolved.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseAction {
    Press,
    Timeout,
}

/// Recorded result per completed trial.
///
/// Built through [`TrialResult::pressed`] or [`TrialResult::timed_out`] so
/// that `correct` always agrees with the category and action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    pub round_index: usize,
    pub category: StimulusCategory,
    pub action: ResponseAction,
    pub reaction_time_ms: Option<f64>,
    pub correct: bool,
}

impl TrialResult {
    pub fn pressed(round_index: usize, category: StimulusCategory, reaction_time_ms: f64) -> Self {
        Self {
            round_index,
            category,
            action: ResponseAction::Press,
            reaction_time_ms: Some(reaction_time_ms.max(0.0)),
            correct: category.is_go(),
        }
    }

    pub fn timed_out(round_index: usize, category: StimulusCategory) -> Self {
        Self {
            round_index,
            category,
            action: ResponseAction::Timeout,
            reaction_time_ms: None,
            correct: !category.is_go(),
        }
    }

    pub fn is_press(&self) -> bool {
        matches!(self.action, ResponseAction::Press)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use StimulusCategory::*;

    #[test]
    fn correctness_follows_category_and_action() {
        assert!(TrialResult::pressed(0, Go, 250.0).correct);
        assert!(!TrialResult::timed_out(1, Go).correct);
        assert!(TrialResult::timed_out(2, NoGo).correct);
        assert!(!TrialResult::pressed(3, NoGo, 300.0).correct);
    }

    #[test]
    fn reaction_time_only_on_press() {
        let t = TrialResult::timed_out(0, NoGo);
        assert_eq!(t.reaction_time_ms, None);
        let p = TrialResult::pressed(0, Go, -3.0);
        assert_eq!(p.reaction_time_ms, Some(0.0));
    }
}
