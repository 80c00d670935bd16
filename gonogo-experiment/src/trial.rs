use gonogo_core::{StimulusCategory, TrialResult};

/// The trial currently on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveTrial {
    pub round_index: usize,
    pub category: StimulusCategory,
    pub requested_ns: u64,
    /// Set when the presentation layer confirms the stimulus is visible.
    pub onset_ns: Option<u64>,
}

impl ActiveTrial {
    pub fn new(round_index: usize, category: StimulusCategory, requested_ns: u64) -> Self {
        Self {
            round_index,
            category,
            requested_ns,
            onset_ns: None,
        }
    }

    pub fn reaction_time_ms(&self, now_ns: u64) -> Option<f64> {
        self.onset_ns
            .map(|onset| now_ns.saturating_sub(onset) as f64 / 1_000_000.0)
    }

    /// Only an armed trial can be pressed, and arming stamps the onset.
    pub fn press(&self, now_ns: u64) -> TrialResult {
        let Some(rt) = self.reaction_time_ms(now_ns) else {
            unreachable!("armed trial without onset");
        };
        TrialResult::pressed(self.round_index, self.category, rt)
    }

    pub fn timeout(&self) -> TrialResult {
        TrialResult::timed_out(self.round_index, self.category)
    }
}
