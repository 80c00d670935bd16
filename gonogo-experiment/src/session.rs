use gonogo_core::{SessionProfile, StimulusCategory, TrialPhase, TrialResult};

use crate::trial::ActiveTrial;

/// Identifies a started session. Stays valid for reads after the session
/// finishes; a restart hands out a new id.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SessionHandle {
    pub id: u64,
    pub profile: SessionProfile,
    pub total_rounds: usize,
}

/// State of one subject's run, exclusively owned by the engine.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) id: u64,
    pub(crate) profile: SessionProfile,
    pub(crate) sequence: Vec<StimulusCategory>,
    pub(crate) next_round: usize,
    pub(crate) phase: TrialPhase,
    pub(crate) current: Option<ActiveTrial>,
    pub(crate) results: Vec<TrialResult>,
}

impl Session {
    pub(crate) fn new(id: u64, profile: SessionProfile, sequence: Vec<StimulusCategory>) -> Self {
        let total = sequence.len();
        Self {
            id,
            profile,
            sequence,
            next_round: 0,
            phase: TrialPhase::Idle,
            current: None,
            results: Vec::with_capacity(total),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            id: self.id,
            profile: self.profile,
            total_rounds: self.total_rounds(),
        }
    }

    pub fn profile(&self) -> &SessionProfile {
        &self.profile
    }

    pub fn sequence(&self) -> &[StimulusCategory] {
        &self.sequence
    }

    pub fn total_rounds(&self) -> usize {
        self.sequence.len()
    }

    /// Index of the next stimulus to be shown.
    pub fn round_index(&self) -> usize {
        self.next_round
    }

    pub fn phase(&self) -> TrialPhase {
        self.phase
    }

    pub fn current(&self) -> Option<&ActiveTrial> {
        self.current.as_ref()
    }

    pub fn results(&self) -> &[TrialResult] {
        &self.results
    }

    pub fn is_complete(&self) -> bool {
        self.results.len() == self.total_rounds()
    }

    /// Appends a result. Results arrive strictly in round order.
    pub(crate) fn record(&mut self, result: TrialResult) {
        assert_eq!(
            result.round_index,
            self.results.len(),
            "trial result out of order in session {}",
            self.id
        );
        assert!(
            self.results.len() < self.total_rounds(),
            "session {} already holds {} results",
            self.id,
            self.total_rounds()
        );
        self.results.push(result);
    }
}
