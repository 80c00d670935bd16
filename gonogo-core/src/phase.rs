use serde::{Deserialize, Serialize};

/// Trial engine states.
///
/// `Presenting` sits between the pre-stimulus timer firing and the
/// presentation layer confirming the stimulus is on screen. Resolution of a
/// trial happens inside a single engine call and is never observable.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrialPhase {
    #[default]
    Idle,
    Waiting,
    Presenting,
    Armed,
    Finished,
}

impl TrialPhase {
    pub fn accepts_response(&self) -> bool {
        matches!(self, Self::Armed)
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Waiting | Self::Presenting | Self::Armed)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished)
    }

    pub fn stimulus_visible(&self) -> bool {
        matches!(self, Self::Presenting | Self::Armed)
    }
}

/// Screens an application walks through around a session.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum AppPhase {
    #[default]
    Intake,
    Playing,
    Results,
}

impl AppPhase {
    pub fn allows_input(&self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Results loop back to intake so a new session can be started.
    pub fn next(&self) -> Self {
        use AppPhase::*;
        match self {
            Intake => Playing,
            Playing => Results,
            Results => Intake,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_armed_accepts_responses() {
        for phase in [
            TrialPhase::Idle,
            TrialPhase::Waiting,
            TrialPhase::Presenting,
            TrialPhase::Finished,
        ] {
            assert!(!phase.accepts_response(), "{phase:?}");
        }
        assert!(TrialPhase::Armed.accepts_response());
    }

    #[test]
    fn app_phase_cycles_back_to_intake() {
        let p = AppPhase::default();
        assert_eq!(p.next(), AppPhase::Playing);
        assert_eq!(p.next().next(), AppPhase::Results);
        assert_eq!(p.next().next().next(), AppPhase::Intake);
        assert!(AppPhase::Playing.allows_input());
        assert!(!AppPhase::Results.allows_input());
    }
}
