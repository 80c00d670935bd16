pub mod phase;
pub mod profile;
pub mod stimulus;
pub mod trial;

pub use phase::{AppPhase, TrialPhase};
pub use profile::{ProfileError, Sex, SessionProfile, MAX_AGE};
pub use stimulus::{Shape, StimulusAppearance, StimulusCategory};
pub use trial::{ResponseAction, TrialResult};
