pub mod config;
pub mod error;
pub mod input;
pub mod sequence;
pub mod session;
pub mod state;
pub mod trial;

pub use config::{ConfigError, ExperimentConfig};
pub use error::EngineError;
pub use input::{Dispatch, InputDispatcher, InputSignal, Key, LogicalInput};
pub use sequence::{generate_sequence, go_count};
pub use session::{Session, SessionHandle};
pub use state::{EngineEvent, TrialEngine};
pub use trial::ActiveTrial;
