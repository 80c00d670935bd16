use gonogo_timing::TimerKind;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("session {0} is still running; abandon it before starting another")]
    SessionInProgress(u64),

    /// A timer was delivered that the engine no longer owns. Results of the
    /// active session can no longer be trusted once this happens.
    #[error("{kind} timer #{id} for session {session} fired after it was cancelled or torn down")]
    StaleTimer {
        id: u64,
        session: u64,
        kind: TimerKind,
    },
}
