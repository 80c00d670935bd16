pub mod clock;
pub mod timer;

pub use clock::{ScheduleError, TimerHandle, TimerKind, TrialClock};
pub use timer::{HighPrecisionTimer, ManualTimer, Timer};
