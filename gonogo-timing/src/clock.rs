//! Single-slot cancellable scheduler for trial timing.
//!
//! A trial only ever waits on one thing at a time: the pre-stimulus delay or
//! the response window. The clock therefore holds at most one outstanding
//! [`TimerHandle`]; asking for a second one without cancelling the first is
//! reported as an overlap.

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use tracing::trace;

use crate::timer::Timer;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TimerKind {
    PreStimulus,
    ResponseWindow,
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimerKind::PreStimulus => "pre-stimulus",
            TimerKind::ResponseWindow => "response-window",
        })
    }
}

/// Tagged handle to a scheduled timer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimerHandle {
    pub id: u64,
    pub session: u64,
    pub kind: TimerKind,
    pub deadline_ns: u64,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("cannot schedule {requested} timer while {pending} timer is outstanding")]
    Overlap {
        pending: TimerKind,
        requested: TimerKind,
    },

    #[error("{kind} timer #{id} is not outstanding")]
    NotOutstanding { id: u64, kind: TimerKind },
}

pub struct TrialClock<T: Timer> {
    timer: T,
    pending: Option<TimerHandle>,
    next_id: u64,
}

impl<T: Timer> TrialClock<T> {
    pub fn new(timer: T) -> Self {
        Self {
            timer,
            pending: None,
            next_id: 0,
        }
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn now(&self) -> u64 {
        self.timer.now()
    }

    pub fn schedule(
        &mut self,
        session: u64,
        kind: TimerKind,
        delay: Duration,
    ) -> Result<TimerHandle, ScheduleError> {
        if let Some(pending) = &self.pending {
            return Err(ScheduleError::Overlap {
                pending: pending.kind,
                requested: kind,
            });
        }
        self.next_id += 1;
        let handle = TimerHandle {
            id: self.next_id,
            session,
            kind,
            deadline_ns: self.timer.now() + delay.as_nanos() as u64,
        };
        trace!(id = handle.id, %kind, deadline_ns = handle.deadline_ns, "timer scheduled");
        self.pending = Some(handle);
        Ok(handle)
    }

    /// Disarms the outstanding timer, if any.
    pub fn cancel(&mut self) -> Option<TimerHandle> {
        let cancelled = self.pending.take();
        if let Some(h) = &cancelled {
            trace!(id = h.id, kind = %h.kind, "timer cancelled");
        }
        cancelled
    }

    pub fn pending(&self) -> Option<&TimerHandle> {
        self.pending.as_ref()
    }

    pub fn is_due(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|h| self.timer.now() >= h.deadline_ns)
    }

    /// Removes and returns the outstanding timer once its deadline has passed.
    pub fn take_due(&mut self) -> Option<TimerHandle> {
        if self.is_due() {
            self.pending.take()
        } else {
            None
        }
    }

    /// Consumes an explicitly delivered handle. Only the outstanding timer
    /// may be claimed; anything else was cancelled or never existed.
    pub fn claim(&mut self, handle: &TimerHandle) -> Result<(), ScheduleError> {
        match &self.pending {
            Some(pending) if pending == handle => {
                self.pending = None;
                Ok(())
            }
            _ => Err(ScheduleError::NotOutstanding {
                id: handle.id,
                kind: handle.kind,
            }),
        }
    }

    pub fn time_until_due(&self) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|h| Duration::from_nanos(h.deadline_ns.saturating_sub(self.timer.now())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::ManualTimer;

    fn clock() -> (ManualTimer, TrialClock<ManualTimer>) {
        let t = ManualTimer::new();
        (t.clone(), TrialClock::new(t))
    }

    #[test]
    fn fires_only_after_deadline() {
        let (t, mut c) = clock();
        c.schedule(1, TimerKind::PreStimulus, Duration::from_millis(100))
            .unwrap();
        t.advance_ms(99);
        assert!(c.take_due().is_none());
        t.advance_ms(1);
        let h = c.take_due().unwrap();
        assert_eq!(h.kind, TimerKind::PreStimulus);
        assert!(c.pending().is_none());
    }

    #[test]
    fn overlapping_schedule_is_rejected() {
        let (_, mut c) = clock();
        c.schedule(1, TimerKind::PreStimulus, Duration::from_millis(10))
            .unwrap();
        let err = c
            .schedule(1, TimerKind::ResponseWindow, Duration::from_millis(10))
            .unwrap_err();
        assert_eq!(
            err,
            ScheduleError::Overlap {
                pending: TimerKind::PreStimulus,
                requested: TimerKind::ResponseWindow
            }
        );
    }

    #[test]
    fn cancelled_handle_cannot_be_claimed() {
        let (t, mut c) = clock();
        let h = c
            .schedule(3, TimerKind::ResponseWindow, Duration::from_millis(10))
            .unwrap();
        assert_eq!(c.cancel(), Some(h));
        t.advance_ms(20);
        assert!(c.take_due().is_none());
        assert!(matches!(
            c.claim(&h),
            Err(ScheduleError::NotOutstanding { .. })
        ));
    }

    #[test]
    fn handles_are_unique() {
        let (_, mut c) = clock();
        let a = c
            .schedule(1, TimerKind::PreStimulus, Duration::ZERO)
            .unwrap();
        c.cancel();
        let b = c
            .schedule(1, TimerKind::PreStimulus, Duration::ZERO)
            .unwrap();
        assert_ne!(a, b);
        assert!(c.claim(&a).is_err());
        assert!(c.claim(&b).is_ok());
    }

    #[test]
    fn reports_remaining_time() {
        let (t, mut c) = clock();
        assert_eq!(c.time_until_due(), None);
        c.schedule(1, TimerKind::ResponseWindow, Duration::from_millis(30))
            .unwrap();
        t.advance_ms(10);
        assert_eq!(c.time_until_due(), Some(Duration::from_millis(20)));
        t.advance_ms(50);
        assert_eq!(c.time_until_due(), Some(Duration::ZERO));
    }
}
