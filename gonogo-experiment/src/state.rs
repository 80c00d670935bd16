use gonogo_core::{ResponseAction, SessionProfile, StimulusCategory, TrialPhase, TrialResult};
use gonogo_timing::{TimerHandle, TimerKind, Timer, TrialClock};
use rand::Rng;
use std::time::Duration;
use tracing::{debug, error, info, trace};

use crate::config::ExperimentConfig;
use crate::error::EngineError;
use crate::sequence::generate_sequence;
use crate::session::{Session, SessionHandle};
use crate::trial::ActiveTrial;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    SessionStarted {
        session: u64,
        total_rounds: usize,
    },
    /// The presentation layer should show this stimulus and then call
    /// [`TrialEngine::acknowledge_onset`] once it is actually visible.
    StimulusRequested {
        round_index: usize,
        category: StimulusCategory,
    },
    TrialResolved(TrialResult),
    /// Raised once per session, carrying every result in round order.
    SessionFinished(Vec<TrialResult>),
}

/// Drives one Go/No-Go session at a time.
///
/// All transitions happen inside `&mut self` calls, so a response and a
/// timeout can never interleave. Events accumulate in an outbox that
/// [`TrialEngine::update`] and [`TrialEngine::drain_events`] hand back.
pub struct TrialEngine<T: Timer, R: Rng> {
    config: ExperimentConfig,
    clock: TrialClock<T>,
    rng: R,
    session: Option<Session>,
    sessions_started: u64,
    outbox: Vec<EngineEvent>,
}

impl<T: Timer, R: Rng> TrialEngine<T, R> {
    pub fn new(config: ExperimentConfig, timer: T, rng: R) -> Self {
        Self {
            config,
            clock: TrialClock::new(timer),
            rng,
            session: None,
            sessions_started: 0,
            outbox: Vec::new(),
        }
    }

    /// Generates a fresh sequence and begins the pre-stimulus delay of round 0.
    ///
    /// A finished session is replaced; a running one must be abandoned first.
    pub fn start_session(&mut self, profile: SessionProfile) -> Result<SessionHandle, EngineError> {
        if let Some(session) = &self.session {
            if session.phase.is_running() {
                return Err(EngineError::SessionInProgress(session.id));
            }
        }
        self.config.validate()?;
        let sequence = generate_sequence(
            self.config.total_rounds,
            self.config.go_probability,
            &mut self.rng,
        )?;

        self.clock.cancel();
        self.sessions_started += 1;
        let session = Session::new(self.sessions_started, profile, sequence);
        let handle = session.handle();
        self.session = Some(session);
        self.transition(TrialPhase::Waiting);

        info!(
            session = handle.id,
            rounds = handle.total_rounds,
            age = profile.age(),
            sex = %profile.sex(),
            "session started"
        );
        self.outbox.push(EngineEvent::SessionStarted {
            session: handle.id,
            total_rounds: handle.total_rounds,
        });
        Ok(handle)
    }

    /// Tears down the running session and starts a new one.
    pub fn restart(&mut self, profile: SessionProfile) -> Result<SessionHandle, EngineError> {
        self.abandon();
        self.start_session(profile)
    }

    /// Cancels any outstanding timer and drops the session, returning it so
    /// the caller can inspect partial results.
    ///
    /// Events of a running session are discarded with it. A finished
    /// session's events stay queued so its `SessionFinished` is still
    /// delivered exactly once.
    pub fn abandon(&mut self) -> Option<Session> {
        self.clock.cancel();
        let session = self.session.take();
        match &session {
            Some(s) if s.phase.is_terminal() => {}
            Some(s) => {
                self.outbox.clear();
                info!(
                    session = s.id,
                    completed = s.results.len(),
                    "session abandoned"
                );
            }
            None => self.outbox.clear(),
        }
        session
    }

    /// Fires whatever timer is due and returns the pending events.
    pub fn update(&mut self) -> Vec<EngineEvent> {
        self.fire_due_timers();
        self.drain_events()
    }

    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// Fires a timer handed back by an external scheduler. The handle must be
    /// the one currently outstanding for the active session.
    pub fn deliver_timer(&mut self, handle: TimerHandle) -> Result<Vec<EngineEvent>, EngineError> {
        let owned = self.session.as_ref().is_some_and(|s| s.id == handle.session);
        if !owned || self.clock.claim(&handle).is_err() {
            error!(
                id = handle.id,
                session = handle.session,
                kind = %handle.kind,
                "stale timer delivered"
            );
            return Err(EngineError::StaleTimer {
                id: handle.id,
                session: handle.session,
                kind: handle.kind,
            });
        }
        self.on_timer(handle);
        Ok(self.drain_events())
    }

    /// Presentation layer confirmation that the requested stimulus is now
    /// observable. Onset is timestamped here and the response window opens.
    pub fn acknowledge_onset(&mut self) -> bool {
        let now = self.clock.now();
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.phase != TrialPhase::Presenting {
            trace!(phase = ?session.phase, "onset acknowledgement ignored");
            return false;
        }
        let Some(trial) = session.current.as_mut() else {
            unreachable!("presenting without an active trial");
        };
        trial.onset_ns = Some(now);
        session.next_round += 1;
        debug!(
            round = trial.round_index,
            category = %trial.category,
            onset_ns = now,
            latency_us = now.saturating_sub(trial.requested_ns) / 1_000,
            "stimulus visible"
        );
        self.transition(TrialPhase::Armed);
        true
    }

    /// Logical "respond now". Only the first response of an armed trial
    /// counts; anything else is dropped without side effects.
    pub fn submit_response(&mut self) -> bool {
        // A window that already expired resolves first.
        self.fire_due_timers();

        let armed = self
            .session
            .as_ref()
            .is_some_and(|s| s.phase.accepts_response());
        if !armed {
            trace!(phase = ?self.phase(), "response ignored");
            return false;
        }
        self.resolve(ResponseAction::Press);
        true
    }

    fn fire_due_timers(&mut self) {
        while let Some(handle) = self.clock.take_due() {
            self.on_timer(handle);
        }
    }

    fn on_timer(&mut self, handle: TimerHandle) {
        let phase = self.phase();
        match (handle.kind, phase) {
            (TimerKind::PreStimulus, TrialPhase::Waiting) => self.present_stimulus(),
            (TimerKind::ResponseWindow, TrialPhase::Armed) => self.resolve(ResponseAction::Timeout),
            (kind, phase) => {
                unreachable!("{kind} timer #{} fired while {phase:?}", handle.id)
            }
        }
    }

    fn present_stimulus(&mut self) {
        let now = self.clock.now();
        let Some(session) = self.session.as_mut() else {
            unreachable!("pre-stimulus timer without a session");
        };
        let round_index = session.next_round;
        let category = session.sequence[round_index];
        session.current = Some(ActiveTrial::new(round_index, category, now));
        self.transition(TrialPhase::Presenting);
        debug!(round = round_index, %category, "stimulus requested");
        self.outbox.push(EngineEvent::StimulusRequested {
            round_index,
            category,
        });
    }

    fn resolve(&mut self, action: ResponseAction) {
        // Nothing may observe the trial with its window still pending.
        self.clock.cancel();
        let now = self.clock.now();
        let Some(session) = self.session.as_mut() else {
            unreachable!("resolving without a session");
        };
        let Some(trial) = session.current.take() else {
            unreachable!("armed without an active trial");
        };
        let result = match action {
            ResponseAction::Press => trial.press(now),
            ResponseAction::Timeout => trial.timeout(),
        };
        debug!(
            round = result.round_index,
            category = %result.category,
            action = ?result.action,
            rt_ms = ?result.reaction_time_ms,
            correct = result.correct,
            "trial resolved"
        );
        session.record(result.clone());
        self.outbox.push(EngineEvent::TrialResolved(result));

        if session.is_complete() {
            let results = session.results.clone();
            let id = session.id;
            self.transition(TrialPhase::Finished);
            info!(session = id, trials = results.len(), "session finished");
            self.outbox.push(EngineEvent::SessionFinished(results));
        } else {
            self.transition(TrialPhase::Waiting);
        }
    }

    /// Single place where the engine changes phase. The outgoing phase's
    /// timer is always cancelled before the incoming phase arms its own.
    fn transition(&mut self, next: TrialPhase) {
        self.clock.cancel();
        let Some(session) = self.session.as_mut() else {
            unreachable!("transition to {next:?} without a session");
        };
        let from = session.phase;
        session.phase = next;
        let id = session.id;
        let first_round = session.next_round == 0;
        trace!(session = id, ?from, to = ?next, "phase change");

        let timer = match next {
            TrialPhase::Waiting => {
                let mut delay = self.config.pre_stimulus_delay(&mut self.rng);
                if first_round {
                    delay += self.config.start_delay();
                }
                Some((TimerKind::PreStimulus, delay))
            }
            TrialPhase::Armed => Some((TimerKind::ResponseWindow, self.config.response_window())),
            TrialPhase::Idle | TrialPhase::Presenting | TrialPhase::Finished => None,
        };
        if let Some((kind, delay)) = timer {
            if let Err(err) = self.clock.schedule(id, kind, delay) {
                unreachable!("entering {next:?}: {err}");
            }
        }
    }

    pub fn phase(&self) -> TrialPhase {
        self.session.as_ref().map_or(TrialPhase::Idle, |s| s.phase)
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn results(&self) -> &[TrialResult] {
        self.session.as_ref().map(|s| s.results()).unwrap_or(&[])
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    pub fn timer(&self) -> &T {
        self.clock.timer()
    }

    pub fn pending_timer(&self) -> Option<TimerHandle> {
        self.clock.pending().copied()
    }

    /// Time left before the outstanding timer fires.
    pub fn time_until_next_timer(&self) -> Option<Duration> {
        self.clock.time_until_due()
    }

    /// Category currently on screen, if any.
    pub fn current_stimulus(&self) -> Option<StimulusCategory> {
        self.session
            .as_ref()
            .filter(|s| s.phase.stimulus_visible())
            .and_then(|s| s.current.as_ref())
            .map(|t| t.category)
    }

    /// `(completed, total)` for a running or finished session.
    pub fn progress(&self) -> Option<(usize, usize)> {
        self.session
            .as_ref()
            .map(|s| (s.results.len(), s.total_rounds()))
    }
}
