use anyhow::{Context, Result, bail};
use gonogo_analysis::{Evaluator, SessionReport};
use gonogo_core::{AppPhase, SessionProfile, StimulusCategory, TrialResult};
use gonogo_experiment::{EngineEvent, InputDispatcher, TrialEngine};
use gonogo_timing::Timer;
use rand::Rng;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::settings::Settings;
use crate::subject::SimulatedSubject;

/// Pace of the presentation loop. Onset is acknowledged one frame after a
/// stimulus is requested, as a display would.
pub const FRAME: Duration = Duration::from_millis(16);

pub struct App<T: Timer, R: Rng, S: Rng> {
    phase: AppPhase,
    engine: TrialEngine<T, R>,
    dispatcher: InputDispatcher,
    evaluator: Evaluator,
    subject: SimulatedSubject<S>,
    requested: Option<StimulusCategory>,
}

impl<T: Timer, R: Rng, S: Rng> App<T, R, S> {
    pub fn new(settings: Settings, timer: T, engine_rng: R, subject_rng: S) -> Result<Self> {
        settings
            .experiment
            .validate()
            .context("invalid experiment settings")?;
        let evaluator =
            Evaluator::new(settings.evaluation).context("invalid evaluation settings")?;
        Ok(Self {
            phase: AppPhase::default(),
            engine: TrialEngine::new(settings.experiment, timer, engine_rng),
            dispatcher: settings.input,
            evaluator,
            subject: SimulatedSubject::new(settings.subject, subject_rng),
            requested: None,
        })
    }

    pub fn phase(&self) -> AppPhase {
        self.phase
    }

    /// Plays one full session for `profile` and scores it.
    pub fn run(&mut self, profile: SessionProfile) -> Result<SessionReport> {
        if self.phase != AppPhase::Intake {
            bail!("a session can only start from intake, not {:?}", self.phase);
        }
        let handle = self.engine.start_session(profile)?;
        self.phase = self.phase.next();
        info!(
            session = handle.id,
            rounds = handle.total_rounds,
            "press SPACE, click or tap on the green circle; hold back on the red square"
        );

        let results = loop {
            self.present_frame();

            let now = self.engine.timer().now();
            if let Some(signal) = self.subject.poll(now) {
                if self.phase.allows_input() {
                    let dispatch = self.dispatcher.forward(signal, &mut self.engine);
                    debug!(?signal, ?dispatch.action, "input");
                }
            }

            if let Some(results) = self.handle_events()? {
                break results;
            }
            self.engine.timer().sleep(FRAME);
        };

        self.phase = self.phase.next();
        Ok(SessionReport::new(&results, profile, &self.evaluator))
    }

    /// Returns to intake so another session can be run.
    pub fn reset(&mut self) {
        self.engine.abandon();
        self.requested = None;
        self.phase = AppPhase::Intake;
    }

    fn present_frame(&mut self) {
        let Some(category) = self.requested.take() else {
            return;
        };
        if self.engine.acknowledge_onset() {
            let now = self.engine.timer().now();
            let look = category.appearance();
            debug!(%category, shape = ?look.shape, "stimulus on screen");
            self.subject.on_stimulus(category, now);
        }
    }

    fn handle_events(&mut self) -> Result<Option<Vec<TrialResult>>> {
        for event in self.engine.update() {
            match event {
                EngineEvent::SessionStarted { .. } => {}
                EngineEvent::StimulusRequested { category, .. } => {
                    self.requested = Some(category);
                }
                EngineEvent::TrialResolved(r) => {
                    let (done, total) = self.engine.progress().unwrap_or_default();
                    info!(
                        "round {done}/{total}: {} {:?} {} {}",
                        r.category,
                        r.action,
                        r.reaction_time_ms
                            .map(|rt| format!("{rt:.0}ms"))
                            .unwrap_or_default(),
                        if r.correct { "ok" } else { "error" },
                    );
                }
                EngineEvent::SessionFinished(results) => return Ok(Some(results)),
            }
        }
        if self.engine.session().is_none() {
            warn!("session was abandoned before it finished");
            bail!("session abandoned");
        }
        Ok(None)
    }
}
