use gonogo_core::StimulusCategory;
use gonogo_experiment::{InputSignal, Key};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Behaviour of the simulated participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectModel {
    pub min_rt_ms: u64,
    pub max_rt_ms: u64,
    /// Chance of not pressing on a Go stimulus.
    pub miss_rate: f64,
    /// Chance of pressing on a NoGo stimulus.
    pub commission_rate: f64,
}

impl Default for SubjectModel {
    fn default() -> Self {
        Self {
            min_rt_ms: 230,
            max_rt_ms: 420,
            miss_rate: 0.05,
            commission_rate: 0.15,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PlannedPress {
    at_ns: u64,
    signal: InputSignal,
}

/// Scripted participant: plans at most one press per stimulus and holds the
/// key for one extra frame, which produces an auto-repeat signal.
pub struct SimulatedSubject<R: Rng> {
    model: SubjectModel,
    rng: R,
    planned: Option<PlannedPress>,
    holding: bool,
}

impl<R: Rng> SimulatedSubject<R> {
    pub fn new(model: SubjectModel, rng: R) -> Self {
        Self {
            model,
            rng,
            planned: None,
            holding: false,
        }
    }

    pub fn on_stimulus(&mut self, category: StimulusCategory, onset_ns: u64) {
        let press = match category {
            StimulusCategory::Go => !self.rng.random_bool(self.model.miss_rate.clamp(0.0, 1.0)),
            StimulusCategory::NoGo => self
                .rng
                .random_bool(self.model.commission_rate.clamp(0.0, 1.0)),
        };
        self.planned = press.then(|| {
            let rt_ms = if self.model.min_rt_ms < self.model.max_rt_ms {
                self.rng.random_range(self.model.min_rt_ms..self.model.max_rt_ms)
            } else {
                self.model.min_rt_ms
            };
            let signal = match self.rng.random_range(0..3) {
                0 => InputSignal::TouchStart,
                1 => InputSignal::PointerDown { synthesized: false },
                _ => InputSignal::KeyDown {
                    key: Key::Space,
                    repeat: false,
                },
            };
            PlannedPress {
                at_ns: onset_ns + rt_ms * 1_000_000,
                signal,
            }
        });
    }

    pub fn poll(&mut self, now_ns: u64) -> Option<InputSignal> {
        if self.holding {
            self.holding = false;
            return Some(InputSignal::KeyDown {
                key: Key::Space,
                repeat: true,
            });
        }
        let planned = self.planned.filter(|p| now_ns >= p.at_ns)?;
        self.planned = None;
        self.holding = matches!(planned.signal, InputSignal::KeyDown { .. });
        Some(planned.signal)
    }
}
