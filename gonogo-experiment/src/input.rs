//! Maps raw input signals onto the engine's single "respond now" action.
//!
//! The dispatcher keeps no state between signals. Whether a response counts
//! is decided by the engine alone; the dispatcher only makes sure one
//! physical action turns into at most one logical event.

use gonogo_timing::Timer;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::state::TrialEngine;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Space,
    Enter,
    Escape,
    Char(char),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputSignal {
    KeyDown { key: Key, repeat: bool },
    /// `synthesized` marks compatibility mouse events generated from a touch.
    PointerDown { synthesized: bool },
    TouchStart,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogicalInput {
    Respond,
    Abandon,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Dispatch {
    pub action: Option<LogicalInput>,
    /// The platform's default handling (scrolling, focus, emulated clicks)
    /// should be suppressed.
    pub prevent_default: bool,
}

impl Dispatch {
    const IGNORED: Dispatch = Dispatch {
        action: None,
        prevent_default: false,
    };
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputDispatcher {
    pub response_key: Key,
    pub abort_key: Option<Key>,
}

impl Default for InputDispatcher {
    fn default() -> Self {
        Self {
            response_key: Key::Space,
            abort_key: Some(Key::Escape),
        }
    }
}

impl InputDispatcher {
    pub fn classify(&self, signal: &InputSignal) -> Dispatch {
        match *signal {
            InputSignal::KeyDown { key, repeat } if key == self.response_key => Dispatch {
                action: (!repeat).then_some(LogicalInput::Respond),
                prevent_default: true,
            },
            InputSignal::KeyDown { key, repeat: false } if Some(key) == self.abort_key => Dispatch {
                action: Some(LogicalInput::Abandon),
                prevent_default: true,
            },
            InputSignal::KeyDown { .. } => Dispatch::IGNORED,
            InputSignal::PointerDown { synthesized: true } => Dispatch {
                action: None,
                prevent_default: true,
            },
            InputSignal::PointerDown { synthesized: false } | InputSignal::TouchStart => Dispatch {
                action: Some(LogicalInput::Respond),
                prevent_default: true,
            },
        }
    }

    /// Classifies `signal` and hands the resulting action to the engine.
    pub fn forward<T: Timer, R: Rng>(
        &self,
        signal: InputSignal,
        engine: &mut TrialEngine<T, R>,
    ) -> Dispatch {
        let dispatch = self.classify(&signal);
        match dispatch.action {
            Some(LogicalInput::Respond) => {
                engine.submit_response();
            }
            Some(LogicalInput::Abandon) if engine.phase().is_running() => {
                engine.abandon();
            }
            Some(LogicalInput::Abandon) => {
                trace!(phase = ?engine.phase(), "abandon ignored outside a running session")
            }
            None => trace!(?signal, "input dropped"),
        }
        dispatch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key) -> InputSignal {
        InputSignal::KeyDown { key, repeat: false }
    }

    #[test]
    fn all_physical_sources_respond() {
        let d = InputDispatcher::default();
        for signal in [
            key(Key::Space),
            InputSignal::PointerDown { synthesized: false },
            InputSignal::TouchStart,
        ] {
            let out = d.classify(&signal);
            assert_eq!(out.action, Some(LogicalInput::Respond), "{signal:?}");
            assert!(out.prevent_default);
        }
    }

    #[test]
    fn duplicates_of_one_action_are_dropped() {
        let d = InputDispatcher::default();
        let repeat = d.classify(&InputSignal::KeyDown {
            key: Key::Space,
            repeat: true,
        });
        assert_eq!(repeat.action, None);
        assert!(repeat.prevent_default, "held space must not scroll");

        let emulated = d.classify(&InputSignal::PointerDown { synthesized: true });
        assert_eq!(emulated.action, None);
    }

    #[test]
    fn other_keys_pass_through() {
        let d = InputDispatcher::default();
        assert_eq!(d.classify(&key(Key::Char('a'))), Dispatch::IGNORED);
        assert_eq!(d.classify(&key(Key::Enter)), Dispatch::IGNORED);
        assert_eq!(
            d.classify(&key(Key::Escape)).action,
            Some(LogicalInput::Abandon)
        );
    }

    #[test]
    fn response_key_is_configurable() {
        let d = InputDispatcher {
            response_key: Key::Enter,
            abort_key: None,
        };
        assert_eq!(d.classify(&key(Key::Enter)).action, Some(LogicalInput::Respond));
        assert_eq!(d.classify(&key(Key::Space)), Dispatch::IGNORED);
        assert_eq!(d.classify(&key(Key::Escape)), Dispatch::IGNORED);
    }
}
