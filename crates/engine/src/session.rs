//! Session – one calculator plus the presentation options and tape that
//! a shell (CLI, daemon connection, GUI window) holds for its lifetime.

use crate::action::Action;
use crate::calculator::{Calculator, Evaluation};
use crate::display::{SizeThresholds, Snapshot};
use crate::keymap::{self, KeyError};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOptions {
    pub thresholds: SizeThresholds,
    /// Maximum number of evaluations kept on the tape.
    pub tape_limit: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            thresholds: SizeThresholds::default(),
            tape_limit: 50,
        }
    }
}

/// Central state handed to every command.
///
/// The tape records each computation (from equals or operator chaining)
/// in memory only; it dies with the session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    calculator: Calculator,
    options: SessionOptions,
    tape: VecDeque<Evaluation>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: SessionOptions) -> Self {
        Self {
            calculator: Calculator::new(),
            options,
            tape: VecDeque::new(),
        }
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    pub fn snapshot(&self) -> Snapshot {
        self.calculator.snapshot_with(self.options.thresholds)
    }

    pub fn apply(&mut self, action: Action) -> Snapshot {
        if let Some(evaluation) = self.calculator.apply(action) {
            self.record(evaluation);
        }
        self.snapshot()
    }

    /// Apply the action bound to `key`. Unmapped keys leave the session
    /// untouched and return `None`.
    pub fn press(&mut self, key: &str) -> Option<Snapshot> {
        let action = keymap::action_for_key(key)?;
        Some(self.apply(action))
    }

    /// Parse `keys` fully before applying anything, so a bad key leaves the
    /// session as it was.
    pub fn press_sequence(&mut self, keys: &str) -> Result<Snapshot, KeyError> {
        let actions = keymap::parse_key_sequence(keys)?;
        for action in actions {
            self.apply(action);
        }
        Ok(self.snapshot())
    }

    pub fn tape(&self) -> impl Iterator<Item = &Evaluation> {
        self.tape.iter()
    }

    fn record(&mut self, evaluation: Evaluation) {
        if self.options.tape_limit == 0 {
            return;
        }
        while self.tape.len() >= self.options.tape_limit {
            self.tape.pop_front();
        }
        self.tape.push_back(evaluation);
    }
}
