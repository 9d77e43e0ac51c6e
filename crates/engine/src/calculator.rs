//! The calculator engine: input state machine plus compute/format rules.
//!
//! Every handler is total. Input that makes no sense in the current state
//! (equals with nothing pending, digits past the length bound, ...) is
//! absorbed without changing anything.

use crate::action::{Action, Operator};
use crate::display::{DisplaySize, SizeThresholds, Snapshot};
use crate::numeral;
use serde::{Deserialize, Serialize};

/// Longest operand that digit entry will grow.
pub const MAX_DIGITS: usize = 12;

/// Left operand and operator captured when an operator key was pressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pending {
    pub operand: String,
    pub operator: Operator,
}

/// The four fields of engine state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineState {
    pub current: String,
    pub pending: Option<Pending>,
    pub just_evaluated: bool,
}

impl EngineState {
    pub fn previous(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.operand.as_str())
    }

    pub fn operator(&self) -> Option<Operator> {
        self.pending.as_ref().map(|p| p.operator)
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self {
            current: "0".to_string(),
            pending: None,
            just_evaluated: false,
        }
    }
}

/// A completed computation, as it appears on the expression line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub expression: String,
    pub result: String,
}

#[derive(Debug, Clone, Default)]
pub struct Calculator {
    state: EngineState,
    expression: String,
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// The operand currently shown on the display.
    pub fn display_value(&self) -> &str {
        &self.state.current
    }

    /// The running expression line; empty after `clear`.
    pub fn expression_text(&self) -> &str {
        &self.expression
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshot_with(SizeThresholds::default())
    }

    pub fn snapshot_with(&self, thresholds: SizeThresholds) -> Snapshot {
        Snapshot {
            display_value: self.state.current.clone(),
            expression_text: self.expression.clone(),
            display_size: DisplaySize::classify(&self.state.current, thresholds),
        }
    }

    /// Dispatch one action. Returns the computation it triggered, if any.
    pub fn apply(&mut self, action: Action) -> Option<Evaluation> {
        tracing::trace!(%action, "apply");
        match action {
            Action::Digit(d) => {
                self.digit(d);
                None
            }
            Action::Decimal => {
                self.decimal();
                None
            }
            Action::Operator(op) => self.operator(op),
            Action::Equals => self.equals(),
            Action::Clear => {
                self.clear();
                None
            }
            Action::Backspace => {
                self.backspace();
                None
            }
            Action::Percent => {
                self.percent();
                None
            }
        }
    }

    pub fn digit(&mut self, d: char) {
        if !d.is_ascii_digit() {
            tracing::debug!(input = %d, "ignoring non-digit input");
            return;
        }
        if self.state.just_evaluated {
            // A digit after equals starts a fresh entry.
            self.state.current.clear();
            self.state.just_evaluated = false;
        }
        if self.state.current == "0" {
            self.state.current.clear();
        }
        if self.state.current.len() >= MAX_DIGITS {
            tracing::debug!(current = %self.state.current, "operand at max length");
            return;
        }
        self.state.current.push(d);
    }

    pub fn decimal(&mut self) {
        if self.state.just_evaluated {
            self.state.current = "0".to_string();
            self.state.just_evaluated = false;
        }
        if !self.state.current.contains('.') {
            self.state.current.push('.');
        }
    }

    /// Set up `op` as the pending operator, first resolving any operation
    /// that is already pending (`3 + 4 ×` computes `7` before pending `×`).
    pub fn operator(&mut self, op: Operator) -> Option<Evaluation> {
        let resolved = if self.state.pending.is_some() && !self.state.just_evaluated {
            self.compute()
        } else {
            None
        };

        let operand = std::mem::replace(&mut self.state.current, "0".to_string());
        self.expression = format!("{} {}", operand, op);
        self.state.pending = Some(Pending {
            operand,
            operator: op,
        });
        self.state.just_evaluated = false;
        resolved
    }

    pub fn equals(&mut self) -> Option<Evaluation> {
        self.compute()
    }

    pub fn clear(&mut self) {
        self.state = EngineState::default();
        self.expression.clear();
    }

    pub fn backspace(&mut self) {
        if self.state.current.chars().count() > 1 {
            self.state.current.pop();
        } else {
            self.state.current = "0".to_string();
        }
    }

    /// Divide the current operand by 100 in place.
    ///
    /// Unlike `compute`, the quotient is not rounded to ten significant
    /// digits before it is printed.
    pub fn percent(&mut self) {
        let value = numeral::parse(&self.state.current) / 100.0;
        self.state.current = numeral::to_display(value);
    }

    fn compute(&mut self) -> Option<Evaluation> {
        let Pending { operand, operator } = self.state.pending.take()?;

        let a = numeral::parse(&operand);
        let b = numeral::parse(&self.state.current);
        let result = numeral::format_result(operator.apply(a, b));

        let expression = format!("{} {} {} =", operand, operator, self.state.current);
        tracing::debug!(%expression, %result, "computed");

        self.expression = expression.clone();
        self.state.current = result.clone();
        self.state.just_evaluated = true;
        Some(Evaluation { expression, result })
    }
}
