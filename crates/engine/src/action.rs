//! Input actions accepted by the calculator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four binary operators on the keypad.
///
/// Serialised as the keypad glyph; the ASCII key and the English name are
/// accepted as aliases when deserialising.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "÷", alias = "/", alias = "divide")]
    Divide,
    #[serde(rename = "×", alias = "*", alias = "multiply")]
    Multiply,
    #[serde(rename = "−", alias = "-", alias = "subtract")]
    Subtract,
    #[serde(rename = "+", alias = "add")]
    Add,
}

impl Operator {
    /// Glyph shown on the keypad and in the expression line.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Divide => "÷",
            Operator::Multiply => "×",
            Operator::Subtract => "−",
            Operator::Add => "+",
        }
    }

    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            Operator::Divide => a / b,
            Operator::Multiply => a * b,
            Operator::Subtract => a - b,
            Operator::Add => a + b,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One input event for the engine.
///
/// The serde shape mirrors the keypad buttons:
/// `{"action": "digit", "value": "7"}`, `{"action": "operator", "value": "×"}`,
/// `{"action": "equals"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "snake_case")]
pub enum Action {
    Digit(char),
    Decimal,
    #[serde(alias = "op")]
    Operator(Operator),
    Equals,
    Clear,
    Backspace,
    Percent,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Digit(d) => write!(f, "{}", d),
            Action::Decimal => f.write_str("."),
            Action::Operator(op) => write!(f, "{}", op),
            Action::Equals => f.write_str("="),
            Action::Clear => f.write_str("C"),
            Action::Backspace => f.write_str("⌫"),
            Action::Percent => f.write_str("%"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operator_apply() {
        assert_eq!(Operator::Add.apply(3.0, 4.0), 7.0);
        assert_eq!(Operator::Subtract.apply(3.0, 4.0), -1.0);
        assert_eq!(Operator::Multiply.apply(7.0, 5.0), 35.0);
        assert_eq!(Operator::Divide.apply(1.0, 4.0), 0.25);
        assert!(Operator::Divide.apply(0.0, 0.0).is_nan());
    }

    #[test]
    fn test_action_json_shape() {
        let v = serde_json::to_value(Action::Operator(Operator::Multiply)).unwrap();
        assert_eq!(v, json!({ "action": "operator", "value": "×" }));

        let v = serde_json::to_value(Action::Equals).unwrap();
        assert_eq!(v, json!({ "action": "equals" }));
    }

    #[test]
    fn test_action_accepts_aliases() {
        let a: Action = serde_json::from_value(json!({ "action": "op", "value": "/" })).unwrap();
        assert_eq!(a, Action::Operator(Operator::Divide));

        let a: Action =
            serde_json::from_value(json!({ "action": "operator", "value": "subtract" })).unwrap();
        assert_eq!(a, Action::Operator(Operator::Subtract));

        let a: Action = serde_json::from_value(json!({ "action": "digit", "value": "7" })).unwrap();
        assert_eq!(a, Action::Digit('7'));
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let r = serde_json::from_value::<Action>(json!({ "action": "sqrt" }));
        assert!(r.is_err());
    }
}
