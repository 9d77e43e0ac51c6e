//! Keyboard-to-action mapping.
//!
//! Key names follow the DOM `KeyboardEvent.key` values the webview sends,
//! so the GUI and the CLI share one table.

use crate::action::{Action, Operator};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("unknown key: {0:?}")]
    Unknown(String),
}

/// Map a single key name onto an engine action.
///
/// Returns `None` for keys the calculator does not handle.
pub fn action_for_key(key: &str) -> Option<Action> {
    let action = match key {
        "." => Action::Decimal,
        "+" => Action::Operator(Operator::Add),
        "-" | "−" => Action::Operator(Operator::Subtract),
        "*" | "×" => Action::Operator(Operator::Multiply),
        "/" | "÷" => Action::Operator(Operator::Divide),
        "Enter" | "=" => Action::Equals,
        "Escape" => Action::Clear,
        "Backspace" => Action::Backspace,
        "%" => Action::Percent,
        _ => {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(d), None) if d.is_ascii_digit() => Action::Digit(d),
                _ => return None,
            }
        }
    };
    Some(action)
}

/// Parse a key sequence such as `"3+4*5="` or `"12 Backspace ="`.
///
/// Whitespace separates tokens. A token is either a named key
/// (`Enter`, `Escape`, ...) or a run of single-character keys.
pub fn parse_key_sequence(input: &str) -> Result<Vec<Action>, KeyError> {
    let mut actions = Vec::new();
    for token in input.split_whitespace() {
        if let Some(action) = action_for_key(token) {
            actions.push(action);
            continue;
        }
        for c in token.chars() {
            let mut buf = [0u8; 4];
            let key = c.encode_utf8(&mut buf);
            match action_for_key(key) {
                Some(action) => actions.push(action),
                None => return Err(KeyError::Unknown(token.to_string())),
            }
        }
    }
    Ok(actions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_keys() {
        for d in '0'..='9' {
            assert_eq!(action_for_key(&d.to_string()), Some(Action::Digit(d)));
        }
    }

    #[test]
    fn test_operator_and_control_keys() {
        assert_eq!(action_for_key("*"), Some(Action::Operator(Operator::Multiply)));
        assert_eq!(action_for_key("/"), Some(Action::Operator(Operator::Divide)));
        assert_eq!(action_for_key("-"), Some(Action::Operator(Operator::Subtract)));
        assert_eq!(action_for_key("Enter"), Some(Action::Equals));
        assert_eq!(action_for_key("="), Some(Action::Equals));
        assert_eq!(action_for_key("Escape"), Some(Action::Clear));
        assert_eq!(action_for_key("Backspace"), Some(Action::Backspace));
        assert_eq!(action_for_key("."), Some(Action::Decimal));
    }

    #[test]
    fn test_unmapped_keys() {
        assert_eq!(action_for_key("a"), None);
        assert_eq!(action_for_key("F5"), None);
        assert_eq!(action_for_key("12"), None);
        assert_eq!(action_for_key(""), None);
    }

    #[test]
    fn test_parse_key_sequence() {
        let actions = parse_key_sequence("3+4*5=").unwrap();
        assert_eq!(
            actions,
            vec![
                Action::Digit('3'),
                Action::Operator(Operator::Add),
                Action::Digit('4'),
                Action::Operator(Operator::Multiply),
                Action::Digit('5'),
                Action::Equals,
            ]
        );
    }

    #[test]
    fn test_parse_key_sequence_named_keys() {
        let actions = parse_key_sequence("12 Backspace Enter").unwrap();
        assert_eq!(
            actions,
            vec![
                Action::Digit('1'),
                Action::Digit('2'),
                Action::Backspace,
                Action::Equals,
            ]
        );
    }

    #[test]
    fn test_parse_key_sequence_rejects_unknown() {
        let err = parse_key_sequence("3 + x").unwrap_err();
        assert_eq!(err, KeyError::Unknown("x".into()));
    }
}
