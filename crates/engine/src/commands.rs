//! Command registry and built-in calculator commands.
//!
//! Commands are registered by name and invoked with JSON input/output
//! against a [`Session`].

use crate::action::Action;
use crate::keymap::{self, KeyError};
use crate::session::Session;
use crate::types::*;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Instant;

/// Signature for all engine commands.
pub type CommandHandler = fn(Value, &mut Session) -> Result<Value, CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Key(#[from] KeyError),
    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CommandError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            CommandError::InvalidInput(_) | CommandError::Key(_) => ErrorCode::InvalidInput,
            CommandError::Serialization(_) => ErrorCode::InternalError,
        }
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

pub struct CommandRegistry {
    handlers: HashMap<String, CommandHandler>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        let mut reg = Self {
            handlers: HashMap::new(),
        };
        reg.register("press", cmd_press);
        reg.register("apply", cmd_apply);
        reg.register("keys", cmd_keys);
        reg.register("snapshot", cmd_snapshot);
        reg.register("state", cmd_state);
        reg.register("tape", cmd_tape);
        reg.register("clear", cmd_clear);
        reg
    }

    pub fn register(&mut self, name: &str, handler: CommandHandler) {
        self.handlers.insert(name.to_string(), handler);
    }

    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    /// Execute a command by name and return a full CommandResult.
    pub fn execute(&self, name: &str, args: Value, session: &mut Session) -> CommandResult {
        let run_id = new_run_id();
        let start = Instant::now();

        let handler = match self.handlers.get(name) {
            Some(h) => h,
            None => {
                return result_err(
                    "call",
                    name,
                    &run_id,
                    start.elapsed().as_millis() as u64,
                    ErrorCode::InvalidInput,
                    format!("unknown command: {}", name),
                );
            }
        };

        match handler(args, session) {
            Ok(data) => {
                let mut r = result_ok("call", name, &run_id, start.elapsed().as_millis() as u64);
                r.data = Some(data);
                r
            }
            Err(e) => {
                tracing::debug!(command = name, error = %e, "command failed");
                result_err(
                    "call",
                    name,
                    &run_id,
                    start.elapsed().as_millis() as u64,
                    e.error_code(),
                    e.to_string(),
                )
            }
        }
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Built-in commands
// ===========================================================================

/// `press` – apply the action bound to one keyboard key.
///
/// Args: `{ "key": "Enter" }`
/// Returns: the display snapshot.
fn cmd_press(args: Value, session: &mut Session) -> Result<Value, CommandError> {
    let key = args
        .get("key")
        .and_then(|v| v.as_str())
        .ok_or_else(|| CommandError::InvalidInput("missing 'key' string field".into()))?;

    let snapshot = session
        .press(key)
        .ok_or_else(|| KeyError::Unknown(key.to_string()))?;
    Ok(serde_json::to_value(snapshot)?)
}

/// `apply` – apply an action given in keypad-button form.
///
/// Args: `{ "action": "operator", "value": "×" }`
fn cmd_apply(args: Value, session: &mut Session) -> Result<Value, CommandError> {
    let action: Action = serde_json::from_value(args)
        .map_err(|e| CommandError::InvalidInput(format!("bad action: {}", e)))?;
    Ok(serde_json::to_value(session.apply(action))?)
}

/// `keys` – apply a key sequence.
///
/// Args: `{ "keys": "3+4*5=" }` or `{ "keys": ["3", "+", "Enter"] }`
fn cmd_keys(args: Value, session: &mut Session) -> Result<Value, CommandError> {
    let snapshot = match args.get("keys") {
        Some(Value::String(seq)) => session.press_sequence(seq)?,
        Some(Value::Array(items)) => {
            let mut actions = Vec::with_capacity(items.len());
            for item in items {
                let key = item.as_str().ok_or_else(|| {
                    CommandError::InvalidInput("'keys' array must hold strings".into())
                })?;
                let action = keymap::action_for_key(key)
                    .ok_or_else(|| KeyError::Unknown(key.to_string()))?;
                actions.push(action);
            }
            for action in actions {
                session.apply(action);
            }
            session.snapshot()
        }
        _ => {
            return Err(CommandError::InvalidInput(
                "missing 'keys' string or array field".into(),
            ))
        }
    };
    Ok(serde_json::to_value(snapshot)?)
}

/// `snapshot` – current display and expression line.
fn cmd_snapshot(_args: Value, session: &mut Session) -> Result<Value, CommandError> {
    Ok(serde_json::to_value(session.snapshot())?)
}

/// `state` – raw engine state, for debugging.
fn cmd_state(_args: Value, session: &mut Session) -> Result<Value, CommandError> {
    Ok(serde_json::to_value(session.calculator().state())?)
}

/// `tape` – computations made in this session, oldest first.
fn cmd_tape(_args: Value, session: &mut Session) -> Result<Value, CommandError> {
    let entries: Vec<_> = session.tape().collect();
    Ok(serde_json::json!({ "entries": entries }))
}

/// `clear` – reset the calculator. The tape is kept.
fn cmd_clear(_args: Value, session: &mut Session) -> Result<Value, CommandError> {
    Ok(serde_json::to_value(session.apply(Action::Clear))?)
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keys_command() {
        let mut session = Session::new();
        let reg = CommandRegistry::new();
        let result = reg.execute("keys", json!({ "keys": "3+4*5=" }), &mut session);
        assert_eq!(result.status, Status::Pass);
        let data = result.data.unwrap();
        assert_eq!(data["display_value"], "35");
        assert_eq!(data["expression_text"], "7 × 5 =");
        assert_eq!(data["display_size"], "normal");
    }

    #[test]
    fn test_keys_command_array_form() {
        let mut session = Session::new();
        let reg = CommandRegistry::new();
        let result = reg.execute(
            "keys",
            json!({ "keys": ["9", "/", "4", "Enter"] }),
            &mut session,
        );
        assert_eq!(result.status, Status::Pass);
        assert_eq!(result.data.unwrap()["display_value"], "2.25");
    }

    #[test]
    fn test_press_and_apply() {
        let mut session = Session::new();
        let reg = CommandRegistry::new();

        let r = reg.execute("press", json!({ "key": "8" }), &mut session);
        assert_eq!(r.status, Status::Pass);
        let r = reg.execute(
            "apply",
            json!({ "action": "operator", "value": "×" }),
            &mut session,
        );
        assert_eq!(r.data.unwrap()["expression_text"], "8 ×");

        reg.execute("press", json!({ "key": "2" }), &mut session);
        let r = reg.execute("press", json!({ "key": "Enter" }), &mut session);
        assert_eq!(r.data.unwrap()["display_value"], "16");
    }

    #[test]
    fn test_unknown_key_is_invalid_input() {
        let mut session = Session::new();
        let reg = CommandRegistry::new();
        let r = reg.execute("press", json!({ "key": "Tab" }), &mut session);
        assert_eq!(r.status, Status::Error);
        assert_eq!(r.error.unwrap().code, ErrorCode::InvalidInput);
    }

    #[test]
    fn test_missing_args() {
        let mut session = Session::new();
        let reg = CommandRegistry::new();
        let r = reg.execute("keys", json!({}), &mut session);
        assert_eq!(r.status, Status::Error);
        assert_eq!(r.error.unwrap().code, ErrorCode::InvalidInput);

        let r = reg.execute("apply", json!({ "action": "sqrt" }), &mut session);
        assert_eq!(r.status, Status::Error);
    }

    #[test]
    fn test_state_and_tape() {
        let mut session = Session::new();
        let reg = CommandRegistry::new();
        reg.execute("keys", json!({ "keys": "2+2= 5-" }), &mut session);

        let state = reg.execute("state", json!({}), &mut session).data.unwrap();
        assert_eq!(state["current"], "0");
        assert_eq!(state["pending"]["operand"], "5");
        assert_eq!(state["pending"]["operator"], "−");
        assert_eq!(state["just_evaluated"], false);

        let tape = reg.execute("tape", json!({}), &mut session).data.unwrap();
        assert_eq!(tape["entries"][0]["expression"], "2 + 2 =");
        assert_eq!(tape["entries"][0]["result"], "4");
    }

    #[test]
    fn test_clear_command() {
        let mut session = Session::new();
        let reg = CommandRegistry::new();
        reg.execute("keys", json!({ "keys": "12+3" }), &mut session);
        let r = reg.execute("clear", json!({}), &mut session);
        let data = r.data.unwrap();
        assert_eq!(data["display_value"], "0");
        assert_eq!(data["expression_text"], "");
    }

    #[test]
    fn test_unknown_command() {
        let mut session = Session::new();
        let reg = CommandRegistry::new();
        let result = reg.execute("nonexistent", json!({}), &mut session);
        assert_eq!(result.status, Status::Error);
        assert_eq!(result.error.unwrap().code, ErrorCode::InvalidInput);
    }

    #[test]
    fn test_list_commands() {
        let reg = CommandRegistry::new();
        let names = reg.list();
        assert_eq!(
            names,
            vec!["apply", "clear", "keys", "press", "snapshot", "state", "tape"]
        );
    }
}
