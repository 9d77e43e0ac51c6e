//! Engine crate – the calculator state machine and everything shared by
//! the keypad GUI and the headless CLI harness.
//!
//! This crate does NOT depend on Tauri runtime types. The calculator
//! itself is pure and synchronous; sessions, the command registry and the
//! scenario runner wrap it for the shells.

pub mod action;
pub mod calculator;
pub mod commands;
pub mod display;
pub mod keymap;
pub mod numeral;
pub mod scenario;
pub mod session;
pub mod types;

// Re-exports for convenience
pub use action::{Action, Operator};
pub use calculator::{Calculator, EngineState, Evaluation, MAX_DIGITS};
pub use commands::CommandRegistry;
pub use display::{DisplaySize, SizeThresholds, Snapshot};
pub use session::{Session, SessionOptions};
pub use types::{CommandResult, ErrorCode, ErrorInfo, Status};
