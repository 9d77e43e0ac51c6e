//! `calcctl` – headless CLI harness for the keypad calculator engine.
//!
//! Drives the same engine that powers the keypad window, without a
//! window server: one-shot key sequences, registry calls, an interactive
//! prompt, YAML scenarios and a socket daemon.

mod artifacts;
mod repl;
mod serve;

use calc_engine::types::*;
use calc_engine::{CommandRegistry, CommandResult, Session};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

// ===========================================================================
// CLI definition
// ===========================================================================

#[derive(Parser)]
#[command(
    name = "calcctl",
    version,
    about = "CLI harness for the keypad calculator"
)]
struct Cli {
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Feed a key sequence to a fresh calculator, e.g. "3+4*5=".
    Keys {
        /// Keys to press. Named keys (Enter, Escape, Backspace) are
        /// separated by whitespace.
        sequence: String,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Invoke an engine command by name with JSON args.
    Call {
        /// Command name (e.g. "keys", "press", "apply", "state").
        cmd: String,
        /// JSON args to pass to the command.
        #[arg(long, default_value = "{}")]
        args: String,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
        /// Directory for artifacts output.
        #[arg(long)]
        artifacts: Option<PathBuf>,
    },

    /// Interactive prompt: type keys, see the display after each line.
    Repl,

    /// Run a scripted scenario from a YAML file.
    RunScenario {
        /// Path to the scenario YAML file.
        file: PathBuf,
        /// Directory for artifacts output.
        #[arg(long)]
        artifacts: Option<PathBuf>,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Start daemon mode over a Unix socket.
    Serve {
        /// Path for the Unix domain socket.
        #[arg(long)]
        socket: PathBuf,
    },
}

// ===========================================================================
// Main
// ===========================================================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let registry = CommandRegistry::new();

    match cli.command {
        Commands::Keys { sequence, json } => cmd_keys(&sequence, json, &registry),
        Commands::Call {
            cmd,
            args,
            json,
            artifacts,
        } => cmd_call(&cmd, &args, json, artifacts, &registry),
        Commands::Repl => repl::run(&registry),
        Commands::RunScenario {
            file,
            artifacts,
            json,
        } => cmd_run_scenario(&file, json, artifacts, &registry),
        Commands::Serve { socket } => serve::run_daemon(socket, registry).await,
    }
}

fn init_tracing(json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

// ===========================================================================
// Subcommand implementations
// ===========================================================================

fn cmd_keys(sequence: &str, json: bool, registry: &CommandRegistry) {
    let mut session = Session::new();
    let result = registry.execute(
        "keys",
        serde_json::json!({ "keys": sequence }),
        &mut session,
    );
    output_result(&result, json);
}

fn cmd_call(
    cmd: &str,
    args_str: &str,
    json: bool,
    artifacts: Option<PathBuf>,
    registry: &CommandRegistry,
) {
    let args: serde_json::Value = match serde_json::from_str(args_str) {
        Ok(v) => v,
        Err(e) => {
            let r = result_err(
                "call",
                cmd,
                &new_run_id(),
                0,
                ErrorCode::InvalidInput,
                format!("invalid JSON args: {}", e),
            );
            output_result(&r, json);
            return;
        }
    };

    let mut session = Session::new();
    let result = registry.execute(cmd, args, &mut session);
    if let Some(ref dir) = artifacts {
        artifacts::write(dir, &result.run_id, &result, std::slice::from_ref(&result));
    }
    output_result(&result, json);
}

fn cmd_run_scenario(
    file: &PathBuf,
    json: bool,
    artifacts: Option<PathBuf>,
    registry: &CommandRegistry,
) {
    let yaml = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            let r = result_err(
                "run-scenario",
                &file.display().to_string(),
                &new_run_id(),
                0,
                ErrorCode::IoError,
                format!("cannot read scenario file: {}", e),
            );
            output_result(&r, json);
            return;
        }
    };

    let scenario = match calc_engine::scenario::load_scenario(&yaml) {
        Ok(s) => s,
        Err(e) => {
            let r = result_err(
                "run-scenario",
                &file.display().to_string(),
                &new_run_id(),
                0,
                ErrorCode::InvalidInput,
                e,
            );
            output_result(&r, json);
            return;
        }
    };

    let mut session = Session::new();
    let scenario_result = calc_engine::scenario::run_scenario(&scenario, &mut session, registry);

    if json {
        let j = serde_json::to_string_pretty(&scenario_result).unwrap_or_default();
        println!("{}", j);
    } else {
        println!(
            "Scenario: {}",
            scenario_result.name.as_deref().unwrap_or("<unnamed>")
        );
        println!("Overall: {:?}", scenario_result.overall_status);
        for (i, sr) in scenario_result.step_results.iter().enumerate() {
            let shown = sr
                .data
                .as_ref()
                .and_then(|d| d.get("display_value"))
                .and_then(|v| v.as_str())
                .unwrap_or("-");
            println!(
                "  Step {}: {} -> {:?} [{}] ({}ms)",
                i, sr.target, sr.status, shown, sr.timing_ms.total
            );
            if let Some(ref err) = sr.error {
                println!("    {} – {}", err.code, err.message);
            }
        }
    }

    if let Some(ref dir) = artifacts {
        artifacts::write(
            dir,
            &new_run_id(),
            &scenario_result,
            &scenario_result.step_results,
        );
    }

    if scenario_result.overall_status == Status::Fail {
        std::process::exit(1);
    }
}

// ===========================================================================
// Output helpers
// ===========================================================================

fn output_result(result: &CommandResult, json: bool) {
    if json {
        let j = serde_json::to_string_pretty(result).unwrap_or_default();
        println!("{}", j);
    } else {
        print_human(result);
    }

    // Exit with non-zero status on error/fail
    match result.status {
        Status::Pass => {}
        Status::Fail => std::process::exit(1),
        Status::Error => std::process::exit(2),
    }
}

fn print_human(r: &CommandResult) {
    let status_icon = match r.status {
        Status::Pass => "PASS",
        Status::Fail => "FAIL",
        Status::Error => "ERROR",
    };

    println!("[{}] {} {}", status_icon, r.command, r.target);

    if let Some(ref err) = r.error {
        println!("  error:  {} – {}", err.code, err.message);
    }

    if let Some(ref data) = r.data {
        let expression = data.get("expression_text").and_then(|v| v.as_str());
        let display = data.get("display_value").and_then(|v| v.as_str());
        match (expression, display) {
            (Some(expression), Some(display)) => {
                if !expression.is_empty() {
                    println!("  {}", expression);
                }
                println!("  {}", display);
            }
            _ => {
                if let Ok(s) = serde_json::to_string_pretty(data) {
                    for line in s.lines() {
                        println!("  {}", line);
                    }
                }
            }
        }
    }

    println!("  run_id: {} ({}ms)", r.run_id, r.timing_ms.total);
}
