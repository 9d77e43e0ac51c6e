//! Interactive prompt over a single session.

use calc_engine::{CommandRegistry, Session};
use dialoguer::Input;

enum Outcome {
    Show(Vec<String>),
    Quit,
}

pub fn run(registry: &CommandRegistry) {
    let mut session = Session::new();
    println!("Type keys (e.g. 3+4*5=, Backspace, Escape). 'tape' lists results, 'quit' exits.");

    loop {
        let prompt = session.snapshot().display_value;
        let line: String = match Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
        {
            Ok(line) => line,
            Err(e) => {
                tracing::debug!(error = %e, "prompt closed");
                break;
            }
        };

        match handle_line(&mut session, registry, &line) {
            Outcome::Show(lines) => {
                for l in lines {
                    println!("{}", l);
                }
            }
            Outcome::Quit => break,
        }
    }
}

fn handle_line(session: &mut Session, registry: &CommandRegistry, line: &str) -> Outcome {
    match line.trim() {
        "quit" | "exit" => Outcome::Quit,
        "" => Outcome::Show(vec![]),
        "tape" => Outcome::Show(
            session
                .tape()
                .map(|e| format!("{} {}", e.expression, e.result))
                .collect(),
        ),
        keys => {
            let result = registry.execute("keys", serde_json::json!({ "keys": keys }), session);
            match result.error {
                Some(err) => Outcome::Show(vec![format!("error: {}", err.message)]),
                None => {
                    let snap = session.snapshot();
                    let mut out = Vec::new();
                    if !snap.expression_text.is_empty() {
                        out.push(format!("  {}", snap.expression_text));
                    }
                    out.push(format!("  {}", snap.display_value));
                    Outcome::Show(out)
                }
            }
        }
    }
}
