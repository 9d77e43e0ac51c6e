//! Run artifacts: `<dir>/<run_id>/result.json` plus one `events.jsonl` line
//! per command result.

use calc_engine::CommandResult;
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};

/// Write the artifacts for one run, logging instead of failing the run.
pub fn write<T: Serialize>(dir: &Path, run_id: &str, result: &T, events: &[CommandResult]) {
    if let Err(e) = try_write(dir, run_id, result, events) {
        tracing::warn!(dir = %dir.display(), run_id, error = %e, "failed to write artifacts");
    }
}

pub fn try_write<T: Serialize>(
    dir: &Path,
    run_id: &str,
    result: &T,
    events: &[CommandResult],
) -> io::Result<PathBuf> {
    let art_dir = dir.join(run_id);
    std::fs::create_dir_all(&art_dir)?;

    std::fs::write(art_dir.join("result.json"), serde_json::to_string_pretty(result)?)?;

    let mut lines = String::new();
    for event in events {
        lines.push_str(&serde_json::to_string(event)?);
        lines.push('\n');
    }
    std::fs::write(art_dir.join("events.jsonl"), lines)?;

    Ok(art_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calc_engine::types::{new_run_id, result_ok};
    use tempfile::tempdir;

    #[test]
    fn test_writes_result_and_events() {
        let dir = tempdir().unwrap();
        let run_id = new_run_id();
        let events = vec![
            result_ok("keys", "3+4=", &run_id, 0),
            result_ok("tape", "", &run_id, 0),
        ];

        let art_dir = try_write(dir.path(), &run_id, &events[0], &events).unwrap();
        assert_eq!(art_dir, dir.path().join(&run_id));

        let result = std::fs::read_to_string(art_dir.join("result.json")).unwrap();
        let parsed: CommandResult = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed.command, "keys");

        let events = std::fs::read_to_string(art_dir.join("events.jsonl")).unwrap();
        assert_eq!(events.lines().count(), 2);
    }

    #[test]
    fn test_unwritable_dir_is_reported() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();

        let r = try_write(&blocker, "run", &serde_json::json!({}), &[]);
        assert!(r.is_err());

        // The logging wrapper swallows the same failure.
        write(&blocker, "run", &serde_json::json!({}), &[]);
    }
}
