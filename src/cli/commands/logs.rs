//! `gpctl logs combine <in> <out>`
//!
//! Turns a JSON-lines log (such as `--log-json` output) into one
//! pretty-printed JSON array.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use gpctl_utils::atomic_write::write_json_atomic;
use serde_json::Value;

/// Parse one JSON value per non-blank line and write them as an array.
///
/// Returns the number of values written. A line that is not valid JSON fails
/// the whole operation and leaves `output` untouched.
pub fn combine_json_lines(input: &Path, output: &Path) -> Result<usize> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let mut values = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(line) {
            Ok(value) => values.push(value),
            Err(e) => bail!("{}:{}: invalid JSON: {e}", input.display(), idx + 1),
        }
    }

    write_json_atomic(output, &values)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(values.len())
}

pub fn execute_logs_combine_command(input: &Path, output: &Path) -> Result<()> {
    let count = combine_json_lines(input, output)?;
    println!(
        "Combined {count} JSON objects from {} into {}",
        input.display(),
        output.display()
    );
    Ok(())
}
