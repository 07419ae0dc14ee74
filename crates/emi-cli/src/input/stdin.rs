use serde_json::Value;
use std::io::{self, Read};

use crate::error::{CliError, CliResult};

/// Read JSON from stdin when data is piped in.
/// Returns `None` for an interactive terminal or empty input.
pub fn read_stdin() -> CliResult<Option<Value>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|e| CliError::InvalidRequest(format!("stdin: {}", e)))
}
