pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

use crate::error::CliResult;

/// Read a request from `--input <file>` or piped stdin, in that order.
/// Returns `None` when neither is available.
pub fn read_request<T: DeserializeOwned>(path: Option<&str>) -> CliResult<Option<T>> {
    if let Some(path) = path {
        return file::read_json(path).map(Some);
    }
    match stdin::read_stdin()? {
        Some(value) => Ok(Some(serde_json::from_value(value).map_err(|e| {
            crate::error::CliError::InvalidRequest(format!("stdin: {}", e))
        })?)),
        None => Ok(None),
    }
}
