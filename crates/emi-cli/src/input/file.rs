use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CliError, CliResult};

/// Read a JSON file and deserialise into a typed request.
pub fn read_json<T: DeserializeOwned>(path: &str) -> CliResult<T> {
    let resolved = resolve_path(path)?;
    let contents = fs::read_to_string(&resolved)?;
    serde_json::from_str(&contents).map_err(|e| {
        CliError::InvalidRequest(format!("Failed to parse '{}': {}", resolved.display(), e))
    })
}

/// Resolve relative paths against the working directory and require a regular file.
fn resolve_path(path: &str) -> CliResult<PathBuf> {
    let p = Path::new(path);
    let resolved = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !resolved.exists() {
        return Err(CliError::InvalidRequest(format!(
            "File not found: {}",
            resolved.display()
        )));
    }
    if !resolved.is_file() {
        return Err(CliError::InvalidRequest(format!(
            "Not a file: {}",
            resolved.display()
        )));
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use emi_core::amortization::LoanInput;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[test]
    fn test_reads_loan_request() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"principal": 500000, "annual_rate_percent": 9.5, "tenure_months": 60}}"#
        )
        .unwrap();
        let input: LoanInput = read_json(file.path().to_str().unwrap()).unwrap();
        assert_eq!(input.principal, dec!(500000));
        assert_eq!(input.annual_rate_percent, dec!(9.5));
        assert_eq!(input.tenure_months, 60);
    }

    #[test]
    fn test_missing_file() {
        let result: CliResult<LoanInput> = read_json("/definitely/not/here.json");
        assert!(matches!(result, Err(CliError::InvalidRequest(_))));
    }
}
