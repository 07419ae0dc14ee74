//! CLI error types.

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Loan amount missing, unparseable or not positive.
    #[error("Please enter a valid loan amount")]
    InvalidLoanAmount,

    /// Rate missing, unparseable or outside the accepted range.
    #[error("Please enter a valid interest rate (0-{max})")]
    InvalidInterestRate { max: String },

    /// Tenure missing or outside the accepted range.
    #[error("Please enter a valid tenure ({min}-{max} years)")]
    InvalidTenure { min: u32, max: u32 },

    /// Currency code not in the catalog.
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Missing required argument.
    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    /// History record not found.
    #[error("No saved calculation with id {0}")]
    RecordNotFound(u64),

    /// Unreadable `--input` file or stdin payload.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Engine or store error.
    #[error(transparent)]
    Core(#[from] emi_core::EmiError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Result could not be rendered as JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
