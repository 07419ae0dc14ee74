use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmiError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl EmiError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        EmiError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the rejected field, if this is an input error.
    pub fn field(&self) -> Option<&str> {
        match self {
            EmiError::InvalidInput { field, .. } => Some(field.as_str()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for EmiError {
    fn from(e: serde_json::Error) -> Self {
        EmiError::SerializationError(e.to_string())
    }
}
