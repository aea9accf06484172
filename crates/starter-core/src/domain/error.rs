use thiserror::Error;

/// Domain error type.
///
/// The core does not validate parameter semantics, so the only domain
/// failures are malformed parameter input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid parameter '{input}': {reason}")]
    InvalidParameter { input: String, reason: String },

    #[error("Parameter key cannot be empty")]
    EmptyParameterKey,
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidParameter { input, .. } => vec![
                format!("Could not parse '{}'", input),
                "Parameters are written as KEY=VALUE, e.g. -D groupId=com.acme".into(),
            ],
            Self::EmptyParameterKey => vec!["Every parameter needs a non-empty key".into()],
        }
    }
}
