//! Unified error handling for Starter Core.
//!
//! Wraps domain and application errors behind one root type so adapters and
//! the CLI only ever deal with [`StarterError`].

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for Starter Core operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StarterError {
    /// Errors from the domain layer (malformed parameters).
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (workspace, generator, archive).
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl StarterError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check your setup and try again".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in starter".into(),
                "Please report this issue at: https://github.com/flowlogix/starter/issues".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(_) => ErrorCategory::Validation,
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Diagnostic text of a failed generator run, if this is one.
    pub fn generator_output(&self) -> Option<&str> {
        match self {
            Self::Application(ApplicationError::GeneratorFailed { output, .. }) => Some(output),
            _ => None,
        }
    }
}

/// Error categories for UI display.
///
/// Cleanup failures have their own category so callers can tell them apart
/// from allocation and generation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Generation,
    Workspace,
    Cleanup,
    Archive,
    Streaming,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type StarterResult<T> = Result<T, StarterError>;

/// Extension trait for adding context to errors.
pub trait Context<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> StarterResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> StarterResult<T> {
        self.map_err(|e| StarterError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}
