//! Application layer errors.
//!
//! These errors represent failures while running the pipeline. None of them
//! is retried.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during generation, archiving or cleanup.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// No temporary workspace could be created.
    #[error("Workspace allocation failed: {reason}")]
    WorkspaceAllocation { reason: String },

    /// The workspace tree could not be fully removed.
    #[error("Workspace cleanup failed for {path}: {reason}")]
    WorkspaceCleanup { path: PathBuf, reason: String },

    /// The generator exited with a non-zero status.
    ///
    /// `output` is the generator's diagnostic text, unmodified.
    #[error("Generator exited with status {status}")]
    GeneratorFailed { status: i32, output: String },

    /// The generator panicked instead of returning a status.
    #[error("Generator '{generator}' panicked")]
    GeneratorPanicked { generator: String },

    /// A file could not be added to the archive.
    #[error("Archive error at {path}: {reason}")]
    ArchiveFailed { path: PathBuf, reason: String },

    /// Producer and consumer of an archive stream fell out of step.
    #[error("Archive streaming failed: {reason}")]
    StreamingFailed { reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::WorkspaceAllocation { .. } => vec![
                "Check that the temporary directory is writable".into(),
                "Set workspace.temp_dir in the configuration to use another location".into(),
            ],
            Self::WorkspaceCleanup { path, .. } => vec![
                format!("Leftover files may remain in {}", path.display()),
                "Remove the directory manually once no process uses it".into(),
            ],
            Self::GeneratorFailed { .. } => vec![
                "Review the generator output above".into(),
                "Check the archetype coordinates and parameter values".into(),
            ],
            Self::GeneratorPanicked { .. } => {
                vec!["The generator crashed; run with -vv to see the log".into()]
            }
            Self::ArchiveFailed { path, .. } => vec![
                format!("Could not read {}", path.display()),
                "Another process may have modified the workspace".into(),
            ],
            Self::StreamingFailed { .. } => vec!["The archive was not delivered completely".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::WorkspaceAllocation { .. } => ErrorCategory::Workspace,
            Self::WorkspaceCleanup { .. } => ErrorCategory::Cleanup,
            Self::GeneratorFailed { .. } | Self::GeneratorPanicked { .. } => {
                ErrorCategory::Generation
            }
            Self::ArchiveFailed { .. } => ErrorCategory::Archive,
            Self::StreamingFailed { .. } => ErrorCategory::Streaming,
        }
    }
}
