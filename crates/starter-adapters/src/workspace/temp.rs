//! Temporary-directory workspaces using `tempfile` and `walkdir`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use starter_core::{
    application::{ApplicationError, ports::WorkspaceProvider},
    error::{StarterError, StarterResult},
};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Name prefix of every workspace directory.
pub const DEFAULT_PREFIX: &str = "starter-generator-project-";

/// Marker directory that makes a workspace a valid project root.
pub const DEFAULT_MARKER: &str = ".mvn";

/// Production workspace provider.
///
/// Workspaces live in the system temp directory unless a base directory is
/// configured. They are kept on disk until [`WorkspaceProvider::destroy`].
#[derive(Debug, Clone)]
pub struct TempWorkspaceProvider {
    base: Option<PathBuf>,
    prefix: String,
    marker: String,
}

impl TempWorkspaceProvider {
    pub fn new() -> Self {
        Self {
            base: None,
            prefix: DEFAULT_PREFIX.to_string(),
            marker: DEFAULT_MARKER.to_string(),
        }
    }

    /// Create workspaces below `base` instead of the system temp directory.
    pub fn with_base_dir(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    pub fn base_dir(&self) -> Option<&Path> {
        self.base.as_deref()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }
}

impl Default for TempWorkspaceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkspaceProvider for TempWorkspaceProvider {
    fn allocate(&self) -> StarterResult<PathBuf> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(&self.prefix);
        let dir = match &self.base {
            Some(base) => builder.tempdir_in(base),
            None => builder.tempdir(),
        }
        .map_err(|e| allocation_error("create temporary directory", e))?;

        let path = dir.keep();
        if let Err(e) = fs::create_dir(path.join(&self.marker)) {
            let _ = fs::remove_dir_all(&path);
            return Err(allocation_error("create marker directory", e));
        }

        debug!(path = %path.display(), "Created temporary project directory");
        Ok(path)
    }

    fn destroy(&self, workspace: &Path) -> StarterResult<()> {
        if fs::symlink_metadata(workspace).is_err() {
            return Err(cleanup_error(
                workspace,
                "workspace does not exist (already destroyed?)".into(),
            ));
        }

        // Deepest entries first; links are removed, never followed.
        for entry in WalkDir::new(workspace).contents_first(true) {
            let entry = entry.map_err(|e| cleanup_error(workspace, e.to_string()))?;
            let path = entry.path();
            let removed = if entry.file_type().is_dir() {
                fs::remove_dir(path)
            } else {
                fs::remove_file(path)
            };
            removed.map_err(|e| cleanup_error(path, format!("Failed to remove: {e}")))?;
            trace!(path = %path.display(), "Removed");
        }

        debug!(path = %workspace.display(), "Removed temporary project directory");
        Ok(())
    }
}

fn allocation_error(operation: &str, e: io::Error) -> StarterError {
    ApplicationError::WorkspaceAllocation {
        reason: format!("Failed to {operation}: {e}"),
    }
    .into()
}

fn cleanup_error(path: &Path, reason: String) -> StarterError {
    ApplicationError::WorkspaceCleanup {
        path: path.to_path_buf(),
        reason,
    }
    .into()
}
