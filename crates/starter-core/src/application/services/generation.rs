//! The result handle of one generation request.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{ArchiveBuilder, ArchiveSummary, WorkspaceProvider},
        services::archive_stream::{ArchiveStream, StreamSettings},
    },
    domain::{EffectiveParameters, GenerationId},
    error::StarterResult,
};

/// Collaborators a [`Generation`] needs after the generator returned.
#[derive(Clone)]
pub(crate) struct Pipeline {
    pub(crate) workspaces: Arc<dyn WorkspaceProvider>,
    pub(crate) archiver: Arc<dyn ArchiveBuilder>,
    pub(crate) stream: StreamSettings,
}

/// Outcome of one generator invocation, owning its workspace.
///
/// The workspace is removed exactly once: by [`Generation::close`], by the
/// consuming archive methods, by the [`ArchiveStream`] it was turned into,
/// or on drop. A non-zero status is not an error here; callers check
/// [`Generation::is_success`] or [`Generation::ensure_success`].
pub struct Generation {
    id: GenerationId,
    workspace: PathBuf,
    status: i32,
    output: String,
    parameters: EffectiveParameters,
    archive: Option<Vec<u8>>,
    pipeline: Pipeline,
    released: bool,
}

impl Generation {
    pub(crate) fn new(
        id: GenerationId,
        workspace: PathBuf,
        status: i32,
        output: String,
        parameters: EffectiveParameters,
        pipeline: Pipeline,
    ) -> Self {
        Self {
            id,
            workspace,
            status,
            output,
            parameters,
            archive: None,
            pipeline,
            released: false,
        }
    }

    pub fn id(&self) -> GenerationId {
        self.id
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    /// Generator exit status.
    pub fn status(&self) -> i32 {
        self.status
    }

    /// Everything the generator printed, verbatim.
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn parameters(&self) -> &EffectiveParameters {
        &self.parameters
    }

    pub fn is_success(&self) -> bool {
        self.status == 0
    }

    /// `<artifactId>.zip`, the name collaborators offer the archive under.
    pub fn archive_file_name(&self) -> String {
        self.parameters.archive_file_name()
    }

    /// Fail with [`ApplicationError::GeneratorFailed`] carrying the
    /// diagnostic text if the generator did not succeed.
    pub fn ensure_success(&self) -> StarterResult<()> {
        if self.is_success() {
            return Ok(());
        }
        Err(ApplicationError::GeneratorFailed {
            status: self.status,
            output: self.output.clone(),
        }
        .into())
    }

    /// The materialized archive, if [`Generation::materialize`] ran.
    pub fn archive(&self) -> Option<&[u8]> {
        self.archive.as_deref()
    }

    /// Build the archive into memory and keep it on the handle.
    ///
    /// A failed build leaves no archive behind.
    pub fn materialize(&mut self) -> StarterResult<&[u8]> {
        if self.archive.is_none() {
            let mut buffer = Vec::new();
            let summary = self.write_archive(&mut buffer)?;
            debug!(
                generation = %self.id,
                entries = summary.entries,
                bytes = buffer.len(),
                "Archive materialized"
            );
            self.archive = Some(buffer);
        }
        Ok(self.archive.as_deref().unwrap_or_default())
    }

    /// Materialize the archive, release the workspace and return the bytes.
    pub fn into_archive_bytes(mut self) -> StarterResult<Vec<u8>> {
        self.materialize()?;
        let bytes = self.archive.take().unwrap_or_default();
        self.close()?;
        Ok(bytes)
    }

    /// Stream the archive through a worker thread.
    ///
    /// The workspace is released once the stream is drained, fails or is
    /// dropped.
    pub fn into_stream(self) -> StarterResult<ArchiveStream> {
        self.ensure_success()?;
        let settings = self.pipeline.stream;
        ArchiveStream::spawn(self, settings)
    }

    /// Release the workspace now.
    pub fn close(mut self) -> StarterResult<()> {
        self.release()
    }

    /// Write the archive for this generation into `sink`.
    ///
    /// Refuses to produce bytes for a failed generation.
    pub(crate) fn write_archive(&self, sink: &mut dyn Write) -> StarterResult<ArchiveSummary> {
        self.ensure_success()?;
        self.pipeline.archiver.build(&self.workspace, sink)
    }

    fn release(&mut self) -> StarterResult<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        debug!(generation = %self.id, workspace = %self.workspace.display(), "Cleanup");
        self.pipeline.workspaces.destroy(&self.workspace)
    }
}

impl Drop for Generation {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.release() {
            warn!(
                generation = %self.id,
                workspace = %self.workspace.display(),
                error = %e,
                "Workspace cleanup failed"
            );
        }
    }
}

impl fmt::Debug for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generation")
            .field("id", &self.id)
            .field("workspace", &self.workspace)
            .field("status", &self.status)
            .field("archive_bytes", &self.archive.as_ref().map(Vec::len))
            .field("released", &self.released)
            .finish()
    }
}
