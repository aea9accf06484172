//! Streaming bridge: push-style archive production, pull-style reads.
//!
//! The archive builder runs on a dedicated worker thread and writes into a
//! [`pipe`]. The consumer reads the other end. The worker owns the
//! [`Generation`] while it writes and hands it back when joined, so the
//! workspace is released only after the consumer has drained or abandoned
//! the stream.

use std::fmt;
use std::io::{self, Read, Write};
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::{
    application::{
        ApplicationError,
        pipe::{DEFAULT_CHUNK_SIZE, DEFAULT_PIPE_CAPACITY, PipeReader, pipe},
        services::generation::Generation,
    },
    domain::GenerationId,
    error::StarterResult,
};

/// Chunking of the streaming bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSettings {
    /// Size of each pipe frame and of each consumer read in [`ArchiveStream::copy_to`].
    pub chunk_size: usize,
    /// Frames buffered before the producer blocks.
    pub pipe_capacity: usize,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            pipe_capacity: DEFAULT_PIPE_CAPACITY,
        }
    }
}

/// A zip archive being produced on a worker thread.
///
/// Reading returns archive bytes until the producer signals end of data.
/// If the producer fails, every later read returns that failure as an error
/// instead of a short archive.
pub struct ArchiveStream {
    id: GenerationId,
    file_name: String,
    chunk_size: usize,
    reader: Option<PipeReader>,
    worker: Option<JoinHandle<Generation>>,
    /// Terminal read error, repeated once the reader is gone.
    failure: Option<(io::ErrorKind, String)>,
    cleanup: Option<StarterResult<()>>,
}

impl ArchiveStream {
    pub(crate) fn spawn(generation: Generation, settings: StreamSettings) -> StarterResult<Self> {
        let id = generation.id();
        let file_name = generation.archive_file_name();
        let (mut writer, reader) = pipe(settings.chunk_size, settings.pipe_capacity);

        let worker = thread::Builder::new()
            .name(format!("starter-archive-{id}"))
            .spawn(move || {
                match generation.write_archive(&mut writer) {
                    Ok(summary) => {
                        debug!(generation = %id, entries = summary.entries, "Archive produced");
                        if let Err(e) = writer.finish() {
                            debug!(generation = %id, error = %e, "Consumer left before end of data");
                        }
                    }
                    Err(e) => {
                        warn!(generation = %id, error = %e, "Failed to stream archive");
                        if let Err(send) = writer.fail(e.to_string()) {
                            debug!(generation = %id, error = %send, "Consumer already gone");
                        }
                    }
                }
                generation
            })
            .map_err(|e| ApplicationError::StreamingFailed {
                reason: format!("cannot start archive worker: {e}"),
            })?;

        Ok(Self {
            id,
            file_name,
            chunk_size: settings.chunk_size.max(1),
            reader: Some(reader),
            worker: Some(worker),
            failure: None,
            cleanup: None,
        })
    }

    pub fn id(&self) -> GenerationId {
        self.id
    }

    /// `<artifactId>.zip`.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Copy the whole archive into `out` in fixed-size chunks.
    ///
    /// Returns the number of bytes copied. Cleanup still runs if `out`
    /// fails, when the stream is finished or dropped.
    pub fn copy_to<W: Write + ?Sized>(&mut self, out: &mut W) -> StarterResult<u64> {
        let mut chunk = vec![0u8; self.chunk_size];
        let mut total = 0u64;
        loop {
            let n = match self.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(streaming_error(e)),
            };
            debug!(generation = %self.id, bytes = n, "Writing archive chunk");
            out.write_all(&chunk[..n]).map_err(streaming_error)?;
            out.flush().map_err(streaming_error)?;
            total += n as u64;
        }
        Ok(total)
    }

    /// Wait for the worker, release the workspace and report the cleanup
    /// outcome. Abandons any unread bytes.
    pub fn finish(mut self) -> StarterResult<()> {
        self.complete();
        self.cleanup.take().unwrap_or(Ok(()))
    }

    fn complete(&mut self) {
        if self.cleanup.is_some() {
            return;
        }
        // Dropping the reader unblocks a worker that is still writing.
        self.reader = None;
        let outcome = match self.worker.take() {
            Some(worker) => match worker.join() {
                Ok(generation) => generation.close(),
                Err(_) => Err(ApplicationError::StreamingFailed {
                    reason: "archive worker panicked".into(),
                }
                .into()),
            },
            None => Ok(()),
        };
        if let Err(e) = &outcome {
            warn!(generation = %self.id, error = %e, "Archive stream cleanup failed");
        }
        self.cleanup = Some(outcome);
    }
}

impl Read for ArchiveStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let Some(reader) = self.reader.as_mut() else {
            return match &self.failure {
                Some((kind, message)) => Err(io::Error::new(*kind, message.clone())),
                None => Ok(0),
            };
        };
        let result = reader.read(buf);
        match &result {
            Ok(0) if !buf.is_empty() => self.complete(),
            Err(e) if e.kind() != io::ErrorKind::Interrupted => {
                self.failure = Some((e.kind(), e.to_string()));
                self.complete();
            }
            _ => {}
        }
        result
    }
}

impl fmt::Debug for ArchiveStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveStream")
            .field("id", &self.id)
            .field("file_name", &self.file_name)
            .field("failed", &self.failure.is_some())
            .field("released", &self.cleanup.is_some())
            .finish()
    }
}

impl Drop for ArchiveStream {
    fn drop(&mut self) {
        self.complete();
    }
}

fn streaming_error(e: io::Error) -> crate::error::StarterError {
    ApplicationError::StreamingFailed {
        reason: e.to_string(),
    }
    .into()
}
