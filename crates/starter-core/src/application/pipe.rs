//! Bounded in-memory byte pipe.
//!
//! Connects a push-style producer (anything that wants an [`io::Write`]) on
//! one thread to a pull-style consumer (an [`io::Read`]) on another. Bytes
//! travel in chunks over a bounded channel, so a producer that runs ahead
//! blocks once `capacity` chunks are in flight.
//!
//! End of data is an explicit frame. A reader can therefore tell three
//! endings apart: the producer finished ([`PipeWriter::finish`]), the
//! producer reported a failure ([`PipeWriter::fail`]), or the producer went
//! away without saying either.

use std::io::{self, Read, Write};
use std::mem;
use std::sync::mpsc::{Receiver, SyncSender, sync_channel};

/// Default chunk size for pipe frames and consumer reads.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Default number of chunks buffered between producer and consumer.
pub const DEFAULT_PIPE_CAPACITY: usize = 16;

enum Frame {
    Data(Vec<u8>),
    End,
    Failed(String),
}

/// Create a connected writer/reader pair.
///
/// `chunk_size` and `capacity` are clamped to at least 1.
pub fn pipe(chunk_size: usize, capacity: usize) -> (PipeWriter, PipeReader) {
    let chunk_size = chunk_size.max(1);
    let (sender, receiver) = sync_channel(capacity.max(1));
    (
        PipeWriter {
            sender,
            buffer: Vec::with_capacity(chunk_size),
            chunk_size,
            closed: false,
        },
        PipeReader {
            receiver,
            current: Vec::new(),
            position: 0,
            state: ReadState::Open,
        },
    )
}

/// Producer half of a [`pipe`].
pub struct PipeWriter {
    sender: SyncSender<Frame>,
    buffer: Vec<u8>,
    chunk_size: usize,
    closed: bool,
}

impl PipeWriter {
    /// Flush buffered bytes and signal a clean end of data.
    pub fn finish(mut self) -> io::Result<()> {
        self.flush_buffer()?;
        self.closed = true;
        self.send(Frame::End)
    }

    /// Signal a producer failure. Buffered bytes are dropped.
    pub fn fail(mut self, reason: impl Into<String>) -> io::Result<()> {
        self.buffer.clear();
        self.closed = true;
        self.send(Frame::Failed(reason.into()))
    }

    fn flush_buffer(&mut self) -> io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let chunk = mem::replace(&mut self.buffer, Vec::with_capacity(self.chunk_size));
        self.send(Frame::Data(chunk))
    }

    fn send(&self, frame: Frame) -> io::Result<()> {
        self.sender.send(frame).map_err(|_| {
            io::Error::new(io::ErrorKind::BrokenPipe, "archive consumer disconnected")
        })
    }
}

impl Write for PipeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.closed {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe already closed"));
        }
        if buf.is_empty() {
            return Ok(0);
        }
        let room = self.chunk_size - self.buffer.len();
        let take = room.min(buf.len());
        self.buffer.extend_from_slice(&buf[..take]);
        if self.buffer.len() == self.chunk_size {
            self.flush_buffer()?;
        }
        Ok(take)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_buffer()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ReadState {
    Open,
    Finished,
    Failed(io::ErrorKind, String),
}

/// Consumer half of a [`pipe`].
///
/// Returns `Ok(0)` only after the producer called [`PipeWriter::finish`].
/// A reported failure or a vanished producer is a terminal error that every
/// later read repeats.
pub struct PipeReader {
    receiver: Receiver<Frame>,
    current: Vec<u8>,
    position: usize,
    state: ReadState,
}

impl PipeReader {
    /// `true` once the end-of-data frame was received.
    pub fn is_finished(&self) -> bool {
        self.state == ReadState::Finished
    }

    /// `true` once the stream ended in an error.
    pub fn is_failed(&self) -> bool {
        matches!(self.state, ReadState::Failed(..))
    }
}

impl Read for PipeReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            if self.position < self.current.len() {
                let available = &self.current[self.position..];
                let n = available.len().min(buf.len());
                buf[..n].copy_from_slice(&available[..n]);
                self.position += n;
                return Ok(n);
            }

            match &self.state {
                ReadState::Finished => return Ok(0),
                ReadState::Failed(kind, reason) => return Err(io::Error::new(*kind, reason.clone())),
                ReadState::Open => {}
            }

            match self.receiver.recv() {
                Ok(Frame::Data(bytes)) => {
                    self.current = bytes;
                    self.position = 0;
                }
                Ok(Frame::End) => self.state = ReadState::Finished,
                Ok(Frame::Failed(reason)) => {
                    self.state = ReadState::Failed(io::ErrorKind::Other, reason);
                }
                Err(_) => {
                    self.state = ReadState::Failed(
                        io::ErrorKind::UnexpectedEof,
                        "archive producer stopped before end of data".into(),
                    );
                }
            }
        }
    }
}
