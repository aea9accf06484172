//! Application services - orchestrate the pipeline.
//!
//! `GenerationService` runs the generator against a fresh workspace and
//! hands back a `Generation`, the result handle that owns the workspace
//! until it is released. `ArchiveStream` is the streaming bridge.

pub mod archive_stream;
pub mod generation;
pub mod generation_service;

pub use archive_stream::{ArchiveStream, StreamSettings};
pub use generation::Generation;
pub use generation_service::{GENERATE_GOAL, GenerationService, IsolationPolicy};
