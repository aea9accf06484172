//! Application layer for starter.
//!
//! This layer contains:
//! - **Services**: the generation pipeline (`GenerationService`), the result
//!   handle that owns a workspace (`Generation`) and the streaming bridge
//!   (`ArchiveStream`)
//! - **Ports**: traits for the workspace manager, the generator tool and the
//!   archive format
//! - **Pipe**: the bounded in-memory byte channel behind the bridge

pub mod error;
pub mod pipe;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;

pub use services::{
    ArchiveStream, GENERATE_GOAL, Generation, GenerationService, IsolationPolicy, StreamSettings,
};

pub use ports::{ArchiveBuilder, ArchiveSummary, GeneratorRequest, ProjectGenerator, RootBinding, WorkspaceProvider};

pub use error::ApplicationError;
