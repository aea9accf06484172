//! Infrastructure adapters for starter.
//!
//! This crate implements the ports defined in `starter_core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod archive;
pub mod generator;
pub mod workspace;

// Re-export commonly used adapters
pub use archive::{Compression, ZipArchiveBuilder};
pub use generator::BuiltinArchetypeGenerator;
pub use workspace::TempWorkspaceProvider;
