//! Starter Core - generation pipeline in hexagonal style
//!
//! This crate owns the part of `starter` with real invariants: turning a set
//! of caller parameters into a generated project, packaging that project as a
//! zip archive and reclaiming the temporary workspace exactly once.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           starter-cli (CLI)             │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (GenerationService, Generation,        │
//! │   ArchiveStream)                        │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (WorkspaceProvider, ProjectGenerator,   │
//! │  ArchiveBuilder)                        │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     starter-adapters (Infrastructure)   │
//! │ (TempWorkspaceProvider, ZipArchive-     │
//! │  Builder, BuiltinArchetypeGenerator)    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use starter_core::{application::GenerationService, domain::Parameter};
//!
//! // Adapters come from `starter-adapters`.
//! let service = GenerationService::new(workspaces, generator, archiver);
//! let generation = service.generate(&[Parameter::new("artifactId", "demo")])?;
//! generation.ensure_success()?;
//! let bytes = generation.into_archive_bytes()?;
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ArchiveStream, Generation, GenerationService, IsolationPolicy,
        ports::{ArchiveBuilder, GeneratorRequest, ProjectGenerator, RootBinding, WorkspaceProvider},
    };
    pub use crate::domain::{
        EffectiveParameters, GenerationId, Parameter, ParameterDefaults, archive_file_name,
    };
    pub use crate::error::{StarterError, StarterResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
