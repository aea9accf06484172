//! Application ports (traits) for external dependencies.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: called by the pipeline, implemented in
//!   `starter-adapters`
//!   - `WorkspaceProvider`: temporary workspace allocation and removal
//!   - `ProjectGenerator`: the in-process generator tool
//!   - `ArchiveBuilder`: serializes a workspace into an archive

pub mod output;

pub use output::{
    ArchiveBuilder, ArchiveSummary, GeneratorRequest, ProjectGenerator, RootBinding,
    WorkspaceProvider,
};

#[cfg(test)]
pub use output::MockWorkspaceProvider;
