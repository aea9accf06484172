//! Workspace adapters.

mod temp;

pub use temp::{DEFAULT_MARKER, DEFAULT_PREFIX, TempWorkspaceProvider};
