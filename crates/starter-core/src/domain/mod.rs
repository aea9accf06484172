//! Core domain layer for starter.
//!
//! Pure data and rules: parameters, the ordered effective parameter set and
//! its defaults. No I/O lives here; the workspace, the generator and the
//! archive format are reached through ports in [`crate::application`].

pub mod defaults;
pub mod error;
pub mod parameter;
pub mod value_objects;

pub use defaults::{ParameterDefaults, keys};
pub use error::DomainError;
pub use parameter::{EffectiveParameters, Parameter, archive_file_name};
pub use value_objects::GenerationId;
