//! Generator adapters.

mod builtin;
pub mod catalog;

pub use builtin::{BASE_TYPES, BuiltinArchetypeGenerator, PACKAGING_TYPES};
