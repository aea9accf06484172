//! Archive adapters.

mod zip_archive;

pub use zip_archive::{Compression, ZipArchiveBuilder};
