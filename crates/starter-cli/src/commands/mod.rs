//! Command handlers, one module per subcommand.

use std::sync::Arc;

use starter_adapters::{BuiltinArchetypeGenerator, TempWorkspaceProvider, ZipArchiveBuilder};
use starter_core::application::GenerationService;

use crate::config::AppConfig;

pub mod completions;
pub mod config;
pub mod generate;
pub mod init;
pub mod params;

/// Wire the production adapters according to `config`.
pub(crate) fn generation_service(config: &AppConfig) -> GenerationService {
    let mut workspaces = TempWorkspaceProvider::new()
        .with_prefix(config.workspace.prefix.as_str())
        .with_marker(config.workspace.marker.as_str());
    if let Some(dir) = &config.workspace.temp_dir {
        workspaces = workspaces.with_base_dir(dir);
    }
    let generator = BuiltinArchetypeGenerator::new().with_marker(config.workspace.marker.as_str());
    let archiver = ZipArchiveBuilder::new().with_compression(config.archive.compression);

    GenerationService::new(Arc::new(workspaces), Arc::new(generator), Arc::new(archiver))
        .with_defaults(config.defaults.clone())
        .with_isolation(config.generator.isolation)
        .with_stream_settings(config.archive.stream_settings())
}
