//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by reference.
//! The CLI owns configuration; the core only receives the values it needs
//! (parameter defaults, isolation policy, stream settings).
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables `STARTER_<SECTION>__<KEY>`
//! 3. Config file (`--config FILE`, else `./.starter.toml`, else the user
//!    config path)
//! 4. Built-in defaults

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use starter_adapters::{
    Compression,
    workspace::{DEFAULT_MARKER, DEFAULT_PREFIX},
};
use starter_core::{
    application::{IsolationPolicy, StreamSettings},
    domain::ParameterDefaults,
};

/// File name of a per-directory configuration.
pub const LOCAL_CONFIG_FILE: &str = ".starter.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "STARTER";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Values for parameters the caller did not supply.
    pub defaults: ParameterDefaults,
    /// Temporary workspace settings.
    pub workspace: WorkspaceConfig,
    /// Archive and streaming settings.
    pub archive: ArchiveConfig,
    /// Generator invocation settings.
    pub generator: GeneratorConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Parent of workspaces; the system temp dir when unset.
    pub temp_dir: Option<PathBuf>,
    pub prefix: String,
    pub marker: String,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            temp_dir: None,
            prefix: DEFAULT_PREFIX.into(),
            marker: DEFAULT_MARKER.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    pub chunk_size: usize,
    pub pipe_capacity: usize,
    pub compression: Compression,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        let stream = StreamSettings::default();
        Self {
            chunk_size: stream.chunk_size,
            pipe_capacity: stream.pipe_capacity,
            compression: Compression::default(),
        }
    }
}

impl ArchiveConfig {
    pub fn stream_settings(&self) -> StreamSettings {
        StreamSettings {
            chunk_size: self.chunk_size,
            pipe_capacity: self.pipe_capacity,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub isolation: IsolationPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "human".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the config file and the environment.
    ///
    /// An explicit `config_file` must exist; the implicit locations are
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::active_path(), false),
        };
        Self::load_from(&path, required)
    }

    fn load_from(path: &Path, required: bool) -> anyhow::Result<Self> {
        let defaults = config::Config::try_from(&Self::default())
            .context("Failed to serialise built-in defaults")?;

        let loaded: Self = config::Config::builder()
            .add_source(defaults)
            .add_source(
                config::File::new(&path.to_string_lossy(), config::FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?
            .try_deserialize()
            .context("Invalid configuration")?;

        loaded.validate()?;
        tracing::debug!(path = %path.display(), "Configuration loaded");
        Ok(loaded)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.archive.chunk_size > 0, "archive.chunk_size must be positive");
        anyhow::ensure!(
            self.archive.pipe_capacity > 0,
            "archive.pipe_capacity must be positive"
        );
        anyhow::ensure!(!self.workspace.marker.is_empty(), "workspace.marker must not be empty");
        Ok(())
    }

    /// The local `.starter.toml` if present, else [`Self::config_path`].
    pub fn active_path() -> PathBuf {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            local
        } else {
            Self::config_path()
        }
    }

    /// Path to the user configuration file.
    ///
    /// Uses `directories::ProjectDirs`, falling back to `.starter.toml` in
    /// the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "flowlogix", "starter")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// The default configuration as TOML.
    pub fn default_toml() -> anyhow::Result<String> {
        toml::to_string_pretty(&Self::default()).context("Failed to serialise default configuration")
    }
}
