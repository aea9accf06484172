//! CLI argument definitions using the clap derive API.
//!
//! Argument names, help text and value enums live here. Turning arguments
//! into generator parameters is the only logic.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use starter_core::domain::{Parameter, keys};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "starter",
    bin_name = "starter",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Generate archetype projects as zip archives",
    long_about = "Starter runs the archetype generator in a private temporary \
                  workspace, packages the result as a zip archive and removes \
                  the workspace afterwards.",
    after_help = "EXAMPLES:\n\
        \x20 starter generate --artifact demo\n\
        \x20 starter generate --group com.acme --artifact shop --base-type infra -o dist\n\
        \x20 starter params --artifact demo --format json\n\
        \x20 starter completions bash > /usr/share/bash-completion/completions/starter",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a project and write it as `<artifactId>.zip`.
    #[command(
        visible_alias = "g",
        about = "Generate a project archive",
        after_help = "EXAMPLES:\n\
            \x20 starter generate --artifact demo\n\
            \x20 starter generate --artifact demo -D useShiro=false -o out\n\
            \x20 starter generate --artifact demo --dry-run"
    )]
    Generate(GenerateArgs),

    /// Show the parameters a generation would receive.
    #[command(
        about = "Print the effective parameter set",
        after_help = "EXAMPLES:\n\
            \x20 starter params\n\
            \x20 starter params --artifact demo --format list"
    )]
    Params(ParamsArgs),

    /// Write a default configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 starter init           # user config location\n\
            \x20 starter init --local   # .starter.toml in CWD"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 starter completions bash > ~/.local/share/bash-completion/completions/starter\n\
            \x20 starter completions zsh  > ~/.zfunc/_starter\n\
            \x20 starter completions fish > ~/.config/fish/completions/starter.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the configuration file.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 starter config get defaults.group_id\n\
            \x20 starter config set archive.compression stored\n\
            \x20 starter config list"
    )]
    Config(ConfigCommands),
}

/// Parameters shared by `generate` and `params`.
#[derive(Debug, Args)]
pub struct ParameterArgs {
    /// Project group id.
    #[arg(short = 'g', long = "group", value_name = "GROUP_ID")]
    pub group: Option<String>,

    /// Project artifact id; also names the archive.
    #[arg(short = 'a', long = "artifact", value_name = "ARTIFACT_ID")]
    pub artifact: Option<String>,

    /// Human-readable project name.
    #[arg(short = 'n', long = "name", value_name = "NAME")]
    pub name: Option<String>,

    /// Java package (default: `<group>.<artifact>`).
    #[arg(short = 'p', long = "package", value_name = "PACKAGE")]
    pub package: Option<String>,

    /// Application server base.
    #[arg(long = "base-type", value_enum, value_name = "BASE")]
    pub base_type: Option<BaseType>,

    /// Packaging of the generated project.
    #[arg(long = "packaging", value_enum, value_name = "TYPE")]
    pub packaging: Option<Packaging>,

    /// Version of the generated project.
    #[arg(long = "project-version", value_name = "VERSION")]
    pub project_version: Option<String>,

    /// Archetype version (`LATEST` resolves to the newest).
    #[arg(long = "archetype-version", value_name = "VERSION")]
    pub archetype_version: Option<String>,

    /// Leave Apache Shiro out.
    #[arg(long = "no-shiro")]
    pub no_shiro: bool,

    /// Leave OmniFaces out.
    #[arg(long = "no-omnifaces")]
    pub no_omnifaces: bool,

    /// Leave PrimeFaces (and the lazy model) out.
    #[arg(long = "no-primefaces")]
    pub no_primefaces: bool,

    /// Leave the PrimeFaces lazy data model out.
    #[arg(long = "no-lazy-model")]
    pub no_lazy_model: bool,

    /// Extra generator property; later values win. Repeatable.
    #[arg(short = 'D', long = "define", value_name = "KEY=VALUE")]
    pub define: Vec<Parameter>,
}

impl ParameterArgs {
    /// Caller parameters in application order: flags first, then `-D`.
    pub fn to_parameters(&self) -> Vec<Parameter> {
        let mut params = Vec::new();
        let mut push = |key: &str, value: Option<String>| {
            if value.is_some() {
                params.push(Parameter::optional(key, value));
            }
        };

        push(keys::GROUP_ID, self.group.clone());
        push(keys::ARTIFACT_ID, self.artifact.clone());
        push(keys::PROJECT_NAME, self.name.clone());
        push(keys::PACKAGE, self.package.clone());
        push(keys::BASE_TYPE, self.base_type.map(|b| b.to_string()));
        push(keys::PACKAGING_TYPE, self.packaging.map(|p| p.to_string()));
        push(keys::VERSION, self.project_version.clone());
        push(keys::ARCHETYPE_VERSION, self.archetype_version.clone());
        push(keys::USE_SHIRO, self.no_shiro.then(|| "false".into()));
        push(keys::USE_OMNIFACES, self.no_omnifaces.then(|| "false".into()));
        push(keys::USE_PRIMEFACES, self.no_primefaces.then(|| "false".into()));
        push(keys::USE_LAZY_MODEL, self.no_lazy_model.then(|| "false".into()));

        params.extend(self.define.iter().cloned());
        params
    }
}

/// Arguments for `starter generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub params: ParameterArgs,

    /// Directory the archive is written to.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        default_value = ".",
        help = "Output directory"
    )]
    pub output: PathBuf,

    /// Overwrite an existing archive without asking.
    #[arg(long = "force", help = "Overwrite an existing archive")]
    pub force: bool,

    /// Skip the overwrite confirmation prompt (answers no).
    #[arg(short = 'y', long = "yes", help = "Never prompt")]
    pub yes: bool,

    /// Build the whole archive in memory before writing it.
    #[arg(long = "buffered", help = "Materialize the archive instead of streaming it")]
    pub buffered: bool,

    /// Print the parameters and target path without generating.
    #[arg(long = "dry-run", help = "Show what would be generated")]
    pub dry_run: bool,
}

/// Arguments for `starter params`.
#[derive(Debug, Args)]
pub struct ParamsArgs {
    #[command(flatten)]
    pub params: ParameterArgs,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ParamsFormat,
}

/// Output format for the `params` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ParamsFormat {
    /// Aligned key/value table.
    Table,
    /// One `-Dkey=value` per line.
    List,
    /// JSON object in parameter order.
    Json,
}

/// Arguments for `starter init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.starter.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

/// Arguments for `starter completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

/// Subcommands for `starter config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `archive.chunk_size`.
        key: String,
    },
    /// Set a configuration key in the config file.
    Set {
        /// Dotted key path.
        key: String,
        /// New value.
        value: String,
    },
    /// Print the effective configuration.
    List,
    /// Print the path to the active configuration file.
    Path,
}

/// Application server base of the generated project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum BaseType {
    Payara,
    Infra,
}

impl std::fmt::Display for BaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Payara => write!(f, "payara"),
            Self::Infra => write!(f, "infra"),
        }
    }
}

/// Packaging of the generated project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum Packaging {
    War,
    Jar,
}

impl std::fmt::Display for Packaging {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::War => write!(f, "war"),
            Self::Jar => write!(f, "jar"),
        }
    }
}
