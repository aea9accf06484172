//! Flags accepted by every `starter` subcommand, before or after its name.

use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Log level for the pipeline. Generator output shows up at `-v`.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Log more of the pipeline (-v, -vv, -vvv)",
        long_help = "Log more of the generation pipeline:
    (none)  - Warnings and errors only
    -v      - Each step, plus the generator's captured output
    -vv     - Workspace paths and the archive summary
    -vvv    - One line per archive entry"
    )]
    pub verbose: u8,

    /// Drop status lines. Results, errors and the archive are unaffected.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Hide status lines"
    )]
    pub quiet: bool,

    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new(),
        help = "Plain status lines without ANSI colors"
    )]
    pub no_color: bool,

    /// TOML file layered between the built-in defaults and `STARTER_*`
    /// variables. Defaults to the user config directory.
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        value_name = "FILE",
        help = "Read settings from FILE"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "auto",
        help = "How status lines are printed"
    )]
    pub output_format: OutputFormat,
}

/// Rendering of status lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human when stdout is a terminal, plain otherwise.
    #[default]
    Auto,
    Human,
    Plain,
    /// Uncolored. `params --format json` covers machine-readable listings.
    Json,
}
