//! `starter params`: show the effective parameter set without generating.

use starter_core::domain::EffectiveParameters;

use crate::{
    cli::{ParamsArgs, ParamsFormat},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(args: ParamsArgs, config: &AppConfig, output: &OutputManager) -> CliResult<()> {
    let effective = EffectiveParameters::resolve(&args.params.to_parameters(), &config.defaults);
    output.data(&render(&effective, args.format)?)?;
    Ok(())
}

fn render(effective: &EffectiveParameters, format: ParamsFormat) -> CliResult<String> {
    match format {
        ParamsFormat::Table => {
            let width = effective.keys().map(str::len).max().unwrap_or(0);
            Ok(effective
                .iter()
                .map(|(key, value)| format!("{key:<width$}  {value}"))
                .collect::<Vec<_>>()
                .join("\n"))
        }
        ParamsFormat::List => Ok(effective.to_properties().join("\n")),
        ParamsFormat::Json => {
            serde_json::to_string_pretty(effective).map_err(|e| CliError::InvalidInput {
                message: format!("Failed to serialise parameters: {e}"),
                source: Some(Box::new(e)),
            })
        }
    }
}
