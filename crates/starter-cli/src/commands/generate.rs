//! `starter generate`: run the generator and write `<artifactId>.zip`.
//!
//! The archive lands in a temporary file next to the target and is renamed
//! into place only after the last byte, so a failed run never leaves a
//! truncated archive behind.

use std::fs;
use std::io::Write;
use std::path::Path;

use starter_core::{application::GenerationService, domain::Parameter};
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};

use crate::{
    cli::{GenerateArgs, GlobalArgs},
    commands::generation_service,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Generate one project archive.
#[instrument(skip_all)]
pub fn execute(
    args: GenerateArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let inputs = args.params.to_parameters();
    let service = generation_service(config);
    let effective = service.effective_parameters(&inputs);
    let target = args.output.join(effective.archive_file_name());
    debug!(target = %target.display(), parameters = ?effective.to_properties(), "Resolved request");

    if args.dry_run {
        output.header("Dry run: nothing will be generated")?;
        for property in effective.to_properties() {
            output.print(&format!("  {property}"))?;
        }
        output.info(&format!("Archive would be written to {}", target.display()))?;
        return Ok(());
    }

    ensure_writable(&target, &args, output)?;

    let spinner = output.spinner(&format!("Generating {}", effective.archive_file_name()));
    let written = write_archive(&service, &inputs, &args, global, &target);
    spinner.finish_and_clear();
    let written = written?;

    output.success(&format!(
        "Wrote {} ({written} bytes)",
        target.display()
    ))?;
    Ok(())
}

fn write_archive(
    service: &GenerationService,
    inputs: &[Parameter],
    args: &GenerateArgs,
    global: &GlobalArgs,
    target: &Path,
) -> CliResult<u64> {
    let generation = service.generate(inputs)?;
    if global.verbose > 0 {
        info!(status = generation.status(), "Generator output:\n{}", generation.output());
    }
    // A failed run carries the diagnostic and releases its workspace on drop.
    generation.ensure_success()?;

    fs::create_dir_all(&args.output).with_cli_context(|| {
        format!("Failed to create output directory '{}'", args.output.display())
    })?;
    let mut file = NamedTempFile::new_in(&args.output).with_cli_context(|| {
        format!("Failed to create a temporary file in '{}'", args.output.display())
    })?;

    let written = if args.buffered {
        let bytes = generation.into_archive_bytes()?;
        file.write_all(&bytes)
            .with_cli_context(|| format!("Failed to write '{}'", target.display()))?;
        bytes.len() as u64
    } else {
        let mut stream = generation.into_stream()?;
        let copied = stream.copy_to(&mut file)?;
        stream.finish()?;
        copied
    };

    file.persist(target).map_err(|e| CliError::IoError {
        message: format!("Failed to move the archive to '{}'", target.display()),
        source: e.error,
    })?;
    debug!(bytes = written, buffered = args.buffered, "Archive written");
    Ok(written)
}

/// Refuse to replace an existing archive unless allowed.
fn ensure_writable(target: &Path, args: &GenerateArgs, output: &OutputManager) -> CliResult<()> {
    if !target.exists() || args.force {
        return Ok(());
    }
    if args.yes || !output.is_interactive() {
        return Err(CliError::OutputExists {
            path: target.to_path_buf(),
        });
    }
    if confirm_overwrite(target)? {
        Ok(())
    } else {
        Err(CliError::Cancelled)
    }
}

#[cfg(feature = "interactive")]
fn confirm_overwrite(target: &Path) -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt(format!("{} already exists. Overwrite?", target.display()))
        .default(false)
        .interact()
        .map_err(|e| CliError::InvalidInput {
            message: format!("Confirmation prompt failed: {e}"),
            source: Some(Box::new(e)),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm_overwrite(_target: &Path) -> CliResult<bool> {
    Err(CliError::FeatureNotAvailable {
        feature: "interactive",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands, OutputFormat};
    use clap::Parser;
    use std::io::Cursor;
    use tempfile::TempDir;
    use zip::ZipArchive;

    struct Fixture {
        scratch: TempDir,
        out: TempDir,
        config: AppConfig,
        global: GlobalArgs,
        output: OutputManager,
    }

    fn fixture() -> Fixture {
        let scratch = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.workspace.temp_dir = Some(scratch.path().to_path_buf());
        let global = GlobalArgs {
            verbose: 0,
            quiet: true,
            no_color: true,
            config: None,
            output_format: OutputFormat::Plain,
        };
        let output = OutputManager::new(&global, &config);
        Fixture {
            scratch,
            out,
            config,
            global,
            output,
        }
    }

    fn args(fixture: &Fixture, extra: &[&str]) -> GenerateArgs {
        let out = fixture.out.path().to_str().unwrap().to_string();
        let mut argv = vec!["starter", "generate", "-o", out.as_str()];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Generate(args) => args,
            other => panic!("expected generate, got {other:?}"),
        }
    }

    fn run(fixture: &Fixture, extra: &[&str]) -> CliResult<()> {
        execute(
            args(fixture, extra),
            &fixture.global,
            &fixture.config,
            &fixture.output,
        )
    }

    fn leftovers(dir: &TempDir) -> usize {
        fs::read_dir(dir.path()).unwrap().count()
    }

    #[test]
    fn writes_a_readable_archive_named_after_the_artifact() {
        let fixture = fixture();
        run(&fixture, &["--artifact", "demo"]).unwrap();

        let bytes = fs::read(fixture.out.path().join("demo.zip")).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert!(archive.by_name("demo/pom.xml").is_ok());
        assert_eq!(leftovers(&fixture.scratch), 0);
        assert_eq!(leftovers(&fixture.out), 1);
    }

    #[test]
    fn buffered_and_streamed_output_are_identical() {
        let fixture = fixture();
        run(&fixture, &["--artifact", "demo"]).unwrap();
        let streamed = fs::read(fixture.out.path().join("demo.zip")).unwrap();

        run(&fixture, &["--artifact", "demo", "--buffered", "--force"]).unwrap();
        let buffered = fs::read(fixture.out.path().join("demo.zip")).unwrap();

        assert_eq!(streamed, buffered);
    }

    #[test]
    fn existing_archive_needs_force() {
        let fixture = fixture();
        fs::write(fixture.out.path().join("demo.zip"), "old").unwrap();

        let err = run(&fixture, &["--artifact", "demo"]).unwrap_err();
        assert!(matches!(err, CliError::OutputExists { .. }));
        assert_eq!(
            fs::read_to_string(fixture.out.path().join("demo.zip")).unwrap(),
            "old"
        );

        run(&fixture, &["--artifact", "demo", "--force"]).unwrap();
        assert_ne!(
            fs::read(fixture.out.path().join("demo.zip")).unwrap(),
            b"old"
        );
    }

    #[test]
    fn generator_failure_writes_nothing_and_cleans_up() {
        let fixture = fixture();
        let err = run(&fixture, &["-D", "archetypeArtifactId=nope"]).unwrap_err();

        assert_eq!(err.exit_code(), 5);
        assert!(err.generator_output().unwrap().contains("template not found"));
        assert_eq!(leftovers(&fixture.out), 0);
        assert_eq!(leftovers(&fixture.scratch), 0);
    }

    #[test]
    fn dry_run_touches_nothing() {
        let fixture = fixture();
        run(&fixture, &["--artifact", "demo", "--dry-run"]).unwrap();
        assert_eq!(leftovers(&fixture.out), 0);
        assert_eq!(leftovers(&fixture.scratch), 0);
    }
}
