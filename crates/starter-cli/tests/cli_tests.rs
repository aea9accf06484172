//! Binary-level tests for `starter`.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use zip::ZipArchive;

/// A `starter` command isolated from the user's config and temp dir.
fn starter(home: &TempDir) -> Command {
    let scratch = home.path().join("scratch");
    fs::create_dir_all(&scratch).unwrap();
    let config = home.path().join("config.toml");
    if !config.exists() {
        fs::write(&config, "").unwrap();
    }

    let mut cmd = Command::cargo_bin("starter").unwrap();
    cmd.current_dir(home.path())
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .env("STARTER_WORKSPACE__TEMP_DIR", &scratch)
        .arg("--config")
        .arg(&config);
    cmd
}

fn scratch_is_empty(home: &TempDir) -> bool {
    fs::read_dir(home.path().join("scratch")).unwrap().next().is_none()
}

fn entry_names(path: &Path) -> Vec<String> {
    let bytes = fs::read(path).unwrap();
    let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    archive.file_names().map(str::to_string).collect()
}

#[test]
fn generate_writes_the_archive_and_cleans_up() {
    let home = TempDir::new().unwrap();
    starter(&home)
        .args(["generate", "--artifact", "demo", "-o", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("demo.zip"));

    let names = entry_names(&home.path().join("out/demo.zip"));
    assert!(names.contains(&"demo/pom.xml".to_string()), "{names:?}");
    assert!(names.iter().all(|n| n.starts_with("demo/")));
    assert!(scratch_is_empty(&home));
}

#[test]
fn buffered_generate_matches_streamed() {
    let home = TempDir::new().unwrap();
    starter(&home)
        .args(["generate", "-a", "demo", "-o", "streamed"])
        .assert()
        .success();
    starter(&home)
        .args(["generate", "-a", "demo", "-o", "buffered", "--buffered"])
        .assert()
        .success();

    assert_eq!(
        fs::read(home.path().join("streamed/demo.zip")).unwrap(),
        fs::read(home.path().join("buffered/demo.zip")).unwrap()
    );
}

#[test]
fn unknown_template_exits_with_generator_failure() {
    let home = TempDir::new().unwrap();
    starter(&home)
        .args(["generate", "-D", "archetypeArtifactId=nope", "-o", "out"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Generator output"))
        .stderr(predicate::str::contains("template not found"));

    assert!(!home.path().join("out/starter.zip").exists());
    assert!(scratch_is_empty(&home));
}

#[test]
fn existing_archive_is_not_overwritten_without_force() {
    let home = TempDir::new().unwrap();
    fs::create_dir_all(home.path().join("out")).unwrap();
    fs::write(home.path().join("out/demo.zip"), "old").unwrap();

    starter(&home)
        .args(["generate", "-a", "demo", "-o", "out"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--force"));
    assert_eq!(fs::read_to_string(home.path().join("out/demo.zip")).unwrap(), "old");

    starter(&home)
        .args(["generate", "-a", "demo", "-o", "out", "--force"])
        .assert()
        .success();
}

#[test]
fn malformed_define_is_a_usage_error() {
    let home = TempDir::new().unwrap();
    starter(&home)
        .args(["generate", "-D", "novalue"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("KEY=VALUE"));
}

#[test]
fn params_prints_the_effective_set_even_when_quiet() {
    let home = TempDir::new().unwrap();
    starter(&home)
        .args(["-q", "params", "--artifact", "demo", "--format", "list"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("-DartifactId=demo\n"))
        .stdout(predicate::str::contains("-Dpackage=com.example.demo"))
        .stdout(predicate::str::contains("-DinteractiveMode=false"));
}

#[test]
fn config_file_defaults_flow_into_params() {
    let home = TempDir::new().unwrap();
    fs::write(
        home.path().join("config.toml"),
        "[defaults]\ngroup_id = \"com.acme\"\n",
    )
    .unwrap();

    starter(&home)
        .args(["params", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"groupId\": \"com.acme\""))
        .stdout(predicate::str::contains("\"package\": \"com.acme.starter\""));
}

#[test]
fn config_set_then_get() {
    let home = TempDir::new().unwrap();
    starter(&home)
        .args(["config", "set", "archive.compression", "stored"])
        .assert()
        .success();
    starter(&home)
        .args(["config", "get", "archive.compression"])
        .assert()
        .success()
        .stdout(predicate::str::diff("stored\n"));
}

#[test]
fn broken_config_file_exits_with_configuration_error() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join("config.toml"), "[archive\nchunk_size = ").unwrap();

    starter(&home)
        .args(["params"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("configuration"));
}

#[test]
fn completions_mention_the_binary() {
    let home = TempDir::new().unwrap();
    starter(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("starter"));
}

#[test]
fn help_is_not_an_error() {
    let home = TempDir::new().unwrap();
    starter(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"));
}
