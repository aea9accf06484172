//! Integration tests for the generation pipeline against real directories.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use starter_core::{
    application::{ApplicationError, ArchiveSummary, StreamSettings},
    prelude::*,
};
use tempfile::TempDir;

/// Creates workspaces below a scratch root and deletes them with `remove_dir_all`.
struct ScratchWorkspaces {
    root: TempDir,
}

impl ScratchWorkspaces {
    fn new() -> Self {
        Self {
            root: TempDir::new().unwrap(),
        }
    }

    fn remaining(&self) -> usize {
        fs::read_dir(self.root.path()).unwrap().count()
    }
}

impl WorkspaceProvider for ScratchWorkspaces {
    fn allocate(&self) -> StarterResult<PathBuf> {
        let dir = tempfile::Builder::new()
            .prefix("starter-generator-project-")
            .tempdir_in(self.root.path())
            .map_err(|e| ApplicationError::WorkspaceAllocation {
                reason: e.to_string(),
            })?
            .keep();
        fs::create_dir(dir.join(".mvn")).map_err(|e| ApplicationError::WorkspaceAllocation {
            reason: e.to_string(),
        })?;
        Ok(dir)
    }

    fn destroy(&self, workspace: &Path) -> StarterResult<()> {
        fs::remove_dir_all(workspace).map_err(|e| {
            ApplicationError::WorkspaceCleanup {
                path: workspace.to_path_buf(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

/// Writes `<artifactId>/pom.xml` into the project root, or fails when the
/// archetype artifact is `missing`.
struct PomGenerator;

impl ProjectGenerator for PomGenerator {
    fn run(&self, request: &GeneratorRequest, output: &mut dyn Write) -> i32 {
        if request.property("archetypeArtifactId") == Some("missing") {
            let _ = write!(output, "template not found");
            return 1;
        }
        let (Some(root), Some(artifact)) = (request.project_root(), request.property("artifactId"))
        else {
            return 2;
        };
        let dir = root.join(artifact);
        if fs::create_dir_all(&dir).is_err()
            || fs::write(dir.join("pom.xml"), format!("<artifactId>{artifact}</artifactId>")).is_err()
        {
            return 3;
        }
        let _ = write!(output, "[INFO] BUILD SUCCESS");
        0
    }
}

/// Concatenates `name\ncontent\n` for each regular file, in sorted order.
struct ConcatArchiver;

impl ArchiveBuilder for ConcatArchiver {
    fn build(&self, root: &Path, sink: &mut dyn Write) -> StarterResult<ArchiveSummary> {
        let mut files = Vec::new();
        collect(root, root, &mut files);
        files.sort();
        let mut summary = ArchiveSummary::default();
        for (name, content) in files {
            sink.write_all(format!("{name}\n").as_bytes())
                .and_then(|()| sink.write_all(&content))
                .map_err(|e| ApplicationError::ArchiveFailed {
                    path: root.join(&name),
                    reason: e.to_string(),
                })?;
            summary.entries += 1;
            summary.content_bytes += content.len() as u64;
        }
        Ok(summary)
    }
}

fn collect(root: &Path, dir: &Path, files: &mut Vec<(String, Vec<u8>)>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect(root, &path, files);
        } else {
            let name = path.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/");
            files.push((name, fs::read(&path).unwrap()));
        }
    }
}

fn service(workspaces: Arc<ScratchWorkspaces>) -> GenerationService {
    GenerationService::new(workspaces, Arc::new(PomGenerator), Arc::new(ConcatArchiver))
        .with_stream_settings(StreamSettings {
            chunk_size: 5,
            pipe_capacity: 2,
        })
}

#[test]
fn demo_project_is_archived_and_cleaned_up() {
    let workspaces = Arc::new(ScratchWorkspaces::new());
    let generation = service(workspaces.clone())
        .generate(&[Parameter::new("artifactId", "demo")])
        .unwrap();

    assert_eq!(generation.status(), 0);
    assert_eq!(generation.parameters().get("groupId"), Some("com.example"));
    assert!(generation.workspace().join(".mvn").is_dir());
    assert_eq!(generation.archive_file_name(), "demo.zip");

    let workspace = generation.workspace().to_path_buf();
    let bytes = generation.into_archive_bytes().unwrap();
    let listing = String::from_utf8(bytes).unwrap();
    assert!(listing.starts_with("demo/pom.xml\n"), "{listing}");
    assert!(!workspace.exists());
    assert_eq!(workspaces.remaining(), 0);
}

#[test]
fn streamed_archive_matches_materialized_archive() {
    let workspaces = Arc::new(ScratchWorkspaces::new());
    let service = service(workspaces.clone());
    let params = [Parameter::new("artifactId", "demo")];

    let materialized = service.generate(&params).unwrap().into_archive_bytes().unwrap();

    let mut stream = service.generate(&params).unwrap().into_stream().unwrap();
    let mut streamed = Vec::new();
    stream.read_to_end(&mut streamed).unwrap();
    stream.finish().unwrap();

    assert_eq!(streamed, materialized);
    assert_eq!(workspaces.remaining(), 0);
}

#[test]
fn template_not_found_leaves_nothing_behind() {
    let workspaces = Arc::new(ScratchWorkspaces::new());
    let generation = service(workspaces.clone())
        .generate(&[Parameter::new("archetypeArtifactId", "missing")])
        .unwrap();

    assert_eq!(generation.status(), 1);
    assert_eq!(generation.output(), "template not found");
    let err = generation.into_archive_bytes().unwrap_err();
    assert_eq!(err.generator_output(), Some("template not found"));
    assert_eq!(workspaces.remaining(), 0);
}

#[test]
fn dropping_a_stream_unread_cleans_up() {
    let workspaces = Arc::new(ScratchWorkspaces::new());
    let stream = service(workspaces.clone())
        .generate(&[])
        .unwrap()
        .into_stream()
        .unwrap();
    drop(stream);
    assert_eq!(workspaces.remaining(), 0);
}
