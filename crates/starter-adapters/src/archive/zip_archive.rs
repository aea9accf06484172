//! Zip archive builder streaming into a non-seekable sink.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Component, Path};

use serde::{Deserialize, Serialize};
use starter_core::{
    application::{ApplicationError, ArchiveSummary, ports::ArchiveBuilder},
    error::{StarterError, StarterResult},
};
use tracing::{debug, instrument, trace};
use walkdir::WalkDir;
use zip::{CompressionMethod, DateTime, ZipWriter, write::SimpleFileOptions};

/// Entry compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    #[default]
    Deflated,
    Stored,
}

impl Compression {
    fn method(self) -> CompressionMethod {
        match self {
            Self::Deflated => CompressionMethod::Deflated,
            Self::Stored => CompressionMethod::Stored,
        }
    }
}

/// Writes every regular file below a workspace as one zip entry.
///
/// Entry names are workspace-relative with `/` separators. Symlinks are
/// followed. Executable files are stored with mode `0o755`, everything else
/// with `0o644`. Timestamps are fixed, so the same tree always yields the
/// same bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipArchiveBuilder {
    compression: Compression,
}

impl ZipArchiveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    fn options(&self, executable: bool) -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(self.compression.method())
            .unix_permissions(if executable { 0o755 } else { 0o644 })
            .last_modified_time(DateTime::default())
    }
}

impl ArchiveBuilder for ZipArchiveBuilder {
    #[instrument(skip_all, fields(root = %root.display()))]
    fn build(&self, root: &Path, sink: &mut dyn Write) -> StarterResult<ArchiveSummary> {
        let mut zip = ZipWriter::new_stream(sink);
        let mut summary = ArchiveSummary::default();

        for entry in WalkDir::new(root).follow_links(true) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                archive_error(&path, e.to_string())
            })?;
            if entry.file_type().is_dir() {
                continue;
            }

            let path = entry.path();
            let name = entry_name(root, path)?;
            let executable = is_executable(path)?;

            let mut file =
                File::open(path).map_err(|e| archive_error(path, format!("Failed to open: {e}")))?;
            zip.start_file(name.as_str(), self.options(executable))
                .map_err(|e| archive_error(path, e.to_string()))?;
            let copied = io::copy(&mut file, &mut zip)
                .map_err(|e| archive_error(path, format!("Failed to copy: {e}")))?;

            trace!(entry = %name, bytes = copied, executable, "Added entry");
            summary.entries += 1;
            summary.content_bytes += copied;
        }

        zip.finish().map_err(|e| archive_error(root, e.to_string()))?;
        debug!(
            entries = summary.entries,
            bytes = summary.content_bytes,
            "Archive written"
        );
        Ok(summary)
    }
}

/// Workspace-relative entry name with `/` separators.
fn entry_name(root: &Path, path: &Path) -> StarterResult<String> {
    let relative = path
        .strip_prefix(root)
        .map_err(|_| archive_error(path, "outside of the workspace".into()))?;
    let parts: Vec<_> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect();
    Ok(parts.join("/"))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> StarterResult<bool> {
    use std::os::unix::fs::PermissionsExt;
    let metadata =
        fs::metadata(path).map_err(|e| archive_error(path, format!("Failed to get metadata: {e}")))?;
    Ok(metadata.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> StarterResult<bool> {
    fs::metadata(path).map_err(|e| archive_error(path, format!("Failed to get metadata: {e}")))?;
    Ok(false)
}

fn archive_error(path: &Path, reason: String) -> StarterError {
    ApplicationError::ArchiveFailed {
        path: path.to_path_buf(),
        reason,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::io::{Cursor, Read};
    use starter_core::error::ErrorCategory;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn tree() -> TempDir {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join(".mvn")).unwrap();
        fs::create_dir_all(root.path().join("demo/src/main/java")).unwrap();
        fs::write(root.path().join("demo/pom.xml"), "<project/>").unwrap();
        fs::write(root.path().join("demo/src/main/java/App.java"), "class App {}").unwrap();
        root
    }

    fn entries(bytes: &[u8]) -> BTreeMap<String, (Option<u32>, String)> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut out = BTreeMap::new();
        for i in 0..archive.len() {
            let mut file = archive.by_index(i).unwrap();
            let mut content = String::new();
            file.read_to_string(&mut content).unwrap();
            out.insert(file.name().to_string(), (file.unix_mode(), content));
        }
        out
    }

    fn build(root: &Path, builder: ZipArchiveBuilder) -> (ArchiveSummary, Vec<u8>) {
        let mut bytes = Vec::new();
        let summary = builder.build(root, &mut bytes).unwrap();
        (summary, bytes)
    }

    #[test]
    fn every_regular_file_appears_once_and_directories_never() {
        let root = tree();
        let (summary, bytes) = build(root.path(), ZipArchiveBuilder::new());

        let entries = entries(&bytes);
        let names: Vec<_> = entries.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["demo/pom.xml", "demo/src/main/java/App.java"]);
        assert_eq!(entries["demo/pom.xml"].1, "<project/>");
        assert_eq!(summary.entries, 2);
        assert_eq!(summary.content_bytes, 22);
    }

    #[test]
    fn same_tree_same_bytes() {
        let root = tree();
        let (_, first) = build(root.path(), ZipArchiveBuilder::new());
        let (_, second) = build(root.path(), ZipArchiveBuilder::new());
        assert_eq!(first, second);
    }

    #[test]
    fn stored_compression_round_trips() {
        let root = tree();
        let builder = ZipArchiveBuilder::new().with_compression(Compression::Stored);
        let (_, bytes) = build(root.path(), builder);
        assert_eq!(entries(&bytes)["demo/src/main/java/App.java"].1, "class App {}");
    }

    #[test]
    fn empty_tree_is_a_valid_empty_archive() {
        let root = TempDir::new().unwrap();
        let (summary, bytes) = build(root.path(), ZipArchiveBuilder::new());
        assert_eq!(summary.entries, 0);
        assert!(entries(&bytes).is_empty());
    }

    #[test]
    fn missing_root_is_an_archive_error() {
        let root = TempDir::new().unwrap();
        let missing = root.path().join("gone");
        let err = ZipArchiveBuilder::new()
            .build(&missing, &mut Vec::new())
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Archive);
    }

    #[cfg(unix)]
    #[test]
    fn executable_bit_round_trips() {
        use std::os::unix::fs::PermissionsExt;

        let root = tree();
        let mvnw = root.path().join("demo/mvnw");
        fs::write(&mvnw, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&mvnw, fs::Permissions::from_mode(0o755)).unwrap();

        let (_, bytes) = build(root.path(), ZipArchiveBuilder::new());
        let entries = entries(&bytes);
        assert_eq!(entries["demo/mvnw"].0.map(|m| m & 0o777), Some(0o755));
        assert_eq!(entries["demo/pom.xml"].0.map(|m| m & 0o777), Some(0o644));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_files_are_archived_as_their_target() {
        let root = tree();
        std::os::unix::fs::symlink(
            root.path().join("demo/pom.xml"),
            root.path().join("demo/pom-link.xml"),
        )
        .unwrap();

        let (_, bytes) = build(root.path(), ZipArchiveBuilder::new());
        assert_eq!(entries(&bytes)["demo/pom-link.xml"].1, "<project/>");
    }

    #[test]
    fn broken_sink_is_an_archive_error() {
        struct Closed;
        impl Write for Closed {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let root = tree();
        let err = ZipArchiveBuilder::new()
            .build(root.path(), &mut Closed)
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Archive);
    }
}
