//! In-memory fakes for the ports, shared by the unit tests.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use crate::application::{
    ApplicationError,
    ports::{ArchiveBuilder, ArchiveSummary, GeneratorRequest, ProjectGenerator, RootBinding, WorkspaceProvider},
};
use crate::error::StarterResult;

/// Hands out unique paths without touching the filesystem and records
/// every destroy. A second destroy of the same path fails.
#[derive(Default)]
pub(crate) struct RecordingWorkspaces {
    next: AtomicUsize,
    fail_allocation: bool,
    destroyed: Mutex<Vec<PathBuf>>,
}

impl RecordingWorkspaces {
    pub(crate) fn failing() -> Self {
        Self {
            fail_allocation: true,
            ..Self::default()
        }
    }

    pub(crate) fn allocated(&self) -> usize {
        self.next.load(Ordering::SeqCst)
    }

    pub(crate) fn destroyed(&self) -> usize {
        self.destroyed.lock().unwrap().len()
    }
}

impl WorkspaceProvider for RecordingWorkspaces {
    fn allocate(&self) -> StarterResult<PathBuf> {
        if self.fail_allocation {
            return Err(ApplicationError::WorkspaceAllocation {
                reason: "no space left".into(),
            }
            .into());
        }
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        Ok(PathBuf::from(format!("/tmp/starter-generator-project-test{n}")))
    }

    fn destroy(&self, workspace: &Path) -> StarterResult<()> {
        let mut destroyed = self.destroyed.lock().unwrap();
        if destroyed.iter().any(|p| p == workspace) {
            return Err(ApplicationError::WorkspaceCleanup {
                path: workspace.to_path_buf(),
                reason: "already destroyed".into(),
            }
            .into());
        }
        destroyed.push(workspace.to_path_buf());
        Ok(())
    }
}

/// Writes the same fixed bytes for every root.
pub(crate) struct ListingArchiver;

impl ArchiveBuilder for ListingArchiver {
    fn build(&self, root: &Path, sink: &mut dyn Write) -> StarterResult<ArchiveSummary> {
        let listing = b"PK listing\nREADME.md\npom.xml\n";
        sink.write_all(listing)
            .map_err(|e| ApplicationError::ArchiveFailed {
                path: root.to_path_buf(),
                reason: e.to_string(),
            })?;
        Ok(ArchiveSummary {
            entries: 2,
            content_bytes: listing.len() as u64,
        })
    }
}

/// Writes a few bytes, then fails like an unreadable file.
pub(crate) struct FailingArchiver;

impl ArchiveBuilder for FailingArchiver {
    fn build(&self, root: &Path, sink: &mut dyn Write) -> StarterResult<ArchiveSummary> {
        let _ = sink.write_all(b"PK partial");
        Err(ApplicationError::ArchiveFailed {
            path: root.join("broken"),
            reason: "disk full".into(),
        }
        .into())
    }
}

/// Must never be reached.
pub(crate) struct PanickingArchiver;

impl ArchiveBuilder for PanickingArchiver {
    fn build(&self, _root: &Path, _sink: &mut dyn Write) -> StarterResult<ArchiveSummary> {
        panic!("archive built for a failed generation")
    }
}

/// Prints `output`, returns `status` and remembers every request.
pub(crate) struct ScriptedGenerator {
    status: i32,
    output: String,
    requests: Mutex<Vec<GeneratorRequest>>,
}

impl ScriptedGenerator {
    pub(crate) fn new(status: i32, output: &str) -> Self {
        Self {
            status,
            output: output.to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn succeeding() -> Self {
        Self::new(0, "[INFO] BUILD SUCCESS")
    }

    pub(crate) fn requests(&self) -> Vec<GeneratorRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl ProjectGenerator for ScriptedGenerator {
    fn run(&self, request: &GeneratorRequest, output: &mut dyn Write) -> i32 {
        self.requests.lock().unwrap().push(request.clone());
        let _ = output.write_all(self.output.as_bytes());
        self.status
    }
}

pub(crate) struct PanickingGenerator;

impl ProjectGenerator for PanickingGenerator {
    fn name(&self) -> &str {
        "panicking"
    }

    fn run(&self, _request: &GeneratorRequest, _output: &mut dyn Write) -> i32 {
        panic!("generator crashed")
    }
}

fn delay(request: &GeneratorRequest) {
    let ms = request
        .property("delayMs")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    thread::sleep(Duration::from_millis(ms));
}

static GLOBAL_ROOT: Mutex<Option<PathBuf>> = Mutex::new(None);

/// Keeps its project root in a process-wide slot, like a tool configured
/// through global settings. Prints the root it read back after `delayMs`.
pub(crate) struct GlobalRootGenerator;

impl ProjectGenerator for GlobalRootGenerator {
    fn root_binding(&self) -> RootBinding {
        RootBinding::ProcessGlobal
    }

    fn run(&self, request: &GeneratorRequest, output: &mut dyn Write) -> i32 {
        *GLOBAL_ROOT.lock().unwrap() = request.project_root().map(Path::to_path_buf);
        delay(request);
        let root = GLOBAL_ROOT.lock().unwrap().clone();
        match root {
            Some(root) => {
                let _ = write!(output, "{}", root.display());
                0
            }
            None => 1,
        }
    }
}

/// Reads its root from the request only. Prints it after `delayMs`.
pub(crate) struct PerRequestRootGenerator;

impl ProjectGenerator for PerRequestRootGenerator {
    fn run(&self, request: &GeneratorRequest, output: &mut dyn Write) -> i32 {
        delay(request);
        match request.project_root() {
            Some(root) => {
                let _ = write!(output, "{}", root.display());
                0
            }
            None => 1,
        }
    }
}
