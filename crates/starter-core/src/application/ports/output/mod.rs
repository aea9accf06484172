//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the pipeline needs from the outside world. The
//! `starter-adapters` crate provides implementations.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::EffectiveParameters;
use crate::error::StarterResult;

/// Port for temporary workspace management.
///
/// Implemented by:
/// - `starter_adapters::workspace::TempWorkspaceProvider` (production)
///
/// `destroy` is not idempotent: a second call for the same workspace is a
/// caller error and fails. [`crate::application::Generation`] guarantees a
/// single call per workspace.
#[cfg_attr(test, mockall::automock)]
pub trait WorkspaceProvider: Send + Sync {
    /// Create a fresh, uniquely named workspace including its marker
    /// directory and return its path.
    fn allocate(&self) -> StarterResult<PathBuf>;

    /// Remove the workspace and everything below it, deepest entries first.
    fn destroy(&self, workspace: &Path) -> StarterResult<()>;
}

/// Where a generator reads its project root from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RootBinding {
    /// The root is read from [`GeneratorRequest::project_root`] of each call,
    /// so invocations can run concurrently.
    #[default]
    PerRequest,
    /// The tool keeps the root in process-wide state. Invocations are
    /// serialized under a global lock.
    ProcessGlobal,
}

/// One invocation of the generator tool.
///
/// `arguments` is the goal followed by one `-Dkey=value` flag per effective
/// parameter. The project root is a per-request slot: it belongs to this
/// request object, never to the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorRequest {
    arguments: Vec<String>,
    working_dir: PathBuf,
    project_root: Option<PathBuf>,
}

impl GeneratorRequest {
    pub fn new(
        goal: &str,
        parameters: &EffectiveParameters,
        working_dir: impl Into<PathBuf>,
    ) -> Self {
        let mut arguments = Vec::with_capacity(parameters.len() + 1);
        arguments.push(goal.to_string());
        arguments.extend(parameters.to_properties());
        Self {
            arguments,
            working_dir: working_dir.into(),
            project_root: None,
        }
    }

    /// The first argument (the generation goal).
    pub fn goal(&self) -> Option<&str> {
        self.arguments.first().map(String::as_str)
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    /// Pin the project root for this request only.
    pub fn set_project_root(&mut self, root: impl Into<PathBuf>) {
        self.project_root = Some(root.into());
    }

    /// All `-Dkey=value` flags, in argument order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.arguments
            .iter()
            .filter_map(|arg| arg.strip_prefix("-D"))
            .filter_map(|prop| prop.split_once('='))
    }

    /// Value of the `-Dkey=value` flag for `key`.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

/// Port for the external project generator.
///
/// The tool runs in-process. Everything it prints goes to `output`; the
/// returned status is `0` on success and the text is the only failure detail.
///
/// Implemented by:
/// - `starter_adapters::generator::BuiltinArchetypeGenerator`
pub trait ProjectGenerator: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str {
        "generator"
    }

    /// How this tool learns its project root.
    fn root_binding(&self) -> RootBinding {
        RootBinding::PerRequest
    }

    /// Run one invocation and return its exit status.
    fn run(&self, request: &GeneratorRequest, output: &mut dyn Write) -> i32;
}

/// What an archive build wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveSummary {
    /// Number of file entries.
    pub entries: usize,
    /// Uncompressed content bytes.
    pub content_bytes: u64,
}

/// Port for archive serialization.
///
/// Implemented by:
/// - `starter_adapters::archive::ZipArchiveBuilder`
pub trait ArchiveBuilder: Send + Sync {
    /// Walk `root` and write one entry per regular file into `sink`.
    ///
    /// The sink is written front to back and never rewound, so it may be a
    /// pipe. On error the bytes already written are a partial archive that
    /// callers must discard.
    fn build(&self, root: &Path, sink: &mut dyn Write) -> StarterResult<ArchiveSummary>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Parameter, ParameterDefaults};

    #[test]
    fn request_starts_with_goal_then_properties() {
        let params = EffectiveParameters::resolve(
            &[Parameter::new("artifactId", "demo")],
            &ParameterDefaults::default(),
        );
        let request = GeneratorRequest::new("archetype:generate", &params, "/tmp/ws");

        assert_eq!(request.goal(), Some("archetype:generate"));
        assert_eq!(request.arguments()[1], "-DartifactId=demo");
        assert_eq!(request.arguments().len(), params.len() + 1);
        assert_eq!(request.property("groupId"), Some("com.example"));
        assert_eq!(request.property("missing"), None);
        assert_eq!(request.working_dir(), Path::new("/tmp/ws"));
    }

    #[test]
    fn project_root_is_unset_until_pinned() {
        let params = EffectiveParameters::default();
        let mut request = GeneratorRequest::new("archetype:generate", &params, "/tmp/ws");
        assert!(request.project_root().is_none());

        request.set_project_root("/tmp/ws");
        assert_eq!(request.project_root(), Some(Path::new("/tmp/ws")));
    }

    #[test]
    fn property_values_may_contain_equals() {
        let mut params = EffectiveParameters::default();
        params.insert("projectName", "a=b");
        let request = GeneratorRequest::new("goal", &params, "/tmp");
        assert_eq!(request.property("projectName"), Some("a=b"));
    }
}
