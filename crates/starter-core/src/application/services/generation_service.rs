//! Generation Service - runs the generator against a fresh workspace.
//!
//! One call to [`GenerationService::generate`] is one attempt:
//! 1. Resolve the effective parameter set
//! 2. Allocate a workspace
//! 3. Invoke the generator with its project root pinned to that workspace
//! 4. Hand back a [`Generation`] that owns the workspace
//!
//! There are no retries. A failed invocation is still a `Generation`; only
//! failures to allocate or to run the tool at all are errors here.

use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{ArchiveBuilder, GeneratorRequest, ProjectGenerator, RootBinding, WorkspaceProvider},
        services::{
            archive_stream::StreamSettings,
            generation::{Generation, Pipeline},
        },
    },
    domain::{EffectiveParameters, GenerationId, Parameter, ParameterDefaults},
    error::StarterResult,
};

/// Goal passed as the first generator argument.
pub const GENERATE_GOAL: &str = "archetype:generate";

/// Held for the whole set-invoke-read sequence of a serialized invocation.
static INVOCATION_LOCK: Mutex<()> = Mutex::new(());

/// How concurrent invocations are kept apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IsolationPolicy {
    /// Per-request project root; the global lock is taken only for
    /// generators that declare [`RootBinding::ProcessGlobal`].
    #[default]
    Auto,
    /// Every invocation runs under the global lock.
    Serialized,
}

/// Main generation service.
pub struct GenerationService {
    workspaces: Arc<dyn WorkspaceProvider>,
    generator: Arc<dyn ProjectGenerator>,
    archiver: Arc<dyn ArchiveBuilder>,
    defaults: ParameterDefaults,
    isolation: IsolationPolicy,
    stream: StreamSettings,
}

impl GenerationService {
    /// Create a service with the built-in defaults.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use starter_core::application::GenerationService;
    ///
    /// let service = GenerationService::new(
    ///     Arc::new(workspaces), // impl WorkspaceProvider
    ///     Arc::new(generator),  // impl ProjectGenerator
    ///     Arc::new(archiver),   // impl ArchiveBuilder
    /// );
    /// ```
    pub fn new(
        workspaces: Arc<dyn WorkspaceProvider>,
        generator: Arc<dyn ProjectGenerator>,
        archiver: Arc<dyn ArchiveBuilder>,
    ) -> Self {
        Self {
            workspaces,
            generator,
            archiver,
            defaults: ParameterDefaults::default(),
            isolation: IsolationPolicy::default(),
            stream: StreamSettings::default(),
        }
    }

    pub fn with_defaults(mut self, defaults: ParameterDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_isolation(mut self, isolation: IsolationPolicy) -> Self {
        self.isolation = isolation;
        self
    }

    pub fn with_stream_settings(mut self, stream: StreamSettings) -> Self {
        self.stream = stream;
        self
    }

    pub fn defaults(&self) -> &ParameterDefaults {
        &self.defaults
    }

    pub fn isolation(&self) -> IsolationPolicy {
        self.isolation
    }

    /// The parameter set a [`GenerationService::generate`] call with
    /// `inputs` would pass to the generator.
    pub fn effective_parameters(&self, inputs: &[Parameter]) -> EffectiveParameters {
        EffectiveParameters::resolve(inputs, &self.defaults)
    }

    /// Run one generation attempt.
    ///
    /// A non-zero generator status is returned as a [`Generation`] that
    /// reports it; the workspace is then still owned by that handle.
    pub fn generate(&self, inputs: &[Parameter]) -> StarterResult<Generation> {
        let id = GenerationId::new();
        let span = info_span!("generate", generation = %id, generator = self.generator.name());
        let _enter = span.enter();

        let parameters = self.effective_parameters(inputs);
        let workspace = self.workspaces.allocate()?;
        debug!(workspace = %workspace.display(), "Workspace allocated");

        let mut request = GeneratorRequest::new(GENERATE_GOAL, &parameters, &workspace);
        request.set_project_root(&workspace);
        debug!(options = ?request.arguments(), "Invoking generator");

        let (status, output) = match self.invoke(&request) {
            Ok(outcome) => outcome,
            Err(e) => {
                if let Err(cleanup) = self.workspaces.destroy(&workspace) {
                    warn!(error = %cleanup, "Workspace cleanup after failed invocation failed");
                }
                return Err(e);
            }
        };

        if status == 0 {
            info!(artifact = parameters.get("artifactId"), "Project generated");
        } else {
            info!(status, "Generator reported failure");
        }

        Ok(Generation::new(
            id,
            workspace,
            status,
            output,
            parameters,
            Pipeline {
                workspaces: Arc::clone(&self.workspaces),
                archiver: Arc::clone(&self.archiver),
                stream: self.stream,
            },
        ))
    }

    fn serialized(&self) -> bool {
        self.isolation == IsolationPolicy::Serialized
            || self.generator.root_binding() == RootBinding::ProcessGlobal
    }

    fn invoke(&self, request: &GeneratorRequest) -> StarterResult<(i32, String)> {
        // The guarded data is (), so a poisoned lock carries no broken state.
        let _guard = self
            .serialized()
            .then(|| INVOCATION_LOCK.lock().unwrap_or_else(PoisonError::into_inner));

        let mut captured: Vec<u8> = Vec::new();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let status = self.generator.run(request, &mut captured);
            let _ = captured.flush();
            status
        }));

        match outcome {
            Ok(status) => Ok((status, String::from_utf8_lossy(&captured).into_owned())),
            Err(_) => Err(ApplicationError::GeneratorPanicked {
                generator: self.generator.name().to_string(),
            }
            .into()),
        }
    }
}
