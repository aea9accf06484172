//! In-process archetype generator.
//!
//! Implements the `archetype:generate` goal against the archetypes in
//! [`super::catalog`]. Like the external tool it stands in for, it reports
//! through an exit status and a build log; errors never escape as values.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use starter_core::{
    application::{GENERATE_GOAL, ports::{GeneratorRequest, ProjectGenerator}},
    domain::keys,
};
use thiserror::Error;
use tracing::{debug, instrument};

use super::catalog::{self, Archetype};
use crate::workspace::DEFAULT_MARKER;

/// Base types with a parent POM.
pub const BASE_TYPES: [&str; 2] = ["payara", "infra"];

/// Packaging types the starter archetype supports.
pub const PACKAGING_TYPES: [&str; 2] = ["war", "jar"];

const FEATURE_FLAGS: [&str; 4] = [
    keys::USE_SHIRO,
    keys::USE_OMNIFACES,
    keys::USE_PRIMEFACES,
    keys::USE_LAZY_MODEL,
];

/// Why a generation run failed. Rendered into the build log.
#[derive(Debug, Error)]
enum BuildError {
    #[error("unknown goal '{0}', expected archetype:generate")]
    UnknownGoal(String),

    #[error("no project root was set for this request")]
    MissingProjectRoot,

    #[error("{root} is not a project root: missing {marker} directory")]
    MissingMarker { root: PathBuf, marker: String },

    #[error("interactive mode is not available: no console attached")]
    Interactive,

    #[error("property {0} is required")]
    MissingProperty(&'static str),

    #[error("template not found: {group}:{artifact}")]
    TemplateNotFound { group: String, artifact: String },

    #[error("template version not found: {coordinates}:{version}")]
    VersionNotFound { coordinates: String, version: String },

    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidProperty {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("directory {0} already exists")]
    OutputExists(PathBuf),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Builtin implementation of the generator port.
#[derive(Debug, Clone)]
pub struct BuiltinArchetypeGenerator {
    marker: String,
}

impl BuiltinArchetypeGenerator {
    pub fn new() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
        }
    }

    /// Directory that must exist below the project root.
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Coordinates and description of every known archetype.
    pub fn archetypes(&self) -> impl Iterator<Item = (String, &'static str)> {
        catalog::archetypes()
            .iter()
            .map(|a| (a.coordinates(), a.description))
    }

    fn execute(
        &self,
        request: &GeneratorRequest,
        log: &mut dyn Write,
    ) -> Result<PathBuf, BuildError> {
        let goal = request.goal().unwrap_or_default();
        if goal != GENERATE_GOAL {
            return Err(BuildError::UnknownGoal(goal.to_string()));
        }

        let root = request.project_root().ok_or(BuildError::MissingProjectRoot)?;
        if !root.join(&self.marker).is_dir() {
            return Err(BuildError::MissingMarker {
                root: root.to_path_buf(),
                marker: self.marker.clone(),
            });
        }

        let mut vars: HashMap<String, String> = request
            .properties()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        if flag(&vars, keys::INTERACTIVE_MODE, false)? {
            return Err(BuildError::Interactive);
        }

        let archetype = resolve_archetype(&vars)?;
        let requested = required(&vars, keys::ARCHETYPE_VERSION)?;
        let version = archetype
            .resolve_version(requested)
            .ok_or_else(|| BuildError::VersionNotFound {
                coordinates: archetype.coordinates(),
                version: requested.to_string(),
            })?;
        let _ = writeln!(log, "[INFO] Using archetype {}:{version}", archetype.coordinates());

        for key in [keys::GROUP_ID, keys::VERSION, keys::PROJECT_NAME] {
            required(&vars, key)?;
        }
        let artifact_id = validate_artifact_id(required(&vars, keys::ARTIFACT_ID)?)?;
        let package = validate_package(required(&vars, keys::PACKAGE)?)?.to_string();
        let base_type = one_of(&vars, keys::BASE_TYPE, &BASE_TYPES, None)?.to_string();
        let packaging = one_of(&vars, keys::PACKAGING_TYPE, &PACKAGING_TYPES, Some("war"))?.to_string();

        let mut features = HashMap::new();
        for key in FEATURE_FLAGS {
            features.insert(key, flag(&vars, key, true)?);
        }
        // The lazy model is a PrimeFaces data model.
        if !features[keys::USE_PRIMEFACES] {
            features.insert(keys::USE_LAZY_MODEL, false);
        }

        let target = request.working_dir().join(&artifact_id);
        if target.exists() {
            return Err(BuildError::OutputExists(target));
        }

        vars.insert(keys::ARCHETYPE_VERSION.into(), version.into());
        vars.insert(keys::PACKAGING_TYPE.into(), packaging);
        vars.insert("packagePath".into(), package.replace('.', "/"));
        vars.insert("parentArtifactId".into(), format!("{base_type}-base"));
        vars.insert("dependencies".into(), dependencies(&features));
        for (key, enabled) in &features {
            vars.insert((*key).into(), enabled.to_string());
        }

        debug!(
            archetype = %archetype.coordinates(),
            version,
            target = %target.display(),
            "Generating project"
        );

        for file in archetype.files {
            if let Some(condition) = file.condition {
                if !features.get(condition).copied().unwrap_or(false) {
                    continue;
                }
            }
            let relative = render(file.path, &vars);
            let path = target.join(&relative);
            write_file(&path, &render(file.content, &vars), file.executable)?;
            let _ = writeln!(log, "[INFO] Generated {artifact_id}/{relative}");
        }

        Ok(target)
    }
}

impl Default for BuiltinArchetypeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectGenerator for BuiltinArchetypeGenerator {
    fn name(&self) -> &str {
        "builtin-archetype"
    }

    #[instrument(skip_all, fields(generator = "builtin-archetype"))]
    fn run(&self, request: &GeneratorRequest, output: &mut dyn Write) -> i32 {
        let _ = writeln!(output, "[INFO] Scanning for projects...");
        match self.execute(request, output) {
            Ok(target) => {
                let _ = writeln!(
                    output,
                    "[INFO] Project created from Archetype in dir: {}",
                    target.display()
                );
                let _ = writeln!(output, "[INFO] BUILD SUCCESS");
                0
            }
            Err(e) => {
                debug!(error = %e, "Generation failed");
                let _ = writeln!(output, "[ERROR] {e}");
                let _ = writeln!(output, "[INFO] BUILD FAILURE");
                1
            }
        }
    }
}

fn resolve_archetype(vars: &HashMap<String, String>) -> Result<&'static Archetype, BuildError> {
    let group = required(vars, keys::ARCHETYPE_GROUP_ID)?;
    let artifact = required(vars, keys::ARCHETYPE_ARTIFACT_ID)?;
    catalog::find(group, artifact).ok_or_else(|| BuildError::TemplateNotFound {
        group: group.to_string(),
        artifact: artifact.to_string(),
    })
}

fn required<'a>(
    vars: &'a HashMap<String, String>,
    key: &'static str,
) -> Result<&'a str, BuildError> {
    vars.get(key)
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty())
        .ok_or(BuildError::MissingProperty(key))
}

fn flag(vars: &HashMap<String, String>, key: &'static str, default: bool) -> Result<bool, BuildError> {
    match vars.get(key).map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) if v == "true" => Ok(true),
        Some(v) if v == "false" => Ok(false),
        Some(v) => Err(BuildError::InvalidProperty {
            key,
            value: v,
            reason: "expected true or false".into(),
        }),
    }
}

fn one_of<'a>(
    vars: &'a HashMap<String, String>,
    key: &'static str,
    allowed: &[&str],
    default: Option<&'a str>,
) -> Result<&'a str, BuildError> {
    let value = match (vars.get(key), default) {
        (Some(value), _) => value.as_str(),
        (None, Some(default)) => default,
        (None, None) => return Err(BuildError::MissingProperty(key)),
    };
    if allowed.contains(&value) {
        Ok(value)
    } else {
        Err(BuildError::InvalidProperty {
            key,
            value: value.to_string(),
            reason: format!("expected one of {}", allowed.join(", ")),
        })
    }
}

fn validate_artifact_id(value: &str) -> Result<String, BuildError> {
    let invalid = value == "."
        || value == ".."
        || value
            .chars()
            .any(|c| c == '/' || c == '\\' || c.is_whitespace() || c.is_control());
    if invalid {
        return Err(BuildError::InvalidProperty {
            key: keys::ARTIFACT_ID,
            value: value.to_string(),
            reason: "must be a single directory name".into(),
        });
    }
    Ok(value.to_string())
}

fn validate_package(value: &str) -> Result<&str, BuildError> {
    let valid_segment = |segment: &str| {
        let mut chars = segment.chars();
        chars
            .next()
            .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
            && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
    };
    if value.split('.').all(valid_segment) {
        Ok(value)
    } else {
        Err(BuildError::InvalidProperty {
            key: keys::PACKAGE,
            value: value.to_string(),
            reason: "not a valid Java package name".into(),
        })
    }
}

/// Replace every `{{key}}` with its value in one pass, so substituted values
/// are never scanned again. Unknown placeholders stay as-is.
fn render(template: &str, vars: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => match vars.get(&after[..end]) {
                Some(value) => {
                    out.push_str(value);
                    rest = &after[end + 2..];
                }
                None => {
                    out.push_str("{{");
                    rest = after;
                }
            },
            None => {
                out.push_str(rest);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn dependencies(features: &HashMap<&'static str, bool>) -> String {
    let mut blocks = vec![dependency("jakarta.platform", "jakarta.jakartaee-api", Some("provided"))];
    if features[keys::USE_SHIRO] {
        blocks.push(dependency("org.apache.shiro", "shiro-jakarta-ee", None));
    }
    if features[keys::USE_OMNIFACES] {
        blocks.push(dependency("org.omnifaces", "omnifaces", None));
    }
    if features[keys::USE_PRIMEFACES] {
        blocks.push(dependency("org.primefaces", "primefaces", None));
    }
    blocks.concat()
}

fn dependency(group: &str, artifact: &str, scope: Option<&str>) -> String {
    let scope = scope
        .map(|s| format!("            <scope>{s}</scope>\n"))
        .unwrap_or_default();
    format!(
        "        <dependency>\n            <groupId>{group}</groupId>\n            <artifactId>{artifact}</artifactId>\n{scope}        </dependency>\n"
    )
}

fn write_file(path: &Path, content: &str, executable: bool) -> Result<(), BuildError> {
    let io_error = |source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    fs::write(path, content).map_err(io_error)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if executable {
            let mut perms = fs::metadata(path).map_err(io_error)?.permissions();
            perms.set_mode(perms.mode() | 0o111);
            fs::set_permissions(path, perms).map_err(io_error)?;
        }
    }
    #[cfg(not(unix))]
    let _ = executable;

    Ok(())
}
