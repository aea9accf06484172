//! Mandatory parameter defaults.
//!
//! Defaults are applied with set-if-absent semantics after the caller's
//! parameters, in a fixed order, so every invocation receives a complete and
//! deterministic parameter list even without caller input.

use serde::{Deserialize, Serialize};

use super::parameter::EffectiveParameters;

/// Well-known parameter keys understood by the archetype generator.
pub mod keys {
    pub const ARCHETYPE_GROUP_ID: &str = "archetypeGroupId";
    pub const ARCHETYPE_ARTIFACT_ID: &str = "archetypeArtifactId";
    pub const ARCHETYPE_VERSION: &str = "archetypeVersion";
    pub const INTERACTIVE_MODE: &str = "interactiveMode";
    pub const GROUP_ID: &str = "groupId";
    pub const ARTIFACT_ID: &str = "artifactId";
    pub const PROJECT_NAME: &str = "projectName";
    pub const PACKAGE: &str = "package";
    pub const VERSION: &str = "version";
    pub const BASE_TYPE: &str = "baseType";
    pub const PACKAGING_TYPE: &str = "packagingType";
    pub const USE_SHIRO: &str = "useShiro";
    pub const USE_OMNIFACES: &str = "useOmniFaces";
    pub const USE_PRIMEFACES: &str = "usePrimeFaces";
    pub const USE_LAZY_MODEL: &str = "useLazyModel";

    /// Keys that are always present in an effective parameter set, in the
    /// order their defaults are applied.
    pub const MANDATORY: [&str; 10] = [
        ARCHETYPE_GROUP_ID,
        ARCHETYPE_ARTIFACT_ID,
        ARCHETYPE_VERSION,
        INTERACTIVE_MODE,
        GROUP_ID,
        ARTIFACT_ID,
        PROJECT_NAME,
        PACKAGE,
        VERSION,
        BASE_TYPE,
    ];
}

/// Values used for keys the caller did not supply.
///
/// `package` has no entry here: it is derived from the effective
/// `groupId` and `artifactId`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterDefaults {
    pub archetype_group_id: String,
    pub archetype_artifact_id: String,
    pub archetype_version: String,
    pub interactive_mode: bool,
    pub group_id: String,
    pub artifact_id: String,
    pub project_name: String,
    pub version: String,
    pub base_type: String,
}

impl Default for ParameterDefaults {
    fn default() -> Self {
        Self {
            archetype_group_id: "com.flowlogix.archetypes".into(),
            archetype_artifact_id: "starter".into(),
            archetype_version: "LATEST".into(),
            interactive_mode: false,
            group_id: "com.example".into(),
            artifact_id: "starter".into(),
            project_name: "Starter Project".into(),
            version: "1.x-SNAPSHOT".into(),
            base_type: "payara".into(),
        }
    }
}

impl ParameterDefaults {
    /// Fill every mandatory key that is still missing from `set`.
    pub fn apply(&self, set: &mut EffectiveParameters) {
        set.set_if_absent(keys::ARCHETYPE_GROUP_ID, &self.archetype_group_id);
        set.set_if_absent(keys::ARCHETYPE_ARTIFACT_ID, &self.archetype_artifact_id);
        set.set_if_absent(keys::ARCHETYPE_VERSION, &self.archetype_version);
        set.set_if_absent(keys::INTERACTIVE_MODE, &self.interactive_mode.to_string());

        set.set_if_absent(keys::GROUP_ID, &self.group_id);
        set.set_if_absent(keys::ARTIFACT_ID, &self.artifact_id);
        set.set_if_absent(keys::PROJECT_NAME, &self.project_name);

        // Both lookups succeed: the two keys were made present just above.
        let package = format!(
            "{}.{}",
            set.get(keys::GROUP_ID).unwrap_or_default(),
            set.get(keys::ARTIFACT_ID).unwrap_or_default()
        );
        set.set_if_absent(keys::PACKAGE, &package);

        set.set_if_absent(keys::VERSION, &self.version);
        set.set_if_absent(keys::BASE_TYPE, &self.base_type);
    }
}
