//! Caller parameters and the ordered effective parameter set.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use super::defaults::{ParameterDefaults, keys};
use super::error::DomainError;

/// Archive name used when no artifact id is known.
pub const DEFAULT_ARCHIVE_STEM: &str = "starter";

/// A named parameter supplied by a caller.
///
/// The key is always present; an absent value means "not supplied" and the
/// parameter is skipped when the effective set is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Parameter {
    key: String,
    value: Option<String>,
}

impl Parameter {
    /// Create a parameter with a value.
    ///
    /// # Panics
    /// Panics if `key` is empty (use `try_new` for fallible).
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::optional(key, Some(value.into()))
    }

    /// Create a parameter whose value may be absent.
    ///
    /// # Panics
    /// Panics if `key` is empty.
    pub fn optional(key: impl Into<String>, value: Option<String>) -> Self {
        let key = key.into();
        assert!(!key.is_empty(), "Parameter key cannot be empty");
        Self { key, value }
    }

    /// Fallible constructor.
    pub fn try_new(key: impl Into<String>, value: Option<String>) -> Result<Self, DomainError> {
        let key = key.into();
        if key.is_empty() {
            return Err(DomainError::EmptyParameterKey);
        }
        Ok(Self { key, value })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

/// Parses `KEY=VALUE`. Everything after the first `=` is the value, so
/// `KEY=` yields an empty (but present) value.
impl FromStr for Parameter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, value) = s.split_once('=').ok_or_else(|| DomainError::InvalidParameter {
            input: s.to_string(),
            reason: "expected KEY=VALUE".into(),
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(DomainError::InvalidParameter {
                input: s.to_string(),
                reason: "key cannot be empty".into(),
            });
        }
        Ok(Self {
            key: key.to_string(),
            value: Some(value.to_string()),
        })
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}={}", self.key, value),
            None => write!(f, "{}", self.key),
        }
    }
}

/// Caller parameters merged with the mandatory defaults.
///
/// Ordered by first insertion of each key. Supplying a key twice keeps the
/// first position and the last value; defaults never replace a value that
/// is already present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectiveParameters {
    entries: Vec<(String, String)>,
}

impl EffectiveParameters {
    /// Build the effective set for `inputs`.
    pub fn resolve(inputs: &[Parameter], defaults: &ParameterDefaults) -> Self {
        let mut set = Self::default();
        for parameter in inputs {
            if let Some(value) = parameter.value() {
                set.insert(parameter.key(), value);
            }
        }
        defaults.apply(&mut set);
        set
    }

    /// Insert or overwrite, keeping the original position of an existing key.
    pub fn insert(&mut self, key: &str, value: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
    }

    /// Insert only if `key` is not present yet. Returns `true` if inserted.
    pub fn set_if_absent(&mut self, key: &str, value: &str) -> bool {
        if self.contains(key) {
            return false;
        }
        self.entries.push((key.to_string(), value.to_string()));
        true
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as generator property flags: `-Dkey=value`, in order.
    pub fn to_properties(&self) -> Vec<String> {
        self.iter().map(|(k, v)| format!("-D{k}={v}")).collect()
    }

    /// `<artifactId>.zip` for this set.
    pub fn archive_file_name(&self) -> String {
        archive_file_name(self.get(keys::ARTIFACT_ID))
    }
}

impl Serialize for EffectiveParameters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// Download name for an archive: `<artifact>.zip`, or `starter.zip` when the
/// artifact id is missing or blank.
pub fn archive_file_name(artifact_id: Option<&str>) -> String {
    let stem = artifact_id
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or(DEFAULT_ARCHIVE_STEM);
    format!("{stem}.zip")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(inputs: &[Parameter]) -> EffectiveParameters {
        EffectiveParameters::resolve(inputs, &ParameterDefaults::default())
    }

    #[test]
    fn empty_input_gets_every_default_once_in_order() {
        let set = resolve(&[]);
        let order: Vec<_> = set.keys().collect();
        assert_eq!(order, keys::MANDATORY.to_vec());
        assert_eq!(set.get(keys::GROUP_ID), Some("com.example"));
        assert_eq!(set.get(keys::ARTIFACT_ID), Some("starter"));
        assert_eq!(set.get(keys::PACKAGE), Some("com.example.starter"));
        assert_eq!(set.get(keys::INTERACTIVE_MODE), Some("false"));
        assert_eq!(set.get(keys::ARCHETYPE_VERSION), Some("LATEST"));
    }

    #[test]
    fn caller_values_are_never_overwritten() {
        let inputs = [
            Parameter::new(keys::GROUP_ID, "org.acme"),
            Parameter::new(keys::VERSION, "2.0"),
            Parameter::new(keys::BASE_TYPE, "infra"),
        ];
        let set = resolve(&inputs);
        assert_eq!(set.get(keys::GROUP_ID), Some("org.acme"));
        assert_eq!(set.get(keys::VERSION), Some("2.0"));
        assert_eq!(set.get(keys::BASE_TYPE), Some("infra"));
        for key in keys::MANDATORY {
            assert_eq!(set.keys().filter(|k| *k == key).count(), 1, "{key}");
        }
    }

    #[test]
    fn caller_keys_come_first() {
        let set = resolve(&[Parameter::new("useShiro", "false")]);
        assert_eq!(set.keys().next(), Some("useShiro"));
        assert_eq!(set.len(), keys::MANDATORY.len() + 1);
    }

    #[test]
    fn package_is_derived_from_effective_group_and_artifact() {
        let set = resolve(&[
            Parameter::new(keys::ARTIFACT_ID, "demo"),
            Parameter::new(keys::GROUP_ID, "org.acme"),
        ]);
        assert_eq!(set.get(keys::PACKAGE), Some("org.acme.demo"));
    }

    #[test]
    fn explicit_package_wins() {
        let set = resolve(&[Parameter::new(keys::PACKAGE, "com.flowlogix.starter")]);
        assert_eq!(set.get(keys::PACKAGE), Some("com.flowlogix.starter"));
    }

    #[test]
    fn absent_values_fall_back_to_defaults() {
        let set = resolve(&[
            Parameter::optional(keys::PROJECT_NAME, None),
            Parameter::new(keys::ARTIFACT_ID, "demo"),
        ]);
        assert_eq!(set.get(keys::PROJECT_NAME), Some("Starter Project"));
        assert_eq!(set.keys().next(), Some(keys::ARTIFACT_ID));
    }

    #[test]
    fn repeated_key_keeps_first_position_and_last_value() {
        let set = resolve(&[
            Parameter::new("a", "1"),
            Parameter::new("b", "2"),
            Parameter::new("a", "3"),
        ]);
        let first_two: Vec<_> = set.iter().take(2).collect();
        assert_eq!(first_two, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn properties_render_as_defines() {
        let set = resolve(&[Parameter::new(keys::ARTIFACT_ID, "demo")]);
        let props = set.to_properties();
        assert_eq!(props[0], "-DartifactId=demo");
        assert!(props.contains(&"-DgroupId=com.example".to_string()));
        assert_eq!(props.len(), set.len());
    }

    #[test]
    fn demo_scenario_names_archive_after_artifact() {
        let set = resolve(&[Parameter::new(keys::ARTIFACT_ID, "demo")]);
        assert_eq!(set.get(keys::ARTIFACT_ID), Some("demo"));
        assert_eq!(set.get(keys::GROUP_ID), Some("com.example"));
        assert_eq!(set.archive_file_name(), "demo.zip");
    }

    #[test]
    fn archive_name_defaults_to_starter() {
        assert_eq!(archive_file_name(None), "starter.zip");
        assert_eq!(archive_file_name(Some("  ")), "starter.zip");
        assert_eq!(archive_file_name(Some("demo")), "demo.zip");
    }

    #[test]
    fn parses_key_value() {
        let p: Parameter = "groupId=org.acme".parse().unwrap();
        assert_eq!(p.key(), "groupId");
        assert_eq!(p.value(), Some("org.acme"));

        let p: Parameter = "package=".parse().unwrap();
        assert_eq!(p.value(), Some(""));

        let p: Parameter = "expr=a=b".parse().unwrap();
        assert_eq!(p.value(), Some("a=b"));
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(matches!(
            "groupId".parse::<Parameter>(),
            Err(DomainError::InvalidParameter { .. })
        ));
        assert!(matches!(
            "=value".parse::<Parameter>(),
            Err(DomainError::InvalidParameter { .. })
        ));
        assert_eq!(
            Parameter::try_new("", None).unwrap_err(),
            DomainError::EmptyParameterKey
        );
    }
}
