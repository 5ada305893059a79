use std::collections::{BTreeMap, BTreeSet};

use caldelta_types::{names, QName};
use serde::{Deserialize, Serialize};

use crate::error::{DiffError, DiffResult};

/// Entity names excluded from comparison, per nesting level.
///
/// A skipped entity takes no part in the diff on either side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkipSet {
    pub components: BTreeSet<QName>,
    pub properties: BTreeSet<QName>,
    pub parameters: BTreeSet<QName>,
}

impl Default for SkipSet {
    /// Volatile bookkeeping: product id, version, the creation and
    /// modification stamps, and the Bedework identity parameter.
    fn default() -> Self {
        Self {
            components: BTreeSet::new(),
            properties: [
                names::PRODID,
                names::VERSION,
                names::CREATED,
                names::DTSTAMP,
                names::LAST_MODIFIED,
            ]
            .into_iter()
            .collect(),
            parameters: [names::X_BEDEWORK_UID].into_iter().collect(),
        }
    }
}

impl SkipSet {
    /// A skip set that excludes nothing.
    pub fn none() -> Self {
        Self {
            components: BTreeSet::new(),
            properties: BTreeSet::new(),
            parameters: BTreeSet::new(),
        }
    }

    pub fn skips_component(&self, name: &QName) -> bool {
        self.components.contains(name)
    }

    pub fn skips_property(&self, name: &QName) -> bool {
        self.properties.contains(name)
    }

    pub fn skips_parameter(&self, name: &QName) -> bool {
        self.parameters.contains(name)
    }
}

/// Process-lifetime configuration of a [`DiffEngine`](crate::DiffEngine).
///
/// Fields missing from a TOML document keep their default value:
///
/// ```toml
/// [skip]
/// properties = ["prodid", "version", "dtstamp", "sequence"]
///
/// [mapped_names]
/// "x-bedework-exsynch-organizer" = "organizer"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Entities excluded from comparison.
    pub skip: SkipSet,
    /// Real name → name used for matching and ordering.
    pub mapped_names: BTreeMap<QName, QName>,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            skip: SkipSet::default(),
            mapped_names: [(names::X_BEDEWORK_EXSYNCH_ORGANIZER, names::ORGANIZER)]
                .into_iter()
                .collect(),
        }
    }
}

impl DiffConfig {
    /// A configuration that skips nothing and maps nothing.
    pub fn exhaustive() -> Self {
        Self {
            skip: SkipSet::none(),
            mapped_names: BTreeMap::new(),
        }
    }

    /// Parse a configuration from TOML.
    pub fn from_toml_str(s: &str) -> DiffResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| DiffError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Render the configuration as TOML.
    pub fn to_toml_string(&self) -> DiffResult<String> {
        toml::to_string(self).map_err(|e| DiffError::Config(e.to_string()))
    }

    /// The name `name` is matched and ordered under.
    pub fn mapped_name<'a>(&'a self, name: &'a QName) -> &'a QName {
        self.mapped_names.get(name).unwrap_or(name)
    }

    /// Mappings are applied once, so a mapping target must not itself be
    /// mapped.
    pub fn validate(&self) -> DiffResult<()> {
        for (from, to) in &self.mapped_names {
            if from != to && self.mapped_names.contains_key(to) {
                return Err(DiffError::Config(format!(
                    "mapped name '{from}' targets '{to}', which is itself mapped"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_skips_bookkeeping() {
        let config = DiffConfig::default();
        assert!(config.skip.skips_property(&names::DTSTAMP));
        assert!(config.skip.skips_property(&names::LAST_MODIFIED));
        assert!(!config.skip.skips_property(&names::SUMMARY));
        assert!(config.skip.skips_parameter(&names::X_BEDEWORK_UID));
        assert!(config.skip.components.is_empty());
    }

    #[test]
    fn default_mapping() {
        let config = DiffConfig::default();
        assert_eq!(
            config.mapped_name(&names::X_BEDEWORK_EXSYNCH_ORGANIZER),
            &names::ORGANIZER
        );
        assert_eq!(config.mapped_name(&names::SUMMARY), &names::SUMMARY);
    }

    #[test]
    fn from_toml_partial() {
        let config = DiffConfig::from_toml_str(
            r#"
            [skip]
            properties = ["DTSTAMP", "sequence"]
            components = ["valarm"]
            "#,
        )
        .unwrap();
        assert!(config.skip.skips_property(&names::SEQUENCE));
        assert!(!config.skip.skips_property(&names::PRODID));
        assert!(config.skip.skips_component(&names::VALARM));
        // Unstated fields keep their defaults.
        assert!(config.skip.skips_parameter(&names::X_BEDEWORK_UID));
        assert_eq!(config.mapped_names, DiffConfig::default().mapped_names);
    }

    #[test]
    fn from_toml_mapping_with_clark_names() {
        let config = DiffConfig::from_toml_str(
            r#"
            [mapped_names]
            "{urn:example}x-owner" = "organizer"
            "#,
        )
        .unwrap();
        let owner = QName::new("urn:example", "x-owner");
        assert_eq!(config.mapped_name(&owner), &names::ORGANIZER);
    }

    #[test]
    fn from_toml_rejects_bad_names() {
        let err = DiffConfig::from_toml_str("[skip]\nproperties = [\"{broken\"]").unwrap_err();
        assert!(matches!(err, DiffError::Config(_)));
    }

    #[test]
    fn rejects_chained_mapping() {
        let err = DiffConfig::from_toml_str(
            r#"
            [mapped_names]
            "x-a" = "x-b"
            "x-b" = "summary"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, DiffError::Config(_)));
    }

    #[test]
    fn toml_roundtrip() {
        let config = DiffConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(DiffConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn exhaustive_skips_nothing() {
        let config = DiffConfig::exhaustive();
        assert!(!config.skip.skips_property(&names::DTSTAMP));
        assert!(config.mapped_names.is_empty());
    }
}
