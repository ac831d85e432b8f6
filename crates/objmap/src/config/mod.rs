//! External mapping configuration.
//!
//! Configuration supplies explicit member pairs per type pair, keyed by
//! `"SourceType->TargetType"` sections. The registry hands the active
//! source to every configuration-backed strategy it builds.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{MapError, Result};

/// One configured member pair inside a type-pair section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberPair {
    pub source: String,
    pub target: String,
}

/// Supplies configured member pairs for a type pair.
///
/// Returns `None` when the configuration has no section for the pair;
/// strategies treat that as an empty rule set.
pub trait MappingConfigSource: Send + Sync {
    fn member_pairs(&self, source_type: &str, target_type: &str) -> Option<Vec<MemberPair>>;
}

/// YAML-backed mapping configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingConfig {
    #[serde(default)]
    pub mappings: HashMap<String, Vec<MemberPair>>,
}

/// Section key for a type pair.
pub fn section_key(source_type: &str, target_type: &str) -> String {
    format!("{}->{}", source_type, target_type)
}

impl MappingConfig {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_yaml(&content)?;
        info!(
            path = %path.as_ref().display(),
            sections = config.mappings.len(),
            "loaded mapping configuration"
        );
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: MappingConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate section keys and member pairs.
    pub fn validate(&self) -> Result<()> {
        for (key, pairs) in &self.mappings {
            let mut parts = key.splitn(2, "->");
            let source = parts.next().unwrap_or("");
            let target = parts.next().unwrap_or("");
            if source.is_empty() || target.is_empty() {
                return Err(MapError::Config(format!(
                    "section key '{}' must have the form 'SourceType->TargetType'",
                    key
                )));
            }
            for pair in pairs {
                if pair.source.is_empty() || pair.target.is_empty() {
                    return Err(MapError::Config(format!(
                        "section '{}' contains a pair with an empty member name",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

impl MappingConfigSource for MappingConfig {
    fn member_pairs(&self, source_type: &str, target_type: &str) -> Option<Vec<MemberPair>> {
        self.mappings
            .get(&section_key(source_type, target_type))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_yaml() {
        let config = MappingConfig::from_yaml(
            r#"
mappings:
  "Person->FlatPerson":
    - source: name
      target: name
    - source: age
      target: age
"#,
        )
        .unwrap();
        let pairs = config.member_pairs("Person", "FlatPerson").unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].source, "name");
        assert!(config.member_pairs("Person", "Other").is_none());
    }

    #[test]
    fn test_invalid_section_key() {
        let err = MappingConfig::from_yaml(
            "mappings:\n  \"PersonFlatPerson\":\n    - source: a\n      target: b\n",
        )
        .unwrap_err();
        assert!(matches!(err, MapError::Config(_)));
    }

    #[test]
    fn test_empty_member_name_rejected() {
        let err = MappingConfig::from_yaml(
            "mappings:\n  \"A->B\":\n    - source: \"\"\n      target: b\n",
        )
        .unwrap_err();
        assert!(matches!(err, MapError::Config(_)));
    }

    #[test]
    fn test_missing_mappings_defaults_empty() {
        let config = MappingConfig::from_yaml("{}").unwrap();
        assert!(config.mappings.is_empty());
    }
}
