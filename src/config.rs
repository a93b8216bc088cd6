use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::filter::Thresholds;
use crate::data::model::{ColumnRef, RecordColumns};

/// Settings shared by both flows, usually read from a JSON file.
///
/// ```json
/// {
///   "thresholds": { "max_p_value": 0.01 },
///   "record_columns": { "id": "CTL##" },
///   "description_column": "0",
///   "project_columns": ["1", "16", "17"],
///   "name_prefix": "AGJ"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub thresholds: Thresholds,
    pub record_columns: RecordColumns,
    pub description_column: ColumnRef,
    /// Columns the enrichment flow keeps, in order; empty keeps all.
    pub project_columns: Vec<ColumnRef>,
    pub name_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            thresholds: Thresholds::default(),
            record_columns: RecordColumns::default(),
            description_column: ColumnRef::Index(0),
            project_columns: Vec::new(),
            name_prefix: "AGJ".to_string(),
        }
    }
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text).context("parsing config")?;
        config.thresholds.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn empty_object_is_default() {
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn partial_overrides() {
        let c = Config::from_json(
            r#"{
                "thresholds": { "max_p_value": 0.01 },
                "record_columns": { "id": "0", "p_value": "PValue" },
                "description_column": "Protein Description"
            }"#,
        )
        .unwrap();
        assert_eq!(c.thresholds.max_p_value, 0.01);
        assert_eq!(c.thresholds.min_passing, 2);
        assert_eq!(c.record_columns.id, ColumnRef::Index(0));
        assert_eq!(c.record_columns.p_value, ColumnRef::name("PValue"));
        assert_eq!(c.record_columns.fold_change, ColumnRef::name("Fold Change (RifR/GspE)"));
        assert_eq!(c.description_column, ColumnRef::name("Protein Description"));
        assert!(c.project_columns.is_empty());
    }

    #[test]
    fn project_columns_mix_names_and_indices() {
        let c = Config::from_json(r#"{ "project_columns": ["1", "Fold Change", "17"] }"#).unwrap();
        assert_eq!(
            c.project_columns,
            vec![ColumnRef::Index(1), ColumnRef::name("Fold Change"), ColumnRef::Index(17)]
        );
    }

    #[test]
    fn invalid_thresholds_are_rejected() {
        let err = Config::from_json(r#"{ "thresholds": { "min_passing": 5 } }"#).unwrap_err();
        assert_eq!(err.downcast_ref::<ConfigError>(), Some(&ConfigError::MinPassing(5)));
    }

    #[test]
    fn empty_column_is_rejected() {
        assert!(Config::from_json(r#"{ "description_column": "" }"#).is_err());
    }

    #[test]
    fn serializes_columns_as_text() {
        let json = serde_json::to_value(Config::default()).unwrap();
        assert_eq!(json["description_column"], "0");
        assert_eq!(json["record_columns"]["id"], "CTL##");
    }
}
