//! # Pipeline Configuration
//!
//! Paths and behavior switches for one generator run. Defaults are the
//! repository layout the generator is normally run from:
//!
//! | key                    | default                            |
//! |------------------------|------------------------------------|
//! | `workbook`             | `data/requirements.xlsx`           |
//! | `requirement_schema`   | `schemas/requirement.schema.json`  |
//! | `evidence_schema`      | `schemas/evidence.schema.json`     |
//! | `output_dir`           | `docs`                             |
//! | `attach_evidences`     | `false`                            |
//! | `related_id_separator` | unset (single related requirement) |
//!
//! A YAML file may override any subset of keys. Relative paths inside the
//! file are resolved against the file's directory.

use std::path::{Path, PathBuf};

use regbook_core::FrameworkId;
use serde::Deserialize;

use crate::error::PipelineError;

pub const DEFAULT_WORKBOOK: &str = "data/requirements.xlsx";
pub const DEFAULT_REQUIREMENT_SCHEMA: &str = "schemas/requirement.schema.json";
pub const DEFAULT_EVIDENCE_SCHEMA: &str = "schemas/evidence.schema.json";
pub const DEFAULT_OUTPUT_DIR: &str = "docs";

/// Configuration for a generator run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Workbook (`.xlsx`, `.xls`, `.ods`) or directory of CSV exports.
    pub workbook: PathBuf,
    /// Requirement JSON Schema.
    pub requirement_schema: PathBuf,
    /// Evidence JSON Schema.
    pub evidence_schema: PathBuf,
    /// Root of the generated tree.
    pub output_dir: PathBuf,
    /// Requirement columns holding each framework's mapping.
    pub framework_columns: FrameworkColumns,
    /// Attach each requirement's evidence summaries as `Evidences`.
    pub attach_evidences: bool,
    /// Split `Related Requirement ID(s)` cells on this separator.
    pub related_id_separator: Option<String>,
}

/// Column names of the framework mapping cells.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrameworkColumns {
    pub satre: String,
    pub entrust_blueprint: String,
}

impl Default for FrameworkColumns {
    fn default() -> Self {
        Self {
            satre: FrameworkId::Satre.default_column().to_string(),
            entrust_blueprint: FrameworkId::EntrustBlueprint.default_column().to_string(),
        }
    }
}

impl FrameworkColumns {
    /// Column holding `framework`'s mapping.
    pub fn column(&self, framework: FrameworkId) -> &str {
        match framework {
            FrameworkId::Satre => &self.satre,
            FrameworkId::EntrustBlueprint => &self.entrust_blueprint,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workbook: PathBuf::from(DEFAULT_WORKBOOK),
            requirement_schema: PathBuf::from(DEFAULT_REQUIREMENT_SCHEMA),
            evidence_schema: PathBuf::from(DEFAULT_EVIDENCE_SCHEMA),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            framework_columns: FrameworkColumns::default(),
            attach_evidences: false,
            related_id_separator: None,
        }
    }
}

impl PipelineConfig {
    /// Load a YAML configuration file.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Config` if the file cannot be read, is not
    /// valid YAML, contains unknown keys, or fails [`validate`](Self::validate).
    pub fn from_yaml_file(path: &Path) -> Result<Self, PipelineError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let mut config: PipelineConfig = serde_yaml::from_str(&content)
            .map_err(|e| PipelineError::Config(format!("invalid {}: {e}", path.display())))?;

        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }
        config.validate()?;
        Ok(config)
    }

    /// Replace the four paths, as given on the command line.
    pub fn with_paths(
        mut self,
        workbook: PathBuf,
        requirement_schema: PathBuf,
        evidence_schema: PathBuf,
        output_dir: PathBuf,
    ) -> Self {
        self.workbook = workbook;
        self.requirement_schema = requirement_schema;
        self.evidence_schema = evidence_schema;
        self.output_dir = output_dir;
        self
    }

    /// Check settings that cannot be expressed in the type.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if matches!(self.related_id_separator.as_deref(), Some("")) {
            return Err(PipelineError::Config(
                "related_id_separator must not be empty".to_string(),
            ));
        }
        let columns = &self.framework_columns;
        if columns.satre.is_empty() || columns.entrust_blueprint.is_empty() {
            return Err(PipelineError::Config(
                "framework column names must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        for path in [
            &mut self.workbook,
            &mut self.requirement_schema,
            &mut self.evidence_schema,
            &mut self.output_dir,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_repository_layout() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.workbook, PathBuf::from("data/requirements.xlsx"));
        assert_eq!(cfg.output_dir, PathBuf::from("docs"));
        assert!(!cfg.attach_evidences);
        assert!(cfg.related_id_separator.is_none());
        assert_eq!(cfg.framework_columns.column(FrameworkId::Satre), "SATRE");
        assert_eq!(
            cfg.framework_columns.column(FrameworkId::EntrustBlueprint),
            "ENTRUST Blueprint"
        );
        cfg.validate().unwrap();
    }

    #[test]
    fn yaml_overrides_and_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regbook.yaml");
        std::fs::write(
            &path,
            "workbook: register.xlsx\n\
             output_dir: /srv/site\n\
             attach_evidences: true\n\
             related_id_separator: \",\"\n\
             framework_columns:\n  satre: SATRE Ref\n",
        )
        .unwrap();

        let cfg = PipelineConfig::from_yaml_file(&path).unwrap();
        assert_eq!(cfg.workbook, dir.path().join("register.xlsx"));
        assert_eq!(cfg.output_dir, PathBuf::from("/srv/site"));
        assert_eq!(
            cfg.requirement_schema,
            dir.path().join("schemas/requirement.schema.json")
        );
        assert!(cfg.attach_evidences);
        assert_eq!(cfg.related_id_separator.as_deref(), Some(","));
        assert_eq!(cfg.framework_columns.satre, "SATRE Ref");
        assert_eq!(cfg.framework_columns.entrust_blueprint, "ENTRUST Blueprint");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regbook.yaml");
        std::fs::write(&path, "workbok: typo.xlsx\n").unwrap();
        let err = PipelineConfig::from_yaml_file(&path).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)), "got: {err}");
    }

    #[test]
    fn empty_separator_is_rejected() {
        let cfg = PipelineConfig {
            related_id_separator: Some(String::new()),
            ..PipelineConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = PipelineConfig::from_yaml_file(Path::new("/nonexistent/regbook.yaml"))
            .unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }

    #[test]
    fn with_paths_replaces_all_four() {
        let cfg = PipelineConfig::default().with_paths(
            "a.xlsx".into(),
            "r.json".into(),
            "e.json".into(),
            "out".into(),
        );
        assert_eq!(cfg.workbook, PathBuf::from("a.xlsx"));
        assert_eq!(cfg.requirement_schema, PathBuf::from("r.json"));
        assert_eq!(cfg.evidence_schema, PathBuf::from("e.json"));
        assert_eq!(cfg.output_dir, PathBuf::from("out"));
    }
}
