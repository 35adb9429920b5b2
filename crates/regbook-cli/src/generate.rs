//! # Generate Command
//!
//! Resolves the run configuration from defaults, an optional YAML file,
//! and the positional paths, then runs the two-phase generator.
//!
//! ```bash
//! regbook                                   # configured/default paths
//! regbook data/register.xlsx schemas/requirement.schema.json \
//!         schemas/evidence.schema.json docs
//! regbook --config regbook.yaml --check     # validate only
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use regbook_pipeline::PipelineConfig;

/// Usage line printed when the positional arguments are malformed.
pub const USAGE: &str = concat!(
    "Usage: regbook [-v...] [--config FILE] [--check] ",
    "[WORKBOOK REQUIREMENT_SCHEMA EVIDENCE_SCHEMA OUTPUT_DIR]"
);

/// Printed after a successful run.
pub const SUCCESS_MESSAGE: &str = "✔ JSON repository successfully generated";

/// Arguments for a generator run.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// YAML file overriding the default paths and options.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Read, validate, and index everything without writing files.
    #[arg(long)]
    pub check: bool,

    /// Workbook, requirement schema, evidence schema, and output directory.
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,
}

/// Build the run configuration. Returns `None` if the number of
/// positional paths is neither zero nor four.
pub fn resolve_config(args: &GenerateArgs) -> Result<Option<PipelineConfig>> {
    if !matches!(args.paths.len(), 0 | 4) {
        return Ok(None);
    }

    let config = match &args.config {
        Some(path) => PipelineConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load configuration {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    Ok(Some(match args.paths.as_slice() {
        [workbook, requirement_schema, evidence_schema, output_dir] => config.with_paths(
            workbook.clone(),
            requirement_schema.clone(),
            evidence_schema.clone(),
            output_dir.clone(),
        ),
        _ => config,
    }))
}

/// Execute a generator run.
///
/// Returns exit code: 0 on success, 1 on a usage error. Pipeline failures
/// are returned as errors.
pub fn run_generate(args: &GenerateArgs) -> Result<u8> {
    let Some(config) = resolve_config(args)? else {
        println!("{USAGE}");
        return Ok(1);
    };

    tracing::debug!(
        workbook = %config.workbook.display(),
        output = %config.output_dir.display(),
        check = args.check,
        "resolved configuration"
    );

    let summary = regbook_pipeline::run(&config, args.check).with_context(|| {
        format!(
            "failed to generate register from {}",
            config.workbook.display()
        )
    })?;

    if args.check {
        println!(
            "✔ register is valid: {} requirements, {} evidences, {} indexes (no files written)",
            summary.requirements, summary.evidences, summary.indexes
        );
    } else {
        println!("{SUCCESS_MESSAGE}");
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(paths: &[&str]) -> GenerateArgs {
        GenerateArgs {
            config: None,
            check: false,
            paths: paths.iter().map(PathBuf::from).collect(),
        }
    }

    #[test]
    fn no_paths_uses_defaults() {
        let config = resolve_config(&args(&[])).unwrap().unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn four_paths_override_defaults() {
        let config = resolve_config(&args(&["w.xlsx", "r.json", "e.json", "out"]))
            .unwrap()
            .unwrap();
        assert_eq!(config.workbook, PathBuf::from("w.xlsx"));
        assert_eq!(config.requirement_schema, PathBuf::from("r.json"));
        assert_eq!(config.evidence_schema, PathBuf::from("e.json"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn other_path_counts_are_usage_errors() {
        let counts: Vec<Vec<&str>> = vec![
            vec!["a"],
            vec!["a", "b"],
            vec!["a", "b", "c"],
            vec!["a", "b", "c", "d", "e"],
        ];
        for paths in &counts {
            assert!(resolve_config(&args(paths)).unwrap().is_none());
            assert_eq!(run_generate(&args(paths)).unwrap(), 1);
        }
    }

    #[test]
    fn config_file_is_applied_before_paths() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("regbook.yaml");
        std::fs::write(&file, "attach_evidences: true\noutput_dir: site\n").unwrap();

        let mut a = args(&[]);
        a.config = Some(file.clone());
        let config = resolve_config(&a).unwrap().unwrap();
        assert!(config.attach_evidences);
        assert_eq!(config.output_dir, dir.path().join("site"));

        let mut a = args(&["w", "r", "e", "o"]);
        a.config = Some(file);
        let config = resolve_config(&a).unwrap().unwrap();
        assert!(config.attach_evidences);
        assert_eq!(config.output_dir, PathBuf::from("o"));
    }

    #[test]
    fn unreadable_config_has_context() {
        let mut a = args(&[]);
        a.config = Some(PathBuf::from("/nonexistent/regbook.yaml"));
        let err = resolve_config(&a).unwrap_err();
        assert!(format!("{err:#}").contains("failed to load configuration"));
    }
}
