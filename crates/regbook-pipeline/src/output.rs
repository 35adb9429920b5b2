//! # Output Tree
//!
//! All generated files live under one root directory:
//!
//! ```text
//! <root>/evidences/<Evidence ID>.json
//! <root>/evidences/index.json
//! <root>/requirements/<Requirement ID>.json
//! <root>/requirements/index.json
//! <root>/indexes/<index id>.json
//! <root>/indexes/evidences-by-requirement.json
//! <root>/indexes/index.json
//! ```
//!
//! Files are pretty-printed with two-space indentation and no trailing
//! newline. Writes are not transactional: a failed run leaves earlier
//! files in place.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::PipelineError;

pub const EVIDENCES_DIR: &str = "evidences";
pub const REQUIREMENTS_DIR: &str = "requirements";
pub const INDEXES_DIR: &str = "indexes";
/// Name of the flat index inside each directory, and of the discovery manifest.
pub const INDEX_FILE: &str = "index.json";

/// Writer for the generated directory tree.
#[derive(Debug)]
pub struct OutputTree {
    root: PathBuf,
    dry_run: bool,
    files_written: usize,
}

impl OutputTree {
    /// Write files under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            dry_run: false,
            files_written: 0,
        }
    }

    /// Serialize everything but write nothing.
    pub fn dry_run(root: impl Into<PathBuf>) -> Self {
        Self {
            dry_run: true,
            ..Self::new(root)
        }
    }

    /// Output root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns true if writes are suppressed.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Number of files written (or that would have been, in a dry run).
    pub fn files_written(&self) -> usize {
        self.files_written
    }

    /// Serialize `value` to `<root>/<dir>/<file>`, creating `dir` if needed.
    pub fn write_json<T: Serialize + ?Sized>(
        &mut self,
        dir: &str,
        file: &str,
        value: &T,
    ) -> Result<PathBuf, PipelineError> {
        let path = self.root.join(dir).join(file);
        let body = serde_json::to_string_pretty(value)?;

        if !self.dry_run {
            let write_error = |source: std::io::Error| PipelineError::Write {
                path: path.display().to_string(),
                source,
            };
            std::fs::create_dir_all(self.root.join(dir)).map_err(write_error)?;
            std::fs::write(&path, body).map_err(write_error)?;
        }

        self.files_written += 1;
        tracing::debug!(path = %path.display(), dry_run = self.dry_run, "wrote json");
        Ok(path)
    }
}
