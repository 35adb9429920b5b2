//! # Schema Validation
//!
//! Runtime validation of register records against JSON Schema documents.
//!
//! ## Invariant
//!
//! Every record written to the output tree has passed validation against
//! its schema. Failures carry the full list of violations (instance path
//! and message) so the offending cell can be found in the sheet.
//!
//! ## Schema Resolution
//!
//! A schema may `$ref` other schema files by relative name or by an
//! absolute `$id` URI; in both cases the last path segment is looked up
//! next to the referring schema on disk. Anything else resolves to the
//! permissive schema `{}` so validation never reaches the network.

use std::fmt;
use std::path::{Path, PathBuf};

use jsonschema::{Retrieve, Uri, Validator};
use regbook_core::Record;
use serde_json::{Map, Value};
use thiserror::Error;

/// Resolves `$ref` URIs to schema files living beside the root schema.
struct SiblingSchemaRetriever {
    base_dir: Option<PathBuf>,
}

impl Retrieve for SiblingSchemaRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        let filename = uri_str
            .split(['#', '?'])
            .next()
            .unwrap_or(uri_str)
            .rsplit('/')
            .next()
            .unwrap_or(uri_str);

        if let Some(base_dir) = &self.base_dir {
            let candidate = base_dir.join(filename);
            if !filename.is_empty() && candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)?;
                return Ok(serde_json::from_str(&content)?);
            }
        }

        // Metaschemas and unknown references accept anything.
        Ok(serde_json::json!({}))
    }
}

/// Error loading a schema or validating a record against it.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The record did not conform to the schema.
    #[error("validation failed against schema '{schema_name}':\n{violations}")]
    ValidationFailed {
        /// Name of the schema that was validated against.
        schema_name: String,
        /// Structured list of individual violations.
        violations: ValidationViolations,
    },

    /// The schema file could not be loaded.
    #[error("schema load error for '{schema_name}': {reason}")]
    SchemaLoadError {
        /// Schema path or identifier.
        schema_name: String,
        /// Reason the schema could not be loaded.
        reason: String,
    },

    /// The compiled validator could not be built (e.g., invalid schema).
    #[error("validator build error for schema '{schema_name}': {reason}")]
    ValidatorBuildError {
        /// Schema path or identifier.
        schema_name: String,
        /// Reason the validator could not be built.
        reason: String,
    },

    /// A property's `index` annotation is malformed.
    #[error("invalid index annotation on property '{field}' of schema '{schema_name}': {reason}")]
    InvalidIndexAnnotation {
        /// Schema path or identifier.
        schema_name: String,
        /// Property carrying the annotation.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// IO error reading a schema.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single validation violation with structured context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// JSON Pointer path to the violating field in the instance.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

/// Collection of validation violations.
#[derive(Debug, Clone)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// A compiled JSON Schema for one record kind.
///
/// Holds both the parsed document (for reading `properties`, `required`,
/// and index annotations) and the compiled validator.
pub struct RecordSchema {
    name: String,
    document: Value,
    validator: Validator,
}

impl fmt::Debug for RecordSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordSchema")
            .field("name", &self.name)
            .field("properties", &self.property_names())
            .finish_non_exhaustive()
    }
}

impl RecordSchema {
    /// Load and compile a schema from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::SchemaLoadError` if the file is missing or not
    /// valid JSON, and `SchemaError::ValidatorBuildError` if it is not a
    /// valid schema.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let schema_name = path.display().to_string();

        let content = std::fs::read_to_string(path).map_err(|e| SchemaError::SchemaLoadError {
            schema_name: schema_name.clone(),
            reason: format!("cannot read schema file: {e}"),
        })?;
        let document: Value =
            serde_json::from_str(&content).map_err(|e| SchemaError::SchemaLoadError {
                schema_name: schema_name.clone(),
                reason: format!("invalid JSON: {e}"),
            })?;

        let base_dir = path.parent().map(Path::to_path_buf);
        let schema = Self::compile(schema_name, document, base_dir)?;
        tracing::debug!(
            schema = %schema.name,
            properties = schema.property_names().len(),
            "loaded schema"
        );
        Ok(schema)
    }

    /// Compile an in-memory schema document. `$ref`s to other files
    /// resolve to the permissive schema.
    pub fn from_value(name: impl Into<String>, document: Value) -> Result<Self, SchemaError> {
        Self::compile(name.into(), document, None)
    }

    fn compile(
        name: String,
        document: Value,
        base_dir: Option<PathBuf>,
    ) -> Result<Self, SchemaError> {
        if !document.is_object() {
            return Err(SchemaError::SchemaLoadError {
                schema_name: name,
                reason: "schema root must be a JSON object".to_string(),
            });
        }

        let mut opts = jsonschema::options();
        opts.with_retriever(SiblingSchemaRetriever { base_dir });
        let validator = opts
            .build(&document)
            .map_err(|e| SchemaError::ValidatorBuildError {
                schema_name: name.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            name,
            document,
            validator,
        })
    }

    /// Schema name (its path when loaded from disk).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parsed schema document.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// The `properties` object, empty if absent.
    pub fn properties(&self) -> Map<String, Value> {
        self.document
            .get("properties")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default()
    }

    /// Declared property names, in schema order.
    pub fn property_names(&self) -> Vec<&str> {
        self.document
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| props.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Names listed in the schema's top-level `required` array.
    pub fn required(&self) -> Vec<&str> {
        self.document
            .get("required")
            .and_then(Value::as_array)
            .map(|req| req.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Validate a JSON value against this schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::ValidationFailed` with every violation if the
    /// instance is invalid.
    pub fn validate(&self, instance: &Value) -> Result<(), SchemaError> {
        let errors: Vec<Violation> = self
            .validator
            .iter_errors(instance)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::ValidationFailed {
                schema_name: self.name.clone(),
                violations: ValidationViolations { violations: errors },
            })
        }
    }

    /// Validate a register record against this schema.
    pub fn validate_record(&self, record: &Record) -> Result<(), SchemaError> {
        self.validate(&record.to_json())
    }
}
