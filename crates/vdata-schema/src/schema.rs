//! # Schema Loading
//!
//! Reads one JSON Schema document from disk and compiles it into a
//! reusable validator.
//!
//! ## Draft Selection
//!
//! The draft is detected from the document's `$schema` keyword. Documents
//! without `$schema` are treated as Draft 2020-12.
//!
//! ## Reference Resolution
//!
//! Schemas without an `$id` get the base URI `json-schema:///`, so a
//! relative `$ref: "defs.json"` arrives at the retriever as
//! `json-schema:///defs.json`. `LocalSchemaRetriever` strips that prefix
//! (and `file://`) and loads the target from disk relative to the schema's
//! own directory. Remote references are refused.

use std::fmt;
use std::path::{Path, PathBuf};

use jsonschema::{Retrieve, Uri, Validator};
use serde_json::Value;
use thiserror::Error;

use crate::validate::{char_position, strip_location};

/// Base URI assigned by `jsonschema` to documents without an `$id`.
const DEFAULT_BASE_URI: &str = "json-schema:///";
const FILE_URI_PREFIX: &str = "file://";

/// Error while loading or compiling the schema document.
///
/// All variants are fatal for a run: no data file is validated against a
/// schema that failed to load.
#[derive(Error, Debug)]
pub enum SchemaLoadError {
    /// The schema file is missing or unreadable.
    #[error("cannot read schema '{}': {source}", .path.display())]
    Read {
        /// Path to the schema file.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The schema file is not valid JSON.
    #[error(
        "schema '{}' is not valid JSON: {reason} (line {line}, column {column})",
        .path.display()
    )]
    InvalidJson {
        /// Path to the schema file.
        path: PathBuf,
        /// Parser message without its location suffix.
        reason: String,
        /// 1-indexed line of the syntax error.
        line: usize,
        /// 1-indexed column of the syntax error.
        column: usize,
    },

    /// The document is JSON but not a usable JSON Schema (meta-schema
    /// violation or unresolvable `$ref`).
    #[error("schema '{}' is not a valid JSON Schema: {reason}", .path.display())]
    InvalidSchema {
        /// Path to the schema file.
        path: PathBuf,
        /// Reason reported by the schema compiler.
        reason: String,
    },
}

/// Resolves `$ref` URIs against files next to the root schema.
struct LocalSchemaRetriever {
    base_dir: PathBuf,
}

impl LocalSchemaRetriever {
    fn resolve(&self, uri: &str) -> Option<PathBuf> {
        if let Some(rest) = uri.strip_prefix(FILE_URI_PREFIX) {
            return Some(PathBuf::from(rest));
        }
        uri.strip_prefix(DEFAULT_BASE_URI)
            .map(|relative| self.base_dir.join(relative))
    }
}

impl Retrieve for LocalSchemaRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        // Fragments are resolved by the compiler once the document is loaded.
        let uri_str = uri_str.split('#').next().unwrap_or(uri_str);

        let path = self
            .resolve(uri_str)
            .ok_or_else(|| format!("remote schema references are not supported: {uri_str}"))?;

        let content = std::fs::read_to_string(&path)
            .map_err(|e| format!("cannot read referenced schema {}: {e}", path.display()))?;
        let value = serde_json::from_str(&content)
            .map_err(|e| format!("referenced schema {} is not valid JSON: {e}", path.display()))?;
        Ok(value)
    }
}

/// A parsed and compiled JSON Schema.
///
/// Loaded once per run. Validation only borrows it, so one instance serves
/// every data file.
pub struct SchemaDocument {
    path: PathBuf,
    value: Value,
    validator: Validator,
}

impl fmt::Debug for SchemaDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaDocument")
            .field("path", &self.path)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

impl SchemaDocument {
    /// Load and compile the schema at `path`.
    ///
    /// # Errors
    ///
    /// - [`SchemaLoadError::Read`] if the file cannot be read.
    /// - [`SchemaLoadError::InvalidJson`] if it is not JSON.
    /// - [`SchemaLoadError::InvalidSchema`] if it cannot be compiled.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SchemaLoadError> {
        let path = path.as_ref().to_path_buf();

        let content = std::fs::read_to_string(&path).map_err(|source| SchemaLoadError::Read {
            path: path.clone(),
            source,
        })?;

        let value: Value = serde_json::from_str(&content).map_err(|e| {
            let (column, _) = char_position(&content, e.line(), e.column());
            SchemaLoadError::InvalidJson {
                path: path.clone(),
                reason: strip_location(&e),
                line: e.line(),
                column,
            }
        })?;

        Self::from_value(path, value)
    }

    /// Compile an already-parsed schema value.
    ///
    /// `path` names the document in error messages and anchors relative
    /// `$ref` resolution; it does not have to exist when the schema has no
    /// external references.
    pub fn from_value(path: impl Into<PathBuf>, value: Value) -> Result<Self, SchemaLoadError> {
        let path = path.into();
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let validator = jsonschema::options()
            .with_retriever(LocalSchemaRetriever { base_dir })
            .build(&value)
            .map_err(|e| SchemaLoadError::InvalidSchema {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            path,
            value,
            validator,
        })
    }

    /// Path the schema was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The raw schema document.
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub(crate) fn validator(&self) -> &Validator {
        &self.validator
    }
}
