//! # Data File Validation
//!
//! Parses JSON data files and checks them against a compiled
//! [`SchemaDocument`].
//!
//! Every outcome is an explicit value. A file that cannot be read, does not
//! parse, or breaks the schema yields a [`DataFileError`] which the caller
//! records and moves past; nothing here aborts a run.

use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::schema::SchemaDocument;

/// Result of validating one data file: `Ok(())` is a pass.
pub type ValidationOutcome = Result<(), DataFileError>;

/// Classification of a per-file failure, used as the label in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The file is not valid JSON.
    DataParse,
    /// The file is valid JSON but does not conform to the schema.
    SchemaViolation,
    /// The file could not be read.
    Io,
}

impl FailureKind {
    /// Label printed in front of each failure message.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DataParse => "DataParseError",
            Self::SchemaViolation => "SchemaViolationError",
            Self::Io => "IoError",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single schema violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer to the violating value in the data file.
    pub instance_path: String,
    /// JSON Pointer to the schema keyword that rejected it.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// Every violation a rejected document produced, in validator order.
///
/// Only built from a non-empty list, so a value of this type always means
/// the document failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationViolations(Vec<Violation>);

impl ValidationViolations {
    pub fn as_slice(&self) -> &[Violation] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a ValidationViolations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        for violation in self {
            write!(f, "{sep}{violation}")?;
            sep = "\n";
        }
        Ok(())
    }
}

/// Per-file validation failure.
#[derive(Error, Debug)]
pub enum DataFileError {
    /// The file could not be read (missing, permissions, not UTF-8).
    #[error("cannot read '{}': {source}", .path.display())]
    Io {
        /// Path to the data file.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON.
    #[error("{reason}: line {line} column {column} (char {offset})")]
    Parse {
        /// Path to the data file.
        path: PathBuf,
        /// Parser message without its location suffix.
        reason: String,
        /// 1-indexed line of the syntax error.
        line: usize,
        /// 1-indexed column of the syntax error.
        column: usize,
        /// 0-indexed character offset of the syntax error.
        offset: usize,
    },

    /// The document does not conform to the schema.
    #[error("{violations}")]
    Violations {
        /// Path to the data file.
        path: PathBuf,
        /// Every violation found, in validator order.
        violations: ValidationViolations,
    },
}

impl DataFileError {
    /// The report label for this failure.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Io { .. } => FailureKind::Io,
            Self::Parse { .. } => FailureKind::DataParse,
            Self::Violations { .. } => FailureKind::SchemaViolation,
        }
    }

    /// Path of the file that failed.
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. } | Self::Parse { path, .. } | Self::Violations { path, .. } => {
                path
            }
        }
    }

    /// `(line, column)` of a parse error; `None` for other failures.
    pub fn location(&self) -> Option<(usize, usize)> {
        match self {
            Self::Parse { line, column, .. } => Some((*line, *column)),
            _ => None,
        }
    }

    /// One message per reportable problem: each violation on its own, or
    /// the single error message for parse and I/O failures.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Violations { violations, .. } => {
                violations.into_iter().map(ToString::to_string).collect()
            }
            other => vec![other.to_string()],
        }
    }
}

/// A data file parsed into memory for the duration of one validation.
#[derive(Debug, Clone)]
pub struct DataFile {
    path: PathBuf,
    value: Value,
}

impl DataFile {
    /// Read and parse the JSON file at `path`.
    ///
    /// The file handle is closed before this returns.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataFileError> {
        let path = path.as_ref().to_path_buf();

        let content = std::fs::read_to_string(&path).map_err(|source| DataFileError::Io {
            path: path.clone(),
            source,
        })?;

        let value = serde_json::from_str(&content).map_err(|e| {
            let (column, offset) = char_position(&content, e.line(), e.column());
            DataFileError::Parse {
                path: path.clone(),
                reason: strip_location(&e),
                line: e.line(),
                column,
                offset,
            }
        })?;

        Ok(Self { path, value })
    }

    /// Path the file was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The parsed document.
    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl SchemaDocument {
    /// Check a parsed value against the schema, collecting every violation.
    pub fn validate_value(&self, instance: &Value) -> Result<(), ValidationViolations> {
        let violations: Vec<Violation> = self
            .validator()
            .iter_errors(instance)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationViolations(violations))
        }
    }

    /// Check an already-loaded data file against the schema.
    pub fn validate_data(&self, file: &DataFile) -> ValidationOutcome {
        self.validate_value(file.value())
            .map_err(|violations| DataFileError::Violations {
                path: file.path().to_path_buf(),
                violations,
            })
    }

    /// Read, parse, and validate the data file at `path`.
    ///
    /// Safe to call repeatedly and in any order; no state carries over
    /// between files.
    pub fn validate_file(&self, path: impl AsRef<Path>) -> ValidationOutcome {
        let file = DataFile::load(path)?;
        self.validate_data(&file)
    }
}

/// Render a `serde_json` error without its ` at line L column C` suffix.
pub(crate) fn strip_location(err: &serde_json::Error) -> String {
    let full = err.to_string();
    let suffix = format!(" at line {} column {}", err.line(), err.column());
    match full.strip_suffix(&suffix) {
        Some(reason) => reason.to_string(),
        None => full,
    }
}

/// Convert a `serde_json` error position into a character `(column, offset)`.
///
/// `serde_json` counts columns in bytes and reports column 0 at end of input
/// or right after a newline. The returned column is 1-indexed and the offset
/// 0-indexed, both in characters.
pub(crate) fn char_position(content: &str, line: usize, byte_column: usize) -> (usize, usize) {
    let byte_index = byte_column.saturating_sub(1);
    let mut lines = content.split_inclusive('\n');
    let preceding: usize = lines
        .by_ref()
        .take(line.saturating_sub(1))
        .map(|l| l.chars().count())
        .sum();
    let within = lines.next().map_or(0, |l| {
        l.char_indices().take_while(|&(i, _)| i < byte_index).count()
    });
    (within + 1, preceding + within)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product_schema() -> SchemaDocument {
        SchemaDocument::from_value(
            "product.schema.json",
            json!({
                "type": "object",
                "properties": {
                    "price": {"type": "number"},
                    "name": {"type": "string"}
                }
            }),
        )
        .unwrap()
    }

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn conforming_document_passes() {
        let schema = product_schema();
        schema
            .validate_value(&json!({"name": "widget", "price": 9.99}))
            .unwrap();
    }

    #[test]
    fn wrong_type_reports_instance_path() {
        let schema = product_schema();
        let violations = schema
            .validate_value(&json!({"name": "widget", "price": "free"}))
            .unwrap_err();

        assert_eq!(violations.as_slice().len(), 1);
        let v = &violations.as_slice()[0];
        assert_eq!(v.instance_path, "/price");
        assert_eq!(v.schema_path, "/properties/price/type");
        assert!(v.message.contains("number"), "message: {}", v.message);
    }

    #[test]
    fn every_violation_is_collected() {
        let schema = SchemaDocument::from_value(
            "order.json",
            json!({
                "type": "object",
                "required": ["id"],
                "properties": {
                    "items": {"type": "array", "items": {"type": "integer"}}
                }
            }),
        )
        .unwrap();

        let violations = schema
            .validate_value(&json!({"items": [1, "two", 3.5]}))
            .unwrap_err();
        let paths: Vec<&str> = violations
            .into_iter()
            .map(|v| v.instance_path.as_str())
            .collect();

        assert_eq!(paths.len(), 3, "got: {violations}");
        assert!(paths.contains(&""));
        assert!(paths.contains(&"/items/1"));
        assert!(paths.contains(&"/items/2"));
    }

    #[test]
    fn validate_file_passes_conforming_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "ok.json", r#"{"name":"widget","price":9.99}"#);
        product_schema().validate_file(&path).unwrap();
    }

    #[test]
    fn validate_file_reports_violation_kind() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "bad.json", r#"{"name":"widget","price":"free"}"#);

        let err = product_schema().validate_file(&path).unwrap_err();
        assert_eq!(err.kind(), FailureKind::SchemaViolation);
        assert_eq!(err.kind().as_str(), "SchemaViolationError");
        assert_eq!(err.path(), path.as_path());
        assert_eq!(err.location(), None);
        assert!(err.messages()[0].starts_with("/price: "));
    }

    #[test]
    fn trailing_comma_is_parse_error_with_location() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "comma.json",
            "{\n  \"name\": \"widget\",\n  \"price\": 1,\n}\n",
        );

        let err = product_schema().validate_file(&path).unwrap_err();
        assert_eq!(err.kind(), FailureKind::DataParse);
        let (line, column) = err.location().unwrap();
        assert_eq!(line, 4);
        assert!(column >= 1);
        match &err {
            DataFileError::Parse { reason, .. } => {
                assert!(reason.contains("trailing comma"), "reason: {reason}");
            }
            other => panic!("Expected Parse, got: {other}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = product_schema()
            .validate_file(dir.path().join("gone.json"))
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::Io);
        assert_eq!(err.location(), None);
    }

    #[test]
    fn validation_leaves_schema_untouched() {
        let schema = product_schema();
        let before = schema.value().clone();
        let _ = schema.validate_value(&json!({"price": "free"}));
        let _ = schema.validate_value(&json!({"price": 1}));
        assert_eq!(schema.value(), &before);
    }

    #[test]
    fn strip_location_removes_suffix() {
        let err = serde_json::from_str::<Value>("[1,]").unwrap_err();
        let reason = strip_location(&err);
        assert_eq!(reason, "trailing comma");
    }

    #[test]
    fn char_position_counts_previous_lines() {
        let content = "ab\ncd\nef";
        assert_eq!(char_position(content, 1, 1), (1, 0));
        assert_eq!(char_position(content, 2, 2), (2, 4));
        assert_eq!(char_position(content, 3, 1), (1, 6));
    }

    #[test]
    fn char_position_counts_characters_not_bytes() {
        // "!" sits at byte column 4 of "xé!" but is its third character.
        let content = "é\nxé!";
        assert_eq!(char_position(content, 2, 4), (3, 4));
    }

    #[test]
    fn char_position_clamps_zero_column() {
        assert_eq!(char_position("", 1, 0), (1, 0));
        assert_eq!(char_position("{\"a\": 1\n", 2, 0), (1, 8));
    }

    #[test]
    fn empty_file_reports_first_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "empty.json", "");

        let err = product_schema().validate_file(&path).unwrap_err();
        assert_eq!(err.kind(), FailureKind::DataParse);
        assert_eq!(err.location(), Some((1, 1)));
        assert!(
            err.to_string().ends_with(": line 1 column 1 (char 0)"),
            "got: {err}"
        );
    }

    #[test]
    fn error_after_newline_is_one_indexed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "unterminated.json", "{\"a\": 1\n");

        let err = product_schema().validate_file(&path).unwrap_err();
        assert_eq!(err.location(), Some((2, 1)));
        match err {
            DataFileError::Parse { offset, .. } => assert_eq!(offset, 8),
            other => panic!("Expected Parse, got: {other}"),
        }
    }

    #[test]
    fn non_ascii_parse_error_counts_characters() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "accent.json", "{\"é\": 1,}");

        let err = product_schema().validate_file(&path).unwrap_err();
        assert_eq!(err.location(), Some((1, 9)));
        match err {
            DataFileError::Parse { offset, .. } => assert_eq!(offset, 8),
            other => panic!("Expected Parse, got: {other}"),
        }
    }

    #[test]
    fn violation_display_root() {
        let v = Violation {
            instance_path: String::new(),
            schema_path: "/required".to_string(),
            message: r#""id" is a required property"#.to_string(),
        };
        assert_eq!(v.to_string(), r#"(root): "id" is a required property"#);
    }
}
