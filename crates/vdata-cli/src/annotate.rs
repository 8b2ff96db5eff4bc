//! # CI Annotations
//!
//! GitHub Actions workflow commands of the form
//! `::error file=<path>,line=<l>,col=<c>::<message>`.
//!
//! Values are escaped per the workflow-command rules: `%`, `\r` and `\n`
//! in the message; additionally `:` and `,` in property values.

use std::fmt;
use std::path::{Path, PathBuf};

use vdata_schema::DataFileError;

/// A single `::error` annotation line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// File the annotation points at; omitted for run-level errors.
    pub file: Option<PathBuf>,
    /// 1-indexed line, when known.
    pub line: Option<usize>,
    /// 1-indexed column, when known.
    pub col: Option<usize>,
    /// Text shown in the CI UI. May span several lines.
    pub message: String,
}

impl Annotation {
    /// Annotation for a failed data file. Parse errors carry `line`/`col`;
    /// schema violations are listed one per message line.
    pub fn for_failure(path: &Path, err: &DataFileError) -> Self {
        let (line, col) = match err.location() {
            Some((line, col)) => (Some(line), Some(col)),
            None => (None, None),
        };
        let message = format!("{}: {}", err.kind(), err.messages().join("\n"));
        Self {
            file: Some(path.to_path_buf()),
            line,
            col,
            message,
        }
    }

    /// Annotation for an error that aborted the run.
    pub fn for_fatal(message: impl Into<String>) -> Self {
        Self {
            file: None,
            line: None,
            col: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut properties: Vec<String> = Vec::new();
        if let Some(file) = &self.file {
            properties.push(format!(
                "file={}",
                escape_property(&file.display().to_string())
            ));
        }
        if let Some(line) = self.line {
            properties.push(format!("line={line}"));
        }
        if let Some(col) = self.col {
            properties.push(format!("col={col}"));
        }

        f.write_str("::error")?;
        if !properties.is_empty() {
            write!(f, " {}", properties.join(","))?;
        }
        write!(f, "::{}", escape_data(&self.message))
    }
}

/// Escape a workflow-command message.
pub fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Escape a workflow-command property value.
pub fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;
    use vdata_schema::SchemaDocument;

    #[test]
    fn parse_failure_carries_line_and_col() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("comma.json");
        std::fs::write(&path, "{\"a\": 1,\n}").unwrap();

        let schema = SchemaDocument::from_value("s.json", json!({})).unwrap();
        let err = schema.validate_file(&path).unwrap_err();
        let annotation = Annotation::for_failure(&path, &err);

        assert_eq!(annotation.line, Some(2));
        assert!(annotation.col.is_some());
        let rendered = annotation.to_string();
        assert!(rendered.starts_with("::error file="), "{rendered}");
        assert!(rendered.contains(",line=2,col="), "{rendered}");
        assert!(rendered.contains("::DataParseError: trailing comma"), "{rendered}");
    }

    #[test]
    fn violation_failure_has_no_location() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"price":"free","name":7}"#).unwrap();

        let schema = SchemaDocument::from_value(
            "s.json",
            json!({
                "type": "object",
                "properties": {
                    "price": {"type": "number"},
                    "name": {"type": "string"}
                }
            }),
        )
        .unwrap();
        let err = schema.validate_file(&path).unwrap_err();
        let rendered = Annotation::for_failure(&path, &err).to_string();

        assert!(!rendered.contains("line="), "{rendered}");
        assert!(rendered.contains("::SchemaViolationError: /"), "{rendered}");
        // Two violations, joined by an escaped newline.
        assert!(rendered.contains("%0A/"), "{rendered}");
        assert!(!rendered.contains('\n'));
    }

    #[test]
    fn fatal_annotation_has_no_properties() {
        let rendered = Annotation::for_fatal("schema missing").to_string();
        assert_eq!(rendered, "::error::schema missing");
    }

    #[test]
    fn display_with_all_properties() {
        let annotation = Annotation {
            file: Some(PathBuf::from("data/a,b.json")),
            line: Some(3),
            col: Some(1),
            message: "100% broken".to_string(),
        };
        assert_eq!(
            annotation.to_string(),
            "::error file=data/a%2Cb.json,line=3,col=1::100%25 broken"
        );
    }

    #[test]
    fn escape_property_handles_colons() {
        assert_eq!(escape_property(r"C:\data\x.json"), r"C%3A\data\x.json");
    }

    proptest! {
        /// Escaped output never contains raw line breaks.
        #[test]
        fn escaped_data_is_single_line(value in ".*") {
            let escaped = escape_data(&value);
            prop_assert!(!escaped.contains('\n'));
            prop_assert!(!escaped.contains('\r'));
        }

        /// Escaped properties never contain delimiter characters.
        #[test]
        fn escaped_property_has_no_delimiters(value in ".*") {
            let escaped = escape_property(&value);
            prop_assert!(!escaped.contains(','));
            prop_assert!(!escaped.contains(':'));
        }
    }
}
