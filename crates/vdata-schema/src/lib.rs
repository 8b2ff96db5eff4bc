//! # vdata-schema: Schema Loading & Data Validation
//!
//! Compiles a single JSON Schema document once and checks JSON data files
//! against it.
//!
//! ## Loading (`schema`)
//!
//! [`SchemaDocument::load`] reads a schema file, parses it, checks it
//! against its draft's meta-schema and compiles it with the `jsonschema`
//! crate. Cross-file `$ref`s are resolved from disk next to the schema;
//! nothing is fetched over the network.
//!
//! ## Validation (`validate`)
//!
//! [`SchemaDocument::validate_file`] parses one data file and returns a
//! [`ValidationOutcome`]. Failures are values, not panics:
//!
//! - [`DataFileError::Parse`]: not valid JSON, with 1-indexed line/column.
//! - [`DataFileError::Violations`]: valid JSON that breaks one or more
//!   schema rules, each with its instance and schema JSON Pointers.
//! - [`DataFileError::Io`]: the file could not be read.
//!
//! ## Crate Policy
//!
//! - A compiled [`SchemaDocument`] is never mutated after loading and may
//!   be shared by reference across any number of validations.
//! - Validation holds no state between files.

pub mod schema;
pub mod validate;

pub use schema::{SchemaDocument, SchemaLoadError};
pub use validate::{
    DataFile, DataFileError, FailureKind, ValidationOutcome, ValidationViolations, Violation,
};
