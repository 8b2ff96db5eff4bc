//! # vdata-cli: The `validate_data` Command
//!
//! Validates a set of JSON data files against one JSON Schema and reports
//! pass/fail counts, per-file errors, and optional CI annotations.
//!
//! ```bash
//! validate_data -s schemas/product.schema.json data/ extra/one.json
//! ```
//!
//! ## Pipeline
//!
//! 1. [`paths::expand_paths`] turns file and directory arguments into a flat
//!    list of `.json` files.
//! 2. [`vdata_schema::SchemaDocument::load`] compiles the schema once.
//! 3. Each file is validated; failures are values, never aborts.
//! 4. [`report::Reporter`] prints results, emits [`annotate::Annotation`]s
//!    when enabled, and produces the [`report::RunSummary`] that decides the
//!    exit code.
//!
//! Expansion and schema errors are fatal and stop the run before any file
//! is validated.

pub mod annotate;
pub mod config;
pub mod paths;
pub mod report;
pub mod validate;
