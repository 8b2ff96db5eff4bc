//! # Validate Command
//!
//! Drives one run: `Expand → LoadSchema → (Validate × N) → Report`.
//!
//! Path expansion and schema loading are fatal and return `Err` before any
//! output is written. Per-file failures are recorded by the reporter and
//! only influence the exit code.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use vdata_schema::SchemaDocument;

use crate::config::{AnnotationMode, RunConfig};
use crate::paths::expand_paths;
use crate::report::{Reporter, RunSummary};

/// Arguments for `validate_data`.
#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// File or folder paths to the JSON data.
    #[arg(value_name = "PATHS", required = true, num_args = 1..)]
    pub paths: Vec<PathBuf>,

    /// File path to the JSON schema.
    #[arg(short = 's', long, value_name = "PATH")]
    pub schema_path: PathBuf,

    /// When to emit `::error` CI annotations.
    #[arg(long, value_enum, default_value_t = AnnotationMode::Auto)]
    pub annotations: AnnotationMode,
}

/// Execute a validation run, writing the report to `out`.
///
/// Returns exit code: 0 when every file passed, 1 when any file failed.
/// Fatal expansion or schema errors are returned as `Err`.
pub fn run_validate(args: &ValidateArgs, config: &RunConfig, out: impl Write) -> Result<u8> {
    let files = expand_paths(&args.paths).context("failed to expand input paths")?;
    tracing::info!(files = files.len(), "expanded input paths");

    let schema = SchemaDocument::load(&args.schema_path).context("failed to load JSON schema")?;
    tracing::info!(schema = %schema.path().display(), "loaded schema");

    let summary = validate_files(&schema, &files, config, out)?;
    tracing::info!(
        passed = summary.passed,
        failed = summary.failed,
        "validation finished"
    );

    Ok(summary.exit_code())
}

/// Validate `files` against `schema` and report each outcome.
pub fn validate_files(
    schema: &SchemaDocument,
    files: &[PathBuf],
    config: &RunConfig,
    out: impl Write,
) -> Result<RunSummary> {
    let mut reporter = Reporter::new(out, config);
    reporter
        .header(files.len(), schema.path())
        .context("failed to write report")?;

    for path in files {
        let outcome = schema.validate_file(path);
        reporter
            .record(path, &outcome)
            .context("failed to write report")?;
    }

    reporter.finish().context("failed to write report")
}
