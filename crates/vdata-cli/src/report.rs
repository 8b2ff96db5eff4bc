//! # Reporter
//!
//! Prints the human-readable run report, emits CI annotations when enabled,
//! and owns the pass/fail counters.
//!
//! Output shape:
//!
//! ```text
//! Validating 3 file(s) against schemas/product.schema.json
//! data/free.json
//!     SchemaViolationError: /price: "free" is not of type "number"
//!
//! 2 file(s) passed; 1 file(s) failed
//! ```

use std::fmt;
use std::io::{self, Write};
use std::path::Path;

use vdata_schema::ValidationOutcome;

use crate::annotate::Annotation;
use crate::config::RunConfig;

/// Pass/fail counts accumulated across one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Files that conformed to the schema.
    pub passed: usize,
    /// Files that failed for any reason.
    pub failed: usize,
}

impl RunSummary {
    /// Process exit code: 0 when every file passed, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.failed == 0 {
            0
        } else {
            1
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} file(s) passed; {} file(s) failed",
            self.passed, self.failed
        )
    }
}

/// Writes the run report to `out`.
pub struct Reporter<W: Write> {
    out: W,
    annotations: bool,
    summary: RunSummary,
}

impl<W: Write> Reporter<W> {
    /// Create a reporter writing to `out`.
    pub fn new(out: W, config: &RunConfig) -> Self {
        Self {
            out,
            annotations: config.annotations,
            summary: RunSummary::default(),
        }
    }

    /// Print the header announcing how many files will be validated.
    pub fn header(&mut self, total: usize, schema: &Path) -> io::Result<()> {
        writeln!(
            self.out,
            "Validating {total} file(s) against {}",
            schema.display()
        )
    }

    /// Record one file's outcome, printing details for failures.
    pub fn record(&mut self, path: &Path, outcome: &ValidationOutcome) -> io::Result<()> {
        match outcome {
            Ok(()) => {
                self.summary.passed += 1;
                tracing::debug!(file = %path.display(), "passed");
            }
            Err(err) => {
                self.summary.failed += 1;
                tracing::debug!(file = %path.display(), kind = %err.kind(), "failed");

                writeln!(self.out, "{}", path.display())?;
                for message in err.messages() {
                    writeln!(self.out, "    {}: {message}", err.kind())?;
                }
                writeln!(self.out)?;

                if self.annotations {
                    writeln!(self.out, "{}", Annotation::for_failure(path, err))?;
                }
            }
        }
        Ok(())
    }

    /// Print the summary line and return the final counts.
    pub fn finish(mut self) -> io::Result<RunSummary> {
        writeln!(self.out, "{}", self.summary)?;
        self.out.flush()?;
        Ok(self.summary)
    }
}
