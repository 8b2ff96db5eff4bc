//! Run configuration.
//!
//! Resolved once at startup from command-line flags and the environment.
//! CI detection follows GitHub Actions, which sets `GITHUB_ACTIONS=true` in
//! every job step.

use clap::ValueEnum;

/// Environment variable that marks a GitHub Actions runner.
pub const CI_ENV_VAR: &str = "GITHUB_ACTIONS";

/// When to emit `::error` annotation lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum AnnotationMode {
    /// Only when running inside a detected CI environment.
    #[default]
    Auto,
    /// Always, regardless of environment.
    Always,
    /// Never.
    Never,
}

/// Settings that shape a single run's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunConfig {
    /// Emit machine-readable CI annotations alongside the human report.
    pub annotations: bool,
}

impl RunConfig {
    /// Resolve the configuration from the process environment.
    ///
    /// Variables:
    /// - `GITHUB_ACTIONS`: `true` enables annotations under [`AnnotationMode::Auto`].
    pub fn from_env(mode: AnnotationMode) -> Self {
        let ci = std::env::var(CI_ENV_VAR).ok();
        Self::resolve(mode, ci.as_deref())
    }

    /// Resolve the configuration from an explicit CI variable value.
    pub fn resolve(mode: AnnotationMode, ci_value: Option<&str>) -> Self {
        let annotations = match mode {
            AnnotationMode::Always => true,
            AnnotationMode::Never => false,
            AnnotationMode::Auto => is_ci(ci_value),
        };
        Self { annotations }
    }
}

/// Whether a `GITHUB_ACTIONS` value indicates a CI runner.
fn is_ci(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}
