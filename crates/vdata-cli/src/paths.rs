//! # Path Expansion
//!
//! Resolves command-line file and directory arguments into the flat list
//! of `.json` files to validate.
//!
//! Named files must end in `.json`. Directories are walked recursively and
//! contribute every `.json` file beneath them, sorted by file name within
//! each directory. Anything else aborts the run.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

/// Suffix a file must carry to be validated.
pub const JSON_SUFFIX: &str = ".json";

/// Fatal error while expanding input paths.
#[derive(Error, Debug)]
pub enum PathExpansionError {
    /// No input paths were given.
    #[error("no input paths given")]
    NoPaths,

    /// The path is neither a `.json` file nor a directory.
    #[error("Could not find file or directory at path: {}", .path.display())]
    NotFound {
        /// The offending argument.
        path: PathBuf,
    },

    /// A directory could not be traversed.
    #[error("cannot walk directory '{}': {source}", .root.display())]
    Walk {
        /// The directory argument being walked.
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Expand `paths` into `.json` files, preserving argument order.
///
/// A file reached more than once (named twice, or named and also found
/// under a named directory) is listed only at its first position.
///
/// # Errors
///
/// Fails on the first argument that is neither a `.json` file nor a
/// directory, or on a directory that cannot be read.
pub fn expand_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>, PathExpansionError> {
    if paths.is_empty() {
        return Err(PathExpansionError::NoPaths);
    }

    let mut files = Vec::new();
    let mut seen = HashSet::new();

    for path in paths {
        if path.is_file() && is_json_file(path) {
            push_unique(path.clone(), &mut files, &mut seen);
        } else if path.is_dir() {
            let before = files.len();
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry.map_err(|source| PathExpansionError::Walk {
                    root: path.clone(),
                    source,
                })?;
                // Symlinked files count; symlinked directories are not followed.
                if !entry.file_type().is_dir() && entry.path().is_file() && is_json_file(entry.path())
                {
                    push_unique(entry.into_path(), &mut files, &mut seen);
                }
            }
            tracing::debug!(
                dir = %path.display(),
                found = files.len() - before,
                "expanded directory"
            );
        } else {
            return Err(PathExpansionError::NotFound { path: path.clone() });
        }
    }

    Ok(files)
}

/// Whether the file name ends in `.json`.
pub fn is_json_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(JSON_SUFFIX))
}

fn push_unique(path: PathBuf, files: &mut Vec<PathBuf>, seen: &mut HashSet<PathBuf>) {
    let key = std::fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
    if seen.insert(key) {
        files.push(path);
    }
}
