//! Finding and loading spec files on disk

use crate::error::LoadError;
use crate::formats::markdown::parser::parse_spec;
use crate::model::Spec;
use glob::{glob, Pattern};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name suffix that marks a Markdown document as a spec.
pub const DEFAULT_SPEC_SUFFIX: &str = ".spec.md";

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Invalid spec search pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Error scanning for specs: {0}")]
    Glob(#[from] glob::GlobError),
}

/// Every regular file below `root` whose name ends with `suffix`, sorted by
/// path. A root that does not exist has no specs.
pub fn discover_specs(root: &Path, suffix: &str) -> Result<Vec<PathBuf>, DiscoveryError> {
    if !root.is_dir() {
        tracing::debug!(root = %root.display(), "spec root does not exist");
        return Ok(Vec::new());
    }

    let pattern = format!(
        "{}/**/*{}",
        Pattern::escape(&root.to_string_lossy()),
        Pattern::escape(suffix)
    );

    let mut specs = Vec::new();
    for entry in glob(&pattern)? {
        let path = entry?;
        if path.is_file() {
            specs.push(path);
        }
    }
    specs.sort();

    tracing::debug!(root = %root.display(), count = specs.len(), "discovered specs");
    Ok(specs)
}

/// Read and parse one spec file. The file name (not the full path) is used as
/// error context.
pub fn read_spec_file(path: &Path) -> Result<Spec, LoadError> {
    let source = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let filename = path.file_name().map(|name| name.to_string_lossy());
    Ok(parse_spec(&source, filename.as_deref())?)
}
