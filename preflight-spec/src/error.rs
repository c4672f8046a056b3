//! Error types for spec reading, format conversion and file loading

use std::path::PathBuf;
use thiserror::Error;

/// What went wrong while reading a spec document.
///
/// Every malformed document maps to exactly one kind. The messages are meant
/// to be shown verbatim to whoever wrote the spec, so they name the construct
/// that is missing and how to add it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("Missing front matter. File must start with --- and include spec-version.")]
    MissingFrontMatter,

    #[error("Missing required field 'spec-version' in front matter.")]
    MissingSpecVersion,

    #[error(
        "Unsupported spec version \"{0}\". This reader supports versions: {supported}",
        supported = crate::model::SUPPORTED_VERSIONS.join(", ")
    )]
    UnsupportedSpecVersion(String),

    #[error("Missing H1 heading. Every spec must have a # heading as the test name.")]
    MissingHeading,

    #[error("Missing required section: ## {0}")]
    MissingSection(String),

    #[error(
        "No stubs found under ## Data Sources. Add at least one ### heading with a source directive."
    )]
    EmptyDataSources,

    #[error(
        "Stub \"{label}\" is missing a source directive (<!-- operation: ... -->). Add an HTML comment after the ### heading."
    )]
    MissingDirective { label: String },

    #[error(
        "Directive is missing required field \"operation\". Expected: <!-- operation: operationName -->"
    )]
    MissingOperationName,

    #[error("Stream-mode stub must have at least one Message block.")]
    EmptyStream,

    #[error("The {field} {problem}, which a Markdown spec cannot hold.")]
    UnwritableText {
        field: &'static str,
        problem: &'static str,
    },
}

/// A failed read, with whatever location context was known at the time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Preflight spec parse error{context}: {kind}",
    context = context_suffix(.filename, .section, .line)
)]
pub struct SpecParseError {
    pub kind: ParseErrorKind,
    pub filename: Option<String>,
    pub section: Option<String>,
    /// 1-based line in the source document, front matter included.
    pub line: Option<usize>,
}

impl SpecParseError {
    pub fn new(kind: ParseErrorKind) -> Self {
        Self {
            kind,
            filename: None,
            section: None,
            line: None,
        }
    }

    pub fn with_filename(mut self, filename: Option<&str>) -> Self {
        self.filename = filename.map(str::to_string);
        self
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// The bare message, without the location prefix.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl From<ParseErrorKind> for SpecParseError {
    fn from(kind: ParseErrorKind) -> Self {
        SpecParseError::new(kind)
    }
}

fn context_suffix(
    filename: &Option<String>,
    section: &Option<String>,
    line: &Option<usize>,
) -> String {
    let mut suffix = String::new();
    if let Some(filename) = filename {
        suffix.push_str(&format!(" in {filename}"));
    }
    if let Some(section) = section {
        suffix.push_str(&format!(" (section: {section})"));
    }
    if let Some(line) = line {
        suffix.push_str(&format!(" at line {line}"));
    }
    suffix
}

/// Errors that can occur during format operations
#[derive(Debug, Error)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),

    /// The document did not describe a valid spec
    #[error(transparent)]
    Parse(#[from] SpecParseError),

    /// JSON input or output failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from reading a spec straight from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Error reading file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] SpecParseError),
}
