//! Format trait definition
//!
//! A format is one textual rendition of a [`Spec`]. The Markdown dialect is the
//! authoring format; JSON is the machine-facing one. Both go through the same
//! trait so callers (the CLI, test harnesses) can pick one by name or file
//! extension.

use crate::error::FormatError;
use crate::model::Spec;

/// Trait for spec formats
///
/// # Examples
///
/// ```ignore
/// struct MyFormat;
///
/// impl Format for MyFormat {
///     fn name(&self) -> &str {
///         "my-format"
///     }
///
///     fn parse(&self, source: &str, filename: Option<&str>) -> Result<Spec, FormatError> {
///         todo!()
///     }
///
///     fn serialize(&self, spec: &Spec) -> Result<String, FormatError> {
///         todo!()
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "markdown", "json")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions associated with this format, without the leading dot.
    /// Used for automatic format detection from filenames.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Parse source text into a Spec. `filename` is used for error context only.
    fn parse(&self, source: &str, filename: Option<&str>) -> Result<Spec, FormatError>;

    /// Serialize a Spec into source text
    fn serialize(&self, spec: &Spec) -> Result<String, FormatError>;
}
