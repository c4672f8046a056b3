//! Reader and writer for Preflight test specs
//!
//!     A Preflight spec is a Markdown document describing one integration test: a query,
//!     the stubbed collaborator calls it makes, and the result it must produce. This crate
//!     turns such a document into a [`Spec`] value and back, and offers the checks an
//!     execution engine needs before running one (payload validity, stub selection).
//!
//!     This is a pure lib: it powers the preflight CLI but is shell agnostic. No code here
//!     prints, reads env vars or exits; diagnostics go through `tracing`.
//!
//! Architecture
//!
//!     The Markdown dialect is one [`Format`] among others (JSON is the second), all reachable
//!     through the [`FormatRegistry`] by name or file extension. Reading Markdown is a single
//!     pass over the top level blocks Comrak produces, driven by a small section state machine.
//!     Writing is the canonical layout, so write-then-read gives back an equal spec.
//!
//!     The file structure :
//!     .
//!     ├── error.rs                # ParseErrorKind, SpecParseError, FormatError, LoadError
//!     ├── model.rs                # Spec, Stub, StubPayload, StubMode, ResultFormat
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── formats
//!     │   ├── markdown
//!     │   │   ├── frontmatter.rs  # --- delimited key: value block
//!     │   │   ├── directive.rs    # <!-- key: value, ... --> comments
//!     │   │   ├── blocks.rs       # Comrak AST to located top level blocks
//!     │   │   ├── parser.rs       # Markdown to Spec
//!     │   │   ├── serializer.rs   # Spec to canonical Markdown
//!     │   │   └── mod.rs
//!     │   └── json                # serde rendition of the model
//!     ├── discovery.rs            # *.spec.md lookup and file loading
//!     ├── payload.rs              # JSON validity of fenced payloads
//!     └── stubs.rs                # grouping stubs per operation and picking one per call
//!
//! Testing
//!     tests
//!     ├── lib.rs
//!     ├── markdown
//!     │   ├── <testname>.rs
//!     │   └── snapshots
//!     ├── json
//!     └── fixtures
//!         └── <docname>.spec.md
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include these
//!     in the mod.

pub mod discovery;
pub mod error;
pub mod format;
pub mod formats;
pub mod model;
pub mod payload;
pub mod registry;
pub mod stubs;

pub use discovery::{discover_specs, read_spec_file, DiscoveryError, DEFAULT_SPEC_SUFFIX};
pub use error::{FormatError, LoadError, ParseErrorKind, SpecParseError};
pub use format::Format;
pub use model::{ResultFormat, Spec, Stub, StubMode, StubPayload, SUPPORTED_VERSIONS};
pub use payload::{check_payloads, PayloadIssue, PayloadLocation};
pub use registry::FormatRegistry;
pub use stubs::{CannedResponse, OperationPlan, Parameters, StubPlan, StubPlanError};

/// Read a Markdown spec.
pub fn read_spec(source: &str) -> Result<Spec, SpecParseError> {
    formats::markdown::parser::parse_spec(source, None)
}

/// Read a Markdown spec, naming `filename` in any error.
pub fn read_spec_with_filename(source: &str, filename: &str) -> Result<Spec, SpecParseError> {
    formats::markdown::parser::parse_spec(source, Some(filename))
}

/// Write a spec as canonical Markdown.
pub fn write_spec(spec: &Spec) -> String {
    formats::markdown::serializer::serialize_spec(spec)
}
