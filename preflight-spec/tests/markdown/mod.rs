//! Markdown format tests
//!
//! Tests for reading and writing the Preflight Markdown dialect.

mod directives;
mod errors;
mod export;
mod import;
mod round_trip;
