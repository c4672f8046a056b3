//! Format implementations
//!
//! Each format converts between [`crate::model::Spec`] and one text
//! representation.

pub mod json;
pub mod markdown;

pub use json::JsonFormat;
pub use markdown::MarkdownFormat;
