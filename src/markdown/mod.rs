//! Markdown front end.
//!
//! A thin bridge from a CommonMark event stream into the semantic tree; all
//! heavy lifting stays in the shared AST and the generator.

pub mod bridge;

pub use bridge::parse_markdown;

/// Diagnostic source label for this front end.
pub(crate) const SOURCE: &str = "markdown";
