//! DOCX structural parser.
//!
//! Walks the decompressed XML parts of a WordprocessingML package, resolves
//! relationships, and emits the semantic tree with resolved numbering, style,
//! hyperlink, and table properties. The ZIP inflate and XML tokenizer layers
//! are external collaborators: this module consumes a part map of
//! decompressed bytes plus parsed `.rels` files.

pub mod metadata;
pub mod notes;
pub mod numbering;
pub mod package;
pub mod parser;
pub mod styles;
pub mod table;
pub mod tags;

pub use package::DocxPackage;
pub use parser::{parse_bytes, parse_package};
pub use tags::semantic_type_for;

/// Diagnostic source label for this parser.
pub(crate) const SOURCE: &str = "ooxml";
