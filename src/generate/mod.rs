//! AST-to-DOCX generation.
//!
//! Consumes the semantic tree read-only and produces the native output model
//! handed to an external DOCX serializer. Generation is a single awaited
//! walk: deterministic output order, image fetch as the only suspending
//! operation, and per-subtree degradation instead of aborts.

pub mod context;
pub mod image;
pub mod model;
pub mod numbering;
pub mod walker;

pub use context::WalkContext;
pub use image::ImageFormat;
pub use model::{
    BodyContent, DocxDocument, DocxHyperlink, DocxImage, DocxParagraph, DocxRun, DocxTable,
    DocxTableCell, DocxTableRow, NumberingDefinition, OutputRelKind, OutputRelationship,
    RelIdAllocator, RunContent,
};
pub use numbering::{
    BASE_INDENT, BULLET_SYMBOLS, HANGING_INDENT, INDENT_STEP, LevelStyle, generate_levels,
};
pub use walker::generate_docx;

/// Diagnostic source label for the generator.
pub(crate) const SOURCE: &str = "generate";
