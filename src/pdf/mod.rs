//! PDF content-stream extraction engine.
//!
//! The low-level PDF tokenizer is an external collaborator: it hands this
//! module per-page text items, a decoded operator list, link annotations, and
//! the page viewport ([`content::PageContent`]). The engine replays the
//! operator list through an explicit graphics-state stack, positions text and
//! image placements in page user space, associates link annotations, and
//! groups everything into ordered `paragraph` elements.
//!
//! There is deliberately no table detection here: PDF carries no semantic
//! table markup, and the paragraph grouping is a plain Y-gap heuristic.

pub mod content;
pub mod extract;
pub mod graphics;
pub mod group;

pub use content::{Annotation, Operator, PageContent, Rect, TextItem, Viewport};
pub use extract::{ExtractOptions, LinkHitTest, extract_document, extract_loaded, extract_page};
pub use graphics::{GraphicsStack, GraphicsState, cmyk_to_rgb};

/// Diagnostic source label for this engine.
pub(crate) const SOURCE: &str = "pdf";
