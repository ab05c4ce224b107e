//! Pomelo - a document-interchange engine for Office and PDF content
//!
//! This library parses heterogeneous document containers into one semantic,
//! format-agnostic tree and generates target containers back from it. The
//! tree is the interchange contract: the DOCX parser, the PDF extraction
//! engine, and the Markdown bridge all emit it, and the AST-to-DOCX
//! generator consumes it, so front ends and back ends interoperate without
//! pairwise converters.
//!
//! # Features
//!
//! - **DOCX Parser**: Walk WordprocessingML packages into the semantic tree
//!   with resolved numbering, styles, hyperlinks, and tables
//! - **PDF Extraction**: Replay content-stream operators through a graphics
//!   state machine and group positioned text into paragraphs
//! - **Markdown Bridge**: Map CommonMark events into the same tree
//! - **DOCX Generation**: Produce a native output document model, including
//!   deterministic list numbering and remote image embedding
//!
//! # Example - DOCX to the semantic tree
//!
//! ```no_run
//! use pomelo::common::Diagnostics;
//! use pomelo::{Registry, SourceInput};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("document.docx")?;
//! let registry = Registry::new();
//! let mut diags = Diagnostics::new();
//!
//! let root = registry.parse(SourceInput::Docx(&bytes), &mut diags);
//! for message in diags.messages() {
//!     eprintln!("{}: {}", message.source, message.message);
//! }
//! println!("{}", root.to_interchange_json()?);
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Markdown to the DOCX output model
//!
//! ```
//! use pomelo::common::Diagnostics;
//! use pomelo::{Registry, SourceInput};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let registry = Registry::new();
//! let mut diags = Diagnostics::new();
//! let root = registry.parse(SourceInput::Markdown("# Hello\n"), &mut diags);
//! let document = registry.generate(&root, &mut diags).await;
//! assert_eq!(document.body.len(), 1);
//! # }
//! ```

pub mod ast;
pub mod common;
pub mod generate;
pub mod markdown;
pub mod ooxml;
pub mod pdf;
pub mod registry;

pub use ast::{Node, RootNode, SemanticType};
pub use common::{Diagnostics, Error, Result};
pub use registry::{Registry, SourceFormat, SourceInput};
