//! Common types, traits, and utilities shared across the interchange pipeline.
//!
//! This module provides the value types and infrastructure used by every
//! front end (DOCX, PDF, Markdown) and by the DOCX generator: error and
//! diagnostic types, measurement and color values, and the generic XML tree
//! the OOXML parsers walk.

// Submodule declarations
pub mod color;
pub mod error;
pub mod unit;
pub mod xml;

// Re-exports for convenience
pub use color::ColorDefinition;
pub use error::{Diagnostic, Diagnostics, Error, Result, Severity};
pub use unit::{MeasureUnit, Measurement};
pub use xml::{XmlElement, XmlNode};
