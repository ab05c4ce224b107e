//! Unified error types for the interchange engine.
//!
//! This module provides a unified error type that encompasses failures from
//! the OOXML parser, the PDF extraction engine, and the DOCX generator,
//! presenting a consistent API to users, plus the per-run diagnostics list
//! that carries non-fatal degradation messages.

// Submodule declarations
pub mod diagnostics;
pub mod types;

// Re-exports
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use types::{Error, Result};
