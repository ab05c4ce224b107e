//! Unified error types for the interchange engine.
//!
//! Only class-level preconditions surface as `Error`: an unreadable archive,
//! a missing required package part, a PDF page set that failed to load.
//! Per-item problems never unwind past a parser boundary; they are recorded
//! on the run's [`Diagnostics`](super::Diagnostics) list instead.
use thiserror::Error;

/// Main error type for interchange operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid file format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Package part or resource not found
    #[error("Component not found: {0}")]
    ComponentNotFound(String),

    /// XML parsing error
    #[error("XML error: {0}")]
    XmlError(String),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// PDF page set failed to load
    #[error("PDF load error: {0}")]
    PdfLoadError(String),

    /// AST structural violation (invalid child for a semantic type)
    #[error("Invalid AST structure: {0}")]
    InvalidStructure(String),

    /// Unsupported feature
    #[error("Unsupported feature: {0}")]
    Unsupported(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type for interchange operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlError(err.to_string())
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipError(err.to_string())
    }
}
