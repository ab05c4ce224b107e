//! Per-run diagnostics list.
//!
//! Parsers and the generator attach non-fatal messages here instead of
//! returning errors for per-item issues: a malformed sub-tree, an unresolved
//! image resource, an unsupported color space. Callers decide whether any
//! message should be promoted to a process failure.
use serde::Serialize;

/// Severity of a recorded diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    /// Degrade-and-continue: a placeholder or empty node was substituted.
    Warning,
    /// Abort-this-document: recorded once when a whole conversion fails.
    Fatal,
}

/// A single recorded message.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Source component that recorded the message (e.g. "ooxml", "pdf").
    pub source: &'static str,
    pub message: String,
}

/// Ordered list of messages for one conversion run.
#[derive(Debug, Default, Serialize)]
pub struct Diagnostics {
    messages: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a degrade-and-continue message.
    pub fn warn(&mut self, source: &'static str, message: impl Into<String>) {
        let message = message.into();
        log::warn!(target: "pomelo", "{source}: {message}");
        self.messages.push(Diagnostic {
            severity: Severity::Warning,
            source,
            message,
        });
    }

    /// Record the single fatal message for an aborted document.
    pub fn fatal(&mut self, source: &'static str, message: impl Into<String>) {
        let message = message.into();
        log::error!(target: "pomelo", "{source}: {message}");
        self.messages.push(Diagnostic {
            severity: Severity::Fatal,
            source,
            message,
        });
    }

    #[inline]
    pub fn messages(&self) -> &[Diagnostic] {
        &self.messages
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether any fatal message was recorded.
    pub fn has_fatal(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.severity == Severity::Fatal)
    }

    /// Count of fatal messages (graceful-degradation contract: exactly one
    /// per aborted document).
    pub fn fatal_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.severity == Severity::Fatal)
            .count()
    }
}
