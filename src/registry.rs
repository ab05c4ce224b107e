//! Explicit front-end registry.
//!
//! One [`Registry`] value maps each [`SourceFormat`] to its parser entry
//! point and carries per-format options. It is constructed once and passed
//! by reference; there is no global registration and no import-order
//! dependence.

use crate::ast::RootNode;
use crate::common::error::Diagnostics;
use crate::generate::{DocxDocument, generate_docx};
use crate::pdf::{ExtractOptions, PageContent, extract_document};

/// Supported source formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    Docx,
    Pdf,
    Markdown,
}

/// Parser input, matched to its format.
#[derive(Debug)]
pub enum SourceInput<'a> {
    /// DOCX archive bytes.
    Docx(&'a [u8]),
    /// Decoded PDF pages from the external content-stream decoder.
    Pdf(&'a [PageContent]),
    /// Markdown text.
    Markdown(&'a str),
}

impl SourceInput<'_> {
    pub fn format(&self) -> SourceFormat {
        match self {
            Self::Docx(_) => SourceFormat::Docx,
            Self::Pdf(_) => SourceFormat::Pdf,
            Self::Markdown(_) => SourceFormat::Markdown,
        }
    }
}

/// Front-end dispatch table plus per-format options.
#[derive(Debug, Default)]
pub struct Registry {
    pdf_options: ExtractOptions,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with non-default PDF extraction heuristics.
    pub fn with_pdf_options(pdf_options: ExtractOptions) -> Self {
        Self { pdf_options }
    }

    #[inline]
    pub fn pdf_options(&self) -> &ExtractOptions {
        &self.pdf_options
    }

    /// Parse any supported input into a semantic root.
    ///
    /// Never fails: fatal conditions surface as an empty root plus one
    /// fatal diagnostic on `diags`.
    pub fn parse(&self, input: SourceInput<'_>, diags: &mut Diagnostics) -> RootNode {
        match input {
            SourceInput::Docx(bytes) => crate::ooxml::parse_bytes(bytes, diags),
            SourceInput::Pdf(pages) => extract_document(pages, &self.pdf_options, diags),
            SourceInput::Markdown(text) => crate::markdown::parse_markdown(text, diags),
        }
    }

    /// Generate the DOCX output model from a semantic root.
    pub async fn generate(&self, root: &RootNode, diags: &mut Diagnostics) -> DocxDocument {
        generate_docx(root, diags).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::SemanticType;
    use crate::generate::BodyContent;
    use std::collections::HashMap;

    #[test]
    fn test_dispatch_by_input() {
        let registry = Registry::new();
        let mut diags = Diagnostics::new();

        let root = registry.parse(SourceInput::Markdown("hello *there*\n"), &mut diags);
        assert_eq!(root.count_children(SemanticType::Paragraph), 1);
        assert_eq!(SourceInput::Markdown("x").format(), SourceFormat::Markdown);

        // Corrupt archive degrades, it does not unwind.
        let root = registry.parse(SourceInput::Docx(b"not a zip"), &mut diags);
        assert!(root.children.is_empty());
        assert_eq!(diags.fatal_count(), 1);
    }

    #[tokio::test]
    async fn test_docx_paragraph_count_round_trip() {
        let document = br#"<w:document><w:body>
  <w:p><w:r><w:t>one</w:t></w:r></w:p>
  <w:p><w:r><w:t>two</w:t></w:r></w:p>
  <w:p><w:r><w:t>three</w:t></w:r></w:p>
</w:body></w:document>"#;
        let mut parts = HashMap::new();
        parts.insert("word/document.xml".to_string(), document.to_vec());
        let pkg = crate::ooxml::DocxPackage::from_parts(parts).unwrap();

        let registry = Registry::new();
        let mut diags = Diagnostics::new();
        let root = crate::ooxml::parse_package(&pkg, &mut diags);
        assert_eq!(root.count_children(SemanticType::Paragraph), 3);

        let doc = registry.generate(&root, &mut diags).await;
        let generated = doc
            .body
            .iter()
            .filter(|c| matches!(c, BodyContent::Paragraph(_)))
            .count();
        // Structural count survives the round trip.
        assert_eq!(generated, 3);
        assert!(!diags.has_fatal());
    }

    #[tokio::test]
    async fn test_markdown_to_docx_pipeline() {
        let registry = Registry::new();
        let mut diags = Diagnostics::new();
        let root = registry.parse(
            SourceInput::Markdown("# Title\n\n- a\n- b\n"),
            &mut diags,
        );
        let doc = registry.generate(&root, &mut diags).await;

        assert_eq!(doc.body.len(), 3);
        assert_eq!(doc.numbering.len(), 1);
        let BodyContent::Paragraph(heading) = &doc.body[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(heading.heading_level, Some(0));
    }
}
