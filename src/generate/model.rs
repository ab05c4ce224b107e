//! Native output document model.
//!
//! The generator produces this tree and hands it to an external DOCX
//! serializer; no XML or ZIP bytes are written here. Relationship ids are
//! allocated up front by [`RelIdAllocator`] so every hyperlink and image
//! element already carries the id its serialized form will reference.

use crate::ast::{Alignment, BreakKind, CellVerticalAlign, TabStop, VerticalAlignment};

use super::image::ImageFormat;
use super::numbering::LevelStyle;

/// The complete generated document.
#[derive(Debug, Default)]
pub struct DocxDocument {
    pub body: Vec<BodyContent>,
    pub numbering: Vec<NumberingDefinition>,
    pub relationships: Vec<OutputRelationship>,
}

/// Block-level output content.
#[derive(Debug)]
pub enum BodyContent {
    Paragraph(DocxParagraph),
    Table(DocxTable),
}

/// One numbering definition referenced by generated paragraphs.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberingDefinition {
    pub num_id: u32,
    pub levels: Vec<LevelStyle>,
}

/// Relationship kinds the generator emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputRelKind {
    Hyperlink,
    Image,
}

/// A package relationship the serializer must write alongside the body.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRelationship {
    pub id: String,
    pub kind: OutputRelKind,
    /// External URL for hyperlinks, media part name for images.
    pub target: String,
}

#[derive(Debug, Default)]
pub struct DocxParagraph {
    pub alignment: Option<Alignment>,
    /// Heading level 0..=8; `None` for body text.
    pub heading_level: Option<u8>,
    pub thematic_break: bool,
    pub style_id: Option<String>,
    /// `(numId, level)` pair for list paragraphs.
    pub numbering: Option<(u32, u8)>,
    pub tab_stops: Vec<TabStop>,
    pub children: Vec<RunContent>,
}

/// Run-like output content.
#[derive(Debug)]
pub enum RunContent {
    Run(DocxRun),
    Hyperlink(DocxHyperlink),
    Image(DocxImage),
    Break(BreakKind),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocxRun {
    pub text: String,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub strike: Option<bool>,
    pub underline: Option<String>,
    /// Size in points.
    pub size: Option<f64>,
    /// Six-digit lowercase hex.
    pub color: Option<String>,
    pub monospace: bool,
    pub vertical_alignment: Option<VerticalAlignment>,
    /// Character style id (e.g. `Hyperlink`).
    pub character_style: Option<String>,
}

#[derive(Debug)]
pub struct DocxHyperlink {
    /// Relationship id for external targets.
    pub rel_id: Option<String>,
    /// Bookmark anchor for internal targets.
    pub anchor: Option<String>,
    pub runs: Vec<DocxRun>,
}

#[derive(Debug)]
pub struct DocxImage {
    pub rel_id: String,
    pub format: ImageFormat,
    pub data: Vec<u8>,
    /// Display extent in EMUs, if the source specified one.
    pub width_emu: Option<i64>,
    pub height_emu: Option<i64>,
    pub alt: Option<String>,
}

#[derive(Debug, Default)]
pub struct DocxTable {
    /// Column widths in twentieths of a point; length is the authoritative
    /// column count.
    pub grid_columns: Vec<f64>,
    pub style_id: Option<String>,
    pub rows: Vec<DocxTableRow>,
}

#[derive(Debug, Default)]
pub struct DocxTableRow {
    pub header: bool,
    /// Row height in twentieths of a point.
    pub height: Option<f64>,
    pub cells: Vec<DocxTableCell>,
}

#[derive(Debug, Default)]
pub struct DocxTableCell {
    pub column_span: Option<u32>,
    pub vertical_align: Option<CellVerticalAlign>,
    pub blocks: Vec<BodyContent>,
}

impl DocxTableCell {
    /// The empty padding cell used to widen ragged rows.
    pub fn empty() -> Self {
        Self {
            blocks: vec![BodyContent::Paragraph(DocxParagraph::default())],
            ..Self::default()
        }
    }
}

/// Allocates `rId`-style identifiers and records the relationship each one
/// stands for.
#[derive(Debug, Default)]
pub struct RelIdAllocator {
    next: usize,
    relationships: Vec<OutputRelationship>,
}

impl RelIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hyperlink(&mut self, url: impl Into<String>) -> String {
        self.allocate(OutputRelKind::Hyperlink, url.into())
    }

    pub fn image(&mut self, media_target: impl Into<String>) -> String {
        self.allocate(OutputRelKind::Image, media_target.into())
    }

    fn allocate(&mut self, kind: OutputRelKind, target: String) -> String {
        self.next += 1;
        let id = format!("rId{}", self.next);
        self.relationships.push(OutputRelationship {
            id: id.clone(),
            kind,
            target,
        });
        id
    }

    /// Hand the recorded relationships to the document.
    pub fn into_relationships(self) -> Vec<OutputRelationship> {
        self.relationships
    }
}
