//! Semantic types and their per-type property payloads.
//!
//! `SchemaProperties` is a closed sum keyed by `SemanticType`; consumers
//! pattern-match it exhaustively. Formatting values are tri-state where the
//! schema is (`Option<bool>`): an absent toggle stays absent, it is never
//! defaulted to `false`.

use serde::Serialize;

use crate::common::color::ColorDefinition;
use crate::common::unit::Measurement;

/// Normalized element tag used for dispatch, replacing raw schema tag names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SemanticType {
    Paragraph,
    TextRun,
    Table,
    TableRow,
    TableCell,
    List,
    ListItem,
    Hyperlink,
    Drawing,
    BookmarkStart,
    BookmarkEnd,
    CommentReference,
    FootnoteReference,
    EndnoteReference,
    Break,
}

impl SemanticType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::TextRun => "textRun",
            Self::Table => "table",
            Self::TableRow => "tableRow",
            Self::TableCell => "tableCell",
            Self::List => "list",
            Self::ListItem => "listItem",
            Self::Hyperlink => "hyperlink",
            Self::Drawing => "drawing",
            Self::BookmarkStart => "bookmarkStart",
            Self::BookmarkEnd => "bookmarkEnd",
            Self::CommentReference => "commentReference",
            Self::FootnoteReference => "footnoteReference",
            Self::EndnoteReference => "endnoteReference",
            Self::Break => "break",
        }
    }

    /// Whether this type is valid directly under the document root.
    pub fn is_block(&self) -> bool {
        matches!(self, Self::Paragraph | Self::Table | Self::List)
    }

    /// Whether elements of this type hold text leaves directly.
    pub fn allows_text(&self) -> bool {
        matches!(self, Self::TextRun)
    }

    /// Content model: which element types are valid children of this one.
    pub fn allows_child(&self, child: SemanticType) -> bool {
        use SemanticType::*;
        match self {
            Paragraph => matches!(
                child,
                TextRun
                    | Hyperlink
                    | Drawing
                    | BookmarkStart
                    | BookmarkEnd
                    | CommentReference
                    | FootnoteReference
                    | EndnoteReference
                    | Break
            ),
            Table => matches!(child, TableRow),
            TableRow => matches!(child, TableCell),
            TableCell => matches!(child, Paragraph | Table | List),
            List => matches!(child, ListItem),
            ListItem => matches!(child, Paragraph | List),
            Hyperlink => matches!(child, TextRun),
            TextRun | Drawing | BookmarkStart | BookmarkEnd | CommentReference
            | FootnoteReference | EndnoteReference | Break => false,
        }
    }
}

/// Closed per-type property payload.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SchemaProperties {
    Paragraph(ParagraphFormatting),
    TextRun(FontProperties),
    Table(WmlTableProperties),
    TableRow(TableRowProperties),
    TableCell(TableCellProperties),
    List(ListProperties),
    ListItem(ListItemProperties),
    Hyperlink(HyperlinkProperties),
    Drawing(DrawingProperties),
    BookmarkStart(ReferenceProperties),
    BookmarkEnd(ReferenceProperties),
    CommentReference(ReferenceProperties),
    FootnoteReference(ReferenceProperties),
    EndnoteReference(ReferenceProperties),
    Break(BreakKind),
}

impl SchemaProperties {
    /// Whether this payload variant belongs to the given semantic type.
    pub fn matches(&self, ty: SemanticType) -> bool {
        matches!(
            (self, ty),
            (Self::Paragraph(_), SemanticType::Paragraph)
                | (Self::TextRun(_), SemanticType::TextRun)
                | (Self::Table(_), SemanticType::Table)
                | (Self::TableRow(_), SemanticType::TableRow)
                | (Self::TableCell(_), SemanticType::TableCell)
                | (Self::List(_), SemanticType::List)
                | (Self::ListItem(_), SemanticType::ListItem)
                | (Self::Hyperlink(_), SemanticType::Hyperlink)
                | (Self::Drawing(_), SemanticType::Drawing)
                | (Self::BookmarkStart(_), SemanticType::BookmarkStart)
                | (Self::BookmarkEnd(_), SemanticType::BookmarkEnd)
                | (Self::CommentReference(_), SemanticType::CommentReference)
                | (Self::FootnoteReference(_), SemanticType::FootnoteReference)
                | (Self::EndnoteReference(_), SemanticType::EndnoteReference)
                | (Self::Break(_), SemanticType::Break)
        )
    }

    pub(crate) fn variant_name(&self) -> &'static str {
        match self {
            Self::Paragraph(_) => "paragraph",
            Self::TextRun(_) => "textRun",
            Self::Table(_) => "table",
            Self::TableRow(_) => "tableRow",
            Self::TableCell(_) => "tableCell",
            Self::List(_) => "list",
            Self::ListItem(_) => "listItem",
            Self::Hyperlink(_) => "hyperlink",
            Self::Drawing(_) => "drawing",
            Self::BookmarkStart(_) => "bookmarkStart",
            Self::BookmarkEnd(_) => "bookmarkEnd",
            Self::CommentReference(_) => "commentReference",
            Self::FootnoteReference(_) => "footnoteReference",
            Self::EndnoteReference(_) => "endnoteReference",
            Self::Break(_) => "break",
        }
    }
}

/// Paragraph alignment, normalized across schema spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
    Distribute,
}

impl Alignment {
    /// Parse a `w:jc` value. `start`/`end` and `both` map to their
    /// left/right/justify equivalents.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "left" | "start" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" | "end" => Some(Self::Right),
            "both" | "justify" => Some(Self::Justify),
            "distribute" => Some(Self::Distribute),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Justify => "both",
            Self::Distribute => "distribute",
        }
    }
}

/// Tab stop alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TabAlignment {
    Left,
    Center,
    Right,
    Decimal,
    Bar,
}

impl TabAlignment {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "left" | "start" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" | "end" => Some(Self::Right),
            "decimal" => Some(Self::Decimal),
            "bar" => Some(Self::Bar),
            _ => None,
        }
    }
}

/// A single tab stop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TabStop {
    pub position: Measurement,
    pub alignment: TabAlignment,
}

/// Paragraph indentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Indentation {
    pub left: Option<Measurement>,
    pub right: Option<Measurement>,
    pub first_line: Option<Measurement>,
    pub hanging: Option<Measurement>,
}

/// Paragraph spacing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Spacing {
    pub before: Option<Measurement>,
    pub after: Option<Measurement>,
    /// Line spacing in 240ths of a line.
    pub line: Option<f64>,
}

/// Numbering reference resolved eagerly at parse time; consumers never
/// re-resolve through the shared stores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedNumbering {
    pub num_id: u32,
    pub level: u8,
    /// Number format of the resolved level (e.g. "decimal", "bullet").
    pub format: Option<String>,
    /// Level text pattern (e.g. "%1.").
    pub level_text: Option<String>,
    pub indent_left: Option<Measurement>,
}

/// Per-paragraph formatting payload.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParagraphFormatting {
    pub alignment: Option<Alignment>,
    /// Outline level 0..=8; maps to a heading level in generated output.
    pub outline_level: Option<u8>,
    /// Horizontal-rule paragraph.
    pub thematic_break: bool,
    pub style_id: Option<String>,
    pub numbering: Option<ResolvedNumbering>,
    pub indent: Option<Indentation>,
    pub spacing: Option<Spacing>,
    pub tab_stops: Vec<TabStop>,
}

/// Run-level vertical alignment (super/subscript).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum VerticalAlignment {
    Superscript,
    Subscript,
}

/// Font family set for a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FontSet {
    pub ascii: Option<String>,
    pub east_asia: Option<String>,
    pub h_ansi: Option<String>,
    pub cs: Option<String>,
}

/// Provenance of a PDF-extracted item: the raw placement transform and the
/// source font name. Diagnostics and tests only; the DOCX generator never
/// reads it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PdfSourceInfo {
    pub transform: [f64; 6],
    pub width: f64,
    pub height: f64,
    pub font_name: String,
}

/// Per-run character formatting payload.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FontProperties {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub strike: Option<bool>,
    pub underline: Option<String>,
    /// Font size in points.
    pub size: Option<f64>,
    pub color: Option<ColorDefinition>,
    pub fonts: Option<FontSet>,
    pub vertical_alignment: Option<VerticalAlignment>,
    pub monospace: bool,
    pub pdf_source: Option<PdfSourceInfo>,
}

/// Border line style keywords used by WML table borders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BorderStyle {
    None,
    Single,
    Thick,
    Double,
    Dotted,
    Dashed,
}

/// One border edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BorderLine {
    pub style: BorderStyle,
    /// Width in eighths of a point, as the schema stores it.
    pub size: Option<u32>,
    pub color: Option<ColorDefinition>,
}

/// Table-level properties.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WmlTableProperties {
    /// Grid column widths collected from `w:tblGrid`, authoritative for
    /// column count.
    pub grid_columns: Vec<Measurement>,
    pub width: Option<Measurement>,
    pub borders: Option<BorderLine>,
    pub style_id: Option<String>,
}

/// Row-level properties.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TableRowProperties {
    pub height: Option<Measurement>,
    /// Repeat as header row on each page.
    pub header: bool,
}

/// Vertical merge state, carried verbatim from parse; merge collapsing is a
/// generator/view concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum VMergeState {
    Restart,
    Continue,
}

/// Cell vertical alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CellVerticalAlign {
    Top,
    Center,
    Bottom,
}

impl CellVerticalAlign {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "top" => Some(Self::Top),
            "center" => Some(Self::Center),
            "bottom" => Some(Self::Bottom),
            _ => None,
        }
    }
}

/// Cell-level properties.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TableCellProperties {
    pub grid_span: Option<u32>,
    pub v_merge: Option<VMergeState>,
    pub width: Option<Measurement>,
    pub vertical_align: Option<CellVerticalAlign>,
}

/// Bullet or ordered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ListKind {
    Bullet,
    Number,
}

/// List container properties.
#[derive(Debug, Clone, Serialize)]
pub struct ListProperties {
    pub kind: ListKind,
    /// Numbering instance backing this list, when known.
    pub num_id: Option<u32>,
}

/// List item properties.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListItemProperties {
    pub level: u8,
}

/// Hyperlink payload: external links carry a resolved URL, internal
/// bookmark links carry only the anchor.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HyperlinkProperties {
    pub url: Option<String>,
    pub anchor: Option<String>,
    pub tooltip: Option<String>,
}

/// Drawing/image placeholder payload.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DrawingProperties {
    /// Relationship id of the image part, or a synthetic id for
    /// PDF-extracted placements (`pdfImage_<page>_<objRef>`).
    pub rel_id: Option<String>,
    /// Remote or data URL to resolve at generation time.
    pub url: Option<String>,
    pub alt: Option<String>,
    pub width: Option<Measurement>,
    pub height: Option<Measurement>,
    /// Placement origin in source user space (PDF only).
    pub position: Option<(f64, f64)>,
    pub pdf_source: Option<PdfSourceInfo>,
}

/// Id-carrying reference payloads (bookmarks, comments, notes). The
/// definition lives in the shared stores; the body element stores only ids.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReferenceProperties {
    pub id: String,
    pub name: Option<String>,
}

/// Run break kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BreakKind {
    Line,
    Page,
    Column,
}
