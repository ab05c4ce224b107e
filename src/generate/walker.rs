//! Recursive AST-to-DOCX generation.
//!
//! One awaited pass over the semantic tree. The only suspending operation is
//! image byte resolution; everything else is a pure mapping into the output
//! model, appended in source order so generation is deterministic. A
//! malformed subtree is logged and omitted, never an abort.

use std::future::Future;
use std::pin::Pin;

use crate::ast::{
    ElementNode, ListKind, Node, RootNode, SchemaProperties, SemanticType,
};
use crate::common::error::Diagnostics;

use super::SOURCE;
use super::context::WalkContext;
use super::image::{self, ImageFormat};
use super::model::{
    BodyContent, DocxDocument, DocxHyperlink, DocxImage, DocxParagraph, DocxRun, DocxTable,
    DocxTableCell, DocxTableRow, RelIdAllocator, NumberingDefinition, RunContent,
};
use super::numbering::generate_levels;

/// Generate the output document model from a semantic root.
pub async fn generate_docx(root: &RootNode, diags: &mut Diagnostics) -> DocxDocument {
    let mut walker = Walker {
        diags,
        rels: RelIdAllocator::new(),
        numbering: Vec::new(),
        next_synthetic_num: 1,
        next_image: 1,
    };
    let body = walker.convert_blocks(&root.children, WalkContext::new()).await;
    DocxDocument {
        body,
        numbering: walker.numbering,
        relationships: walker.rels.into_relationships(),
    }
}

struct Walker<'a> {
    diags: &'a mut Diagnostics,
    rels: RelIdAllocator,
    numbering: Vec<NumberingDefinition>,
    /// Next numbering id for lists that carry none of their own.
    next_synthetic_num: u32,
    next_image: usize,
}

impl Walker<'_> {
    /// Convert a block sequence. Boxed so cell content and nested lists can
    /// recurse through it.
    fn convert_blocks<'b>(
        &'b mut self,
        nodes: &'b [Node],
        ctx: WalkContext,
    ) -> Pin<Box<dyn Future<Output = Vec<BodyContent>> + 'b>> {
        Box::pin(async move {
            let mut out = Vec::new();
            for node in nodes {
                let Node::Element(el) = node else {
                    continue;
                };
                match el.semantic_type {
                    SemanticType::Paragraph => match self.convert_paragraph(el, ctx).await {
                        Some(p) => out.push(BodyContent::Paragraph(p)),
                        None => {},
                    },
                    SemanticType::Table => {
                        out.push(BodyContent::Table(self.convert_table(el, ctx).await));
                    },
                    SemanticType::List => {
                        self.convert_list(el, ctx, &mut out).await;
                    },
                    other => {
                        self.diags.warn(
                            SOURCE,
                            format!("{} is not a block element, omitted", other.as_str()),
                        );
                    },
                }
            }
            out
        })
    }

    /// Flatten a list: each item's paragraphs become numbered paragraphs at
    /// the extended context level.
    async fn convert_list(&mut self, el: &ElementNode, ctx: WalkContext, out: &mut Vec<BodyContent>) {
        let SchemaProperties::List(props) = &el.properties else {
            return;
        };
        // A nested list without its own instance continues the outer one.
        let num_id = props
            .num_id
            .or(ctx.list_reference)
            .unwrap_or_else(|| self.allocate_num_id());
        self.ensure_numbering(num_id, props.kind);

        let child_ctx = ctx.enter_list(num_id);
        for item in el.children_of(SemanticType::ListItem) {
            let blocks = self.convert_blocks(item.children(), child_ctx).await;
            out.extend(blocks);
        }
    }

    async fn convert_paragraph(&mut self, el: &ElementNode, ctx: WalkContext) -> Option<DocxParagraph> {
        let SchemaProperties::Paragraph(fmt) = &el.properties else {
            self.diags
                .warn(SOURCE, "paragraph without paragraph payload, omitted");
            return None;
        };

        let mut para = DocxParagraph {
            alignment: fmt.alignment,
            heading_level: fmt.outline_level.filter(|l| *l <= 8),
            thematic_break: fmt.thematic_break,
            style_id: fmt.style_id.clone(),
            tab_stops: fmt.tab_stops.clone(),
            numbering: None,
            children: Vec::new(),
        };
        para.numbering = match &fmt.numbering {
            Some(resolved) => {
                let kind = if resolved.format.as_deref() == Some("bullet") {
                    ListKind::Bullet
                } else {
                    ListKind::Number
                };
                self.ensure_numbering(resolved.num_id, kind);
                Some((resolved.num_id, resolved.level))
            },
            None => ctx.list_reference.zip(ctx.list_level),
        };

        for child in el.children() {
            let Node::Element(inline) = child else {
                continue;
            };
            match (&inline.semantic_type, &inline.properties) {
                (SemanticType::TextRun, SchemaProperties::TextRun(font)) => {
                    para.children
                        .push(RunContent::Run(styled_run(inline, font, None)));
                },
                (SemanticType::Hyperlink, SchemaProperties::Hyperlink(link)) => {
                    let rel_id = link.url.as_ref().map(|url| self.rels.hyperlink(url));
                    let runs = inline
                        .children_of(SemanticType::TextRun)
                        .filter_map(|run| match &run.properties {
                            SchemaProperties::TextRun(font) => {
                                Some(styled_run(run, font, Some("Hyperlink")))
                            },
                            _ => None,
                        })
                        .collect();
                    para.children.push(RunContent::Hyperlink(DocxHyperlink {
                        rel_id,
                        anchor: link.anchor.clone(),
                        runs,
                    }));
                },
                (SemanticType::Drawing, SchemaProperties::Drawing(_)) => {
                    let content = self.convert_drawing(inline).await;
                    para.children.push(content);
                },
                (SemanticType::Break, SchemaProperties::Break(kind)) => {
                    para.children.push(RunContent::Break(*kind));
                },
                // Bookmark and note markers carry no rendered content.
                _ => {},
            }
        }
        Some(para)
    }

    /// Resolve a drawing to an embedded image, or degrade to a literal
    /// placeholder run.
    async fn convert_drawing(&mut self, el: &ElementNode) -> RunContent {
        let SchemaProperties::Drawing(props) = &el.properties else {
            return placeholder_run("unresolved image");
        };
        let alt = props.alt.as_deref();

        let Some(url) = props.url.as_deref() else {
            // No fetchable source (e.g. a placement extracted from a PDF).
            self.diags.warn(
                SOURCE,
                format!(
                    "image without fetchable source ({}), placeholder emitted",
                    props.rel_id.as_deref().unwrap_or("no id")
                ),
            );
            return placeholder_run(alt.unwrap_or("unresolved image"));
        };

        let bytes = match image::resolve_bytes(url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                self.diags
                    .warn(SOURCE, format!("image fetch failed for {url}: {e}"));
                return placeholder_run(alt.unwrap_or(&e.to_string()));
            },
        };
        let Some(format) = ImageFormat::detect_from_bytes(&bytes) else {
            self.diags
                .warn(SOURCE, format!("unsupported image format at {url}"));
            return placeholder_run(alt.unwrap_or("unsupported image format"));
        };

        let target = format!("media/image{}.{}", self.next_image, format.extension());
        self.next_image += 1;
        let rel_id = self.rels.image(target);
        RunContent::Image(DocxImage {
            rel_id,
            format,
            data: bytes,
            width_emu: props.width.map(|m| m.to_emu()),
            height_emu: props.height.map(|m| m.to_emu()),
            alt: props.alt.clone(),
        })
    }

    async fn convert_table(&mut self, el: &ElementNode, ctx: WalkContext) -> DocxTable {
        let mut table = DocxTable::default();
        if let SchemaProperties::Table(props) = &el.properties {
            table.grid_columns = props
                .grid_columns
                .iter()
                .map(|m| m.to_twips() as f64)
                .collect();
            table.style_id = props.style_id.clone();
        }

        // The grid is authoritative; without one, the widest row decides.
        let column_count = if table.grid_columns.is_empty() {
            el.children_of(SemanticType::TableRow)
                .map(|row| row.children_of(SemanticType::TableCell).count())
                .max()
                .unwrap_or(0)
        } else {
            table.grid_columns.len()
        };

        for row_el in el.children_of(SemanticType::TableRow) {
            let mut row = DocxTableRow::default();
            if let SchemaProperties::TableRow(props) = &row_el.properties {
                row.header = props.header;
                row.height = props.height.map(|m| m.to_twips() as f64);
            }
            for cell_el in row_el.children_of(SemanticType::TableCell) {
                let mut cell = DocxTableCell::default();
                if let SchemaProperties::TableCell(props) = &cell_el.properties {
                    cell.column_span = props.grid_span;
                    cell.vertical_align = props.vertical_align;
                }
                cell.blocks = self.convert_blocks(cell_el.children(), ctx).await;
                row.cells.push(cell);
            }
            // Ragged rows are widened with empty cells, never truncated.
            while row.cells.len() < column_count {
                row.cells.push(DocxTableCell::empty());
            }
            table.rows.push(row);
        }
        table
    }

    fn allocate_num_id(&mut self) -> u32 {
        let id = self.next_synthetic_num;
        self.next_synthetic_num += 1;
        id
    }

    fn ensure_numbering(&mut self, num_id: u32, kind: ListKind) {
        if self.numbering.iter().any(|n| n.num_id == num_id) {
            return;
        }
        if num_id >= self.next_synthetic_num {
            self.next_synthetic_num = num_id + 1;
        }
        self.numbering.push(NumberingDefinition {
            num_id,
            levels: generate_levels(kind, 9),
        });
    }
}

fn styled_run(el: &ElementNode, font: &crate::ast::FontProperties, style: Option<&str>) -> DocxRun {
    let mut text = String::new();
    for child in el.children() {
        if let Node::Text { value } = child {
            text.push_str(value);
        }
    }
    DocxRun {
        text,
        bold: font.bold,
        italic: font.italic,
        strike: font.strike,
        underline: font.underline.clone(),
        size: font.size,
        color: font
            .color
            .as_ref()
            .and_then(|c| c.as_hex())
            .map(str::to_string),
        monospace: font.monospace,
        vertical_alignment: font.vertical_alignment,
        character_style: style.map(str::to_string),
    }
}

fn placeholder_run(reason: &str) -> RunContent {
    RunContent::Run(DocxRun {
        text: format!("[Image: {reason}]"),
        ..DocxRun::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{
        Alignment, DrawingProperties, FontProperties, HyperlinkProperties, ListItemProperties,
        ListProperties, ParagraphFormatting, SchemaProperties, TableCellProperties,
        TableRowProperties, WmlTableProperties, paragraph, text_run,
    };
    use crate::common::unit::Measurement;
    use base64::Engine as _;

    fn run_node(text: &str, font: FontProperties) -> Node {
        Node::Element(text_run(text, font).unwrap())
    }

    fn simple_paragraph(text: &str) -> ElementNode {
        let mut p = paragraph(ParagraphFormatting::default()).unwrap();
        p.push_child(run_node(text, FontProperties::default())).unwrap();
        p
    }

    fn list_of(kind: ListKind, items: Vec<Node>) -> ElementNode {
        let mut list = ElementNode::tagged(
            SemanticType::List,
            SchemaProperties::List(ListProperties { kind, num_id: None }),
        )
        .unwrap();
        for item in items {
            list.push_child(item).unwrap();
        }
        list
    }

    fn item_with(blocks: Vec<Node>) -> Node {
        let mut item = ElementNode::tagged(
            SemanticType::ListItem,
            SchemaProperties::ListItem(ListItemProperties::default()),
        )
        .unwrap();
        for block in blocks {
            item.push_child(block).unwrap();
        }
        Node::Element(item)
    }

    #[tokio::test]
    async fn test_tri_state_styles_stay_unset() {
        let mut root = RootNode::new();
        let mut p = paragraph(ParagraphFormatting {
            alignment: Some(Alignment::Center),
            outline_level: Some(2),
            ..ParagraphFormatting::default()
        })
        .unwrap();
        p.push_child(run_node(
            "styled",
            FontProperties {
                bold: Some(true),
                ..FontProperties::default()
            },
        ))
        .unwrap();
        root.push_child(Node::Element(p)).unwrap();

        let mut diags = Diagnostics::new();
        let doc = generate_docx(&root, &mut diags).await;
        assert!(diags.is_empty());

        let BodyContent::Paragraph(para) = &doc.body[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(para.alignment, Some(Alignment::Center));
        assert_eq!(para.heading_level, Some(2));
        let RunContent::Run(run) = &para.children[0] else {
            panic!("expected run");
        };
        assert_eq!(run.bold, Some(true));
        // Undefined stays unset, never defaulted to off.
        assert_eq!(run.italic, None);
        assert_eq!(run.strike, None);
    }

    #[tokio::test]
    async fn test_ragged_rows_widened_to_grid() {
        let mut table = ElementNode::tagged(
            SemanticType::Table,
            SchemaProperties::Table(WmlTableProperties {
                grid_columns: vec![
                    Measurement::dxa(2880.0),
                    Measurement::dxa(2880.0),
                    Measurement::dxa(2880.0),
                ],
                ..WmlTableProperties::default()
            }),
        )
        .unwrap();
        for cell_count in [3usize, 2, 3] {
            let mut row = ElementNode::tagged(
                SemanticType::TableRow,
                SchemaProperties::TableRow(TableRowProperties::default()),
            )
            .unwrap();
            for _ in 0..cell_count {
                let mut cell = ElementNode::tagged(
                    SemanticType::TableCell,
                    SchemaProperties::TableCell(TableCellProperties::default()),
                )
                .unwrap();
                cell.push_child(Node::Element(simple_paragraph("x"))).unwrap();
                row.push_child(Node::Element(cell)).unwrap();
            }
            table.push_child(Node::Element(row)).unwrap();
        }
        let mut root = RootNode::new();
        root.push_child(Node::Element(table)).unwrap();

        let mut diags = Diagnostics::new();
        let doc = generate_docx(&root, &mut diags).await;
        let BodyContent::Table(out) = &doc.body[0] else {
            panic!("expected table");
        };
        assert_eq!(out.grid_columns.len(), 3);
        // Every row has exactly the grid's column count.
        assert!(out.rows.iter().all(|r| r.cells.len() == 3));
    }

    #[tokio::test]
    async fn test_sibling_lists_do_not_share_numbering() {
        let mut root = RootNode::new();
        root.push_child(Node::Element(list_of(
            ListKind::Bullet,
            vec![item_with(vec![Node::Element(simple_paragraph("first"))])],
        )))
        .unwrap();
        root.push_child(Node::Element(list_of(
            ListKind::Number,
            vec![item_with(vec![Node::Element(simple_paragraph("second"))])],
        )))
        .unwrap();

        let mut diags = Diagnostics::new();
        let doc = generate_docx(&root, &mut diags).await;
        assert_eq!(doc.numbering.len(), 2);
        assert_eq!(doc.body.len(), 2);

        let numbering_of = |content: &BodyContent| match content {
            BodyContent::Paragraph(p) => p.numbering,
            BodyContent::Table(_) => None,
        };
        let first = numbering_of(&doc.body[0]).unwrap();
        let second = numbering_of(&doc.body[1]).unwrap();
        assert_ne!(first.0, second.0);
        // Both start back at level zero.
        assert_eq!(first.1, 0);
        assert_eq!(second.1, 0);
    }

    #[tokio::test]
    async fn test_nested_list_deepens_level() {
        let nested = list_of(
            ListKind::Bullet,
            vec![item_with(vec![Node::Element(simple_paragraph("inner"))])],
        );
        let outer = list_of(
            ListKind::Bullet,
            vec![item_with(vec![
                Node::Element(simple_paragraph("outer")),
                Node::Element(nested),
            ])],
        );
        let mut root = RootNode::new();
        root.push_child(Node::Element(outer)).unwrap();

        let mut diags = Diagnostics::new();
        let doc = generate_docx(&root, &mut diags).await;

        let levels: Vec<(u32, u8)> = doc
            .body
            .iter()
            .filter_map(|c| match c {
                BodyContent::Paragraph(p) => p.numbering,
                BodyContent::Table(_) => None,
            })
            .collect();
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0].1, 0);
        assert_eq!(levels[1].1, 1);
        // The nested list continues the outer numbering instance.
        assert_eq!(levels[0].0, levels[1].0);
        assert_eq!(doc.numbering.len(), 1);
    }

    #[tokio::test]
    async fn test_hyperlink_gets_relationship_and_style() {
        let mut p = paragraph(ParagraphFormatting::default()).unwrap();
        let mut link = ElementNode::tagged(
            SemanticType::Hyperlink,
            SchemaProperties::Hyperlink(HyperlinkProperties {
                url: Some("https://example.com".to_string()),
                anchor: None,
                tooltip: None,
            }),
        )
        .unwrap();
        link.push_child(run_node("visit", FontProperties::default()))
            .unwrap();
        p.push_child(Node::Element(link)).unwrap();

        let mut root = RootNode::new();
        root.push_child(Node::Element(p)).unwrap();

        let mut diags = Diagnostics::new();
        let doc = generate_docx(&root, &mut diags).await;

        let BodyContent::Paragraph(para) = &doc.body[0] else {
            panic!("expected paragraph");
        };
        let RunContent::Hyperlink(out) = &para.children[0] else {
            panic!("expected hyperlink");
        };
        assert_eq!(out.rel_id.as_deref(), Some("rId1"));
        assert_eq!(out.runs[0].character_style.as_deref(), Some("Hyperlink"));
        assert_eq!(doc.relationships[0].target, "https://example.com");
    }

    #[tokio::test]
    async fn test_data_uri_image_embedded() {
        let png = [0x89u8, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        let url = format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(png)
        );
        let mut p = paragraph(ParagraphFormatting::default()).unwrap();
        let drawing = ElementNode::tagged(
            SemanticType::Drawing,
            SchemaProperties::Drawing(DrawingProperties {
                url: Some(url),
                alt: Some("logo".to_string()),
                ..DrawingProperties::default()
            }),
        )
        .unwrap();
        p.push_child(Node::Element(drawing)).unwrap();
        let mut root = RootNode::new();
        root.push_child(Node::Element(p)).unwrap();

        let mut diags = Diagnostics::new();
        let doc = generate_docx(&root, &mut diags).await;
        assert!(diags.is_empty());

        let BodyContent::Paragraph(para) = &doc.body[0] else {
            panic!("expected paragraph");
        };
        let RunContent::Image(image) = &para.children[0] else {
            panic!("expected image");
        };
        assert_eq!(image.format, ImageFormat::Png);
        assert_eq!(image.data, png);
        assert_eq!(doc.relationships[0].target, "media/image1.png");
    }

    #[tokio::test]
    async fn test_unresolvable_image_degrades_to_placeholder() {
        let mut p = paragraph(ParagraphFormatting::default()).unwrap();
        let drawing = ElementNode::tagged(
            SemanticType::Drawing,
            SchemaProperties::Drawing(DrawingProperties {
                rel_id: Some("pdfImage_1_img7".to_string()),
                alt: Some("chart".to_string()),
                ..DrawingProperties::default()
            }),
        )
        .unwrap();
        p.push_child(Node::Element(drawing)).unwrap();
        let mut root = RootNode::new();
        root.push_child(Node::Element(p)).unwrap();

        let mut diags = Diagnostics::new();
        let doc = generate_docx(&root, &mut diags).await;
        assert_eq!(diags.len(), 1);

        let BodyContent::Paragraph(para) = &doc.body[0] else {
            panic!("expected paragraph");
        };
        let RunContent::Run(run) = &para.children[0] else {
            panic!("expected placeholder run");
        };
        assert_eq!(run.text, "[Image: chart]");
    }
}
