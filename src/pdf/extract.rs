//! Per-page extraction: operator replay, placement, link association.
//!
//! The engine walks the operator list once with a [`GraphicsStack`], binding
//! each text-showing operator to the next decoder text item and each image
//! XObject paint to the CTM in effect, then associates link annotations and
//! hands the positioned fragments to the Y-gap grouper.
//!
//! Bold/italic inference from font-name substrings and the hit-test/grouping
//! thresholds are best-effort heuristics, never authoritative.

use crate::ast::{
    DrawingProperties, ElementNode, FontProperties, HyperlinkProperties, Node,
    ParagraphFormatting, PdfSourceInfo, RootNode, SchemaProperties, SemanticType,
};
use crate::common::color::ColorDefinition;
use crate::common::error::{Diagnostics, Error};
use crate::common::unit::{MeasureUnit, Measurement};

use super::SOURCE;
use super::content::{Annotation, Operator, PageContent, Rect, TextItem};
use super::graphics::{BLACK, GraphicsStack, GraphicsState, Rgb, rgb_to_hex};
use super::group::{Positioned, group_by_gap};

/// How a text item is matched against a link annotation rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkHitTest {
    /// Test only the item's origin point. Cheap and the historical default,
    /// but misses rotated or partially covered items.
    #[default]
    Origin,
    /// Test the item's whole bounding box for overlap.
    BoundingBox,
}

/// Tunable extraction heuristics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractOptions {
    /// Vertical gap (user-space units) above which consecutive items start
    /// a new paragraph.
    pub paragraph_gap: f64,
    pub link_hit_test: LinkHitTest,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            paragraph_gap: 5.0,
            link_hit_test: LinkHitTest::Origin,
        }
    }
}

/// Extract a document from a decoder's page-load result.
///
/// A failed load ([`Error::PdfLoadError`] from the decoder) aborts the whole
/// PDF: one fatal diagnostic, empty root.
pub fn extract_loaded(
    pages: Result<Vec<PageContent>, Error>,
    options: &ExtractOptions,
    diags: &mut Diagnostics,
) -> RootNode {
    match pages {
        Ok(pages) => extract_document(&pages, options, diags),
        Err(e) => {
            diags.fatal(SOURCE, e.to_string());
            RootNode::new()
        },
    }
}

/// Extract every page into one root, in page order.
pub fn extract_document(
    pages: &[PageContent],
    options: &ExtractOptions,
    diags: &mut Diagnostics,
) -> RootNode {
    let mut root = RootNode::new();
    for (index, page) in pages.iter().enumerate() {
        for paragraph in extract_page(page, index + 1, options, diags) {
            if let Err(e) = root.push_child(paragraph) {
                diags.warn(SOURCE, format!("dropped invalid page element: {e}"));
            }
        }
    }
    root
}

/// Extract one page into ordered paragraph elements.
///
/// `page_number` is 1-based and only feeds synthetic image relation ids.
pub fn extract_page(
    page: &PageContent,
    page_number: usize,
    options: &ExtractOptions,
    diags: &mut Diagnostics,
) -> Vec<Node> {
    let mut fragments = Vec::new();
    let mut gfx = GraphicsStack::new();
    let mut next_text = 0usize;

    for op in &page.operators {
        match op {
            Operator::ShowText => match page.text_items.get(next_text) {
                Some(item) => {
                    fragments.push(Fragment::Text(text_fragment(item, gfx.current())));
                    next_text += 1;
                },
                None => {
                    diags.warn(SOURCE, "text operator without a matching text item");
                },
            },
            Operator::PaintImageXObject {
                object_ref,
                width,
                height,
            } => {
                fragments.push(image_fragment(
                    gfx.current(),
                    page_number,
                    object_ref,
                    *width,
                    *height,
                ));
            },
            _ => gfx.apply(op, diags),
        }
    }
    // Decoders that emit no text operators still hand over text items.
    let default_state = GraphicsState::default();
    for item in &page.text_items[next_text.min(page.text_items.len())..] {
        fragments.push(Fragment::Text(text_fragment(item, &default_state)));
    }

    associate_links(&mut fragments, &page.annotations, options.link_hit_test);

    let mut paragraphs = Vec::new();
    for group in group_by_gap(fragments, options.paragraph_gap) {
        match build_paragraph(group) {
            Ok(p) => paragraphs.push(Node::Element(p)),
            Err(e) => {
                diags.warn(SOURCE, format!("skipped unbuildable paragraph: {e}"));
            },
        }
    }
    paragraphs
}

/// A positioned page item awaiting grouping.
#[derive(Debug)]
enum Fragment {
    Text(TextFragment),
    Image(ImageFragment),
}

#[derive(Debug)]
struct TextFragment {
    text: String,
    bbox: Rect,
    origin: (f64, f64),
    transform: [f64; 6],
    width: f64,
    height: f64,
    font_name: String,
    font_size: f64,
    color: Rgb,
    link: Option<String>,
}

#[derive(Debug)]
struct ImageFragment {
    rel_id: String,
    origin: (f64, f64),
    width: f64,
    height: f64,
    ctm: [f64; 6],
    pixel_width: f64,
    pixel_height: f64,
}

impl Positioned for Fragment {
    fn top(&self) -> f64 {
        match self {
            Fragment::Text(t) => t.bbox.y2,
            Fragment::Image(i) => i.origin.1 + i.height,
        }
    }

    fn left(&self) -> f64 {
        match self {
            Fragment::Text(t) => t.bbox.x1,
            Fragment::Image(i) => i.origin.0,
        }
    }
}

/// Axis-aligned bounding box of a placed text item:
/// `x2 = a·w + c·h + x1`, `y2 = b·w + d·h + y1`, then normalized.
fn text_bbox(item: &TextItem) -> Rect {
    let [a, b, c, d, e, f] = item.transform;
    let x2 = a * item.width + c * item.height + e;
    let y2 = b * item.width + d * item.height + f;
    Rect::normalized(e, f, x2, y2)
}

fn text_fragment(item: &TextItem, state: &GraphicsState) -> TextFragment {
    let font_name = if item.font_name.is_empty() {
        state.font_name.clone().unwrap_or_default()
    } else {
        item.font_name.clone()
    };
    TextFragment {
        text: item.text.clone(),
        bbox: text_bbox(item),
        origin: (item.transform[4], item.transform[5]),
        transform: item.transform,
        width: item.width,
        height: item.height,
        // Effective size comes from the placement, not the Tf operand.
        font_size: item.transform[1].hypot(item.transform[3]),
        font_name,
        color: state.fill_color,
        link: None,
    }
}

fn image_fragment(
    state: &GraphicsState,
    page_number: usize,
    object_ref: &str,
    pixel_width: f64,
    pixel_height: f64,
) -> Fragment {
    let ctm = state.ctm;
    Fragment::Image(ImageFragment {
        rel_id: format!("pdfImage_{page_number}_{object_ref}"),
        origin: (ctm[4], ctm[5]),
        width: ctm[0].abs() * pixel_width,
        height: ctm[3].abs() * pixel_height,
        ctm,
        pixel_width,
        pixel_height,
    })
}

/// Attach annotation URLs to the text fragments they cover. The trailing
/// slash of a hit URL is stripped.
fn associate_links(fragments: &mut [Fragment], annotations: &[Annotation], hit_test: LinkHitTest) {
    let links: Vec<(Rect, &str)> = annotations
        .iter()
        .filter(|a| a.subtype == "Link")
        .filter_map(|a| {
            let [x1, y1, x2, y2] = a.rect?;
            Some((Rect::normalized(x1, y1, x2, y2), a.url.as_deref()?))
        })
        .collect();
    if links.is_empty() {
        return;
    }

    for fragment in fragments {
        let Fragment::Text(text) = fragment else {
            continue;
        };
        for (rect, url) in &links {
            let hit = match hit_test {
                LinkHitTest::Origin => rect.contains(text.origin.0, text.origin.1),
                LinkHitTest::BoundingBox => rect.intersects(&text.bbox),
            };
            if hit {
                let trimmed = url.strip_suffix('/').unwrap_or(url);
                text.link = Some(trimmed.to_string());
                break;
            }
        }
    }
}

fn build_paragraph(group: Vec<Fragment>) -> crate::common::Result<ElementNode> {
    let mut para = crate::ast::paragraph(ParagraphFormatting::default())?;
    for fragment in group {
        match fragment {
            Fragment::Text(text) => {
                let link = text.link.clone();
                let run = text_run_node(text)?;
                if let Some(url) = link {
                    let mut hyperlink = ElementNode::tagged(
                        SemanticType::Hyperlink,
                        SchemaProperties::Hyperlink(HyperlinkProperties {
                            url: Some(url),
                            anchor: None,
                            tooltip: None,
                        }),
                    )?;
                    hyperlink.push_child(Node::Element(run))?;
                    para.push_child(Node::Element(hyperlink))?;
                } else {
                    para.push_child(Node::Element(run))?;
                }
            },
            Fragment::Image(image) => {
                para.push_child(Node::Element(drawing_node(image)?))?;
            },
        }
    }
    Ok(para)
}

fn text_run_node(fragment: TextFragment) -> crate::common::Result<ElementNode> {
    let lowered = fragment.font_name.to_ascii_lowercase();
    let mut font = FontProperties::default();
    // Name-substring inference: set only on a hit, never forced off.
    if lowered.contains("bold") {
        font.bold = Some(true);
    }
    if lowered.contains("italic") || lowered.contains("oblique") {
        font.italic = Some(true);
    }
    font.monospace = lowered.contains("mono") || lowered.contains("courier");
    if fragment.font_size > 0.0 {
        font.size = Some(fragment.font_size);
    }
    if fragment.color != BLACK {
        font.color = Some(ColorDefinition::Hex(rgb_to_hex(fragment.color)));
    }
    font.pdf_source = Some(PdfSourceInfo {
        transform: fragment.transform,
        width: fragment.width,
        height: fragment.height,
        font_name: fragment.font_name,
    });
    crate::ast::text_run(fragment.text, font)
}

fn drawing_node(image: ImageFragment) -> crate::common::Result<ElementNode> {
    let props = DrawingProperties {
        rel_id: Some(image.rel_id),
        url: None,
        alt: None,
        width: Some(Measurement::new(image.width, MeasureUnit::Pt)),
        height: Some(Measurement::new(image.height, MeasureUnit::Pt)),
        position: Some(image.origin),
        pdf_source: Some(PdfSourceInfo {
            transform: image.ctm,
            width: image.pixel_width,
            height: image.pixel_height,
            font_name: String::new(),
        }),
    };
    ElementNode::tagged(SemanticType::Drawing, SchemaProperties::Drawing(props))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::content::Viewport;

    fn item(text: &str, x: f64, y: f64, size: f64) -> TextItem {
        TextItem {
            text: text.to_string(),
            transform: [size, 0.0, 0.0, size, x, y],
            width: text.len() as f64 * 0.5,
            height: 1.0,
            font_name: "Helvetica".to_string(),
        }
    }

    fn page_of(items: Vec<TextItem>) -> PageContent {
        PageContent {
            text_items: items,
            operators: Vec::new(),
            annotations: Vec::new(),
            viewport: Viewport {
                width: 612.0,
                height: 792.0,
            },
        }
    }

    #[test]
    fn test_bbox_and_font_size() {
        let fragment = text_fragment(
            &TextItem {
                text: "x".to_string(),
                transform: [12.0, 0.0, 0.0, 12.0, 100.0, 700.0],
                width: 4.0,
                height: 1.0,
                font_name: String::new(),
            },
            &GraphicsState::default(),
        );
        assert_eq!(fragment.bbox, Rect::normalized(100.0, 700.0, 148.0, 712.0));
        assert_eq!(fragment.font_size, 12.0);
    }

    #[test]
    fn test_bbox_normalized_under_flip() {
        // Negative d flips the box below the origin.
        let fragment = text_fragment(
            &TextItem {
                text: "x".to_string(),
                transform: [10.0, 0.0, 0.0, -10.0, 50.0, 400.0],
                width: 2.0,
                height: 1.0,
                font_name: String::new(),
            },
            &GraphicsState::default(),
        );
        assert_eq!(fragment.bbox, Rect::normalized(50.0, 390.0, 70.0, 400.0));
        assert!(fragment.bbox.y1 <= fragment.bbox.y2);
    }

    #[test]
    fn test_bold_italic_inference() {
        let run = |name: &str| {
            let mut fragment = text_fragment(&item("t", 0.0, 0.0, 10.0), &GraphicsState::default());
            fragment.font_name = name.to_string();
            let node = text_run_node(fragment).unwrap();
            let SchemaProperties::TextRun(font) = node.properties else {
                panic!("expected run payload");
            };
            font
        };
        assert_eq!(run("Helvetica-Bold").bold, Some(true));
        assert_eq!(run("Times-BoldItalic").italic, Some(true));
        assert_eq!(run("Garamond-Oblique").italic, Some(true));
        // No hit stays unset rather than explicitly off.
        assert_eq!(run("Helvetica").bold, None);
        assert_eq!(run("Helvetica").italic, None);
        assert!(run("Courier-New").monospace);
    }

    #[test]
    fn test_paragraph_grouping() {
        let mut diags = Diagnostics::new();
        let page = page_of(vec![
            item("heading", 72.0, 700.0, 18.0),
            item("body one", 72.0, 660.0, 12.0),
            item("body two", 72.0, 656.0, 12.0),
        ]);
        let paragraphs = extract_page(&page, 1, &ExtractOptions::default(), &mut diags);
        assert!(diags.is_empty());
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].plain_text(), "heading");
        assert_eq!(paragraphs[1].plain_text(), "body onebody two");
    }

    #[test]
    fn test_link_association_by_origin() {
        let mut diags = Diagnostics::new();
        let mut page = page_of(vec![
            item("inside", 50.0, 50.0, 10.0),
            item("outside", 150.0, 150.0, 10.0),
        ]);
        page.annotations
            .push(Annotation::link("https://example.com/docs/", [0.0, 0.0, 100.0, 100.0]));

        let paragraphs = extract_page(&page, 1, &ExtractOptions::default(), &mut diags);
        // 100 units apart: two paragraphs.
        assert_eq!(paragraphs.len(), 2);

        let Node::Element(linked) = &paragraphs[1] else {
            panic!("expected element");
        };
        let hyperlink = linked.children_of(SemanticType::Hyperlink).next().unwrap();
        let SchemaProperties::Hyperlink(props) = &hyperlink.properties else {
            panic!("expected hyperlink payload");
        };
        // Trailing slash stripped on association.
        assert_eq!(props.url.as_deref(), Some("https://example.com/docs"));

        let Node::Element(unlinked) = &paragraphs[0] else {
            panic!("expected element");
        };
        assert!(unlinked.children_of(SemanticType::Hyperlink).next().is_none());
        assert_eq!(unlinked.children_of(SemanticType::TextRun).count(), 1);
    }

    #[test]
    fn test_image_placement_through_ctm() {
        let mut diags = Diagnostics::new();
        let page = PageContent {
            operators: vec![
                Operator::Save,
                Operator::Transform([0.5, 0.0, 0.0, -0.5, 100.0, 500.0]),
                Operator::PaintImageXObject {
                    object_ref: "img7".to_string(),
                    width: 640.0,
                    height: 480.0,
                },
                Operator::Restore,
            ],
            ..PageContent::default()
        };
        let paragraphs = extract_page(&page, 3, &ExtractOptions::default(), &mut diags);
        assert_eq!(paragraphs.len(), 1);

        let Node::Element(para) = &paragraphs[0] else {
            panic!("expected element");
        };
        let drawing = para.children_of(SemanticType::Drawing).next().unwrap();
        let SchemaProperties::Drawing(props) = &drawing.properties else {
            panic!("expected drawing payload");
        };
        assert_eq!(props.rel_id.as_deref(), Some("pdfImage_3_img7"));
        assert_eq!(props.position, Some((100.0, 500.0)));
        assert_eq!(props.width.unwrap().value(), 320.0);
        assert_eq!(props.height.unwrap().value(), 240.0);
    }

    #[test]
    fn test_colored_text_gets_hex_color() {
        let mut diags = Diagnostics::new();
        let page = PageContent {
            text_items: vec![item("red", 72.0, 700.0, 12.0)],
            operators: vec![Operator::SetFillRgb(1.0, 0.0, 0.0), Operator::ShowText],
            ..PageContent::default()
        };
        let paragraphs = extract_page(&page, 1, &ExtractOptions::default(), &mut diags);
        let Node::Element(para) = &paragraphs[0] else {
            panic!("expected element");
        };
        let run = para.children_of(SemanticType::TextRun).next().unwrap();
        let SchemaProperties::TextRun(font) = &run.properties else {
            panic!("expected run payload");
        };
        assert_eq!(
            font.color,
            Some(ColorDefinition::Hex("ff0000".to_string()))
        );
        assert!(font.pdf_source.is_some());
    }

    #[test]
    fn test_document_order_and_configurable_gap() {
        let mut diags = Diagnostics::new();
        let pages = vec![
            page_of(vec![item("page one", 72.0, 700.0, 12.0)]),
            page_of(vec![
                item("a", 72.0, 700.0, 12.0),
                item("b", 72.0, 690.0, 12.0),
            ]),
        ];

        let root = extract_document(&pages, &ExtractOptions::default(), &mut diags);
        // Default gap of 5 splits the 10-unit jump on page two.
        assert_eq!(root.count_children(SemanticType::Paragraph), 3);

        let mut diags = Diagnostics::new();
        let wide = ExtractOptions {
            paragraph_gap: 20.0,
            ..ExtractOptions::default()
        };
        let root = extract_document(&pages, &wide, &mut diags);
        assert_eq!(root.count_children(SemanticType::Paragraph), 2);
    }

    #[test]
    fn test_load_failure_is_one_fatal() {
        let mut diags = Diagnostics::new();
        let root = extract_loaded(
            Err(Error::PdfLoadError("page tree unreadable".to_string())),
            &ExtractOptions::default(),
            &mut diags,
        );
        assert!(root.children.is_empty());
        assert_eq!(diags.fatal_count(), 1);
        assert!(diags.messages()[0].message.contains("page tree unreadable"));

        let mut diags = Diagnostics::new();
        let root = extract_loaded(Ok(Vec::new()), &ExtractOptions::default(), &mut diags);
        assert!(root.children.is_empty());
        assert!(diags.is_empty());
    }
}
