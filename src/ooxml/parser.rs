//! Top-down walk of `word/document.xml` into the semantic tree.
//!
//! Tag dispatch goes through the fixed table in [`super::tags`]; numbering,
//! style, and hyperlink references are resolved eagerly against the shared
//! stores while walking. Per-element problems degrade to a diagnostic and a
//! skipped node; only a missing or malformed document part aborts the
//! document, and even that surfaces as an empty root plus one fatal
//! diagnostic rather than an unwound error.

use std::collections::HashMap;

use crate::ast::{
    Alignment, BreakKind, DocumentMetadata, ElementNode, FontProperties, FontSet,
    HyperlinkProperties, Indentation, Node, ParagraphFormatting, ReferenceProperties,
    ResolvedNumbering, RootNode, SchemaProperties, SemanticType, SharedResources, Spacing,
    TabAlignment, TabStop, VerticalAlignment,
};
use crate::common::color::ColorDefinition;
use crate::common::error::Diagnostics;
use crate::common::unit::Measurement;
use crate::common::xml::{self, XmlElement};

use super::package::{
    COMMENTS_PART, CORE_PROPS_PART, DOCUMENT_PART, DocxPackage, ENDNOTES_PART, FOOTNOTES_PART,
    NUMBERING_PART, STYLES_PART,
};
use super::{SOURCE, metadata, notes, numbering, styles, tags};

/// Parse DOCX archive bytes into a semantic root.
///
/// Never fails: an unreadable archive yields an empty root and exactly one
/// fatal diagnostic.
pub fn parse_bytes(bytes: &[u8], diags: &mut Diagnostics) -> RootNode {
    match DocxPackage::from_bytes(bytes) {
        Ok(pkg) => parse_package(&pkg, diags),
        Err(e) => {
            diags.fatal(SOURCE, format!("archive failed to open: {e}"));
            RootNode::new()
        },
    }
}

/// Parse an opened package into a semantic root.
pub fn parse_package(pkg: &DocxPackage, diags: &mut Diagnostics) -> RootNode {
    let mut resources = SharedResources::new();
    let mut meta = DocumentMetadata::default();

    // Optional side parts: a malformed one degrades to a diagnostic.
    if let Some(tree) = parse_optional_part(pkg, NUMBERING_PART, diags) {
        let (abstract_nums, instances) = numbering::parse_numbering(&tree);
        resources.abstract_numbering = abstract_nums;
        resources.numbering_instances = instances;
    }
    if let Some(tree) = parse_optional_part(pkg, STYLES_PART, diags) {
        resources.styles = styles::parse_styles(&tree);
    }
    if let Some(tree) = parse_optional_part(pkg, COMMENTS_PART, diags) {
        resources.comments = notes::parse_comments(&tree);
    }
    if let Some(tree) = parse_optional_part(pkg, FOOTNOTES_PART, diags) {
        resources.footnotes = notes::parse_notes(&tree, "w:footnote");
    }
    if let Some(tree) = parse_optional_part(pkg, ENDNOTES_PART, diags) {
        resources.endnotes = notes::parse_notes(&tree, "w:endnote");
    }
    if let Some(tree) = parse_optional_part(pkg, CORE_PROPS_PART, diags) {
        meta = metadata::parse_core_properties(&tree);
    }
    if let Some(rels) = pkg.relationships_for(DOCUMENT_PART) {
        resources.relationships = rels.clone();
    }

    // The document part is the one required input.
    let Some(bytes) = pkg.part(DOCUMENT_PART) else {
        diags.fatal(SOURCE, format!("required part {DOCUMENT_PART} not found"));
        return RootNode::new();
    };
    let tree = match xml::parse_tree(bytes) {
        Ok(t) => t,
        Err(e) => {
            diags.fatal(SOURCE, format!("malformed {DOCUMENT_PART}: {e}"));
            return RootNode::new();
        },
    };
    let Some(body) = tree.child("w:body") else {
        diags.fatal(SOURCE, format!("{DOCUMENT_PART} has no w:body"));
        return RootNode::new();
    };

    let blocks = {
        let mut parser = BodyParser {
            resources: &resources,
            diags,
        };
        parser.parse_body(body)
    };

    // Header/footer parts referenced from the last section properties.
    let (headers, footers) = parse_header_footer_parts(pkg, body, &resources, diags);
    resources.headers = headers;
    resources.footers = footers;

    let mut root = RootNode::new();
    root.resources = resources;
    root.metadata = meta;
    for block in blocks {
        if let Err(e) = root.push_child(block) {
            diags.warn(SOURCE, format!("dropped invalid block: {e}"));
        }
    }
    root
}

fn parse_optional_part(
    pkg: &DocxPackage,
    path: &str,
    diags: &mut Diagnostics,
) -> Option<XmlElement> {
    let bytes = pkg.part(path)?;
    match xml::parse_tree(bytes) {
        Ok(tree) => Some(tree),
        Err(e) => {
            diags.warn(SOURCE, format!("malformed part {path}: {e}"));
            None
        },
    }
}

fn parse_header_footer_parts(
    pkg: &DocxPackage,
    body: &XmlElement,
    resources: &SharedResources,
    diags: &mut Diagnostics,
) -> (HashMap<String, RootNode>, HashMap<String, RootNode>) {
    let mut headers = HashMap::new();
    let mut footers = HashMap::new();
    let Some(sect_pr) = body.descendant("w:sectPr") else {
        return (headers, footers);
    };

    for reference in sect_pr.child_elements() {
        let is_header = reference.name == "w:headerReference";
        let is_footer = reference.name == "w:footerReference";
        if !is_header && !is_footer {
            continue;
        }
        let Some(r_id) = reference.attr("r:id") else {
            continue;
        };
        let Some(path) = pkg.resolve_document_target(r_id) else {
            diags.warn(SOURCE, format!("unresolved header/footer reference {r_id}"));
            continue;
        };
        let Some(tree) = parse_optional_part(pkg, &path, diags) else {
            continue;
        };

        let mut sub_root = RootNode::new();
        let blocks = {
            let mut parser = BodyParser { resources, diags };
            parser.parse_body(&tree)
        };
        for block in blocks {
            let _ = sub_root.push_child(block);
        }
        if is_header {
            headers.insert(r_id.to_string(), sub_root);
        } else {
            footers.insert(r_id.to_string(), sub_root);
        }
    }
    (headers, footers)
}

/// Walks body-level XML with read access to the shared stores.
pub(crate) struct BodyParser<'a> {
    pub(crate) resources: &'a SharedResources,
    pub(crate) diags: &'a mut Diagnostics,
}

impl BodyParser<'_> {
    /// Parse the block-level children of a body-like element (`w:body`,
    /// `w:hdr`, `w:ftr`, `w:tc`).
    pub(crate) fn parse_body(&mut self, body: &XmlElement) -> Vec<Node> {
        let mut blocks = Vec::new();
        for child in body.child_elements() {
            match tags::semantic_type_for(&child.name) {
                Some(SemanticType::Paragraph) => match self.parse_paragraph(child) {
                    Ok(p) => blocks.push(Node::Element(p)),
                    Err(e) => {
                        self.diags
                            .warn(SOURCE, format!("skipped malformed paragraph: {e}"));
                    },
                },
                Some(SemanticType::Table) => match self.parse_table(child) {
                    Ok(t) => blocks.push(Node::Element(t)),
                    Err(e) => {
                        self.diags
                            .warn(SOURCE, format!("skipped malformed table: {e}"));
                    },
                },
                // sectPr and other structural tags carry no body content.
                _ => {},
            }
        }
        blocks
    }

    pub(crate) fn parse_paragraph(
        &mut self,
        el: &XmlElement,
    ) -> crate::common::Result<ElementNode> {
        let formatting = self.parse_paragraph_formatting(el.child("w:pPr"));
        let mut para = ElementNode::new(
            el.name.clone(),
            SemanticType::Paragraph,
            SchemaProperties::Paragraph(formatting),
        )?;

        self.parse_inline_children(&mut para, el)?;
        Ok(para)
    }

    /// Run-like children shared by paragraphs and accepted insertions.
    fn parse_inline_children(
        &mut self,
        para: &mut ElementNode,
        el: &XmlElement,
    ) -> crate::common::Result<()> {
        for child in el.child_elements() {
            match child.name.as_str() {
                "w:pPr" => {},
                "w:r" => self.parse_run_into(para, child)?,
                "w:hyperlink" => {
                    let link = self.parse_hyperlink(child)?;
                    para.push_child(Node::Element(link))?;
                },
                "w:bookmarkStart" => {
                    if let Some(id) = child.attr("w:id") {
                        let props = ReferenceProperties {
                            id: id.to_string(),
                            name: child.attr("w:name").map(str::to_string),
                        };
                        let node = ElementNode::new(
                            child.name.clone(),
                            SemanticType::BookmarkStart,
                            SchemaProperties::BookmarkStart(props),
                        )?;
                        para.push_child(Node::Element(node))?;
                    }
                },
                "w:bookmarkEnd" => {
                    if let Some(id) = child.attr("w:id") {
                        let props = ReferenceProperties {
                            id: id.to_string(),
                            name: None,
                        };
                        let node = ElementNode::new(
                            child.name.clone(),
                            SemanticType::BookmarkEnd,
                            SchemaProperties::BookmarkEnd(props),
                        )?;
                        para.push_child(Node::Element(node))?;
                    }
                },
                // Accepted insertion: treat its runs as regular content.
                "w:ins" => self.parse_inline_children(para, child)?,
                // Deleted content and proofing marks carry nothing we keep.
                _ => {},
            }
        }
        Ok(())
    }

    /// Parse one `w:r`, emitting a text run plus any embedded drawing,
    /// break, or note/comment reference as paragraph-level siblings.
    fn parse_run_into(
        &mut self,
        para: &mut ElementNode,
        run: &XmlElement,
    ) -> crate::common::Result<()> {
        let font = parse_run_properties(run.child("w:rPr"));
        let mut text = String::new();
        let mut saw_text = false;

        let flush =
            |text: &mut String, saw: &mut bool, para: &mut ElementNode| -> crate::common::Result<()> {
                if *saw {
                    let node = crate::ast::text_run(std::mem::take(text), font.clone())?;
                    para.push_child(Node::Element(node))?;
                    *saw = false;
                }
                Ok(())
            };

        for child in run.child_elements() {
            match child.name.as_str() {
                "w:t" => {
                    text.push_str(&child.text());
                    saw_text = true;
                },
                "w:tab" => {
                    text.push('\t');
                    saw_text = true;
                },
                "w:br" => {
                    flush(&mut text, &mut saw_text, para)?;
                    let kind = match child.attr("w:type") {
                        Some("page") => BreakKind::Page,
                        Some("column") => BreakKind::Column,
                        _ => BreakKind::Line,
                    };
                    let node = ElementNode::new(
                        child.name.clone(),
                        SemanticType::Break,
                        SchemaProperties::Break(kind),
                    )?;
                    para.push_child(Node::Element(node))?;
                },
                "w:drawing" => {
                    flush(&mut text, &mut saw_text, para)?;
                    match self.parse_drawing(child) {
                        Ok(drawing) => para.push_child(Node::Element(drawing))?,
                        Err(e) => {
                            self.diags
                                .warn(SOURCE, format!("skipped malformed drawing: {e}"));
                        },
                    }
                },
                "w:footnoteReference" | "w:endnoteReference" | "w:commentReference" => {
                    flush(&mut text, &mut saw_text, para)?;
                    if let Some(id) = child.attr("w:id") {
                        let props = ReferenceProperties {
                            id: id.to_string(),
                            name: None,
                        };
                        let (ty, properties) = match child.name.as_str() {
                            "w:footnoteReference" => (
                                SemanticType::FootnoteReference,
                                SchemaProperties::FootnoteReference(props),
                            ),
                            "w:endnoteReference" => (
                                SemanticType::EndnoteReference,
                                SchemaProperties::EndnoteReference(props),
                            ),
                            _ => (
                                SemanticType::CommentReference,
                                SchemaProperties::CommentReference(props),
                            ),
                        };
                        let node = ElementNode::new(child.name.clone(), ty, properties)?;
                        para.push_child(Node::Element(node))?;
                    }
                },
                _ => {},
            }
        }
        flush(&mut text, &mut saw_text, para)
    }

    fn parse_hyperlink(&mut self, el: &XmlElement) -> crate::common::Result<ElementNode> {
        let mut props = HyperlinkProperties {
            anchor: el.attr("w:anchor").map(str::to_string),
            tooltip: el.attr("w:tooltip").map(str::to_string),
            url: None,
        };
        if let Some(r_id) = el.attr("r:id") {
            props.url = self.resources.hyperlink_target(r_id).map(str::to_string);
            if props.url.is_none() {
                self.diags
                    .warn(SOURCE, format!("unresolved hyperlink relationship {r_id}"));
            }
        }

        let mut link = ElementNode::new(
            el.name.clone(),
            SemanticType::Hyperlink,
            SchemaProperties::Hyperlink(props),
        )?;
        for run in el.children_named("w:r") {
            let font = parse_run_properties(run.child("w:rPr"));
            let mut text = String::new();
            for child in run.child_elements() {
                match child.name.as_str() {
                    "w:t" => text.push_str(&child.text()),
                    "w:tab" => text.push('\t'),
                    _ => {},
                }
            }
            if !text.is_empty() {
                let node = crate::ast::text_run(text, font)?;
                link.push_child(Node::Element(node))?;
            }
        }
        Ok(link)
    }

    fn parse_drawing(&mut self, el: &XmlElement) -> crate::common::Result<ElementNode> {
        let mut props = crate::ast::DrawingProperties::default();

        if let Some(blip) = el.descendant("a:blip") {
            if let Some(embed) = blip.attr("r:embed") {
                props.rel_id = Some(embed.to_string());
            }
            // Linked (not embedded) images carry an external target.
            if let Some(link) = blip.attr("r:link") {
                props.url = self.resources.hyperlink_target(link).map(str::to_string);
            }
        }
        if let Some(extent) = el.descendant("wp:extent") {
            props.width = extent
                .attr("cx")
                .and_then(|v| v.parse::<f64>().ok())
                .map(|v| Measurement::new(v, crate::common::unit::MeasureUnit::Emu));
            props.height = extent
                .attr("cy")
                .and_then(|v| v.parse::<f64>().ok())
                .map(|v| Measurement::new(v, crate::common::unit::MeasureUnit::Emu));
        }
        if let Some(doc_pr) = el.descendant("wp:docPr") {
            props.alt = doc_pr
                .attr("descr")
                .or_else(|| doc_pr.attr("name"))
                .map(str::to_string);
        }

        ElementNode::new(
            el.name.clone(),
            SemanticType::Drawing,
            SchemaProperties::Drawing(props),
        )
    }

    fn parse_paragraph_formatting(&mut self, ppr: Option<&XmlElement>) -> ParagraphFormatting {
        let mut fmt = ParagraphFormatting::default();
        let Some(ppr) = ppr else {
            return fmt;
        };

        fmt.alignment = ppr
            .child("w:jc")
            .and_then(|e| e.attr("w:val"))
            .and_then(Alignment::parse);
        fmt.style_id = ppr
            .child("w:pStyle")
            .and_then(|e| e.attr("w:val"))
            .map(str::to_string);
        fmt.outline_level = ppr
            .child("w:outlineLvl")
            .and_then(|e| e.attr("w:val"))
            .and_then(|v| atoi_simd::parse::<u8>(v.as_bytes()).ok())
            .map(|v| v.min(8));
        // Heading styles assign an outline level when the paragraph doesn't.
        if fmt.outline_level.is_none() {
            if let Some(style_id) = &fmt.style_id {
                fmt.outline_level = self
                    .resources
                    .styles
                    .get(style_id)
                    .and_then(|s| s.outline_level)
                    .map(|v| v.min(8));
            }
        }

        // A paragraph border reads as a horizontal rule.
        if let Some(pbdr) = ppr.child("w:pBdr") {
            fmt.thematic_break =
                pbdr.child("w:bottom").is_some() || pbdr.child("w:top").is_some();
        }

        if let Some(num_pr) = ppr.child("w:numPr") {
            fmt.numbering = self.parse_num_pr(num_pr);
        }

        if let Some(ind) = ppr.child("w:ind") {
            fmt.indent = Some(Indentation {
                left: dxa_attr(ind, "w:left").or_else(|| dxa_attr(ind, "w:start")),
                right: dxa_attr(ind, "w:right").or_else(|| dxa_attr(ind, "w:end")),
                first_line: dxa_attr(ind, "w:firstLine"),
                hanging: dxa_attr(ind, "w:hanging"),
            });
        }
        if let Some(spacing) = ppr.child("w:spacing") {
            fmt.spacing = Some(Spacing {
                before: dxa_attr(spacing, "w:before"),
                after: dxa_attr(spacing, "w:after"),
                line: spacing.attr("w:line").and_then(|v| v.parse().ok()),
            });
        }
        if let Some(tabs) = ppr.child("w:tabs") {
            for tab in tabs.children_named("w:tab") {
                let alignment = tab
                    .attr("w:val")
                    .and_then(TabAlignment::parse)
                    .unwrap_or(TabAlignment::Left);
                if let Some(position) = dxa_attr(tab, "w:pos") {
                    fmt.tab_stops.push(TabStop {
                        position,
                        alignment,
                    });
                }
            }
        }
        fmt
    }

    /// Resolve `w:numPr` eagerly through the shared numbering stores.
    fn parse_num_pr(&mut self, num_pr: &XmlElement) -> Option<ResolvedNumbering> {
        let num_id = num_pr
            .child("w:numId")
            .and_then(|e| e.attr("w:val"))
            .and_then(|v| atoi_simd::parse::<u32>(v.as_bytes()).ok())?;
        let level = num_pr
            .child("w:ilvl")
            .and_then(|e| e.attr("w:val"))
            .and_then(|v| atoi_simd::parse::<u8>(v.as_bytes()).ok())
            .unwrap_or(0);

        match self.resources.resolve_numbering(num_id, level) {
            Some(resolved) => Some(ResolvedNumbering {
                num_id,
                level,
                format: resolved.format.clone(),
                level_text: resolved.level_text.clone(),
                indent_left: resolved.indent_left,
            }),
            None => {
                self.diags.warn(
                    SOURCE,
                    format!("unresolved numbering reference numId={num_id} level={level}"),
                );
                None
            },
        }
    }
}

/// Parse `w:rPr` into the run payload. Toggles are tri-state: an absent
/// toggle stays `None`, it is never defaulted.
pub(crate) fn parse_run_properties(rpr: Option<&XmlElement>) -> FontProperties {
    let mut font = FontProperties::default();
    let Some(rpr) = rpr else {
        return font;
    };

    font.bold = on_off(rpr, "w:b");
    font.italic = on_off(rpr, "w:i");
    font.strike = on_off(rpr, "w:strike");
    font.underline = rpr
        .child("w:u")
        .and_then(|e| e.attr("w:val"))
        .filter(|v| *v != "none")
        .map(str::to_string);
    // w:sz is in half-points.
    font.size = rpr
        .child("w:sz")
        .and_then(|e| e.attr("w:val"))
        .and_then(|v| v.parse::<f64>().ok())
        .map(|v| v / 2.0);
    font.color = rpr
        .child("w:color")
        .and_then(|e| e.attr("w:val"))
        .and_then(ColorDefinition::parse_attr);
    font.vertical_alignment = rpr
        .child("w:vertAlign")
        .and_then(|e| e.attr("w:val"))
        .and_then(|v| match v {
            "superscript" => Some(VerticalAlignment::Superscript),
            "subscript" => Some(VerticalAlignment::Subscript),
            _ => None,
        });

    if let Some(fonts) = rpr.child("w:rFonts") {
        let set = FontSet {
            ascii: fonts.attr("w:ascii").map(str::to_string),
            east_asia: fonts.attr("w:eastAsia").map(str::to_string),
            h_ansi: fonts.attr("w:hAnsi").map(str::to_string),
            cs: fonts.attr("w:cs").map(str::to_string),
        };
        if set != FontSet::default() {
            font.fonts = Some(set);
        }
    }
    font
}

/// Tri-state toggle: absent is `None`; `w:val` of 0/false/off/none reads
/// as an explicit off.
fn on_off(parent: &XmlElement, tag: &str) -> Option<bool> {
    let el = parent.child(tag)?;
    match el.attr("w:val") {
        None => Some(true),
        Some("0") | Some("false") | Some("off") | Some("none") => Some(false),
        Some(_) => Some(true),
    }
}

fn dxa_attr(el: &XmlElement, attr: &str) -> Option<Measurement> {
    el.attr(attr)
        .and_then(|v| v.parse::<f64>().ok())
        .map(Measurement::dxa)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Relationship;
    use crate::common::xml::parse_tree;
    use std::collections::HashMap;

    fn parse_body_fragment(xml: &[u8], resources: &SharedResources) -> (Vec<Node>, Diagnostics) {
        let tree = parse_tree(xml).unwrap();
        let mut diags = Diagnostics::new();
        let blocks = {
            let mut parser = BodyParser {
                resources,
                diags: &mut diags,
            };
            parser.parse_body(&tree)
        };
        (blocks, diags)
    }

    #[test]
    fn test_parse_paragraph_with_runs() {
        let xml = br#"<w:body>
  <w:p>
    <w:pPr><w:jc w:val="center"/><w:outlineLvl w:val="1"/></w:pPr>
    <w:r><w:rPr><w:b/><w:sz w:val="28"/></w:rPr><w:t>Bold</w:t></w:r>
    <w:r><w:rPr><w:i w:val="0"/></w:rPr><w:t xml:space="preserve"> plain</w:t></w:r>
  </w:p>
</w:body>"#;
        let resources = SharedResources::new();
        let (blocks, diags) = parse_body_fragment(xml, &resources);
        assert!(diags.is_empty());
        assert_eq!(blocks.len(), 1);

        let Node::Element(para) = &blocks[0] else {
            panic!("expected element");
        };
        assert_eq!(para.semantic_type, SemanticType::Paragraph);
        let SchemaProperties::Paragraph(fmt) = &para.properties else {
            panic!("expected paragraph payload");
        };
        assert_eq!(fmt.alignment, Some(Alignment::Center));
        assert_eq!(fmt.outline_level, Some(1));

        let runs: Vec<_> = para.children_of(SemanticType::TextRun).collect();
        assert_eq!(runs.len(), 2);
        let SchemaProperties::TextRun(first) = &runs[0].properties else {
            panic!("expected run payload");
        };
        assert_eq!(first.bold, Some(true));
        assert_eq!(first.size, Some(14.0));
        assert_eq!(first.italic, None);

        let SchemaProperties::TextRun(second) = &runs[1].properties else {
            panic!("expected run payload");
        };
        // Explicit off is preserved, not collapsed into "unset".
        assert_eq!(second.italic, Some(false));
        assert_eq!(second.bold, None);

        assert_eq!(blocks[0].plain_text(), "Bold plain");
    }

    #[test]
    fn test_hyperlink_resolution() {
        let mut resources = SharedResources::new();
        resources.relationships.insert(
            "rId7".to_string(),
            Relationship {
                rel_type: "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink".to_string(),
                target: "https://example.com/page".to_string(),
                mode: crate::ast::RelationshipMode::External,
            },
        );

        let xml = br#"<w:body>
  <w:p>
    <w:hyperlink r:id="rId7"><w:r><w:t>link text</w:t></w:r></w:hyperlink>
    <w:hyperlink w:anchor="section2"><w:r><w:t>internal</w:t></w:r></w:hyperlink>
  </w:p>
</w:body>"#;
        let (blocks, diags) = parse_body_fragment(xml, &resources);
        assert!(diags.is_empty());

        let Node::Element(para) = &blocks[0] else {
            panic!("expected element");
        };
        let links: Vec<_> = para.children_of(SemanticType::Hyperlink).collect();
        assert_eq!(links.len(), 2);

        let SchemaProperties::Hyperlink(external) = &links[0].properties else {
            panic!("expected hyperlink payload");
        };
        assert_eq!(external.url.as_deref(), Some("https://example.com/page"));
        assert_eq!(external.anchor, None);

        let SchemaProperties::Hyperlink(internal) = &links[1].properties else {
            panic!("expected hyperlink payload");
        };
        assert_eq!(internal.url, None);
        assert_eq!(internal.anchor.as_deref(), Some("section2"));
    }

    #[test]
    fn test_numbering_resolved_eagerly() {
        let mut resources = SharedResources::new();
        let mut levels = HashMap::new();
        levels.insert(
            2,
            crate::ast::NumberingLevel {
                level: 2,
                format: Some("lowerRoman".to_string()),
                level_text: Some("%3.".to_string()),
                indent_left: Some(Measurement::dxa(2160.0)),
                indent_hanging: Some(Measurement::dxa(360.0)),
                start: Some(1),
            },
        );
        resources
            .abstract_numbering
            .insert(2, crate::ast::AbstractNumDef { levels });
        resources.numbering_instances.insert(
            5,
            crate::ast::NumInstance {
                abstract_num_id: 2,
                level_overrides: HashMap::new(),
            },
        );

        let xml = br#"<w:body>
  <w:p>
    <w:pPr><w:numPr><w:ilvl w:val="2"/><w:numId w:val="5"/></w:numPr></w:pPr>
    <w:r><w:t>item</w:t></w:r>
  </w:p>
</w:body>"#;
        let (blocks, diags) = parse_body_fragment(xml, &resources);
        assert!(diags.is_empty());

        let Node::Element(para) = &blocks[0] else {
            panic!("expected element");
        };
        let SchemaProperties::Paragraph(fmt) = &para.properties else {
            panic!("expected paragraph payload");
        };
        let num = fmt.numbering.as_ref().unwrap();
        assert_eq!(num.num_id, 5);
        assert_eq!(num.level, 2);
        assert_eq!(num.format.as_deref(), Some("lowerRoman"));
        assert_eq!(num.indent_left.unwrap().value(), 2160.0);
    }

    #[test]
    fn test_unresolved_numbering_degrades() {
        let resources = SharedResources::new();
        let xml = br#"<w:body>
  <w:p>
    <w:pPr><w:numPr><w:numId w:val="99"/></w:numPr></w:pPr>
    <w:r><w:t>item</w:t></w:r>
  </w:p>
</w:body>"#;
        let (blocks, diags) = parse_body_fragment(xml, &resources);
        assert_eq!(blocks.len(), 1);
        assert_eq!(diags.len(), 1);
        assert!(!diags.has_fatal());
    }

    #[test]
    fn test_breaks_and_references() {
        let resources = SharedResources::new();
        let xml = br#"<w:body>
  <w:p>
    <w:r><w:t>before</w:t><w:br w:type="page"/><w:t>after</w:t></w:r>
    <w:r><w:footnoteReference w:id="3"/></w:r>
  </w:p>
</w:body>"#;
        let (blocks, _) = parse_body_fragment(xml, &resources);
        let Node::Element(para) = &blocks[0] else {
            panic!("expected element");
        };

        let kinds: Vec<_> = para
            .children()
            .iter()
            .filter_map(|c| c.semantic_type())
            .collect();
        assert_eq!(
            kinds,
            vec![
                SemanticType::TextRun,
                SemanticType::Break,
                SemanticType::TextRun,
                SemanticType::FootnoteReference
            ]
        );
    }

    #[test]
    fn test_parse_package_end_to_end() {
        let document = br#"<w:document><w:body>
  <w:p><w:r><w:t>one</w:t></w:r></w:p>
  <w:p><w:r><w:t>two</w:t></w:r></w:p>
  <w:tbl>
    <w:tblGrid><w:gridCol w:w="1440"/></w:tblGrid>
    <w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr>
  </w:tbl>
</w:body></w:document>"#;
        let mut parts = HashMap::new();
        parts.insert(
            super::DOCUMENT_PART.to_string(),
            document.to_vec(),
        );
        let pkg = DocxPackage::from_parts(parts).unwrap();

        let mut diags = Diagnostics::new();
        let root = parse_package(&pkg, &mut diags);
        assert!(!diags.has_fatal());
        assert_eq!(root.count_children(SemanticType::Paragraph), 2);
        assert_eq!(root.count_children(SemanticType::Table), 1);
    }

    #[test]
    fn test_malformed_document_part_degrades() {
        let mut parts = HashMap::new();
        parts.insert(
            super::DOCUMENT_PART.to_string(),
            b"<w:document><w:body><w:p></w:body></w:document>".to_vec(),
        );
        let pkg = DocxPackage::from_parts(parts).unwrap();

        let mut diags = Diagnostics::new();
        let root = parse_package(&pkg, &mut diags);
        assert!(root.children.is_empty());
        assert_eq!(diags.fatal_count(), 1);
    }

    #[test]
    fn test_corrupt_archive_yields_empty_root_one_fatal() {
        let mut diags = Diagnostics::new();
        let root = parse_bytes(b"", &mut diags);
        assert!(root.children.is_empty());
        assert_eq!(diags.fatal_count(), 1);

        let mut diags = Diagnostics::new();
        let root = parse_bytes(b"definitely not a zip", &mut diags);
        assert!(root.children.is_empty());
        assert_eq!(diags.fatal_count(), 1);
    }
}
