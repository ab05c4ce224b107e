//! CommonMark event stream to semantic tree.
//!
//! Headings become paragraphs with an outline level, emphasis and strong
//! map to run tri-states, lists nest as `list`/`listItem`, links wrap their
//! runs in `hyperlink`, and images become drawings carrying the URL for the
//! generator to fetch. Tight list items have no paragraph events of their
//! own, so an implicit paragraph is opened for their inline content.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::ast::{
    DrawingProperties, ElementNode, FontProperties, HyperlinkProperties, ListItemProperties,
    ListKind, ListProperties, Node, ParagraphFormatting, RootNode, SchemaProperties, SemanticType,
};
use crate::common::error::Diagnostics;

use super::SOURCE;

/// Parse Markdown text into a semantic root.
pub fn parse_markdown(input: &str, diags: &mut Diagnostics) -> RootNode {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut builder = Builder {
        root: RootNode::new(),
        open: Vec::new(),
        strong: 0,
        emphasis: 0,
        strikethrough: 0,
        quote_depth: 0,
        code_block: false,
        image_alt: None,
        diags,
    };
    for event in Parser::new_ext(input, options) {
        builder.handle(event);
    }
    builder.finish()
}

/// An element still being built, with whether it was opened implicitly for
/// tight list-item content.
struct Open {
    element: ElementNode,
    implicit: bool,
}

struct Builder<'a> {
    root: RootNode,
    open: Vec<Open>,
    strong: u32,
    emphasis: u32,
    strikethrough: u32,
    quote_depth: u32,
    code_block: bool,
    /// Alt text being collected between image start and end events.
    image_alt: Option<(String, String)>,
    diags: &'a mut Diagnostics,
}

impl Builder<'_> {
    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                if let Some((_, alt)) = &mut self.image_alt {
                    alt.push_str(&text);
                } else {
                    self.push_text(&text, self.code_block);
                }
            },
            Event::Code(code) => self.push_text(&code, true),
            Event::SoftBreak => self.push_text(" ", self.code_block),
            Event::HardBreak => {
                if let Ok(node) = ElementNode::tagged(
                    SemanticType::Break,
                    SchemaProperties::Break(crate::ast::BreakKind::Line),
                ) {
                    self.push_inline(Node::Element(node));
                }
            },
            Event::Rule => {
                let fmt = ParagraphFormatting {
                    thematic_break: true,
                    ..ParagraphFormatting::default()
                };
                match crate::ast::paragraph(fmt) {
                    Ok(p) => self.attach_block(Node::Element(p)),
                    Err(_) => {},
                }
            },
            // Raw HTML and other passthrough events carry no semantics here.
            _ => {},
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.open_paragraph(None, false),
            Tag::Heading { level, .. } => {
                self.open_paragraph(Some(outline_of(level)), false);
            },
            Tag::BlockQuote(_) => self.quote_depth += 1,
            Tag::CodeBlock(_) => {
                self.code_block = true;
                self.open_paragraph(None, false);
            },
            Tag::List(start) => {
                // A nested list inside a tight item arrives while the item's
                // implicit paragraph is still open.
                if self.open.last().is_some_and(|o| o.implicit) {
                    self.close_one();
                }
                let kind = if start.is_some() {
                    ListKind::Number
                } else {
                    ListKind::Bullet
                };
                self.open_element(
                    SemanticType::List,
                    SchemaProperties::List(ListProperties { kind, num_id: None }),
                    false,
                );
            },
            Tag::Item => self.open_element(
                SemanticType::ListItem,
                SchemaProperties::ListItem(ListItemProperties::default()),
                false,
            ),
            Tag::Emphasis => self.emphasis += 1,
            Tag::Strong => self.strong += 1,
            Tag::Strikethrough => self.strikethrough += 1,
            Tag::Link { dest_url, title, .. } => {
                let props = HyperlinkProperties {
                    url: Some(dest_url.to_string()),
                    anchor: None,
                    tooltip: (!title.is_empty()).then(|| title.to_string()),
                };
                self.open_element(
                    SemanticType::Hyperlink,
                    SchemaProperties::Hyperlink(props),
                    false,
                );
            },
            Tag::Image { dest_url, .. } => {
                self.image_alt = Some((dest_url.to_string(), String::new()));
            },
            _ => {},
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph | TagEnd::Heading(_) => self.close_one(),
            TagEnd::BlockQuote(_) => self.quote_depth = self.quote_depth.saturating_sub(1),
            TagEnd::CodeBlock => {
                self.close_one();
                self.code_block = false;
            },
            TagEnd::Item => {
                // A tight item may still have its implicit paragraph open.
                if self.open.last().is_some_and(|o| o.implicit) {
                    self.close_one();
                }
                self.close_one();
            },
            TagEnd::List(_) | TagEnd::Link => self.close_one(),
            TagEnd::Emphasis => self.emphasis = self.emphasis.saturating_sub(1),
            TagEnd::Strong => self.strong = self.strong.saturating_sub(1),
            TagEnd::Strikethrough => {
                self.strikethrough = self.strikethrough.saturating_sub(1);
            },
            TagEnd::Image => {
                if let Some((url, alt)) = self.image_alt.take() {
                    let props = DrawingProperties {
                        url: Some(url),
                        alt: (!alt.is_empty()).then_some(alt),
                        ..DrawingProperties::default()
                    };
                    if let Ok(node) = ElementNode::tagged(
                        SemanticType::Drawing,
                        SchemaProperties::Drawing(props),
                    ) {
                        self.push_inline(Node::Element(node));
                    }
                }
            },
            _ => {},
        }
    }

    fn finish(mut self) -> RootNode {
        while !self.open.is_empty() {
            self.close_one();
        }
        self.root
    }

    fn open_paragraph(&mut self, outline_level: Option<u8>, implicit: bool) {
        let fmt = ParagraphFormatting {
            outline_level,
            style_id: (self.quote_depth > 0).then(|| "Quote".to_string()),
            ..ParagraphFormatting::default()
        };
        self.open_element(
            SemanticType::Paragraph,
            SchemaProperties::Paragraph(fmt),
            implicit,
        );
    }

    fn open_element(&mut self, ty: SemanticType, props: SchemaProperties, implicit: bool) {
        match ElementNode::tagged(ty, props) {
            Ok(element) => self.open.push(Open { element, implicit }),
            Err(e) => {
                self.diags
                    .warn(SOURCE, format!("skipped unbuildable element: {e}"));
            },
        }
    }

    /// Pop the innermost open element and attach it to its parent.
    fn close_one(&mut self) {
        let Some(open) = self.open.pop() else {
            return;
        };
        let node = Node::Element(open.element);
        match node.semantic_type() {
            Some(SemanticType::ListItem) => self.attach_list_item(node),
            Some(ty) if ty.is_block() => self.attach_block(node),
            _ => self.push_inline(node),
        }
    }

    /// Attach a finished item to the innermost open list.
    fn attach_list_item(&mut self, node: Node) {
        for open in self.open.iter_mut().rev() {
            if open.element.semantic_type == SemanticType::List {
                if let Err(e) = open.element.push_child(node) {
                    self.diags.warn(SOURCE, format!("dropped list item: {e}"));
                }
                return;
            }
        }
        self.diags.warn(SOURCE, "list item outside a list, dropped");
    }

    /// Attach a finished block to the innermost open list item, or the root.
    fn attach_block(&mut self, node: Node) {
        for open in self.open.iter_mut().rev() {
            if open.element.semantic_type == SemanticType::ListItem
                || open.element.semantic_type == SemanticType::List
            {
                if let Err(e) = open.element.push_child(node) {
                    self.diags.warn(SOURCE, format!("dropped block: {e}"));
                }
                return;
            }
        }
        if let Err(e) = self.root.push_child(node) {
            self.diags.warn(SOURCE, format!("dropped block: {e}"));
        }
    }

    fn push_text(&mut self, text: &str, monospace: bool) {
        let font = FontProperties {
            bold: (self.strong > 0).then_some(true),
            italic: (self.emphasis > 0).then_some(true),
            strike: (self.strikethrough > 0).then_some(true),
            monospace,
            ..FontProperties::default()
        };
        match crate::ast::text_run(text, font) {
            Ok(run) => self.push_inline(Node::Element(run)),
            Err(e) => {
                self.diags.warn(SOURCE, format!("dropped text run: {e}"));
            },
        }
    }

    /// Attach inline content to the innermost run container, opening an
    /// implicit paragraph for tight list-item content.
    fn push_inline(&mut self, node: Node) {
        let needs_paragraph = match self.open.last() {
            Some(open) => matches!(
                open.element.semantic_type,
                SemanticType::List | SemanticType::ListItem
            ),
            None => true,
        };
        if needs_paragraph {
            self.open_paragraph(None, true);
        }
        if let Some(open) = self.open.last_mut() {
            if let Err(e) = open.element.push_child(node) {
                self.diags.warn(SOURCE, format!("dropped inline node: {e}"));
            }
        }
    }
}

fn outline_of(level: HeadingLevel) -> u8 {
    (level as u8).saturating_sub(1)
}
