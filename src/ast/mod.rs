//! Semantic document tree shared by every front end and back end.
//!
//! The tree is the interchange contract: the DOCX parser, the PDF extraction
//! engine, and the Markdown bridge all emit it, and the DOCX generator
//! consumes it read-only. A node is either the single [`RootNode`], an
//! [`ElementNode`] tagged with a closed [`SemanticType`], or a text leaf.
//!
//! Dispatch is on the semantic type, never on raw schema tag strings, and the
//! per-type property payload is a closed sum ([`SchemaProperties`]): adding a
//! semantic type is a compile error everywhere it is unhandled.
//!
//! Constructors validate parent/child compatibility — a `table` only ever
//! holds `tableRow` children, a `paragraph` only run-like content — so no
//! tree with invalid structure can be built.

pub mod properties;
pub mod resources;

use serde::Serialize;

use crate::common::error::{Error, Result};

pub use properties::{
    Alignment, BorderLine, BorderStyle, BreakKind, CellVerticalAlign, DrawingProperties,
    FontProperties, FontSet, HyperlinkProperties, Indentation, ListItemProperties, ListKind,
    ListProperties, ParagraphFormatting, PdfSourceInfo, ReferenceProperties, ResolvedNumbering,
    SchemaProperties, SemanticType, Spacing, TabAlignment, TabStop, TableCellProperties,
    TableRowProperties, VMergeState, VerticalAlignment, WmlTableProperties,
};
pub use resources::{
    AbstractNumDef, CommentDefinition, DocumentMetadata, NoteDefinition, NumInstance,
    NumberingLevel, Relationship, RelationshipMode, SharedResources, StyleDefinition, StyleType,
};

/// A node in the semantic tree.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Node {
    Root(RootNode),
    Element(ElementNode),
    Text { value: String },
}

impl Node {
    /// Build a text leaf.
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text {
            value: value.into(),
        }
    }

    /// The semantic type, if this is an element.
    pub fn semantic_type(&self) -> Option<SemanticType> {
        match self {
            Node::Element(e) => Some(e.semantic_type),
            _ => None,
        }
    }

    /// Concatenated text content of the subtree.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text { value } => out.push_str(value),
            Node::Element(e) => {
                for child in e.children() {
                    child.collect_text(out);
                }
            },
            Node::Root(r) => {
                for child in &r.children {
                    child.collect_text(out);
                }
            },
        }
    }
}

/// The document root. Exactly one per document; owns every reachable node
/// and the shared per-document resource stores.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RootNode {
    pub children: Vec<Node>,
    pub resources: SharedResources,
    pub metadata: DocumentMetadata,
}

impl RootNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block-level child (paragraph, table, or list).
    pub fn push_child(&mut self, child: Node) -> Result<()> {
        match child.semantic_type() {
            Some(ty) if ty.is_block() => {
                self.children.push(child);
                Ok(())
            },
            Some(ty) => Err(Error::InvalidStructure(format!(
                "{} is not valid at document root",
                ty.as_str()
            ))),
            None => Err(Error::InvalidStructure(
                "only elements are valid at document root".to_string(),
            )),
        }
    }

    /// Count of direct children with the given semantic type.
    pub fn count_children(&self, ty: SemanticType) -> usize {
        self.children
            .iter()
            .filter(|c| c.semantic_type() == Some(ty))
            .count()
    }

    /// Serialize the whole tree to the interchange JSON form.
    ///
    /// This is a debugging/testing surface, not the primary transport.
    pub fn to_interchange_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::Other(format!("Interchange serialization failed: {e}")))
    }
}

/// An element node: a semantic tag plus its schema-specific property payload.
#[derive(Debug, Clone, Serialize)]
pub struct ElementNode {
    /// Original schema tag (e.g. `w:p`), kept for diagnostics.
    pub name: String,
    /// Schema attributes carried through verbatim.
    pub attributes: Vec<(String, String)>,
    children: Vec<Node>,
    pub semantic_type: SemanticType,
    pub properties: SchemaProperties,
}

impl ElementNode {
    /// Create an element, validating that the payload variant matches the
    /// semantic type. No element is ever partially initialized.
    pub fn new(
        name: impl Into<String>,
        semantic_type: SemanticType,
        properties: SchemaProperties,
    ) -> Result<Self> {
        if !properties.matches(semantic_type) {
            return Err(Error::InvalidStructure(format!(
                "property payload {} does not match semantic type {}",
                properties.variant_name(),
                semantic_type.as_str()
            )));
        }
        Ok(Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            semantic_type,
            properties,
        })
    }

    /// Shorthand for elements whose tag is the semantic type name.
    pub fn tagged(semantic_type: SemanticType, properties: SchemaProperties) -> Result<Self> {
        Self::new(semantic_type.as_str(), semantic_type, properties)
    }

    #[inline]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Append a child, enforcing the content model of this element's
    /// semantic type.
    pub fn push_child(&mut self, child: Node) -> Result<()> {
        match &child {
            Node::Root(_) => {
                return Err(Error::InvalidStructure(
                    "root cannot be nested".to_string(),
                ));
            },
            Node::Text { .. } => {
                if !self.semantic_type.allows_text() {
                    return Err(Error::InvalidStructure(format!(
                        "{} does not hold text directly",
                        self.semantic_type.as_str()
                    )));
                }
            },
            Node::Element(e) => {
                if !self.semantic_type.allows_child(e.semantic_type) {
                    return Err(Error::InvalidStructure(format!(
                        "{} is not valid content for {}",
                        e.semantic_type.as_str(),
                        self.semantic_type.as_str()
                    )));
                }
            },
        }
        self.children.push(child);
        Ok(())
    }

    /// Direct children that are elements of the given type.
    pub fn children_of(&self, ty: SemanticType) -> impl Iterator<Item = &ElementNode> {
        self.children.iter().filter_map(move |c| match c {
            Node::Element(e) if e.semantic_type == ty => Some(e),
            _ => None,
        })
    }
}

/// Convenience constructor: a text run holding one string.
pub fn text_run(text: impl Into<String>, font: FontProperties) -> Result<ElementNode> {
    let mut run = ElementNode::tagged(SemanticType::TextRun, SchemaProperties::TextRun(font))?;
    run.push_child(Node::text(text))?;
    Ok(run)
}

/// Convenience constructor: a paragraph with the given formatting.
pub fn paragraph(formatting: ParagraphFormatting) -> Result<ElementNode> {
    ElementNode::tagged(
        SemanticType::Paragraph,
        SchemaProperties::Paragraph(formatting),
    )
}
