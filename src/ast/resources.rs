//! Shared per-document resource stores.
//!
//! Attached to the root node, referenced by id from elements: style
//! definitions, abstract/instance numbering, comments, footnotes/endnotes,
//! header/footer parts, relationship maps. Built once during parsing and
//! immutable afterwards except for generator-side reads.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

use crate::common::unit::Measurement;

use super::RootNode;

/// Relationship target mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationshipMode {
    #[default]
    Internal,
    External,
}

/// One entry from a `.rels` part.
#[derive(Debug, Clone, Serialize)]
pub struct Relationship {
    pub rel_type: String,
    pub target: String,
    pub mode: RelationshipMode,
}

impl Relationship {
    #[inline]
    pub fn is_external(&self) -> bool {
        self.mode == RelationshipMode::External
    }
}

/// Style kind from `w:style w:type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleType {
    Paragraph,
    Character,
    Table,
    Numbering,
}

impl StyleType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "paragraph" => Some(Self::Paragraph),
            "character" => Some(Self::Character),
            "table" => Some(Self::Table),
            "numbering" => Some(Self::Numbering),
            _ => None,
        }
    }
}

/// One style definition from `word/styles.xml`.
#[derive(Debug, Clone, Serialize)]
pub struct StyleDefinition {
    pub style_id: String,
    pub name: Option<String>,
    pub style_type: StyleType,
    pub based_on: Option<String>,
    /// Outline level the style assigns, if any (heading styles).
    pub outline_level: Option<u8>,
    pub default: bool,
}

/// One level of an abstract numbering definition.
#[derive(Debug, Clone, Serialize)]
pub struct NumberingLevel {
    pub level: u8,
    /// `w:numFmt` value (e.g. "decimal", "bullet", "lowerRoman").
    pub format: Option<String>,
    /// `w:lvlText` pattern (e.g. "%1.").
    pub level_text: Option<String>,
    pub indent_left: Option<Measurement>,
    pub indent_hanging: Option<Measurement>,
    /// Start value for ordered levels.
    pub start: Option<u32>,
}

/// An abstract numbering definition (template).
#[derive(Debug, Clone, Default, Serialize)]
pub struct AbstractNumDef {
    pub levels: HashMap<u8, NumberingLevel>,
}

impl AbstractNumDef {
    pub fn level(&self, ilvl: u8) -> Option<&NumberingLevel> {
        self.levels.get(&ilvl)
    }
}

/// A numbering instance: a concrete use of an abstract definition, with
/// optional per-level overrides.
#[derive(Debug, Clone, Serialize)]
pub struct NumInstance {
    pub abstract_num_id: u32,
    pub level_overrides: HashMap<u8, NumberingLevel>,
}

/// A comment definition from `word/comments.xml`.
#[derive(Debug, Clone, Serialize)]
pub struct CommentDefinition {
    pub author: Option<String>,
    pub initials: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub text: String,
}

/// A footnote or endnote definition.
#[derive(Debug, Clone, Serialize)]
pub struct NoteDefinition {
    /// `w:type` attribute ("separator", "continuationSeparator", or none
    /// for regular notes).
    pub note_type: Option<String>,
    pub text: String,
}

/// Document core properties from `docProps/core.xml`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub author: Option<String>,
    pub keywords: Option<String>,
    pub description: Option<String>,
    pub last_modified_by: Option<String>,
    pub revision: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
}

impl DocumentMetadata {
    /// Whether any property carries data.
    pub fn has_data(&self) -> bool {
        self.title.is_some()
            || self.subject.is_some()
            || self.author.is_some()
            || self.keywords.is_some()
            || self.description.is_some()
            || self.last_modified_by.is_some()
            || self.revision.is_some()
            || self.created.is_some()
            || self.modified.is_some()
    }
}

/// The shared per-document side tables.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SharedResources {
    pub styles: HashMap<String, StyleDefinition>,
    pub abstract_numbering: HashMap<u32, AbstractNumDef>,
    pub numbering_instances: HashMap<u32, NumInstance>,
    pub comments: HashMap<String, CommentDefinition>,
    pub footnotes: HashMap<String, NoteDefinition>,
    pub endnotes: HashMap<String, NoteDefinition>,
    /// Relationship map of the main document part, keyed by rId.
    pub relationships: HashMap<String, Relationship>,
    /// Header parts parsed into sub-trees, keyed by rId.
    pub headers: HashMap<String, RootNode>,
    /// Footer parts parsed into sub-trees, keyed by rId.
    pub footers: HashMap<String, RootNode>,
}

impl SharedResources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve an external hyperlink relationship to its URL.
    pub fn hyperlink_target(&self, r_id: &str) -> Option<&str> {
        self.relationships
            .get(r_id)
            .filter(|rel| rel.is_external())
            .map(|rel| rel.target.as_str())
    }

    /// Resolve a `{numId, ilvl}` pair to the effective numbering level,
    /// applying instance level overrides over the abstract definition.
    pub fn resolve_numbering(&self, num_id: u32, ilvl: u8) -> Option<&NumberingLevel> {
        let instance = self.numbering_instances.get(&num_id)?;
        if let Some(over) = instance.level_overrides.get(&ilvl) {
            return Some(over);
        }
        self.abstract_numbering
            .get(&instance.abstract_num_id)?
            .level(ilvl)
    }
}
