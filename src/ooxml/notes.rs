//! Comments, footnotes, and endnotes parts.
//!
//! Definitions are parsed into the shared stores; body reference elements
//! keep only the id and dereference through the stores.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::ast::{CommentDefinition, NoteDefinition};
use crate::common::xml::XmlElement;

/// Parse `word/comments.xml` into the comment store.
pub fn parse_comments(root: &XmlElement) -> HashMap<String, CommentDefinition> {
    let mut comments = HashMap::new();
    for comment in root.children_named("w:comment") {
        let Some(id) = comment.attr("w:id") else {
            continue;
        };
        comments.insert(
            id.to_string(),
            CommentDefinition {
                author: comment.attr("w:author").map(str::to_string),
                initials: comment.attr("w:initials").map(str::to_string),
                date: comment.attr("w:date").and_then(parse_w3cdtf),
                text: collect_run_text(comment),
            },
        );
    }
    comments
}

/// Parse `word/footnotes.xml` or `word/endnotes.xml`.
///
/// `tag` selects `w:footnote` or `w:endnote`.
pub fn parse_notes(root: &XmlElement, tag: &str) -> HashMap<String, NoteDefinition> {
    let mut notes = HashMap::new();
    for note in root.children_named(tag) {
        let Some(id) = note.attr("w:id") else {
            continue;
        };
        notes.insert(
            id.to_string(),
            NoteDefinition {
                note_type: note.attr("w:type").map(str::to_string),
                text: collect_run_text(note),
            },
        );
    }
    notes
}

/// Text of every `w:t` descendant, in document order.
fn collect_run_text(elem: &XmlElement) -> String {
    let mut out = String::new();
    collect_wt(elem, &mut out);
    out
}

fn collect_wt(elem: &XmlElement, out: &mut String) {
    for child in elem.child_elements() {
        if child.name == "w:t" {
            out.push_str(&child.text());
        } else {
            collect_wt(child, out);
        }
    }
}

fn parse_w3cdtf(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::xml::parse_tree;

    #[test]
    fn test_parse_comments() {
        let xml = br#"<w:comments>
  <w:comment w:id="1" w:author="Reviewer" w:initials="RV" w:date="2024-03-01T10:30:00Z">
    <w:p><w:r><w:t>Needs a citation.</w:t></w:r></w:p>
  </w:comment>
</w:comments>"#;
        let comments = parse_comments(&parse_tree(xml).unwrap());
        let c = &comments["1"];
        assert_eq!(c.author.as_deref(), Some("Reviewer"));
        assert_eq!(c.text, "Needs a citation.");
        assert!(c.date.is_some());
    }

    #[test]
    fn test_parse_footnotes() {
        let xml = br#"<w:footnotes>
  <w:footnote w:type="separator" w:id="-1"><w:p/></w:footnote>
  <w:footnote w:id="2">
    <w:p><w:r><w:t>See appendix A.</w:t></w:r></w:p>
  </w:footnote>
</w:footnotes>"#;
        let notes = parse_notes(&parse_tree(xml).unwrap(), "w:footnote");
        assert_eq!(notes.len(), 2);
        assert_eq!(notes["2"].text, "See appendix A.");
        assert_eq!(notes["-1"].note_type.as_deref(), Some("separator"));
    }
}
