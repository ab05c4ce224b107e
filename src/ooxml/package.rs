//! OOXML package access.
//!
//! The parser consumes a package purely as a map of decompressed part bytes
//! by archive path, plus the `.rels` relationship parts parsed into per-part
//! maps. Unzipping is an external concern; [`DocxPackage::from_bytes`] is a
//! convenience that feeds the part map from a ZIP archive in memory.

use std::collections::HashMap;
use std::io::{Cursor, Read};

use crate::ast::{Relationship, RelationshipMode};
use crate::common::error::{Error, Result};
use crate::common::xml;

/// Archive path of the main document part.
pub const DOCUMENT_PART: &str = "word/document.xml";
pub const NUMBERING_PART: &str = "word/numbering.xml";
pub const STYLES_PART: &str = "word/styles.xml";
pub const COMMENTS_PART: &str = "word/comments.xml";
pub const FOOTNOTES_PART: &str = "word/footnotes.xml";
pub const ENDNOTES_PART: &str = "word/endnotes.xml";
pub const CORE_PROPS_PART: &str = "docProps/core.xml";

/// A WordprocessingML package: decompressed parts plus parsed relationships.
#[derive(Debug, Default)]
pub struct DocxPackage {
    parts: HashMap<String, Vec<u8>>,
    /// Relationship maps keyed by the source part path.
    rels: HashMap<String, HashMap<String, Relationship>>,
}

impl DocxPackage {
    /// Build a package from an already-decompressed part map.
    ///
    /// Any `.rels` parts present in the map are parsed into relationship
    /// tables; a missing `word/document.xml` is a fatal precondition.
    pub fn from_parts(parts: HashMap<String, Vec<u8>>) -> Result<Self> {
        if !parts.contains_key(DOCUMENT_PART) {
            return Err(Error::ComponentNotFound(format!(
                "required part {DOCUMENT_PART}"
            )));
        }

        let mut rels = HashMap::new();
        for (path, bytes) in &parts {
            if let Some(source) = rels_source_part(path) {
                let map = parse_rels(bytes)?;
                rels.insert(source, map);
            }
        }

        Ok(Self { parts, rels })
    }

    /// Build the part map from ZIP archive bytes and parse it.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
        let mut parts = HashMap::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            if entry.is_dir() {
                continue;
            }
            let mut data = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut data)?;
            parts.insert(entry.name().to_string(), data);
        }
        Self::from_parts(parts)
    }

    /// Raw bytes of a part, if present.
    pub fn part(&self, path: &str) -> Option<&[u8]> {
        self.parts.get(path).map(|b| b.as_slice())
    }

    /// Relationship map of a part (e.g. `word/document.xml` resolves through
    /// `word/_rels/document.xml.rels`).
    pub fn relationships_for(&self, part_path: &str) -> Option<&HashMap<String, Relationship>> {
        self.rels.get(part_path)
    }

    /// Resolve a relationship target of the document part to an archive
    /// path (targets are relative to `word/`).
    pub fn resolve_document_target(&self, r_id: &str) -> Option<String> {
        let rel = self.relationships_for(DOCUMENT_PART)?.get(r_id)?;
        if rel.is_external() {
            return None;
        }
        let target = rel.target.trim_start_matches('/');
        if target.starts_with("word/") {
            Some(target.to_string())
        } else {
            Some(format!("word/{target}"))
        }
    }
}

/// For a `.rels` path, the part its relationships belong to.
///
/// `word/_rels/document.xml.rels` → `word/document.xml`; the package-level
/// `_rels/.rels` is keyed by the empty string.
fn rels_source_part(path: &str) -> Option<String> {
    let (dir, file) = match path.rfind('/') {
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => ("", path),
    };
    if !dir.ends_with("_rels") {
        return None;
    }
    let stem = file.strip_suffix(".rels")?;
    let parent = dir.strip_suffix("_rels")?.trim_end_matches('/');
    if stem.is_empty() {
        return Some(String::new());
    }
    if parent.is_empty() {
        Some(stem.to_string())
    } else {
        Some(format!("{parent}/{stem}"))
    }
}

/// Parse one `.rels` part into an rId-keyed map.
fn parse_rels(bytes: &[u8]) -> Result<HashMap<String, Relationship>> {
    let root = xml::parse_tree(bytes)?;
    let mut map = HashMap::new();
    for rel in root.child_elements() {
        if rel.name.rsplit(':').next() != Some("Relationship") {
            continue;
        }
        let (Some(id), Some(rel_type), Some(target)) = (
            rel.attr_local("Id"),
            rel.attr_local("Type"),
            rel.attr_local("Target"),
        ) else {
            continue;
        };
        let mode = match rel.attr_local("TargetMode") {
            Some(m) if m.eq_ignore_ascii_case("external") => RelationshipMode::External,
            _ => RelationshipMode::Internal,
        };
        map.insert(
            id.to_string(),
            Relationship {
                rel_type: rel_type.to_string(),
                target: target.to_string(),
                mode,
            },
        );
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC_RELS: &[u8] = br#"<?xml version="1.0"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com/docs/" TargetMode="External"/>
</Relationships>"#;

    fn minimal_parts() -> HashMap<String, Vec<u8>> {
        let mut parts = HashMap::new();
        parts.insert(
            DOCUMENT_PART.to_string(),
            b"<w:document><w:body/></w:document>".to_vec(),
        );
        parts.insert(
            "word/_rels/document.xml.rels".to_string(),
            DOC_RELS.to_vec(),
        );
        parts
    }

    #[test]
    fn test_rels_source_part() {
        assert_eq!(
            rels_source_part("word/_rels/document.xml.rels").as_deref(),
            Some("word/document.xml")
        );
        assert_eq!(rels_source_part("_rels/.rels").as_deref(), Some(""));
        assert_eq!(rels_source_part("word/document.xml"), None);
    }

    #[test]
    fn test_from_parts_parses_rels() {
        let pkg = DocxPackage::from_parts(minimal_parts()).unwrap();
        let rels = pkg.relationships_for(DOCUMENT_PART).unwrap();
        assert_eq!(rels.len(), 2);
        assert_eq!(rels["rId1"].target, "styles.xml");
        assert!(rels["rId2"].is_external());

        assert_eq!(
            pkg.resolve_document_target("rId1").as_deref(),
            Some("word/styles.xml")
        );
        // External targets have no archive path.
        assert_eq!(pkg.resolve_document_target("rId2"), None);
    }

    #[test]
    fn test_missing_document_part_is_fatal() {
        let err = DocxPackage::from_parts(HashMap::new());
        assert!(matches!(err, Err(Error::ComponentNotFound(_))));
    }

    #[test]
    fn test_corrupt_archive() {
        assert!(DocxPackage::from_bytes(b"").is_err());
        assert!(DocxPackage::from_bytes(b"not a zip archive").is_err());
    }
}
