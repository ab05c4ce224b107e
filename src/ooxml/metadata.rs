//! Core document properties from `docProps/core.xml`.

use chrono::{DateTime, Utc};

use crate::ast::DocumentMetadata;
use crate::common::xml::XmlElement;

/// Parse a `cp:coreProperties` tree.
pub fn parse_core_properties(root: &XmlElement) -> DocumentMetadata {
    let text_of = |name: &str| -> Option<String> {
        root.child(name).map(|e| e.deep_text()).filter(|t| !t.is_empty())
    };
    let date_of = |name: &str| -> Option<DateTime<Utc>> {
        root.child(name)
            .map(|e| e.deep_text())
            .and_then(|t| DateTime::parse_from_rfc3339(t.trim()).ok())
            .map(|dt| dt.with_timezone(&Utc))
    };

    DocumentMetadata {
        title: text_of("dc:title"),
        subject: text_of("dc:subject"),
        author: text_of("dc:creator"),
        keywords: text_of("cp:keywords"),
        description: text_of("dc:description"),
        last_modified_by: text_of("cp:lastModifiedBy"),
        revision: text_of("cp:revision"),
        created: date_of("dcterms:created"),
        modified: date_of("dcterms:modified"),
    }
}
