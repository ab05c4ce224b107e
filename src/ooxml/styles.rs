//! Style definitions from `word/styles.xml`.

use std::collections::HashMap;

use crate::ast::{StyleDefinition, StyleType};
use crate::common::xml::XmlElement;

/// Parse a `w:styles` tree into the style store.
pub fn parse_styles(root: &XmlElement) -> HashMap<String, StyleDefinition> {
    let mut styles = HashMap::new();
    for style in root.children_named("w:style") {
        let Some(style_type) = style.attr("w:type").and_then(StyleType::parse) else {
            continue;
        };
        let Some(style_id) = style.attr("w:styleId") else {
            continue;
        };

        let outline_level = style
            .child("w:pPr")
            .and_then(|ppr| ppr.child("w:outlineLvl"))
            .and_then(|e| e.attr("w:val"))
            .and_then(|v| atoi_simd::parse::<u8>(v.as_bytes()).ok());

        styles.insert(
            style_id.to_string(),
            StyleDefinition {
                style_id: style_id.to_string(),
                name: style
                    .child("w:name")
                    .and_then(|e| e.attr("w:val"))
                    .map(str::to_string),
                style_type,
                based_on: style
                    .child("w:basedOn")
                    .and_then(|e| e.attr("w:val"))
                    .map(str::to_string),
                outline_level,
                default: matches!(style.attr("w:default"), Some("1") | Some("true")),
            },
        );
    }
    styles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::xml::parse_tree;

    #[test]
    fn test_parse_styles() {
        let xml = br#"<w:styles>
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal">
    <w:name w:val="Normal"/>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Heading1">
    <w:name w:val="heading 1"/>
    <w:basedOn w:val="Normal"/>
    <w:pPr><w:outlineLvl w:val="0"/></w:pPr>
  </w:style>
  <w:style w:type="character" w:styleId="Hyperlink">
    <w:name w:val="Hyperlink"/>
  </w:style>
</w:styles>"#;
        let styles = parse_styles(&parse_tree(xml).unwrap());
        assert_eq!(styles.len(), 3);

        let normal = &styles["Normal"];
        assert!(normal.default);
        assert_eq!(normal.style_type, StyleType::Paragraph);

        let h1 = &styles["Heading1"];
        assert_eq!(h1.based_on.as_deref(), Some("Normal"));
        assert_eq!(h1.outline_level, Some(0));

        assert_eq!(styles["Hyperlink"].style_type, StyleType::Character);
    }
}
