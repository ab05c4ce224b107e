//! Numbering definitions from `word/numbering.xml`.
//!
//! Abstract definitions are templates; instances reference them by id and
//! may override individual levels. Paragraph `w:numPr` references are
//! resolved eagerly during body parsing through
//! [`SharedResources::resolve_numbering`](crate::ast::SharedResources::resolve_numbering),
//! so consumers never re-resolve.

use std::collections::HashMap;

use crate::ast::{AbstractNumDef, NumInstance, NumberingLevel};
use crate::common::unit::Measurement;
use crate::common::xml::XmlElement;

/// Parsed numbering stores: `(abstract definitions, instances)`.
pub type NumberingStores = (HashMap<u32, AbstractNumDef>, HashMap<u32, NumInstance>);

/// Parse a `w:numbering` tree into the shared stores.
pub fn parse_numbering(root: &XmlElement) -> NumberingStores {
    let mut abstract_nums = HashMap::new();
    let mut instances = HashMap::new();

    for child in root.child_elements() {
        match child.name.as_str() {
            "w:abstractNum" => {
                let Some(id) = parse_u32_attr(child, "w:abstractNumId") else {
                    continue;
                };
                let mut def = AbstractNumDef::default();
                for lvl in child.children_named("w:lvl") {
                    if let Some(level) = parse_level(lvl) {
                        def.levels.insert(level.level, level);
                    }
                }
                abstract_nums.insert(id, def);
            },
            "w:num" => {
                let Some(num_id) = parse_u32_attr(child, "w:numId") else {
                    continue;
                };
                let Some(abstract_id) = child
                    .child("w:abstractNumId")
                    .and_then(|e| val_u32(e))
                else {
                    continue;
                };
                let mut level_overrides = HashMap::new();
                for over in child.children_named("w:lvlOverride") {
                    let Some(ilvl) = parse_u32_attr(over, "w:ilvl") else {
                        continue;
                    };
                    if let Some(level) = over.child("w:lvl").and_then(parse_level) {
                        level_overrides.insert(ilvl as u8, level);
                    }
                }
                instances.insert(
                    num_id,
                    NumInstance {
                        abstract_num_id: abstract_id,
                        level_overrides,
                    },
                );
            },
            _ => {},
        }
    }

    (abstract_nums, instances)
}

/// Parse one `w:lvl` element.
fn parse_level(lvl: &XmlElement) -> Option<NumberingLevel> {
    let ilvl = parse_u32_attr(lvl, "w:ilvl")? as u8;

    let indent = lvl.child("w:pPr").and_then(|ppr| ppr.child("w:ind"));
    let indent_left = indent
        .and_then(|ind| ind.attr("w:left").or_else(|| ind.attr("w:start")))
        .and_then(measure_dxa);
    let indent_hanging = indent.and_then(|ind| ind.attr("w:hanging")).and_then(measure_dxa);

    Some(NumberingLevel {
        level: ilvl,
        format: lvl
            .child("w:numFmt")
            .and_then(|e| e.attr("w:val"))
            .map(str::to_string),
        level_text: lvl
            .child("w:lvlText")
            .and_then(|e| e.attr("w:val"))
            .map(str::to_string),
        indent_left,
        indent_hanging,
        start: lvl.child("w:start").and_then(val_u32),
    })
}

fn parse_u32_attr(elem: &XmlElement, attr: &str) -> Option<u32> {
    elem.attr(attr)
        .and_then(|v| atoi_simd::parse::<u32>(v.as_bytes()).ok())
}

fn val_u32(elem: &XmlElement) -> Option<u32> {
    elem.attr("w:val")
        .and_then(|v| atoi_simd::parse::<u32>(v.as_bytes()).ok())
}

fn measure_dxa(value: &str) -> Option<Measurement> {
    value.parse::<f64>().ok().map(Measurement::dxa)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::SharedResources;
    use crate::common::xml::parse_tree;

    const NUMBERING_XML: &[u8] = br#"<w:numbering>
  <w:abstractNum w:abstractNumId="2">
    <w:lvl w:ilvl="0">
      <w:start w:val="1"/>
      <w:numFmt w:val="decimal"/>
      <w:lvlText w:val="%1."/>
      <w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr>
    </w:lvl>
    <w:lvl w:ilvl="2">
      <w:start w:val="1"/>
      <w:numFmt w:val="lowerRoman"/>
      <w:lvlText w:val="%3."/>
      <w:pPr><w:ind w:left="2160" w:hanging="360"/></w:pPr>
    </w:lvl>
  </w:abstractNum>
  <w:num w:numId="5">
    <w:abstractNumId w:val="2"/>
    <w:lvlOverride w:ilvl="2">
      <w:lvl w:ilvl="2">
        <w:numFmt w:val="upperLetter"/>
        <w:lvlText w:val="%3)"/>
      </w:lvl>
    </w:lvlOverride>
  </w:num>
</w:numbering>"#;

    #[test]
    fn test_parse_numbering() {
        let tree = parse_tree(NUMBERING_XML).unwrap();
        let (abstract_nums, instances) = parse_numbering(&tree);

        let def = &abstract_nums[&2];
        let lvl0 = def.level(0).unwrap();
        assert_eq!(lvl0.format.as_deref(), Some("decimal"));
        assert_eq!(lvl0.level_text.as_deref(), Some("%1."));
        assert_eq!(lvl0.indent_left.unwrap().value(), 720.0);
        assert_eq!(lvl0.indent_hanging.unwrap().value(), 360.0);

        let inst = &instances[&5];
        assert_eq!(inst.abstract_num_id, 2);
        assert_eq!(inst.level_overrides.len(), 1);
    }

    #[test]
    fn test_override_applies_through_resolution() {
        let tree = parse_tree(NUMBERING_XML).unwrap();
        let (abstract_nums, instances) = parse_numbering(&tree);

        let mut res = SharedResources::new();
        res.abstract_numbering = abstract_nums;
        res.numbering_instances = instances;

        // Level 2 of numId 5 is overridden from lowerRoman to upperLetter.
        let resolved = res.resolve_numbering(5, 2).unwrap();
        assert_eq!(resolved.format.as_deref(), Some("upperLetter"));
        assert_eq!(resolved.level_text.as_deref(), Some("%3)"));

        // Level 0 falls through to the abstract definition.
        let resolved = res.resolve_numbering(5, 0).unwrap();
        assert_eq!(resolved.format.as_deref(), Some("decimal"));
    }
}
