//! Generic owned XML tree.
//!
//! Each package part is tokenized once by `quick-xml` into an owned element
//! tree; every schema walk after that is a plain recursive traversal with
//! explicit state rather than event callbacks mutating captured flags. The
//! tree keeps qualified names (`w:p`, `r:id`) because WordprocessingML
//! dispatch is on the prefixed tag.

use quick_xml::Reader;
use quick_xml::events::Event;
use smallvec::{SmallVec, smallvec};

use crate::common::error::{Error, Result};

/// A node in the generic XML tree.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// An element with qualified name, attributes, and ordered children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    /// Qualified tag name, e.g. `w:p`.
    pub name: String,
    /// Attributes in document order, keys qualified, values unescaped.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Look up an attribute by qualified name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Look up an attribute by local name, ignoring any namespace prefix.
    pub fn attr_local(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.rsplit(':').next() == Some(local))
            .map(|(_, v)| v.as_str())
    }

    /// First child element with the given qualified name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.child_elements().find(|e| e.name == name)
    }

    /// All child elements with the given qualified name, in order.
    pub fn children_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.child_elements().filter(move |e| e.name == name)
    }

    /// All child elements in order, skipping text nodes.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|n| match n {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    /// Depth-first search for the first descendant element with the given
    /// qualified name.
    pub fn descendant(&self, name: &str) -> Option<&XmlElement> {
        for child in self.child_elements() {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.descendant(name) {
                return Some(found);
            }
        }
        None
    }

    /// Concatenated text content of this element's direct text children.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            if let XmlNode::Text(t) = child {
                out.push_str(t);
            }
        }
        out
    }

    /// Concatenated text content of the whole subtree.
    pub fn deep_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                XmlNode::Text(t) => out.push_str(t),
                XmlNode::Element(e) => e.collect_text(out),
            }
        }
    }
}

/// Parse an XML part into its root element.
///
/// Builds the tree with an explicit open-element stack; nesting errors from
/// the tokenizer surface as [`Error::XmlError`].
pub fn parse_tree(xml: &[u8]) -> Result<XmlElement> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);
    reader.config_mut().expand_empty_elements = false;

    // Stack of open elements; the sentinel at index 0 collects the root.
    // WordprocessingML nests shallowly, so the common case stays inline.
    let mut stack: SmallVec<[XmlElement; 12]> = smallvec![XmlElement::new("")];
    let mut buf = Vec::with_capacity(1024);

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                stack.push(element_from_start(&e)?);
            },
            Ok(Event::Empty(e)) => {
                let elem = element_from_start(&e)?;
                push_child(&mut stack, XmlNode::Element(elem));
            },
            Ok(Event::End(_)) => {
                let elem = stack
                    .pop()
                    .ok_or_else(|| Error::XmlError("unbalanced end tag".to_string()))?;
                if stack.is_empty() {
                    return Err(Error::XmlError("unbalanced end tag".to_string()));
                }
                push_child(&mut stack, XmlNode::Element(elem));
            },
            Ok(Event::Text(e)) => {
                let text = String::from_utf8_lossy(e.as_ref());
                if !text.is_empty() {
                    push_child(&mut stack, XmlNode::Text(text.into_owned()));
                }
            },
            // References (`&amp;`, `&#xA9;`, ...) arrive as their own events,
            // not inside `Text`.
            Ok(Event::GeneralRef(e)) => {
                let text = resolve_reference(&e)?;
                push_child(&mut stack, XmlNode::Text(text));
            },
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                push_child(&mut stack, XmlNode::Text(text));
            },
            Ok(Event::Eof) => break,
            Ok(_) => {},
            Err(e) => return Err(Error::XmlError(e.to_string())),
        }
        buf.clear();
    }

    if stack.len() != 1 {
        return Err(Error::XmlError("unclosed element at end of part".to_string()));
    }
    let Some(sentinel) = stack.pop() else {
        return Err(Error::XmlError("no root element".to_string()));
    };
    sentinel
        .children
        .into_iter()
        .find_map(|n| match n {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
        .ok_or_else(|| Error::XmlError("no root element".to_string()))
}

fn element_from_start(e: &quick_xml::events::BytesStart<'_>) -> Result<XmlElement> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut elem = XmlElement::new(name);
    for attr in e.attributes() {
        let attr = attr.map_err(|err| Error::XmlError(err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| Error::XmlError(err.to_string()))?
            .into_owned();
        elem.attributes.push((key, value));
    }
    Ok(elem)
}

fn push_child(stack: &mut [XmlElement], node: XmlNode) {
    if let Some(parent) = stack.last_mut() {
        // Text split around references folds back into one node.
        if let (XmlNode::Text(tail), Some(XmlNode::Text(prev))) =
            (&node, parent.children.last_mut())
        {
            prev.push_str(tail);
            return;
        }
        parent.children.push(node);
    }
}

/// Resolve a general reference: numeric character forms plus the five
/// predefined entities. WordprocessingML parts declare nothing else.
fn resolve_reference(e: &quick_xml::events::BytesRef<'_>) -> Result<String> {
    if let Some(ch) = e
        .resolve_char_ref()
        .map_err(|err| Error::XmlError(err.to_string()))?
    {
        return Ok(ch.to_string());
    }
    let name = String::from_utf8_lossy(e.as_ref());
    let ch = match name.as_ref() {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "apos" => '\'',
        "quot" => '"',
        other => {
            return Err(Error::XmlError(format!("undeclared entity &{other};")));
        },
    };
    Ok(ch.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tree() {
        let xml = br#"<w:p><w:r></w:p>"#;
        assert!(parse_tree(xml).is_err());

        let xml = br#"<w:p><w:r><w:t xml:space="preserve">Hello </w:t></w:r><w:r><w:t>world</w:t></w:r></w:p>"#;
        let root = parse_tree(xml).unwrap();
        assert_eq!(root.name, "w:p");
        assert_eq!(root.child_elements().count(), 2);
        assert_eq!(root.deep_text(), "Hello world");

        let first_t = root.child("w:r").unwrap().child("w:t").unwrap();
        assert_eq!(first_t.attr("xml:space"), Some("preserve"));
        assert_eq!(first_t.attr_local("space"), Some("preserve"));
    }

    #[test]
    fn test_entities_unescaped() {
        let xml = br#"<w:t>a &amp; b &lt;c&gt;</w:t>"#;
        let root = parse_tree(xml).unwrap();
        assert_eq!(root.text(), "a & b <c>");
        // Reference resolution must not fragment the text node.
        assert_eq!(root.children.len(), 1);

        let xml = br#"<w:t>&#169; 2024 &#x41;&quot;&apos;</w:t>"#;
        let root = parse_tree(xml).unwrap();
        assert_eq!(root.text(), "\u{a9} 2024 A\"'");

        assert!(parse_tree(br#"<w:t>&nbsp;</w:t>"#).is_err());
    }

    #[test]
    fn test_empty_elements() {
        let xml = br#"<w:pPr><w:jc w:val="center"/><w:outlineLvl w:val="1"/></w:pPr>"#;
        let root = parse_tree(xml).unwrap();
        assert_eq!(root.child("w:jc").unwrap().attr("w:val"), Some("center"));
        assert_eq!(root.children_named("w:outlineLvl").count(), 1);
    }
}
