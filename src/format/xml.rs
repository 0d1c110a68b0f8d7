// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Casemodel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of casemodel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Generic XML tree used as the intermediate form for both model and dimensions documents.
//!
//! Reading goes through `quick-xml` events into an owned [`XmlElement`] tree; writing is a
//! deterministic pretty printer so two exports of the same tree are byte-identical.

use std::borrow::Cow;
use std::str;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const INDENT: &str = "    ";

#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    #[error("utf8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("document has no root element")]
    MissingRoot,

    #[error("unexpected structure: {0}")]
    Structure(String),
}

/// One element of a parsed document: tag name, ordered attributes, child elements and text.
///
/// Mixed content is flattened: all text directly inside the element is concatenated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlElement>,
    text: Option<String>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Sets an attribute, replacing an existing value in place so attribute order stays stable.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let index = self.attributes.iter().position(|(key, _)| key == name)?;
        Some(self.attributes.remove(index).1)
    }

    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |child| child.name == name)
    }

    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn push_child(&mut self, child: XmlElement) {
        self.children.push(child);
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text<T: Into<String>>(&mut self, text: Option<T>) {
        self.text = text.map(Into::into).filter(|text| !text.is_empty());
    }

    fn append_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match &mut self.text {
            Some(existing) => existing.push_str(text),
            None => self.text = Some(text.to_owned()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.children.is_empty() && self.text.is_none()
    }
}

/// Parses XML text into an owned element tree.
///
/// Fails when the text is malformed or has no root element; whitespace-only text nodes are
/// dropped.
pub fn parse_xml(input: &str) -> Result<XmlElement, XmlError> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(element_from_start(&e)?),
            Event::Empty(e) => {
                let element = element_from_start(&e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let Some(element) = stack.pop() else {
                    return Err(XmlError::Structure("closing tag without open element".into()));
                };
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(t) => {
                if let Some(current) = stack.last_mut() {
                    let text = t.unescape()?;
                    current.append_text(&text);
                }
            }
            Event::CData(c) => {
                if let Some(current) = stack.last_mut() {
                    let bytes = c.into_inner();
                    current.append_text(str::from_utf8(&bytes)?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(XmlError::Structure(format!("unclosed element <{}>", open.name)));
    }

    root.ok_or(XmlError::MissingRoot)
}

fn element_from_start(e: &BytesStart<'_>) -> Result<XmlElement, XmlError> {
    let mut element = XmlElement::new(str::from_utf8(e.name().as_ref())?);
    for attr in e.attributes() {
        let attr = attr?;
        let key = str::from_utf8(attr.key.as_ref())?.to_owned();
        let value = attr.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), XmlError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(XmlError::Structure(format!(
            "second root element <{}>",
            element.name
        )));
    }
    *root = Some(element);
    Ok(())
}

/// Serializes a tree with an XML declaration and four-space indentation.
pub fn to_xml_string(root: &XmlElement) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(XML_DECLARATION);
    out.push('\n');
    write_element(&mut out, root, 0);
    out
}

fn write_element(out: &mut String, element: &XmlElement, depth: usize) {
    push_indent(out, depth);
    out.push('<');
    out.push_str(&element.name);
    for (key, value) in &element.attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape_attribute(value));
        out.push('"');
    }

    match (&element.text, element.children.is_empty()) {
        (None, true) => out.push_str("/>\n"),
        (Some(text), true) => {
            out.push('>');
            out.push_str(&quick_xml::escape::escape(text.as_str()));
            close_tag(out, &element.name);
        }
        (text, false) => {
            out.push_str(">\n");
            if let Some(text) = text {
                push_indent(out, depth + 1);
                out.push_str(&quick_xml::escape::escape(text.as_str()));
                out.push('\n');
            }
            for child in &element.children {
                write_element(out, child, depth + 1);
            }
            push_indent(out, depth);
            close_tag(out, &element.name);
        }
    }
}

fn close_tag(out: &mut String, name: &str) {
    out.push_str("</");
    out.push_str(name);
    out.push_str(">\n");
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

/// Attribute values additionally encode whitespace control characters, otherwise a reader
/// would normalize them to spaces and the next export would differ.
fn escape_attribute(value: &str) -> Cow<'_, str> {
    let escaped = quick_xml::escape::escape(value);
    if !escaped.contains(['\n', '\r', '\t']) {
        return escaped;
    }
    Cow::Owned(
        escaped
            .replace('\n', "&#10;")
            .replace('\r', "&#13;")
            .replace('\t', "&#9;"),
    )
}

#[cfg(test)]
mod tests {
    use super::{parse_xml, to_xml_string, XmlElement, XmlError};

    #[test]
    fn parses_nested_elements_attributes_and_text() {
        let root = parse_xml(
            r#"<case id="c1" name="Hello">
                 <casePlanModel id="cm"><milestone id="m1"/></casePlanModel>
                 <extensionElements><schema>{ "a": 1 &amp; 2 }</schema></extensionElements>
               </case>"#,
        )
        .expect("parse");

        assert_eq!(root.name(), "case");
        assert_eq!(root.attribute("id"), Some("c1"));
        assert_eq!(root.attribute("missing"), None);
        let plan = root.child("casePlanModel").expect("case plan");
        assert_eq!(plan.children().len(), 1);
        assert_eq!(plan.children()[0].attribute("id"), Some("m1"));
        let schema = root
            .child("extensionElements")
            .and_then(|ext| ext.child("schema"))
            .expect("schema");
        assert_eq!(schema.text(), Some(r#"{ "a": 1 & 2 }"#));
    }

    #[test]
    fn rejects_documents_without_root() {
        let err = parse_xml("   ").unwrap_err();
        assert!(matches!(err, XmlError::MissingRoot));
    }

    #[test]
    fn rejects_malformed_documents() {
        assert!(parse_xml("<case><stage></case>").is_err());
        assert!(parse_xml("<a/><b/>").is_err());
    }

    #[test]
    fn export_is_stable_and_reparses_to_same_tree() {
        let mut root = XmlElement::new("case");
        root.set_attribute("id", "c1");
        root.set_attribute("description", "line one\nline two");
        let mut text = XmlElement::new("body");
        text.set_text(Some("a < b"));
        root.push_child(text);
        root.push_child(XmlElement::new("empty"));

        let xml = to_xml_string(&root);
        assert!(xml.contains("line one&#10;line two"));
        assert!(xml.contains("<body>a &lt; b</body>"));
        assert!(xml.contains("<empty/>"));

        let reparsed = parse_xml(&xml).expect("reparse");
        assert_eq!(reparsed, root);
        assert_eq!(to_xml_string(&reparsed), xml);
    }

    #[test]
    fn set_attribute_replaces_in_place() {
        let mut element = XmlElement::new("x");
        element.set_attribute("a", "1");
        element.set_attribute("b", "2");
        element.set_attribute("a", "3");
        assert_eq!(
            element.attributes(),
            &[("a".to_owned(), "3".to_owned()), ("b".to_owned(), "2".to_owned())]
        );
        assert_eq!(element.remove_attribute("a"), Some("3".to_owned()));
        assert_eq!(element.attribute("a"), None);
    }
}
