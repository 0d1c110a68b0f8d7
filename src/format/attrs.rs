// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Casemodel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of casemodel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Typed attribute and child-element access on [`XmlElement`] with default fallback.
//!
//! Readers never fail: a missing value yields the caller's default and a malformed value also
//! yields the default plus a [`Diagnostic`] pushed onto the caller's list. Writers omit values
//! that are absent, empty or equal to the declared default so exports stay minimal.

use crate::diagnostic::Diagnostic;

use super::xml::XmlElement;

/// Returns a non-empty attribute value.
pub fn read_string(node: &XmlElement, name: &str) -> Option<String> {
    node.attribute(name)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}

pub fn read_string_or(node: &XmlElement, name: &str, default: &str) -> String {
    read_string(node, name).unwrap_or_else(|| default.to_owned())
}

pub fn read_bool(
    node: &XmlElement,
    name: &str,
    default: bool,
    owner_id: Option<&str>,
    diagnostics: &mut Vec<Diagnostic>,
) -> bool {
    let Some(raw) = node.attribute(name) else {
        return default;
    };
    match raw.trim() {
        "" => default,
        "true" | "TRUE" | "True" | "1" => true,
        "false" | "FALSE" | "False" | "0" => false,
        other => {
            diagnostics.push(Diagnostic::warning(
                owner_id,
                format!("attribute {name}=\"{other}\" on <{}> is not a boolean", node.name()),
            ));
            default
        }
    }
}

pub fn read_i64(
    node: &XmlElement,
    name: &str,
    default: i64,
    owner_id: Option<&str>,
    diagnostics: &mut Vec<Diagnostic>,
) -> i64 {
    read_number(node, name, owner_id, diagnostics, |raw| raw.parse::<i64>().ok())
        .unwrap_or(default)
}

pub fn read_f64(
    node: &XmlElement,
    name: &str,
    default: f64,
    owner_id: Option<&str>,
    diagnostics: &mut Vec<Diagnostic>,
) -> f64 {
    read_number(node, name, owner_id, diagnostics, |raw| {
        raw.parse::<f64>().ok().filter(|value| value.is_finite())
    })
    .unwrap_or(default)
}

fn read_number<T>(
    node: &XmlElement,
    name: &str,
    owner_id: Option<&str>,
    diagnostics: &mut Vec<Diagnostic>,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Option<T> {
    let Some(raw) = node.attribute(name) else {
        diagnostics.push(Diagnostic::warning(
            owner_id,
            format!("attribute {name} is missing on <{}>", node.name()),
        ));
        return None;
    };
    let parsed = parse(raw.trim());
    if parsed.is_none() {
        diagnostics.push(Diagnostic::warning(
            owner_id,
            format!("attribute {name}=\"{raw}\" on <{}> is not a number", node.name()),
        ));
    }
    parsed
}

/// Returns the trimmed, non-empty text of a child element.
pub fn read_child_text(node: &XmlElement, tag: &str) -> Option<String> {
    node.child(tag)
        .and_then(XmlElement::text)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToOwned::to_owned)
}

/// Instantiates one value per child element with the given tag, in document order.
pub fn parse_children<T>(
    node: &XmlElement,
    tag: &str,
    mut construct: impl FnMut(&XmlElement) -> T,
) -> Vec<T> {
    node.children_named(tag).map(|child| construct(child)).collect()
}

/// Instantiates a value from the first child element with the given tag.
pub fn parse_child<T>(
    node: &XmlElement,
    tag: &str,
    construct: impl FnOnce(&XmlElement) -> T,
) -> Option<T> {
    node.child(tag).map(construct)
}

/// Attributes of `node` whose names are not listed in `known`, in document order.
pub fn unknown_attributes(node: &XmlElement, known: &[&str]) -> Vec<(String, String)> {
    node.attributes()
        .iter()
        .filter(|(key, _)| !known.contains(&key.as_str()))
        .cloned()
        .collect()
}

/// Child elements of `node` whose tags are not listed in `known`, in document order.
pub fn unknown_children(node: &XmlElement, known: &[&str]) -> Vec<XmlElement> {
    node.children()
        .iter()
        .filter(|child| !known.contains(&child.name()))
        .cloned()
        .collect()
}

pub fn write_string(node: &mut XmlElement, name: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|value| !value.is_empty()) {
        node.set_attribute(name, value);
    }
}

pub fn write_bool(node: &mut XmlElement, name: &str, value: bool, default: bool) {
    if value != default {
        node.set_attribute(name, if value { "true" } else { "false" });
    }
}

pub fn write_number(node: &mut XmlElement, name: &str, value: f64) {
    node.set_attribute(name, format_number(value));
}

/// Formats integral values without a fractional part (`20`, not `20.0`).
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Appends `<tag>text</tag>` when the text is present and non-empty.
pub fn write_text_child(node: &mut XmlElement, tag: &str, text: Option<&str>) {
    if let Some(text) = text.filter(|text| !text.is_empty()) {
        let mut child = XmlElement::new(tag);
        child.set_text(Some(text));
        node.push_child(child);
    }
}
