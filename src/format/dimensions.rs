// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Casemodel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of casemodel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The dimensions document (`CMMNDI`): one diagram of shapes and edges.
//!
//! Malformed or missing numbers never fail the load. They become `0` and leave a
//! diagnostic on the shape or edge that carried them.

use tracing::debug;

use crate::diagnostic::Diagnostic;
use crate::model::{Bounds, Dimensions, Edge, Shape, Waypoint};

use super::attrs::{read_f64, read_string, unknown_attributes, write_number};
use super::xml::{parse_xml, XmlElement};
use super::{Exportable, ParseModelError};

const ROOT: &str = "CMMNDI";
const DIAGRAM: &str = "CMMNDiagram";
const SHAPE: &str = "CMMNShape";
const EDGE: &str = "CMMNEdge";
const BOUNDS: &str = "Bounds";
const WAYPOINT: &str = "waypoint";
const LABEL: &str = "CMMNLabel";

const ELEMENT_REF: &str = "cmmnElementRef";
const SOURCE_REF: &str = "sourceCMMNElementRef";
const TARGET_REF: &str = "targetCMMNElementRef";

pub fn parse_dimensions(xml: &str) -> Result<Dimensions, ParseModelError> {
    let root = parse_xml(xml)?;
    if root.name() != ROOT {
        return Err(ParseModelError::UnexpectedRoot {
            expected: ROOT,
            found: root.name().to_owned(),
        });
    }

    let mut dimensions = Dimensions::new();
    dimensions.root_attributes = root.attributes().to_vec();

    let mut diagram_seen = false;
    for child in root.children() {
        if child.name() == DIAGRAM && !diagram_seen {
            diagram_seen = true;
            parse_diagram(child, &mut dimensions);
        } else {
            dimensions.root_extras.push(child.clone());
        }
    }

    debug!(
        shapes = dimensions.shapes.len(),
        edges = dimensions.edges.len(),
        diagnostics = dimensions.diagnostics().len(),
        "parsed dimensions document"
    );
    Ok(dimensions)
}

fn parse_diagram(diagram: &XmlElement, dimensions: &mut Dimensions) {
    dimensions.diagram_attributes = diagram.attributes().to_vec();
    for child in diagram.children() {
        match child.name() {
            SHAPE => {
                let Some(shape) = parse_shape(child, &mut dimensions.diagnostics) else {
                    continue;
                };
                if dimensions.shape(shape.cmmn_element_ref()).is_some() {
                    dimensions.diagnostics.push(Diagnostic::warning(
                        Some(shape.cmmn_element_ref()),
                        "second shape for the same element dropped",
                    ));
                    continue;
                }
                dimensions.shapes.push(shape);
            }
            EDGE => {
                if let Some(edge) = parse_edge(child, &mut dimensions.diagnostics) {
                    dimensions.edges.push(edge);
                }
            }
            _ => dimensions.diagram_extras.push(child.clone()),
        }
    }
}

fn parse_shape(node: &XmlElement, document: &mut Vec<Diagnostic>) -> Option<Shape> {
    let Some(element_ref) = read_string(node, ELEMENT_REF) else {
        document.push(Diagnostic::warning(
            None,
            format!("<{SHAPE}> without {ELEMENT_REF} skipped"),
        ));
        return None;
    };

    let mut diagnostics = Vec::new();
    let bounds = read_bounds(node.child(BOUNDS), node.name(), &element_ref, &mut diagnostics);
    let mut shape = Shape::new(element_ref, bounds);
    shape.extra_attributes = unknown_attributes(node, &[ELEMENT_REF]);
    shape.diagnostics = diagnostics;
    Some(shape)
}

fn parse_edge(node: &XmlElement, document: &mut Vec<Diagnostic>) -> Option<Edge> {
    let (Some(source), Some(target)) = (read_string(node, SOURCE_REF), read_string(node, TARGET_REF))
    else {
        document.push(Diagnostic::warning(
            None,
            format!("<{EDGE}> without {SOURCE_REF} or {TARGET_REF} skipped"),
        ));
        return None;
    };

    let mut diagnostics = Vec::new();
    let owner = Some(source.as_str());
    let waypoints = node
        .children_named(WAYPOINT)
        .map(|point| Waypoint {
            x: read_f64(point, "x", 0.0, owner, &mut diagnostics),
            y: read_f64(point, "y", 0.0, owner, &mut diagnostics),
        })
        .collect();
    let label = node
        .child(LABEL)
        .map(|label| read_bounds(label.child(BOUNDS), LABEL, &source, &mut diagnostics));

    let mut edge = Edge::new(source, target);
    edge.waypoints = waypoints;
    edge.label = label;
    edge.extra_attributes = unknown_attributes(node, &[SOURCE_REF, TARGET_REF]);
    edge.diagnostics = diagnostics;
    Some(edge)
}

fn read_bounds(
    node: Option<&XmlElement>,
    holder: &str,
    owner: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Bounds {
    let Some(node) = node else {
        diagnostics.push(Diagnostic::warning(
            Some(owner),
            format!("<{holder}> has no <{BOUNDS}>"),
        ));
        return Bounds::default();
    };
    let owner = Some(owner);
    Bounds {
        x: read_f64(node, "x", 0.0, owner, diagnostics),
        y: read_f64(node, "y", 0.0, owner, diagnostics),
        width: read_f64(node, "width", 0.0, owner, diagnostics),
        height: read_f64(node, "height", 0.0, owner, diagnostics),
    }
}

fn bounds_node(bounds: &Bounds) -> XmlElement {
    let mut node = XmlElement::new(BOUNDS);
    write_number(&mut node, "x", bounds.x);
    write_number(&mut node, "y", bounds.y);
    write_number(&mut node, "width", bounds.width);
    write_number(&mut node, "height", bounds.height);
    node
}

fn set_attributes(node: &mut XmlElement, attributes: &[(String, String)]) {
    for (name, value) in attributes {
        node.set_attribute(name.as_str(), value.as_str());
    }
}

impl Exportable for Dimensions {
    fn to_xml_tree(&self) -> XmlElement {
        let mut diagram = XmlElement::new(DIAGRAM);
        set_attributes(&mut diagram, &self.diagram_attributes);

        for shape in &self.shapes {
            let mut node = XmlElement::new(SHAPE);
            node.set_attribute(ELEMENT_REF, shape.cmmn_element_ref());
            set_attributes(&mut node, &shape.extra_attributes);
            node.push_child(bounds_node(&shape.bounds));
            diagram.push_child(node);
        }

        for edge in &self.edges {
            let mut node = XmlElement::new(EDGE);
            node.set_attribute(SOURCE_REF, edge.source_ref.as_str());
            node.set_attribute(TARGET_REF, edge.target_ref.as_str());
            set_attributes(&mut node, &edge.extra_attributes);
            for point in &edge.waypoints {
                let mut waypoint = XmlElement::new(WAYPOINT);
                write_number(&mut waypoint, "x", point.x);
                write_number(&mut waypoint, "y", point.y);
                node.push_child(waypoint);
            }
            if let Some(label) = &edge.label {
                node.push_child(XmlElement::new(LABEL).with_child(bounds_node(label)));
            }
            diagram.push_child(node);
        }

        for extra in &self.diagram_extras {
            diagram.push_child(extra.clone());
        }

        let mut root = XmlElement::new(ROOT);
        set_attributes(&mut root, &self.root_attributes);
        root.push_child(diagram);
        for extra in &self.root_extras {
            root.push_child(extra.clone());
        }
        root
    }
}

#[cfg(test)]
mod tests {
    use super::parse_dimensions;
    use crate::format::{Exportable, ParseModelError};
    use crate::model::fixtures::{claims_dimensions, legacy_dimensions, CLAIMS_DIMENSIONS};
    use crate::model::Bounds;

    #[test]
    fn claims_dimensions_parse_shapes_edges_and_labels() {
        let dimensions = claims_dimensions();
        assert_eq!(dimensions.shapes().len(), 9);
        assert_eq!(dimensions.edges().len(), 2);
        assert!(dimensions.diagnostics().is_empty());

        assert_eq!(
            dimensions.shape("ht__abc12_0").map(|shape| shape.bounds),
            Some(Bounds::new(100.0, 110.0, 140.0, 80.0))
        );
        let timer_edge = &dimensions.edges()[1];
        assert_eq!(timer_edge.source_ref, "tmr__abc12_0");
        assert_eq!(timer_edge.waypoints.len(), 2);
        assert_eq!(timer_edge.label, Some(Bounds::new(650.0, 290.0, 40.0, 12.0)));
    }

    #[test]
    fn export_matches_fixture_text() {
        assert_eq!(claims_dimensions().to_xml(), CLAIMS_DIMENSIONS);
    }

    #[test]
    fn malformed_bounds_are_recovered_per_shape() {
        let dimensions = legacy_dimensions();
        let shape = dimensions.shape("ue_start").expect("shape");
        assert_eq!(shape.bounds.x, 0.0);
        assert_eq!(shape.bounds.y, 200.0);
        assert_eq!(shape.diagnostics().len(), 1);
        assert_eq!(shape.diagnostics()[0].element_id(), Some("ue_start"));
        assert_eq!(dimensions.diagnostics().len(), 1);
    }

    #[test]
    fn shapes_without_reference_and_duplicates_are_skipped() {
        let dimensions = parse_dimensions(
            r#"<CMMNDI><CMMNDiagram>
                <CMMNShape><Bounds x="1" y="1" width="1" height="1"/></CMMNShape>
                <CMMNShape cmmnElementRef="a"><Bounds x="1" y="2" width="3" height="4"/></CMMNShape>
                <CMMNShape cmmnElementRef="a"><Bounds x="9" y="9" width="9" height="9"/></CMMNShape>
                <CMMNShape cmmnElementRef="b"/>
            </CMMNDiagram></CMMNDI>"#,
        )
        .expect("parse");

        assert_eq!(dimensions.shapes().len(), 2);
        assert_eq!(
            dimensions.shape("a").map(|shape| shape.bounds),
            Some(Bounds::new(1.0, 2.0, 3.0, 4.0))
        );
        assert_eq!(dimensions.diagnostics().len(), 3);
    }

    #[test]
    fn wrong_or_missing_root_is_a_load_failure() {
        assert!(matches!(
            parse_dimensions("<case/>"),
            Err(ParseModelError::UnexpectedRoot { expected: "CMMNDI", .. })
        ));
        assert!(matches!(
            parse_dimensions(""),
            Err(ParseModelError::Xml(_))
        ));
    }

    #[test]
    fn empty_document_exports_an_empty_diagram() {
        let dimensions = parse_dimensions("<CMMNDI/>").expect("parse");
        assert!(dimensions.shapes().is_empty());
        assert!(dimensions.to_xml().contains("<CMMNDiagram/>"));
    }
}
