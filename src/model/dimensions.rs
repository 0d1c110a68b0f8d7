// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Casemodel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of casemodel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use tracing::{debug, info};

use crate::diagnostic::Diagnostic;
use crate::format::xml::XmlElement;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
}

/// Visual record of one element, keyed by the element id (`cmmnElementRef`).
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    cmmn_element_ref: String,
    pub bounds: Bounds,
    pub(crate) extra_attributes: Vec<(String, String)>,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl Shape {
    pub fn new(cmmn_element_ref: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            cmmn_element_ref: cmmn_element_ref.into(),
            bounds,
            extra_attributes: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn cmmn_element_ref(&self) -> &str {
        &self.cmmn_element_ref
    }

    /// Problems recovered while reading this shape's bounds.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

/// A connector between two drawn elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub source_ref: String,
    pub target_ref: String,
    pub waypoints: Vec<Waypoint>,
    pub label: Option<Bounds>,
    pub(crate) extra_attributes: Vec<(String, String)>,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl Edge {
    pub fn new(source_ref: impl Into<String>, target_ref: impl Into<String>) -> Self {
        Self {
            source_ref: source_ref.into(),
            target_ref: target_ref.into(),
            waypoints: Vec::new(),
            label: None,
            extra_attributes: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn touches(&self, element_id: &str) -> bool {
        self.source_ref == element_id || self.target_ref == element_id
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

/// The dimensions document: shapes and edges of one case model.
///
/// The store never creates shapes on lookup; the caller decides when a shape is drawn and
/// with which default size.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dimensions {
    pub(crate) shapes: Vec<Shape>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) root_attributes: Vec<(String, String)>,
    pub(crate) diagram_attributes: Vec<(String, String)>,
    /// Unknown children of the `CMMNDI` root and of the diagram.
    pub(crate) root_extras: Vec<XmlElement>,
    pub(crate) diagram_extras: Vec<XmlElement>,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl Dimensions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn shape(&self, element_id: &str) -> Option<&Shape> {
        self.shapes
            .iter()
            .find(|shape| shape.cmmn_element_ref == element_id)
    }

    pub fn shape_mut(&mut self, element_id: &str) -> Option<&mut Shape> {
        self.shapes
            .iter_mut()
            .find(|shape| shape.cmmn_element_ref == element_id)
    }

    /// Adds a shape for `element_id`. An existing shape is kept as is and returned.
    pub fn create_shape(&mut self, element_id: &str, bounds: Bounds) -> &mut Shape {
        let position = match self
            .shapes
            .iter()
            .position(|shape| shape.cmmn_element_ref == element_id)
        {
            Some(position) => {
                debug!(element_id, "shape already exists");
                position
            }
            None => {
                self.shapes.push(Shape::new(element_id, bounds));
                self.shapes.len() - 1
            }
        };
        &mut self.shapes[position]
    }

    pub fn remove_shape(&mut self, element_id: &str) -> Option<Shape> {
        let position = self
            .shapes
            .iter()
            .position(|shape| shape.cmmn_element_ref == element_id)?;
        Some(self.shapes.remove(position))
    }

    pub fn add_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    pub fn edges_of<'a>(&'a self, element_id: &'a str) -> impl Iterator<Item = &'a Edge> {
        self.edges.iter().filter(move |edge| edge.touches(element_id))
    }

    /// Drops the shape of a removed element and every edge attached to it.
    ///
    /// Returns whether anything was dropped.
    pub fn remove_element(&mut self, element_id: &str) -> bool {
        let had_shape = self.remove_shape(element_id).is_some();
        let before = self.edges.len();
        self.edges.retain(|edge| !edge.touches(element_id));
        had_shape || self.edges.len() != before
    }

    /// Moves the shape drawn for a legacy sentry onto the criterion that absorbed it.
    ///
    /// Applies only when the criterion has no shape yet; edges are rewired as well.
    pub fn adopt_legacy_shape(&mut self, criterion_id: &str, sentry_id: &str) -> bool {
        if self.shape(criterion_id).is_some() {
            return false;
        }
        let Some(shape) = self.shape_mut(sentry_id) else {
            return false;
        };
        shape.cmmn_element_ref = criterion_id.to_owned();
        for edge in &mut self.edges {
            if edge.source_ref == sentry_id {
                edge.source_ref = criterion_id.to_owned();
            }
            if edge.target_ref == sentry_id {
                edge.target_ref = criterion_id.to_owned();
            }
        }
        info!(
            criterion_id,
            sentry_id, "reassigned legacy sentry shape to criterion"
        );
        true
    }

    /// Drops shapes and edges whose element no longer exists; returns how many were dropped.
    pub fn prune(&mut self, exists: impl Fn(&str) -> bool) -> usize {
        let before = self.shapes.len() + self.edges.len();
        self.shapes.retain(|shape| exists(&shape.cmmn_element_ref));
        self.edges
            .retain(|edge| exists(&edge.source_ref) && exists(&edge.target_ref));
        before - self.shapes.len() - self.edges.len()
    }

    /// Document-level diagnostics followed by those of each shape and edge.
    pub fn diagnostics(&self) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .chain(self.shapes.iter().flat_map(|shape| shape.diagnostics.iter()))
            .chain(self.edges.iter().flat_map(|edge| edge.diagnostics.iter()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{Bounds, Dimensions, Edge};

    #[test]
    fn lookup_never_creates_shapes() {
        let mut dimensions = Dimensions::new();
        assert!(dimensions.shape("ht_1").is_none());
        assert!(dimensions.shape("ht_1").is_none());
        assert!(dimensions.shapes().is_empty());

        dimensions.create_shape("ht_1", Bounds::new(10.0, 20.0, 140.0, 80.0));
        assert_eq!(
            dimensions.shape("ht_1").map(|shape| shape.bounds),
            Some(Bounds::new(10.0, 20.0, 140.0, 80.0))
        );
    }

    #[test]
    fn at_most_one_shape_per_element() {
        let mut dimensions = Dimensions::new();
        dimensions.create_shape("ht_1", Bounds::new(0.0, 0.0, 1.0, 1.0));
        let again = dimensions.create_shape("ht_1", Bounds::new(5.0, 5.0, 9.0, 9.0));
        assert_eq!(again.bounds, Bounds::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(dimensions.shapes().len(), 1);
    }

    #[test]
    fn legacy_sentry_shape_moves_to_criterion_once() {
        let mut dimensions = Dimensions::new();
        dimensions.create_shape("s1", Bounds::new(1.0, 2.0, 12.0, 20.0));
        dimensions.add_edge(Edge::new("ms_1", "s1"));

        assert!(dimensions.adopt_legacy_shape("crit_1", "s1"));
        assert!(dimensions.shape("s1").is_none());
        assert_eq!(
            dimensions.shape("crit_1").map(|shape| shape.bounds.x),
            Some(1.0)
        );
        assert_eq!(dimensions.edges()[0].target_ref, "crit_1");
        assert!(!dimensions.adopt_legacy_shape("crit_1", "s1"));
    }

    #[test]
    fn removing_an_element_drops_its_edges() {
        let mut dimensions = Dimensions::new();
        dimensions.create_shape("a", Bounds::default());
        dimensions.create_shape("b", Bounds::default());
        dimensions.add_edge(Edge::new("a", "b"));
        assert!(dimensions.remove_element("b"));
        assert!(dimensions.edges().is_empty());
        assert_eq!(dimensions.shapes().len(), 1);
        assert_eq!(dimensions.prune(|id| id != "a"), 1);
    }
}
