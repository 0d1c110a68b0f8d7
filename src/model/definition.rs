// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Casemodel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of casemodel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::diagnostic::Diagnostic;

use super::element::{Element, ElementData};
use super::identity::{Identified, Identity};
use super::ids::{ElementId, ElementKey, IdError};
use super::kind::{ElementKind, ModelKind};
use super::naming::IdGenerator;
use super::reference::{RefSlotMut, ReferenceAttr, Referencing};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("element not found: {0}")]
    NotFound(String),

    #[error("<{parent}> cannot contain <{child}>")]
    InvalidChild {
        parent: ElementKind,
        child: ElementKind,
    },

    #[error("duplicate element id: {0}")]
    DuplicateId(ElementId),

    #[error("the model root cannot be removed")]
    RootRemoval,

    #[error("<{kind}> has no {attr} attribute")]
    NoSuchReference {
        kind: ElementKind,
        attr: ReferenceAttr,
    },

    #[error("{attr} on <{owner}> cannot point at <{target}>")]
    InvalidReferenceTarget {
        owner: ElementKind,
        attr: ReferenceAttr,
        target: ElementKind,
    },

    #[error("{attr} takes a single target, got {count}")]
    TooManyTargets { attr: ReferenceAttr, count: usize },

    #[error(transparent)]
    InvalidId(#[from] IdError),
}

/// One model document held as an arena of elements plus a flat id registry.
///
/// The root always sits at the first key. Removing an element removes its subtree and drops
/// every link other elements held to it; removed keys are never handed out again.
#[derive(Debug, Clone)]
pub struct Definition {
    pub(crate) model_kind: ModelKind,
    pub(crate) slots: Vec<Option<Element>>,
    pub(crate) index: HashMap<ElementId, ElementKey>,
    pub(crate) naming: IdGenerator,
    pub(crate) diagnostics: Vec<Diagnostic>,
    pub(crate) migrated: bool,
}

impl Definition {
    /// A fresh, defaulted model named `name`. Case models also get their case plan.
    pub fn new(model_kind: ModelKind, name: &str) -> Result<Self, ModelError> {
        let mut definition = Self::empty(model_kind, None);
        let root_id = ElementId::new(format!("{name}.{}", model_kind.extension()))?;
        let mut identity = Identity::new(root_id);
        identity.set_name(name);
        definition.insert(model_kind.root_kind(), identity, None)?;

        if model_kind == ModelKind::Case {
            let plan_id = definition.next_id_of_type(ElementKind::CasePlan);
            let mut identity = Identity::new(plan_id);
            identity.set_name(name);
            definition.insert(ElementKind::CasePlan, identity, Some(definition.root()))?;
        }
        Ok(definition)
    }

    pub(crate) fn empty(model_kind: ModelKind, guid: Option<&str>) -> Self {
        Self {
            model_kind,
            slots: Vec::new(),
            index: HashMap::new(),
            naming: IdGenerator::new(guid),
            diagnostics: Vec::new(),
            migrated: false,
        }
    }

    pub fn model_kind(&self) -> ModelKind {
        self.model_kind
    }

    pub fn root(&self) -> ElementKey {
        ElementKey::from_index(0)
    }

    pub fn root_element(&self) -> Option<&Element> {
        self.element(self.root())
    }

    /// The case plan of a case model.
    pub fn case_plan(&self) -> Option<ElementKey> {
        self.root_element()?
            .children()
            .iter()
            .copied()
            .find(|child| self.kind_of(*child) == Some(ElementKind::CasePlan))
    }

    pub fn guid(&self) -> &str {
        self.naming.guid()
    }

    pub fn element(&self, key: ElementKey) -> Option<&Element> {
        self.slots.get(key.index()).and_then(Option::as_ref)
    }

    pub fn element_mut(&mut self, key: ElementKey) -> Option<&mut Element> {
        self.slots.get_mut(key.index()).and_then(Option::as_mut)
    }

    pub fn kind_of(&self, key: ElementKey) -> Option<ElementKind> {
        self.element(key).map(Element::kind)
    }

    pub fn id_of(&self, key: ElementKey) -> Option<&ElementId> {
        self.element(key).map(Identified::id)
    }

    pub fn key_of(&self, id: &str) -> Option<ElementKey> {
        self.index.get(id).copied()
    }

    /// Looks an element up by id, optionally constrained to a kind.
    ///
    /// A kind mismatch is reported as "not found" and logged.
    pub fn get_element(&self, id: &str, kind: Option<ElementKind>) -> Option<&Element> {
        let element = self.element(self.key_of(id)?)?;
        match kind {
            Some(expected) if expected != element.kind() => {
                warn!(
                    element_id = id,
                    expected = %expected,
                    found = %element.kind(),
                    "element found with unexpected kind"
                );
                None
            }
            _ => Some(element),
        }
    }

    /// Live elements in arena order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.slots.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn children_of(&self, key: ElementKey) -> &[ElementKey] {
        self.element(key).map(Element::children).unwrap_or_default()
    }

    /// `key` and its descendants in document order.
    pub fn subtree(&self, key: ElementKey) -> Vec<ElementKey> {
        let mut out = Vec::new();
        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            let Some(element) = self.element(current) else {
                continue;
            };
            out.push(current);
            stack.extend(element.children().iter().rev().copied());
        }
        out
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub(crate) fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        warn!(
            element_id = diagnostic.element_id().unwrap_or_default(),
            "{}",
            diagnostic.message()
        );
        self.diagnostics.push(diagnostic);
    }

    /// Whether loading rewrote a legacy construct; such a model should be saved again.
    pub fn migrated(&self) -> bool {
        self.migrated
    }

    pub(crate) fn mark_migrated(&mut self, what: &str) {
        debug!(model = %self.model_kind, "migrated legacy construct: {what}");
        self.migrated = true;
    }

    pub fn next_id_of_type(&mut self, kind: ElementKind) -> ElementId {
        let index = &self.index;
        self.naming.next_id(kind, |id| index.contains_key(id))
    }

    pub fn next_name_of_type(&self, kind: ElementKind) -> String {
        let names: HashSet<&str> = self.elements().map(Identified::name).collect();
        self.naming.next_name(kind, |name| names.contains(name))
    }

    /// Creates a defaulted element under `parent` with a generated id and name.
    pub fn create(
        &mut self,
        kind: ElementKind,
        parent: ElementKey,
    ) -> Result<ElementKey, ModelError> {
        self.check_child(kind, parent)?;
        let id = self.next_id_of_type(kind);
        let mut identity = Identity::new(id);
        let name = self.next_name_of_type(kind);
        identity.set_name(&name);
        self.insert(kind, identity, Some(parent))
    }

    /// Creates a defaulted element with a caller-chosen id.
    pub fn create_with_id(
        &mut self,
        kind: ElementKind,
        parent: ElementKey,
        id: ElementId,
    ) -> Result<ElementKey, ModelError> {
        self.check_child(kind, parent)?;
        self.insert(kind, Identity::new(id), Some(parent))
    }

    fn check_child(&self, kind: ElementKind, parent: ElementKey) -> Result<(), ModelError> {
        let parent_kind = self
            .kind_of(parent)
            .ok_or_else(|| ModelError::NotFound(parent.to_string()))?;
        if kind.is_root() || !parent_kind.accepts_child(kind) {
            return Err(ModelError::InvalidChild {
                parent: parent_kind,
                child: kind,
            });
        }
        Ok(())
    }

    /// Registers an element and appends it to its parent's children.
    pub(crate) fn insert(
        &mut self,
        kind: ElementKind,
        identity: Identity,
        parent: Option<ElementKey>,
    ) -> Result<ElementKey, ModelError> {
        if self.index.contains_key(identity.id()) {
            return Err(ModelError::DuplicateId(identity.id().clone()));
        }
        if let Some(parent) = parent {
            if self.element(parent).is_none() {
                return Err(ModelError::NotFound(parent.to_string()));
            }
        }
        let key = ElementKey::from_index(self.slots.len());
        self.index.insert(identity.id().clone(), key);
        self.slots
            .push(Some(Element::new(key, kind, identity, parent)));
        if let Some(parent) = parent.and_then(|parent| self.element_mut(parent)) {
            parent.children.push(key);
        }
        Ok(key)
    }

    pub(crate) fn reparent(&mut self, key: ElementKey, new_parent: ElementKey) {
        let old_parent = self.element(key).and_then(Element::parent);
        if let Some(old) = old_parent.and_then(|old| self.element_mut(old)) {
            old.children.retain(|child| *child != key);
        }
        if let Some(element) = self.element_mut(key) {
            element.parent = Some(new_parent);
        }
        if let Some(parent) = self.element_mut(new_parent) {
            parent.children.push(key);
        }
    }

    /// Removes `key` and its subtree, then drops every link that pointed into the subtree.
    ///
    /// Returns the removed ids in document order.
    pub fn remove(&mut self, key: ElementKey) -> Result<Vec<ElementId>, ModelError> {
        if key == self.root() {
            return Err(ModelError::RootRemoval);
        }
        if self.element(key).is_none() {
            return Err(ModelError::NotFound(key.to_string()));
        }

        let subtree = self.subtree(key);
        let parent = self.element(key).and_then(Element::parent);
        if let Some(parent) = parent.and_then(|parent| self.element_mut(parent)) {
            parent.children.retain(|child| *child != key);
        }

        let mut removed_ids = Vec::with_capacity(subtree.len());
        for removed in &subtree {
            if let Some(element) = self.slots.get_mut(removed.index()).and_then(Option::take) {
                self.index.remove(element.id());
                removed_ids.push(element.id().clone());
            }
        }

        let removed: HashSet<ElementKey> = subtree.into_iter().collect();
        let mut dropped = 0usize;
        for element in self.slots.iter_mut().flatten() {
            for (_, mut slot) in element.reference_slots_mut() {
                if slot.forget(&removed) {
                    dropped += 1;
                }
            }
        }
        debug!(
            removed = removed_ids.len(),
            dropped_links = dropped,
            "removed element subtree"
        );
        Ok(removed_ids)
    }

    /// Elements holding a live link to `key`.
    pub fn referencing_elements(&self, key: ElementKey) -> Vec<ElementKey> {
        self.elements()
            .filter(|element| element.referenced_keys().contains(&key))
            .map(Element::key)
            .collect()
    }

    /// Whether an element points at nothing.
    ///
    /// Criteria count the sources of their on-parts and the context of their if-part; a
    /// criterion whose on-parts all lost their source is flagged even though it still exists.
    pub fn references_nothing(&self, key: ElementKey) -> bool {
        let Some(element) = self.element(key) else {
            return true;
        };
        let own = element.referenced_keys();
        if !element.kind().is_criterion() {
            return own.is_empty();
        }
        own.is_empty()
            && element.children().iter().all(|child| {
                self.element(*child).map_or(true, |on_part| {
                    !on_part
                        .reference_slots()
                        .iter()
                        .any(|(attr, slot)| {
                            *attr == ReferenceAttr::SourceRef && !slot.keys().is_empty()
                        })
                })
            })
    }

    /// Replaces the targets of one reference attribute, validating target kinds.
    pub fn set_reference(
        &mut self,
        owner: ElementKey,
        attr: ReferenceAttr,
        targets: &[ElementKey],
    ) -> Result<(), ModelError> {
        let owner_kind = self
            .kind_of(owner)
            .ok_or_else(|| ModelError::NotFound(owner.to_string()))?;
        if !attr.is_multi_valued() && targets.len() > 1 {
            return Err(ModelError::TooManyTargets {
                attr,
                count: targets.len(),
            });
        }
        for target in targets {
            let target_kind = self
                .kind_of(*target)
                .ok_or_else(|| ModelError::NotFound(target.to_string()))?;
            if !attr.accepts(owner_kind, target_kind) {
                return Err(ModelError::InvalidReferenceTarget {
                    owner: owner_kind,
                    attr,
                    target: target_kind,
                });
            }
        }

        let element = self
            .element_mut(owner)
            .ok_or_else(|| ModelError::NotFound(owner.to_string()))?;
        if attr == ReferenceAttr::ContextRef {
            if let Some(if_part) = element.data.if_part_mut() {
                if !targets.is_empty() {
                    if_part.get_or_insert_with(Default::default);
                } else if if_part.as_ref().map_or(true, |part| part.condition.is_none()) {
                    *if_part = None;
                    return Ok(());
                }
            }
        }
        let mut slots = element.reference_slots_mut();
        let Some((_, slot)) = slots.iter_mut().find(|(slot_attr, _)| *slot_attr == attr) else {
            return Err(ModelError::NoSuchReference {
                kind: owner_kind,
                attr,
            });
        };
        match slot {
            RefSlotMut::One(reference) => reference.set(targets.first().copied()),
            RefSlotMut::Many(list) => list.set_keys(targets.iter().copied()),
        }
        Ok(())
    }

    /// Id strings of one reference attribute, live links only.
    pub fn reference_ids(&self, owner: ElementKey, attr: ReferenceAttr) -> Vec<&ElementId> {
        let Some(element) = self.element(owner) else {
            return Vec::new();
        };
        element
            .reference_slots()
            .iter()
            .filter(|(slot_attr, _)| *slot_attr == attr)
            .flat_map(|(_, slot)| slot.keys())
            .filter_map(|key| self.id_of(key))
            .collect()
    }

    pub(crate) fn legacy_sentry_of(&self, key: ElementKey) -> Option<&ElementId> {
        match self.element(key)?.data() {
            ElementData::Criterion { legacy_sentry, .. } => legacy_sentry.as_ref(),
            _ => None,
        }
    }
}
