// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Casemodel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of casemodel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Id-string references and their live, arena-keyed form.
//!
//! On the wire a reference is one id or a space-separated id list. After parsing it is held as
//! [`Link::Pending`] until the resolve pass turns it into [`Link::Resolved`]; the flatten pass
//! turns live links back into id strings. Links never own their target.

use std::collections::HashSet;
use std::fmt;

use smallvec::SmallVec;

use super::ids::{ElementId, ElementKey};
use super::kind::ElementKind;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Link {
    /// Parsed but not yet resolved against the registry.
    Pending(ElementId),
    Resolved(ElementKey),
}

impl Link {
    pub fn key(&self) -> Option<ElementKey> {
        match self {
            Self::Resolved(key) => Some(*key),
            Self::Pending(_) => None,
        }
    }
}

/// A single-valued reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reference(Option<Link>);

impl Reference {
    pub fn none() -> Self {
        Self(None)
    }

    pub fn pending(id: ElementId) -> Self {
        Self(Some(Link::Pending(id)))
    }

    pub fn resolved(key: ElementKey) -> Self {
        Self(Some(Link::Resolved(key)))
    }

    /// Builds a pending reference from a wire value; blank values mean "no reference".
    pub fn from_wire(value: Option<&str>) -> Self {
        value
            .and_then(|value| ElementId::new(value.trim()).ok())
            .map(Self::pending)
            .unwrap_or_default()
    }

    pub fn link(&self) -> Option<&Link> {
        self.0.as_ref()
    }

    pub fn key(&self) -> Option<ElementKey> {
        self.0.as_ref().and_then(Link::key)
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    pub fn set(&mut self, key: Option<ElementKey>) {
        self.0 = key.map(Link::Resolved);
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }
}

/// A multi-valued reference; order is the wire order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceList(SmallVec<[Link; 2]>);

impl ReferenceList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits a space-separated wire value into pending links.
    pub fn from_wire(value: Option<&str>) -> Self {
        let mut list = Self::new();
        for token in value.unwrap_or_default().split_whitespace() {
            if let Ok(id) = ElementId::new(token) {
                list.0.push(Link::Pending(id));
            }
        }
        list
    }

    pub fn links(&self) -> &[Link] {
        &self.0
    }

    pub fn keys(&self) -> impl Iterator<Item = ElementKey> + '_ {
        self.0.iter().filter_map(Link::key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn push(&mut self, link: Link) {
        if !self.0.contains(&link) {
            self.0.push(link);
        }
    }

    pub fn set_keys(&mut self, keys: impl IntoIterator<Item = ElementKey>) {
        self.0.clear();
        for key in keys {
            self.push(Link::Resolved(key));
        }
    }
}

/// Named reference attributes, one per wire attribute that carries element ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReferenceAttr {
    SourceRef,
    ExitCriterionRef,
    PerformerRef,
    AuthorizedRoleRefs,
    BindingRef,
    ContextRef,
}

impl ReferenceAttr {
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::SourceRef => "sourceRef",
            Self::ExitCriterionRef => "exitCriterionRef",
            Self::PerformerRef => "performerRef",
            Self::AuthorizedRoleRefs => "authorizedRoleRefs",
            Self::BindingRef => "bindingRef",
            Self::ContextRef => "contextRef",
        }
    }

    pub fn is_multi_valued(self) -> bool {
        self == Self::AuthorizedRoleRefs
    }

    /// Whether an element of kind `owner` may point at an element of kind `target` through
    /// this attribute.
    pub fn accepts(self, owner: ElementKind, target: ElementKind) -> bool {
        match self {
            Self::SourceRef if owner == ElementKind::CaseFileItemOnPart => {
                target == ElementKind::CaseFileItem
            }
            Self::SourceRef => target.is_plan_item(),
            Self::ExitCriterionRef => target == ElementKind::ExitCriterion,
            Self::PerformerRef | Self::AuthorizedRoleRefs => target == ElementKind::Role,
            Self::BindingRef | Self::ContextRef => target == ElementKind::CaseFileItem,
        }
    }
}

impl fmt::Display for ReferenceAttr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

pub enum RefSlot<'a> {
    One(&'a Reference),
    Many(&'a ReferenceList),
}

impl RefSlot<'_> {
    pub fn keys(&self) -> SmallVec<[ElementKey; 2]> {
        match self {
            Self::One(reference) => reference.key().into_iter().collect(),
            Self::Many(list) => list.keys().collect(),
        }
    }
}

pub enum RefSlotMut<'a> {
    One(&'a mut Reference),
    Many(&'a mut ReferenceList),
}

impl RefSlotMut<'_> {
    /// Replaces pending links by the lookup result; links the lookup cannot place are dropped.
    pub fn resolve_with(&mut self, mut lookup: impl FnMut(&ElementId) -> Option<ElementKey>) {
        match self {
            Self::One(reference) => {
                if let Some(Link::Pending(id)) = &reference.0 {
                    let key = lookup(id);
                    reference.set(key);
                }
            }
            Self::Many(list) => {
                let mut kept: SmallVec<[Link; 2]> = SmallVec::new();
                for link in list.0.drain(..) {
                    let link = match link {
                        Link::Pending(id) => lookup(&id).map(Link::Resolved),
                        live @ Link::Resolved(_) => Some(live),
                    };
                    if let Some(link) = link.filter(|link| !kept.contains(link)) {
                        kept.push(link);
                    }
                }
                list.0 = kept;
            }
        }
    }

    /// Drops links to removed elements; returns whether anything was dropped.
    pub fn forget(&mut self, removed: &HashSet<ElementKey>) -> bool {
        match self {
            Self::One(reference) => match reference.key() {
                Some(key) if removed.contains(&key) => {
                    reference.clear();
                    true
                }
                _ => false,
            },
            Self::Many(list) => {
                let before = list.0.len();
                list.0
                    .retain(|link| link.key().map_or(true, |key| !removed.contains(&key)));
                list.0.len() != before
            }
        }
    }
}

/// Elements that expose reference attributes to the resolve and flatten passes.
pub trait Referencing {
    fn reference_slots(&self) -> SmallVec<[(ReferenceAttr, RefSlot<'_>); 2]>;

    fn reference_slots_mut(&mut self) -> SmallVec<[(ReferenceAttr, RefSlotMut<'_>); 2]>;

    /// Every live target, in attribute then list order.
    fn referenced_keys(&self) -> Vec<ElementKey> {
        self.reference_slots()
            .iter()
            .flat_map(|(_, slot)| slot.keys())
            .collect()
    }
}
