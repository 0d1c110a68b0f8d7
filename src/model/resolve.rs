// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Casemodel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of casemodel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The two reference passes.
//!
//! [`resolve_references`] runs once after the whole document has been parsed, because wire
//! references may point forward. It first rewrites legacy constructs (sentries referenced by
//! criteria, `entryCriteriaRefs`/`exitCriteriaRefs`, `authorizedRoleRef`) and then turns every
//! pending id into an arena key. [`flatten_references`] runs once before export and produces
//! the id strings the writer emits.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::diagnostic::Diagnostic;

use super::definition::Definition;
use super::element::ElementData;
use super::identity::{Identified, Identity};
use super::ids::{ElementId, ElementKey};
use super::kind::ElementKind;
use super::reference::{Link, RefSlot, ReferenceAttr, Referencing};

/// Runs the legacy migrations and resolves every pending link against the registry.
///
/// Ids that point at nothing, or at an element of the wrong kind, are dropped with a
/// diagnostic.
pub fn resolve_references(definition: &mut Definition) {
    expand_legacy_criteria(definition);
    absorb_sentries(definition);
    promote_authorized_role(definition);
    resolve_links(definition);
}

fn expand_legacy_criteria(definition: &mut Definition) {
    let owners: Vec<ElementKey> = definition
        .elements()
        .filter(|element| !element.legacy_criteria.is_empty())
        .map(|element| element.key())
        .collect();

    for owner in owners {
        let legacy = definition
            .element_mut(owner)
            .map(|element| std::mem::take(&mut element.legacy_criteria))
            .unwrap_or_default();
        for (kind, sentry_id) in legacy {
            let created = definition.create(kind, owner);
            match created {
                Ok(criterion) => {
                    if let Some(ElementData::Criterion { sentry_ref, .. }) =
                        definition.element_mut(criterion).map(|c| &mut c.data)
                    {
                        *sentry_ref = Some(sentry_id);
                    }
                }
                Err(err) => {
                    let owner_id = definition.id_of(owner).map(|id| id.as_str().to_owned());
                    definition.push_diagnostic(Diagnostic::warning(
                        owner_id.as_deref(),
                        format!("cannot convert legacy {kind} reference to {sentry_id}: {err}"),
                    ));
                }
            }
        }
        definition.mark_migrated("criteria refs");
    }
}

/// Moves the on-parts and if-part of each referenced sentry into the referencing criterion.
///
/// A sentry shared by several criteria is moved into the first and copied into the others.
fn absorb_sentries(definition: &mut Definition) {
    let criteria: Vec<(ElementKey, ElementId)> = definition
        .elements()
        .filter_map(|element| match element.data() {
            ElementData::Criterion {
                sentry_ref: Some(sentry),
                ..
            } => Some((element.key(), sentry.clone())),
            _ => None,
        })
        .collect();

    let mut absorbed: HashSet<ElementKey> = HashSet::new();
    for (criterion, sentry_id) in criteria {
        let sentry = definition
            .key_of(sentry_id.as_str())
            .filter(|key| definition.kind_of(*key) == Some(ElementKind::Sentry));

        let if_part = sentry
            .and_then(|key| definition.element(key))
            .and_then(|sentry| sentry.data().if_part().cloned());
        if let Some(ElementData::Criterion {
            sentry_ref,
            legacy_sentry,
            if_part: criterion_if_part,
        }) = definition.element_mut(criterion).map(|c| &mut c.data)
        {
            *sentry_ref = None;
            if sentry.is_some() {
                *legacy_sentry = Some(sentry_id.clone());
                if criterion_if_part.is_none() {
                    *criterion_if_part = if_part;
                }
            }
        }

        let Some(sentry) = sentry else {
            let criterion_id = definition.id_of(criterion).map(|id| id.as_str().to_owned());
            definition.push_diagnostic(Diagnostic::warning(
                criterion_id.as_deref(),
                format!("sentryRef {sentry_id} does not point at a sentry"),
            ));
            continue;
        };

        let on_parts = definition.children_of(sentry).to_vec();
        if absorbed.insert(sentry) {
            for on_part in on_parts {
                definition.reparent(on_part, criterion);
            }
        } else {
            copy_on_parts(definition, sentry, criterion);
        }
        definition.mark_migrated("sentry");
    }

    for sentry in &absorbed {
        remove_absorbed_sentry(definition, *sentry);
    }

    let unreferenced: Vec<String> = definition
        .elements()
        .filter(|element| element.kind() == ElementKind::Sentry)
        .filter(|element| !absorbed.contains(&element.key()))
        .map(|element| element.id().as_str().to_owned())
        .collect();
    for id in unreferenced {
        definition.push_diagnostic(Diagnostic::info(
            Some(&id),
            "sentry is not referenced by any criterion",
        ));
    }
}

fn remove_absorbed_sentry(definition: &mut Definition, sentry: ElementKey) {
    if let Err(err) = definition.remove(sentry) {
        warn!(error = %err, "failed to remove absorbed sentry");
    }
}

/// Gives `to` its own copies, under fresh ids, of the on-parts another criterion already took
/// over from `sentry`.
fn copy_on_parts(definition: &mut Definition, sentry: ElementKey, to: ElementKey) {
    let Some(sentry_id) = definition.id_of(sentry).cloned() else {
        return;
    };
    let template = definition
        .elements()
        .find(|element| {
            element.kind().is_criterion()
                && element.key() != to
                && matches!(
                    element.data(),
                    ElementData::Criterion { legacy_sentry: Some(id), .. } if *id == sentry_id
                )
        })
        .map(|element| element.key());
    let Some(template) = template else {
        return;
    };

    for on_part in definition.children_of(template).to_vec() {
        let Some(source) = definition.element(on_part).cloned() else {
            continue;
        };
        let id = definition.next_id_of_type(source.kind());
        let identity = Identity::from_wire(
            id,
            source.identity().explicit_name().map(ToOwned::to_owned),
            source.identity().explicit_description().map(ToOwned::to_owned),
        );
        match definition.insert(source.kind(), identity, Some(to)) {
            Ok(copy) => {
                if let Some(element) = definition.element_mut(copy) {
                    element.data = source.data.clone();
                    element.extra_attributes = source.extra_attributes.clone();
                    element.extra_children = source.extra_children.clone();
                }
            }
            Err(err) => warn!(error = %err, "failed to copy sentry on-part"),
        }
    }
}

fn promote_authorized_role(definition: &mut Definition) {
    let mut promoted = false;
    for element in definition.slots.iter_mut().flatten() {
        if let ElementData::UserEvent {
            authorized_roles,
            legacy_authorized_role,
        } = &mut element.data
        {
            if let Some(role) = legacy_authorized_role.take() {
                authorized_roles.push(Link::Pending(role));
                promoted = true;
            }
        }
    }
    if promoted {
        definition.mark_migrated("authorizedRoleRef");
    }
}

fn resolve_links(definition: &mut Definition) {
    let kinds: Vec<Option<ElementKind>> = definition
        .slots
        .iter()
        .map(|slot| slot.as_ref().map(|element| element.kind()))
        .collect();
    let index = &definition.index;
    let mut diagnostics = Vec::new();
    let mut resolved = 0usize;

    for element in definition.slots.iter_mut().flatten() {
        let owner_kind = element.kind();
        let owner_id = element.id().clone();
        for (attr, mut slot) in element.reference_slots_mut() {
            slot.resolve_with(|id| {
                let Some(key) = index.get(id.as_str()).copied() else {
                    diagnostics.push(Diagnostic::warning(
                        Some(owner_id.as_str()),
                        format!("{attr} points at unknown element {id}"),
                    ));
                    return None;
                };
                let target_kind = kinds.get(key.index()).copied().flatten();
                match target_kind {
                    Some(target) if attr.accepts(owner_kind, target) => {
                        resolved += 1;
                        Some(key)
                    }
                    Some(target) => {
                        diagnostics.push(Diagnostic::warning(
                            Some(owner_id.as_str()),
                            format!("{attr} points at {id}, which is a {target}"),
                        ));
                        None
                    }
                    None => None,
                }
            });
        }
    }

    debug!(
        resolved,
        dropped = diagnostics.len(),
        "resolved references"
    );
    for diagnostic in diagnostics {
        definition.push_diagnostic(diagnostic);
    }
}

/// Id strings of every reference attribute, keyed by owner and attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatReferences {
    values: HashMap<(ElementKey, ReferenceAttr), String>,
}

impl FlatReferences {
    /// The flattened value, `None` when the attribute holds no live link.
    pub fn get(&self, owner: ElementKey, attr: ReferenceAttr) -> Option<&str> {
        self.values.get(&(owner, attr)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Converts live links back into id strings, in link order.
///
/// Links to removed elements are skipped; links that were never resolved keep their id.
pub fn flatten_references(definition: &Definition) -> FlatReferences {
    let mut values = HashMap::new();
    for element in definition.elements() {
        for (attr, slot) in element.reference_slots() {
            let links: Vec<&Link> = match &slot {
                RefSlot::One(reference) => reference.link().into_iter().collect(),
                RefSlot::Many(list) => list.links().iter().collect(),
            };
            let ids: Vec<&str> = links
                .into_iter()
                .filter_map(|link| match link {
                    Link::Resolved(key) => definition.id_of(*key).map(ElementId::as_str),
                    Link::Pending(id) => Some(id.as_str()),
                })
                .collect();
            if !ids.is_empty() {
                values.insert((element.key(), attr), ids.join(" "));
            }
        }
    }
    FlatReferences { values }
}
