// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Casemodel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of casemodel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

fn apply_op(
    definition: &mut Definition,
    dimensions: Option<&mut Dimensions>,
    op: &Op,
    delta: &mut DeltaBuilder,
) -> Result<(), ApplyError> {
    match op {
        Op::Create { kind, parent, id } => {
            let parent = key_of(definition, parent)?;
            let key = match id {
                Some(id) => {
                    if definition.key_of(id.as_str()).is_some() {
                        return Err(ApplyError::AlreadyExists { id: id.clone() });
                    }
                    definition.create_with_id(*kind, parent, id.clone())?
                }
                None => definition.create(*kind, parent)?,
            };
            if let Some(id) = definition.id_of(key) {
                delta.record_added(id.clone());
            }
            Ok(())
        }
        Op::Remove { id } => {
            let key = key_of(definition, id)?;
            let subtree: BTreeSet<ElementKey> = definition.subtree(key).into_iter().collect();
            let holders: Vec<ElementId> = subtree
                .iter()
                .flat_map(|removed| definition.referencing_elements(*removed))
                .filter(|holder| !subtree.contains(holder))
                .filter_map(|holder| definition.id_of(holder).cloned())
                .collect();

            let removed = definition.remove(key)?;
            if let Some(dimensions) = dimensions {
                for removed_id in &removed {
                    dimensions.remove_element(removed_id.as_str());
                }
            }
            for holder in holders {
                delta.record_updated(holder);
            }
            for removed_id in removed {
                delta.record_removed(removed_id);
            }
            Ok(())
        }
        Op::SetName { id, name } => {
            let key = key_of(definition, id)?;
            if let Some(element) = definition.element_mut(key) {
                element.identity_mut().set_name(name);
            }
            delta.record_updated(id.clone());
            Ok(())
        }
        Op::SetDescription { id, description } => {
            let key = key_of(definition, id)?;
            if let Some(element) = definition.element_mut(key) {
                element.identity_mut().set_description(description);
            }
            delta.record_updated(id.clone());
            Ok(())
        }
        Op::SetReference { id, attr, target } => {
            let owner = key_of(definition, id)?;
            let targets = target
                .iter()
                .map(|target| key_of(definition, target))
                .collect::<Result<Vec<_>, _>>()?;
            definition.set_reference(owner, *attr, &targets)?;
            delta.record_updated(id.clone());
            Ok(())
        }
        Op::SetReferences { id, attr, targets } => {
            let owner = key_of(definition, id)?;
            let targets = targets
                .iter()
                .map(|target| key_of(definition, target))
                .collect::<Result<Vec<_>, _>>()?;
            definition.set_reference(owner, *attr, &targets)?;
            delta.record_updated(id.clone());
            Ok(())
        }
        Op::MoveShape { id, x, y } => {
            let bounds = shape_bounds(definition, dimensions, id)?;
            bounds.x = *x;
            bounds.y = *y;
            delta.record_updated(id.clone());
            Ok(())
        }
        Op::ResizeShape { id, width, height } => {
            let valid = |value: f64| value.is_finite() && value >= 0.0;
            if !valid(*width) || !valid(*height) {
                return Err(ApplyError::InvalidSize {
                    width: *width,
                    height: *height,
                });
            }
            let bounds = shape_bounds(definition, dimensions, id)?;
            bounds.width = *width;
            bounds.height = *height;
            delta.record_updated(id.clone());
            Ok(())
        }
    }
}

fn key_of(definition: &Definition, id: &ElementId) -> Result<ElementKey, ApplyError> {
    definition
        .key_of(id.as_str())
        .ok_or_else(|| ApplyError::NotFound { id: id.clone() })
}

fn shape_bounds<'a>(
    definition: &Definition,
    dimensions: Option<&'a mut Dimensions>,
    id: &ElementId,
) -> Result<&'a mut Bounds, ApplyError> {
    let dimensions = dimensions.ok_or(ApplyError::NoDimensions {
        model_kind: definition.model_kind(),
    })?;
    dimensions
        .shape_mut(id.as_str())
        .map(|shape| &mut shape.bounds)
        .ok_or_else(|| ApplyError::NoShape { id: id.clone() })
}
