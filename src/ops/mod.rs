// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Casemodel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of casemodel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mutation operations for an open model.
//!
//! A batch is applied with an optimistic revision check against copies of the definition and
//! dimensions. Nothing changes unless every op succeeds; a successful batch is recorded as one
//! undo step and reports which elements were added, removed or updated.

use std::collections::BTreeSet;
use std::fmt;

use tracing::debug;

use crate::history::ActionId;
use crate::model::{
    Bounds, Definition, Dimensions, ElementId, ElementKey, ElementKind, Identified, ModelError,
    ModelKind, ReferenceAttr,
};
use crate::session::ModelSession;

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    /// Adds a defaulted element under `parent`. Without `id` a fresh one is generated.
    Create {
        kind: ElementKind,
        parent: ElementId,
        id: Option<ElementId>,
    },
    Remove {
        id: ElementId,
    },
    SetName {
        id: ElementId,
        name: String,
    },
    SetDescription {
        id: ElementId,
        description: String,
    },
    SetReference {
        id: ElementId,
        attr: ReferenceAttr,
        target: Option<ElementId>,
    },
    SetReferences {
        id: ElementId,
        attr: ReferenceAttr,
        targets: Vec<ElementId>,
    },
    MoveShape {
        id: ElementId,
        x: f64,
        y: f64,
    },
    ResizeShape {
        id: ElementId,
        width: f64,
        height: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    pub new_rev: u64,
    pub applied: usize,
    pub action: Option<ActionId>,
    pub delta: Delta,
}

/// Element ids touched by a batch, each sorted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delta {
    pub added: Vec<ElementId>,
    pub removed: Vec<ElementId>,
    pub updated: Vec<ElementId>,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }
}

#[derive(Debug, Default)]
struct DeltaBuilder {
    added: BTreeSet<ElementId>,
    removed: BTreeSet<ElementId>,
    updated: BTreeSet<ElementId>,
}

impl DeltaBuilder {
    fn record_added(&mut self, id: ElementId) {
        self.removed.remove(&id);
        self.updated.remove(&id);
        self.added.insert(id);
    }

    /// An element added and removed within the same batch disappears from the delta.
    fn record_removed(&mut self, id: ElementId) {
        self.updated.remove(&id);
        if !self.added.remove(&id) {
            self.removed.insert(id);
        }
    }

    fn record_updated(&mut self, id: ElementId) {
        if self.added.contains(&id) || self.removed.contains(&id) {
            return;
        }
        self.updated.insert(id);
    }

    fn finish(self) -> Delta {
        Delta {
            added: self.added.into_iter().collect(),
            removed: self.removed.into_iter().collect(),
            updated: self.updated.into_iter().collect(),
        }
    }
}

pub fn apply_ops(
    session: &mut ModelSession,
    base_rev: u64,
    ops: &[Op],
) -> Result<ApplyResult, ApplyError> {
    let current_rev = session.rev();
    if base_rev != current_rev {
        return Err(ApplyError::Conflict {
            base_rev,
            current_rev,
        });
    }

    if ops.is_empty() {
        return Ok(ApplyResult {
            new_rev: current_rev,
            applied: 0,
            action: None,
            delta: Delta::default(),
        });
    }

    let mut definition = session.definition().clone();
    let mut dimensions = session.dimensions().cloned();
    let mut delta = DeltaBuilder::default();

    for op in ops {
        apply_op(&mut definition, dimensions.as_mut(), op, &mut delta)?;
    }

    session.replace_documents(definition, dimensions);
    let action = session.record_action();
    let new_rev = session.rev();
    debug!(applied = ops.len(), new_rev, action = %action, "applied ops");

    Ok(ApplyResult {
        new_rev,
        applied: ops.len(),
        action: Some(action),
        delta: delta.finish(),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApplyError {
    Conflict { base_rev: u64, current_rev: u64 },
    NotFound { id: ElementId },
    AlreadyExists { id: ElementId },
    Model(ModelError),
    NoDimensions { model_kind: ModelKind },
    NoShape { id: ElementId },
    InvalidSize { width: f64, height: f64 },
}

impl fmt::Display for ApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict {
                base_rev,
                current_rev,
            } => write!(
                f,
                "stale base_rev (base_rev={base_rev}, current_rev={current_rev})"
            ),
            Self::NotFound { id } => write!(f, "element not found (id={id})"),
            Self::AlreadyExists { id } => write!(f, "element already exists (id={id})"),
            Self::Model(err) => write!(f, "{err}"),
            Self::NoDimensions { model_kind } => {
                write!(f, "{model_kind} models have no dimensions document")
            }
            Self::NoShape { id } => write!(f, "element has no shape (id={id})"),
            Self::InvalidSize { width, height } => {
                write!(f, "invalid shape size (width={width}, height={height})")
            }
        }
    }
}

impl std::error::Error for ApplyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Model(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModelError> for ApplyError {
    fn from(err: ModelError) -> Self {
        Self::Model(err)
    }
}

include!("ops_impl.rs");
