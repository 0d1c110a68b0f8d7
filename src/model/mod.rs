// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Casemodel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of casemodel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core definition model.
//!
//! A [`Definition`] holds one model document as an arena of [`Element`]s; a [`Dimensions`]
//! holds the shapes and edges drawn for it.

pub mod definition;
pub mod dimensions;
pub mod element;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod identity;
pub mod ids;
pub mod kind;
pub mod naming;
pub mod reference;
pub mod resolve;

pub use definition::{Definition, ModelError};
pub use dimensions::{Bounds, Dimensions, Edge, Shape, Waypoint};
pub use element::{Element, ElementData, IfPart, Multiplicity, ParseMultiplicityError, Property};
pub use identity::{Identified, Identity};
pub use ids::{ElementId, ElementKey, Id, IdError};
pub use kind::{ElementKind, ModelKind, ParseModelKindError, Shaped};
pub use naming::IdGenerator;
pub use reference::{
    Link, RefSlot, RefSlotMut, Reference, ReferenceAttr, ReferenceList, Referencing,
};
pub use resolve::{flatten_references, resolve_references, FlatReferences};
