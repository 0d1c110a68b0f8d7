// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Casemodel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of casemodel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Documents shared by unit tests; the same files back the integration tests.

use crate::format::{parse_dimensions, parse_model};

use super::{Definition, Dimensions, ModelKind};

pub(crate) const CLAIMS_CASE: &str = include_str!("../../tests/fixtures/claims.case");
pub(crate) const CLAIMS_DIMENSIONS: &str = include_str!("../../tests/fixtures/claims.dimensions");
pub(crate) const LEGACY_CASE: &str = include_str!("../../tests/fixtures/legacy.case");
pub(crate) const LEGACY_DIMENSIONS: &str = include_str!("../../tests/fixtures/legacy.dimensions");
pub(crate) const ASSESS_HUMANTASK: &str = include_str!("../../tests/fixtures/assess.humantask");
pub(crate) const PAYOUT_PROCESS: &str = include_str!("../../tests/fixtures/payout.process");
pub(crate) const CLAIM_CFID: &str = include_str!("../../tests/fixtures/claim.cfid");

pub(crate) fn claims_case() -> Definition {
    parse_model(CLAIMS_CASE, ModelKind::Case).expect("claims case")
}

pub(crate) fn claims_dimensions() -> Dimensions {
    parse_dimensions(CLAIMS_DIMENSIONS).expect("claims dimensions")
}

pub(crate) fn legacy_case() -> Definition {
    parse_model(LEGACY_CASE, ModelKind::Case).expect("legacy case")
}

pub(crate) fn legacy_dimensions() -> Dimensions {
    parse_dimensions(LEGACY_DIMENSIONS).expect("legacy dimensions")
}

/// A case with one stage holding one human task whose entry criterion listens to a milestone.
///
/// Returns the definition plus the keys of (task, criterion, on-part, milestone).
pub(crate) fn stage_task_milestone() -> (Definition, [super::ElementKey; 4]) {
    use super::{ElementKind, ReferenceAttr};

    let mut definition = Definition::new(ModelKind::Case, "scenario").expect("case");
    let plan = definition.case_plan().expect("plan");
    let stage = definition.create(ElementKind::Stage, plan).expect("stage");
    let task = definition
        .create(ElementKind::HumanTask, stage)
        .expect("task");
    let milestone = definition
        .create(ElementKind::Milestone, plan)
        .expect("milestone");
    let criterion = definition
        .create(ElementKind::EntryCriterion, task)
        .expect("criterion");
    let on_part = definition
        .create(ElementKind::PlanItemOnPart, criterion)
        .expect("on-part");
    definition
        .set_reference(on_part, ReferenceAttr::SourceRef, &[milestone])
        .expect("source");
    (definition, [task, criterion, on_part, milestone])
}
