// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Casemodel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of casemodel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use smallvec::{smallvec, SmallVec};

use crate::format::xml::XmlElement;

use super::identity::{Identified, Identity};
use super::ids::{ElementId, ElementKey};
use super::kind::ElementKind;
use super::reference::{RefSlot, RefSlotMut, Reference, ReferenceAttr, ReferenceList, Referencing};

/// One node of a definition.
///
/// Only the parent owns an element (through `children`); every other relationship is a
/// [`Reference`] resolved through the owning definition's registry.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    key: ElementKey,
    kind: ElementKind,
    identity: Identity,
    pub(crate) parent: Option<ElementKey>,
    pub(crate) children: Vec<ElementKey>,
    pub(crate) data: ElementData,
    /// Content of `extensionElements` that the model does not interpret.
    pub(crate) extensions: Vec<XmlElement>,
    pub(crate) extra_attributes: Vec<(String, String)>,
    pub(crate) extra_children: Vec<XmlElement>,
    /// `entryCriteriaRefs`/`exitCriteriaRefs` of the pre-criterion wire format.
    pub(crate) legacy_criteria: Vec<(ElementKind, ElementId)>,
}

impl Element {
    pub(crate) fn new(
        key: ElementKey,
        kind: ElementKind,
        identity: Identity,
        parent: Option<ElementKey>,
    ) -> Self {
        Self {
            key,
            kind,
            identity,
            parent,
            children: Vec::new(),
            data: ElementData::default_for(kind),
            extensions: Vec::new(),
            extra_attributes: Vec::new(),
            extra_children: Vec::new(),
            legacy_criteria: Vec::new(),
        }
    }

    pub fn key(&self) -> ElementKey {
        self.key
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn parent(&self) -> Option<ElementKey> {
        self.parent
    }

    pub fn children(&self) -> &[ElementKey] {
        &self.children
    }

    pub fn data(&self) -> &ElementData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut ElementData {
        &mut self.data
    }

    pub fn extensions(&self) -> &[XmlElement] {
        &self.extensions
    }

    pub fn set_extensions(&mut self, extensions: Vec<XmlElement>) {
        self.extensions = extensions;
    }

    pub fn extra_attributes(&self) -> &[(String, String)] {
        &self.extra_attributes
    }

    pub fn extra_children(&self) -> &[XmlElement] {
        &self.extra_children
    }
}

impl Identified for Element {
    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut Identity {
        &mut self.identity
    }
}

impl Referencing for Element {
    fn reference_slots(&self) -> SmallVec<[(ReferenceAttr, RefSlot<'_>); 2]> {
        self.data.reference_slots()
    }

    fn reference_slots_mut(&mut self) -> SmallVec<[(ReferenceAttr, RefSlotMut<'_>); 2]> {
        self.data.reference_slots_mut()
    }
}

/// Construct-specific attributes, one variant per construct family.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementData {
    Case {
        /// Raw text of `cafienne:start-case-model`.
        start_case_schema: Option<String>,
    },
    CaseFileItem {
        multiplicity: Multiplicity,
        definition_ref: Option<String>,
    },
    /// Case plans and stages.
    Stage {
        auto_complete: bool,
    },
    HumanTask {
        is_blocking: bool,
        performer: Reference,
    },
    CaseTask {
        is_blocking: bool,
        case_ref: Option<String>,
    },
    ProcessTask {
        is_blocking: bool,
        process_ref: Option<String>,
    },
    Milestone,
    TimerEvent {
        timer_expression: Option<String>,
    },
    UserEvent {
        authorized_roles: ReferenceList,
        legacy_authorized_role: Option<ElementId>,
    },
    Criterion {
        /// Wire `sentryRef`, consumed by the sentry migration.
        sentry_ref: Option<ElementId>,
        /// Id of the sentry this criterion absorbed, kept for its legacy shape.
        legacy_sentry: Option<ElementId>,
        if_part: Option<IfPart>,
    },
    Sentry {
        if_part: Option<IfPart>,
    },
    PlanItemOnPart {
        standard_event: Option<String>,
        source: Reference,
        exit_criterion: Reference,
    },
    CaseFileItemOnPart {
        standard_event: Option<String>,
        source: Reference,
    },
    Role,
    Parameter {
        binding: Reference,
    },
    Process,
    HumanTaskModel {
        implementation_attributes: Vec<(String, String)>,
        implementation_extras: Vec<XmlElement>,
        task_model: Option<String>,
    },
    CaseFileItemDefinition {
        definition_type: Option<String>,
        structure_ref: Option<String>,
        properties: Vec<Property>,
    },
}

impl ElementData {
    /// Attribute values of a freshly created element of `kind`.
    pub fn default_for(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Case => Self::Case {
                start_case_schema: None,
            },
            ElementKind::CaseFileItem => Self::CaseFileItem {
                multiplicity: Multiplicity::default(),
                definition_ref: None,
            },
            ElementKind::CasePlan | ElementKind::Stage => Self::Stage {
                auto_complete: true,
            },
            ElementKind::HumanTask => Self::HumanTask {
                is_blocking: true,
                performer: Reference::none(),
            },
            ElementKind::CaseTask => Self::CaseTask {
                is_blocking: true,
                case_ref: None,
            },
            ElementKind::ProcessTask => Self::ProcessTask {
                is_blocking: true,
                process_ref: None,
            },
            ElementKind::Milestone => Self::Milestone,
            ElementKind::TimerEvent => Self::TimerEvent {
                timer_expression: None,
            },
            ElementKind::UserEvent => Self::UserEvent {
                authorized_roles: ReferenceList::new(),
                legacy_authorized_role: None,
            },
            ElementKind::EntryCriterion | ElementKind::ExitCriterion => Self::Criterion {
                sentry_ref: None,
                legacy_sentry: None,
                if_part: None,
            },
            ElementKind::Sentry => Self::Sentry { if_part: None },
            ElementKind::PlanItemOnPart => Self::PlanItemOnPart {
                standard_event: None,
                source: Reference::none(),
                exit_criterion: Reference::none(),
            },
            ElementKind::CaseFileItemOnPart => Self::CaseFileItemOnPart {
                standard_event: None,
                source: Reference::none(),
            },
            ElementKind::Role => Self::Role,
            ElementKind::InputParameter | ElementKind::OutputParameter => Self::Parameter {
                binding: Reference::none(),
            },
            ElementKind::Process => Self::Process,
            ElementKind::HumanTaskModel => Self::HumanTaskModel {
                implementation_attributes: Vec::new(),
                implementation_extras: Vec::new(),
                task_model: None,
            },
            ElementKind::CaseFileItemDefinition => Self::CaseFileItemDefinition {
                definition_type: None,
                structure_ref: None,
                properties: Vec::new(),
            },
        }
    }

    pub fn if_part(&self) -> Option<&IfPart> {
        match self {
            Self::Criterion { if_part, .. } | Self::Sentry { if_part } => if_part.as_ref(),
            _ => None,
        }
    }

    pub fn if_part_mut(&mut self) -> Option<&mut Option<IfPart>> {
        match self {
            Self::Criterion { if_part, .. } | Self::Sentry { if_part } => Some(if_part),
            _ => None,
        }
    }

    fn reference_slots(&self) -> SmallVec<[(ReferenceAttr, RefSlot<'_>); 2]> {
        match self {
            Self::HumanTask { performer, .. } => {
                smallvec![(ReferenceAttr::PerformerRef, RefSlot::One(performer))]
            }
            Self::UserEvent {
                authorized_roles, ..
            } => smallvec![(
                ReferenceAttr::AuthorizedRoleRefs,
                RefSlot::Many(authorized_roles)
            )],
            Self::Criterion { if_part, .. } | Self::Sentry { if_part } => if_part
                .iter()
                .map(|part| (ReferenceAttr::ContextRef, RefSlot::One(&part.context_ref)))
                .collect(),
            Self::PlanItemOnPart {
                source,
                exit_criterion,
                ..
            } => smallvec![
                (ReferenceAttr::SourceRef, RefSlot::One(source)),
                (ReferenceAttr::ExitCriterionRef, RefSlot::One(exit_criterion)),
            ],
            Self::CaseFileItemOnPart { source, .. } => {
                smallvec![(ReferenceAttr::SourceRef, RefSlot::One(source))]
            }
            Self::Parameter { binding } => {
                smallvec![(ReferenceAttr::BindingRef, RefSlot::One(binding))]
            }
            _ => SmallVec::new(),
        }
    }

    fn reference_slots_mut(&mut self) -> SmallVec<[(ReferenceAttr, RefSlotMut<'_>); 2]> {
        match self {
            Self::HumanTask { performer, .. } => {
                smallvec![(ReferenceAttr::PerformerRef, RefSlotMut::One(performer))]
            }
            Self::UserEvent {
                authorized_roles, ..
            } => smallvec![(
                ReferenceAttr::AuthorizedRoleRefs,
                RefSlotMut::Many(authorized_roles)
            )],
            Self::Criterion { if_part, .. } | Self::Sentry { if_part } => if_part
                .iter_mut()
                .map(|part| (ReferenceAttr::ContextRef, RefSlotMut::One(&mut part.context_ref)))
                .collect(),
            Self::PlanItemOnPart {
                source,
                exit_criterion,
                ..
            } => smallvec![
                (ReferenceAttr::SourceRef, RefSlotMut::One(source)),
                (ReferenceAttr::ExitCriterionRef, RefSlotMut::One(exit_criterion)),
            ],
            Self::CaseFileItemOnPart { source, .. } => {
                smallvec![(ReferenceAttr::SourceRef, RefSlotMut::One(source))]
            }
            Self::Parameter { binding } => {
                smallvec![(ReferenceAttr::BindingRef, RefSlotMut::One(binding))]
            }
            _ => SmallVec::new(),
        }
    }
}

/// Guard condition of a criterion (or a legacy sentry).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IfPart {
    pub context_ref: Reference,
    pub condition: Option<String>,
    pub language: Option<String>,
}

/// A row of a case file item definition; properties carry no identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub property_type: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Multiplicity {
    ZeroOrOne,
    ZeroOrMore,
    #[default]
    ExactlyOne,
    OneOrMore,
    Unspecified,
    Unknown,
}

impl Multiplicity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ZeroOrOne => "ZeroOrOne",
            Self::ZeroOrMore => "ZeroOrMore",
            Self::ExactlyOne => "ExactlyOne",
            Self::OneOrMore => "OneOrMore",
            Self::Unspecified => "Unspecified",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown multiplicity: {value}")]
pub struct ParseMultiplicityError {
    value: String,
}

impl FromStr for Multiplicity {
    type Err = ParseMultiplicityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ZeroOrOne" => Ok(Self::ZeroOrOne),
            "ZeroOrMore" => Ok(Self::ZeroOrMore),
            "ExactlyOne" => Ok(Self::ExactlyOne),
            "OneOrMore" => Ok(Self::OneOrMore),
            "Unspecified" => Ok(Self::Unspecified),
            "Unknown" => Ok(Self::Unknown),
            other => Err(ParseMultiplicityError {
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Element, ElementData, Multiplicity};
    use crate::model::{
        ElementId, ElementKey, ElementKind, Identity, Reference, ReferenceAttr, Referencing,
    };

    fn element(kind: ElementKind) -> Element {
        Element::new(
            ElementKey::from_index(1),
            kind,
            Identity::new(ElementId::new("e1").expect("id")),
            None,
        )
    }

    #[test]
    fn fresh_elements_get_construct_defaults() {
        let task = element(ElementKind::HumanTask);
        assert!(matches!(
            task.data(),
            ElementData::HumanTask {
                is_blocking: true,
                ..
            }
        ));
        let stage = element(ElementKind::Stage);
        assert!(matches!(
            stage.data(),
            ElementData::Stage {
                auto_complete: true
            }
        ));
        let item = element(ElementKind::CaseFileItem);
        assert!(matches!(
            item.data(),
            ElementData::CaseFileItem {
                multiplicity: Multiplicity::ExactlyOne,
                ..
            }
        ));
    }

    #[test]
    fn plan_item_on_part_exposes_both_reference_attributes() {
        let mut on_part = element(ElementKind::PlanItemOnPart);
        if let ElementData::PlanItemOnPart { source, .. } = on_part.data_mut() {
            *source = Reference::resolved(ElementKey::from_index(7));
        }
        let attrs: Vec<_> = on_part
            .reference_slots()
            .iter()
            .map(|(attr, _)| *attr)
            .collect();
        assert_eq!(
            attrs,
            vec![ReferenceAttr::SourceRef, ReferenceAttr::ExitCriterionRef]
        );
        assert_eq!(on_part.referenced_keys(), vec![ElementKey::from_index(7)]);
    }

    #[test]
    fn milestones_reference_nothing() {
        assert!(element(ElementKind::Milestone).reference_slots().is_empty());
    }

    #[test]
    fn multiplicity_parses_wire_names() {
        assert_eq!("ZeroOrMore".parse(), Ok(Multiplicity::ZeroOrMore));
        assert!("Many".parse::<Multiplicity>().is_err());
    }
}
