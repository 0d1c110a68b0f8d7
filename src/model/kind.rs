// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Casemodel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of casemodel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

/// Every construct of the modeling language that carries its own identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    Case,
    CaseFileItem,
    CasePlan,
    Stage,
    HumanTask,
    CaseTask,
    ProcessTask,
    Milestone,
    TimerEvent,
    UserEvent,
    EntryCriterion,
    ExitCriterion,
    Sentry,
    PlanItemOnPart,
    CaseFileItemOnPart,
    Role,
    InputParameter,
    OutputParameter,
    Process,
    HumanTaskModel,
    CaseFileItemDefinition,
}

impl ElementKind {
    pub const ALL: [ElementKind; 21] = [
        Self::Case,
        Self::CaseFileItem,
        Self::CasePlan,
        Self::Stage,
        Self::HumanTask,
        Self::CaseTask,
        Self::ProcessTask,
        Self::Milestone,
        Self::TimerEvent,
        Self::UserEvent,
        Self::EntryCriterion,
        Self::ExitCriterion,
        Self::Sentry,
        Self::PlanItemOnPart,
        Self::CaseFileItemOnPart,
        Self::Role,
        Self::InputParameter,
        Self::OutputParameter,
        Self::Process,
        Self::HumanTaskModel,
        Self::CaseFileItemDefinition,
    ];

    /// Wire tag. Parameters use `input`/`output`; under tasks they are written as
    /// `inputs`/`outputs` (see [`ElementKind::tag_within`]).
    pub fn tag(self) -> &'static str {
        match self {
            Self::Case => "case",
            Self::CaseFileItem => "caseFileItem",
            Self::CasePlan => "casePlanModel",
            Self::Stage => "stage",
            Self::HumanTask => "humanTask",
            Self::CaseTask => "caseTask",
            Self::ProcessTask => "processTask",
            Self::Milestone => "milestone",
            Self::TimerEvent => "timerEvent",
            Self::UserEvent => "userEvent",
            Self::EntryCriterion => "entryCriterion",
            Self::ExitCriterion => "exitCriterion",
            Self::Sentry => "sentry",
            Self::PlanItemOnPart => "planItemOnPart",
            Self::CaseFileItemOnPart => "caseFileItemOnPart",
            Self::Role => "role",
            Self::InputParameter => "input",
            Self::OutputParameter => "output",
            Self::Process => "process",
            Self::HumanTaskModel => "humantask",
            Self::CaseFileItemDefinition => "caseFileItemDefinition",
        }
    }

    /// Wire tag of this kind when nested under a parent of kind `parent`.
    pub fn tag_within(self, parent: ElementKind) -> &'static str {
        match (self, parent.is_task()) {
            (Self::InputParameter, true) => "inputs",
            (Self::OutputParameter, true) => "outputs",
            _ => self.tag(),
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "inputs" => Some(Self::InputParameter),
            "outputs" => Some(Self::OutputParameter),
            other => Self::ALL.into_iter().find(|kind| kind.tag() == other),
        }
    }

    /// Short prefix used for generated ids.
    pub fn id_prefix(self) -> &'static str {
        match self {
            Self::Case => "case_",
            Self::CaseFileItem => "cfi_",
            Self::CasePlan => "cm_",
            Self::Stage => "st_",
            Self::HumanTask => "ht_",
            Self::CaseTask => "ct_",
            Self::ProcessTask => "pt_",
            Self::Milestone => "ms_",
            Self::TimerEvent => "tmr_",
            Self::UserEvent => "ue_",
            Self::EntryCriterion | Self::ExitCriterion => "crit_",
            Self::Sentry => "s_",
            Self::PlanItemOnPart | Self::CaseFileItemOnPart => "onpart_",
            Self::Role => "role_",
            Self::InputParameter => "in_",
            Self::OutputParameter => "out_",
            Self::Process => "proc_",
            Self::HumanTaskModel => "task_",
            Self::CaseFileItemDefinition => "cfid_",
        }
    }

    /// Base of generated default names (`HumanTask_0`, `Stage_3`, ...).
    pub fn type_description(self) -> &'static str {
        match self {
            Self::Case => "Case",
            Self::CaseFileItem => "CaseFileItem",
            Self::CasePlan => "CasePlan",
            Self::Stage => "Stage",
            Self::HumanTask => "HumanTask",
            Self::CaseTask => "CaseTask",
            Self::ProcessTask => "ProcessTask",
            Self::Milestone => "Milestone",
            Self::TimerEvent => "TimerEvent",
            Self::UserEvent => "UserEvent",
            Self::EntryCriterion => "EntryCriterion",
            Self::ExitCriterion => "ExitCriterion",
            Self::Sentry => "Sentry",
            Self::PlanItemOnPart => "PlanItemOnPart",
            Self::CaseFileItemOnPart => "CaseFileItemOnPart",
            Self::Role => "Role",
            Self::InputParameter => "Input",
            Self::OutputParameter => "Output",
            Self::Process => "Process",
            Self::HumanTaskModel => "HumanTask",
            Self::CaseFileItemDefinition => "CaseFileItemDefinition",
        }
    }

    pub fn is_task(self) -> bool {
        matches!(self, Self::HumanTask | Self::CaseTask | Self::ProcessTask)
    }

    /// Constructs that live in a stage's plan and can be the source of a plan item on-part.
    pub fn is_plan_item(self) -> bool {
        matches!(
            self,
            Self::Stage
                | Self::HumanTask
                | Self::CaseTask
                | Self::ProcessTask
                | Self::Milestone
                | Self::TimerEvent
                | Self::UserEvent
        )
    }

    pub fn is_criterion(self) -> bool {
        matches!(self, Self::EntryCriterion | Self::ExitCriterion)
    }

    pub fn is_on_part(self) -> bool {
        matches!(self, Self::PlanItemOnPart | Self::CaseFileItemOnPart)
    }

    pub fn is_parameter(self) -> bool {
        matches!(self, Self::InputParameter | Self::OutputParameter)
    }

    /// Model roots; they are never created or removed through the element contract.
    pub fn is_root(self) -> bool {
        matches!(
            self,
            Self::Case | Self::Process | Self::HumanTaskModel | Self::CaseFileItemDefinition
        )
    }

    /// Whether an element of this kind may own a child of kind `child`.
    pub fn accepts_child(self, child: ElementKind) -> bool {
        match self {
            Self::Case => {
                matches!(child, Self::CaseFileItem | Self::CasePlan | Self::Role)
                    || child.is_parameter()
            }
            Self::CaseFileItem => child == Self::CaseFileItem,
            Self::CasePlan => {
                child.is_plan_item() || matches!(child, Self::ExitCriterion | Self::Sentry)
            }
            Self::Stage => {
                child.is_plan_item() || child.is_criterion() || child == Self::Sentry
            }
            Self::HumanTask | Self::CaseTask | Self::ProcessTask => {
                child.is_criterion() || child.is_parameter()
            }
            Self::Milestone => child == Self::EntryCriterion,
            Self::EntryCriterion | Self::ExitCriterion | Self::Sentry => child.is_on_part(),
            Self::Process | Self::HumanTaskModel => child.is_parameter(),
            Self::TimerEvent
            | Self::UserEvent
            | Self::PlanItemOnPart
            | Self::CaseFileItemOnPart
            | Self::Role
            | Self::InputParameter
            | Self::OutputParameter
            | Self::CaseFileItemDefinition => false,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Default drawing size of constructs that get a shape.
pub trait Shaped {
    /// `(width, height)`, or `None` when the construct is never drawn.
    fn default_size(&self) -> Option<(f64, f64)>;
}

impl Shaped for ElementKind {
    fn default_size(&self) -> Option<(f64, f64)> {
        match self {
            Self::CasePlan => Some((800.0, 500.0)),
            Self::Stage => Some((420.0, 140.0)),
            Self::HumanTask | Self::CaseTask | Self::ProcessTask => Some((140.0, 80.0)),
            Self::Milestone => Some((100.0, 40.0)),
            Self::TimerEvent | Self::UserEvent => Some((32.0, 32.0)),
            Self::EntryCriterion | Self::ExitCriterion => Some((12.0, 20.0)),
            Self::CaseFileItem => Some((25.0, 40.0)),
            _ => None,
        }
    }
}

/// The four document kinds that share the definition model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    Case,
    Process,
    HumanTask,
    CaseFileItemDefinition,
}

impl ModelKind {
    pub fn root_kind(self) -> ElementKind {
        match self {
            Self::Case => ElementKind::Case,
            Self::Process => ElementKind::Process,
            Self::HumanTask => ElementKind::HumanTaskModel,
            Self::CaseFileItemDefinition => ElementKind::CaseFileItemDefinition,
        }
    }

    pub fn root_tag(self) -> &'static str {
        self.root_kind().tag()
    }

    /// File extension of the model document.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Case => "case",
            Self::Process => "process",
            Self::HumanTask => "humantask",
            Self::CaseFileItemDefinition => "cfid",
        }
    }

    /// Only case models have a companion dimensions document.
    pub fn has_dimensions(self) -> bool {
        self == Self::Case
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        [
            Self::Case,
            Self::Process,
            Self::HumanTask,
            Self::CaseFileItemDefinition,
        ]
        .into_iter()
        .find(|kind| kind.extension() == extension)
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown model kind: {value}")]
pub struct ParseModelKindError {
    value: String,
}

impl FromStr for ModelKind {
    type Err = ParseModelKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s).ok_or_else(|| ParseModelKindError {
            value: s.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{ElementKind, ModelKind, Shaped};

    #[test]
    fn every_kind_round_trips_through_its_tag() {
        for kind in ElementKind::ALL {
            assert_eq!(ElementKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(
            ElementKind::from_tag("inputs"),
            Some(ElementKind::InputParameter)
        );
        assert_eq!(ElementKind::from_tag("nope"), None);
    }

    #[rstest]
    #[case(ElementKind::Stage, ElementKind::HumanTask, true)]
    #[case(ElementKind::Stage, ElementKind::EntryCriterion, true)]
    #[case(ElementKind::CasePlan, ElementKind::EntryCriterion, false)]
    #[case(ElementKind::Milestone, ElementKind::ExitCriterion, false)]
    #[case(ElementKind::EntryCriterion, ElementKind::PlanItemOnPart, true)]
    #[case(ElementKind::HumanTask, ElementKind::Stage, false)]
    #[case(ElementKind::Case, ElementKind::Role, true)]
    fn child_rules(#[case] parent: ElementKind, #[case] child: ElementKind, #[case] ok: bool) {
        assert_eq!(parent.accepts_child(child), ok);
    }

    #[test]
    fn parameters_under_tasks_use_plural_tags() {
        assert_eq!(
            ElementKind::InputParameter.tag_within(ElementKind::HumanTask),
            "inputs"
        );
        assert_eq!(
            ElementKind::InputParameter.tag_within(ElementKind::Case),
            "input"
        );
    }

    #[test]
    fn roles_and_parameters_are_not_drawn() {
        assert_eq!(ElementKind::Role.default_size(), None);
        assert_eq!(ElementKind::HumanTask.default_size(), Some((140.0, 80.0)));
    }

    #[test]
    fn model_kind_parses_from_extension() {
        assert_eq!("case".parse::<ModelKind>(), Ok(ModelKind::Case));
        assert!("bpmn".parse::<ModelKind>().is_err());
        assert!(ModelKind::Case.has_dimensions());
        assert!(!ModelKind::Process.has_dimensions());
    }
}
