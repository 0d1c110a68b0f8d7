// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Casemodel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of casemodel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Model documents (case, process, human task, case file item definition) to and from XML.
//!
//! Parsing builds the whole element arena first and only then runs the resolve pass, so
//! references may point forward. Missing ids are generated without colliding with any id
//! that appears later in the same document. Export flattens references once and writes
//! attributes in a fixed order: identity, construct attributes, references, unknown extras.

use std::collections::HashSet;

use tracing::debug;

use crate::diagnostic::Diagnostic;
use crate::model::{
    flatten_references, resolve_references, Definition, Element, ElementData, ElementId,
    ElementKey, ElementKind, FlatReferences, Identified, Identity, IfPart, ModelKind,
    Multiplicity, Property, Reference, ReferenceAttr, ReferenceList, Referencing,
};

use super::attrs::{
    parse_child, parse_children, read_bool, read_child_text, read_string, read_string_or,
    unknown_attributes, write_bool, write_string, write_text_child,
};
use super::xml::{parse_xml, to_xml_string, XmlElement};
use super::{Exportable, ParseModelError, CAFIENNE_NAMESPACE};

const EXTENSION_ELEMENTS: &str = "extensionElements";
const START_CASE_MODEL: &str = "cafienne:start-case-model";
const IMPLEMENTATION: &str = "cafienne:implementation";
const TASK_MODEL: &str = "task-model";

/// Parses a model document of the given kind and resolves its references.
pub fn parse_model(xml: &str, model_kind: ModelKind) -> Result<Definition, ParseModelError> {
    let root = parse_xml(xml)?;
    let expected = model_kind.root_tag();
    if root.name() != expected {
        return Err(ParseModelError::UnexpectedRoot {
            expected,
            found: root.name().to_owned(),
        });
    }

    let mut parser = ModelParser::new(model_kind, &root);
    parser.parse_element(&root, model_kind.root_kind(), None);
    let mut definition = parser.finish();
    resolve_references(&mut definition);

    debug!(
        model = %model_kind,
        elements = definition.len(),
        migrated = definition.migrated(),
        diagnostics = definition.diagnostics().len(),
        "parsed model document"
    );
    Ok(definition)
}

/// Exports without the `guid` attribute; this is the form handed to an engine.
pub fn to_deployable_xml(definition: &Definition) -> String {
    to_xml_string(&DefinitionWriter::new(definition, false).root())
}

impl Exportable for Definition {
    fn to_xml_tree(&self) -> XmlElement {
        DefinitionWriter::new(self, true).root()
    }
}

struct ModelParser {
    definition: Definition,
    reserved: HashSet<String>,
    diagnostics: Vec<Diagnostic>,
}

impl ModelParser {
    fn new(model_kind: ModelKind, root: &XmlElement) -> Self {
        let mut reserved = HashSet::new();
        collect_ids(root, &mut reserved);
        Self {
            definition: Definition::empty(model_kind, root.attribute("guid")),
            reserved,
            diagnostics: Vec::new(),
        }
    }

    fn finish(self) -> Definition {
        let mut definition = self.definition;
        for diagnostic in self.diagnostics {
            definition.push_diagnostic(diagnostic);
        }
        definition
    }

    fn fresh_id(&mut self, kind: ElementKind) -> ElementId {
        let reserved = &self.reserved;
        let index = &self.definition.index;
        self.definition
            .naming
            .next_id(kind, |id| reserved.contains(id) || index.contains_key(id))
    }

    fn read_identity(&mut self, node: &XmlElement, kind: ElementKind) -> Identity {
        let name = read_string(node, "name");
        let raw_id = node.attribute("id").map(str::trim).filter(|id| !id.is_empty());
        let id = match raw_id {
            Some(raw) if self.definition.key_of(raw).is_some() => {
                let id = self.fresh_id(kind);
                self.diagnostics.push(Diagnostic::warning(
                    Some(raw),
                    format!("duplicate id on <{}>, renamed to {id}", node.name()),
                ));
                id
            }
            Some(raw) => match ElementId::new(raw) {
                Ok(id) => id,
                Err(err) => {
                    let id = self.fresh_id(kind);
                    self.diagnostics.push(Diagnostic::warning(
                        Some(raw),
                        format!("invalid id on <{}> ({err}), renamed to {id}", node.name()),
                    ));
                    id
                }
            },
            None if kind.is_root() => name
                .as_deref()
                .and_then(|name| {
                    ElementId::new(format!("{name}.{}", self.definition.model_kind().extension()))
                        .ok()
                })
                .unwrap_or_else(|| self.fresh_id(kind)),
            None => self.fresh_id(kind),
        };
        Identity::from_wire(id, name, read_string(node, "description"))
    }

    fn parse_element(
        &mut self,
        node: &XmlElement,
        kind: ElementKind,
        parent: Option<ElementKey>,
    ) -> Option<ElementKey> {
        let identity = self.read_identity(node, kind);
        let owner = identity.id().as_str().to_owned();
        let key = match self.definition.insert(kind, identity, parent) {
            Ok(key) => key,
            Err(err) => {
                self.diagnostics
                    .push(Diagnostic::warning(Some(owner.as_str()), err.to_string()));
                return None;
            }
        };

        let data = self.read_data(node, kind, &owner);
        let legacy_criteria = if kind.is_plan_item() {
            legacy_criteria(node)
        } else {
            Vec::new()
        };
        if let Some(element) = self.definition.element_mut(key) {
            element.data = data;
            element.legacy_criteria = legacy_criteria;
            element.extra_attributes = unknown_attributes(node, known_attributes(kind));
        }

        let (extensions, extras) = self.parse_children(node, kind, key);
        if let Some(element) = self.definition.element_mut(key) {
            element.extensions = extensions;
            element.extra_children = extras;
        }
        Some(key)
    }

    fn read_data(&mut self, node: &XmlElement, kind: ElementKind, owner: &str) -> ElementData {
        let owner = Some(owner);
        let diagnostics = &mut self.diagnostics;
        match kind {
            ElementKind::CaseFileItem => {
                let multiplicity = match read_string(node, "multiplicity") {
                    None => Multiplicity::default(),
                    Some(raw) => raw.parse::<Multiplicity>().unwrap_or_else(|err| {
                        diagnostics.push(Diagnostic::warning(owner, format!("{err}")));
                        Multiplicity::default()
                    }),
                };
                ElementData::CaseFileItem {
                    multiplicity,
                    definition_ref: read_string(node, "definitionRef"),
                }
            }
            ElementKind::CasePlan | ElementKind::Stage => ElementData::Stage {
                auto_complete: read_bool(node, "autoComplete", true, owner, diagnostics),
            },
            ElementKind::HumanTask => ElementData::HumanTask {
                is_blocking: read_bool(node, "isBlocking", true, owner, diagnostics),
                performer: Reference::from_wire(node.attribute("performerRef")),
            },
            ElementKind::CaseTask => ElementData::CaseTask {
                is_blocking: read_bool(node, "isBlocking", true, owner, diagnostics),
                case_ref: read_string(node, "caseRef"),
            },
            ElementKind::ProcessTask => ElementData::ProcessTask {
                is_blocking: read_bool(node, "isBlocking", true, owner, diagnostics),
                process_ref: read_string(node, "processRef"),
            },
            ElementKind::TimerEvent => ElementData::TimerEvent {
                timer_expression: node.child("timerExpression").and_then(body_text),
            },
            ElementKind::UserEvent => ElementData::UserEvent {
                authorized_roles: ReferenceList::from_wire(node.attribute("authorizedRoleRefs")),
                legacy_authorized_role: wire_id(node, "authorizedRoleRef"),
            },
            ElementKind::EntryCriterion | ElementKind::ExitCriterion => ElementData::Criterion {
                sentry_ref: wire_id(node, "sentryRef"),
                legacy_sentry: None,
                if_part: parse_child(node, "ifPart", read_if_part),
            },
            ElementKind::Sentry => ElementData::Sentry {
                if_part: parse_child(node, "ifPart", read_if_part),
            },
            ElementKind::PlanItemOnPart => ElementData::PlanItemOnPart {
                standard_event: read_child_text(node, "standardEvent"),
                source: Reference::from_wire(node.attribute("sourceRef")),
                exit_criterion: Reference::from_wire(node.attribute("exitCriterionRef")),
            },
            ElementKind::CaseFileItemOnPart => ElementData::CaseFileItemOnPart {
                standard_event: read_child_text(node, "standardEvent"),
                source: Reference::from_wire(node.attribute("sourceRef")),
            },
            ElementKind::InputParameter | ElementKind::OutputParameter => ElementData::Parameter {
                binding: Reference::from_wire(node.attribute("bindingRef")),
            },
            ElementKind::CaseFileItemDefinition => ElementData::CaseFileItemDefinition {
                definition_type: read_string(node, "definitionType"),
                structure_ref: read_string(node, "structureRef"),
                properties: parse_children(node, "property", |row| Property {
                    name: read_string_or(row, "name", ""),
                    property_type: read_string(row, "type"),
                }),
            },
            ElementKind::Case
            | ElementKind::Milestone
            | ElementKind::Role
            | ElementKind::Process
            | ElementKind::HumanTaskModel => ElementData::default_for(kind),
        }
    }

    /// Parses nested elements; returns the uninterpreted extension content and unknown
    /// children.
    fn parse_children(
        &mut self,
        node: &XmlElement,
        kind: ElementKind,
        key: ElementKey,
    ) -> (Vec<XmlElement>, Vec<XmlElement>) {
        let mut extensions = Vec::new();
        let mut extras = Vec::new();
        let consumed = consumed_children(kind);

        for child in node.children() {
            let name = child.name();
            match (kind, name) {
                (_, EXTENSION_ELEMENTS) => {
                    for extension in child.children() {
                        if kind == ElementKind::Case && extension.name() == START_CASE_MODEL {
                            self.set_start_case_schema(key, extension.text());
                        } else {
                            extensions.push(extension.clone());
                        }
                    }
                }
                (ElementKind::Case, "caseFileModel") => {
                    for item in child.children_named("caseFileItem") {
                        self.parse_element(item, ElementKind::CaseFileItem, Some(key));
                    }
                }
                (ElementKind::Case, "caseRoles") => self.parse_case_roles(child, key),
                (ElementKind::CaseFileItem, "children") => {
                    for item in child.children_named("caseFileItem") {
                        self.parse_element(item, ElementKind::CaseFileItem, Some(key));
                    }
                }
                (ElementKind::HumanTaskModel, IMPLEMENTATION) => {
                    self.parse_implementation(child, key);
                }
                _ if consumed.contains(&name) => {}
                _ => match ElementKind::from_tag(name) {
                    Some(child_kind)
                        if kind.accepts_child(child_kind) && child_kind.tag_within(kind) == name =>
                    {
                        self.parse_element(child, child_kind, Some(key));
                    }
                    _ => extras.push(child.clone()),
                },
            }
        }
        (extensions, extras)
    }

    fn set_start_case_schema(&mut self, key: ElementKey, text: Option<&str>) {
        if let Some(ElementData::Case { start_case_schema }) =
            self.definition.element_mut(key).map(|element| &mut element.data)
        {
            *start_case_schema = text.map(ToOwned::to_owned);
        }
    }

    /// Current format wraps `<role>` rows in `<caseRoles>`; the older format used one
    /// `<caseRoles id=.. name=..>` element per role.
    fn parse_case_roles(&mut self, node: &XmlElement, case: ElementKey) {
        if node.attribute("id").is_some() && node.child("role").is_none() {
            self.parse_element(node, ElementKind::Role, Some(case));
            self.definition.mark_migrated("caseRoles");
            return;
        }
        for role in node.children_named("role") {
            self.parse_element(role, ElementKind::Role, Some(case));
        }
    }

    fn parse_implementation(&mut self, node: &XmlElement, root: ElementKey) {
        let mut extras = Vec::new();
        let mut model = None;
        for child in node.children() {
            match child.name() {
                "input" => {
                    self.parse_element(child, ElementKind::InputParameter, Some(root));
                }
                "output" => {
                    self.parse_element(child, ElementKind::OutputParameter, Some(root));
                }
                TASK_MODEL => model = child.text().map(ToOwned::to_owned),
                _ => extras.push(child.clone()),
            }
        }
        if let Some(ElementData::HumanTaskModel {
            implementation_attributes,
            implementation_extras,
            task_model,
        }) = self
            .definition
            .element_mut(root)
            .map(|element| &mut element.data)
        {
            *implementation_attributes = node.attributes().to_vec();
            *implementation_extras = extras;
            *task_model = model;
        }
    }
}

fn collect_ids(node: &XmlElement, ids: &mut HashSet<String>) {
    if let Some(id) = node.attribute("id").map(str::trim).filter(|id| !id.is_empty()) {
        ids.insert(id.to_owned());
    }
    for child in node.children() {
        collect_ids(child, ids);
    }
}

fn wire_id(node: &XmlElement, name: &str) -> Option<ElementId> {
    node.attribute(name)
        .and_then(|value| ElementId::new(value.trim()).ok())
}

fn legacy_criteria(node: &XmlElement) -> Vec<(ElementKind, ElementId)> {
    [
        ("entryCriteriaRefs", ElementKind::EntryCriterion),
        ("exitCriteriaRefs", ElementKind::ExitCriterion),
    ]
    .into_iter()
    .flat_map(|(attr, kind)| {
        node.attribute(attr)
            .unwrap_or_default()
            .split_whitespace()
            .filter_map(move |token| ElementId::new(token).ok().map(|id| (kind, id)))
            .collect::<Vec<_>>()
    })
    .collect()
}

/// Text of an expression element: its `<body>` child, or its own text.
fn body_text(node: &XmlElement) -> Option<String> {
    read_child_text(node, "body").or_else(|| {
        node.text()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(ToOwned::to_owned)
    })
}

fn read_if_part(node: &XmlElement) -> IfPart {
    let condition = node.child("condition");
    IfPart {
        context_ref: Reference::from_wire(node.attribute("contextRef")),
        condition: condition.and_then(body_text),
        language: condition.and_then(|condition| read_string(condition, "language")),
    }
}

const IDENTITY_ATTRIBUTES: &[&str] = &["id", "name", "description"];

fn known_attributes(kind: ElementKind) -> &'static [&'static str] {
    match kind {
        ElementKind::Case | ElementKind::Process | ElementKind::HumanTaskModel => {
            &["id", "name", "description", "guid"]
        }
        ElementKind::CaseFileItemDefinition => &[
            "id",
            "name",
            "description",
            "guid",
            "definitionType",
            "structureRef",
        ],
        ElementKind::CaseFileItem => &["id", "name", "description", "multiplicity", "definitionRef"],
        ElementKind::CasePlan | ElementKind::Stage => &[
            "id",
            "name",
            "description",
            "autoComplete",
            "entryCriteriaRefs",
            "exitCriteriaRefs",
        ],
        ElementKind::HumanTask => &[
            "id",
            "name",
            "description",
            "isBlocking",
            "performerRef",
            "entryCriteriaRefs",
            "exitCriteriaRefs",
        ],
        ElementKind::CaseTask => &[
            "id",
            "name",
            "description",
            "isBlocking",
            "caseRef",
            "entryCriteriaRefs",
            "exitCriteriaRefs",
        ],
        ElementKind::ProcessTask => &[
            "id",
            "name",
            "description",
            "isBlocking",
            "processRef",
            "entryCriteriaRefs",
            "exitCriteriaRefs",
        ],
        ElementKind::Milestone | ElementKind::TimerEvent => &[
            "id",
            "name",
            "description",
            "entryCriteriaRefs",
            "exitCriteriaRefs",
        ],
        ElementKind::UserEvent => &[
            "id",
            "name",
            "description",
            "authorizedRoleRefs",
            "authorizedRoleRef",
            "entryCriteriaRefs",
            "exitCriteriaRefs",
        ],
        ElementKind::EntryCriterion | ElementKind::ExitCriterion => {
            &["id", "name", "description", "sentryRef"]
        }
        ElementKind::PlanItemOnPart => {
            &["id", "name", "description", "sourceRef", "exitCriterionRef"]
        }
        ElementKind::CaseFileItemOnPart => &["id", "name", "description", "sourceRef"],
        ElementKind::InputParameter | ElementKind::OutputParameter => {
            &["id", "name", "description", "bindingRef"]
        }
        ElementKind::Sentry | ElementKind::Role => IDENTITY_ATTRIBUTES,
    }
}

/// Child tags read into [`ElementData`] rather than parsed as elements.
fn consumed_children(kind: ElementKind) -> &'static [&'static str] {
    match kind {
        ElementKind::TimerEvent => &["timerExpression"],
        ElementKind::EntryCriterion | ElementKind::ExitCriterion | ElementKind::Sentry => {
            &["ifPart"]
        }
        ElementKind::PlanItemOnPart | ElementKind::CaseFileItemOnPart => &["standardEvent"],
        ElementKind::CaseFileItemDefinition => &["property"],
        _ => &[],
    }
}

struct DefinitionWriter<'a> {
    definition: &'a Definition,
    refs: FlatReferences,
    with_guid: bool,
}

impl<'a> DefinitionWriter<'a> {
    fn new(definition: &'a Definition, with_guid: bool) -> Self {
        Self {
            definition,
            refs: flatten_references(definition),
            with_guid,
        }
    }

    fn root(&self) -> XmlElement {
        match self.definition.root_element() {
            Some(root) => self.element_node(root, None),
            None => XmlElement::new(self.definition.model_kind().root_tag()),
        }
    }

    fn children<'b>(&'b self, element: &'b Element) -> impl Iterator<Item = &'a Element> + 'b {
        element
            .children()
            .iter()
            .filter_map(|key| self.definition.element(*key))
    }

    fn element_node(&self, element: &Element, parent: Option<ElementKind>) -> XmlElement {
        let kind = element.kind();
        let tag = parent.map_or(kind.tag(), |parent| kind.tag_within(parent));
        let mut node = XmlElement::new(tag);

        let identity = element.identity();
        node.set_attribute("id", identity.id().as_str());
        write_string(&mut node, "name", identity.explicit_name());
        write_string(&mut node, "description", identity.explicit_description());
        if kind.is_root() && self.with_guid {
            node.set_attribute("guid", self.definition.guid());
        }
        write_data_attributes(&mut node, element.data());
        for (attr, _) in element.reference_slots() {
            if attr != ReferenceAttr::ContextRef {
                write_string(&mut node, attr.wire_name(), self.refs.get(element.key(), attr));
            }
        }
        for (name, value) in element.extra_attributes() {
            node.set_attribute(name.as_str(), value.as_str());
        }

        self.write_extension_elements(&mut node, element);
        self.write_children(&mut node, element);
        for extra in element.extra_children() {
            node.push_child(extra.clone());
        }
        node
    }

    fn write_extension_elements(&self, node: &mut XmlElement, element: &Element) {
        let mut extension = XmlElement::new(EXTENSION_ELEMENTS);
        if let ElementData::Case {
            start_case_schema: Some(schema),
        } = element.data()
        {
            let mut start = XmlElement::new(START_CASE_MODEL);
            start.set_attribute("xmlns:cafienne", CAFIENNE_NAMESPACE);
            start.set_text(Some(schema.as_str()));
            extension.push_child(start);
        }
        for raw in element.extensions() {
            extension.push_child(raw.clone());
        }
        if !extension.children().is_empty() {
            node.push_child(extension);
        }
    }

    fn write_children(&self, node: &mut XmlElement, element: &Element) {
        let kind = element.kind();
        match element.data() {
            ElementData::Case { .. } => self.write_case_children(node, element),
            ElementData::CaseFileItem { .. } => {
                let items: Vec<XmlElement> = self
                    .children(element)
                    .map(|item| self.element_node(item, Some(kind)))
                    .collect();
                if !items.is_empty() {
                    node.push_child(wrap("children", items));
                }
            }
            ElementData::HumanTaskModel {
                implementation_attributes,
                implementation_extras,
                task_model,
            } => {
                let mut implementation = XmlElement::new(IMPLEMENTATION);
                for (name, value) in implementation_attributes {
                    implementation.set_attribute(name.as_str(), value.as_str());
                }
                for parameter in self.children(element) {
                    implementation.push_child(self.element_node(parameter, Some(kind)));
                }
                write_text_child(&mut implementation, TASK_MODEL, task_model.as_deref());
                for extra in implementation_extras {
                    implementation.push_child(extra.clone());
                }
                if !implementation.is_empty() {
                    node.push_child(implementation);
                }
            }
            ElementData::TimerEvent { timer_expression } => {
                if let Some(expression) = timer_expression {
                    let mut timer = XmlElement::new("timerExpression");
                    write_text_child(&mut timer, "body", Some(expression));
                    node.push_child(timer);
                }
            }
            ElementData::PlanItemOnPart { standard_event, .. }
            | ElementData::CaseFileItemOnPart { standard_event, .. } => {
                write_text_child(node, "standardEvent", standard_event.as_deref());
            }
            ElementData::CaseFileItemDefinition { properties, .. } => {
                for property in properties {
                    let mut row = XmlElement::new("property");
                    row.set_attribute("name", property.name.as_str());
                    write_string(&mut row, "type", property.property_type.as_deref());
                    node.push_child(row);
                }
            }
            ElementData::Criterion { if_part, .. } | ElementData::Sentry { if_part } => {
                for child in self.children(element) {
                    node.push_child(self.element_node(child, Some(kind)));
                }
                if let Some(if_part) = if_part
                    .as_ref()
                    .and_then(|if_part| self.if_part_node(element.key(), if_part))
                {
                    node.push_child(if_part);
                }
            }
            _ => {
                for child in self.children(element) {
                    node.push_child(self.element_node(child, Some(kind)));
                }
            }
        }
    }

    /// Case children are grouped by section whatever their creation order.
    fn write_case_children(&self, node: &mut XmlElement, case: &Element) {
        let section = |wanted: ElementKind| -> Vec<XmlElement> {
            self.children(case)
                .filter(|child| child.kind() == wanted)
                .map(|child| self.element_node(child, Some(ElementKind::Case)))
                .collect()
        };

        let items = section(ElementKind::CaseFileItem);
        if !items.is_empty() {
            node.push_child(wrap("caseFileModel", items));
        }
        for plan in section(ElementKind::CasePlan) {
            node.push_child(plan);
        }
        let roles = section(ElementKind::Role);
        if !roles.is_empty() {
            node.push_child(wrap("caseRoles", roles));
        }
        for parameter in section(ElementKind::InputParameter)
            .into_iter()
            .chain(section(ElementKind::OutputParameter))
        {
            node.push_child(parameter);
        }
    }

    /// `None` when there is neither a live context nor a condition to write.
    fn if_part_node(&self, owner: ElementKey, if_part: &IfPart) -> Option<XmlElement> {
        let context = self.refs.get(owner, ReferenceAttr::ContextRef);
        if context.is_none() && if_part.condition.is_none() {
            return None;
        }
        let mut node = XmlElement::new("ifPart");
        write_string(&mut node, "contextRef", context);
        if let Some(condition) = &if_part.condition {
            let mut expression = XmlElement::new("condition");
            write_string(&mut expression, "language", if_part.language.as_deref());
            write_text_child(&mut expression, "body", Some(condition));
            node.push_child(expression);
        }
        Some(node)
    }
}

fn write_data_attributes(node: &mut XmlElement, data: &ElementData) {
    match data {
        ElementData::CaseFileItem {
            multiplicity,
            definition_ref,
        } => {
            if *multiplicity != Multiplicity::default() {
                node.set_attribute("multiplicity", multiplicity.as_str());
            }
            write_string(node, "definitionRef", definition_ref.as_deref());
        }
        ElementData::Stage { auto_complete } => {
            write_bool(node, "autoComplete", *auto_complete, true);
        }
        ElementData::HumanTask { is_blocking, .. } => {
            write_bool(node, "isBlocking", *is_blocking, true);
        }
        ElementData::CaseTask {
            is_blocking,
            case_ref,
        } => {
            write_bool(node, "isBlocking", *is_blocking, true);
            write_string(node, "caseRef", case_ref.as_deref());
        }
        ElementData::ProcessTask {
            is_blocking,
            process_ref,
        } => {
            write_bool(node, "isBlocking", *is_blocking, true);
            write_string(node, "processRef", process_ref.as_deref());
        }
        ElementData::CaseFileItemDefinition {
            definition_type,
            structure_ref,
            ..
        } => {
            write_string(node, "definitionType", definition_type.as_deref());
            write_string(node, "structureRef", structure_ref.as_deref());
        }
        _ => {}
    }
}

fn wrap(tag: &str, children: Vec<XmlElement>) -> XmlElement {
    children
        .into_iter()
        .fold(XmlElement::new(tag), XmlElement::with_child)
}

#[cfg(test)]
mod tests;
