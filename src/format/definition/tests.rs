// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Casemodel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of casemodel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::rstest;

use super::{parse_model, to_deployable_xml};
use crate::diagnostic::Severity;
use crate::format::{Exportable, ParseModelError};
use crate::model::fixtures::{
    claims_case, legacy_case, ASSESS_HUMANTASK, CLAIMS_CASE, CLAIM_CFID, LEGACY_CASE,
    PAYOUT_PROCESS,
};
use crate::model::{
    Definition, ElementData, ElementId, ElementKey, ElementKind, Identified, ModelKind,
    Multiplicity, ReferenceAttr,
};

fn refs(definition: &Definition, owner: ElementKey, attr: ReferenceAttr) -> Vec<&str> {
    definition
        .reference_ids(owner, attr)
        .into_iter()
        .map(ElementId::as_str)
        .collect()
}

fn key(definition: &Definition, id: &str) -> ElementKey {
    definition.key_of(id).unwrap_or_else(|| panic!("missing {id}"))
}

#[test]
fn claims_case_parses_every_construct() {
    let definition = claims_case();

    assert_eq!(definition.len(), 17);
    assert_eq!(definition.guid(), "_abc12");
    assert!(!definition.migrated());
    assert!(definition.diagnostics().is_empty());

    let task = definition
        .get_element("ht__abc12_0", Some(ElementKind::HumanTask))
        .expect("task");
    assert_eq!(task.name(), "Assess claim");
    assert_eq!(
        refs(&definition, task.key(), ReferenceAttr::PerformerRef),
        ["role__abc12_0"]
    );
    assert_eq!(task.extensions().len(), 1);

    let event = key(&definition, "ue__abc12_0");
    assert_eq!(
        refs(&definition, event, ReferenceAttr::AuthorizedRoleRefs),
        ["role__abc12_0", "role__abc12_1"]
    );

    let on_part = key(&definition, "onpart__abc12_0");
    assert_eq!(
        refs(&definition, on_part, ReferenceAttr::SourceRef),
        ["ms__abc12_0"]
    );
    let criterion = key(&definition, "crit__abc12_0");
    assert_eq!(
        refs(&definition, criterion, ReferenceAttr::ContextRef),
        ["cfi__abc12_0"]
    );
    let if_part = definition
        .element(criterion)
        .and_then(|element| element.data().if_part())
        .expect("if part");
    assert_eq!(if_part.condition.as_deref(), Some("claim.amount > 100"));
    assert_eq!(if_part.language.as_deref(), Some("spel"));

    let timer = definition
        .get_element("tmr__abc12_0", None)
        .expect("timer");
    assert!(matches!(
        timer.data(),
        ElementData::TimerEvent { timer_expression: Some(expression) } if expression == "P3D"
    ));

    let attachments = key(&definition, "cfi__abc12_1");
    assert_eq!(
        definition.element(attachments).and_then(|e| e.parent()),
        Some(key(&definition, "cfi__abc12_0"))
    );
    assert!(matches!(
        definition.element(attachments).map(|e| e.data()),
        Some(ElementData::CaseFileItem {
            multiplicity: Multiplicity::ZeroOrMore,
            ..
        })
    ));

    assert!(matches!(
        definition.root_element().map(|root| root.data()),
        Some(ElementData::Case { start_case_schema: Some(schema) }) if schema.contains("\"claim\"")
    ));
    assert!(matches!(
        definition
            .case_plan()
            .and_then(|plan| definition.element(plan))
            .map(|plan| plan.data()),
        Some(ElementData::Stage {
            auto_complete: false
        })
    ));
}

#[rstest]
#[case::claims(CLAIMS_CASE, ModelKind::Case)]
#[case::legacy(LEGACY_CASE, ModelKind::Case)]
#[case::human_task(ASSESS_HUMANTASK, ModelKind::HumanTask)]
#[case::process(PAYOUT_PROCESS, ModelKind::Process)]
#[case::case_file_item_definition(CLAIM_CFID, ModelKind::CaseFileItemDefinition)]
fn export_is_idempotent(#[case] xml: &str, #[case] kind: ModelKind) {
    let first = parse_model(xml, kind).expect("parse").to_xml();
    let second = parse_model(&first, kind).expect("reparse").to_xml();
    assert_eq!(first, second);
}

#[test]
fn export_normalizes_defaults_and_groups_case_sections() {
    let xml = claims_case().to_xml();

    assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(!xml.contains(r#"multiplicity="ExactlyOne""#));
    assert!(xml.contains(r#"multiplicity="ZeroOrMore""#));
    assert!(xml.contains(r#"autoComplete="false""#));
    assert!(!xml.contains("isBlocking"));
    assert!(xml.contains(r#"<inputs id="in__abc12_0" name="claim" bindingRef="cfi__abc12_0"/>"#));
    assert!(xml.contains(r#"<input id="in__abc12_1" name="claim" bindingRef="cfi__abc12_0"/>"#));
    assert!(xml.contains(r#"authorizedRoleRefs="role__abc12_0 role__abc12_1""#));
    assert!(xml.contains(r#"<cafienne:start-case-model xmlns:cafienne="org.cafienne">"#));

    let file_model = xml.find("<caseFileModel>").expect("case file model");
    let plan = xml.find("<casePlanModel").expect("plan");
    let roles = xml.find("<caseRoles>").expect("roles");
    assert!(file_model < plan && plan < roles);
}

#[test]
fn name_and_description_collapse_on_export() {
    let mut definition = claims_case();
    let milestone = key(&definition, "ms__abc12_0");
    if let Some(element) = definition.element_mut(milestone) {
        element.identity_mut().set_name("ms__abc12_0");
        element.identity_mut().set_description("ms__abc12_0");
        assert_eq!(element.name(), "ms__abc12_0");
    }
    let role = key(&definition, "role__abc12_1");
    if let Some(element) = definition.element_mut(role) {
        element.identity_mut().set_description("Manager");
    }

    let xml = definition.to_xml();
    assert!(xml.contains(r#"<milestone id="ms__abc12_0"/>"#));
    assert!(xml.contains(r#"<role id="role__abc12_1" name="Manager"/>"#));
}

#[test]
fn deployable_form_strips_guid() {
    let definition = claims_case();
    assert!(definition.to_xml().contains(r#"guid="_abc12""#));

    let deployable = to_deployable_xml(&definition);
    assert!(!deployable.contains("guid="));
    assert!(deployable.contains(r#"<case id="claims.case" name="claims""#));
}

#[test]
fn wrong_root_is_a_load_failure() {
    let err = parse_model(CLAIMS_CASE, ModelKind::Process).unwrap_err();
    assert!(matches!(
        err,
        ParseModelError::UnexpectedRoot {
            expected: "process",
            ..
        }
    ));
}

#[test]
fn malformed_xml_is_a_load_failure() {
    let result = parse_model("<case><casePlanModel></case>", ModelKind::Case);
    assert!(matches!(result, Err(ParseModelError::Xml(_))));
}

#[test]
fn legacy_constructs_are_migrated() {
    let definition = legacy_case();
    assert!(definition.migrated());
    assert!(definition.get_element("s_ready", None).is_none());
    assert!(definition.get_element("s_cancel", None).is_none());

    let review = key(&definition, "ht_review");
    let kinds: Vec<ElementKind> = definition
        .children_of(review)
        .iter()
        .filter_map(|child| definition.kind_of(*child))
        .collect();
    assert_eq!(
        kinds,
        [ElementKind::EntryCriterion, ElementKind::ExitCriterion]
    );

    let entry = definition.children_of(review)[0];
    assert_eq!(
        definition.legacy_sentry_of(entry).map(ElementId::as_str),
        Some("s_ready")
    );
    let on_parts = definition.children_of(entry);
    assert_eq!(on_parts.len(), 1);
    assert_eq!(
        refs(&definition, on_parts[0], ReferenceAttr::SourceRef),
        ["ue_start"]
    );
    assert_eq!(
        refs(&definition, entry, ReferenceAttr::ContextRef),
        ["cfi_doc"]
    );

    let done = key(&definition, "ms_done");
    let done_criterion = definition.children_of(done)[0];
    let copied = definition.children_of(done_criterion)[0];
    assert_ne!(copied, on_parts[0]);
    assert_eq!(
        refs(&definition, copied, ReferenceAttr::SourceRef),
        ["ue_start"]
    );

    let start = key(&definition, "ue_start");
    assert_eq!(
        refs(&definition, start, ReferenceAttr::AuthorizedRoleRefs),
        ["r_clerk"]
    );
    assert!(definition.diagnostics().iter().any(|diagnostic| {
        diagnostic.element_id() == Some("s_unused") && diagnostic.severity() == Severity::Info
    }));

    let xml = definition.to_xml();
    assert!(!xml.contains("entryCriteriaRefs"));
    assert!(!xml.contains("sentryRef"));
    assert!(!xml.contains("authorizedRoleRef="));
    assert!(xml.contains(r#"<role id="r_clerk" name="Clerk"/>"#));
    assert!(xml.contains(r#"authorizedRoleRefs="r_clerk""#));
}

#[test]
fn unknown_attributes_and_children_survive_export() {
    let xml = r#"<case id="x.case" name="x" guid="_g0001" xmlns:vendor="urn:v" vendor:flag="1">
        <casePlanModel id="cm_1" name="x" color="red">
            <milestone id="ms_1"><vendor:note>keep me</vendor:note></milestone>
        </casePlanModel>
    </case>"#;
    let out = parse_model(xml, ModelKind::Case).expect("parse").to_xml();

    assert!(out.contains(r#"xmlns:vendor="urn:v" vendor:flag="1""#));
    assert!(out.contains(r#"color="red""#));
    assert!(out.contains("<vendor:note>keep me</vendor:note>"));
}

#[test]
fn missing_and_duplicate_ids_get_fresh_ids() {
    let xml = r#"<case id="d.case" name="d" guid="_g0002">
        <casePlanModel id="cm_1">
            <milestone name="first"/>
            <milestone id="ms__g0002_0" name="second"/>
            <milestone id="ms__g0002_0" name="third"/>
        </casePlanModel>
    </case>"#;
    let definition = parse_model(xml, ModelKind::Case).expect("parse");
    let plan = definition.case_plan().expect("plan");
    let ids: Vec<&str> = definition
        .children_of(plan)
        .iter()
        .filter_map(|child| definition.id_of(*child))
        .map(ElementId::as_str)
        .collect();

    assert_eq!(ids.len(), 3);
    assert_eq!(ids[1], "ms__g0002_0");
    assert_ne!(ids[0], ids[1]);
    assert_ne!(ids[2], ids[1]);
    assert_ne!(ids[0], ids[2]);
    assert_eq!(definition.diagnostics().len(), 1);
}

#[test]
fn dangling_and_mistyped_references_are_dropped_with_diagnostics() {
    let xml = r#"<case id="r.case" name="r" guid="_g0003">
        <casePlanModel id="cm_1">
            <humanTask id="ht_1" performerRef="ms_1"/>
            <userEvent id="ue_1" authorizedRoleRefs="role_1 ghost"/>
            <milestone id="ms_1"/>
        </casePlanModel>
        <caseRoles><role id="role_1"/></caseRoles>
    </case>"#;
    let definition = parse_model(xml, ModelKind::Case).expect("parse");

    let task = key(&definition, "ht_1");
    assert!(refs(&definition, task, ReferenceAttr::PerformerRef).is_empty());
    let event = key(&definition, "ue_1");
    assert_eq!(
        refs(&definition, event, ReferenceAttr::AuthorizedRoleRefs),
        ["role_1"]
    );
    assert_eq!(definition.diagnostics().len(), 2);

    let out = definition.to_xml();
    assert!(!out.contains("performerRef"));
    assert!(out.contains(r#"authorizedRoleRefs="role_1""#));
}

#[test]
fn empty_if_parts_are_omitted_on_export() {
    let xml = r#"<case id="s.case" name="s" guid="_g0005">
        <casePlanModel id="cm_1">
            <humanTask id="ht_1" entryCriteriaRefs="s_1" exitCriteriaRefs="s_1"/>
            <milestone id="ms_1">
                <entryCriterion id="crit_1" sentryRef="s_1"/>
            </milestone>
            <sentry id="s_1">
                <planItemOnPart id="onpart_1" sourceRef="ht_1"/>
                <ifPart/>
            </sentry>
        </casePlanModel>
    </case>"#;
    let definition = parse_model(xml, ModelKind::Case).expect("parse");
    assert!(definition.migrated());

    let out = definition.to_xml();
    assert_eq!(out.matches("<planItemOnPart").count(), 3);
    assert!(!out.contains("ifPart"));
    assert_eq!(parse_model(&out, ModelKind::Case).expect("reparse").to_xml(), out);
}

#[test]
fn if_part_without_live_context_or_condition_is_omitted() {
    let xml = r#"<case id="i.case" name="i" guid="_g0006">
        <caseFileModel>
            <caseFileItem id="cfi_1" name="doc"/>
        </caseFileModel>
        <casePlanModel id="cm_1">
            <exitCriterion id="crit_1">
                <ifPart contextRef="cfi_1"/>
            </exitCriterion>
            <exitCriterion id="crit_2">
                <ifPart contextRef="ghost"/>
            </exitCriterion>
        </casePlanModel>
    </case>"#;
    let mut definition = parse_model(xml, ModelKind::Case).expect("parse");
    let out = definition.to_xml();
    assert_eq!(out.matches("<ifPart").count(), 1);
    assert!(out.contains(r#"<ifPart contextRef="cfi_1"/>"#));

    let item = key(&definition, "cfi_1");
    definition.remove(item).expect("remove case file item");
    assert!(!definition.to_xml().contains("ifPart"));
}

#[test]
fn if_part_with_a_condition_survives_losing_its_context() {
    let mut definition = claims_case();
    let item = key(&definition, "cfi__abc12_0");
    definition.remove(item).expect("remove case file item");

    let out = definition.to_xml();
    assert!(out.contains("<ifPart>"));
    assert!(!out.contains("contextRef"));
    assert!(out.contains("claim.amount &gt; 100"));
}

#[test]
fn human_task_model_keeps_implementation_content() {
    let definition = parse_model(ASSESS_HUMANTASK, ModelKind::HumanTask).expect("parse");
    let root = definition.root_element().expect("root");
    assert_eq!(root.children().len(), 2);
    assert!(matches!(
        root.data(),
        ElementData::HumanTaskModel { task_model: Some(model), implementation_extras, .. }
            if model.contains("object") && implementation_extras.len() == 1
    ));

    let xml = definition.to_xml();
    assert!(xml.contains(r#"class="org.cafienne.cmmn.definition.task.WorkflowTaskDefinition""#));
    assert!(xml.contains(r#"<input id="in__ht001_0" name="claim"/>"#));
    assert!(xml.contains("<duedate id=\"due_1\">"));
}

#[test]
fn case_file_item_definition_properties_round_trip() {
    let definition =
        parse_model(CLAIM_CFID, ModelKind::CaseFileItemDefinition).expect("parse");
    let Some(ElementData::CaseFileItemDefinition { properties, .. }) =
        definition.root_element().map(|root| root.data())
    else {
        panic!("expected a case file item definition");
    };
    let names: Vec<&str> = properties.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["amount", "reason"]);
    assert!(definition
        .to_xml()
        .contains(r#"<property name="reason" type="http://www.omg.org/spec/CMMN/PropertyType/string"/>"#));
}
