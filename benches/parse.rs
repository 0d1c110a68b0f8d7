// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Casemodel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of casemodel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt::Write as _;

use casemodel::format::{parse_dimensions, parse_model, Exportable};
use casemodel::model::ModelKind;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

const CLAIMS_CASE: &str = include_str!("../tests/fixtures/claims.case");
const CLAIMS_DIMENSIONS: &str = include_str!("../tests/fixtures/claims.dimensions");
const LEGACY_CASE: &str = include_str!("../tests/fixtures/legacy.case");

/// A flat case plan of `stages` stages, each with a task guarded by a criterion listening to
/// the previous stage's milestone.
fn generated_case(stages: usize) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<case id="bench.case" name="bench" guid="_bench">
    <casePlanModel id="cm__bench_0" name="bench">
"#,
    );
    for n in 0..stages {
        let _ = write!(
            xml,
            r#"        <stage id="st_{n}" name="Stage {n}">
            <humanTask id="ht_{n}" name="Task {n}" performerRef="role_0">
                <entryCriterion id="crit_{n}">
                    <planItemOnPart id="op_{n}" sourceRef="ms_{prev}">
                        <standardEvent>occur</standardEvent>
                    </planItemOnPart>
                </entryCriterion>
            </humanTask>
        </stage>
        <milestone id="ms_{n}" name="Milestone {n}"/>
"#,
            prev = n.saturating_sub(1)
        );
    }
    xml.push_str(
        r#"    </casePlanModel>
    <caseRoles>
        <role id="role_0" name="Worker"/>
    </caseRoles>
</case>
"#,
    );
    xml
}

// Benchmark identity (keep stable):
// - Group names: `format.parse_model`, `format.export_model`, `format.parse_dimensions`
// - Case ids: `claims`, `legacy`, `generated_200`
fn benches_parse(c: &mut Criterion) {
    let generated = generated_case(200);
    let cases = [
        ("claims", CLAIMS_CASE.to_owned()),
        ("legacy", LEGACY_CASE.to_owned()),
        ("generated_200", generated),
    ];

    {
        let mut group = c.benchmark_group("format.parse_model");
        for (case_id, xml) in &cases {
            group.throughput(Throughput::Bytes(xml.len() as u64));
            group.bench_function(*case_id, |b| {
                b.iter(|| {
                    let definition =
                        parse_model(black_box(xml), ModelKind::Case).expect("parse_model");
                    black_box(definition.len())
                })
            });
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("format.export_model");
        for (case_id, xml) in &cases {
            let definition = parse_model(xml, ModelKind::Case).expect("parse_model");
            group.bench_function(*case_id, |b| {
                b.iter(|| black_box(black_box(&definition).to_xml()).len())
            });
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("format.parse_dimensions");
        group.throughput(Throughput::Bytes(CLAIMS_DIMENSIONS.len() as u64));
        group.bench_function("claims", |b| {
            b.iter(|| {
                let dimensions =
                    parse_dimensions(black_box(CLAIMS_DIMENSIONS)).expect("parse_dimensions");
                black_box(dimensions.shapes().len())
            })
        });
        group.finish();
    }
}

criterion_group!(benches, benches_parse);
criterion_main!(benches);
