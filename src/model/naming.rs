// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Casemodel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of casemodel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use smol_str::SmolStr;
use uuid::Uuid;

use super::ids::{validate_id_token, ElementId};
use super::kind::ElementKind;

const GENERATED_GUID_LEN: usize = 5;

/// Generates ids and default names for one definition.
///
/// Ids are `{prefix}{guid}_{counter}`. The guid comes from the document so ids stay stable
/// across reloads; the counter only grows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdGenerator {
    guid: SmolStr,
    counter: u64,
}

impl IdGenerator {
    /// Uses the document guid when it is a valid id token, otherwise generates a new one.
    pub fn new(document_guid: Option<&str>) -> Self {
        let guid = document_guid
            .map(str::trim)
            .filter(|guid| validate_id_token(guid).is_ok())
            .map(SmolStr::new)
            .unwrap_or_else(generate_guid);
        Self { guid, counter: 0 }
    }

    pub fn guid(&self) -> &str {
        &self.guid
    }

    /// Next id for `kind` that `exists` does not report as taken.
    pub fn next_id(&mut self, kind: ElementKind, exists: impl Fn(&str) -> bool) -> ElementId {
        loop {
            let candidate = format!("{}{}_{}", kind.id_prefix(), self.guid, self.counter);
            self.counter += 1;
            if !exists(&candidate) {
                return ElementId::from_trusted(candidate);
            }
        }
    }

    /// First `{TypeDescription}_{n}` that `in_use` does not report as taken.
    pub fn next_name(&self, kind: ElementKind, in_use: impl Fn(&str) -> bool) -> String {
        let mut n = 0usize;
        loop {
            let candidate = format!("{}_{n}", kind.type_description());
            if !in_use(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

fn generate_guid() -> SmolStr {
    let uuid = Uuid::new_v4().simple().to_string();
    SmolStr::new(format!("_{}", &uuid[..GENERATED_GUID_LEN]))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::IdGenerator;
    use crate::model::ElementKind;

    #[test]
    fn keeps_document_guid() {
        let generator = IdGenerator::new(Some("_abcde"));
        assert_eq!(generator.guid(), "_abcde");
    }

    #[test]
    fn generates_guid_when_missing_or_invalid() {
        for guid in [None, Some(""), Some("has space")] {
            let generator = IdGenerator::new(guid);
            assert!(generator.guid().starts_with('_'));
            assert_eq!(generator.guid().len(), 6);
        }
    }

    #[test]
    fn next_id_skips_taken_ids_and_never_repeats() {
        let mut generator = IdGenerator::new(Some("_g"));
        let taken: HashSet<&str> = ["ht__g_0", "ht__g_1"].into_iter().collect();
        let first = generator.next_id(ElementKind::HumanTask, |id| taken.contains(id));
        assert_eq!(first.as_str(), "ht__g_2");
        let second = generator.next_id(ElementKind::HumanTask, |id| taken.contains(id));
        assert_eq!(second.as_str(), "ht__g_3");
    }

    #[test]
    fn next_name_uses_type_description() {
        let generator = IdGenerator::new(Some("_g"));
        let used: HashSet<&str> = ["HumanTask_0"].into_iter().collect();
        assert_eq!(
            generator.next_name(ElementKind::HumanTask, |name| used.contains(name)),
            "HumanTask_1"
        );
        assert_eq!(
            generator.next_name(ElementKind::Stage, |name| used.contains(name)),
            "Stage_0"
        );
    }
}
