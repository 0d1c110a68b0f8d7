// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Casemodel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of casemodel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Editor settings stored next to a model as `casemodel.json`.

use serde::{Deserialize, Serialize};

use crate::store::WriteDurability;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Whether document writes are fsynced.
    pub durability: WriteDurability,
    /// Write changed documents after every recorded action.
    pub persist_on_record: bool,
    /// Drop the `guid` attribute from the deployable export.
    pub strip_guid_on_deploy: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            durability: WriteDurability::BestEffort,
            persist_on_record: true,
            strip_guid_on_deploy: true,
        }
    }
}

impl EditorConfig {
    /// Parses settings; absent keys keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::EditorConfig;
    use crate::store::WriteDurability;

    #[test]
    fn empty_object_yields_defaults() {
        assert_eq!(EditorConfig::from_json("{}").unwrap(), EditorConfig::default());
    }

    #[rstest]
    #[case(r#"{"durability":"durable"}"#, WriteDurability::Durable, true)]
    #[case(r#"{"persist_on_record":false}"#, WriteDurability::BestEffort, false)]
    #[case(r#"{"durability":"best_effort","persist_on_record":true}"#, WriteDurability::BestEffort, true)]
    fn partial_documents_fill_in_defaults(
        #[case] json: &str,
        #[case] durability: WriteDurability,
        #[case] persist_on_record: bool,
    ) {
        let config = EditorConfig::from_json(json).unwrap();
        assert_eq!(config.durability, durability);
        assert_eq!(config.persist_on_record, persist_on_record);
        assert!(config.strip_guid_on_deploy);
    }

    #[test]
    fn unknown_durability_is_rejected() {
        assert!(EditorConfig::from_json(r#"{"durability":"sometimes"}"#).is_err());
    }

    #[test]
    fn json_round_trips() {
        let config = EditorConfig {
            durability: WriteDurability::Durable,
            persist_on_record: false,
            strip_guid_on_deploy: false,
        };
        let text = config.to_json().unwrap();
        assert_eq!(EditorConfig::from_json(&text).unwrap(), config);
    }
}
