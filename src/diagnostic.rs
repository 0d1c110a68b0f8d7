// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Casemodel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of casemodel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Warning,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
        }
    }
}

/// A recovered problem found while loading or editing a document.
///
/// Diagnostics never abort a load; they are collected on the owning record and logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    severity: Severity,
    element_id: Option<String>,
    message: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, element_id: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            severity,
            element_id: element_id.map(ToOwned::to_owned),
            message: message.into(),
        }
    }

    pub fn warning(element_id: Option<&str>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, element_id, message)
    }

    pub fn info(element_id: Option<&str>, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, element_id, message)
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn element_id(&self) -> Option<&str> {
        self.element_id.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.element_id {
            Some(id) => write!(f, "{} [{id}]: {}", self.severity.as_str(), self.message),
            None => write!(f, "{}: {}", self.severity.as_str(), self.message),
        }
    }
}
