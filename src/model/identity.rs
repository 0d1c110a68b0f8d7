// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Casemodel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of casemodel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::OnceLock;

use regex::Regex;

use super::ids::ElementId;

fn control_whitespace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\r\n\t]+").unwrap_or_else(|_| unreachable!()))
}

/// The id/name/description triple every identified element carries.
///
/// Only values that differ from their fallback are stored: `name` falls back to `id`,
/// `description` falls back to `name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    id: ElementId,
    name: Option<String>,
    description: Option<String>,
}

impl Identity {
    pub fn new(id: ElementId) -> Self {
        Self {
            id,
            name: None,
            description: None,
        }
    }

    /// Builds an identity from wire values, collapsing values equal to their fallback.
    pub fn from_wire(id: ElementId, name: Option<String>, description: Option<String>) -> Self {
        let mut identity = Self::new(id);
        identity.name = name.filter(|name| !name.is_empty() && name != identity.id.as_str());
        identity.description = description
            .filter(|description| !description.is_empty() && description != identity.name());
        identity
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.id.as_str())
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_else(|| self.name())
    }

    /// The stored name, `None` when the name falls back to the id.
    pub fn explicit_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The stored description, `None` when the description falls back to the name.
    pub fn explicit_description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Sets the name.
    ///
    /// A name equal to the id is not stored. A name containing line breaks or tabs is stored
    /// with each such run replaced by a single space, and the original text becomes the
    /// description.
    pub fn set_name(&mut self, name: &str) {
        let re = control_whitespace();
        if re.is_match(name) {
            let flattened = re.replace_all(name, " ").trim().to_owned();
            self.store_name(flattened);
            self.set_description(name);
        } else {
            self.store_name(name.to_owned());
            if self.description.as_deref() == Some(self.name()) {
                self.description = None;
            }
        }
    }

    fn store_name(&mut self, name: String) {
        self.name = if name.is_empty() || name == self.id.as_str() {
            None
        } else {
            Some(name)
        };
    }

    /// Sets the description; a description equal to the current name is not stored.
    pub fn set_description(&mut self, description: &str) {
        self.description = if description.is_empty() || description == self.name() {
            None
        } else {
            Some(description.to_owned())
        };
    }
}

/// Anything that carries an [`Identity`].
pub trait Identified {
    fn identity(&self) -> &Identity;

    fn identity_mut(&mut self) -> &mut Identity;

    fn id(&self) -> &ElementId {
        self.identity().id()
    }

    fn name(&self) -> &str {
        self.identity().name()
    }

    fn description(&self) -> &str {
        self.identity().description()
    }
}

impl Identified for Identity {
    fn identity(&self) -> &Identity {
        self
    }

    fn identity_mut(&mut self) -> &mut Identity {
        self
    }
}
