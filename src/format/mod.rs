// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Casemodel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of casemodel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! XML wire format of model and dimensions documents.
//!
//! Parsing goes text -> [`xml::XmlElement`] tree -> typed model; export goes the other way and
//! always produces the same text for the same model.

pub mod attrs;
pub mod definition;
pub mod dimensions;
pub mod xml;

pub use definition::{parse_model, to_deployable_xml};
pub use dimensions::parse_dimensions;
pub use xml::{parse_xml, to_xml_string, XmlElement, XmlError};

/// Namespace of the engine-specific extension elements.
pub const CAFIENNE_NAMESPACE: &str = "org.cafienne";

#[derive(Debug, thiserror::Error)]
pub enum ParseModelError {
    #[error(transparent)]
    Xml(#[from] XmlError),

    #[error("expected <{expected}> as document root, found <{found}>")]
    UnexpectedRoot {
        expected: &'static str,
        found: String,
    },
}

/// Documents that serialize to XML.
pub trait Exportable {
    fn to_xml_tree(&self) -> XmlElement;

    fn to_xml(&self) -> String {
        to_xml_string(&self.to_xml_tree())
    }
}
