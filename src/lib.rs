// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Casemodel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of casemodel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Casemodel: the in-memory model behind a CMMN case modeler.
//!
//! Case, process, human-task and case-file-item-definition documents are parsed into an arena
//! of typed elements ([`model::Definition`]), edited through [`session::ModelSession`] or the
//! batched [`ops`], and exported back to XML that re-imports to the same text. Case models carry
//! a second document of shapes and edges ([`model::Dimensions`]). Every recorded change is an
//! undo step ([`history`]) and is saved through a [`store::DocumentStore`].

pub mod config;
pub mod diagnostic;
pub mod format;
pub mod history;
pub mod logging;
pub mod model;
pub mod ops;
pub mod session;
pub mod store;

pub use config::EditorConfig;
pub use diagnostic::{Diagnostic, Severity};
pub use format::{parse_dimensions, parse_model, to_deployable_xml, Exportable, ParseModelError};
pub use session::{ModelSession, SessionError};
