// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Casemodel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of casemodel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! One open model: its definition, its dimensions, the undo chain and where it is saved.
//!
//! All mutation is synchronous. The only background work is the store writing documents;
//! write failures end up in [`ModelSession::take_warnings`] and never touch model state.

use tracing::{debug, info, warn};

use crate::config::EditorConfig;
use crate::format::{parse_dimensions, parse_model, to_deployable_xml, Exportable, ParseModelError};
use crate::history::{ActionId, Changes, DocumentPair, History};
use crate::model::{
    Bounds, Definition, Dimensions, Element, ElementId, ElementKey, ElementKind, Identified,
    ModelError, ModelKind, Shape, Shaped,
};
use crate::store::{DocumentRole, DocumentStore, ModelFolder, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Parse(#[from] ParseModelError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0} models have no dimensions document")]
    NoDimensions(ModelKind),
}

pub struct ModelSession {
    definition: Definition,
    dimensions: Option<Dimensions>,
    history: History,
    store: Box<dyn DocumentStore>,
    config: EditorConfig,
    rev: u64,
    warnings: Vec<String>,
}

impl std::fmt::Debug for ModelSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelSession")
            .field("model_kind", &self.definition.model_kind())
            .field("elements", &self.definition.len())
            .field("rev", &self.rev)
            .field("undo", &self.history.undo_count())
            .field("redo", &self.history.redo_count())
            .finish_non_exhaustive()
    }
}

impl ModelSession {
    /// Opens a model from document text.
    ///
    /// A case model without dimensions text starts with an empty diagram. When loading migrated
    /// legacy constructs, both documents are written back so storage holds the current format.
    pub fn open(
        kind: ModelKind,
        model_xml: &str,
        dimensions_xml: Option<&str>,
        store: Box<dyn DocumentStore>,
        config: EditorConfig,
    ) -> Result<Self, SessionError> {
        let definition = parse_model(model_xml, kind)?;
        let mut dimensions = if kind.has_dimensions() {
            Some(match dimensions_xml {
                Some(text) => parse_dimensions(text)?,
                None => Dimensions::new(),
            })
        } else {
            None
        };
        if let Some(dimensions) = &mut dimensions {
            adopt_legacy_shapes(&definition, dimensions);
        }

        let mut session = Self::assemble(definition, dimensions, store, config);
        if session.definition.migrated() {
            info!(model = %kind, "legacy constructs migrated on load");
            if session.config.persist_on_record {
                session.save();
            }
        }
        Ok(session)
    }

    /// Starts a new, defaulted model. With autosave on it is written right away.
    pub fn create(
        kind: ModelKind,
        name: &str,
        store: Box<dyn DocumentStore>,
        config: EditorConfig,
    ) -> Result<Self, SessionError> {
        let definition = Definition::new(kind, name)?;
        let dimensions = kind.has_dimensions().then(Dimensions::new);
        let mut session = Self::assemble(definition, dimensions, store, config);
        if session.config.persist_on_record {
            session.save();
        }
        Ok(session)
    }

    /// Opens the model stored in `folder`, using the folder's `casemodel.json` settings.
    pub fn open_folder(folder: ModelFolder) -> Result<Self, SessionError> {
        let config = folder.load_config()?;
        let documents = folder.read_documents()?;
        let kind = folder.model_kind();
        let folder = folder.with_durability(config.durability);
        Self::open(
            kind,
            &documents.model,
            documents.dimensions.as_deref(),
            Box::new(folder),
            config,
        )
    }

    fn assemble(
        definition: Definition,
        dimensions: Option<Dimensions>,
        store: Box<dyn DocumentStore>,
        config: EditorConfig,
    ) -> Self {
        let initial = serialize_pair(&definition, dimensions.as_ref());
        Self {
            definition,
            dimensions,
            history: History::new(initial),
            store,
            config,
            rev: 0,
            warnings: Vec::new(),
        }
    }

    pub fn definition(&self) -> &Definition {
        &self.definition
    }

    pub fn dimensions(&self) -> Option<&Dimensions> {
        self.dimensions.as_ref()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Bumped on every change to the in-memory model.
    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn get_element(&self, id: &str, kind: Option<ElementKind>) -> Option<&Element> {
        self.definition.get_element(id, kind)
    }

    /// Creates a fresh, defaulted element under `parent`.
    pub fn create_definition(
        &mut self,
        kind: ElementKind,
        parent: ElementKey,
    ) -> Result<ElementKey, SessionError> {
        let key = self.definition.create(kind, parent)?;
        self.rev += 1;
        Ok(key)
    }

    /// Removes an element and its subtree. Links held by other elements are dropped, as are the
    /// shapes and edges drawn for every removed element.
    pub fn remove_definition(&mut self, key: ElementKey) -> Result<Vec<ElementId>, SessionError> {
        let removed = self.definition.remove(key)?;
        if let Some(dimensions) = &mut self.dimensions {
            for id in &removed {
                dimensions.remove_element(id.as_str());
            }
        }
        self.rev += 1;
        Ok(removed)
    }

    /// The shape drawn for an element, if any. Never creates one.
    pub fn get_shape(&self, key: ElementKey) -> Option<&Shape> {
        let id = self.definition.id_of(key)?;
        self.dimensions.as_ref()?.shape(id.as_str())
    }

    /// Draws a shape for an element. An element that already has a shape keeps it unchanged.
    pub fn create_shape(
        &mut self,
        key: ElementKey,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<&Shape, SessionError> {
        let kind = self.definition.model_kind();
        let id = self
            .definition
            .id_of(key)
            .ok_or_else(|| ModelError::NotFound(key.to_string()))?
            .clone();
        let dimensions = self
            .dimensions
            .as_mut()
            .ok_or(SessionError::NoDimensions(kind))?;
        let existed = dimensions.shape(id.as_str()).is_some();
        let shape = dimensions.create_shape(id.as_str(), Bounds::new(x, y, width, height));
        if !existed {
            self.rev += 1;
            debug!(element_id = %id, x, y, width, height, "created shape");
        }
        Ok(shape)
    }

    /// Draws a shape at `(x, y)` with the default size of the element's kind.
    ///
    /// Kinds that are never drawn get `None`.
    pub fn create_default_shape(
        &mut self,
        key: ElementKey,
        x: f64,
        y: f64,
    ) -> Result<Option<&Shape>, SessionError> {
        let kind = self
            .definition
            .kind_of(key)
            .ok_or_else(|| ModelError::NotFound(key.to_string()))?;
        let Some((width, height)) = kind.default_size() else {
            return Ok(None);
        };
        self.create_shape(key, x, y, width, height).map(Some)
    }

    /// Serialized text of both documents as they are now.
    pub fn serialize(&self) -> DocumentPair {
        serialize_pair(&self.definition, self.dimensions.as_ref())
    }

    /// The model text handed to an engine.
    pub fn deployable_model_xml(&self) -> String {
        if self.config.strip_guid_on_deploy {
            to_deployable_xml(&self.definition)
        } else {
            self.definition.to_xml()
        }
    }

    /// Snapshots the current documents. Identical text yields the current snapshot and writes
    /// nothing; otherwise the changed documents are written when autosave is on.
    pub fn record_action(&mut self) -> ActionId {
        let documents = self.serialize();
        let step = self.history.record_action(documents);
        let (id, persist) = (step.action.id(), step.persist);
        if persist.any() {
            let documents = step.action.documents().clone();
            self.autosave(&documents, persist);
        }
        id
    }

    /// Steps back one snapshot and reloads it. `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Result<Option<ActionId>, SessionError> {
        let Some(step) = self.history.undo() else {
            return Ok(None);
        };
        let (id, persist, documents) = (step.action.id(), step.persist, step.action.documents().clone());
        self.reload(&documents)?;
        self.autosave(&documents, persist);
        debug!(action = %id, "undo");
        Ok(Some(id))
    }

    /// Steps forward one snapshot and reloads it. `None` when there is nothing to redo.
    pub fn redo(&mut self) -> Result<Option<ActionId>, SessionError> {
        let Some(step) = self.history.redo() else {
            return Ok(None);
        };
        let (id, persist, documents) = (step.action.id(), step.persist, step.action.documents().clone());
        self.reload(&documents)?;
        self.autosave(&documents, persist);
        debug!(action = %id, "redo");
        Ok(Some(id))
    }

    pub fn undo_count(&self) -> usize {
        self.history.undo_count()
    }

    pub fn redo_count(&self) -> usize {
        self.history.redo_count()
    }

    /// Writes both documents as they are now, regardless of autosave.
    pub fn save(&mut self) {
        let documents = self.serialize();
        self.write(&documents, Changes::BOTH);
    }

    /// Waits for outstanding writes. Failures are added to the warnings.
    pub fn flush(&mut self) {
        for err in self.store.flush() {
            self.warnings.push(format!("save failed: {err}"));
        }
    }

    /// Save problems reported since the last call.
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    pub(crate) fn replace_documents(&mut self, definition: Definition, dimensions: Option<Dimensions>) {
        self.definition = definition;
        self.dimensions = dimensions;
        self.rev += 1;
    }

    fn reload(&mut self, documents: &DocumentPair) -> Result<(), SessionError> {
        let kind = self.definition.model_kind();
        let definition = parse_model(&documents.model, kind)?;
        let dimensions = match (&documents.dimensions, kind.has_dimensions()) {
            (Some(text), true) => Some(parse_dimensions(text)?),
            (None, true) => Some(Dimensions::new()),
            (_, false) => None,
        };
        self.replace_documents(definition, dimensions);
        Ok(())
    }

    fn autosave(&mut self, documents: &DocumentPair, changes: Changes) {
        if self.config.persist_on_record {
            self.write(documents, changes);
        }
    }

    fn write(&mut self, documents: &DocumentPair, changes: Changes) {
        if changes.model {
            self.persist_one(DocumentRole::Model, &documents.model);
        }
        if let (true, Some(text)) = (changes.dimensions, documents.dimensions.as_deref()) {
            self.persist_one(DocumentRole::Dimensions, text);
        }
    }

    fn persist_one(&mut self, role: DocumentRole, content: &str) {
        if let Err(err) = self.store.persist(role, content) {
            warn!(?role, error = %err, "save failed");
            self.warnings.push(format!("save failed: {err}"));
        }
    }
}

/// Hands the shape of each absorbed legacy sentry to the criterion that took it over.
///
/// Criteria are visited in document order, so when several share one sentry the first keeps
/// its shape and the rest stay undrawn.
fn adopt_legacy_shapes(definition: &Definition, dimensions: &mut Dimensions) {
    for element in definition.elements() {
        let Some(sentry) = definition.legacy_sentry_of(element.key()) else {
            continue;
        };
        dimensions.adopt_legacy_shape(element.id().as_str(), sentry.as_str());
    }
}

fn serialize_pair(definition: &Definition, dimensions: Option<&Dimensions>) -> DocumentPair {
    DocumentPair::new(definition.to_xml(), dimensions.map(Exportable::to_xml))
}
