// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Casemodel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of casemodel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::fs;
use std::io;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::EditorConfig;
use crate::model::ModelKind;

use super::writer::{PersistWriter, WriteTask};
use super::{DocumentRole, DocumentStore};

const CONFIG_FILENAME: &str = "casemodel.json";
const DIMENSIONS_EXTENSION: &str = "dimensions";

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    InvalidRelativePath {
        field: &'static str,
        value: PathBuf,
    },
    PathOutsideFolder {
        root: PathBuf,
        path: PathBuf,
    },
    SymlinkRefused {
        path: PathBuf,
    },
    InvalidModelName {
        name: String,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
            Self::InvalidRelativePath { field, value } => {
                write!(f, "invalid {field} path (must be relative): {value:?}")
            }
            Self::PathOutsideFolder { root, path } => {
                write!(f, "path {path:?} is outside model folder {root:?}")
            }
            Self::SymlinkRefused { path } => write!(f, "refusing to write through symlink at {path:?}"),
            Self::InvalidModelName { name } => {
                write!(f, "invalid model name {name:?} (must be a single file name)")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::InvalidRelativePath { .. }
            | Self::PathOutsideFolder { .. }
            | Self::SymlinkRefused { .. }
            | Self::InvalidModelName { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteDurability {
    #[default]
    BestEffort,
    Durable,
}

/// Raw text of the documents found in a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocuments {
    pub model: String,
    pub dimensions: Option<String>,
}

/// One model stored as files in a directory: `<name>.<ext>`, `<name>.dimensions` for case
/// models, and an optional `casemodel.json` with editor settings.
///
/// Writes through [`DocumentStore`] go to a background thread; [`DocumentStore::flush`]
/// waits for them.
#[derive(Debug)]
pub struct ModelFolder {
    root: PathBuf,
    name: String,
    kind: ModelKind,
    durability: WriteDurability,
    writer: Option<PersistWriter>,
}

impl ModelFolder {
    pub fn new(
        root: impl Into<PathBuf>,
        name: impl Into<String>,
        kind: ModelKind,
    ) -> Result<Self, StoreError> {
        let name = name.into();
        validate_model_name(&name)?;
        Ok(Self {
            root: root.into(),
            name,
            kind,
            durability: WriteDurability::default(),
            writer: None,
        })
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model_kind(&self) -> ModelKind {
        self.kind
    }

    pub fn model_path(&self) -> PathBuf {
        self.root
            .join(format!("{}.{}", self.name, self.kind.extension()))
    }

    pub fn dimensions_path(&self) -> PathBuf {
        self.root
            .join(format!("{}.{DIMENSIONS_EXTENSION}", self.name))
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILENAME)
    }

    pub fn path_of(&self, role: DocumentRole) -> PathBuf {
        match role {
            DocumentRole::Model => self.model_path(),
            DocumentRole::Dimensions => self.dimensions_path(),
        }
    }

    pub fn exists(&self) -> bool {
        self.model_path().is_file()
    }

    /// Reads the model document and, for case models, the dimensions document if present.
    pub fn read_documents(&self) -> Result<LoadedDocuments, StoreError> {
        let model_path = self.model_path();
        let model = fs::read_to_string(&model_path).map_err(|source| StoreError::Io {
            path: model_path,
            source,
        })?;
        let dimensions = if self.kind.has_dimensions() {
            read_optional(&self.dimensions_path())?
        } else {
            None
        };
        Ok(LoadedDocuments { model, dimensions })
    }

    /// Editor settings of this folder. A missing file yields the defaults.
    pub fn load_config(&self) -> Result<EditorConfig, StoreError> {
        let path = self.config_path();
        let Some(text) = read_optional(&path)? else {
            return Ok(EditorConfig::default());
        };
        EditorConfig::from_json(&text).map_err(|source| StoreError::Json { path, source })
    }

    pub fn save_config(&self, config: &EditorConfig) -> Result<(), StoreError> {
        let path = self.config_path();
        let json = config.to_json().map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        write_atomic(
            &self.root,
            &path,
            format!("{json}\n").as_bytes(),
            self.durability,
        )
    }

    /// Writes one document synchronously, bypassing the background writer.
    pub fn write_now(&self, role: DocumentRole, content: &str) -> Result<(), StoreError> {
        write_atomic(
            &self.root,
            &self.path_of(role),
            content.as_bytes(),
            self.durability,
        )
    }
}

impl DocumentStore for ModelFolder {
    fn persist(&mut self, role: DocumentRole, content: &str) -> Result<(), StoreError> {
        if role == DocumentRole::Dimensions && !self.kind.has_dimensions() {
            debug!(model = %self.kind, "model kind has no dimensions document, write skipped");
            return Ok(());
        }
        if self.writer.is_none() {
            info!(root = %self.root.display(), name = %self.name, "starting persist writer");
            self.writer = Some(PersistWriter::spawn()?);
        }
        let task = WriteTask {
            root: self.root.clone(),
            path: self.path_of(role),
            contents: content.to_owned(),
            durability: self.durability,
        };
        if let Some(writer) = &self.writer {
            writer.schedule(task);
        }
        Ok(())
    }

    fn flush(&mut self) -> Vec<StoreError> {
        match &self.writer {
            Some(writer) => writer.flush(),
            None => Vec::new(),
        }
    }
}

include!("model_folder/helpers.rs");
