// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Casemodel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of casemodel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence of model documents.

pub mod model_folder;
mod writer;

use std::sync::{Arc, Mutex, PoisonError};

pub use model_folder::{LoadedDocuments, ModelFolder, StoreError, WriteDurability};

/// Which of the two documents of a model a write targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentRole {
    Model,
    Dimensions,
}

/// Where a session writes its documents.
pub trait DocumentStore: Send {
    /// Hands one document to the store. Implementations may write in the background.
    fn persist(&mut self, role: DocumentRole, content: &str) -> Result<(), StoreError>;

    /// Waits for outstanding writes and returns the failures among them.
    fn flush(&mut self) -> Vec<StoreError> {
        Vec::new()
    }
}

/// Keeps every write in memory. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    writes: Arc<Mutex<Vec<(DocumentRole, String)>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All writes so far, oldest first.
    pub fn writes(&self) -> Vec<(DocumentRole, String)> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn count(&self, role: DocumentRole) -> usize {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(written, _)| *written == role)
            .count()
    }

    pub fn latest(&self, role: DocumentRole) -> Option<String> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .rev()
            .find(|(written, _)| *written == role)
            .map(|(_, content)| content.clone())
    }

    pub fn clear(&self) {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl DocumentStore for MemoryStore {
    fn persist(&mut self, role: DocumentRole, content: &str) -> Result<(), StoreError> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((role, content.to_owned()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{DocumentRole, DocumentStore, MemoryStore};

    #[test]
    fn memory_store_clones_share_the_log() {
        let store = MemoryStore::new();
        let mut writer = store.clone();
        writer.persist(DocumentRole::Model, "a").unwrap();
        writer.persist(DocumentRole::Model, "b").unwrap();
        writer.persist(DocumentRole::Dimensions, "d").unwrap();

        assert_eq!(store.count(DocumentRole::Model), 2);
        assert_eq!(store.latest(DocumentRole::Model).as_deref(), Some("b"));
        assert_eq!(store.writes().len(), 3);
        assert!(writer.flush().is_empty());

        store.clear();
        assert_eq!(store.latest(DocumentRole::Dimensions), None);
    }
}
