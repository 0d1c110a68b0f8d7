// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Casemodel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of casemodel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Snapshot history for undo/redo.
//!
//! Every recorded action stores the serialized text of both documents. The chain is linear:
//! recording after an undo drops the redo branch. Each step tells the caller which documents
//! must be written back to storage.

use std::fmt;

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(u64);

impl ActionId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "action#{}", self.0)
    }
}

/// Serialized text of the model document and, for case models, its dimensions document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPair {
    pub model: String,
    pub dimensions: Option<String>,
}

impl DocumentPair {
    pub fn new(model: impl Into<String>, dimensions: Option<String>) -> Self {
        Self {
            model: model.into(),
            dimensions,
        }
    }
}

/// Which of the two documents a step has to persist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Changes {
    pub model: bool,
    pub dimensions: bool,
}

impl Changes {
    pub const NONE: Self = Self {
        model: false,
        dimensions: false,
    };

    pub const BOTH: Self = Self {
        model: true,
        dimensions: true,
    };

    pub fn any(self) -> bool {
        self.model || self.dimensions
    }
}

/// One immutable snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    id: ActionId,
    documents: DocumentPair,
    changes: Changes,
}

impl Action {
    pub fn id(&self) -> ActionId {
        self.id
    }

    pub fn documents(&self) -> &DocumentPair {
        &self.documents
    }

    /// Documents that differ from the previous snapshot.
    pub fn changes(&self) -> Changes {
        self.changes
    }
}

/// Result of moving through the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step<'a> {
    pub action: &'a Action,
    pub persist: Changes,
}

#[derive(Debug, Clone)]
pub struct History {
    actions: Vec<Action>,
    current: usize,
    next_id: u64,
}

impl History {
    /// Starts a history at the loaded state; that first snapshot never needs persisting.
    pub fn new(initial: DocumentPair) -> Self {
        Self {
            actions: vec![Action {
                id: ActionId(0),
                documents: initial,
                changes: Changes::NONE,
            }],
            current: 0,
            next_id: 1,
        }
    }

    pub fn current(&self) -> &Action {
        &self.actions[self.current]
    }

    /// Records the documents as a new snapshot after the current one.
    ///
    /// Text identical to the current snapshot returns the current snapshot and persists
    /// nothing. Otherwise any redo branch is dropped.
    pub fn record_action(&mut self, documents: DocumentPair) -> Step<'_> {
        let previous = &self.actions[self.current].documents;
        let changes = Changes {
            model: previous.model != documents.model,
            dimensions: previous.dimensions != documents.dimensions,
        };
        if !changes.any() {
            debug!(action = %self.current().id, "record skipped, documents unchanged");
            return Step {
                action: &self.actions[self.current],
                persist: Changes::NONE,
            };
        }

        let dropped = self.actions.len() - self.current - 1;
        self.actions.truncate(self.current + 1);
        let id = ActionId(self.next_id);
        self.next_id += 1;
        self.actions.push(Action {
            id,
            documents,
            changes,
        });
        self.current = self.actions.len() - 1;
        debug!(action = %id, dropped_redo = dropped, ?changes, "recorded action");

        Step {
            action: &self.actions[self.current],
            persist: changes,
        }
    }

    /// Steps back one snapshot. Persists what the snapshot being left had changed.
    pub fn undo(&mut self) -> Option<Step<'_>> {
        if self.current == 0 {
            return None;
        }
        let persist = self.actions[self.current].changes;
        self.current -= 1;
        Some(Step {
            action: &self.actions[self.current],
            persist,
        })
    }

    /// Steps forward one snapshot. Persists what that snapshot changed.
    pub fn redo(&mut self) -> Option<Step<'_>> {
        if self.current + 1 >= self.actions.len() {
            return None;
        }
        self.current += 1;
        let action = &self.actions[self.current];
        Some(Step {
            action,
            persist: action.changes,
        })
    }

    pub fn undo_count(&self) -> usize {
        self.current
    }

    pub fn redo_count(&self) -> usize {
        self.actions.len() - self.current - 1
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::{Changes, DocumentPair, History};

    fn pair(model: &str, dimensions: &str) -> DocumentPair {
        DocumentPair::new(model, Some(dimensions.to_owned()))
    }

    #[fixture]
    fn history() -> History {
        History::new(pair("m0", "d0"))
    }

    #[rstest]
    fn identical_documents_return_the_same_snapshot(mut history: History) {
        let first = history.record_action(pair("m1", "d0")).action.id();
        let step = history.record_action(pair("m1", "d0"));
        assert_eq!(step.action.id(), first);
        assert_eq!(step.persist, Changes::NONE);
        assert_eq!(history.len(), 2);
    }

    #[rstest]
    fn change_flags_are_tracked_per_document(mut history: History) {
        let step = history.record_action(pair("m0", "d1"));
        assert_eq!(
            step.persist,
            Changes {
                model: false,
                dimensions: true
            }
        );
        let step = history.record_action(pair("m2", "d1"));
        assert_eq!(
            step.persist,
            Changes {
                model: true,
                dimensions: false
            }
        );
    }

    #[rstest]
    fn undo_and_redo_are_symmetric(mut history: History) {
        history.record_action(pair("m1", "d0"));
        history.record_action(pair("m2", "d1"));
        history.record_action(pair("m3", "d1"));
        assert_eq!((history.undo_count(), history.redo_count()), (3, 0));

        for _ in 0..3 {
            assert!(history.undo().is_some());
        }
        assert_eq!(history.current().documents(), &pair("m0", "d0"));
        assert!(history.undo().is_none());
        assert_eq!((history.undo_count(), history.redo_count()), (0, 3));

        for _ in 0..3 {
            assert!(history.redo().is_some());
        }
        assert_eq!(history.current().documents(), &pair("m3", "d1"));
        assert!(history.redo().is_none());
    }

    #[rstest]
    fn undo_persists_the_flags_of_the_snapshot_being_left(mut history: History) {
        history.record_action(pair("m0", "d1"));
        history.record_action(pair("m1", "d1"));

        let step = history.undo().expect("undo");
        assert_eq!(step.persist, Changes { model: true, dimensions: false });
        assert_eq!(step.action.documents(), &pair("m0", "d1"));

        let step = history.undo().expect("undo");
        assert_eq!(step.persist, Changes { model: false, dimensions: true });

        let step = history.redo().expect("redo");
        assert_eq!(step.persist, Changes { model: false, dimensions: true });
    }

    #[rstest]
    fn recording_after_undo_drops_the_redo_branch(mut history: History) {
        history.record_action(pair("m1", "d0"));
        history.record_action(pair("m2", "d0"));
        history.undo();
        assert_eq!(history.redo_count(), 1);

        let id = history.record_action(pair("m9", "d0")).action.id();
        assert_eq!(history.redo_count(), 0);
        assert_eq!(history.undo_count(), 2);
        assert_eq!(history.current().id(), id);
        assert!(history.redo().is_none());
    }
}
