// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Casemodel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of casemodel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Background writer thread for model documents.
//!
//! Writes are keyed by target path: scheduling a path that is still queued replaces the queued
//! contents, so only the latest text of each document reaches disk.

use std::collections::{HashMap, VecDeque};
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;

use tracing::{debug, warn};

use super::model_folder::{write_atomic, StoreError, WriteDurability};

#[derive(Debug)]
pub(crate) struct WriteTask {
    pub(crate) root: PathBuf,
    pub(crate) path: PathBuf,
    pub(crate) contents: String,
    pub(crate) durability: WriteDurability,
}

#[derive(Debug, Default)]
struct WriterState {
    pending: HashMap<PathBuf, WriteTask>,
    queue: VecDeque<PathBuf>,
    in_flight: bool,
    failures: Vec<StoreError>,
    shutdown: bool,
}

#[derive(Debug)]
struct WriterInner {
    state: Mutex<WriterState>,
    cv: Condvar,
}

impl WriterInner {
    fn lock(&self) -> MutexGuard<'_, WriterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait<'a>(&self, guard: MutexGuard<'a, WriterState>) -> MutexGuard<'a, WriterState> {
        self.cv.wait(guard).unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug)]
pub(crate) struct PersistWriter {
    inner: Arc<WriterInner>,
    handle: Option<JoinHandle<()>>,
}

impl PersistWriter {
    pub(crate) fn spawn() -> Result<Self, StoreError> {
        let inner = Arc::new(WriterInner {
            state: Mutex::new(WriterState::default()),
            cv: Condvar::new(),
        });

        let handle = std::thread::Builder::new()
            .name("casemodel-persist".to_owned())
            .spawn({
                let inner = inner.clone();
                move || run_worker(inner)
            })
            .map_err(|source| StoreError::Io {
                path: PathBuf::new(),
                source: io::Error::new(source.kind(), format!("spawn writer thread: {source}")),
            })?;

        Ok(Self {
            inner,
            handle: Some(handle),
        })
    }

    pub(crate) fn schedule(&self, task: WriteTask) {
        let path = task.path.clone();
        let mut state = self.inner.lock();
        if state.pending.insert(path.clone(), task).is_some() {
            debug!(path = %path.display(), "coalesced queued write");
            return;
        }
        state.queue.push_back(path);
        self.inner.cv.notify_all();
    }

    /// Blocks until every scheduled write has finished; returns the failures seen since the
    /// last flush.
    pub(crate) fn flush(&self) -> Vec<StoreError> {
        let mut state = self.inner.lock();
        while state.in_flight || !state.pending.is_empty() {
            state = self.inner.wait(state);
        }
        std::mem::take(&mut state.failures)
    }
}

impl Drop for PersistWriter {
    fn drop(&mut self) {
        {
            let mut state = self.inner.lock();
            state.shutdown = true;
            self.inner.cv.notify_all();
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run_worker(inner: Arc<WriterInner>) {
    loop {
        let task = {
            let mut state = inner.lock();
            loop {
                if let Some(path) = state.queue.pop_front() {
                    if let Some(task) = state.pending.remove(&path) {
                        state.in_flight = true;
                        break task;
                    }
                    continue;
                }
                if state.shutdown {
                    return;
                }
                state = inner.wait(state);
            }
        };

        let result = write_atomic(
            &task.root,
            &task.path,
            task.contents.as_bytes(),
            task.durability,
        );

        let mut state = inner.lock();
        match result {
            Ok(()) => debug!(path = %task.path.display(), bytes = task.contents.len(), "persisted document"),
            Err(err) => {
                warn!(path = %task.path.display(), error = %err, "persisting document failed");
                state.failures.push(err);
            }
        }
        state.in_flight = false;
        inner.cv.notify_all();
    }
}
