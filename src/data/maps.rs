// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Map list management for AppState (open, create, delete, reorder)

use super::AppState;
use crate::editing::MapSession;
use crate::model::DocumentStore;

impl<S: DocumentStore> AppState<S> {
    /// Switch to map `id`, saving the outgoing map first.
    ///
    /// The new session starts with no selection and a centered view.
    pub fn open_map(&mut self, id: &str) -> bool {
        if !self.archive.contains(id) {
            tracing::warn!("No map with id {}", id);
            return false;
        }
        self.stash_current();
        self.load_map(id)
    }

    /// Make `id` the open map without saving the outgoing session
    pub(super) fn load_map(&mut self, id: &str) -> bool {
        let Some(tree) = self.archive.record(id).map(|r| r.tree()) else {
            return false;
        };
        self.archive.current_map_id = Some(id.to_string());
        self.session = MapSession::new(tree);
        self.session.viewport.center(self.viewport_size);
        tracing::info!("Opened map {} ({} nodes)", id, self.session.tree.len());
        self.persist();
        true
    }

    /// Create a map with a single root and open it
    pub fn new_map(&mut self) {
        self.stash_current();
        let id = self.archive.create_map();
        self.load_map(&id);
    }

    /// Delete map `id`; deleting the open map opens the first remaining one
    pub fn delete_map(&mut self, id: &str) -> bool {
        let was_open = self.current_map_id() == Some(id);
        if !self.archive.delete_map(id) {
            return false;
        }
        match self.archive.current_map_id.clone() {
            Some(next) if was_open => {
                self.load_map(&next);
            }
            _ => self.persist(),
        }
        true
    }

    /// Move map `id` one place up (`-1`) or down (`1`) in the list
    pub fn move_map(&mut self, id: &str, direction: isize) -> bool {
        if !self.archive.move_map(id, direction) {
            return false;
        }
        self.persist();
        true
    }
}
