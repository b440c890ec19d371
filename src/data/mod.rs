// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Central application state (`AppState`).
//!
//! `AppState` owns the archive of all maps, the store it is persisted to and
//! the session of the map that is currently open. The host routes input to
//! `session`, then hands each [`SessionUpdate`] back through
//! [`AppState::apply`] so that content changes reach the store. Sub-modules
//! split the methods by domain: map list management and file I/O.

mod file_io;
mod maps;

use crate::editing::{MapSession, SessionUpdate};
use crate::model::{Archive, DocumentStore, Tree};
use kurbo::Size;

/// Main application state
pub struct AppState<S: DocumentStore> {
    /// Every stored map and the display order
    pub archive: Archive,

    /// Where the archive is persisted
    store: S,

    /// Editing session of the open map
    pub session: MapSession,

    /// Size of the drawing area, used to center newly opened maps
    pub viewport_size: Size,

    /// Error message to display, if any
    pub error_message: Option<String>,

    /// When the archive was last written (formatted time string for UI)
    pub last_saved: Option<String>,
}

impl<S: DocumentStore> AppState<S> {
    /// Load the archive from `store` and open its current map.
    ///
    /// A store that cannot be read starts an empty archive; the first map
    /// is then created on the spot.
    pub fn load(store: S, viewport_size: Size) -> Self {
        let mut archive = match store.load() {
            Ok(archive) => archive,
            Err(e) => {
                tracing::warn!("{:#}; starting with an empty archive", e);
                Archive::default()
            }
        };
        let current = archive
            .current_map_id
            .take()
            .filter(|id| archive.contains(id))
            .or_else(|| archive.order.first().cloned());

        let mut state = Self {
            archive,
            store,
            session: MapSession::new(Tree::new()),
            viewport_size,
            error_message: None,
            last_saved: None,
        };
        match current {
            Some(id) => {
                state.open_map(&id);
            }
            None => state.new_map(),
        }
        state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Id of the open map
    pub fn current_map_id(&self) -> Option<&str> {
        self.archive.current_map_id.as_deref()
    }

    /// Follow up on a session event: persist content changes.
    /// Returns whether the host should redraw.
    pub fn apply(&mut self, update: SessionUpdate) -> bool {
        if update.persist {
            self.save_current();
        }
        update.redraw
    }
}
