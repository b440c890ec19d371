// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! File I/O operations for AppState (save, import, export)

use super::AppState;
use crate::model::{DocumentStore, ImportError, export_file_name, export_nodes, import_nodes};
use anyhow::{Context, Result};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

impl<S: DocumentStore> AppState<S> {
    /// Write the open map into the archive and persist the archive
    pub fn save_current(&mut self) {
        self.stash_current();
        self.persist();
    }

    /// Copy the session's nodes into the open map's record
    pub(super) fn stash_current(&mut self) {
        if let Some(id) = self.archive.current_map_id.clone() {
            self.archive.save_map(&id, self.session.tree.nodes());
        }
    }

    /// Write the archive to the store
    pub fn persist(&mut self) {
        match self.store.save(&self.archive) {
            Ok(()) => {
                self.error_message = None;
                self.last_saved = Some(Local::now().format("%I:%M %p").to_string());
            }
            Err(e) => {
                let error = format!("Failed to save maps: {:#}", e);
                tracing::error!("{}", error);
                self.error_message = Some(error);
            }
        }
    }

    /// Add an exported node array as a new map and open it.
    ///
    /// Invalid input leaves the open map and the archive untouched.
    pub fn import_json(&mut self, json: &str) -> Result<String, ImportError> {
        let nodes = match import_nodes(json) {
            Ok(nodes) => nodes,
            Err(e) => {
                let error = format!("Import failed: {}", e);
                tracing::error!("{}", error);
                self.error_message = Some(error);
                return Err(e);
            }
        };
        self.stash_current();
        let id = self.archive.import_map(nodes);
        self.load_map(&id);
        Ok(id)
    }

    /// Import a node array from a file
    pub fn import_file(&mut self, path: &Path) -> Result<String> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let id = self
            .import_json(&json)
            .with_context(|| format!("Failed to import {}", path.display()))?;
        Ok(id)
    }

    /// The open map as `(suggested file name, JSON)`
    pub fn export_json(&self) -> Result<(String, String)> {
        let nodes = self.session.tree.nodes();
        let json = export_nodes(nodes).context("Failed to serialize map")?;
        Ok((export_file_name(nodes), json))
    }

    /// Write the open map into `dir` under its suggested name
    pub fn export_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        let (name, json) = self.export_json()?;
        let path = dir.join(name);
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Exported map to {}", path.display());
        Ok(path)
    }
}
