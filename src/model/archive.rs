// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! The archive of all maps and its on-disk store.
//!
//! Maps are kept whole: each record holds the full node array of one map,
//! a display title and the time it was last saved. A separate id list
//! controls the order of the map list.

use super::node::{Node, Side};
use super::node_id::NodeId;
use super::tree::Tree;
use crate::settings;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// One stored map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapRecord {
    pub title: String,
    #[serde(default)]
    pub data: Vec<Node>,
    /// Milliseconds since the Unix epoch
    #[serde(default)]
    pub last_modified: i64,
}

impl MapRecord {
    fn new(title: impl Into<String>, data: Vec<Node>) -> Self {
        Self {
            title: title.into(),
            data,
            last_modified: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Editable tree for this map's nodes.
    ///
    /// A record without nodes opens with the root a new map starts with.
    pub fn tree(&self) -> Tree {
        let tree = Tree::from_nodes(self.data.clone());
        if tree.root_count() == 0 {
            tracing::warn!("Map \"{}\" has no nodes, adding a root", self.title);
            return Tree::with_root(settings::node::NEW_MAP_TEXT);
        }
        tree
    }

    /// Last save time as a local timestamp, for display
    pub fn modified_at(&self) -> Option<chrono::DateTime<chrono::Local>> {
        chrono::DateTime::from_timestamp_millis(self.last_modified)
            .map(|t| t.with_timezone(&chrono::Local))
    }
}

/// Title of a map: the text of its first root
fn title_of(nodes: &[Node], fallback: &str) -> String {
    nodes
        .iter()
        .find(|n| n.is_root())
        .map(|n| n.text.clone())
        .unwrap_or_else(|| fallback.to_string())
}

/// All maps, their display order and which one is open
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Archive {
    pub maps: BTreeMap<String, MapRecord>,
    pub order: Vec<String>,
    pub current_map_id: Option<String>,
}

impl Archive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.maps.contains_key(id)
    }

    pub fn record(&self, id: &str) -> Option<&MapRecord> {
        self.maps.get(id)
    }

    pub fn current(&self) -> Option<&MapRecord> {
        self.current_map_id.as_deref().and_then(|id| self.maps.get(id))
    }

    /// A fresh map id, unique within the archive
    fn fresh_id(&self) -> String {
        let base = format!("map-{}", chrono::Utc::now().timestamp_millis());
        let mut id = base.clone();
        let mut n = 1;
        while self.maps.contains_key(&id) {
            id = format!("{base}-{n}");
            n += 1;
        }
        id
    }

    fn insert(&mut self, record: MapRecord) -> String {
        let id = self.fresh_id();
        self.maps.insert(id.clone(), record);
        self.order.push(id.clone());
        id
    }

    /// Add a map holding a single root at the origin
    pub fn create_map(&mut self) -> String {
        let mut root = Node::new(settings::node::NEW_MAP_TEXT, None, Side::Right);
        root.id = NodeId::root();
        let id = self.insert(MapRecord::new(settings::node::NEW_MAP_TEXT, vec![root]));
        tracing::info!("Created map {}", id);
        id
    }

    /// Add an imported node array as a new map
    pub fn import_map(&mut self, nodes: Vec<Node>) -> String {
        let title = title_of(&nodes, "Imported");
        let id = self.insert(MapRecord::new(title, nodes));
        tracing::info!("Imported map {}", id);
        id
    }

    /// Store `nodes` as the content of map `id`; unknown ids are ignored
    pub fn save_map(&mut self, id: &str, nodes: &[Node]) -> bool {
        let Some(record) = self.maps.get_mut(id) else {
            return false;
        };
        *record = MapRecord::new(title_of(nodes, "Untitled"), nodes.to_vec());
        true
    }

    /// Remove map `id`.
    ///
    /// If it was the open map, the first remaining map becomes current, or
    /// a new empty map is created when none is left.
    pub fn delete_map(&mut self, id: &str) -> bool {
        if self.maps.remove(id).is_none() {
            return false;
        }
        self.ensure_order();
        tracing::info!("Deleted map {}", id);

        if self.current_map_id.as_deref() == Some(id) {
            let next = match self.order.first().cloned() {
                Some(first) => first,
                None => self.create_map(),
            };
            self.current_map_id = Some(next);
        }
        true
    }

    /// Swap map `id` with its neighbor in display order (`-1` up, `1` down)
    pub fn move_map(&mut self, id: &str, direction: isize) -> bool {
        self.ensure_order();
        let Some(i) = self.order.iter().position(|k| k == id) else {
            return false;
        };
        let Some(j) = i.checked_add_signed(direction).filter(|j| *j < self.order.len()) else {
            return false;
        };
        self.order.swap(i, j);
        true
    }

    /// Make the display order list exactly the stored ids
    pub fn ensure_order(&mut self) {
        let maps = &self.maps;
        self.order.retain(|k| maps.contains_key(k));
        let mut seen: std::collections::HashSet<String> = self.order.iter().cloned().collect();
        for id in self.maps.keys() {
            if seen.insert(id.clone()) {
                self.order.push(id.clone());
            }
        }
    }

    /// Maps in display order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &MapRecord)> {
        self.order
            .iter()
            .filter_map(|id| self.maps.get(id).map(|m| (id.as_str(), m)))
    }
}

/// Where the archive is kept between runs
pub trait DocumentStore {
    fn load(&self) -> Result<Archive>;
    fn save(&self, archive: &Archive) -> Result<()>;
}

/// Archive stored as a single JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentStore for JsonFileStore {
    /// A missing file is an empty archive
    fn load(&self) -> Result<Archive> {
        if !self.path.exists() {
            tracing::debug!("No archive at {}, starting empty", self.path.display());
            return Ok(Archive::default());
        }
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read archive {}", self.path.display()))?;
        let mut archive: Archive = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse archive {}", self.path.display()))?;
        archive.ensure_order();
        tracing::info!("Loaded {} maps from {}", archive.len(), self.path.display());
        Ok(archive)
    }

    fn save(&self, archive: &Archive) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(archive).context("Failed to serialize archive")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write archive {}", self.path.display()))?;
        tracing::debug!("Saved archive to {}", self.path.display());
        Ok(())
    }
}
