// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Mind map data model

pub mod archive;
pub mod interchange;
pub mod node;
pub mod node_id;
pub mod tree;

pub use archive::{Archive, DocumentStore, JsonFileStore, MapRecord};
pub use interchange::{ImportError, export_file_name, export_nodes, import_nodes};
pub use node::{Node, Side};
pub use node_id::NodeId;
pub use tree::{DeleteOutcome, Tree};
