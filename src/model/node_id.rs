// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Unique identifiers for mind map nodes.
//!
//! A `NodeId` is an opaque string so that ids survive a round trip through
//! the JSON archive unchanged (older maps use ids such as `"root"`). Fresh
//! ids combine the creation time with a process-wide atomic counter, so two
//! nodes created in the same millisecond still differ.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// A unique identifier for a node
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

static NODE_COUNTER: AtomicU64 = AtomicU64::new(1);

impl NodeId {
    /// Create a new unique node ID
    pub fn next() -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        let seq = NODE_COUNTER.fetch_add(1, Ordering::Relaxed);
        Self(format!("n-{millis}-{seq}"))
    }

    /// The id of the root of a freshly created map
    pub fn root() -> Self {
        Self("root".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
