//! Append-only history of generated results

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};

use super::media::EncodedImage;

/// Identifier of a history node (creation time in milliseconds, made strictly increasing)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out time-based ids that never repeat, even within one millisecond
#[derive(Clone, Debug, Default)]
pub struct NodeIdGenerator {
    last: u64,
}

impl NodeIdGenerator {
    pub fn next(&mut self, now: DateTime<Utc>) -> NodeId {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        self.last = millis.max(self.last + 1);
        NodeId(self.last)
    }
}

/// One successfully generated image
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryNode {
    pub id: NodeId,
    pub image: EncodedImage,
    pub prompt: String,
    pub created_at: DateTime<Utc>,
}

impl HistoryNode {
    /// File name used when the result is downloaded, unique per node
    pub fn export_file_name(&self) -> String {
        format!("nanoedit-{}.png", self.id)
    }

    /// Write the encoded image into `dir`, returning the written path
    pub fn export_to(&self, dir: &Path) -> anyhow::Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create export directory: {}", dir.display()))?;
        let path = dir.join(self.export_file_name());
        std::fs::write(&path, &self.image.bytes)
            .with_context(|| format!("Failed to write result: {}", path.display()))?;
        log::info!("Exported history node {} to {}", self.id, path.display());
        Ok(path)
    }
}

/// Ordered history plus the currently selected node
///
/// The active id, when set, always refers to a node in `nodes`.
#[derive(Clone, Debug, Default)]
pub struct HistorySequence {
    nodes: Vec<HistoryNode>,
    active: Option<NodeId>,
}

impl HistorySequence {
    /// Append a node and make it active
    pub fn push(&mut self, node: HistoryNode) {
        self.active = Some(node.id);
        self.nodes.push(node);
    }

    /// Select an existing node; returns false if `id` is unknown
    pub fn select(&mut self, id: NodeId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.active = Some(id);
        true
    }

    pub fn get(&self, id: NodeId) -> Option<&HistoryNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn active_id(&self) -> Option<NodeId> {
        self.active
    }

    pub fn active(&self) -> Option<&HistoryNode> {
        self.active.and_then(|id| self.get(id))
    }

    pub fn nodes(&self) -> &[HistoryNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.active = None;
    }
}
