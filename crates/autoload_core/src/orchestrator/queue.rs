//! FIFO of representations waiting for the drain signal.

use std::collections::VecDeque;
use std::path::PathBuf;

use crate::host::NodeId;

/// Tag attached to every representation the auto loader adds.
pub const AUTOLOAD_TAG: &str = "autoload";

/// A resolved media representation, not yet added to its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMediaRepresentation {
    /// File source node receiving the representation.
    pub source_node: NodeId,
    /// Representation name (e.g. `Plate`, `v000 Frames`).
    pub name: String,
    /// Resolved file.
    pub path: PathBuf,
    /// Tag passed to the host.
    pub tag: Option<String>,
}

impl PendingMediaRepresentation {
    pub fn new(source_node: impl Into<NodeId>, name: impl Into<String>, path: PathBuf) -> Self {
        Self {
            source_node: source_node.into(),
            name: name.into(),
            path,
            tag: Some(AUTOLOAD_TAG.to_string()),
        }
    }

    /// Display label for the new representation's group.
    pub fn ui_label(&self) -> String {
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{} ({})", file_name, self.name)
    }
}

/// Pending representations in the order they were resolved.
#[derive(Debug, Default)]
pub struct PendingQueue {
    items: VecDeque<PendingMediaRepresentation>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: PendingMediaRepresentation) {
        self.items.push_back(item);
    }

    /// Remove and return the oldest item.
    pub fn pop(&mut self) -> Option<PendingMediaRepresentation> {
        self.items.pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingMediaRepresentation> {
        self.items.iter()
    }
}
