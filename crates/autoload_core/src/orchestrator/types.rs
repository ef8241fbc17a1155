//! Orchestrator state and report types.

use std::fmt;

use crate::color::ColorOutcome;
use crate::host::NodeId;

/// Phase of the two-phase load cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing pending.
    #[default]
    Idle,
    /// Handling a source-group-complete event.
    Resolving,
    /// Representations are queued; waiting for the drain signal.
    AwaitingDrainSignal,
    /// Applying the queue.
    Draining,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Resolving => write!(f, "resolving"),
            Phase::AwaitingDrainSignal => write!(f, "awaiting drain signal"),
            Phase::Draining => write!(f, "draining"),
        }
    }
}

/// What happened while resolving one source group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupOutcome {
    pub group: NodeId,
    pub action: String,
    /// A default `Source` representation was created and the group flagged
    /// for deletion.
    pub default_rep_created: bool,
    /// Representation names queued for the drain.
    pub queued: Vec<String>,
    /// Names skipped because the source already has them.
    pub already_present: Vec<String>,
    /// Names whose pattern didn't resolve to a file.
    pub not_found: Vec<String>,
    /// Color setup result, when color loading ran.
    pub color: Option<ColorOutcome>,
}

impl GroupOutcome {
    pub fn new(group: impl Into<NodeId>, action: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            action: action.into(),
            ..Default::default()
        }
    }
}

/// A representation that failed to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedRepresentation {
    pub source_node: NodeId,
    pub name: String,
    pub message: String,
}

/// Result of one drain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// `(source node, representation)` pairs added, in queue order.
    pub applied: Vec<(NodeId, String)>,
    /// Pairs skipped because the name already existed at drain time.
    pub skipped_existing: Vec<(NodeId, String)>,
    /// Items the host failed to add or finish.
    pub failed: Vec<FailedRepresentation>,
    /// Groups deleted after the queue was applied.
    pub deleted_groups: Vec<NodeId>,
}

impl DrainReport {
    /// Whether the drain did nothing.
    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
            && self.skipped_existing.is_empty()
            && self.failed.is_empty()
            && self.deleted_groups.is_empty()
    }
}
