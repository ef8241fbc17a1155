//! Capability traits the engine uses to reach the host.
//!
//! The host's node graph, settings store and event objects are only seen
//! through these traits. Nothing here keeps node-graph state between calls:
//! every node is addressed by its name.

use std::path::{Path, PathBuf};

use super::errors::{HostError, HostResult};

/// Name of a node in the host graph.
pub type NodeId = String;

/// Node type of a file source inside a source group.
pub const FILE_SOURCE_TYPE: &str = "RVFileSource";
/// Node type of the linearize node.
pub const LINEARIZE_TYPE: &str = "RVLinearize";
/// Node type of the linearize pipeline group.
pub const LINEARIZE_PIPELINE_TYPE: &str = "RVLinearizePipelineGroup";
/// Node type of the look pipeline group.
pub const LOOK_PIPELINE_TYPE: &str = "RVLookPipelineGroup";
/// Node type of the color-managed file transform.
pub const OCIO_FILE_TYPE: &str = "OCIOFile";
/// Node type of the color grade node.
pub const COLOR_TYPE: &str = "RVColor";
/// Node type of the look LUT node.
pub const LOOK_LUT_TYPE: &str = "RVLookLUT";
/// Companion node placed after the look LUT.
pub const REC709_TO_LINEAR_TYPE: &str = "Rec709ToLinear";

/// Storage type of a node property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    String,
    Int,
    Float,
    Byte,
}

/// Result of adding a media representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddRepresentation {
    /// The representation was created; holds its new source node.
    Added(NodeId),
    /// A representation with this name already exists on the source.
    AlreadyExists,
}

/// Query and mutation API of the host node graph.
pub trait NodeGraph {
    /// Nodes of `node_type` directly inside `group`.
    fn nodes_in_group_of_type(&self, group: &str, node_type: &str) -> HostResult<Vec<NodeId>>;

    /// All nodes directly inside `group`.
    fn nodes_in_group(&self, group: &str) -> HostResult<Vec<NodeId>>;

    /// Type name of a node.
    fn node_type(&self, node: &str) -> HostResult<String>;

    /// Read a string property (`"<node>.<component>.<property>"`).
    fn string_property(&self, property: &str) -> HostResult<Vec<String>>;

    /// Write a string property.
    fn set_string_property(
        &mut self,
        property: &str,
        values: &[String],
        allow_resize: bool,
    ) -> HostResult<()>;

    /// Write an int property.
    fn set_int_property(&mut self, property: &str, values: &[i32], allow_resize: bool)
        -> HostResult<()>;

    /// Write a float property.
    fn set_float_property(
        &mut self,
        property: &str,
        values: &[f32],
        allow_resize: bool,
    ) -> HostResult<()>;

    /// Whether a property exists.
    fn property_exists(&self, property: &str) -> bool;

    /// Create a new property.
    fn new_property(&mut self, property: &str, property_type: PropertyType, width: usize)
        -> HostResult<()>;

    /// Names of the media representations on a file source.
    fn source_media_reps(&self, source: &str) -> HostResult<Vec<String>>;

    /// Add a media representation to a file source.
    fn add_source_media_rep(
        &mut self,
        source: &str,
        name: &str,
        paths: &[PathBuf],
        tag: Option<&str>,
    ) -> HostResult<AddRepresentation>;

    /// Make a media representation active.
    fn set_active_source_media_rep(&mut self, source: &str, name: &str) -> HostResult<()>;

    /// Switch node feeding a representation, if the host created one.
    fn source_media_rep_switch_node(&self, rep_node: &str) -> HostResult<Option<NodeId>>;

    /// Group owning a node.
    fn node_group(&self, node: &str) -> HostResult<NodeId>;

    /// Set a node's display label.
    fn set_ui_name(&mut self, node: &str, name: &str) -> HostResult<()>;

    /// Delete a node.
    fn delete_node(&mut self, node: &str) -> HostResult<()>;

    /// Load a CDL file into a color node.
    fn read_cdl(&mut self, path: &Path, node: &str, activate: bool) -> HostResult<()>;

    /// Load a LUT file into a LUT node.
    fn read_lut(&mut self, path: &Path, node: &str, activate: bool) -> HostResult<()>;

    /// First node of `node_type` inside `group`.
    fn first_node_of_type(&self, group: &str, node_type: &str) -> HostResult<NodeId> {
        self.nodes_in_group_of_type(group, node_type)?
            .into_iter()
            .next()
            .ok_or_else(|| HostError::node_not_found(group, node_type))
    }

    /// Set a single int value.
    fn set_int(&mut self, property: &str, value: i32) -> HostResult<()> {
        self.set_int_property(property, &[value], true)
    }

    /// Set a single string value.
    fn set_string(&mut self, property: &str, value: &str) -> HostResult<()> {
        self.set_string_property(property, &[value.to_string()], true)
    }
}

/// Persistent per-user key/value settings of the host.
pub trait SettingsStore {
    /// Read a boolean setting, falling back to `default`.
    fn read_bool(&self, group: &str, name: &str, default: bool) -> bool;

    /// Write a boolean setting.
    fn write_bool(&mut self, group: &str, name: &str, value: bool);

    /// Read a string setting, falling back to `default`.
    fn read_string(&self, group: &str, name: &str, default: &str) -> String;

    /// Write a string setting.
    fn write_string(&mut self, group: &str, name: &str, value: &str);
}

/// An event delivered by the host dispatch chain.
pub trait HostEvent {
    /// Event payload.
    fn contents(&self) -> &str;

    /// Mark the event as not fully handled so later listeners still run.
    fn reject(&mut self);
}
