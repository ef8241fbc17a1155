//! In-memory host used as a test double.
//!
//! `InMemoryHost` keeps a small node graph with typed properties, media
//! representations and a settings store, and records every mutation in
//! call order so tests can assert on exactly what the engine did.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use super::errors::{HostError, HostResult};
use super::graph::{
    AddRepresentation, HostEvent, NodeGraph, NodeId, PropertyType, SettingsStore,
    FILE_SOURCE_TYPE, LINEARIZE_PIPELINE_TYPE, LINEARIZE_TYPE, LOOK_PIPELINE_TYPE,
    OCIO_FILE_TYPE,
};

/// Stored value of a property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Strings(Vec<String>),
    Ints(Vec<i32>),
    Floats(Vec<f32>),
    Bytes(Vec<u8>),
}

/// A mutation performed through the [`NodeGraph`] API.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    SetProperty { property: String, value: PropertyValue },
    NewProperty { property: String },
    AddSourceMediaRep { source: String, name: String, paths: Vec<PathBuf>, tag: Option<String> },
    SetActiveSourceMediaRep { source: String, name: String },
    SetUiName { node: String, name: String },
    DeleteNode(String),
    ReadCdl { path: PathBuf, node: String },
    ReadLut { path: PathBuf, node: String },
}

#[derive(Debug, Clone)]
struct Node {
    node_type: String,
    group: Option<NodeId>,
    ui_name: Option<String>,
}

#[derive(Debug, Clone)]
struct MediaRep {
    name: String,
    node: NodeId,
}

/// In-memory node graph and settings store.
#[derive(Debug, Default)]
pub struct InMemoryHost {
    nodes: BTreeMap<NodeId, Node>,
    properties: BTreeMap<String, PropertyValue>,
    media_reps: HashMap<NodeId, Vec<MediaRep>>,
    active_reps: HashMap<NodeId, String>,
    switch_nodes: HashMap<NodeId, NodeId>,
    failing_reps: HashSet<String>,
    settings: HashMap<(String, String), bool>,
    string_settings: HashMap<(String, String), String>,
    calls: Vec<HostCall>,
    next_id: usize,
}

impl InMemoryHost {
    /// Create an empty host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, creating the properties the host gives that node type.
    pub fn add_node(&mut self, name: &str, node_type: &str, group: Option<&str>) {
        self.nodes.insert(
            name.to_string(),
            Node {
                node_type: node_type.to_string(),
                group: group.map(str::to_string),
                ui_name: None,
            },
        );
        for (property, value) in default_properties(node_type) {
            self.properties
                .insert(format!("{}.{}", name, property), value);
        }
    }

    /// Build a loaded source group with its fixed pipeline topology.
    ///
    /// Returns the name of the group's file source node.
    pub fn add_source_group(&mut self, group: &str, media_path: &Path) -> NodeId {
        let source = format!("{}_source", group);
        let linearize_pipe = format!("{}_tolinPipeline", group);
        let look_pipe = format!("{}_lookPipeline", group);

        self.add_node(group, "RVSourceGroup", None);
        self.add_node(&source, FILE_SOURCE_TYPE, Some(group));
        self.properties.insert(
            format!("{}.media.movie", source),
            PropertyValue::Strings(vec![media_path.to_string_lossy().into_owned()]),
        );
        self.add_node(&linearize_pipe, LINEARIZE_PIPELINE_TYPE, Some(group));
        self.instantiate_pipeline(&linearize_pipe, &[LINEARIZE_TYPE.to_string()]);
        self.add_node(&look_pipe, LOOK_PIPELINE_TYPE, Some(group));

        source
    }

    /// Pretend representations already exist on a source.
    pub fn with_existing_reps(&mut self, source: &str, names: &[&str]) {
        for name in names {
            let node = self.new_rep_node(source);
            self.media_reps
                .entry(source.to_string())
                .or_default()
                .push(MediaRep {
                    name: name.to_string(),
                    node,
                });
        }
    }

    /// Make adding a representation with this name fail with a host error.
    pub fn fail_adding_rep(&mut self, name: &str) {
        self.failing_reps.insert(name.to_string());
    }

    /// Every mutation, in call order.
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Current value of a property.
    pub fn property(&self, property: &str) -> Option<&PropertyValue> {
        self.properties.get(property)
    }

    /// Current int values of a property.
    pub fn int_property(&self, property: &str) -> Option<&[i32]> {
        match self.properties.get(property) {
            Some(PropertyValue::Ints(values)) => Some(values),
            _ => None,
        }
    }

    /// Whether a node exists.
    pub fn has_node(&self, node: &str) -> bool {
        self.nodes.contains_key(node)
    }

    /// Display label set on a node.
    pub fn ui_name(&self, node: &str) -> Option<&str> {
        self.nodes.get(node).and_then(|n| n.ui_name.as_deref())
    }

    /// Names of the representations on a source, in creation order.
    pub fn rep_names(&self, source: &str) -> Vec<String> {
        self.media_reps
            .get(source)
            .map(|reps| reps.iter().map(|r| r.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Node created for a named representation.
    pub fn rep_node(&self, source: &str, name: &str) -> Option<&str> {
        self.media_reps
            .get(source)?
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.node.as_str())
    }

    /// Active representation of a source.
    pub fn active_rep(&self, source: &str) -> Option<&str> {
        self.active_reps.get(source).map(String::as_str)
    }

    fn new_rep_node(&mut self, source: &str) -> NodeId {
        self.next_id += 1;
        let group = format!("{}_rep{}_group", source, self.next_id);
        let node = format!("{}_rep{}", source, self.next_id);
        self.add_node(&group, "RVSourceGroup", None);
        self.add_node(&node, FILE_SOURCE_TYPE, Some(&group));
        node
    }

    fn node(&self, node: &str) -> HostResult<&Node> {
        self.nodes
            .get(node)
            .ok_or_else(|| HostError::command_failed("node", format!("no such node: {}", node)))
    }

    fn owner_exists(&self, property: &str) -> HostResult<()> {
        let owner = property.split('.').next().unwrap_or_default();
        self.node(owner).map(|_| ())
    }

    /// Replace a pipeline group's members, as the host does when its
    /// `pipeline.nodes` property changes.
    fn instantiate_pipeline(&mut self, pipe: &str, node_types: &[String]) {
        let old: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, n)| n.group.as_deref() == Some(pipe))
            .map(|(name, _)| name.clone())
            .collect();
        for name in old {
            self.remove_node(&name);
        }
        for (i, node_type) in node_types.iter().enumerate() {
            self.add_node(&format!("{}_{}", pipe, i), node_type, Some(pipe));
        }
        self.properties.insert(
            format!("{}.pipeline.nodes", pipe),
            PropertyValue::Strings(node_types.to_vec()),
        );
    }

    fn remove_node(&mut self, node: &str) {
        self.nodes.remove(node);
        let prefix = format!("{}.", node);
        self.properties.retain(|k, _| !k.starts_with(&prefix));
        let children: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, n)| n.group.as_deref() == Some(node))
            .map(|(name, _)| name.clone())
            .collect();
        for child in children {
            self.remove_node(&child);
        }
    }

    fn set_property(&mut self, property: &str, value: PropertyValue) -> HostResult<()> {
        self.owner_exists(property)?;
        let Some(existing) = self.properties.get(property) else {
            return Err(HostError::command_failed(
                "setProperty",
                format!("property does not exist: {}", property),
            ));
        };
        if std::mem::discriminant(existing) != std::mem::discriminant(&value) {
            return Err(HostError::command_failed(
                "setProperty",
                format!("wrong type for property: {}", property),
            ));
        }
        self.calls.push(HostCall::SetProperty {
            property: property.to_string(),
            value: value.clone(),
        });
        self.properties.insert(property.to_string(), value);
        Ok(())
    }
}

/// Properties the host creates with each node type.
fn default_properties(node_type: &str) -> Vec<(&'static str, PropertyValue)> {
    match node_type {
        FILE_SOURCE_TYPE => vec![
            ("media.movie", PropertyValue::Strings(Vec::new())),
            ("cut.in", PropertyValue::Ints(vec![i32::MIN])),
        ],
        LINEARIZE_TYPE => vec![
            ("color.sRGB2linear", PropertyValue::Ints(vec![0])),
            ("color.logtype", PropertyValue::Ints(vec![0])),
            ("color.Rec709ToLinear", PropertyValue::Ints(vec![0])),
        ],
        OCIO_FILE_TYPE => vec![
            ("ocio.function", PropertyValue::Strings(vec!["color".to_string()])),
            ("ocio.active", PropertyValue::Ints(vec![1])),
            ("ocio.inColorSpace", PropertyValue::Strings(vec![String::new()])),
            ("ocio_color.outColorSpace", PropertyValue::Strings(vec![String::new()])),
        ],
        LINEARIZE_PIPELINE_TYPE | LOOK_PIPELINE_TYPE => {
            vec![("pipeline.nodes", PropertyValue::Strings(Vec::new()))]
        }
        _ => Vec::new(),
    }
}

impl NodeGraph for InMemoryHost {
    fn nodes_in_group_of_type(&self, group: &str, node_type: &str) -> HostResult<Vec<NodeId>> {
        self.node(group)?;
        Ok(self
            .nodes
            .iter()
            .filter(|(_, n)| n.group.as_deref() == Some(group) && n.node_type == node_type)
            .map(|(name, _)| name.clone())
            .collect())
    }

    fn nodes_in_group(&self, group: &str) -> HostResult<Vec<NodeId>> {
        self.node(group)?;
        Ok(self
            .nodes
            .iter()
            .filter(|(_, n)| n.group.as_deref() == Some(group))
            .map(|(name, _)| name.clone())
            .collect())
    }

    fn node_type(&self, node: &str) -> HostResult<String> {
        Ok(self.node(node)?.node_type.clone())
    }

    fn string_property(&self, property: &str) -> HostResult<Vec<String>> {
        match self.properties.get(property) {
            Some(PropertyValue::Strings(values)) => Ok(values.clone()),
            Some(_) => Err(HostError::command_failed(
                "getStringProperty",
                format!("wrong type for property: {}", property),
            )),
            None => Err(HostError::command_failed(
                "getStringProperty",
                format!("property does not exist: {}", property),
            )),
        }
    }

    fn set_string_property(
        &mut self,
        property: &str,
        values: &[String],
        _allow_resize: bool,
    ) -> HostResult<()> {
        self.set_property(property, PropertyValue::Strings(values.to_vec()))?;

        if let Some(pipe) = property.strip_suffix(".pipeline.nodes") {
            let pipe = pipe.to_string();
            let is_pipeline = matches!(
                self.node(&pipe)?.node_type.as_str(),
                LINEARIZE_PIPELINE_TYPE | LOOK_PIPELINE_TYPE
            );
            if is_pipeline {
                self.instantiate_pipeline(&pipe, values);
            }
        }
        Ok(())
    }

    fn set_int_property(
        &mut self,
        property: &str,
        values: &[i32],
        _allow_resize: bool,
    ) -> HostResult<()> {
        self.set_property(property, PropertyValue::Ints(values.to_vec()))
    }

    fn set_float_property(
        &mut self,
        property: &str,
        values: &[f32],
        _allow_resize: bool,
    ) -> HostResult<()> {
        self.set_property(property, PropertyValue::Floats(values.to_vec()))
    }

    fn property_exists(&self, property: &str) -> bool {
        self.properties.contains_key(property)
    }

    fn new_property(
        &mut self,
        property: &str,
        property_type: PropertyType,
        width: usize,
    ) -> HostResult<()> {
        self.owner_exists(property)?;
        if self.properties.contains_key(property) {
            return Err(HostError::command_failed(
                "newProperty",
                format!("property already exists: {}", property),
            ));
        }
        let value = match property_type {
            PropertyType::String => PropertyValue::Strings(vec![String::new(); width]),
            PropertyType::Int => PropertyValue::Ints(vec![0; width]),
            PropertyType::Float => PropertyValue::Floats(vec![0.0; width]),
            PropertyType::Byte => PropertyValue::Bytes(vec![0; width]),
        };
        self.calls.push(HostCall::NewProperty {
            property: property.to_string(),
        });
        self.properties.insert(property.to_string(), value);
        Ok(())
    }

    fn source_media_reps(&self, source: &str) -> HostResult<Vec<String>> {
        self.node(source)?;
        Ok(self.rep_names(source))
    }

    fn add_source_media_rep(
        &mut self,
        source: &str,
        name: &str,
        paths: &[PathBuf],
        tag: Option<&str>,
    ) -> HostResult<AddRepresentation> {
        self.node(source)?;
        if self.failing_reps.contains(name) {
            return Err(HostError::command_failed(
                "addSourceMediaRep",
                format!("could not load {}", name),
            ));
        }
        if self.rep_names(source).iter().any(|n| n == name) {
            return Ok(AddRepresentation::AlreadyExists);
        }

        self.calls.push(HostCall::AddSourceMediaRep {
            source: source.to_string(),
            name: name.to_string(),
            paths: paths.to_vec(),
            tag: tag.map(str::to_string),
        });

        let node = self.new_rep_node(source);
        if let Some(first) = paths.first() {
            self.properties.insert(
                format!("{}.media.movie", node),
                PropertyValue::Strings(vec![first.to_string_lossy().into_owned()]),
            );
        }
        self.media_reps
            .entry(source.to_string())
            .or_default()
            .push(MediaRep {
                name: name.to_string(),
                node: node.clone(),
            });

        let switch_group = format!("{}_switchGroup", source);
        let switch = format!("{}_switch", source);
        if !self.nodes.contains_key(&switch) {
            self.add_node(&switch_group, "RVSwitchGroup", None);
            self.add_node(&switch, "RVSwitch", Some(&switch_group));
        }
        self.switch_nodes.insert(node.clone(), switch);

        Ok(AddRepresentation::Added(node))
    }

    fn set_active_source_media_rep(&mut self, source: &str, name: &str) -> HostResult<()> {
        if !self.rep_names(source).iter().any(|n| n == name) {
            return Err(HostError::command_failed(
                "setActiveSourceMediaRep",
                format!("no media representation {} on {}", name, source),
            ));
        }
        self.calls.push(HostCall::SetActiveSourceMediaRep {
            source: source.to_string(),
            name: name.to_string(),
        });
        self.active_reps
            .insert(source.to_string(), name.to_string());
        Ok(())
    }

    fn source_media_rep_switch_node(&self, rep_node: &str) -> HostResult<Option<NodeId>> {
        self.node(rep_node)?;
        Ok(self.switch_nodes.get(rep_node).cloned())
    }

    fn node_group(&self, node: &str) -> HostResult<NodeId> {
        self.node(node)?
            .group
            .clone()
            .ok_or_else(|| HostError::command_failed("nodeGroup", format!("{} has no group", node)))
    }

    fn set_ui_name(&mut self, node: &str, name: &str) -> HostResult<()> {
        let entry = self
            .nodes
            .get_mut(node)
            .ok_or_else(|| {
                HostError::command_failed("setUIName", format!("no such node: {}", node))
            })?;
        entry.ui_name = Some(name.to_string());
        self.calls.push(HostCall::SetUiName {
            node: node.to_string(),
            name: name.to_string(),
        });
        Ok(())
    }

    fn delete_node(&mut self, node: &str) -> HostResult<()> {
        self.node(node)?;
        self.remove_node(node);
        self.calls.push(HostCall::DeleteNode(node.to_string()));
        Ok(())
    }

    fn read_cdl(&mut self, path: &Path, node: &str, _activate: bool) -> HostResult<()> {
        self.node(node)?;
        self.calls.push(HostCall::ReadCdl {
            path: path.to_path_buf(),
            node: node.to_string(),
        });
        Ok(())
    }

    fn read_lut(&mut self, path: &Path, node: &str, _activate: bool) -> HostResult<()> {
        self.node(node)?;
        self.calls.push(HostCall::ReadLut {
            path: path.to_path_buf(),
            node: node.to_string(),
        });
        Ok(())
    }
}

impl SettingsStore for InMemoryHost {
    fn read_bool(&self, group: &str, name: &str, default: bool) -> bool {
        self.settings
            .get(&(group.to_string(), name.to_string()))
            .copied()
            .unwrap_or(default)
    }

    fn write_bool(&mut self, group: &str, name: &str, value: bool) {
        self.settings
            .insert((group.to_string(), name.to_string()), value);
    }

    fn read_string(&self, group: &str, name: &str, default: &str) -> String {
        self.string_settings
            .get(&(group.to_string(), name.to_string()))
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    fn write_string(&mut self, group: &str, name: &str, value: &str) {
        self.string_settings
            .insert((group.to_string(), name.to_string()), value.to_string());
    }
}

/// Event with a fixed payload that remembers whether it was rejected.
#[derive(Debug, Clone, Default)]
pub struct RecordedEvent {
    contents: String,
    rejected: bool,
}

impl RecordedEvent {
    pub fn new(contents: impl Into<String>) -> Self {
        Self {
            contents: contents.into(),
            rejected: false,
        }
    }

    pub fn was_rejected(&self) -> bool {
        self.rejected
    }
}

impl HostEvent for RecordedEvent {
    fn contents(&self) -> &str {
        &self.contents
    }

    fn reject(&mut self) {
        self.rejected = true;
    }
}
