//! Host capability layer.
//!
//! The engine never talks to the review application directly. It depends on
//! three narrow traits that the embedding host implements:
//!
//! - [`NodeGraph`] - node queries, typed property access, media representations
//! - [`SettingsStore`] - persistent per-user toggles
//! - [`HostEvent`] - payload access and propagation control for callbacks
//!
//! [`InMemoryHost`] implements the first two over plain collections and is
//! what the crate's tests run against.

mod errors;
mod graph;
pub mod memory;

pub use errors::{HostError, HostResult};
pub use graph::{
    AddRepresentation, HostEvent, NodeGraph, NodeId, PropertyType, SettingsStore, COLOR_TYPE,
    FILE_SOURCE_TYPE, LINEARIZE_PIPELINE_TYPE, LINEARIZE_TYPE, LOOK_LUT_TYPE, LOOK_PIPELINE_TYPE,
    OCIO_FILE_TYPE, REC709_TO_LINEAR_TYPE,
};
pub use memory::{HostCall, InMemoryHost, PropertyValue, RecordedEvent};
