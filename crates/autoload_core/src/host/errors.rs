//! Error types for host API calls.

use thiserror::Error;

/// Error returned by a host capability.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// A host command reported a failure.
    #[error("{command} failed: {message}")]
    CommandFailed { command: String, message: String },

    /// A group didn't contain a node of the expected type.
    #[error("No {node_type} node in group '{group}'")]
    NodeNotFound { group: String, node_type: String },

    /// A property was read but holds no value.
    #[error("Property '{0}' has no value")]
    EmptyProperty(String),
}

impl HostError {
    /// Create a command failed error.
    pub fn command_failed(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CommandFailed {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Create a node not found error.
    pub fn node_not_found(group: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self::NodeNotFound {
            group: group.into(),
            node_type: node_type.into(),
        }
    }
}

/// Result type for host calls.
pub type HostResult<T> = Result<T, HostError>;
