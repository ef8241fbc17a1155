//! Host event names and payloads.

use super::errors::EventError;

/// Fired once a source group has finished loading.
pub const SOURCE_GROUP_COMPLETE: &str = "source-group-complete";

/// Fired after progressive loading of all pending media finishes.
pub const AFTER_PROGRESSIVE_LOADING: &str = "after-progressive-loading";

const PAYLOAD_SEPARATOR: &str = ";;";

/// Payload of a source-group-complete event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceGroupEvent {
    /// Source group that finished loading.
    pub group: String,
    /// Load action reported by the host.
    pub action: String,
}

impl SourceGroupEvent {
    /// Parse `"<group>;;<action>"`.
    pub fn parse(contents: &str) -> Result<Self, EventError> {
        let malformed = || EventError::malformed(SOURCE_GROUP_COMPLETE, contents);

        let (group, action) = contents.split_once(PAYLOAD_SEPARATOR).ok_or_else(malformed)?;
        if group.is_empty() || action.contains(PAYLOAD_SEPARATOR) {
            return Err(malformed());
        }

        Ok(Self {
            group: group.to_string(),
            action: action.to_string(),
        })
    }
}
