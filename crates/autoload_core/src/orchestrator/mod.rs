//! Event-driven orchestration of variant loading.
//!
//! A load cycle has two phases:
//!
//! 1. `source-group-complete` - resolve variant files for the group and
//!    queue them; configure color immediately
//! 2. `after-progressive-loading` - add every queued representation, then
//!    delete groups replaced by a default representation
//!
//! Only the queue and the deletion list live between the two events.

mod autoloader;
mod errors;
mod events;
mod queue;
mod types;

pub use autoloader::{Orchestrator, DEFAULT_REP_NAME};
pub use errors::{AutoloadError, AutoloadResult, EventError};
pub use events::{SourceGroupEvent, AFTER_PROGRESSIVE_LOADING, SOURCE_GROUP_COMPLETE};
pub use queue::{PendingMediaRepresentation, PendingQueue, AUTOLOAD_TAG};
pub use types::{DrainReport, FailedRepresentation, GroupOutcome, Phase};
