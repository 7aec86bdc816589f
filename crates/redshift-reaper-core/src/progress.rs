//! Progress events emitted while reaping
//!
//! The reaper records every outcome in its [`NukeReport`](crate::NukeReport)
//! regardless; these events are for front ends that want to print as they
//! go. The CLI turns them into one line per deleted or failed item.

use crate::model::ResourceKind;

/// Events emitted during a nuke run
#[derive(Debug, Clone, PartialEq)]
pub enum ReapEvent {
    /// A resource kind is about to be listed
    KindStarted { kind: ResourceKind },
    /// A delete call succeeded
    Deleted {
        kind: ResourceKind,
        identifier: String,
    },
    /// Eligible, but not deleted because of a dry run
    Skipped {
        kind: ResourceKind,
        identifier: String,
    },
    /// A delete call failed; the batch goes on
    DeleteFailed {
        kind: ResourceKind,
        identifier: String,
        error: String,
    },
    /// The tags of a cluster could not be read
    TagLookupFailed { identifier: String, error: String },
    /// Listing failed; the rest of this kind is abandoned
    ListingFailed { kind: ResourceKind, error: String },
    /// A resource kind is done
    KindFinished {
        kind: ResourceKind,
        deleted: usize,
        failed: usize,
        skipped: usize,
    },
}

/// Callback type for progress updates
pub type ProgressCallback = Box<dyn Fn(ReapEvent) + Send + Sync>;

/// Helper to emit progress events
pub(crate) fn emit(callback: &Option<ProgressCallback>, event: ReapEvent) {
    if let Some(cb) = callback {
        cb(event);
    }
}
