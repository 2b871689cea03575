//! Snapshot control
//!
//! The [`SnapshotController`] is the single writer over a loaded collection.
//! It is constructed explicitly and owned by whoever drives it; there is no
//! process-wide instance.
//!
//! # Invariants
//!
//! - Every command validates before it mutates
//! - Every successful change after the first load emits exactly one view
//! - Filters, sort and paging persist across reloads

mod snapshot;

pub use snapshot::SnapshotController;
