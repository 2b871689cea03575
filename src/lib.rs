//! crossview - live cross-filtered views over in-memory records
//!
//! A loaded collection is indexed once per field. Filters on any field
//! narrow the visible set; sorting and pagination shape it into a view that
//! is pushed to subscribers after every change.
//!
//! Layering, bottom up:
//! - `index`: per-field dimensions with own-filter exclusion
//! - `filter`: predicates and the per-field filter registry
//! - `view`: sort/page state and view recomputation
//! - `controller`: the single writer, commands and notification
//! - `notify`: events and subscribers
//! - `session`: serial command processing over a channel
//! - `cli`: terminal front end

pub mod cli;
pub mod controller;
pub mod filter;
pub mod index;
pub mod notify;
pub mod observability;
pub mod session;
pub mod view;
