//! Filter set for cross-filtering
//!
//! Tracks at most one active predicate per field. Applying a filter on a
//! field always clears the previous one there first; filters never compound.

mod predicate;
mod set;

pub use predicate::{Filter, FilterRule, Predicate};
pub use set::FilterSet;
