//! View building for the live snapshot
//!
//! A view is derived, never stored: it is recomputed in full from the
//! dimension set, sort state and page state after every change.
//!
//! # Invariants
//!
//! - `totalPages >= 1`
//! - `perPage == 0` returns every filtered record on a single page
//! - The main view honours every active filter, including the sort key's own

mod builder;
mod errors;
mod result;
mod state;

pub use builder::ViewBuilder;
pub use errors::{ViewError, ViewResult};
pub use result::{DebugInfo, View, ViewStatistics};
pub use state::{page_number_from_signed, per_page_from_signed, PageState, SortState};
