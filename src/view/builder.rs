//! View recomputation
//!
//! # Build Flow (strict order)
//!
//! 1. Resolve the sort key to its dimension
//! 2. Retrieve every record passing all filters, ordered by that dimension
//! 3. Count pages
//! 4. Slice the requested page
//! 5. Report statistics and timing

use super::errors::ViewResult;
use super::result::{DebugInfo, View, ViewStatistics};
use super::state::{PageState, SortState};
use crate::index::{DimensionSet, RecordId};
use crate::observability::Timer;

/// Builds views from the dimension set and the viewing parameters
pub struct ViewBuilder;

impl ViewBuilder {
    /// Recompute the full view.
    ///
    /// An unset sort key falls back to the first schema field. Fails with
    /// `UnknownDimension` if the sort key is not in the schema.
    pub fn build(
        dimensions: &DimensionSet,
        sort: &SortState,
        page: &PageState,
    ) -> ViewResult<View> {
        let timer = Timer::new();

        let key = sort
            .key()
            .or_else(|| dimensions.schema().first().map(String::as_str));

        let ordered = match key {
            // An empty collection has no dimensions to resolve against
            _ if dimensions.is_empty() => Vec::new(),
            Some(key) => dimensions.filtered(key, sort.direction(), None)?,
            // Records without fields: nothing to sort or filter by
            None => (0..dimensions.len()).collect(),
        };

        let total_models = ordered.len();
        let total_pages = Self::total_pages(total_models, page);
        let visible = Self::page_slice(&ordered, page);

        let models = visible
            .iter()
            .map(|&id| dimensions.record(id).clone())
            .collect::<Vec<_>>();

        let statistics = ViewStatistics {
            total_pages,
            total_models,
            current_page: page.page_number(),
            visible_models: models.len(),
            per_page: if page.is_paginated() {
                page.per_page()
            } else {
                total_models
            },
            sort_key: key.unwrap_or_default().to_string(),
            sort_direction: sort.direction(),
        };

        Ok(View {
            models,
            statistics,
            debug: DebugInfo {
                response_time: timer.elapsed_ms_f64(),
            },
        })
    }

    /// Page count; 1 when pagination is off or nothing matches
    pub fn total_pages(total_models: usize, page: &PageState) -> usize {
        if !page.is_paginated() {
            return 1;
        }
        total_models.div_ceil(page.per_page()).max(1)
    }

    /// The records on the requested page; may be short or empty at the tail
    pub fn page_slice<'a>(ordered: &'a [RecordId], page: &PageState) -> &'a [RecordId] {
        if !page.is_paginated() {
            return ordered;
        }
        let start = page.offset().min(ordered.len());
        let end = start.saturating_add(page.per_page()).min(ordered.len());
        &ordered[start..end]
    }
}
