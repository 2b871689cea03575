//! Snapshot Controller
//!
//! Owns the collection, its dimensions, the filter set and the viewing
//! parameters. Every command runs the same flow:
//!
//! 1. Validate against the current schema
//! 2. Mutate exactly one piece of state
//! 3. Recompute the view and push it to every subscriber
//!
//! A rejected command stops at step 1. Step 3 is skipped until a collection
//! has been loaded.

use std::sync::Arc;

use serde_json::Value;

use crate::filter::{Filter, FilterSet};
use crate::index::{
    records_from_json, DimensionSet, IndexKey, Record, SortDirection,
};
use crate::notify::{DispatchResult, Subscriber, SubscriberRegistry, SubscriptionId, ViewEvent};
use crate::observability::{log_event_with_fields, Event, MetricsRegistry, ObservationScope};
use crate::view::{PageState, SortState, View, ViewBuilder, ViewError, ViewResult};

/// Live view over one in-memory collection
#[derive(Debug, Default)]
pub struct SnapshotController {
    /// None until the first successful load
    dimensions: Option<DimensionSet>,
    filters: FilterSet,
    sort: SortState,
    page: PageState,
    subscribers: SubscriberRegistry,
    metrics: Arc<MetricsRegistry>,
}

impl SnapshotController {
    /// Controller with default viewing parameters and nothing loaded
    pub fn new() -> Self {
        Self::default()
    }

    /// Controller starting from the given viewing parameters
    pub fn with_state(sort: SortState, page: PageState) -> Self {
        Self {
            sort,
            page,
            ..Self::default()
        }
    }

    /// Share an existing metrics registry
    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = metrics;
        self
    }

    // =========================================================================
    // SUBSCRIBERS
    // =========================================================================

    pub fn subscribe<S>(&mut self, subscriber: S) -> SubscriptionId
    where
        S: Subscriber + 'static,
    {
        let id = self.subscribers.subscribe(subscriber);
        log_event_with_fields(Event::Subscribed, &[("subscription", id.to_string().as_str())]);
        id
    }

    /// Returns false if `id` was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let removed = self.subscribers.unsubscribe(id);
        if removed {
            log_event_with_fields(Event::Unsubscribed, &[("subscription", id.to_string().as_str())]);
        }
        removed
    }

    // =========================================================================
    // COMMANDS
    // =========================================================================

    /// Replace the collection and rebuild every dimension.
    ///
    /// Filters, sort and paging persist. Remembered filters whose field is
    /// gone are dropped, and a sort key that is gone falls back to the first
    /// field. On failure the previous collection stays live.
    pub fn load_collection(&mut self, records: Vec<Record>) -> ViewResult<()> {
        let count = records.len().to_string();
        let scope = ObservationScope::with_fields("COLLECTION_LOAD", &[("records", count.as_str())]);

        let mut dimensions = match DimensionSet::build(records) {
            Ok(dimensions) => dimensions,
            Err(e) => {
                scope.fail(&e.to_string());
                let err = ViewError::from(e);
                return self.finish("load", Err(err));
            }
        };

        for field in self.filters.reinstall(&mut dimensions) {
            log_event_with_fields(Event::FilterDropped, &[("field", field.as_str())]);
        }
        self.sort = Self::resolve_sort(&self.sort, &dimensions);

        let fields = dimensions.schema().len().to_string();
        let keys = dimensions.distinct_keys().to_string();
        scope.complete_with_fields(&[
            ("dimensions", fields.as_str()),
            ("distinct_keys", keys.as_str()),
        ]);
        self.dimensions = Some(dimensions);
        self.metrics.increment_collections_loaded();
        log_event_with_fields(Event::CollectionLoaded, &[("records", count.as_str())]);

        let result = self.publish();
        self.finish("load", result)
    }

    /// Load raw loader output; every entry must be a JSON object
    pub fn load_json(&mut self, values: Vec<Value>) -> ViewResult<()> {
        match records_from_json(values) {
            Ok(records) => self.load_collection(records),
            Err(e) => self.finish("load", Err(e.into())),
        }
    }

    /// Set the page size; 0 disables pagination
    pub fn set_per_page(&mut self, per_page: usize) -> ViewResult<()> {
        self.page.set_per_page(per_page);
        let result = self.publish();
        self.finish("perPage", result)
    }

    /// Set the 1-based page number
    pub fn set_page_number(&mut self, page_number: usize) -> ViewResult<()> {
        let result = self
            .page
            .set_page_number(page_number)
            .and_then(|_| self.publish());
        self.finish("pageNumber", result)
    }

    /// Sort by `key`; an omitted direction inverts the current one.
    ///
    /// Before any load the key is recorded unvalidated.
    pub fn set_sort_by(&mut self, key: &str, direction: Option<SortDirection>) -> ViewResult<()> {
        if let Some(dimensions) = &self.dimensions {
            if !dimensions.contains(key) {
                let err = ViewError::UnknownDimension(key.to_string());
                return self.finish("sortBy", Err(err));
            }
        }
        self.sort = self.sort.updated(key, direction);
        let result = self.publish();
        self.finish("sortBy", result)
    }

    /// Replace the filter on `field`
    pub fn apply_filter(&mut self, field: &str, filter: Filter) -> ViewResult<()> {
        let op = filter.op_name();
        let result = match self.dimensions.as_mut() {
            Some(dimensions) => self
                .filters
                .apply(dimensions, field, filter)
                .map_err(ViewError::from),
            None => Err(ViewError::UnknownDimension(field.to_string())),
        };
        if result.is_ok() {
            log_event_with_fields(Event::CommandApplied, &[("field", field), ("op", op)]);
        }
        let result = result.and_then(|_| self.publish());
        self.finish("filter", result)
    }

    /// Remove the filter on `field`; no-op if it has none
    pub fn clear_filter(&mut self, field: &str) -> ViewResult<()> {
        let result = match self.dimensions.as_mut() {
            Some(dimensions) => self
                .filters
                .clear(dimensions, field)
                .map_err(ViewError::from),
            None => Err(ViewError::UnknownDimension(field.to_string())),
        };
        let result = result.and_then(|_| self.publish());
        self.finish("clearFilter", result)
    }

    /// Remove every filter
    pub fn clear_filters(&mut self) -> ViewResult<()> {
        match self.dimensions.as_mut() {
            Some(dimensions) => self.filters.clear_all(dimensions),
            None => self.filters = FilterSet::new(),
        }
        let result = self.publish();
        self.finish("clearFilters", result)
    }

    // =========================================================================
    // READ-ONLY QUERIES
    // =========================================================================

    /// Recompute the view without notifying; None before the first load
    pub fn current_view(&self) -> ViewResult<Option<View>> {
        self.dimensions
            .as_ref()
            .map(|dimensions| ViewBuilder::build(dimensions, &self.sort, &self.page))
            .transpose()
    }

    /// Records ordered by `field` under every filter except `field`'s own
    pub fn dimension_view(
        &self,
        field: &str,
        direction: SortDirection,
        limit: Option<usize>,
    ) -> ViewResult<Vec<Record>> {
        let dimensions = self.loaded(field)?;
        let ids = dimensions.ordered_view(field, direction, limit)?;
        Ok(ids.into_iter().map(|id| dimensions.record(id).clone()).collect())
    }

    /// Records per distinct value of `field`, ignoring `field`'s own filter
    pub fn group_counts(&self, field: &str) -> ViewResult<Vec<(IndexKey, usize)>> {
        Ok(self.loaded(field)?.group_counts(field)?)
    }

    /// Field names of the loaded schema; empty before the first load
    pub fn schema(&self) -> &[String] {
        self.dimensions
            .as_ref()
            .map(DimensionSet::schema)
            .unwrap_or(&[])
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    pub fn page_state(&self) -> &PageState {
        &self.page
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn is_loaded(&self) -> bool {
        self.dimensions.is_some()
    }

    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn loaded(&self, field: &str) -> ViewResult<&DimensionSet> {
        self.dimensions
            .as_ref()
            .ok_or_else(|| ViewError::UnknownDimension(field.to_string()))
    }

    /// Sort state valid for `dimensions`
    fn resolve_sort(sort: &SortState, dimensions: &DimensionSet) -> SortState {
        let first = match dimensions.schema().first() {
            Some(first) => first,
            None => return sort.clone(),
        };
        match sort.key() {
            Some(key) if dimensions.contains(key) => sort.clone(),
            Some(key) => {
                log_event_with_fields(Event::SortKeyReset, &[("field", key), ("fallback", first.as_str())]);
                SortState::new(first.clone(), sort.direction())
            }
            None => SortState::new(first.clone(), sort.direction()),
        }
    }

    /// Recompute and push to subscribers; no-op before the first load
    fn publish(&self) -> ViewResult<()> {
        let view = match self.current_view()? {
            Some(view) => view,
            None => return Ok(()),
        };

        let total = view.statistics.total_models.to_string();
        let visible = view.statistics.visible_models.to_string();
        let elapsed = format!("{:.3}", view.debug.response_time);

        let DispatchResult { delivered, failed } =
            self.subscribers.dispatch(&ViewEvent::ContentUpdated(view));

        self.metrics.increment_views_emitted();
        let delivered = delivered.to_string();
        log_event_with_fields(
            Event::ViewEmitted,
            &[
                ("delivered", delivered.as_str()),
                ("response_ms", elapsed.as_str()),
                ("total_models", total.as_str()),
                ("visible_models", visible.as_str()),
            ],
        );
        if failed > 0 {
            self.metrics.add_deliveries_failed(failed as u64);
            log_event_with_fields(Event::DeliveryFailed, &[("failed", failed.to_string().as_str())]);
        }
        Ok(())
    }

    /// Count and log the outcome of a command
    fn finish(&self, command: &str, result: ViewResult<()>) -> ViewResult<()> {
        match result {
            Ok(()) => {
                self.metrics.increment_commands_processed();
                Ok(())
            }
            Err(e) => Err(self.reject(command, e)),
        }
    }

    /// Count and log a command that failed before reaching the controller,
    /// such as a malformed frame or an out-of-range wire value.
    pub(crate) fn reject(&self, command: &str, err: ViewError) -> ViewError {
        self.metrics.increment_commands_rejected();
        log_event_with_fields(
            Event::CommandRejected,
            &[("code", err.code()), ("command", command), ("reason", err.to_string().as_str())],
        );
        err
    }
}
