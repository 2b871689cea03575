//! Per-field filter registry
//!
//! The filter set remembers which predicate is active on which field,
//! independently of the dimensions, so filters survive a collection reload.
//! It holds no ordering logic; installing a filter is delegated to the
//! dimension set.

use std::collections::BTreeMap;

use super::predicate::Filter;
use crate::index::{DimensionSet, IndexError, IndexResult};

/// Active filters by field name
#[derive(Debug, Default)]
pub struct FilterSet {
    active: BTreeMap<String, Filter>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the previous filter on `field`, then install `filter`.
    ///
    /// Fails with `UnknownDimension` if `field` is not in the schema.
    pub fn apply(
        &mut self,
        dimensions: &mut DimensionSet,
        field: &str,
        filter: Filter,
    ) -> IndexResult<()> {
        if !dimensions.contains(field) {
            return Err(IndexError::UnknownDimension(field.to_string()));
        }
        dimensions.clear_filter(field)?;
        dimensions.set_filter(field, filter.clone())?;
        self.active.insert(field.to_string(), filter);
        Ok(())
    }

    /// Clear the filter on `field`; no-op if none is active.
    pub fn clear(&mut self, dimensions: &mut DimensionSet, field: &str) -> IndexResult<()> {
        dimensions.clear_filter(field)?;
        self.active.remove(field);
        Ok(())
    }

    /// Clear every filter
    pub fn clear_all(&mut self, dimensions: &mut DimensionSet) {
        dimensions.clear_filters();
        self.active.clear();
    }

    /// Install every remembered filter on freshly built dimensions.
    ///
    /// Filters on fields missing from the new schema are forgotten; their
    /// field names are returned.
    pub fn reinstall(&mut self, dimensions: &mut DimensionSet) -> Vec<String> {
        let dropped: Vec<String> = self
            .active
            .keys()
            .filter(|field| !dimensions.contains(field))
            .cloned()
            .collect();
        for field in &dropped {
            self.active.remove(field);
        }

        for (field, filter) in &self.active {
            // Membership was checked above
            let _ = dimensions.set_filter(field, filter.clone());
        }
        dropped
    }

    /// Active filter on `field`
    pub fn get(&self, field: &str) -> Option<&Filter> {
        self.active.get(field)
    }

    /// Fields with an active filter, sorted
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.active.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
