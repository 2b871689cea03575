//! Dimension set for the loaded collection
//!
//! Owns the collection, one [`Dimension`] per schema field and a per-record
//! rejection count: the number of dimensions whose active filter rejects the
//! record. A record is visible when its count is zero, and passes "every
//! dimension except d" when its count minus d's own rejection is zero.
//!
//! # API
//!
//! - `build(records)` - Derive schema and every dimension
//! - `set_filter(field, filter)` / `clear_filter(field)` / `clear_filters()`
//! - `ordered_view(field, direction, limit)` - Own-excluding retrieval
//! - `filtered(field, direction, limit)` - Retrieval under every filter
//! - `group_counts(field)` - Per-value counts, own-excluding

use std::collections::HashMap;

use super::btree::{IndexKey, RecordId};
use super::dimension::{Dimension, SortDirection};
use super::errors::{IndexError, IndexResult};
use super::Record;
use crate::filter::Filter;

/// All dimensions of one loaded collection
#[derive(Debug, Default)]
pub struct DimensionSet {
    records: Vec<Record>,
    /// Field names in first-record order
    schema: Vec<String>,
    slots: HashMap<String, usize>,
    dimensions: Vec<Dimension>,
    rejections: Vec<u32>,
}

impl DimensionSet {
    /// Build every dimension over `records`.
    ///
    /// The schema is the key set of the first record. Fails with
    /// `MissingField` if a later record lacks one of those keys.
    pub fn build(records: Vec<Record>) -> IndexResult<Self> {
        let schema: Vec<String> = records
            .first()
            .map(|first| first.keys().cloned().collect())
            .unwrap_or_default();

        let mut slots = HashMap::with_capacity(schema.len());
        let mut dimensions = Vec::with_capacity(schema.len());
        for (slot, field) in schema.iter().enumerate() {
            dimensions.push(Dimension::build(field, &records)?);
            slots.insert(field.clone(), slot);
        }

        Ok(Self {
            rejections: vec![0; records.len()],
            records,
            schema,
            slots,
            dimensions,
        })
    }

    /// Field names of the schema, in first-record order
    pub fn schema(&self) -> &[String] {
        &self.schema
    }

    /// Whether `field` is a dimension
    pub fn contains(&self, field: &str) -> bool {
        self.slots.contains_key(field)
    }

    /// Number of records in the collection
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the collection has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct values summed over every dimension
    pub fn distinct_keys(&self) -> usize {
        self.dimensions.iter().map(Dimension::key_count).sum()
    }

    /// Record by collection position
    pub fn record(&self, id: RecordId) -> &Record {
        &self.records[id]
    }

    /// Every record in collection order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    fn slot(&self, field: &str) -> IndexResult<usize> {
        self.slots
            .get(field)
            .copied()
            .ok_or_else(|| IndexError::UnknownDimension(field.to_string()))
    }

    /// Dimension for `field`
    pub fn dimension(&self, field: &str) -> IndexResult<&Dimension> {
        Ok(&self.dimensions[self.slot(field)?])
    }

    /// Install `filter` on `field`, replacing any previous filter there
    pub fn set_filter(&mut self, field: &str, filter: Filter) -> IndexResult<()> {
        let slot = self.slot(field)?;
        let flips = self.dimensions[slot].set_filter(filter);
        self.apply_flips(&flips);
        Ok(())
    }

    /// Remove the filter on `field`; no-op if none is active
    pub fn clear_filter(&mut self, field: &str) -> IndexResult<()> {
        let slot = self.slot(field)?;
        if self.dimensions[slot].filter().is_none() {
            return Ok(());
        }
        let flips = self.dimensions[slot].clear_filter();
        self.apply_flips(&flips);
        Ok(())
    }

    /// Remove every filter
    pub fn clear_filters(&mut self) {
        for dimension in &mut self.dimensions {
            dimension.clear_filter();
        }
        self.rejections.iter_mut().for_each(|count| *count = 0);
    }

    fn apply_flips(&mut self, flips: &[(RecordId, bool)]) {
        for &(id, passes) in flips {
            if passes {
                self.rejections[id] -= 1;
            } else {
                self.rejections[id] += 1;
            }
        }
    }

    /// Whether a record passes every active filter
    pub fn passes_all(&self, id: RecordId) -> bool {
        self.rejections[id] == 0
    }

    /// Whether a record passes every active filter except the one on `slot`
    fn passes_others(&self, slot: usize, id: RecordId) -> bool {
        let own = u32::from(!self.dimensions[slot].passes(id));
        self.rejections[id] - own == 0
    }

    /// Number of records passing every active filter
    pub fn passing_count(&self) -> usize {
        self.rejections.iter().filter(|&&count| count == 0).count()
    }

    /// Up to `limit` records ordered by `field`, restricted to records that
    /// pass every dimension's filter except `field`'s own.
    pub fn ordered_view(
        &self,
        field: &str,
        direction: SortDirection,
        limit: Option<usize>,
    ) -> IndexResult<Vec<RecordId>> {
        let slot = self.slot(field)?;
        Ok(self.collect(slot, direction, limit, |id| self.passes_others(slot, id)))
    }

    /// Up to `limit` records ordered by `field`, restricted to records that
    /// pass every active filter.
    pub fn filtered(
        &self,
        field: &str,
        direction: SortDirection,
        limit: Option<usize>,
    ) -> IndexResult<Vec<RecordId>> {
        let slot = self.slot(field)?;
        Ok(self.collect(slot, direction, limit, |id| self.passes_all(id)))
    }

    fn collect<F>(
        &self,
        slot: usize,
        direction: SortDirection,
        limit: Option<usize>,
        keep: F,
    ) -> Vec<RecordId>
    where
        F: Fn(RecordId) -> bool,
    {
        let dimension = &self.dimensions[slot];
        let limit = limit.unwrap_or(usize::MAX);
        match direction {
            SortDirection::Ascending => dimension
                .ascending()
                .filter(|&id| keep(id))
                .take(limit)
                .collect(),
            SortDirection::Descending => dimension
                .descending()
                .filter(|&id| keep(id))
                .take(limit)
                .collect(),
        }
    }

    /// Count of records per distinct value of `field`, ascending by value.
    ///
    /// Counts respect every filter except `field`'s own, so a filtered field
    /// still reports all of its candidate values.
    pub fn group_counts(&self, field: &str) -> IndexResult<Vec<(IndexKey, usize)>> {
        let slot = self.slot(field)?;
        Ok(self.dimensions[slot]
            .entries()
            .map(|(key, ids)| {
                let count = ids
                    .iter()
                    .filter(|&&id| self.passes_others(slot, id))
                    .count();
                (key.clone(), count)
            })
            .collect())
    }

    /// Active filters by field name, in schema order
    pub fn active_filters(&self) -> impl Iterator<Item = (&str, &Filter)> {
        self.dimensions
            .iter()
            .filter_map(|d| d.filter().map(|f| (d.field(), f)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::records_from_json;
    use serde_json::json;

    fn people() -> DimensionSet {
        let records = records_from_json(vec![
            json!({"name": "ann", "age": 30, "team": "red"}),
            json!({"name": "bob", "age": 20, "team": "blue"}),
            json!({"name": "cat", "age": 50, "team": "red"}),
            json!({"name": "dan", "age": 40, "team": "blue"}),
            json!({"name": "eve", "age": 10, "team": "red"}),
        ])
        .unwrap();
        DimensionSet::build(records).unwrap()
    }

    fn ages(set: &DimensionSet, ids: &[RecordId]) -> Vec<i64> {
        ids.iter()
            .map(|&id| set.record(id)["age"].as_i64().unwrap())
            .collect()
    }

    #[test]
    fn test_schema_follows_first_record() {
        let set = people();
        assert_eq!(set.schema(), &["name", "age", "team"]);
        assert!(set.contains("team"));
        assert!(!set.contains("salary"));
        // 5 names, 5 ages, 2 teams
        assert_eq!(set.distinct_keys(), 12);
    }

    #[test]
    fn test_missing_field_in_later_record() {
        let records =
            records_from_json(vec![json!({"a": 1, "b": 2}), json!({"a": 3})]).unwrap();
        let err = DimensionSet::build(records).unwrap_err();
        assert_eq!(
            err,
            IndexError::MissingField {
                field: "b".into(),
                record: 1
            }
        );
    }

    #[test]
    fn test_empty_collection_has_no_dimensions() {
        let set = DimensionSet::build(Vec::new()).unwrap();
        assert!(set.is_empty());
        assert!(set.schema().is_empty());
        assert_eq!(set.passing_count(), 0);
    }

    #[test]
    fn test_own_filter_excluded_from_own_view() {
        let mut set = people();
        set.set_filter("age", Filter::function(|v| v.as_i64().map_or(false, |a| a > 25)))
            .unwrap();

        let own = set.ordered_view("age", SortDirection::Ascending, None).unwrap();
        assert_eq!(ages(&set, &own), vec![10, 20, 30, 40, 50]);

        let other = set.ordered_view("name", SortDirection::Ascending, None).unwrap();
        assert_eq!(ages(&set, &other), vec![30, 50, 40]);

        let main = set.filtered("age", SortDirection::Ascending, None).unwrap();
        assert_eq!(ages(&set, &main), vec![30, 40, 50]);
        assert_eq!(set.passing_count(), 3);
    }

    #[test]
    fn test_cross_filters_intersect() {
        let mut set = people();
        set.set_filter("team", Filter::exact("red")).unwrap();
        set.set_filter("age", Filter::range(15, 45)).unwrap();

        let main = set.filtered("age", SortDirection::Descending, None).unwrap();
        assert_eq!(ages(&set, &main), vec![30]);

        // age view ignores the age range but honours team
        let age_view = set.ordered_view("age", SortDirection::Ascending, None).unwrap();
        assert_eq!(ages(&set, &age_view), vec![10, 30, 50]);

        // team view ignores team but honours the age range
        let team_view = set.ordered_view("team", SortDirection::Ascending, None).unwrap();
        assert_eq!(ages(&set, &team_view), vec![20, 40, 30]);
    }

    #[test]
    fn test_refilter_replaces_rather_than_compounds() {
        let mut set = people();
        set.set_filter("age", Filter::exact(10)).unwrap();
        set.set_filter("age", Filter::exact(50)).unwrap();
        assert_eq!(set.passing_count(), 1);
        let main = set.filtered("age", SortDirection::Ascending, None).unwrap();
        assert_eq!(ages(&set, &main), vec![50]);
    }

    #[test]
    fn test_clear_filter_restores() {
        let mut set = people();
        set.set_filter("team", Filter::exact("blue")).unwrap();
        set.clear_filter("team").unwrap();
        set.clear_filter("team").unwrap();
        assert_eq!(set.passing_count(), 5);

        set.set_filter("team", Filter::exact("blue")).unwrap();
        set.set_filter("age", Filter::range(0, 25)).unwrap();
        set.clear_filters();
        assert_eq!(set.passing_count(), 5);
        assert_eq!(set.active_filters().count(), 0);
    }

    #[test]
    fn test_limit() {
        let set = people();
        let top = set.ordered_view("age", SortDirection::Descending, Some(2)).unwrap();
        assert_eq!(ages(&set, &top), vec![50, 40]);
    }

    #[test]
    fn test_group_counts_own_excluding() {
        let mut set = people();
        set.set_filter("team", Filter::exact("red")).unwrap();
        set.set_filter("age", Filter::range(25, 100)).unwrap();

        let teams = set.group_counts("team").unwrap();
        assert_eq!(
            teams,
            vec![(IndexKey::from("blue"), 1), (IndexKey::from("red"), 2)]
        );
    }

    #[test]
    fn test_unknown_dimension() {
        let mut set = people();
        let err = set.set_filter("salary", Filter::exact(1)).unwrap_err();
        assert_eq!(err, IndexError::UnknownDimension("salary".into()));
        assert!(set.ordered_view("salary", SortDirection::Ascending, None).is_err());
        assert!(set.clear_filter("salary").is_err());
    }
}
