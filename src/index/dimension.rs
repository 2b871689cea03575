//! A single-field dimension over the collection
//!
//! A dimension owns the sorted key tree for its field, the currently active
//! filter and the per-record outcome of that filter. Combining outcomes across
//! dimensions is the job of [`super::DimensionSet`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::btree::{IndexKey, IndexTree, RecordId};
use super::errors::{IndexError, IndexResult};
use super::Record;
use crate::filter::Filter;

/// Retrieval order for a dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Natural increasing order
    #[default]
    Ascending,
    /// Decreasing order
    Descending,
}

impl SortDirection {
    /// The opposite direction
    pub fn inverted(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ascending" => Ok(SortDirection::Ascending),
            "descending" => Ok(SortDirection::Descending),
            other => Err(IndexError::InvalidArgument(format!(
                "unknown sort direction '{}', expected 'ascending' or 'descending'",
                other
            ))),
        }
    }
}

/// Sorted index over one field plus its active filter
pub struct Dimension {
    field: String,
    tree: IndexTree,
    /// Field value as stored in each record
    values: Vec<Value>,
    /// Own-filter outcome per record
    passes: Vec<bool>,
    filter: Option<Filter>,
}

impl Dimension {
    /// Build the index for `field` over every record.
    ///
    /// Fails with `MissingField` if any record lacks the field.
    pub fn build(field: &str, records: &[Record]) -> IndexResult<Self> {
        let mut tree = IndexTree::new();
        let mut values = Vec::with_capacity(records.len());

        for (id, record) in records.iter().enumerate() {
            let value = record.get(field).ok_or_else(|| IndexError::MissingField {
                field: field.to_string(),
                record: id,
            })?;
            let key = IndexKey::from_json(value).ok_or_else(|| IndexError::NonScalarField {
                field: field.to_string(),
                record: id,
            })?;
            tree.insert(key, id);
            values.push(value.clone());
        }

        Ok(Self {
            field: field.to_string(),
            tree,
            values,
            passes: vec![true; records.len()],
            filter: None,
        })
    }

    /// Field this dimension indexes
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Active filter, if any
    pub fn filter(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }

    /// Whether a record passes this dimension's own filter
    pub fn passes(&self, record: RecordId) -> bool {
        self.passes[record]
    }

    /// Replace the active filter.
    ///
    /// Returns the records whose own-filter outcome flipped, paired with the
    /// new outcome.
    pub fn set_filter(&mut self, filter: Filter) -> Vec<(RecordId, bool)> {
        let mut next = vec![false; self.passes.len()];
        match &filter {
            Filter::Exact(key) => {
                for &id in self.tree.lookup_eq(key) {
                    next[id] = true;
                }
            }
            Filter::Range { lo, hi } => {
                for id in self.tree.lookup_range(lo.as_ref(), hi.as_ref()) {
                    next[id] = true;
                }
            }
            Filter::OneOf(keys) => {
                for key in keys {
                    for &id in self.tree.lookup_eq(key) {
                        next[id] = true;
                    }
                }
            }
            Filter::Function(predicate) => {
                // One call per distinct key, on the first record's stored
                // value. Values equal as keys (30 and 30.0) share the verdict.
                for (_, ids) in self.tree.entries() {
                    if predicate.test(&self.values[ids[0]]) {
                        for &id in ids {
                            next[id] = true;
                        }
                    }
                }
            }
        }
        self.filter = Some(filter);
        self.swap_passes(next)
    }

    /// Reset to "pass everything".
    ///
    /// Returns the records that were rejected before.
    pub fn clear_filter(&mut self) -> Vec<(RecordId, bool)> {
        self.filter = None;
        let next = vec![true; self.passes.len()];
        self.swap_passes(next)
    }

    fn swap_passes(&mut self, next: Vec<bool>) -> Vec<(RecordId, bool)> {
        let changed = self
            .passes
            .iter()
            .zip(next.iter())
            .enumerate()
            .filter(|(_, (old, new))| old != new)
            .map(|(id, (_, new))| (id, *new))
            .collect();
        self.passes = next;
        changed
    }

    /// Records in ascending key order, ties in collection order
    pub fn ascending(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.tree.entries().flat_map(|(_, ids)| ids.iter().copied())
    }

    /// Records in descending key order, ties in collection order
    pub fn descending(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.tree.entries().rev().flat_map(|(_, ids)| ids.iter().copied())
    }

    /// Distinct keys with the records holding each, ascending
    pub fn entries(&self) -> impl Iterator<Item = (&IndexKey, &[RecordId])> {
        self.tree.entries()
    }

    /// Number of distinct values in this field
    pub fn key_count(&self) -> usize {
        self.tree.key_count()
    }
}

impl fmt::Debug for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dimension")
            .field("field", &self.field)
            .field("keys", &self.tree.key_count())
            .field("filter", &self.filter)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::records_from_json;
    use serde_json::json;

    fn ages() -> Vec<Record> {
        records_from_json(vec![
            json!({"name": "a", "age": 30}),
            json!({"name": "b", "age": 20}),
            json!({"name": "c", "age": 50}),
            json!({"name": "d", "age": 40}),
            json!({"name": "e", "age": 10}),
        ])
        .unwrap()
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!("ascending".parse::<SortDirection>().unwrap(), SortDirection::Ascending);
        assert_eq!("descending".parse::<SortDirection>().unwrap(), SortDirection::Descending);
        let err = "sideways".parse::<SortDirection>().unwrap_err();
        assert_eq!(err.code(), "XV_INVALID_ARGUMENT");
    }

    #[test]
    fn test_direction_inverted() {
        assert_eq!(SortDirection::Ascending.inverted(), SortDirection::Descending);
        assert_eq!(SortDirection::Descending.inverted(), SortDirection::Ascending);
    }

    #[test]
    fn test_build_orders_records() {
        let dim = Dimension::build("age", &ages()).unwrap();
        assert_eq!(dim.ascending().collect::<Vec<_>>(), vec![4, 1, 0, 3, 2]);
        assert_eq!(dim.descending().collect::<Vec<_>>(), vec![2, 3, 0, 1, 4]);
    }

    #[test]
    fn test_ties_keep_collection_order_both_ways() {
        let records = records_from_json(vec![
            json!({"v": 1}),
            json!({"v": 2}),
            json!({"v": 1}),
            json!({"v": 2}),
        ])
        .unwrap();
        let dim = Dimension::build("v", &records).unwrap();
        assert_eq!(dim.ascending().collect::<Vec<_>>(), vec![0, 2, 1, 3]);
        assert_eq!(dim.descending().collect::<Vec<_>>(), vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_missing_field() {
        let records = records_from_json(vec![json!({"age": 1}), json!({"name": "x"})]).unwrap();
        let err = Dimension::build("age", &records).unwrap_err();
        assert_eq!(
            err,
            IndexError::MissingField {
                field: "age".into(),
                record: 1
            }
        );
    }

    #[test]
    fn test_non_scalar_field() {
        let records = records_from_json(vec![json!({"tags": ["a"]})]).unwrap();
        let err = Dimension::build("tags", &records).unwrap_err();
        assert_eq!(err.code(), "XV_NON_SCALAR_FIELD");
    }

    #[test]
    fn test_set_filter_reports_flips() {
        let mut dim = Dimension::build("age", &ages()).unwrap();

        let flips = dim.set_filter(Filter::range(25, 45));
        // 20, 50 and 10 are now rejected
        assert_eq!(flips, vec![(1, false), (2, false), (4, false)]);
        assert!(dim.passes(0));
        assert!(!dim.passes(1));

        // Replacing the filter only reports the difference
        let flips = dim.set_filter(Filter::exact(20));
        assert_eq!(flips, vec![(0, false), (1, true), (3, false)]);

        let flips = dim.clear_filter();
        assert_eq!(flips, vec![(0, true), (2, true), (3, true), (4, true)]);
        assert!(dim.filter().is_none());
    }

    #[test]
    fn test_function_filter() {
        let mut dim = Dimension::build("age", &ages()).unwrap();
        dim.set_filter(Filter::function(|v| v.as_i64().map_or(false, |a| a > 25)));
        let passing: Vec<_> = (0..5).filter(|&id| dim.passes(id)).collect();
        assert_eq!(passing, vec![0, 2, 3]);
    }

    #[test]
    fn test_function_filter_sees_stored_values() {
        let records =
            records_from_json(vec![json!({"x": 30.0}), json!({"x": 1.5}), json!({"x": 7})]).unwrap();
        let mut dim = Dimension::build("x", &records).unwrap();
        dim.set_filter(Filter::function(Value::is_f64));
        let passing: Vec<_> = (0..3).filter(|&id| dim.passes(id)).collect();
        assert_eq!(passing, vec![0, 1]);
        assert_eq!(dim.key_count(), 3);
    }
}
