//! Dimension indexing for the loaded collection
//!
//! Dimensions are derived, in-memory-only state rebuilt from the collection on
//! every load.
//!
//! # Design Principles
//!
//! - Derived state: dimensions mirror the collection, never the source of truth
//! - One dimension per field of the first record
//! - Deterministic: BTreeMap key order, collection order within equal keys
//!
//! # Invariants
//!
//! - A dimension's own ordered view ignores its own filter
//! - The visible set is the intersection of every dimension's filter
//! - At most one active filter per dimension

mod btree;
mod dimension;
mod errors;
mod manager;

pub use btree::{IndexKey, IndexTree, RecordId};
pub use dimension::{Dimension, SortDirection};
pub use errors::{IndexError, IndexResult};
pub use manager::DimensionSet;

use serde_json::{Map, Value};

/// A record: field name to scalar value
pub type Record = Map<String, Value>;

/// Convert loader output into records.
///
/// Fails with `NotAnObject` for any entry that is not a JSON object.
pub fn records_from_json(values: Vec<Value>) -> IndexResult<Vec<Record>> {
    values
        .into_iter()
        .enumerate()
        .map(|(record, value)| match value {
            Value::Object(map) => Ok(map),
            _ => Err(IndexError::NotAnObject { record }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_records_from_json() {
        let records = records_from_json(vec![json!({"a": 1}), json!({"a": 2})]).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["a"], json!(2));
    }

    #[test]
    fn test_records_from_json_rejects_scalars() {
        let err = records_from_json(vec![json!({"a": 1}), json!(7)]).unwrap_err();
        assert_eq!(err, IndexError::NotAnObject { record: 1 });
    }
}
