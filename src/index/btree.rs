//! BTreeMap-based key ordering for dimensions
//!
//! A dimension maps each distinct field value to the records holding it.
//! Record ids inside one key are kept in collection order, so equal values
//! always come back in insertion order.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::Bound;

use serde::{Serialize, Serializer};
use serde_json::Value;

/// Position of a record in the loaded collection
pub type RecordId = usize;

/// Index key representing a scalar field value.
///
/// Ordering is total and deterministic: Null < Bool < Number < String.
/// Integers and floats compare numerically with each other. Floats with an
/// integral value are normalized to `Int` so `30` and `30.0` share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndexKey {
    /// JSON null
    Null,
    /// Boolean value (false < true)
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Non-integral float, stored as bits for total ordering
    Float(u64),
    /// String value
    String(String),
}

impl IndexKey {
    /// Create a key from a float
    ///
    /// Uses bit representation for total ordering.
    pub fn from_float(v: f64) -> Self {
        if v.fract() == 0.0 && v >= -9.223_372_036_854_776e18 && v < 9.223_372_036_854_776e18 {
            return IndexKey::Int(v as i64);
        }
        let bits = v.to_bits();
        let ordered = if (bits >> 63) == 1 {
            !bits
        } else {
            bits ^ (1 << 63)
        };
        IndexKey::Float(ordered)
    }

    /// Create a key from a JSON value.
    ///
    /// Returns None for arrays and objects.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(IndexKey::Null),
            Value::Bool(b) => Some(IndexKey::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(IndexKey::Int(i))
                } else {
                    n.as_f64().map(IndexKey::from_float)
                }
            }
            Value::String(s) => Some(IndexKey::String(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Convert back to the JSON value this key was built from
    pub fn to_json(&self) -> Value {
        match self {
            IndexKey::Null => Value::Null,
            IndexKey::Bool(b) => Value::Bool(*b),
            IndexKey::Int(i) => Value::from(*i),
            IndexKey::Float(_) => self
                .as_f64()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            IndexKey::String(s) => Value::String(s.clone()),
        }
    }

    /// Numeric value of this key, if it is a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            IndexKey::Int(i) => Some(*i as f64),
            IndexKey::Float(bits) => {
                let raw = if (bits >> 63) == 1 {
                    bits ^ (1 << 63)
                } else {
                    !bits
                };
                Some(f64::from_bits(raw))
            }
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            IndexKey::Null => 0,
            IndexKey::Bool(_) => 1,
            IndexKey::Int(_) | IndexKey::Float(_) => 2,
            IndexKey::String(_) => 3,
        }
    }
}

impl Ord for IndexKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (IndexKey::Null, IndexKey::Null) => Ordering::Equal,
            (IndexKey::Bool(a), IndexKey::Bool(b)) => a.cmp(b),
            (IndexKey::Int(a), IndexKey::Int(b)) => a.cmp(b),
            (IndexKey::Float(a), IndexKey::Float(b)) => a.cmp(b),
            (IndexKey::String(a), IndexKey::String(b)) => a.cmp(b),
            // Mixed int/float: numeric order, int first on a rounding tie
            (IndexKey::Int(_), IndexKey::Float(_)) => {
                match self.as_f64().partial_cmp(&other.as_f64()) {
                    Some(Ordering::Greater) => Ordering::Greater,
                    _ => Ordering::Less,
                }
            }
            (IndexKey::Float(_), IndexKey::Int(_)) => other.cmp(self).reverse(),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for IndexKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for IndexKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<i64> for IndexKey {
    fn from(v: i64) -> Self {
        IndexKey::Int(v)
    }
}

impl From<i32> for IndexKey {
    fn from(v: i32) -> Self {
        IndexKey::Int(v as i64)
    }
}

impl From<f64> for IndexKey {
    fn from(v: f64) -> Self {
        IndexKey::from_float(v)
    }
}

impl From<bool> for IndexKey {
    fn from(v: bool) -> Self {
        IndexKey::Bool(v)
    }
}

impl From<&str> for IndexKey {
    fn from(v: &str) -> Self {
        IndexKey::String(v.to_string())
    }
}

impl From<String> for IndexKey {
    fn from(v: String) -> Self {
        IndexKey::String(v)
    }
}

/// Sorted map from key to the records holding it.
#[derive(Debug, Default)]
pub struct IndexTree {
    tree: BTreeMap<IndexKey, Vec<RecordId>>,
}

impl IndexTree {
    /// Creates a new empty index tree
    pub fn new() -> Self {
        Self {
            tree: BTreeMap::new(),
        }
    }

    /// Append a record under a key.
    ///
    /// Callers insert in collection order, which keeps ids ascending per key.
    pub fn insert(&mut self, key: IndexKey, record: RecordId) {
        self.tree.entry(key).or_default().push(record);
    }

    /// All records holding exactly `key`
    pub fn lookup_eq(&self, key: &IndexKey) -> &[RecordId] {
        self.tree.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Records with `lo <= key < hi`; a `None` bound is open.
    pub fn lookup_range<'a>(
        &'a self,
        lo: Option<&IndexKey>,
        hi: Option<&IndexKey>,
    ) -> impl Iterator<Item = RecordId> + 'a {
        let empty = matches!((lo, hi), (Some(l), Some(h)) if l >= h);
        let lo_bound = match lo {
            Some(k) if !empty => Bound::Included(k.clone()),
            _ => Bound::Unbounded,
        };
        let hi_bound = match hi {
            Some(k) if !empty => Bound::Excluded(k.clone()),
            _ => Bound::Unbounded,
        };
        self.tree
            .range((lo_bound, hi_bound))
            .take_while(move |_| !empty)
            .flat_map(|(_, ids)| ids.iter().copied())
    }

    /// Iterate (key, records) pairs in ascending key order
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = (&IndexKey, &[RecordId])> {
        self.tree.iter().map(|(k, ids)| (k, ids.as_slice()))
    }

    /// Returns the number of distinct keys
    pub fn key_count(&self) -> usize {
        self.tree.len()
    }
}
