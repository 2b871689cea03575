//! Filter predicates for a single dimension
//!
//! Declarative filters resolve against the sorted key tree; a function
//! filter is evaluated once per distinct key.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::index::{IndexError, IndexKey};

/// Opaque value predicate used by [`Filter::Function`]
#[derive(Clone)]
pub struct Predicate(Arc<dyn Fn(&Value) -> bool + Send + Sync>);

impl Predicate {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Evaluate against a field value
    pub fn test(&self, value: &Value) -> bool {
        (self.0)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(<fn>)")
    }
}

/// Active filter on one dimension
#[derive(Debug, Clone)]
pub enum Filter {
    /// key == value
    Exact(IndexKey),
    /// lo <= key < hi; a `None` bound is open
    Range {
        lo: Option<IndexKey>,
        hi: Option<IndexKey>,
    },
    /// key is one of the values
    OneOf(Vec<IndexKey>),
    /// Arbitrary predicate on the field value
    Function(Predicate),
}

impl Filter {
    /// Exact match filter
    pub fn exact(value: impl Into<IndexKey>) -> Self {
        Filter::Exact(value.into())
    }

    /// Half-open range filter `[lo, hi)`
    pub fn range(lo: impl Into<IndexKey>, hi: impl Into<IndexKey>) -> Self {
        Filter::Range {
            lo: Some(lo.into()),
            hi: Some(hi.into()),
        }
    }

    /// Everything at or above `lo`
    pub fn at_least(lo: impl Into<IndexKey>) -> Self {
        Filter::Range {
            lo: Some(lo.into()),
            hi: None,
        }
    }

    /// Everything strictly below `hi`
    pub fn below(hi: impl Into<IndexKey>) -> Self {
        Filter::Range {
            lo: None,
            hi: Some(hi.into()),
        }
    }

    /// Membership filter
    pub fn one_of<I, K>(values: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<IndexKey>,
    {
        Filter::OneOf(values.into_iter().map(Into::into).collect())
    }

    /// Predicate filter
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Filter::Function(Predicate::new(f))
    }

    /// Returns the operation name for log output
    pub fn op_name(&self) -> &'static str {
        match self {
            Filter::Exact(_) => "exact",
            Filter::Range { .. } => "range",
            Filter::OneOf(_) => "oneOf",
            Filter::Function(_) => "function",
        }
    }
}

/// Wire form of the declarative filters.
///
/// `{"exact": v}`, `{"range": [lo, hi]}` (null bound = open) or
/// `{"oneOf": [v, ...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterRule {
    Exact(Value),
    Range(Value, Value),
    OneOf(Vec<Value>),
}

fn scalar(value: &Value) -> Result<IndexKey, IndexError> {
    IndexKey::from_json(value).ok_or_else(|| {
        IndexError::InvalidArgument(format!("filter value must be a scalar, got {}", value))
    })
}

fn bound(value: &Value) -> Result<Option<IndexKey>, IndexError> {
    if value.is_null() {
        Ok(None)
    } else {
        scalar(value).map(Some)
    }
}

impl TryFrom<FilterRule> for Filter {
    type Error = IndexError;

    fn try_from(rule: FilterRule) -> Result<Self, Self::Error> {
        match rule {
            FilterRule::Exact(value) => Ok(Filter::Exact(scalar(&value)?)),
            FilterRule::Range(lo, hi) => Ok(Filter::Range {
                lo: bound(&lo)?,
                hi: bound(&hi)?,
            }),
            FilterRule::OneOf(values) => Ok(Filter::OneOf(
                values.iter().map(scalar).collect::<Result<_, _>>()?,
            )),
        }
    }
}
