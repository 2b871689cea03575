//! Channel commands
//!
//! One JSON object per command, tagged by `command`:
//!
//! ```text
//! {"command":"perPage","value":2}
//! {"command":"pageNumber","value":3}
//! {"command":"sortBy","value":{"key":"age","direction":"descending"}}
//! {"command":"filter","key":"age","value":{"range":[25,100]}}
//! {"command":"clearFilter","key":"age"}
//! {"command":"clearFilters"}
//! {"command":"load","value":[{"age":30}]}
//! ```
//!
//! Numbers decode as signed and directions as free strings, so out-of-range
//! values surface as `InvalidArgument` instead of a decode failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::filter::FilterRule;
use crate::view::{ViewError, ViewResult};

/// Body of a `sortBy` command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortRequest {
    pub key: String,
    /// Omitted means "invert the current direction"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
}

/// A decoded channel command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Command {
    PerPage { value: i64 },
    PageNumber { value: i64 },
    SortBy { value: SortRequest },
    Filter { key: String, value: FilterRule },
    ClearFilter { key: String },
    ClearFilters,
    Load { value: Vec<Value> },
}

impl Command {
    /// Decode one JSON line
    pub fn decode(line: &str) -> ViewResult<Self> {
        serde_json::from_str(line)
            .map_err(|e| ViewError::invalid_argument(format!("malformed command: {}", e)))
    }

    /// Wire name, for logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::PerPage { .. } => "perPage",
            Command::PageNumber { .. } => "pageNumber",
            Command::SortBy { .. } => "sortBy",
            Command::Filter { .. } => "filter",
            Command::ClearFilter { .. } => "clearFilter",
            Command::ClearFilters => "clearFilters",
            Command::Load { .. } => "load",
        }
    }
}
