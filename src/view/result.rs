//! View result types

use serde::{Deserialize, Serialize};

use crate::index::{Record, SortDirection};

/// Statistics reported alongside every view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewStatistics {
    /// Always >= 1
    pub total_pages: usize,
    /// Records passing every filter
    pub total_models: usize,
    pub current_page: usize,
    /// Records on this page
    pub visible_models: usize,
    /// Configured page size, or `total_models` when pagination is off
    pub per_page: usize,
    pub sort_key: String,
    pub sort_direction: SortDirection,
}

/// Timing of the recompute that produced a view
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugInfo {
    /// Milliseconds
    pub response_time: f64,
}

/// Ordered, paginated projection of the filtered collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub models: Vec<Record>,
    pub statistics: ViewStatistics,
    pub debug: DebugInfo,
}

impl View {
    /// Returns true if the page holds no records
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Returns the number of records on the page
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Values of `field` across the page, in page order
    pub fn column<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a serde_json::Value> {
        self.models.iter().filter_map(move |m| m.get(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_statistics_wire_names() {
        let stats = ViewStatistics {
            total_pages: 3,
            total_models: 5,
            current_page: 2,
            visible_models: 2,
            per_page: 2,
            sort_key: "age".into(),
            sort_direction: SortDirection::Ascending,
        };
        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(
            value,
            json!({
                "totalPages": 3,
                "totalModels": 5,
                "currentPage": 2,
                "visibleModels": 2,
                "perPage": 2,
                "sortKey": "age",
                "sortDirection": "ascending"
            })
        );
    }

    #[test]
    fn test_debug_wire_name() {
        let value = serde_json::to_value(DebugInfo { response_time: 1.5 }).unwrap();
        assert_eq!(value, json!({"responseTime": 1.5}));
    }
}
