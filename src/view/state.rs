//! Sort and page state

use serde::{Deserialize, Serialize};

use super::errors::{ViewError, ViewResult};
use crate::index::SortDirection;

/// Sort key and direction
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortState {
    /// Unset until configured or resolved against a loaded schema
    pub key: Option<String>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: Some(key.into()),
            direction,
        }
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Next state for a sort command.
    ///
    /// An omitted direction inverts the current one rather than defaulting.
    pub fn updated(&self, key: impl Into<String>, direction: Option<SortDirection>) -> Self {
        Self {
            key: Some(key.into()),
            direction: direction.unwrap_or_else(|| self.direction.inverted()),
        }
    }
}

/// Page size and page number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "PageFrame")]
pub struct PageState {
    /// 0 disables pagination
    per_page: usize,
    /// 1-based
    page_number: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            per_page: 0,
            page_number: 1,
        }
    }
}

/// Unchecked wire form of [`PageState`]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageFrame {
    #[serde(default)]
    per_page: usize,
    #[serde(default = "first_page")]
    page_number: usize,
}

fn first_page() -> usize {
    1
}

impl TryFrom<PageFrame> for PageState {
    type Error = ViewError;

    fn try_from(frame: PageFrame) -> ViewResult<Self> {
        PageState::new(frame.per_page, frame.page_number)
    }
}

impl PageState {
    pub fn new(per_page: usize, page_number: usize) -> ViewResult<Self> {
        let mut state = Self::default();
        state.set_per_page(per_page);
        state.set_page_number(page_number)?;
        Ok(state)
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn page_number(&self) -> usize {
        self.page_number
    }

    pub fn is_paginated(&self) -> bool {
        self.per_page != 0
    }

    pub fn set_per_page(&mut self, per_page: usize) {
        self.per_page = per_page;
    }

    /// Fails with `InvalidArgument` for page 0
    pub fn set_page_number(&mut self, page_number: usize) -> ViewResult<()> {
        if page_number == 0 {
            return Err(ViewError::invalid_argument("pageNumber must be >= 1"));
        }
        self.page_number = page_number;
        Ok(())
    }

    /// Index of the first record on the current page
    pub fn offset(&self) -> usize {
        self.page_number.saturating_sub(1).saturating_mul(self.per_page)
    }
}

/// Validate a signed perPage value from the wire
pub fn per_page_from_signed(value: i64) -> ViewResult<usize> {
    usize::try_from(value)
        .map_err(|_| ViewError::invalid_argument(format!("perPage must be >= 0, got {}", value)))
}

/// Validate a signed pageNumber value from the wire
pub fn page_number_from_signed(value: i64) -> ViewResult<usize> {
    match usize::try_from(value) {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(ViewError::invalid_argument(format!(
            "pageNumber must be >= 1, got {}",
            value
        ))),
    }
}
