//! Filter/Sort/Page state.
//!
//! [`QueryState`] is the one coherent state object a browser owns. Its
//! setters enforce the page-reset rule: any filter or sort change (and any
//! page-size change) sends the view back to page 1. [`QueryState::request_key`]
//! is the canonical dependency key the synchronizer fires on.

mod filter;
mod page;
mod sort;

use std::fmt;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::error::BrowserError;
use crate::resource::ResourceSchema;

pub use filter::{FacetValue, FilterState, ALL};
pub use page::PageState;
pub use sort::{SortDirection, SortState};

/// Canonical string form of a [`QueryState`].
///
/// Two states have equal keys exactly when every facet, the sort and the
/// page are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestKey(String);

impl RequestKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Filter, sort and page of one browser instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryState {
    pub filter: FilterState,
    pub sort: SortState,
    pub page: PageState,
}

impl QueryState {
    pub fn for_schema(schema: &ResourceSchema) -> Self {
        Self {
            filter: FilterState::for_schema(schema),
            sort: SortState::for_schema(schema),
            page: PageState::for_schema(schema),
        }
    }

    pub fn set_filter(
        &mut self,
        schema: &ResourceSchema,
        facet: &str,
        raw: &str,
    ) -> Result<bool, BrowserError> {
        let changed = self.filter.set(schema, facet, raw)?;
        if changed {
            self.page.first();
        }
        Ok(changed)
    }

    pub fn clear_filters(&mut self) -> bool {
        let changed = self.filter.clear();
        if changed {
            self.page.first();
        }
        changed
    }

    /// Header-click sort selection. Always a change.
    pub fn select_sort(&mut self, schema: &ResourceSchema, field: &str) -> Result<bool, BrowserError> {
        self.sort.select(schema, field)?;
        self.page.first();
        Ok(true)
    }

    pub fn set_sort(
        &mut self,
        schema: &ResourceSchema,
        field: &str,
        direction: SortDirection,
    ) -> Result<bool, BrowserError> {
        let changed = self.sort.set(schema, field, direction)?;
        if changed {
            self.page.first();
        }
        Ok(changed)
    }

    pub fn set_page(&mut self, number: u32) -> Result<bool, BrowserError> {
        self.page.set_number(number)
    }

    pub fn set_page_size(&mut self, schema: &ResourceSchema, size: u32) -> Result<bool, BrowserError> {
        let changed = self.page.set_size(schema, size)?;
        if changed {
            self.page.first();
        }
        Ok(changed)
    }

    pub fn request_key(&self) -> RequestKey {
        let mut key = format!(
            "page={}&per_page={}&sort={}:{}",
            self.page.number, self.page.size, self.sort.field, self.sort.direction
        );
        for (facet, value) in self.filter.iter() {
            // Debug formatting quotes and escapes, keeping the key unambiguous
            let _ = match value {
                FacetValue::All => write!(key, "&{}=*", facet),
                FacetValue::Text(t) => write!(key, "&{}=t{:?}", facet, t),
                FacetValue::Token(t) => write!(key, "&{}=k{:?}", facet, t),
            };
        }
        RequestKey(key)
    }
}
