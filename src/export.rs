//! Bulk export parameters.
//!
//! An export materializes the full result set in one large-page fetch,
//! independent of the paginated view. Spreadsheet generation happens
//! downstream.

use crate::query::ListParams;
use crate::resource::ResourceSchema;
use crate::state::QueryState;

/// Which rows an export covers. Chosen per screen, explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportScope {
    /// The current filter and sort, from the first row.
    #[default]
    CurrentView,
    /// The whole collection, ignoring the current filters.
    Global,
}

impl ExportScope {
    pub fn params(self, schema: &ResourceSchema, query: &QueryState, per_page: u32) -> ListParams {
        match self {
            ExportScope::CurrentView => {
                let mut params = ListParams::from_state(schema, query);
                params.page = 1;
                params.per_page = per_page;
                params
            }
            ExportScope::Global => ListParams::unfiltered(schema, per_page),
        }
    }
}
