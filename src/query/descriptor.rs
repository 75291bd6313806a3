use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::resource::ResourceSchema;
use crate::state::{QueryState, RequestKey, SortDirection};

/// Frozen snapshot of the query state at the moment a fetch was issued.
///
/// Never mutated after issue; the next descriptor supersedes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    seq: u64,
    key: RequestKey,
    state: QueryState,
}

impl RequestDescriptor {
    pub(crate) fn new(seq: u64, state: QueryState) -> Self {
        Self {
            seq,
            key: state.request_key(),
            state,
        }
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn key(&self) -> &RequestKey {
        &self.key
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Translate into list endpoint parameters.
    pub fn params(&self, schema: &ResourceSchema) -> ListParams {
        ListParams::from_state(schema, &self.state)
    }
}

/// Query parameters of one list endpoint call.
///
/// `filters` is keyed by the server parameter name of each constrained
/// facet; "all" facets are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListParams {
    pub page: u32,
    pub per_page: u32,
    pub sort_field: String,
    pub sort_order: SortDirection,
    #[serde(default)]
    pub filters: BTreeMap<String, String>,
}

impl ListParams {
    /// Parameters for the state's current page, with local sort aliases
    /// remapped to server field names.
    pub fn from_state(schema: &ResourceSchema, state: &QueryState) -> Self {
        let sort_field = schema
            .server_sort_field(&state.sort.field)
            .unwrap_or(&state.sort.field)
            .to_string();

        let filters = state
            .filter
            .active()
            .map(|(facet, value)| {
                let param = schema
                    .facet_named(facet)
                    .map(|f| f.param.as_str())
                    .unwrap_or(facet);
                (param.to_string(), value.to_string())
            })
            .collect();

        Self {
            page: state.page.number,
            per_page: state.page.size,
            sort_field,
            sort_order: state.sort.direction,
            filters,
        }
    }

    /// First page of the whole collection in the schema's default order.
    pub fn unfiltered(schema: &ResourceSchema, per_page: u32) -> Self {
        let default_sort = schema.default_sort_field();
        Self {
            page: 1,
            per_page,
            sort_field: schema
                .server_sort_field(default_sort)
                .unwrap_or(default_sort)
                .to_string(),
            sort_order: schema.default_direction(),
            filters: BTreeMap::new(),
        }
    }

    pub fn filter(&self, param: &str) -> Option<&str> {
        self.filters.get(param).map(String::as_str)
    }

    /// Flatten into `(name, value)` pairs for a query string.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("per_page".to_string(), self.per_page.to_string()),
            ("sort_field".to_string(), self.sort_field.clone()),
            ("sort_order".to_string(), self.sort_order.as_str().to_string()),
        ];
        pairs.extend(self.filters.iter().map(|(k, v)| (k.clone(), v.clone())));
        pairs
    }
}
