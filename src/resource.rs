//! Resources and their declared list schema.

use std::fmt;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::BrowserError;
use crate::state::SortDirection;

/// Trait for row types shown by a browser.
///
/// Usually implemented with `#[derive(Resource)]`.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Resource name (e.g., "products", "orders"). Used in endpoint paths and logs.
    const NAME: &'static str;

    /// The immutable identity of this row.
    fn id(&self) -> ResourceId;
}

/// Immutable identity of a resource row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for ResourceId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// How a facet's values are constrained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacetKind {
    /// Free text, committed through the debouncer. Empty text means "all".
    Text,
    /// Enumerated token from a fixed allow-list (e.g., order status).
    Choice(Vec<String>),
    /// Token from an open set known only to the server (e.g., category id).
    Token,
}

/// One declared filter dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Facet {
    pub name: String,
    /// Query parameter name sent to the list endpoint.
    pub param: String,
    pub kind: FacetKind,
}

impl Facet {
    pub fn is_text(&self) -> bool {
        matches!(self.kind, FacetKind::Text)
    }
}

/// A sortable field and the server field it maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortField {
    pub name: String,
    pub server_name: String,
}

/// Static declaration of what a resource list supports.
///
/// ## Example
///
/// ```
/// use resource_browser::{ResourceSchema, SortDirection};
///
/// let schema = ResourceSchema::new("products")
///     .text_facet("search")
///     .choice_facet("status", ["active", "inactive"])
///     .token_facet("category")
///     .sortable("name")
///     .sortable_as("price", "unit_price")
///     .default_sort("created_at", SortDirection::Desc)
///     .page_sizes([10, 25, 50]);
///
/// assert_eq!(schema.server_sort_field("price"), Some("unit_price"));
/// assert!(schema.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSchema {
    name: String,
    facets: Vec<Facet>,
    sortable: Vec<SortField>,
    default_sort: String,
    default_direction: SortDirection,
    page_sizes: Vec<u32>,
    default_page_size: u32,
}

impl ResourceSchema {
    /// A schema sortable by `id` descending, with page sizes 10/25/50/100.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            facets: Vec::new(),
            sortable: vec![SortField {
                name: "id".into(),
                server_name: "id".into(),
            }],
            default_sort: "id".into(),
            default_direction: SortDirection::Desc,
            page_sizes: vec![10, 25, 50, 100],
            default_page_size: 10,
        }
    }

    /// A schema named after a [`Resource`] type.
    pub fn for_resource<R: Resource>() -> Self {
        Self::new(R::NAME)
    }

    pub fn text_facet(self, name: &str) -> Self {
        self.facet(name, name, FacetKind::Text)
    }

    pub fn choice_facet<I, S>(self, name: &str, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let choices = choices.into_iter().map(Into::into).collect();
        self.facet(name, name, FacetKind::Choice(choices))
    }

    pub fn token_facet(self, name: &str) -> Self {
        self.facet(name, name, FacetKind::Token)
    }

    /// Declare a facet whose query parameter differs from its local name.
    pub fn facet(mut self, name: &str, param: &str, kind: FacetKind) -> Self {
        self.facets.retain(|f| f.name != name);
        self.facets.push(Facet {
            name: name.into(),
            param: param.into(),
            kind,
        });
        self
    }

    pub fn sortable(self, field: &str) -> Self {
        self.sortable_as(field, field)
    }

    /// Declare a sortable field whose server name differs from its local alias.
    pub fn sortable_as(mut self, field: &str, server_field: &str) -> Self {
        self.sortable.retain(|f| f.name != field);
        self.sortable.push(SortField {
            name: field.into(),
            server_name: server_field.into(),
        });
        self
    }

    /// Initial sort, and the direction any newly selected field starts with.
    ///
    /// The field is added to the sortable set if it is not declared yet.
    pub fn default_sort(mut self, field: &str, direction: SortDirection) -> Self {
        if self.sort_field(field).is_none() {
            self = self.sortable(field);
        }
        self.default_sort = field.into();
        self.default_direction = direction;
        self
    }

    /// Page-size allow-list; the first entry becomes the default.
    pub fn page_sizes(mut self, sizes: impl IntoIterator<Item = u32>) -> Self {
        self.page_sizes = sizes.into_iter().collect();
        if let Some(first) = self.page_sizes.first() {
            self.default_page_size = *first;
        }
        self
    }

    pub fn default_page_size(mut self, size: u32) -> Self {
        self.default_page_size = size;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn facets(&self) -> &[Facet] {
        &self.facets
    }

    pub fn facet_named(&self, name: &str) -> Option<&Facet> {
        self.facets.iter().find(|f| f.name == name)
    }

    pub fn sort_field(&self, name: &str) -> Option<&SortField> {
        self.sortable.iter().find(|f| f.name == name)
    }

    pub fn server_sort_field(&self, name: &str) -> Option<&str> {
        self.sort_field(name).map(|f| f.server_name.as_str())
    }

    pub fn sortable_fields(&self) -> impl Iterator<Item = &str> {
        self.sortable.iter().map(|f| f.name.as_str())
    }

    pub fn default_sort_field(&self) -> &str {
        &self.default_sort
    }

    pub fn default_direction(&self) -> SortDirection {
        self.default_direction
    }

    pub fn allows_page_size(&self, size: u32) -> bool {
        self.page_sizes.contains(&size)
    }

    pub fn page_size_options(&self) -> &[u32] {
        &self.page_sizes
    }

    pub fn initial_page_size(&self) -> u32 {
        self.default_page_size
    }

    /// Check the schema is internally consistent.
    pub fn validate(&self) -> Result<(), BrowserError> {
        if self.sort_field(&self.default_sort).is_none() {
            return Err(BrowserError::UnsortableField(self.default_sort.clone()));
        }
        if self.page_sizes.is_empty() || self.page_sizes.contains(&0) {
            return Err(BrowserError::Config(format!(
                "{}: page sizes must be a non-empty list of positive numbers",
                self.name
            )));
        }
        if !self.allows_page_size(self.default_page_size) {
            return Err(BrowserError::InvalidPageSize(self.default_page_size));
        }
        for facet in &self.facets {
            if let FacetKind::Choice(choices) = &facet.kind {
                if choices.iter().any(|c| c == crate::state::ALL) {
                    return Err(BrowserError::Config(format!(
                        "{}: facet {} lists the reserved value \"all\"",
                        self.name, facet.name
                    )));
                }
            }
        }
        Ok(())
    }
}
