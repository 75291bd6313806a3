mod browser;
mod cache;
mod config;
mod debounce;
mod endpoint;
mod error;
mod export;
mod locks;
mod mutation;
mod query;
mod resource;
mod state;

#[cfg(feature = "bus")]
pub mod bus;

pub use browser::{Browser, BrowserBuilder, BrowserView, SyncOutcome};
pub use cache::{
    Accumulator, AggregateStats, CollectionCache, PaginatedResult, Pagination, StatsCache,
    StatsSpec,
};
pub use config::BrowserConfig;
pub use debounce::Debouncer;
pub use endpoint::{EndpointCall, InMemoryEndpoint, ListResponse, Operation, ResourceEndpoint};
pub use error::{ApiError, BrowserError, FieldErrors};
pub use export::ExportScope;
pub use mutation::{
    ConfirmedDelete, DeleteIntent, MutationKind, MutationTicket, MutationTracker,
    PendingMutation,
};
pub use query::{ListParams, RequestDescriptor, Sequencer};
pub use resource::{Facet, FacetKind, Resource, ResourceId, ResourceSchema, SortField};
pub use state::{FacetValue, FilterState, PageState, QueryState, RequestKey, SortDirection, SortState, ALL};

#[cfg(feature = "http")]
pub use endpoint::HttpEndpoint;

// Derive macro for the Resource trait
pub use resource_browser_macros::Resource;

// Re-exported so endpoint implementations need not depend on it directly
pub use async_trait::async_trait;
