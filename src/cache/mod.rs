//! Client-side caches: the displayed page and the aggregate statistics.
//!
//! The two are deliberately separate. The page follows every filter, sort
//! and page change; the statistics describe the whole collection and only
//! refresh on mount or explicit invalidation.

mod collection;
mod stats;

pub use collection::{CollectionCache, PaginatedResult, Pagination};
pub use stats::{Accumulator, AggregateStats, StatsCache, StatsSpec};
