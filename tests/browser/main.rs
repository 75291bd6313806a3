//! Browser integration tests.

mod support;
mod debounce;
mod paging;
mod stats;
mod sync;
