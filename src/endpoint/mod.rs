//! The ResourceListEndpoint contract consumed by a browser.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Browser<E> (per screen)                  │
//! │  - list (paged view, stats large page, export)              │
//! │  - create / update / delete                                 │
//! └─────────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  ResourceEndpoint trait                     │
//! │  list(params) -> { rows, pagination }                       │
//! │  create(payload) / update(id, payload) / delete(id)         │
//! └─────────────────────────────────────────────────────────────┘
//!          │                                   │
//!          ▼                                   ▼
//! ┌──────────────────┐              ┌─────────────────────────┐
//! │ InMemoryEndpoint │              │ HttpEndpoint            │
//! │   (included)     │              │ (feature = "http")      │
//! └──────────────────┘              └─────────────────────────┘
//! ```
//!
//! Every implementation normalizes its failures into [`ApiError`] once, at
//! this boundary.

mod in_memory;

#[cfg(feature = "http")]
mod http;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::cache::PaginatedResult;
use crate::error::ApiError;
use crate::query::ListParams;
use crate::resource::{Resource, ResourceId};

pub use in_memory::{EndpointCall, InMemoryEndpoint, Operation};

#[cfg(feature = "http")]
pub use http::HttpEndpoint;

/// Wire shape of a list response.
pub type ListResponse<R> = PaginatedResult<R>;

/// Server-side list and mutation endpoints of one resource type.
///
/// Timeouts belong to the implementation; the browser only reacts to the
/// eventual result.
#[async_trait]
pub trait ResourceEndpoint: Send + Sync + 'static {
    type Row: Resource;
    type Payload: Serialize + Send + Sync + 'static;

    /// Fetch one page of the (filtered, sorted) collection.
    async fn list(&self, params: &ListParams) -> Result<ListResponse<Self::Row>, ApiError>;

    async fn create(&self, payload: &Self::Payload) -> Result<Self::Row, ApiError>;

    async fn update(&self, id: &ResourceId, payload: &Self::Payload)
        -> Result<Self::Row, ApiError>;

    async fn delete(&self, id: &ResourceId) -> Result<(), ApiError>;
}

#[async_trait]
impl<E: ResourceEndpoint> ResourceEndpoint for Arc<E> {
    type Row = E::Row;
    type Payload = E::Payload;

    async fn list(&self, params: &ListParams) -> Result<ListResponse<Self::Row>, ApiError> {
        (**self).list(params).await
    }

    async fn create(&self, payload: &Self::Payload) -> Result<Self::Row, ApiError> {
        (**self).create(payload).await
    }

    async fn update(
        &self,
        id: &ResourceId,
        payload: &Self::Payload,
    ) -> Result<Self::Row, ApiError> {
        (**self).update(id, payload).await
    }

    async fn delete(&self, id: &ResourceId) -> Result<(), ApiError> {
        (**self).delete(id).await
    }
}
