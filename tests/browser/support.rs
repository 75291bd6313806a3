//! Shared fixtures: a product catalog and an endpoint whose calls can be held.

use std::sync::{Arc, Mutex};

use resource_browser::{
    async_trait, ApiError, Browser, BrowserConfig, InMemoryEndpoint, ListParams, ListResponse,
    Resource, ResourceEndpoint, ResourceId, ResourceSchema, SortDirection, StatsSpec,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::oneshot;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
#[resource(name = "products")]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub status: String,
    pub price: f64,
}

/// `n` products. Every third one is inactive; prices are a permutation of
/// 1..=30 for the first thirty, so price order differs from name order.
pub fn catalog(n: u64) -> Vec<Product> {
    (1..=n)
        .map(|i| Product {
            id: i,
            name: format!("Product {:02}", i),
            status: if i % 3 == 0 { "inactive" } else { "active" }.to_string(),
            price: ((i * 7) % 31) as f64,
        })
        .collect()
}

pub fn schema() -> ResourceSchema {
    ResourceSchema::for_resource::<Product>()
        .text_facet("search")
        .choice_facet("status", ["active", "inactive"])
        .sortable("name")
        .sortable("price")
        .default_sort("id", SortDirection::Desc)
        .page_sizes([10, 25, 50])
        .default_page_size(10)
}

pub fn stats_spec() -> StatsSpec {
    StatsSpec::new().count_by("status").sum("price")
}

pub fn endpoint(n: u64) -> InMemoryEndpoint<Product> {
    InMemoryEndpoint::new(catalog(n)).searchable(["name"])
}

pub fn browser<E>(endpoint: E) -> Browser<E>
where
    E: ResourceEndpoint<Row = Product, Payload = Value>,
{
    browser_with(endpoint, BrowserConfig::default())
}

pub fn browser_with<E>(endpoint: E, config: BrowserConfig) -> Browser<E>
where
    E: ResourceEndpoint<Row = Product, Payload = Value>,
{
    Browser::builder(endpoint, schema())
        .config(config)
        .stats(stats_spec())
        .build()
        .unwrap()
}

pub fn ids(rows: &[Product]) -> Vec<u64> {
    rows.iter().map(|p| p.id).collect()
}

/// List calls of the displayed page, as opposed to statistics or exports.
pub fn page_calls(endpoint: &InMemoryEndpoint<Product>) -> Vec<ListParams> {
    endpoint
        .list_calls()
        .into_iter()
        .filter(|p| p.per_page < 1000)
        .collect()
}

pub fn stats_calls(endpoint: &InMemoryEndpoint<Product>) -> usize {
    endpoint.list_calls_with_page_size(1000).len()
}

/// Yield until `condition` holds.
pub async fn eventually(mut condition: impl FnMut() -> bool) {
    for _ in 0..1000 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition never became true");
}

/// Yield a fixed number of times so spawned tasks get a chance to run.
pub async fn settle() {
    for _ in 0..50 {
        tokio::task::yield_now().await;
    }
}

// ============================================================================
// GatedEndpoint
// ============================================================================

/// Wraps an [`InMemoryEndpoint`]; while held, every call parks until the
/// test releases it, so responses can be resolved in any order.
#[derive(Clone)]
pub struct GatedEndpoint {
    inner: InMemoryEndpoint<Product>,
    held: Arc<Mutex<bool>>,
    waiting: Arc<Mutex<Vec<Option<oneshot::Sender<()>>>>>,
}

impl GatedEndpoint {
    pub fn new(inner: InMemoryEndpoint<Product>) -> Self {
        Self {
            inner,
            held: Arc::new(Mutex::new(false)),
            waiting: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn inner(&self) -> &InMemoryEndpoint<Product> {
        &self.inner
    }

    /// Park every call from now on.
    pub fn hold(&self) {
        *self.held.lock().unwrap() = true;
    }

    /// Stop parking and release everything still parked.
    pub fn open(&self) {
        *self.held.lock().unwrap() = false;
        for gate in self.waiting.lock().unwrap().iter_mut() {
            if let Some(tx) = gate.take() {
                let _ = tx.send(());
            }
        }
    }

    /// Number of calls parked so far, released or not.
    pub fn parked(&self) -> usize {
        self.waiting.lock().unwrap().len()
    }

    /// Release the `n`th parked call.
    pub fn release(&self, n: usize) {
        let tx = self.waiting.lock().unwrap()[n].take();
        if let Some(tx) = tx {
            let _ = tx.send(());
        }
    }

    async fn gate(&self) {
        let rx = {
            if !*self.held.lock().unwrap() {
                return;
            }
            let (tx, rx) = oneshot::channel();
            self.waiting.lock().unwrap().push(Some(tx));
            rx
        };
        let _ = rx.await;
    }
}

#[async_trait]
impl ResourceEndpoint for GatedEndpoint {
    type Row = Product;
    type Payload = Value;

    async fn list(&self, params: &ListParams) -> Result<ListResponse<Product>, ApiError> {
        self.gate().await;
        self.inner.list(params).await
    }

    async fn create(&self, payload: &Value) -> Result<Product, ApiError> {
        self.gate().await;
        self.inner.create(payload).await
    }

    async fn update(&self, id: &ResourceId, payload: &Value) -> Result<Product, ApiError> {
        self.gate().await;
        self.inner.update(id, payload).await
    }

    async fn delete(&self, id: &ResourceId) -> Result<(), ApiError> {
        self.gate().await;
        self.inner.delete(id).await
    }
}
