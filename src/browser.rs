//! Browser - the per-screen controller of a paginated resource list.
//!
//! One `Browser` instance owns everything a list screen shows: the query
//! state, the displayed page, the aggregate statistics, in-flight mutations
//! and push subscriptions. Nothing is shared across screens.
//!
//! ## Data flow
//!
//! ```text
//!  set_filter / set_sort / set_page      create / update / remove     push event
//!            │                                   │                        │
//!            ▼                                   ▼                        ▼
//!   QueryState (page reset)            MutationTracker              InvalidationRules
//!            │ request_key changed?              │ success                │
//!            ▼                                   ├──────────────┬─────────┘
//!   Sequencer::issue ──► endpoint.list ◄─────────┘ refresh()    │ invalidate_stats()
//!            │                                                   ▼
//!            ▼ still the latest seq?                      StatsCache (large page)
//!   CollectionCache::replace
//! ```
//!
//! ## Example
//!
//! ```ignore
//! let browser = Browser::builder(endpoint, schema)
//!     .stats(StatsSpec::new().count_by("status").sum("total"))
//!     .build()?;
//! browser.mount().await?;
//!
//! browser.set_filter("status", "pending").await?;
//! browser.set_sort("created_at").await?;
//!
//! let view = browser.view();
//! render(&view.rows, &view.pagination, view.stats.as_ref());
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;

use crate::cache::{AggregateStats, CollectionCache, Pagination, StatsCache, StatsSpec};
use crate::config::BrowserConfig;
use crate::debounce::Debouncer;
use crate::endpoint::ResourceEndpoint;
use crate::error::{ApiError, BrowserError, FieldErrors};
use crate::export::ExportScope;
use crate::locks::lock;
use crate::mutation::{
    ConfirmedDelete, DeleteIntent, MutationKind, MutationTicket, MutationTracker, PendingMutation,
};
use crate::query::{ListParams, RequestDescriptor, Sequencer};
use crate::resource::{Resource, ResourceId, ResourceSchema};
use crate::state::{QueryState, SortDirection};

#[cfg(feature = "bus")]
use crate::bus::{Invalidation, InvalidationRules, PushChannel, Scope, Subscription};
#[cfg(feature = "bus")]
use std::ops::ControlFlow;
#[cfg(feature = "bus")]
use std::sync::PoisonError;
#[cfg(feature = "bus")]
use tokio::task::AbortHandle;

/// Outcome of a list synchronization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The response was applied to the displayed page.
    Applied,
    /// A newer request was issued meanwhile; the response was discarded.
    Superseded,
    /// The request key did not change, so nothing was fetched.
    Unchanged,
    /// The browser is not mounted yet; state changed without a fetch.
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Idle,
    Mounted,
    Unmounted,
}

/// Everything a renderer needs, as one snapshot.
#[derive(Debug, Clone)]
pub struct BrowserView<R> {
    pub rows: Vec<R>,
    pub pagination: Pagination,
    pub stats: Option<AggregateStats>,
    pub stats_dirty: bool,
    pub is_loading: bool,
    pub stats_loading: bool,
    pub mutations_in_flight: usize,
    /// Failure of the latest list synchronization.
    pub error: Option<BrowserError>,
    /// Failure of the latest statistics load.
    pub stats_error: Option<BrowserError>,
    pub query: QueryState,
}

struct Shared<R> {
    lifecycle: Lifecycle,
    query: QueryState,
    sequencer: Sequencer,
    collection: CollectionCache<R>,
    stats: StatsCache,
    error: Option<BrowserError>,
    stats_error: Option<BrowserError>,
    mutations: MutationTracker,
    #[cfg(feature = "bus")]
    subscriptions: Vec<AbortHandle>,
}

impl<R> Shared<R> {
    fn ensure_live(&self) -> Result<(), BrowserError> {
        match self.lifecycle {
            Lifecycle::Unmounted => Err(BrowserError::Unmounted),
            _ => Ok(()),
        }
    }

    fn is_mounted(&self) -> bool {
        self.lifecycle == Lifecycle::Mounted
    }

    fn issue(&mut self) -> RequestDescriptor {
        self.sequencer.issue(&self.query)
    }
}

struct Inner<E: ResourceEndpoint> {
    endpoint: E,
    schema: ResourceSchema,
    config: BrowserConfig,
    stats_spec: StatsSpec,
    export_scope: ExportScope,
    shared: Mutex<Shared<E::Row>>,
    revision: watch::Sender<u64>,
}

#[cfg(feature = "bus")]
impl<E: ResourceEndpoint> Drop for Inner<E> {
    fn drop(&mut self) {
        let shared = self
            .shared
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        for handle in shared.subscriptions.drain(..) {
            handle.abort();
        }
    }
}

/// Bookkeeping entry that must be released when its call ends.
#[derive(Debug)]
enum Hold {
    List(u64),
    Stats(u64),
    Mutation(MutationTicket),
}

/// Releases a [`Hold`] if the owning future is dropped before its call
/// resolves (timeouts, `select!`, aborted subscription tasks).
struct InFlight<'a, E: ResourceEndpoint> {
    browser: &'a Browser<E>,
    hold: Option<Hold>,
}

impl<E: ResourceEndpoint> InFlight<'_, E> {
    /// The call resolved; the caller settles the bookkeeping itself.
    fn disarm(mut self) {
        self.hold = None;
    }

    /// The call resolved; release the hold now.
    fn release(mut self) {
        if let Some(hold) = self.hold.take() {
            self.browser.release(hold);
        }
    }
}

impl<E: ResourceEndpoint> Drop for InFlight<'_, E> {
    fn drop(&mut self) {
        if let Some(hold) = self.hold.take() {
            tracing::debug!(resource = self.browser.resource(), hold = ?hold, "in-flight call cancelled");
            self.browser.release(hold);
        }
    }
}

/// Builder for [`Browser`].
pub struct BrowserBuilder<E: ResourceEndpoint> {
    endpoint: E,
    schema: ResourceSchema,
    config: BrowserConfig,
    stats_spec: StatsSpec,
    export_scope: ExportScope,
}

impl<E: ResourceEndpoint> BrowserBuilder<E> {
    pub fn config(mut self, config: BrowserConfig) -> Self {
        self.config = config;
        self
    }

    /// Figures derived for the aggregate statistics.
    pub fn stats(mut self, spec: StatsSpec) -> Self {
        self.stats_spec = spec;
        self
    }

    /// What `export_all` covers on this screen.
    pub fn export_scope(mut self, scope: ExportScope) -> Self {
        self.export_scope = scope;
        self
    }

    pub fn build(self) -> Result<Browser<E>, BrowserError> {
        self.schema.validate()?;
        self.config.validate()?;

        let query = QueryState::for_schema(&self.schema);
        let per_page = query.page.size;
        let (revision, _) = watch::channel(0);

        Ok(Browser {
            inner: Arc::new(Inner {
                endpoint: self.endpoint,
                schema: self.schema,
                config: self.config,
                stats_spec: self.stats_spec,
                export_scope: self.export_scope,
                shared: Mutex::new(Shared {
                    lifecycle: Lifecycle::Idle,
                    query,
                    sequencer: Sequencer::new(),
                    collection: CollectionCache::new(per_page),
                    stats: StatsCache::new(),
                    error: None,
                    stats_error: None,
                    mutations: MutationTracker::new(),
                    #[cfg(feature = "bus")]
                    subscriptions: Vec::new(),
                }),
                revision,
            }),
        })
    }
}

/// Controller of one resource-list screen.
///
/// Cheap to clone; clones drive the same screen. Methods take `&self`, so
/// several operations may be in flight at once. Only the response to the
/// latest issued request ever reaches the displayed page.
pub struct Browser<E: ResourceEndpoint> {
    inner: Arc<Inner<E>>,
}

impl<E: ResourceEndpoint> Clone for Browser<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: ResourceEndpoint> Browser<E> {
    pub fn builder(endpoint: E, schema: ResourceSchema) -> BrowserBuilder<E> {
        BrowserBuilder {
            endpoint,
            schema,
            config: BrowserConfig::default(),
            stats_spec: StatsSpec::default(),
            export_scope: ExportScope::default(),
        }
    }

    /// A browser with default configuration, no statistics figures and
    /// current-view exports.
    pub fn new(endpoint: E, schema: ResourceSchema) -> Result<Self, BrowserError> {
        Self::builder(endpoint, schema).build()
    }

    fn shared(&self) -> MutexGuard<'_, Shared<E::Row>> {
        lock(&self.inner.shared)
    }

    fn resource(&self) -> &str {
        self.inner.schema.name()
    }

    fn notify(&self) {
        self.inner.revision.send_modify(|r| *r += 1);
    }

    fn track(&self, hold: Hold) -> InFlight<'_, E> {
        InFlight {
            browser: self,
            hold: Some(hold),
        }
    }

    fn release(&self, hold: Hold) {
        {
            let mut shared = self.shared();
            match hold {
                Hold::List(seq) => {
                    shared.sequencer.complete(seq);
                }
                Hold::Stats(token) => {
                    shared.stats.fail(token);
                }
                Hold::Mutation(ticket) => {
                    shared.mutations.finish(ticket);
                }
            }
        }
        self.notify();
    }

    // ==================================================================
    // Lifecycle
    // ==================================================================

    /// Fetch the first page and the statistics, concurrently.
    ///
    /// Mounting an already mounted browser does nothing.
    pub async fn mount(&self) -> Result<(), BrowserError> {
        let descriptor = {
            let mut shared = self.shared();
            match shared.lifecycle {
                Lifecycle::Unmounted => return Err(BrowserError::Unmounted),
                Lifecycle::Mounted => return Ok(()),
                Lifecycle::Idle => {}
            }
            shared.lifecycle = Lifecycle::Mounted;
            shared.issue()
        };
        let guard = self.track(Hold::List(descriptor.seq()));
        tracing::debug!(resource = self.resource(), "browser mounted");
        self.notify();

        let (list, stats) = tokio::join!(self.run(descriptor, guard), self.load_stats());
        list?;
        stats?;
        Ok(())
    }

    /// Tear the screen down.
    ///
    /// Every outstanding request becomes stale, push subscriptions are
    /// aborted and the caches are cleared. Later operations fail with
    /// [`BrowserError::Unmounted`].
    pub fn unmount(&self) {
        #[cfg(feature = "bus")]
        let subscriptions = {
            let mut shared = self.shared();
            Self::tear_down(&mut shared);
            std::mem::take(&mut shared.subscriptions)
        };
        #[cfg(not(feature = "bus"))]
        Self::tear_down(&mut self.shared());

        #[cfg(feature = "bus")]
        for handle in subscriptions {
            handle.abort();
        }

        tracing::debug!(resource = self.resource(), "browser unmounted");
        self.notify();
    }

    fn tear_down(shared: &mut Shared<E::Row>) {
        shared.lifecycle = Lifecycle::Unmounted;
        shared.sequencer.retire();
        shared.collection.clear();
        shared.stats.clear();
        shared.mutations.clear();
        shared.error = None;
        shared.stats_error = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.shared().is_mounted()
    }

    // ==================================================================
    // Query state
    // ==================================================================

    /// Apply `change` to the query state and synchronize if the request key moved.
    async fn update_query<F>(&self, change: F) -> Result<SyncOutcome, BrowserError>
    where
        F: FnOnce(&mut QueryState, &ResourceSchema) -> Result<bool, BrowserError>,
    {
        let descriptor = {
            let mut shared = self.shared();
            shared.ensure_live()?;
            let before = shared.query.request_key();
            change(&mut shared.query, &self.inner.schema)?;
            if shared.query.request_key() == before {
                return Ok(SyncOutcome::Unchanged);
            }
            if !shared.is_mounted() {
                drop(shared);
                self.notify();
                return Ok(SyncOutcome::Idle);
            }
            shared.issue()
        };
        let guard = self.track(Hold::List(descriptor.seq()));
        self.notify();
        self.run(descriptor, guard).await
    }

    /// Select a facet value. Text facets treat blank input as "all";
    /// enumerated facets accept `"all"`.
    pub async fn set_filter(&self, facet: &str, value: &str) -> Result<SyncOutcome, BrowserError> {
        self.update_query(|q, schema| q.set_filter(schema, facet, value))
            .await
    }

    /// Reset every facet to "all".
    pub async fn clear_filters(&self) -> Result<SyncOutcome, BrowserError> {
        self.update_query(|q, _| Ok(q.clear_filters())).await
    }

    /// Header-click sort: the same field flips direction, a new field starts
    /// at the resource's default direction.
    pub async fn set_sort(&self, field: &str) -> Result<SyncOutcome, BrowserError> {
        self.update_query(|q, schema| q.select_sort(schema, field))
            .await
    }

    pub async fn sort_by(
        &self,
        field: &str,
        direction: SortDirection,
    ) -> Result<SyncOutcome, BrowserError> {
        self.update_query(|q, schema| q.set_sort(schema, field, direction))
            .await
    }

    pub async fn set_page(&self, number: u32) -> Result<SyncOutcome, BrowserError> {
        self.update_query(|q, _| q.set_page(number)).await
    }

    pub async fn set_page_size(&self, size: u32) -> Result<SyncOutcome, BrowserError> {
        self.update_query(|q, schema| q.set_page_size(schema, size))
            .await
    }

    /// A debounced input wired to a text facet.
    ///
    /// Each commit runs `set_filter(facet, text)`. The debouncer holds no
    /// strong reference to the browser.
    pub fn search_box(&self, facet: &str) -> Result<Debouncer<String>, BrowserError> {
        let decl = self
            .inner
            .schema
            .facet_named(facet)
            .ok_or_else(|| BrowserError::UnknownFacet(facet.to_string()))?;
        if !decl.is_text() {
            return Err(BrowserError::Config(format!(
                "facet {} is not a text facet",
                facet
            )));
        }

        let weak = Arc::downgrade(&self.inner);
        let facet = facet.to_string();
        Ok(Debouncer::spawn(self.inner.config.debounce(), move |text: String| {
            let weak = weak.clone();
            let facet = facet.clone();
            async move {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                let browser = Browser { inner };
                if let Err(e) = browser.set_filter(&facet, &text).await {
                    tracing::debug!(resource = browser.resource(), facet = %facet, error = %e, "search commit failed");
                }
            }
        }))
    }

    // ==================================================================
    // Synchronization
    // ==================================================================

    /// Re-synchronize with the current state, even if nothing changed.
    pub async fn refresh(&self) -> Result<SyncOutcome, BrowserError> {
        let descriptor = {
            let mut shared = self.shared();
            shared.ensure_live()?;
            if !shared.is_mounted() {
                return Ok(SyncOutcome::Idle);
            }
            shared.issue()
        };
        let guard = self.track(Hold::List(descriptor.seq()));
        self.notify();
        self.run(descriptor, guard).await
    }

    async fn run(
        &self,
        descriptor: RequestDescriptor,
        guard: InFlight<'_, E>,
    ) -> Result<SyncOutcome, BrowserError> {
        let seq = descriptor.seq();
        let params = descriptor.params(&self.inner.schema);
        tracing::debug!(resource = self.resource(), seq, key = %descriptor.key(), "list request issued");

        let result = self.inner.endpoint.list(&params).await;
        guard.disarm();

        let outcome = {
            let mut shared = self.shared();
            let current = shared.sequencer.complete(seq) && shared.is_mounted();
            if !current {
                tracing::debug!(resource = self.resource(), seq, "stale list response discarded");
                return Ok(SyncOutcome::Superseded);
            }
            match result {
                Ok(page) => {
                    tracing::debug!(
                        resource = self.resource(),
                        seq,
                        rows = page.rows.len(),
                        total = page.pagination.total,
                        "list response applied"
                    );
                    shared.collection.replace(page);
                    shared.error = None;
                    Ok(SyncOutcome::Applied)
                }
                Err(e) => {
                    tracing::warn!(resource = self.resource(), seq, error = %e, "list request failed");
                    let err = BrowserError::from(e);
                    shared.error = Some(err.clone());
                    Err(err)
                }
            }
        };
        self.notify();
        outcome
    }

    // ==================================================================
    // Statistics
    // ==================================================================

    /// Cached statistics, fetching them only when missing or invalidated.
    ///
    /// Returns `None` before mount. A load already in flight is not duplicated.
    pub async fn load_stats(&self) -> Result<Option<AggregateStats>, BrowserError> {
        let token = {
            let mut shared = self.shared();
            shared.ensure_live()?;
            if !shared.is_mounted() {
                return Ok(None);
            }
            if !shared.stats.needs_load() || shared.stats.has_fresh_load() {
                return Ok(shared.stats.get().cloned());
            }
            shared.stats.begin_load()
        };
        let guard = self.track(Hold::Stats(token));
        self.notify();

        let params = ListParams::unfiltered(&self.inner.schema, self.inner.config.stats_page_size);
        tracing::debug!(resource = self.resource(), per_page = params.per_page, "stats load issued");
        let result = self.inner.endpoint.list(&params).await;
        guard.disarm();

        let outcome = {
            let mut shared = self.shared();
            if !shared.is_mounted() {
                return Err(BrowserError::Unmounted);
            }
            match result {
                Ok(page) => {
                    let stats = self
                        .inner
                        .stats_spec
                        .derive(&page.rows, page.pagination.total);
                    if stats.is_truncated() {
                        tracing::warn!(
                            resource = self.resource(),
                            rows = stats.rows,
                            total = stats.total,
                            "statistics computed from a truncated collection"
                        );
                    }
                    if shared.stats.finish(token, stats) {
                        shared.stats_error = None;
                    }
                    Ok(shared.stats.get().cloned())
                }
                Err(e) => {
                    tracing::warn!(resource = self.resource(), error = %e, "stats load failed");
                    let err = BrowserError::from(e);
                    if shared.stats.fail(token) {
                        shared.stats_error = Some(err.clone());
                    }
                    Err(err)
                }
            }
        };
        self.notify();
        outcome
    }

    /// Mark the statistics dirty, reloading them right away when configured to.
    pub async fn invalidate_stats(&self) -> Result<(), BrowserError> {
        {
            let mut shared = self.shared();
            shared.ensure_live()?;
            shared.stats.invalidate();
        }
        self.notify();
        if self.inner.config.reload_stats_on_invalidate {
            self.load_stats().await?;
        }
        Ok(())
    }

    /// Invalidate and reload the statistics.
    pub async fn refresh_stats(&self) -> Result<Option<AggregateStats>, BrowserError> {
        {
            let mut shared = self.shared();
            shared.ensure_live()?;
            shared.stats.invalidate();
        }
        self.load_stats().await
    }

    // ==================================================================
    // Mutations
    // ==================================================================

    fn begin_mutation(
        &self,
        mutation: PendingMutation,
    ) -> Result<InFlight<'_, E>, BrowserError> {
        let ticket = {
            let mut shared = self.shared();
            shared.ensure_live()?;
            shared.mutations.begin(mutation)?
        };
        self.notify();
        Ok(self.track(Hold::Mutation(ticket)))
    }

    /// Discard the pending mutation and, on success, re-synchronize once.
    async fn settle<T>(
        &self,
        guard: InFlight<'_, E>,
        kind: MutationKind,
        target: Option<&ResourceId>,
        result: Result<T, ApiError>,
    ) -> Result<T, BrowserError> {
        guard.release();
        let mounted = self.shared().is_mounted();

        match result {
            Ok(value) => {
                tracing::info!(
                    resource = self.resource(),
                    kind = kind.as_str(),
                    id = target.map(ResourceId::as_str).unwrap_or(""),
                    "mutation succeeded"
                );
                if mounted {
                    // Failures of these follow-ups are already visible in the view
                    let _ = self.refresh().await;
                    let _ = self.invalidate_stats().await;
                }
                Ok(value)
            }
            Err(e) => {
                tracing::warn!(
                    resource = self.resource(),
                    kind = kind.as_str(),
                    id = target.map(ResourceId::as_str).unwrap_or(""),
                    error = %e,
                    "mutation failed"
                );
                Err(e.into())
            }
        }
    }

    /// Create a resource. The new row shows up through the follow-up re-sync,
    /// wherever the current sort places it.
    pub async fn create(&self, payload: E::Payload) -> Result<E::Row, BrowserError> {
        let guard = self.begin_mutation(PendingMutation::create(payload_value(&payload)?))?;
        let result = self.inner.endpoint.create(&payload).await;
        let id = result.as_ref().ok().map(Resource::id);
        self.settle(guard, MutationKind::Create, id.as_ref(), result)
            .await
    }

    /// Update the resource with immutable identity `id`.
    pub async fn update(&self, id: &ResourceId, payload: E::Payload) -> Result<E::Row, BrowserError> {
        let guard =
            self.begin_mutation(PendingMutation::update(id.clone(), payload_value(&payload)?))?;
        let result = self.inner.endpoint.update(id, &payload).await;
        self.settle(guard, MutationKind::Update, Some(id), result)
            .await
    }

    /// Start a delete; the returned intent must be confirmed by the user.
    pub fn request_delete(&self, id: impl Into<ResourceId>) -> DeleteIntent {
        DeleteIntent::new(id)
    }

    /// Delete a confirmed resource.
    ///
    /// Pagination stays server-authoritative: removing the last row of the
    /// last page simply yields the server's new `last_page` on re-sync.
    pub async fn remove(&self, confirmed: ConfirmedDelete) -> Result<(), BrowserError> {
        let id = confirmed.id().clone();
        let guard = self.begin_mutation(PendingMutation::delete(id.clone()))?;
        let result = self.inner.endpoint.delete(&id).await;
        self.settle(guard, MutationKind::Delete, Some(&id), result)
            .await
    }

    // ==================================================================
    // Export
    // ==================================================================

    /// Fetch the full result set for a spreadsheet export in one call.
    ///
    /// Follows this screen's [`ExportScope`]; the displayed page is untouched.
    pub async fn export_all(&self) -> Result<Vec<E::Row>, BrowserError> {
        let params = {
            let shared = self.shared();
            shared.ensure_live()?;
            self.inner.export_scope.params(
                &self.inner.schema,
                &shared.query,
                self.inner.config.export_page_size,
            )
        };

        let page = self.inner.endpoint.list(&params).await.map_err(|e| {
            tracing::warn!(resource = self.resource(), error = %e, "export fetch failed");
            BrowserError::from(e)
        })?;
        if page.pagination.total > page.rows.len() as u64 {
            tracing::warn!(
                resource = self.resource(),
                rows = page.rows.len(),
                total = page.pagination.total,
                "export truncated at page size"
            );
        }
        Ok(page.rows)
    }

    // ==================================================================
    // Push invalidation
    // ==================================================================

    /// Subscribe this screen to push events.
    ///
    /// The subscription ends when the returned handle is dropped or the
    /// browser is unmounted, whichever comes first.
    #[cfg(feature = "bus")]
    pub fn subscribe<C>(
        &self,
        channel: &C,
        rules: InvalidationRules,
        scope: Scope,
    ) -> Result<Subscription, BrowserError>
    where
        C: PushChannel + ?Sized,
    {
        let mut shared = self.shared();
        shared.ensure_live()?;

        let weak = Arc::downgrade(&self.inner);
        let subscription =
            Subscription::spawn(channel.subscribe(), rules, scope, move |invalidation| {
                let weak = weak.clone();
                async move {
                    let Some(inner) = weak.upgrade() else {
                        return ControlFlow::Break(());
                    };
                    let browser = Browser { inner };
                    match browser.invalidate(invalidation).await {
                        Err(BrowserError::Unmounted) => ControlFlow::Break(()),
                        _ => ControlFlow::Continue(()),
                    }
                }
            });
        shared.subscriptions.push(subscription.abort_handle());
        Ok(subscription)
    }

    /// Apply an invalidation as if it came from the push channel.
    #[cfg(feature = "bus")]
    pub async fn invalidate(&self, invalidation: Invalidation) -> Result<(), BrowserError> {
        tracing::debug!(
            resource = self.resource(),
            stats = invalidation.stats,
            refetch = invalidation.refetch,
            "invalidation received"
        );
        if invalidation.stats {
            self.invalidate_stats().await?;
        }
        if invalidation.refetch {
            self.refresh().await?;
        }
        Ok(())
    }

    // ==================================================================
    // Read side
    // ==================================================================

    /// Snapshot of everything the screen shows.
    pub fn view(&self) -> BrowserView<E::Row> {
        let shared = self.shared();
        let result = shared.collection.result();
        BrowserView {
            rows: result.rows.clone(),
            pagination: result.pagination,
            stats: shared.stats.get().cloned(),
            stats_dirty: shared.stats.is_dirty(),
            is_loading: shared.sequencer.is_loading(),
            stats_loading: shared.stats.is_loading(),
            mutations_in_flight: shared.mutations.len(),
            error: shared.error.clone(),
            stats_error: shared.stats_error.clone(),
            query: shared.query.clone(),
        }
    }

    pub fn rows(&self) -> Vec<E::Row> {
        self.shared().collection.result().rows.clone()
    }

    pub fn pagination(&self) -> Pagination {
        self.shared().collection.result().pagination
    }

    pub fn stats(&self) -> Option<AggregateStats> {
        self.shared().stats.get().cloned()
    }

    pub fn query(&self) -> QueryState {
        self.shared().query.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.shared().sequencer.is_loading()
    }

    pub fn error(&self) -> Option<BrowserError> {
        self.shared().error.clone()
    }

    /// Revision counter bumped on every visible state transition.
    pub fn changes(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    pub fn schema(&self) -> &ResourceSchema {
        &self.inner.schema
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.inner.config
    }

    pub fn endpoint(&self) -> &E {
        &self.inner.endpoint
    }
}

fn payload_value<P: serde::Serialize>(payload: &P) -> Result<serde_json::Value, BrowserError> {
    serde_json::to_value(payload)
        .map_err(|e| BrowserError::Api(ApiError::Validation(FieldErrors::global(e.to_string()))))
}
