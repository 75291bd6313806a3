//! Invalidation Bus - push events from the server side-channel.
//!
//! Browsers subscribe to a [`PushChannel`] and map each named event to an
//! [`Invalidation`] through a static [`InvalidationRules`] table.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │               Server side-channel (websocket, SSE)          │
//! │  order:created / review:created / dashboard:refresh / ...   │
//! └─────────────────────────────────────────────────────────────┘
//!                            │  Publisher::publish
//!                            ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 PushChannel (fan-out)                       │
//! │  InMemoryChannel (included), bridge adapters (external)     │
//! └─────────────────────────────────────────────────────────────┘
//!                            │  subscribe()
//!                            ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Subscription (one per mounted screen)                      │
//! │  rules.resolve(event, scope) -> Invalidation                │
//! │  -> stats dirty / page re-synchronized                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let sub = browser.subscribe(
//!     &channel,
//!     InvalidationRules::admin_defaults(),
//!     Scope::resource("product_slug", "serum-b"),
//! )?;
//! // ... screen is live ...
//! browser.unmount(); // aborts the subscription as well
//! ```

mod channel;
mod invalidation;
mod publisher;
mod subscription;

pub use channel::{InMemoryChannel, PushChannel};
pub use invalidation::{Invalidation, InvalidationRules, Scope};
pub use publisher::{PublishError, Publisher, PushEvent};
pub use subscription::Subscription;
