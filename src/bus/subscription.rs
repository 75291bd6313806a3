use std::future::Future;
use std::ops::ControlFlow;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::{AbortHandle, JoinHandle};

use super::{Invalidation, InvalidationRules, PushEvent, Scope};

/// A live subscription of one screen to a push channel.
///
/// Dropping the handle (or calling [`unsubscribe`](Self::unsubscribe))
/// stops the listener task; no handler runs afterwards.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    task: JoinHandle<()>,
}

impl Subscription {
    /// Spawn a listener that resolves each event against `rules` and hands
    /// relevant invalidations to `handler`, one at a time and in order.
    ///
    /// The handler returns `ControlFlow::Break` once its target is gone. A
    /// lagging receiver lost events it can no longer inspect, so it is
    /// treated as a full invalidation.
    pub fn spawn<F, Fut>(
        mut receiver: broadcast::Receiver<PushEvent>,
        rules: InvalidationRules,
        scope: Scope,
        mut handler: F,
    ) -> Self
    where
        F: FnMut(Invalidation) -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send,
    {
        let task = tokio::spawn(async move {
            loop {
                let invalidation = match receiver.recv().await {
                    Ok(event) => match rules.resolve(&event, &scope) {
                        Some(inv) => inv,
                        None => {
                            tracing::debug!(event = %event.name, id = %event.id, "push event ignored");
                            continue;
                        }
                    },
                    Err(RecvError::Lagged(missed)) => {
                        tracing::warn!(missed, "push subscription lagged, invalidating everything");
                        Invalidation::everything()
                    }
                    Err(RecvError::Closed) => break,
                };

                if handler(invalidation).await.is_break() {
                    break;
                }
            }
        });

        Self { task }
    }

    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }

    pub fn unsubscribe(self) {
        // Drop aborts the task
    }

    pub(crate) fn abort_handle(&self) -> AbortHandle {
        self.task.abort_handle()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}
