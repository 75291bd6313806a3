//! Debounced input buffer.
//!
//! Coalesces rapid updates of a value (keystrokes in a search box) into one
//! commit that fires after a quiet interval. Intermediate values are dropped;
//! the last value observed before silence is always committed, including
//! when the debouncer is dropped mid-window.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Handle feeding values into a spawned debounce task.
///
/// ## Example
///
/// ```
/// use std::time::Duration;
/// use resource_browser::Debouncer;
///
/// # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
/// let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
/// let search = Debouncer::spawn(Duration::from_millis(10), move |text: String| {
///     let tx = tx.clone();
///     async move {
///         let _ = tx.send(text);
///     }
/// });
///
/// search.observe("so".to_string());
/// search.observe("socks".to_string());
/// assert_eq!(rx.recv().await.as_deref(), Some("socks"));
/// # });
/// ```
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawn the debounce task. `commit` runs on the task, one commit at a time.
    ///
    /// Must be called within a tokio runtime with the time driver enabled.
    pub fn spawn<F, Fut>(quiet: Duration, mut commit: F) -> Self
    where
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();

        let task = tokio::spawn(async move {
            let mut pending: Option<T> = None;
            loop {
                match pending.take() {
                    None => match rx.recv().await {
                        Some(value) => pending = Some(value),
                        None => break,
                    },
                    Some(value) => {
                        tokio::select! {
                            next = rx.recv() => match next {
                                Some(newer) => pending = Some(newer),
                                None => {
                                    commit(value).await;
                                    break;
                                }
                            },
                            _ = tokio::time::sleep(quiet) => {
                                tracing::debug!(quiet_ms = quiet.as_millis() as u64, "debounced value committed");
                                commit(value).await;
                            }
                        }
                    }
                }
            }
        });

        Self { tx, task }
    }

    /// Feed a raw value. Restarts the quiet interval.
    pub fn observe(&self, value: T) {
        // The task only exits once every sender is gone
        let _ = self.tx.send(value);
    }

    /// Stop accepting input and wait for the final commit.
    pub async fn flush(self) {
        let Debouncer { tx, task } = self;
        drop(tx);
        let _ = task.await;
    }
}
