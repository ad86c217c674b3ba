// Concurrent decode of a set of files with a single joining coordinator

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch, Semaphore};
use tracing::{debug, error};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
}

struct BatchInner<T> {
    pending: usize,
    results: Vec<T>,
}

/// Shared state of a loader: outstanding task count, joined output and the
/// completion signal. Only the coordinator task writes `results`.
pub(crate) struct Batch<T> {
    inner: Mutex<BatchInner<T>>,
    state: watch::Sender<LoadState>,
}

impl<T: Send + 'static> Batch<T> {
    pub(crate) fn new() -> Arc<Self> {
        let (state, _) = watch::channel(LoadState::Idle);
        Arc::new(Self {
            inner: Mutex::new(BatchInner {
                pending: 0,
                results: Vec::new(),
            }),
            state,
        })
    }

    fn lock(&self) -> MutexGuard<'_, BatchInner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn state(&self) -> LoadState {
        *self.state.borrow()
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.lock().pending > 0
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.state.subscribe()
    }

    pub(crate) async fn wait_ready(&self) {
        let mut rx = self.subscribe();
        let _ = rx.wait_for(|state| *state == LoadState::Ready).await;
    }

    pub(crate) fn take(&self) -> Vec<T> {
        std::mem::take(&mut self.lock().results)
    }

    /// Drops stored results and goes back to `Idle`. Ignored while a batch is
    /// pending.
    pub(crate) fn reset(&self) {
        let mut inner = self.lock();
        if inner.pending > 0 {
            return;
        }
        inner.results.clear();
        self.state
            .send_if_modified(|state| std::mem::replace(state, LoadState::Idle) != LoadState::Idle);
    }

    /// Runs every job on the blocking pool, at most `limit` at a time. Once
    /// all have reported back, `order` sorts the `(job index, output)` pairs
    /// and the outputs become the new results. Does nothing while a previous
    /// batch is still pending.
    pub(crate) fn start<J, F>(self: &Arc<Self>, runtime: &Handle, limit: usize, jobs: Vec<J>, order: F)
    where
        J: FnOnce() -> T + Send + 'static,
        F: FnOnce(&mut Vec<(usize, T)>) + Send + 'static,
    {
        let total = jobs.len();
        {
            let mut inner = self.lock();
            if inner.pending > 0 {
                return;
            }
            inner.results.clear();
            if total == 0 {
                self.state.send_replace(LoadState::Ready);
                return;
            }
            inner.pending = total;
            self.state.send_replace(LoadState::Loading);
        }

        let (tx, mut rx) = mpsc::unbounded_channel();
        let permits = Arc::new(Semaphore::new(limit.max(1)));

        for (index, job) in jobs.into_iter().enumerate() {
            let tx = tx.clone();
            let permits = Arc::clone(&permits);
            runtime.spawn(async move {
                let _permit = permits.acquire_owned().await;
                let output = tokio::task::spawn_blocking(job).await;
                let _ = tx.send((index, output));
            });
        }
        drop(tx);

        let batch = Arc::clone(self);
        runtime.spawn(async move {
            let mut done = Vec::with_capacity(total);
            let mut received = 0;
            while let Some((index, output)) = rx.recv().await {
                received += 1;
                match output {
                    Ok(value) => done.push((index, value)),
                    Err(e) => error!("Decode task {} did not finish: {}", index, e),
                }
                if received < total {
                    batch.lock().pending = total - received;
                }
            }

            order(&mut done);
            debug!("Batch of {} files joined, {} decoded", total, done.len());

            let mut inner = batch.lock();
            inner.results = done.into_iter().map(|(_, value)| value).collect();
            inner.pending = 0;
            batch.state.send_replace(LoadState::Ready);
        });
    }
}
