//! # Resource Loader
//!
//! The public entry point. A [`ResourceLoader<T>`] issues request ids, keeps
//! the callback of every live request, and turns each completed fetch into a
//! [`LoadResult<T>`] delivered on its [`CallbackExecutor`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use resource_loader::prelude::*;
//!
//! let loader = ResourceLoader::<JsonObject>::new(my_transport, SerialExecutor::current());
//!
//! let id = loader.request_resource("https://example.com/data.json", "row 7", |result, row| {
//!     match result {
//!         LoadResult::Success(json) => println!("{row}: {} keys", json.value.len()),
//!         LoadResult::Empty => println!("{row}: nothing to show"),
//!         LoadResult::Error(error) => println!("{row}: {error}"),
//!     }
//! });
//!
//! // The row scrolled away before the data arrived.
//! loader.cancel_request(id);
//! ```
//!
//! ## Guarantees
//!
//! - Each request id receives at most one callback.
//! - Once `cancel_request(id)` returns, the callback for `id` never runs.
//! - Dropping the loader cancels every live request.

use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{Arc, Mutex, MutexGuard, Weak},
    task::{Context, Poll},
};

use futures::{FutureExt, channel::oneshot};

use crate::{
    decode::Decode,
    errors::{FetchError, SettingsResult},
    executor::CallbackExecutor,
    result::LoadResult,
    session::{CompletionSink, LoaderSession},
    settings::LoaderSettings,
    transport::Transport,
    types::{LoadOutputBounds, RequestId, UserDataBounds},
};

/// Delivers a result to the caller, with the user payload already captured.
type Delivery<T> = Box<dyn FnOnce(LoadResult<T>) + Send + 'static>;

/// Live request records keyed by id.
type RecordPool<T> = HashMap<RequestId, Delivery<T>>;

struct Registry<T> {
    records: Mutex<RecordPool<T>>,
    session: LoaderSession,
    executor: Arc<dyn CallbackExecutor>,
}

impl<T> Registry<T> {
    fn lock_records(&self) -> MutexGuard<'_, RecordPool<T>> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn cancel(&self, id: RequestId) -> bool {
        let removed = {
            let mut records = self.lock_records();
            self.session.cancel_request(id);
            records.remove(&id)
        };
        removed.is_some()
    }

    fn cancel_all(&self) -> usize {
        let cancelled = {
            let mut records = self.lock_records();
            let ids: Vec<RequestId> = records.keys().copied().collect();
            for id in &ids {
                self.session.cancel_request(*id);
            }
            std::mem::take(&mut *records)
        };
        cancelled.len()
    }
}

impl<T> CompletionSink for Registry<T>
where
    T: Decode + LoadOutputBounds,
{
    fn request_completed(&self, id: RequestId, data: &[u8], error: Option<FetchError>) {
        let Some(deliver) = self.lock_records().remove(&id) else {
            crate::debug_log!("Request {} already cancelled, dropping its result", id);
            return;
        };
        let result = LoadResult::<T>::from_completion(data, error);
        self.executor.execute(Box::new(move || deliver(result)));
    }
}

/// Loads resources by URL, sharing one fetch between concurrent requests for
/// the same URL and decoding the bytes into `T`.
pub struct ResourceLoader<T> {
    registry: Arc<Registry<T>>,
}

impl<T> ResourceLoader<T>
where
    T: Decode + LoadOutputBounds,
{
    /// Creates a loader running fetches on `transport` and callbacks on `executor`.
    pub fn new(transport: impl Transport, executor: impl CallbackExecutor) -> Self {
        Self::from_parts(Arc::new(transport), Arc::new(executor))
    }

    /// Validates `settings` and builds the transport from them.
    pub fn with_settings<Tr, F>(
        settings: LoaderSettings,
        make_transport: F,
        executor: impl CallbackExecutor,
    ) -> SettingsResult<Self>
    where
        Tr: Transport,
        F: FnOnce(&LoaderSettings) -> Tr,
    {
        settings.validate()?;
        let transport = make_transport(&settings);
        crate::debug_log!(
            "Loader configured: timeout {:?}, {} simultaneous downloads, cache policy {:?}",
            settings.request_timeout,
            settings.max_simultaneous_downloads,
            settings.cache.request_cache_policy
        );
        Ok(Self::new(transport, executor))
    }

    /// Creates a loader from shared transport and executor handles.
    pub fn from_parts(transport: Arc<dyn Transport>, executor: Arc<dyn CallbackExecutor>) -> Self {
        let registry = Arc::new_cyclic(|weak: &Weak<Registry<T>>| {
            let sink: Weak<dyn CompletionSink> = weak.clone();
            Registry {
                records: Mutex::new(HashMap::new()),
                session: LoaderSession::new(transport, sink),
                executor,
            }
        });
        Self { registry }
    }

    /// Starts loading `url`.
    ///
    /// `acceptor` runs once on the loader's executor with the result and
    /// `user_data`, unless the request is cancelled first. The returned id may
    /// be passed to [`cancel_request`](Self::cancel_request) immediately.
    pub fn request_resource<U, F>(&self, url: &str, user_data: U, acceptor: F) -> RequestId
    where
        U: UserDataBounds,
        F: FnOnce(LoadResult<T>, U) + Send + 'static,
    {
        let mut records = self.registry.lock_records();
        let id = self.registry.session.make_request(url);
        records.insert(id, Box::new(move |result| acceptor(result, user_data)));
        id
    }

    /// Loads `url` as a future.
    ///
    /// Dropping the future before it resolves cancels the request. If the
    /// request is cancelled through the loader instead, the future resolves to
    /// [`FetchError::Cancelled`].
    pub fn load(&self, url: &str) -> PendingLoad<T> {
        let (sender, receiver) = oneshot::channel();
        let id = self.request_resource(url, (), move |result, ()| {
            let _ = sender.send(result);
        });
        PendingLoad {
            id,
            receiver,
            registry: Arc::downgrade(&self.registry),
            finished: false,
        }
    }
}

impl<T> ResourceLoader<T> {
    /// Cancels request `id`. Its callback will not run after this returns.
    ///
    /// Returns false if the request had already completed or been cancelled.
    pub fn cancel_request(&self, id: RequestId) -> bool {
        let cancelled = self.registry.cancel(id);
        if cancelled {
            crate::debug_log!("Request {} cancelled", id);
        }
        cancelled
    }

    /// Cancels every live request, returning how many were cancelled.
    pub fn cancel_all(&self) -> usize {
        let cancelled = self.registry.cancel_all();
        crate::debug_log!("Cancelled {} live request(s)", cancelled);
        cancelled
    }

    /// Cancels every live request before the loader goes away.
    pub fn close(&self) {
        self.cancel_all();
    }

    /// Number of requests still waiting for a result.
    pub fn pending_count(&self) -> usize {
        self.registry.lock_records().len()
    }

    /// Number of transport fetches in flight.
    pub fn in_flight(&self) -> usize {
        self.registry.session.in_flight()
    }
}

impl<T> Drop for ResourceLoader<T> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Future returned by [`ResourceLoader::load`].
#[must_use = "dropping a PendingLoad cancels its request"]
pub struct PendingLoad<T> {
    id: RequestId,
    receiver: oneshot::Receiver<LoadResult<T>>,
    registry: Weak<Registry<T>>,
    finished: bool,
}

impl<T> PendingLoad<T> {
    /// Id of the underlying request.
    pub fn id(&self) -> RequestId {
        self.id
    }
}

impl<T> Future for PendingLoad<T> {
    type Output = LoadResult<T>;

    /// Polling again after the result was returned yields `Pending` forever.
    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.finished {
            return Poll::Pending;
        }
        let result = match self.receiver.poll_unpin(cx) {
            Poll::Pending => return Poll::Pending,
            Poll::Ready(Ok(result)) => result,
            Poll::Ready(Err(oneshot::Canceled)) => LoadResult::Error(FetchError::Cancelled),
        };
        self.finished = true;
        Poll::Ready(result)
    }
}

impl<T> Drop for PendingLoad<T> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Some(registry) = self.registry.upgrade() {
            registry.cancel(self.id);
        }
    }
}
