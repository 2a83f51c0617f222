//! # Coalescing Session
//!
//! The session tracks every in-flight transport fetch and the logical requests
//! attached to it. A request for a URL that is already being fetched joins
//! that fetch instead of starting a new one; transport events are then fanned
//! out to every attached request.
//!
//! All state lives behind a single mutex. Transport `start`/`cancel` calls are
//! made while holding it, so join-or-create is linearized with cancellation.
//! Completions are reported to the [`CompletionSink`] only after the mutex is
//! released, so the sink may take its own lock without ordering concerns.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex, MutexGuard, Weak,
        atomic::{AtomicU64, Ordering},
    },
};

use crate::{
    errors::FetchError,
    pending::PendingFetch,
    transport::{FetchEvents, ResponseDisposition, Transport},
    types::{FetchHandle, RequestId, ResourceRequest},
};

/// Receiver of per-request completion events.
pub trait CompletionSink: Send + Sync {
    /// Request `id` finished with the bytes and error of the fetch it was attached to.
    fn request_completed(&self, id: RequestId, data: &[u8], error: Option<FetchError>);
}

/// In-flight fetches keyed by transport handle.
type FetchPool = HashMap<FetchHandle, PendingFetch>;

pub(crate) struct SessionShared {
    pool: Mutex<FetchPool>,
    next_id: AtomicU64,
    transport: Arc<dyn Transport>,
    events: FetchEvents,
    sink: Weak<dyn CompletionSink>,
}

/// Deduplicates fetches across logical requests.
///
/// The session holds only a weak reference to its [`CompletionSink`]: the
/// owner of the session is expected to be the sink and to outlive it.
pub struct LoaderSession {
    shared: Arc<SessionShared>,
}

impl LoaderSession {
    /// Creates a session running fetches on `transport` and reporting to `sink`.
    pub fn new(transport: Arc<dyn Transport>, sink: Weak<dyn CompletionSink>) -> Self {
        let shared = Arc::new_cyclic(|weak| SessionShared {
            pool: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
            transport,
            events: FetchEvents::new(weak.clone()),
            sink,
        });
        Self { shared }
    }

    /// Requests `url`, joining an in-flight fetch for it when there is one.
    pub fn make_request(&self, url: &str) -> RequestId {
        let request = ResourceRequest::new(url);
        let mut pool = self.shared.lock_pool();
        let id = self.shared.next_request_id();

        if let Some((handle, fetch)) = pool
            .iter_mut()
            .find(|(_, fetch)| fetch.current_url() == url)
        {
            fetch.add(id, request);
            crate::log_fetch_join!(
                "Request {} joined {} for {} ({} attached)",
                id,
                handle,
                url,
                fetch.len()
            );
            return id;
        }

        let handle = self.shared.transport.start(&request, self.shared.events.clone());
        crate::log_fetch_start!("Request {} started {} for {}", id, handle, url);
        pool.insert(handle, PendingFetch::new(id, request));
        id
    }

    /// Detaches request `id` from its fetch, canceling the fetch if nothing
    /// else is attached to it.
    ///
    /// Returns false if `id` was not attached to any fetch.
    pub fn cancel_request(&self, id: RequestId) -> bool {
        let mut pool = self.shared.lock_pool();
        let Some((&handle, fetch)) = pool.iter_mut().find(|(_, fetch)| fetch.contains(id)) else {
            return false;
        };

        fetch.remove(id);
        if fetch.is_empty() {
            pool.remove(&handle);
            self.shared.transport.cancel(handle);
            crate::log_fetch_cancel!("Request {} was the last on {}, fetch canceled", id, handle);
        } else {
            crate::log_fetch_cancel!(
                "Request {} detached from {} ({} still attached)",
                id,
                handle,
                fetch.len()
            );
        }
        true
    }

    /// Number of fetches currently in flight.
    pub fn in_flight(&self) -> usize {
        self.shared.lock_pool().len()
    }

    /// Number of requests attached to the in-flight fetch for `url`.
    pub fn attached_count(&self, url: &str) -> usize {
        self.shared
            .lock_pool()
            .values()
            .filter(|fetch| fetch.current_url() == url)
            .map(PendingFetch::len)
            .sum()
    }

    /// Handle of the fetch `id` is attached to.
    pub fn fetch_for(&self, id: RequestId) -> Option<FetchHandle> {
        self.shared
            .lock_pool()
            .iter()
            .find(|(_, fetch)| fetch.contains(id))
            .map(|(handle, _)| *handle)
    }
}

impl SessionShared {
    fn lock_pool(&self) -> MutexGuard<'_, FetchPool> {
        self.pool.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn next_request_id(&self) -> RequestId {
        RequestId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub(crate) fn handle_data(&self, handle: FetchHandle, bytes: &[u8]) {
        if let Some(fetch) = self.lock_pool().get_mut(&handle) {
            fetch.append(bytes);
        }
    }

    pub(crate) fn handle_response(&self, handle: FetchHandle, status: u16) -> ResponseDisposition {
        if !(400..=599).contains(&status) {
            return ResponseDisposition::Allow;
        }
        if let Some(fetch) = self.lock_pool().get_mut(&handle) {
            fetch.reject(status);
        }
        crate::log_http_reject!("{} answered with status {}, canceling", handle, status);
        ResponseDisposition::Cancel
    }

    pub(crate) fn handle_complete(&self, handle: FetchHandle, error: Option<FetchError>) {
        let Some(fetch) = self.lock_pool().remove(&handle) else {
            crate::debug_log!("Ignoring completion of untracked {}", handle);
            return;
        };

        let error = match fetch.rejected_status() {
            Some(status) => Some(FetchError::HttpStatus(status)),
            None => error,
        };
        let (data, ids) = fetch.into_parts();
        crate::log_fetch_complete!(
            "{} finished with {} bytes for {} request(s) (error: {:?})",
            handle,
            data.len(),
            ids.len(),
            error
        );

        let Some(sink) = self.sink.upgrade() else {
            return;
        };
        for id in ids {
            sink.request_completed(id, &data, error.clone());
        }
    }

    pub(crate) fn handle_redirect(
        &self,
        handle: FetchHandle,
        new_request: ResourceRequest,
    ) -> ResourceRequest {
        let mut pool = self.lock_pool();
        let Some(fetch) = pool.get_mut(&handle) else {
            return new_request;
        };

        fetch.set_current_url(new_request.url());
        let tail = fetch.split_tail();
        let original = fetch.origin().clone();

        if let Some(reissued) = PendingFetch::from_requests(original.clone(), tail) {
            let split_handle = self.transport.start(&original, self.events.clone());
            crate::log_fetch_split!(
                "{} redirected to {}; {} request(s) reissued on {} for {}",
                handle,
                new_request.url(),
                reissued.len(),
                split_handle,
                original.url()
            );
            pool.insert(split_handle, reissued);
        }
        new_request
    }
}
