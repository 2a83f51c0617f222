//! # Transport Contract
//!
//! The loader does not perform network I/O itself. A [`Transport`] starts and
//! cancels fetches, and reports what happens to each fetch through the
//! [`FetchEvents`] sink it receives in [`Transport::start`].
//!
//! ## Contract
//!
//! - `start` returns a handle that is not reused while its fetch may still
//!   report events.
//! - Events for a fetch may arrive on any thread, but must not be reported
//!   synchronously from inside `start` or `cancel`: the session calls both
//!   while holding its own lock.
//! - After `cancel`, the transport still reports completion (typically with
//!   [`FetchError::Cancelled`](crate::errors::FetchError::Cancelled)); the
//!   session ignores it once the fetch is no longer tracked.
//! - When [`FetchEvents::on_response`] answers [`ResponseDisposition::Cancel`],
//!   the transport stops the fetch and reports completion with an error.
//! - [`FetchEvents::on_redirect`] returns the request the transport should
//!   follow.

use std::sync::{Arc, Weak};

use crate::{
    errors::FetchError,
    session::SessionShared,
    types::{FetchHandle, ResourceRequest},
};

/// A transport able to run fetches for the loader.
pub trait Transport: Send + Sync + 'static {
    /// Starts fetching `request`, reporting progress to `events`.
    fn start(&self, request: &ResourceRequest, events: FetchEvents) -> FetchHandle;

    /// Cancels the fetch identified by `handle`.
    fn cancel(&self, handle: FetchHandle);
}

impl<Tr: Transport + ?Sized> Transport for Arc<Tr> {
    fn start(&self, request: &ResourceRequest, events: FetchEvents) -> FetchHandle {
        (**self).start(request, events)
    }

    fn cancel(&self, handle: FetchHandle) {
        (**self).cancel(handle)
    }
}

/// What the transport should do after receiving response headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseDisposition {
    /// Keep receiving the body.
    Allow,
    /// Stop the fetch; it completes with an error.
    Cancel,
}

/// Event sink a transport reports fetch progress into.
///
/// Holds a non-owning reference to the session; events reported after the
/// session is gone are dropped.
#[derive(Clone)]
pub struct FetchEvents {
    session: Weak<SessionShared>,
}

impl FetchEvents {
    pub(crate) fn new(session: Weak<SessionShared>) -> Self {
        Self { session }
    }

    /// A chunk of the response body arrived.
    pub fn on_data(&self, handle: FetchHandle, bytes: &[u8]) {
        if let Some(session) = self.session.upgrade() {
            session.handle_data(handle, bytes);
        }
    }

    /// Response headers arrived with `status`.
    pub fn on_response(&self, handle: FetchHandle, status: u16) -> ResponseDisposition {
        match self.session.upgrade() {
            Some(session) => session.handle_response(handle, status),
            None => ResponseDisposition::Cancel,
        }
    }

    /// The fetch finished, successfully when `error` is `None`.
    pub fn on_complete(&self, handle: FetchHandle, error: Option<FetchError>) {
        if let Some(session) = self.session.upgrade() {
            session.handle_complete(handle, error);
        }
    }

    /// The server redirected the fetch to `new_request`.
    pub fn on_redirect(&self, handle: FetchHandle, new_request: ResourceRequest) -> ResourceRequest {
        match self.session.upgrade() {
            Some(session) => session.handle_redirect(handle, new_request),
            None => new_request,
        }
    }
}

impl std::fmt::Debug for FetchEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchEvents")
            .field("attached", &(self.session.strong_count() > 0))
            .finish()
    }
}
