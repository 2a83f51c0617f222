//! Bookkeeping for one in-flight transport fetch.

use crate::types::{RequestId, ResourceRequest};

/// A logical request attached to a fetch, with the descriptor it was made from.
pub(crate) type AttachedRequest = (RequestId, ResourceRequest);

/// Accumulated bytes and attached requests of one in-flight fetch.
#[derive(Debug)]
pub(crate) struct PendingFetch {
    data: Vec<u8>,
    requests: Vec<AttachedRequest>,
    origin: ResourceRequest,
    current_url: String,
    rejected_status: Option<u16>,
}

impl PendingFetch {
    /// Creates a fetch record seeded with a single request.
    pub fn new(id: RequestId, request: ResourceRequest) -> Self {
        let origin = request.clone();
        Self {
            data: Vec::new(),
            requests: vec![(id, request)],
            current_url: origin.url().to_string(),
            origin,
            rejected_status: None,
        }
    }

    /// Creates a fetch record for requests split off another fetch, to be
    /// started against `origin`.
    ///
    /// Returns `None` when `requests` is empty.
    pub fn from_requests(origin: ResourceRequest, requests: Vec<AttachedRequest>) -> Option<Self> {
        if requests.is_empty() {
            return None;
        }
        let mut fetch = Self {
            data: Vec::new(),
            requests: Vec::with_capacity(requests.len()),
            current_url: origin.url().to_string(),
            origin,
            rejected_status: None,
        };
        fetch.add_all(requests);
        Some(fetch)
    }

    pub fn append(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    pub fn add(&mut self, id: RequestId, request: ResourceRequest) {
        self.requests.push((id, request));
    }

    pub fn add_all(&mut self, requests: impl IntoIterator<Item = AttachedRequest>) {
        self.requests.extend(requests);
    }

    /// Detaches the request with `id`, returning its descriptor.
    pub fn remove(&mut self, id: RequestId) -> Option<ResourceRequest> {
        let index = self.requests.iter().position(|(attached, _)| *attached == id)?;
        Some(self.requests.remove(index).1)
    }

    /// Removes and returns every request except the first.
    pub fn split_tail(&mut self) -> Vec<AttachedRequest> {
        if self.requests.len() <= 1 {
            return Vec::new();
        }
        self.requests.split_off(1)
    }

    pub fn contains(&self, id: RequestId) -> bool {
        self.requests.iter().any(|(attached, _)| *attached == id)
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Descriptor the transport fetch was started with, before any redirect.
    pub fn origin(&self) -> &ResourceRequest {
        &self.origin
    }

    pub fn current_url(&self) -> &str {
        &self.current_url
    }

    pub fn set_current_url(&mut self, url: impl Into<String>) {
        self.current_url = url.into();
    }

    pub fn reject(&mut self, status: u16) {
        self.rejected_status = Some(status);
    }

    pub fn rejected_status(&self) -> Option<u16> {
        self.rejected_status
    }

    /// Consumes the record, yielding the buffered bytes and attached ids.
    pub fn into_parts(self) -> (Vec<u8>, Vec<RequestId>) {
        let ids = self.requests.into_iter().map(|(id, _)| id).collect();
        (self.data, ids)
    }
}
