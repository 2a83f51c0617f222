//! Common types and aliases used throughout resource-loader

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of one logical request, unique for the lifetime of its loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque handle a transport assigns to one underlying fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FetchHandle(pub u64);

impl fmt::Display for FetchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fetch-{}", self.0)
    }
}

/// Descriptor of a resource request.
///
/// Every attached request keeps its own copy so it can be reissued as an
/// independent fetch after a redirect split.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRequest {
    url: String,
}

impl ResourceRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl From<&str> for ResourceRequest {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}

impl From<String> for ResourceRequest {
    fn from(url: String) -> Self {
        Self::new(url)
    }
}

/// Common trait bounds for decoded output types
pub trait LoadOutputBounds: Send + 'static {}
impl<T> LoadOutputBounds for T where T: Send + 'static {}

/// Common trait bounds for user payloads carried alongside a request
pub trait UserDataBounds: Send + 'static {}
impl<T> UserDataBounds for T where T: Send + 'static {}
