//! LoadResult: outcome of a logical resource request
//!
//! Every request that completes is delivered exactly one `LoadResult`, built
//! from the bytes and error of the fetch it was attached to.

use crate::{decode::Decode, errors::FetchError};

/// Outcome of a resource request
#[derive(Debug, Clone, PartialEq)]
pub enum LoadResult<T> {
    /// The fetched bytes decoded into a value
    Success(T),
    /// The body was empty or could not be decoded
    Empty,
    /// The fetch failed
    Error(FetchError),
}

impl<T: Decode> LoadResult<T> {
    /// Builds the result for a completed fetch.
    ///
    /// An error always wins. Without one, a non-empty body that decodes is a
    /// success; an empty or undecodable body is `Empty`.
    pub fn from_completion(data: &[u8], error: Option<FetchError>) -> Self {
        if let Some(error) = error {
            return LoadResult::Error(error);
        }
        if data.is_empty() {
            return LoadResult::Empty;
        }
        match T::try_decode(data) {
            Some(value) => LoadResult::Success(value),
            None => LoadResult::Empty,
        }
    }
}

impl<T> LoadResult<T> {
    /// Returns true if the result contains a decoded value
    pub fn is_success(&self) -> bool {
        matches!(self, LoadResult::Success(_))
    }

    /// Returns true if the body was empty or undecodable
    pub fn is_empty(&self) -> bool {
        matches!(self, LoadResult::Empty)
    }

    /// Returns true if the fetch failed
    pub fn is_error(&self) -> bool {
        matches!(self, LoadResult::Error(_))
    }

    /// Returns the value if successful, None otherwise
    pub fn value(&self) -> Option<&T> {
        match self {
            LoadResult::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the error if failed, None otherwise
    pub fn error(&self) -> Option<&FetchError> {
        match self {
            LoadResult::Error(error) => Some(error),
            _ => None,
        }
    }

    /// Consumes the result, returning the value if successful
    pub fn into_value(self) -> Option<T> {
        match self {
            LoadResult::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Maps a LoadResult<T> to LoadResult<U> by applying a function to the contained value.
    pub fn map<U, F>(self, op: F) -> LoadResult<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            LoadResult::Success(value) => LoadResult::Success(op(value)),
            LoadResult::Empty => LoadResult::Empty,
            LoadResult::Error(e) => LoadResult::Error(e),
        }
    }

    /// Converts into a `Result`, treating `Empty` as `Ok(None)`.
    pub fn into_result(self) -> Result<Option<T>, FetchError> {
        match self {
            LoadResult::Success(value) => Ok(Some(value)),
            LoadResult::Empty => Ok(None),
            LoadResult::Error(e) => Err(e),
        }
    }
}
