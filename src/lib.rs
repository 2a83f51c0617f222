#![doc = include_str!("../README.md")]

// Core modules
pub mod decode;
pub mod errors;
pub mod executor;
pub mod loader;
mod log_utils;
mod pending;
pub mod result;
pub mod session;
pub mod settings;
pub mod transport;
pub mod types;

// Re-export commonly used items at crate root for convenience
pub use loader::{PendingLoad, ResourceLoader};
pub use settings::LoaderSettings;

pub mod prelude {
    //! The prelude exports all the most common types and functions for using resource-loader.

    // The loader and its async handle
    pub use crate::loader::{PendingLoad, ResourceLoader};

    // The result enum, needed for matching
    pub use crate::result::LoadResult;

    // Decoders
    pub use crate::decode::{Decode, Json, JsonArray, JsonList, JsonObject};

    // Callback execution contexts
    pub use crate::executor::{CallbackExecutor, InlineExecutor, SerialExecutor};

    // Transport contract
    pub use crate::transport::{FetchEvents, ResponseDisposition, Transport};

    // Configuration
    pub use crate::settings::{CachePolicy, CacheSettings, LoaderSettings};

    // Identifiers and descriptors
    pub use crate::types::{FetchHandle, RequestId, ResourceRequest};

    // Error types
    pub use crate::errors::{FetchError, SettingsError};
}
