//! # Loader Settings
//!
//! Configuration values handed to the transport when a loader is built. The
//! loader core does not interpret them; they exist so that one explicit value
//! carries cache sizing, cache policy, timeouts and connection limits to
//! whichever transport is plugged in.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{SettingsError, SettingsResult};

/// Default memory cache capacity: 20 MiB.
pub const DEFAULT_MEMORY_CAPACITY: usize = 20 * 1024 * 1024;
/// Default disk cache capacity: 100 MiB.
pub const DEFAULT_DISK_CAPACITY: usize = 100 * 1024 * 1024;
/// Default request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Default limit on simultaneous transport fetches.
pub const DEFAULT_MAX_DOWNLOADS: usize = 4;

/// How the transport should consult its response cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
    /// Cache according to the response headers (age, expiration).
    #[default]
    FollowProtocol,
    /// Always load from the source, never from the local cache.
    ReloadIgnoringCache,
    /// Use cached data regardless of age, loading only on a miss.
    ReturnCacheElseLoad,
    /// Use cached data only, never load from the source.
    ReturnCacheOnly,
}

/// Response cache configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub memory_capacity_bytes: usize,
    pub disk_capacity_bytes: usize,
    pub request_cache_policy: CachePolicy,
    /// Name of the subdirectory of the platform cache directory used on disk.
    pub disk_path: String,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            memory_capacity_bytes: DEFAULT_MEMORY_CAPACITY,
            disk_capacity_bytes: DEFAULT_DISK_CAPACITY,
            request_cache_policy: CachePolicy::default(),
            disk_path: "resource-loader".to_string(),
        }
    }
}

/// Settings passed to the transport at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderSettings {
    pub cache: CacheSettings,
    pub request_timeout: Duration,
    pub max_simultaneous_downloads: usize,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            cache: CacheSettings::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_simultaneous_downloads: DEFAULT_MAX_DOWNLOADS,
        }
    }
}

impl LoaderSettings {
    /// Create settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the maximum number of simultaneous transport fetches
    pub fn with_max_simultaneous_downloads(mut self, max: usize) -> Self {
        self.max_simultaneous_downloads = max;
        self
    }

    /// Set the cache policy
    pub fn with_cache_policy(mut self, policy: CachePolicy) -> Self {
        self.cache.request_cache_policy = policy;
        self
    }

    /// Set memory and disk cache capacities
    pub fn with_cache_capacity(mut self, memory_bytes: usize, disk_bytes: usize) -> Self {
        self.cache.memory_capacity_bytes = memory_bytes;
        self.cache.disk_capacity_bytes = disk_bytes;
        self
    }

    /// Set the on-disk cache directory name
    pub fn with_disk_path(mut self, path: impl Into<String>) -> Self {
        self.cache.disk_path = path.into();
        self
    }

    /// Checks that the settings are usable by a transport.
    pub fn validate(&self) -> SettingsResult<()> {
        if self.request_timeout.is_zero() {
            return Err(SettingsError::ZeroTimeout);
        }
        if self.max_simultaneous_downloads == 0 {
            return Err(SettingsError::ZeroDownloads);
        }
        if self.cache.disk_path.trim().is_empty() {
            return Err(SettingsError::EmptyDiskPath);
        }
        if self.cache.memory_capacity_bytes > self.cache.disk_capacity_bytes {
            return Err(SettingsError::CacheCapacity {
                memory: self.cache.memory_capacity_bytes,
                disk: self.cache.disk_capacity_bytes,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = LoaderSettings::new();
        assert_eq!(settings.request_timeout, Duration::from_secs(10));
        assert_eq!(settings.max_simultaneous_downloads, 4);
        assert_eq!(settings.cache.request_cache_policy, CachePolicy::FollowProtocol);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validation_errors() {
        assert_eq!(
            LoaderSettings::new()
                .with_request_timeout(Duration::ZERO)
                .validate(),
            Err(SettingsError::ZeroTimeout)
        );
        assert_eq!(
            LoaderSettings::new()
                .with_max_simultaneous_downloads(0)
                .validate(),
            Err(SettingsError::ZeroDownloads)
        );
        assert_eq!(
            LoaderSettings::new().with_disk_path("  ").validate(),
            Err(SettingsError::EmptyDiskPath)
        );
        assert_eq!(
            LoaderSettings::new().with_cache_capacity(10, 5).validate(),
            Err(SettingsError::CacheCapacity { memory: 10, disk: 5 })
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: LoaderSettings = serde_json::from_str(
            r#"{"max_simultaneous_downloads": 8, "cache": {"request_cache_policy": "return_cache_else_load"}}"#,
        )
        .unwrap();
        assert_eq!(settings.max_simultaneous_downloads, 8);
        assert_eq!(
            settings.cache.request_cache_policy,
            CachePolicy::ReturnCacheElseLoad
        );
        assert_eq!(settings.cache.disk_capacity_bytes, DEFAULT_DISK_CAPACITY);
        assert_eq!(settings.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }
}
