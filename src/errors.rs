//! Error types for resource loading.

/// Failure of a fetch, shared by every request attached to it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Network-level failure reported by the transport.
    #[error("transport error: {0}")]
    Transport(String),
    /// The server answered with a 4xx or 5xx status and the fetch was canceled.
    #[error("HTTP status {0}")]
    HttpStatus(u16),
    /// The fetch or request was canceled before it completed.
    #[error("request cancelled")]
    Cancelled,
}

impl FetchError {
    /// Convenience constructor for transport failures.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Returns true for cancellation errors.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// The HTTP status that caused the failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus(status) => Some(*status),
            _ => None,
        }
    }
}

/// Invalid loader settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
    #[error("maximum simultaneous downloads must be at least 1")]
    ZeroDownloads,
    #[error("disk cache path must not be empty")]
    EmptyDiskPath,
    #[error("memory cache capacity ({memory} bytes) exceeds disk capacity ({disk} bytes)")]
    CacheCapacity { memory: usize, disk: usize },
}

pub type SettingsResult<T> = Result<T, SettingsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_accessor() {
        assert_eq!(FetchError::HttpStatus(404).status(), Some(404));
        assert_eq!(FetchError::transport("reset").status(), None);
        assert!(FetchError::Cancelled.is_cancelled());
    }

    #[test]
    fn test_display() {
        assert_eq!(FetchError::HttpStatus(500).to_string(), "HTTP status 500");
        assert_eq!(
            FetchError::transport("connection reset").to_string(),
            "transport error: connection reset"
        );
    }
}
