//! Error types for Sentiscope

/// Result type alias using Sentiscope's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for Sentiscope operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Request rejected before the pipeline runs
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Referenced query or record does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Platform collection errors
    #[error("collector error: {0}")]
    Collector(String),

    /// A platform API answered with an error or could not be reached
    #[error("upstream error ({}): {message}", .status.map_or_else(|| "network".to_string(), |s| s.to_string()))]
    Upstream { status: Option<u16>, message: String },

    /// Storage backend errors
    #[error("store error: {0}")]
    Store(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Timeout errors
    #[error("operation timed out")]
    Timeout,

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new collector error
    pub fn collector(msg: impl Into<String>) -> Self {
        Self::Collector(msg.into())
    }

    /// Create a new upstream error; `status` is `None` for network failures
    pub fn upstream(status: Option<u16>, msg: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: msg.into(),
        }
    }

    /// Whether retrying the same call may succeed
    ///
    /// Network failures, rate limiting (429) and server errors (5xx) are
    /// transient. Other client errors are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Upstream { status: None, .. } => true,
            Self::Upstream {
                status: Some(code), ..
            } => *code == 429 || *code >= 500,
            Self::Timeout | Self::Io(_) => true,
            _ => false,
        }
    }

    /// Create a new store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(Error::upstream(None, "connection reset").is_transient());
        assert!(Error::upstream(Some(429), "rate limited").is_transient());
        assert!(Error::upstream(Some(503), "unavailable").is_transient());
        assert!(!Error::upstream(Some(403), "quota exceeded").is_transient());
        assert!(!Error::invalid_input("empty keyword").is_transient());
        assert!(Error::Timeout.is_transient());
    }

    #[test]
    fn test_upstream_display() {
        assert_eq!(
            Error::upstream(Some(404), "video not found").to_string(),
            "upstream error (404): video not found"
        );
        assert_eq!(
            Error::upstream(None, "dns").to_string(),
            "upstream error (network): dns"
        );
    }
}
