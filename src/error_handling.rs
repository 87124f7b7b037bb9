//! Standardized error handling for the honeypot insights pipeline
//! Provides the error taxonomy, result alias and context helpers

use reqwest::StatusCode;

/// Errors that abort a pipeline run
///
/// Anything finer grained (a file that cannot be read, a line that does not
/// parse) is absorbed by the pipeline and never surfaces here.
#[derive(Debug, thiserror::Error)]
pub enum HoneypotError {
    #[error("Listing of '{folder}' failed with status {status}")]
    Listing {
        folder: String,
        status: StatusCode,
    },

    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    #[error("Decode error: {message}")]
    Decode {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
    },

    #[error("No grammar registered for honeypot type '{honeypot}'")]
    UnsupportedHoneypot {
        honeypot: String,
    },

    #[error("Invalid date window: {message}")]
    InvalidWindow {
        message: String,
    },
}

impl HoneypotError {
    /// Create a listing error carrying the remote status
    pub fn listing<S: Into<String>>(folder: S, status: StatusCode) -> Self {
        Self::Listing {
            folder: folder.into(),
            status,
        }
    }

    /// Create a network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// Create a network error with source
    pub fn network_with_source<S: Into<String>>(message: S, source: anyhow::Error) -> Self {
        Self::Network {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a decode error with source
    pub fn decode_with_source<S: Into<String>>(message: S, source: anyhow::Error) -> Self {
        Self::Decode {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn unsupported_honeypot<S: Into<String>>(honeypot: S) -> Self {
        Self::UnsupportedHoneypot {
            honeypot: honeypot.into(),
        }
    }

    pub fn invalid_window<S: Into<String>>(message: S) -> Self {
        Self::InvalidWindow {
            message: message.into(),
        }
    }

    /// Stable code for callers that branch on the failure kind
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Listing { .. } => "LISTING_ERROR",
            Self::Network { .. } => "NETWORK_ERROR",
            Self::Decode { .. } => "DECODE_ERROR",
            Self::Configuration { .. } => "CONFIG_ERROR",
            Self::UnsupportedHoneypot { .. } => "UNSUPPORTED_HONEYPOT",
            Self::InvalidWindow { .. } => "INVALID_WINDOW",
        }
    }

    /// HTTP status of the remote store, when the failure came with one
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Listing { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for pipeline operations
pub type HoneypotResult<T> = std::result::Result<T, HoneypotError>;

/// Trait for adding context to foreign errors
pub trait ErrorContext<T> {
    fn with_network_context<F>(self, f: F) -> HoneypotResult<T>
    where
        F: FnOnce() -> String;

    fn with_decode_context<F>(self, f: F) -> HoneypotResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn with_network_context<F>(self, f: F) -> HoneypotResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| HoneypotError::network_with_source(f(), e.into()))
    }

    fn with_decode_context<F>(self, f: F) -> HoneypotResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| HoneypotError::decode_with_source(f(), e.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_error_keeps_status() {
        let err = HoneypotError::listing("fortipot", StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), "LISTING_ERROR");
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert!(err.to_string().contains("404"));
        assert!(err.to_string().contains("fortipot"));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(HoneypotError::network("down").error_code(), "NETWORK_ERROR");
        assert_eq!(HoneypotError::configuration("bad").error_code(), "CONFIG_ERROR");
        assert_eq!(
            HoneypotError::unsupported_honeypot("telnetpot").error_code(),
            "UNSUPPORTED_HONEYPOT"
        );
        assert_eq!(HoneypotError::invalid_window("x").error_code(), "INVALID_WINDOW");
        assert!(HoneypotError::network("down").status().is_none());
    }

    #[test]
    fn test_decode_context_wraps_source() {
        let parsed: Result<u32, _> = "abc".parse::<u32>();
        let err = parsed
            .with_decode_context(|| "Failed to decode counter".to_string())
            .unwrap_err();
        assert_eq!(err.error_code(), "DECODE_ERROR");
        assert!(std::error::Error::source(&err).is_some());
    }
}
