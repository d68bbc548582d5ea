//! SDK error types.
//!
//! [`SdkError`] is the single error type returned by every fallible
//! network operation in the SDK. It wraps transport, decoding and
//! backend-reported failures into a unified enum.

/// Error type for all SDK operations.
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    /// Invalid or missing configuration (e.g. bad URL).
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with something that is not the expected JSON.
    #[error("backend returned {status}: {message}")]
    Backend {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        message: String,
    },

    /// JSON serialization / deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The price stream could not be opened or was cut.
    #[error("stream error: {0}")]
    Stream(String),
}

/// Longest response body excerpt kept in [`SdkError::Backend`].
pub(crate) const MAX_BODY_EXCERPT: usize = 200;

/// Trim a response body so error messages stay readable.
pub(crate) fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX_BODY_EXCERPT) {
        Some((cut, _)) => format!("{}…", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_display() {
        let err = SdkError::Backend {
            status: 502,
            message: "bad gateway".into(),
        };
        assert_eq!(err.to_string(), "backend returned 502: bad gateway");
    }

    #[test]
    fn excerpt_truncates_long_bodies() {
        let long = "x".repeat(MAX_BODY_EXCERPT + 50);
        let cut = excerpt(&long);
        assert_eq!(cut.chars().count(), MAX_BODY_EXCERPT + 1);
        assert!(cut.ends_with('…'));
        assert_eq!(excerpt("  short  "), "short");
    }
}
