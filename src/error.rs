//! Error types for content retrieval.
//!
//! Parsing never fails: malformed descriptors fall back to defaults. The only
//! error surfaced by the content layer is a failed fetch.

use thiserror::Error;

/// A failed retrieval of a site resource.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The source answered, but not with success.
    #[error("failed to fetch `{url}`: status {status}")]
    Status { url: String, status: u16 },

    #[error("IO error when reading `{url}`")]
    Io {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("network error when fetching `{url}`: {message}")]
    Network { url: String, message: String },

    #[error("invalid JSON in `{url}`")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Every attempt of a retrying fetch failed.
    #[error("gave up on `{url}` after {attempts} attempts")]
    Exhausted { url: String, attempts: u32 },
}

impl FetchError {
    /// Status code carried by the error, if the source produced one.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// URL the failed request was made for.
    pub fn url(&self) -> &str {
        match self {
            Self::Status { url, .. }
            | Self::Io { url, .. }
            | Self::Network { url, .. }
            | Self::Json { url, .. }
            | Self::Exhausted { url, .. } => url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::Status {
            url: "Config/articles.json".into(),
            status: 404,
        };
        let display = format!("{err}");
        assert!(display.contains("Config/articles.json"));
        assert!(display.contains("404"));
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_fetch_error_url() {
        let err = FetchError::Network {
            url: "https://example.com/a.txt".into(),
            message: "timed out".into(),
        };
        assert_eq!(err.url(), "https://example.com/a.txt");
        assert_eq!(err.status(), None);
    }
}
