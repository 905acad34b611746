use thiserror::Error;

/// Errors returned by the place directory client.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Network or TLS failure from the underlying HTTP client. The request
    /// URL is stripped so the API key never reaches the message.
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// The directory answered with its `{"code": .., "message": ..}` error envelope.
    #[error("directory API error {code}: {message}")]
    ApiError { code: i64, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The configured base URL could not be parsed.
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl DirectoryError {
    /// Whether another attempt at the same request could succeed.
    ///
    /// Timeouts, refused connections, rate limiting and 5xx answers are
    /// transient. An error envelope with a 4xx code means the key or query is
    /// wrong and repeating it only burns quota.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.status().is_some_and(|s| s.is_server_error())
            }
            Self::ApiError { code, .. } => *code == 429 || (500..600).contains(code),
            Self::Deserialize { .. } | Self::InvalidBaseUrl { .. } => false,
        }
    }
}

impl From<reqwest::Error> for DirectoryError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.without_url())
    }
}
