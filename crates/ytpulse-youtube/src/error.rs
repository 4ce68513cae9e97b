use thiserror::Error;

/// Errors returned by the YouTube Data API client.
#[derive(Debug, Error)]
pub enum YoutubeError {
    /// Network, TLS or timeout failure from the underlying HTTP client.
    ///
    /// The request URL is stripped before wrapping so the API key never ends
    /// up in an error message.
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("YouTube API request failed (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A field the pipeline depends on was absent from an otherwise valid payload.
    #[error("malformed response for {context}: missing {field}")]
    MissingField { context: String, field: &'static str },

    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),
}

impl From<reqwest::Error> for YoutubeError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.without_url())
    }
}
