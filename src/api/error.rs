use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Request never produced a response (connection, timeout, TLS)
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Backend answered with a non-success HTTP status
    #[error("{url} returned {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    /// Response body did not match the expected envelope
    #[error("Could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Backend reported `success: false`
    #[error("{0}")]
    Rejected(String),
}
