use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormError {
    /// Input was not parseable JSON at all
    #[error("Invalid JSON file: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Parsed, but not the list of sections an import expects
    #[error("Invalid JSON file")]
    InvalidJsonFile,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Could not access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
