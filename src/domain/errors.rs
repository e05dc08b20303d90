use thiserror::Error;

/// Every way a single request can fail. Input errors are raised before any
/// network I/O happens.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Invalid JSON for --{flag}: {source}")]
    InvalidJson {
        flag: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },
    #[error("Invalid credentials for --user: expected 'user:password'")]
    InvalidAuth,
    #[error("Failed to read upload file '{path}': {source}")]
    ReadUpload {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Method does not exist: '{0}'")]
    UnsupportedMethod(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Failed to write download file '{path}': {source}")]
    Download {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type ProbeResult<T> = Result<T, ProbeError>;
