//! Error types for the starter pipeline.

/// Source error type for fetcher implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Coarse classification of a [`StarterError`], used by callers to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingName,
    Parse,
    Transport,
    Copy,
    Serialization,
    Finalization,
}

/// Errors produced while resolving, fetching, or assembling a starter archive.
#[derive(Debug, thiserror::Error)]
pub enum StarterError {
    #[error(
        "please provide the name of the zip as either the path you're posting to \
         or a 'uuid' value in the json document"
    )]
    MissingName,

    #[error("error fetching url '{url}': {source}")]
    Parse {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("error fetching url '{url}': {source}")]
    Transport {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("error fetching url '{url}': {source}")]
    Copy {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode json document: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("failed to write archive: {0}")]
    Finalization(#[from] zip::result::ZipError),
}

impl StarterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StarterError::MissingName => ErrorKind::MissingName,
            StarterError::Parse { .. } => ErrorKind::Parse,
            StarterError::Transport { .. } => ErrorKind::Transport,
            StarterError::Copy { .. } => ErrorKind::Copy,
            StarterError::Serialization(_) => ErrorKind::Serialization,
            StarterError::Finalization(_) => ErrorKind::Finalization,
        }
    }

    /// True when the request itself was at fault (bad input or an unreachable resource).
    ///
    /// Only finalization failures are attributed to the server.
    pub fn is_client_error(&self) -> bool {
        self.kind() != ErrorKind::Finalization
    }

    /// True when a remote document was retrieved before the failure occurred.
    pub fn fetch_attempted(&self) -> bool {
        self.kind() == ErrorKind::Copy
    }
}
