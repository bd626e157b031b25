use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, HarvestError>;

#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("could not read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not serialize snapshot: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("could not write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown source {0:?}")]
    UnknownSource(String),

    #[error("invalid settings: {0}")]
    Settings(#[from] config::ConfigError),
}

impl HarvestError {
    /// Short, stable label for the failure, recorded in snapshots.
    pub fn kind(&self) -> &'static str {
        match self {
            HarvestError::Client(_) => "client",
            HarvestError::Transport { source, .. } if source.is_timeout() => "timeout",
            HarvestError::Transport { .. } => "transport",
            HarvestError::Status { .. } => "http-status",
            HarvestError::Read { .. } => "read",
            HarvestError::Parse { .. } => "parse",
            HarvestError::Serialize(_) => "serialize",
            HarvestError::Write { .. } => "write",
            HarvestError::UnknownSource(_) => "unknown-source",
            HarvestError::Settings(_) => "settings",
        }
    }
}
