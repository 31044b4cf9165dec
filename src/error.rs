use thiserror::Error;

pub type OrionResult<T> = std::result::Result<T, OrionError>;

/// Errors raised while talking to an Orion platform or resolving its objects.
#[derive(Debug, Error)]
pub enum OrionError {
    /// Missing platform, credentials, or default in the configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// A supposedly unique key matched more than one node
    #[error("multiple nodes match '{identifier}'")]
    AmbiguousMatch { identifier: String },

    /// Zero or multiple rows where exactly one was required
    #[error("lookup failed: {0}")]
    Lookup(String),

    #[error("invalid standard community '{0}'")]
    InvalidStandardCommunity(String),

    #[error("need one of community or std_community")]
    MissingCommunity,

    #[error("invalid poller name '{0}'")]
    InvalidPoller(String),

    /// The transfer was still in progress when the attempt budget ran out
    #[error("transfer {transfer_id} still in progress after {attempts} polls")]
    TransferTimeout { transfer_id: String, attempts: u32 },

    /// The platform answered without a `results` member
    #[error("no results from Orion: {0}")]
    MissingResults(String),

    #[error("unexpected row shape: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{url} returned {status}: {body}")]
    Http {
        url: String,
        status: u16,
        body: String,
    },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}
