use thiserror::Error;

use crate::commands::CommandError;

#[derive(Debug, Error)]
pub enum PollError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("scan response for {host} has no state field")]
    MissingState { host: String },

    #[error("could not read scan state for {host}: {source}")]
    InvalidState {
        host: String,
        source: serde_json::Error,
    },

    #[error("gave up polling {host} after {seconds}s without a terminal scan state")]
    Cancelled { host: String, seconds: u64 },
}
