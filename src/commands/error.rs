use thiserror::Error;

use crate::api::ApiError;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("no recognized command in arguments, run --help for usage")]
    UnknownCommand,

    #[error("the mandatory argument {key} is not given")]
    MissingArgument { key: &'static str },

    #[error("rescan attempted within the cooldown window, wait a few minutes or drop \"rescan\"")]
    RescanTooSoon,

    #[error("the service refused the request: {0}")]
    Refused(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}
