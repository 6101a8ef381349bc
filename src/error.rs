use thiserror::Error;

use crate::api::ApiError;
use crate::commands::CommandError;
use crate::config::ConfigError;
use crate::poller::PollError;

#[derive(Debug, Error)]
pub enum ObservatoryError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Poll(#[from] PollError),
}
