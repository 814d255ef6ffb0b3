use crate::config::error::ConfigError;
use crate::fetch::error::FetchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AirKoreaError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Background polling needs a running tokio runtime")]
    RuntimeUnavailable(#[from] tokio::runtime::TryCurrentError),

    #[error("Background polling task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
