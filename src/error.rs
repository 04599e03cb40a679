use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The selector you are trying to scrape with is invalid. Selector: {0}")]
    InvalidSelector(String),

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Tokio Join Error, couldn't await a task! {0}")]
    RuntimeJoin(#[from] tokio::task::JoinError),
    #[error("Couldn't acquire a fetch permit, the gate was closed: {0}")]
    RuntimeAcquire(#[from] tokio::sync::AcquireError),

    #[error("Reqwest Error: {0}")]
    Reqwest(#[from] reqwest::Error),
}
