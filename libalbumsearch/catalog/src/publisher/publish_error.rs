use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum PublishError {
    #[error("Publisher is not running: {0}")]
    Closed(String),
    #[error("Publisher did not acknowledge the request: {0}")]
    NoResponse(String),
}
