use thiserror::Error;

/// Any failure talking to the remote catalog: transport, HTTP status or response decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct CatalogError(String);

impl CatalogError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}
