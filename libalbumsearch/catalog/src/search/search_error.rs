use thiserror::Error;

use crate::client::CatalogError;
use crate::publisher::PublishError;

#[derive(Error, Debug, Clone)]
pub enum SearchError {
    #[error("Search term is empty")]
    EmptyTerm,
    #[error("Failed to load albums: {0}")]
    Fetch(#[from] CatalogError),
    #[error(transparent)]
    Publish(#[from] PublishError),
}
