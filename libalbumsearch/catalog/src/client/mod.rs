mod catalog_error;
mod itunes_client;
mod search_response;

pub use catalog_error::*;
pub use itunes_client::*;

use async_trait::async_trait;

use crate::album::Album;

#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn fetch_albums(&self, term: &str) -> Result<Vec<Album>, CatalogError>;

    async fn fetch_artwork(&self, url: &str) -> Result<Vec<u8>, CatalogError>;
}
