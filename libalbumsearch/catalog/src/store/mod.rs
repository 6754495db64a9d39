mod memory_store;
mod sqlite_store;
mod store_error;

pub use memory_store::*;
pub use sqlite_store::*;
pub use store_error::*;

use async_trait::async_trait;

use crate::album::Album;

/// Persists search results keyed by the exact search term, along with a log of submitted terms.
///
/// None of these operations fail from the caller's point of view. Implementations
/// log storage errors and fall back to "no data" so a broken cache only ever costs
/// an extra catalog request.
#[async_trait]
pub trait AlbumStore: Send + Sync {
    /// Albums previously stored for `term`, in the order they were stored.
    async fn load_albums(&self, term: &str) -> Vec<Album>;

    /// Stores a single album under `term`. An album with the same collection id
    /// is overwritten in place, anything else is appended.
    async fn save_album(&self, album: &Album, term: &str);

    /// Replaces everything stored for `term` with `albums` in one write.
    async fn replace_albums(&self, term: &str, albums: &[Album]);

    async fn save_search_term(&self, term: &str);

    /// Submitted terms, oldest first.
    async fn search_history(&self) -> Vec<String>;

    async fn clear_results(&self, term: &str);

    async fn clear_history(&self);
}
