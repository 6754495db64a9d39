use std::sync::Arc;

use tap::TapFallible;
use tokio::sync::Mutex;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use super::{SearchError, SearchOutcome};
use crate::album::{Album, sort_by_name};
use crate::client::CatalogClient;
use crate::publisher::{Publisher, ResultSource};
use crate::store::AlbumStore;

/// Serves album searches from the store when possible and from the catalog otherwise.
#[derive(Clone)]
pub struct SearchController {
    store: Arc<dyn AlbumStore>,
    client: Arc<dyn CatalogClient>,
    publisher: Publisher,
    pending_writes: TaskTracker,
    write_waiters: Arc<Mutex<()>>,
}

impl SearchController {
    pub fn new(
        store: Arc<dyn AlbumStore>,
        client: Arc<dyn CatalogClient>,
        publisher: Publisher,
    ) -> Self {
        Self {
            store,
            client,
            publisher,
            pending_writes: TaskTracker::new(),
            write_waiters: Arc::new(Mutex::new(())),
        }
    }

    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    /// Records `term` in the search history and searches for it.
    /// An empty term is rejected without touching the store or the catalog.
    pub async fn submit(&self, term: &str) -> Result<SearchOutcome, SearchError> {
        if term.is_empty() {
            return Err(SearchError::EmptyTerm);
        }

        self.store.save_search_term(term).await;
        self.search(term).await
    }

    pub async fn search(&self, term: &str) -> Result<SearchOutcome, SearchError> {
        let cached = self.store.load_albums(term).await;
        if !cached.is_empty() {
            debug!("Found {} stored albums for {term:?}", cached.len());
            self.publisher
                .publish(term, ResultSource::Cache, cached.clone())
                .await?;
            return Ok(SearchOutcome::Cached(cached));
        }

        let fetched = self
            .client
            .fetch_albums(term)
            .await
            .tap_err(|e| error!("Failed to load albums with error: {e}"))?;

        let sorted = sort_by_name(&fetched);
        self.persist_in_background(term, fetched);
        self.publisher
            .publish(term, ResultSource::Remote, sorted.clone())
            .await?;

        info!("Successfully loaded {} albums.", sorted.len());
        Ok(SearchOutcome::Fetched(sorted))
    }

    /// Downloads the album's artwork. Failures are logged and reported as `None`.
    pub async fn load_artwork(&self, album: &Album) -> Option<Vec<u8>> {
        self.client
            .fetch_artwork(album.artwork_url_100())
            .await
            .tap_err(|e| warn!("Failed to load artwork for {}: {e}", album.collection_id()))
            .ok()
    }

    pub async fn history(&self) -> Vec<String> {
        self.store.search_history().await
    }

    /// Waits until every write started by a previous search has finished.
    pub async fn wait_for_pending_writes(&self) {
        // `wait` only resolves while the tracker is closed, one waiter at a time
        let _waiter = self.write_waiters.lock().await;
        self.pending_writes.close();
        self.pending_writes.wait().await;
        self.pending_writes.reopen();
    }

    fn persist_in_background(&self, term: &str, albums: Vec<Album>) {
        if albums.is_empty() {
            return;
        }

        let store = self.store.clone();
        let term = term.to_owned();
        self.pending_writes.spawn(async move {
            store.replace_albums(&term, &albums).await;
            debug!("Stored {} albums for {term:?}", albums.len());
        });
    }
}
