use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use assert_matches::assert_matches;
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use rstest::*;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::Level;

use super::{SearchController, SearchError, SearchOutcome};
use crate::album::Album;
use crate::client::{CatalogClient, CatalogError};
use crate::publisher::{PublishError, Publisher, ResultSource};
use crate::store::{AlbumStore, MemoryStore};

#[ctor::ctor]
fn init() {
    tracing_subscriber::fmt()
        .pretty()
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_test_writer()
        .with_max_level(Level::INFO)
        .try_init()
        .unwrap_or_default();
}

struct FakeClient {
    response: Result<Vec<Album>, CatalogError>,
    artwork: Option<Vec<u8>>,
    requests: Mutex<Vec<String>>,
}

impl FakeClient {
    fn returning(albums: Vec<Album>) -> Self {
        Self {
            response: Ok(albums),
            artwork: None,
            requests: Mutex::new(vec![]),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            response: Err(CatalogError::new(message)),
            artwork: None,
            requests: Mutex::new(vec![]),
        }
    }

    async fn requests(&self) -> Vec<String> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl CatalogClient for FakeClient {
    async fn fetch_albums(&self, term: &str) -> Result<Vec<Album>, CatalogError> {
        self.requests.lock().await.push(term.to_owned());
        self.response.clone()
    }

    async fn fetch_artwork(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        self.artwork
            .clone()
            .ok_or_else(|| CatalogError::new(format!("no artwork at {url}")))
    }
}

/// Counts writes on top of an in-memory store.
struct RecordingStore {
    inner: MemoryStore,
    album_writes: AtomicUsize,
}

impl RecordingStore {
    fn new() -> Self {
        Self {
            inner: MemoryStore::new(10),
            album_writes: AtomicUsize::new(0),
        }
    }

    fn album_writes(&self) -> usize {
        self.album_writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AlbumStore for RecordingStore {
    async fn load_albums(&self, term: &str) -> Vec<Album> {
        self.inner.load_albums(term).await
    }

    async fn save_album(&self, album: &Album, term: &str) {
        self.album_writes.fetch_add(1, Ordering::SeqCst);
        self.inner.save_album(album, term).await
    }

    async fn replace_albums(&self, term: &str, albums: &[Album]) {
        self.album_writes.fetch_add(1, Ordering::SeqCst);
        self.inner.replace_albums(term, albums).await
    }

    async fn save_search_term(&self, term: &str) {
        self.inner.save_search_term(term).await
    }

    async fn search_history(&self) -> Vec<String> {
        self.inner.search_history().await
    }

    async fn clear_results(&self, term: &str) {
        self.inner.clear_results(term).await
    }

    async fn clear_history(&self) {
        self.inner.clear_history().await
    }
}

fn setup(client: FakeClient) -> (Arc<RecordingStore>, Arc<FakeClient>, SearchController) {
    let store = Arc::new(RecordingStore::new());
    let client = Arc::new(client);
    let controller = SearchController::new(store.clone(), client.clone(), Publisher::spawn());
    (store, client, controller)
}

fn ids(albums: &[Album]) -> Vec<i64> {
    albums.iter().map(|a| a.collection_id()).collect()
}

fn radiohead_albums() -> Vec<Album> {
    vec![
        Album::new(1, "The Bends", "http://example.com/1.jpg"),
        Album::new(2, "Kid A", "http://example.com/2.jpg"),
        Album::new(3, "OK Computer", "http://example.com/3.jpg"),
    ]
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn test_cache_hit_skips_catalog() {
    let (store, client, controller) = setup(FakeClient::returning(radiohead_albums()));
    store
        .inner
        .replace_albums("radiohead", &[Album::new(9, "Stored", "")])
        .await;

    let outcome = controller.search("radiohead").await.unwrap();

    assert_eq!(SearchOutcome::Cached(vec![Album::new(9, "Stored", "")]), outcome);
    assert!(client.requests().await.is_empty());
    let published = controller.publisher().current().unwrap();
    assert_eq!(ResultSource::Cache, published.source);
    assert_eq!(vec![9], ids(&published.albums));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn test_cache_miss_fetches_once() {
    let (_, client, controller) = setup(FakeClient::returning(radiohead_albums()));

    let outcome = controller.search("radiohead").await.unwrap();

    assert_eq!(vec!["radiohead"], client.requests().await);
    assert_eq!(ResultSource::Remote, outcome.source());
    assert_eq!(vec![2, 3, 1], ids(outcome.albums()));
}

#[rstest]
#[case::stable_ties(
    vec![(1, "B"), (2, "A"), (3, "A")],
    vec![2, 3, 1]
)]
#[case::already_sorted(
    vec![(1, "A"), (2, "B"), (3, "C")],
    vec![1, 2, 3]
)]
#[case::case_sensitive(
    vec![(1, "abbey road"), (2, "Revolver"), (3, "Abbey Road")],
    vec![3, 2, 1]
)]
#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn test_fetched_results_sorted_by_name(
    #[case] fetched: Vec<(i64, &str)>,
    #[case] expected: Vec<i64>,
) {
    let fetched = fetched
        .into_iter()
        .map(|(id, name)| Album::new(id, name, ""))
        .collect();
    let (_, _, controller) = setup(FakeClient::returning(fetched));

    let outcome = controller.search("anything").await.unwrap();

    assert_eq!(expected, ids(outcome.albums()));
    assert_eq!(
        expected,
        ids(&controller.publisher().current().unwrap().albums)
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn test_fetched_results_are_stored_in_fetch_order() {
    let (store, client, controller) = setup(FakeClient::returning(radiohead_albums()));

    controller.search("radiohead").await.unwrap();
    controller.wait_for_pending_writes().await;

    assert_eq!(vec![1, 2, 3], ids(&store.load_albums("radiohead").await));
    assert_eq!(1, store.album_writes());

    let outcome = controller.search("radiohead").await.unwrap();
    assert_matches!(outcome, SearchOutcome::Cached(_));
    assert_eq!(1, client.requests().await.len());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn test_fetch_failure_publishes_nothing() {
    let (store, _, controller) = setup(FakeClient::failing("connection reset"));

    let res = controller.search("radiohead").await;
    controller.wait_for_pending_writes().await;

    assert_matches!(res, Err(SearchError::Fetch(e)) if e.message() == "connection reset");
    assert_eq!(None, controller.publisher().current());
    assert_eq!(0, store.album_writes());
    assert!(store.load_albums("radiohead").await.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn test_empty_fetch_publishes_empty_list() {
    let (store, _, controller) = setup(FakeClient::returning(vec![]));

    let outcome = controller.search("zzzz").await.unwrap();
    controller.wait_for_pending_writes().await;

    assert_eq!(SearchOutcome::Fetched(vec![]), outcome);
    assert!(controller.publisher().current().unwrap().albums.is_empty());
    assert_eq!(0, store.album_writes());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn test_submit_rejects_empty_term() {
    let (store, client, controller) = setup(FakeClient::returning(radiohead_albums()));

    let res = controller.submit("").await;

    assert_matches!(res, Err(SearchError::EmptyTerm));
    assert!(store.search_history().await.is_empty());
    assert!(client.requests().await.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn test_submit_whitespace_term_is_searched() {
    let (store, client, controller) = setup(FakeClient::returning(radiohead_albums()));

    let outcome = controller.submit("   ").await.unwrap();

    assert_eq!(vec![2, 3, 1], ids(&outcome.into_albums()));
    assert_eq!(vec!["   "], store.search_history().await);
    assert_eq!(vec!["   "], client.requests().await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn test_cache_is_keyed_on_exact_term() {
    let (store, client, controller) = setup(FakeClient::returning(radiohead_albums()));
    store
        .inner
        .replace_albums("radiohead", &[Album::new(9, "Stored", "")])
        .await;

    let outcome = controller.search("RADIOHEAD ").await.unwrap();

    assert_eq!(ResultSource::Remote, outcome.source());
    assert_eq!(vec![2, 3, 1], ids(outcome.albums()));
    assert_eq!(vec!["RADIOHEAD "], client.requests().await);

    controller.wait_for_pending_writes().await;
    assert_eq!(vec![9], ids(&store.load_albums("radiohead").await));
    assert_eq!(vec![1, 2, 3], ids(&store.load_albums("RADIOHEAD ").await));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn test_submit_records_history() {
    let (_, client, controller) = setup(FakeClient::returning(radiohead_albums()));

    controller.submit("Radiohead").await.unwrap();
    controller.submit("Kid A").await.unwrap();

    assert_eq!(vec!["Radiohead", "Kid A"], controller.history().await);
    assert_eq!(vec!["Radiohead", "Kid A"], client.requests().await);
}

// Single threaded so both searches check the store before either background write runs
#[tokio::test(flavor = "current_thread")]
async fn test_concurrent_searches_same_term() {
    let (store, _, controller) = setup(FakeClient::returning(radiohead_albums()));

    let (first, second) = tokio::join!(
        controller.search("radiohead"),
        controller.search("radiohead")
    );
    controller.wait_for_pending_writes().await;

    assert_eq!(vec![2, 3, 1], ids(first.unwrap().albums()));
    assert_eq!(vec![2, 3, 1], ids(second.unwrap().albums()));
    assert_eq!(2, controller.publisher().current().unwrap().sequence);
    assert_eq!(vec![1, 2, 3], ids(&store.load_albums("radiohead").await));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn test_load_artwork() {
    let album = Album::new(1, "Kid A", "http://example.com/1.jpg");

    let (_, _, controller) = setup(FakeClient {
        artwork: Some(vec![1, 2, 3]),
        ..FakeClient::returning(vec![])
    });
    assert_eq!(Some(vec![1, 2, 3]), controller.load_artwork(&album).await);

    let (_, _, controller) = setup(FakeClient::returning(vec![]));
    assert_eq!(None, controller.load_artwork(&album).await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn test_search_after_publisher_shutdown() {
    let (store, _, controller) = setup(FakeClient::returning(radiohead_albums()));
    store
        .inner
        .replace_albums("radiohead", &[Album::new(9, "Stored", "")])
        .await;
    controller.publisher().shutdown().await.unwrap();

    let res = timeout(Duration::from_secs(5), controller.search("radiohead"))
        .await
        .unwrap();

    assert_matches!(res, Err(SearchError::Publish(PublishError::NoResponse(_))));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_waits_for_pending_writes() {
    let (store, _, controller) = setup(FakeClient::returning(radiohead_albums()));
    controller.search("radiohead").await.unwrap();
    controller.search("kid a").await.unwrap();

    timeout(Duration::from_secs(5), async {
        tokio::join!(
            controller.wait_for_pending_writes(),
            controller.wait_for_pending_writes(),
            controller.wait_for_pending_writes(),
        )
    })
    .await
    .unwrap();

    assert_eq!(2, store.album_writes());

    controller.search("amnesiac").await.unwrap();
    timeout(Duration::from_secs(5), controller.wait_for_pending_writes())
        .await
        .unwrap();
    assert_eq!(3, store.album_writes());
}
