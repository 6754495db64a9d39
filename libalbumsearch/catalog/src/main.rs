use std::env;
use std::sync::Arc;

use eyre::{Result, bail};
use libalbumsearch_catalog::client::ITunesClient;
use libalbumsearch_catalog::publisher::Publisher;
use libalbumsearch_catalog::search::SearchController;
use libalbumsearch_catalog::settings::Settings;
use libalbumsearch_catalog::store::SqliteStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::from_path("./.env").unwrap_or_default();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let term = env::args().skip(1).collect::<Vec<_>>().join(" ");
    if term.is_empty() {
        bail!("usage: albumsearch <term>");
    }

    let settings = Settings::from_env()?;
    let store = SqliteStore::connect(settings.database_path()?, settings.history_capacity).await?;
    let client = ITunesClient::new(&settings)?;
    let publisher = Publisher::spawn();
    let controller = SearchController::new(
        Arc::new(store.clone()),
        Arc::new(client),
        publisher.clone(),
    );

    let outcome = controller.submit(&term).await?;
    println!("{} albums ({})", outcome.albums().len(), outcome.source());
    for album in outcome.albums() {
        println!("{} - {}", album.collection_name(), album.artist_name());
    }

    controller.wait_for_pending_writes().await;
    publisher.shutdown().await?;
    store.close().await;
    Ok(())
}
