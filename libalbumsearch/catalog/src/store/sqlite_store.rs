use std::fs::create_dir_all;
use std::path::Path;
use std::str::FromStr;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use log::LevelFilter;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{ConnectOptions, Pool, Sqlite};
use tap::TapFallible;
use tracing::{error, info};

use super::{AlbumStore, StoreError};
use crate::album::Album;

#[derive(Clone)]
pub struct SqliteStore {
    pool: Pool<Sqlite>,
    history_capacity: usize,
}

impl SqliteStore {
    pub async fn connect(
        path: impl AsRef<Path>,
        history_capacity: usize,
    ) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            create_dir_all(parent).map_err(|e| {
                StoreError::FileCreationFailed(path.to_string_lossy().to_string(), e.to_string())
            })?;
        }

        let opts = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Info, Duration::from_secs(1));

        let pool = SqlitePoolOptions::new()
            .connect_with(opts)
            .await
            .map_err(db_error)?;

        info!("Opened album store at {path:?}");
        Self::migrated(pool, history_capacity).await
    }

    pub async fn connect_in_memory(history_capacity: usize) -> Result<Self, StoreError> {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(db_error)?
            .log_statements(LevelFilter::Debug);

        // Every connection to an in-memory database sees its own copy,
        // so the pool must never open a second one
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opts)
            .await
            .map_err(db_error)?;

        Self::migrated(pool, history_capacity).await
    }

    async fn migrated(pool: Pool<Sqlite>, history_capacity: usize) -> Result<Self, StoreError> {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::MigrateError(format!("{e:?}")))?;

        Ok(Self {
            pool,
            history_capacity,
        })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub(crate) async fn try_load_albums(&self, term: &str) -> Result<Vec<Album>, StoreError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT album_json FROM search_entry WHERE search_key = $1 ORDER BY position",
        )
        .bind(term)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter()
            .map(|(json,)| {
                serde_json::from_str(&json).map_err(|e| StoreError::DecodeError(e.to_string()))
            })
            .collect()
    }

    pub(crate) async fn try_save_album(&self, album: &Album, term: &str) -> Result<(), StoreError> {
        let json = encode(album)?;
        sqlx::query(
            "
            INSERT INTO search_entry(search_key, position, collection_id, album_json)
            VALUES(
                $1,
                (SELECT COALESCE(MAX(position) + 1, 0) FROM search_entry WHERE search_key = $1),
                $2,
                $3
            )
            ON CONFLICT(search_key, collection_id) DO UPDATE SET album_json = excluded.album_json;
            ",
        )
        .bind(term)
        .bind(album.collection_id())
        .bind(json)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    pub(crate) async fn try_replace_albums(
        &self,
        term: &str,
        albums: &[Album],
    ) -> Result<(), StoreError> {
        let mut tran = self.pool.begin().await.map_err(db_error)?;

        sqlx::query("DELETE FROM search_entry WHERE search_key = $1")
            .bind(term)
            .execute(&mut *tran)
            .await
            .map_err(db_error)?;

        for (position, album) in albums.iter().enumerate() {
            sqlx::query(
                "
                INSERT INTO search_entry(search_key, position, collection_id, album_json)
                VALUES($1, $2, $3, $4)
                ON CONFLICT(search_key, collection_id) DO UPDATE SET album_json = excluded.album_json;
                ",
            )
            .bind(term)
            .bind(position as i64)
            .bind(album.collection_id())
            .bind(encode(album)?)
            .execute(&mut *tran)
            .await
            .map_err(db_error)?;
        }

        tran.commit().await.map_err(db_error)
    }

    pub(crate) async fn try_save_search_term(&self, term: &str) -> Result<(), StoreError> {
        let timestamp = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default();

        let mut tran = self.pool.begin().await.map_err(db_error)?;
        sqlx::query("INSERT INTO search_history(search_term, created_date) VALUES($1, $2)")
            .bind(term)
            .bind(timestamp)
            .execute(&mut *tran)
            .await
            .map_err(db_error)?;

        if self.history_capacity > 0 {
            sqlx::query(
                "
                DELETE FROM search_history
                WHERE history_id NOT IN (
                    SELECT history_id FROM search_history ORDER BY history_id DESC LIMIT $1
                )
                ",
            )
            .bind(self.history_capacity as i64)
            .execute(&mut *tran)
            .await
            .map_err(db_error)?;
        }

        tran.commit().await.map_err(db_error)
    }

    pub(crate) async fn try_search_history(&self) -> Result<Vec<String>, StoreError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT search_term FROM search_history ORDER BY history_id")
                .fetch_all(&self.pool)
                .await
                .map_err(db_error)?;

        Ok(rows.into_iter().map(|(term,)| term).collect())
    }

    pub(crate) async fn try_clear_results(&self, term: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM search_entry WHERE search_key = $1")
            .bind(term)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    pub(crate) async fn try_clear_history(&self) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM search_history")
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }
}

#[async_trait]
impl AlbumStore for SqliteStore {
    async fn load_albums(&self, term: &str) -> Vec<Album> {
        self.try_load_albums(term)
            .await
            .tap_err(|e| error!("Error loading albums for {term:?}: {e:?}"))
            .unwrap_or_default()
    }

    async fn save_album(&self, album: &Album, term: &str) {
        let _ = self
            .try_save_album(album, term)
            .await
            .tap_err(|e| error!("Error saving album for {term:?}: {e:?}"));
    }

    async fn replace_albums(&self, term: &str, albums: &[Album]) {
        let _ = self
            .try_replace_albums(term, albums)
            .await
            .tap_err(|e| error!("Error saving albums for {term:?}: {e:?}"));
    }

    async fn save_search_term(&self, term: &str) {
        let _ = self
            .try_save_search_term(term)
            .await
            .tap_err(|e| error!("Error saving search term {term:?}: {e:?}"));
    }

    async fn search_history(&self) -> Vec<String> {
        self.try_search_history()
            .await
            .tap_err(|e| error!("Error loading search history: {e:?}"))
            .unwrap_or_default()
    }

    async fn clear_results(&self, term: &str) {
        let _ = self
            .try_clear_results(term)
            .await
            .tap_err(|e| error!("Error clearing albums for {term:?}: {e:?}"));
    }

    async fn clear_history(&self) {
        let _ = self
            .try_clear_history()
            .await
            .tap_err(|e| error!("Error clearing search history: {e:?}"));
    }
}

fn encode(album: &Album) -> Result<String, StoreError> {
    serde_json::to_string(album).map_err(|e| StoreError::DbError(format!("{e:?}")))
}

fn db_error(e: sqlx::Error) -> StoreError {
    StoreError::DbError(format!("{e:?}"))
}
