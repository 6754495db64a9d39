use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::AlbumStore;
use crate::album::Album;

pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<Album>>>,
    history: Mutex<VecDeque<String>>,
    history_capacity: usize,
}

impl MemoryStore {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            history: Mutex::new(VecDeque::new()),
            history_capacity,
        }
    }
}

#[async_trait]
impl AlbumStore for MemoryStore {
    async fn load_albums(&self, term: &str) -> Vec<Album> {
        self.entries
            .lock()
            .await
            .get(term)
            .cloned()
            .unwrap_or_default()
    }

    async fn save_album(&self, album: &Album, term: &str) {
        let mut entries = self.entries.lock().await;
        let albums = entries.entry(term.to_owned()).or_default();
        match albums
            .iter_mut()
            .find(|a| a.collection_id() == album.collection_id())
        {
            Some(existing) => *existing = album.clone(),
            None => albums.push(album.clone()),
        }
    }

    async fn replace_albums(&self, term: &str, albums: &[Album]) {
        let mut deduped: Vec<Album> = Vec::with_capacity(albums.len());
        for album in albums {
            match deduped
                .iter_mut()
                .find(|a| a.collection_id() == album.collection_id())
            {
                Some(existing) => *existing = album.clone(),
                None => deduped.push(album.clone()),
            }
        }
        self.entries
            .lock()
            .await
            .insert(term.to_owned(), deduped);
    }

    async fn save_search_term(&self, term: &str) {
        let mut history = self.history.lock().await;
        history.push_back(term.to_owned());
        if self.history_capacity > 0 {
            while history.len() > self.history_capacity {
                history.pop_front();
            }
        }
    }

    async fn search_history(&self) -> Vec<String> {
        self.history.lock().await.iter().cloned().collect()
    }

    async fn clear_results(&self, term: &str) {
        self.entries.lock().await.remove(term);
    }

    async fn clear_history(&self) {
        self.history.lock().await.clear();
    }
}
