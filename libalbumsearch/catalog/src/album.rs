use serde::{Deserialize, Serialize};

/// A single album returned by the catalog search.
///
/// Field names follow the catalog's JSON schema so a record can be stored and
/// reloaded without a separate mapping layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    collection_id: i64,
    collection_name: String,
    #[serde(default)]
    artist_name: String,
    #[serde(rename = "artworkUrl100", default)]
    artwork_url_100: String,
    #[serde(rename = "artworkUrl60", default, skip_serializing_if = "Option::is_none")]
    artwork_url_60: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    collection_view_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    collection_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    track_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    primary_genre_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    copyright: Option<String>,
}

impl Album {
    pub fn new(
        collection_id: i64,
        collection_name: impl Into<String>,
        artwork_url_100: impl Into<String>,
    ) -> Self {
        Self {
            collection_id,
            collection_name: collection_name.into(),
            artist_name: String::new(),
            artwork_url_100: artwork_url_100.into(),
            artwork_url_60: None,
            collection_view_url: None,
            collection_price: None,
            currency: None,
            track_count: None,
            release_date: None,
            primary_genre_name: None,
            country: None,
            copyright: None,
        }
    }

    pub fn with_artist_name(mut self, artist_name: impl Into<String>) -> Self {
        self.artist_name = artist_name.into();
        self
    }

    pub fn with_price(mut self, price: f64, currency: impl Into<String>) -> Self {
        self.collection_price = Some(price);
        self.currency = Some(currency.into());
        self
    }

    pub fn with_release_date(mut self, release_date: impl Into<String>) -> Self {
        self.release_date = Some(release_date.into());
        self
    }

    pub fn with_track_count(mut self, track_count: u32) -> Self {
        self.track_count = Some(track_count);
        self
    }

    pub fn collection_id(&self) -> i64 {
        self.collection_id
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    pub fn artist_name(&self) -> &str {
        &self.artist_name
    }

    pub fn artwork_url_100(&self) -> &str {
        &self.artwork_url_100
    }

    pub fn artwork_url_60(&self) -> Option<&str> {
        self.artwork_url_60.as_deref()
    }

    pub fn collection_view_url(&self) -> Option<&str> {
        self.collection_view_url.as_deref()
    }

    pub fn collection_price(&self) -> Option<f64> {
        self.collection_price
    }

    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }

    pub fn track_count(&self) -> Option<u32> {
        self.track_count
    }

    pub fn release_date(&self) -> Option<&str> {
        self.release_date.as_deref()
    }

    pub fn primary_genre_name(&self) -> Option<&str> {
        self.primary_genre_name.as_deref()
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn copyright(&self) -> Option<&str> {
        self.copyright.as_deref()
    }
}

/// Orders albums by collection name. The sort is stable so albums sharing a
/// name keep the order the catalog returned them in.
pub(crate) fn sort_by_name(albums: &[Album]) -> Vec<Album> {
    let mut sorted = albums.to_vec();
    sorted.sort_by(|a, b| a.collection_name.cmp(&b.collection_name));
    sorted
}
