use crate::album::Album;
use crate::publisher::ResultSource;

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Albums previously stored for the term, in stored order.
    Cached(Vec<Album>),
    /// Freshly fetched albums, sorted by collection name.
    Fetched(Vec<Album>),
}

impl SearchOutcome {
    pub fn albums(&self) -> &[Album] {
        match self {
            Self::Cached(albums) | Self::Fetched(albums) => albums,
        }
    }

    pub fn into_albums(self) -> Vec<Album> {
        match self {
            Self::Cached(albums) | Self::Fetched(albums) => albums,
        }
    }

    pub fn source(&self) -> ResultSource {
        match self {
            Self::Cached(_) => ResultSource::Cache,
            Self::Fetched(_) => ResultSource::Remote,
        }
    }
}
