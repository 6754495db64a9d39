pub(crate) const DEFAULT_API_URL: &str = "https://itunes.apple.com";
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub(crate) const DEFAULT_HISTORY_CAPACITY: usize = 100;
pub(crate) const USER_AGENT: &str = concat!("albumsearch/", env!("CARGO_PKG_VERSION"));

pub(crate) const PROJECT_NAME: &str = "albumsearch";
pub(crate) const DATABASE_FILE: &str = "albumsearch.db";

pub(crate) const SEARCH_MEDIA: &str = "music";
pub(crate) const SEARCH_ENTITY: &str = "album";
pub(crate) const SEARCH_ATTRIBUTE: &str = "albumTerm";
