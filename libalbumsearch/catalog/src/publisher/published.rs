use strum::Display;

use crate::album::Album;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ResultSource {
    Cache,
    Remote,
}

/// A snapshot of the result set as last published.
#[derive(Debug, Clone, PartialEq)]
pub struct Published {
    /// Increases by one for every publish, starting at 1.
    pub sequence: u64,
    pub term: String,
    pub source: ResultSource,
    pub albums: Vec<Album>,
}
