use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unable to locate a valid home directory")]
    NoHomeDir,
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}
