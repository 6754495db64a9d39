use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum StoreError {
    #[error("Database error: {0}")]
    DbError(String),
    #[error("Migration error: {0}")]
    MigrateError(String),
    #[error("Failed to create database file {0}: {1}")]
    FileCreationFailed(String, String),
    #[error("Error decoding stored album: {0}")]
    DecodeError(String),
}
