use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("deck JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("deck schema version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}
