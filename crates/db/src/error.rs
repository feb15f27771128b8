use taleforge_core::error::CoreError;

/// Error type for store and builder operations.
///
/// Domain failures pass through as [`CoreError`]; storage failures are kept
/// as the underlying [`sqlx::Error`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
