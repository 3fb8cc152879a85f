#[derive(Debug, thiserror::Error)]
pub enum SalesError {
    #[error("Invalid month provided: {0:?}")]
    InvalidMonth(String),

    #[error("Month parameter is required")]
    MissingMonth,

    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record store error: {0}")]
    Store(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl SalesError {
    /// True for request validation failures detected before any store access.
    pub fn is_validation(&self) -> bool {
        matches!(self, SalesError::InvalidMonth(_) | SalesError::MissingMonth)
    }

    /// True when the record store (or the plumbing around it) failed.
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            SalesError::DuckDb(_) | SalesError::Io(_) | SalesError::Json(_) | SalesError::Store(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SalesError>;
