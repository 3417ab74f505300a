// Database adapter traits for the single-shot query executor
use crate::models::ResultSet;
use thiserror::Error;

/// Driver-level failure. The executor decides which [`AppError`] kind it
/// becomes; the text is only ever logged.
///
/// [`AppError`]: crate::api::middleware::AppError
#[derive(Debug, Error)]
pub enum DbError {
    #[error("connection error: {0}")]
    Connect(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("decode error: {0}")]
    Decode(String),
}

/// Opens fresh database sessions. Implementations must not pool or reuse
/// sessions across calls.
#[async_trait::async_trait]
pub trait Database: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn Session>, DbError>;
}

/// One open connection.
#[async_trait::async_trait]
pub trait Session: Send {
    /// Run `sql` verbatim and materialize every row.
    async fn fetch_all(&mut self, sql: &str) -> Result<ResultSet, DbError>;

    /// Release the connection. Called exactly once, on every path.
    async fn close(self: Box<Self>);
}
