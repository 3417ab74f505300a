use crate::api::middleware::AppError;
use crate::models::ResultSet;
use crate::services::database::Database;
use std::sync::Arc;
use std::time::Instant;

/// Runs one statement on a connection of its own.
pub struct QueryExecutor {
    database: Arc<dyn Database>,
}

impl QueryExecutor {
    pub fn new(database: Arc<dyn Database>) -> Self {
        Self { database }
    }

    /// Execute `sql` verbatim and return every row. The connection is closed
    /// before this returns, whether the statement succeeded or not.
    pub async fn execute(&self, sql: &str) -> Result<ResultSet, AppError> {
        let mut session = self.database.connect().await.map_err(|e| {
            tracing::error!("Failed to connect to database: {}", e);
            AppError::ConnectionFailed(e)
        })?;

        let start_time = Instant::now();
        let outcome = session.fetch_all(sql).await;
        session.close().await;

        let rows = outcome.map_err(|e| {
            tracing::error!("Query execution failed: {}", e);
            AppError::ExecutionFailed(e)
        })?;

        tracing::info!(
            "Query returned {} rows in {}ms",
            rows.len(),
            start_time.elapsed().as_millis()
        );
        Ok(rows)
    }
}
