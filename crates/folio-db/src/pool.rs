use deadpool_diesel::postgres::Pool;

use crate::errors::DatabaseError;

/// Extension trait for deadpool-diesel Pool to provide cleaner error handling
///
/// # Example
/// ```ignore
/// let row = pool
///     .interact_with_context("fetch wallet snapshot".to_string(), move |conn| {
///         WalletPortfolioRow::find_by_wallet(&wallet, conn)
///     })
///     .await?;
/// ```
pub trait FolioPool {
    /// Interact with the database with automatic error handling and logging
    fn interact_with_context<F, T, E>(
        &self,
        operation: String,
        f: F,
    ) -> impl std::future::Future<Output = Result<T, DatabaseError>> + Send
    where
        F: FnOnce(&mut diesel::PgConnection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Into<DatabaseError> + Send + 'static;
}

impl FolioPool for Pool {
    async fn interact_with_context<F, T, E>(
        &self,
        operation: String,
        f: F,
    ) -> Result<T, DatabaseError>
    where
        F: FnOnce(&mut diesel::PgConnection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Into<DatabaseError> + Send + 'static,
    {
        // Get connection from pool
        let conn = self.get().await.map_err(|e| {
            tracing::error!(
                operation = %operation,
                error = %e,
                "Failed to get database connection from pool"
            );
            DatabaseError::PoolError {
                operation: operation.clone(),
                message: e.to_string(),
            }
        })?;

        // Execute the database operation
        conn.interact(move |conn| f(conn))
            .await
            .map_err(|e| {
                tracing::error!(
                    operation = %operation,
                    error = %e,
                    "Database interaction failed (deadpool error)"
                );
                DatabaseError::InteractionError {
                    operation: operation.clone(),
                    message: e.to_string(),
                }
            })?
            .map_err(|e| {
                let db_error: DatabaseError = e.into();
                tracing::error!(
                    operation = %operation,
                    error = %db_error,
                    "Database query failed"
                );
                db_error
            })
    }
}
