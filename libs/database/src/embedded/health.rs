use redb::Database;
use std::sync::Arc;
use tracing::debug;

use super::run_blocking;
use crate::common::DatabaseError;

/// Check embedded store health
///
/// Opens a read transaction, which fails once the file is unusable (I/O errors,
/// a repair in progress). Backs the readiness endpoint.
///
/// # Example
/// ```ignore
/// use database::embedded::check_health;
///
/// match check_health(&db).await {
///     Ok(_) => StatusCode::OK,
///     Err(_) => StatusCode::SERVICE_UNAVAILABLE,
/// }
/// ```
pub async fn check_health(db: &Arc<Database>) -> Result<(), DatabaseError> {
    debug!("Running embedded store health check");

    run_blocking(db, |db| {
        db.begin_read().map(drop).map_err(|e| {
            DatabaseError::HealthCheckFailed(format!("Embedded store health check failed: {}", e))
        })
    })
    .await?;

    debug!("Embedded store health check passed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedded::open_in_memory;

    #[tokio::test]
    async fn test_check_health_on_open_store() {
        let db = Arc::new(open_in_memory().unwrap());
        assert!(check_health(&db).await.is_ok());
    }
}
