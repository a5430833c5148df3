//! Startup and shutdown hooks for the database.
//!
//! The host runs [`on_startup`] before binding its listener and
//! [`on_shutdown`] after it stops serving. A failed startup is fatal: the
//! host must not accept traffic.

use lodestone_db::{ConnectionFactory, ConnectionManager, DbError, TransactionScope};
use tracing::{error, info, warn};

/// Start the manager and verify the database answers `SELECT 1`.
///
/// On failure the manager is stopped again and the error is reported as
/// `DbError::Connectivity`.
pub async fn on_startup<F: ConnectionFactory>(
    manager: &ConnectionManager<F>,
    options: &F::Options,
) -> Result<(), DbError> {
    manager.start(options).map_err(DbError::into_connectivity)?;

    let check: Result<(), DbError> = manager
        .with_connection(|conn| Box::pin(async move { conn.ping().await }))
        .await;

    match check {
        Ok(()) => {
            info!("database connected");
            Ok(())
        }
        Err(err) => {
            error!(error = %err, "database liveness check failed");
            if let Err(stop_err) = manager.stop().await {
                warn!(error = %stop_err, "failed to stop connection manager");
            }
            Err(err.into_connectivity())
        }
    }
}

/// Stop the manager and release pooled connections.
pub async fn on_shutdown<F: ConnectionFactory>(manager: &ConnectionManager<F>) -> Result<(), DbError> {
    manager.stop().await?;
    info!("database disconnected");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lodestone_db::testing::{Recorder, RecordingFactory};
    use lodestone_db::{DatabaseConfig, PgConnectionManager};

    type Manager = ConnectionManager<RecordingFactory>;

    #[tokio::test]
    async fn startup_connects_and_pings() {
        let recorder = Recorder::new();
        let manager = Manager::new();

        on_startup(&manager, &recorder).await.unwrap();

        assert!(manager.is_started());
        let counts = recorder.counts();
        assert_eq!(counts.pings, 1);
        assert_eq!(counts.commits, 1);
    }

    #[tokio::test]
    async fn failed_liveness_check_is_connectivity_failure() {
        let recorder = Recorder::new();
        recorder.fail_pings(true);
        let manager = Manager::new();

        let err = on_startup(&manager, &recorder).await.unwrap_err();

        assert!(matches!(err, DbError::Connectivity(_)));
        assert!(!manager.is_started());
        let counts = recorder.counts();
        assert_eq!(counts.rollbacks, 1);
        assert_eq!(counts.disposes, 1);
    }

    #[tokio::test]
    async fn startup_twice_fails_fast() {
        let recorder = Recorder::new();
        let manager = Manager::new();
        on_startup(&manager, &recorder).await.unwrap();

        let err = on_startup(&manager, &recorder).await.unwrap_err();
        assert!(matches!(err, DbError::AlreadyStarted));
        assert!(manager.is_started());
    }

    #[tokio::test]
    async fn malformed_url_is_connectivity_failure() {
        let manager = PgConnectionManager::new();

        let err = on_startup(&manager, &DatabaseConfig::new("not a url"))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Connectivity(_)));
        assert!(!manager.is_started());
    }

    #[tokio::test]
    async fn shutdown_releases_pool_once() {
        let recorder = Recorder::new();
        let manager = Manager::new();
        on_startup(&manager, &recorder).await.unwrap();

        on_shutdown(&manager).await.unwrap();
        assert!(!manager.is_started());
        assert_eq!(recorder.counts().disposes, 1);

        let err = on_shutdown(&manager).await.unwrap_err();
        assert!(matches!(err, DbError::NotInitialized));
        assert_eq!(recorder.counts().disposes, 1);
    }
}
