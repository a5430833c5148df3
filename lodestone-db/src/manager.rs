//! Connection lifecycle manager
//!
//! Owns the connection factory and the session factory derived from it.
//! Both live in one slot, so they are present or absent together.
//!
//! Acquisitions take a snapshot of the slot and never hold a lock while a
//! scope runs. A `stop` racing with an in-flight scope lets that scope
//! finish on its snapshot; later acquisitions fail with `NotInitialized`.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use futures::future::BoxFuture;

use crate::error::DbError;
use crate::factory::{ConnectionFactory, SessionFactory, SessionScope, TransactionScope};

struct Factories<F> {
    connections: Arc<F>,
    sessions: SessionFactory<F>,
}

/// Manages the lifetime of a pooled connection factory.
///
/// # Example
///
/// ```ignore
/// let manager = PgConnectionManager::new();
/// manager.start(&DatabaseConfig::new(url))?;
///
/// manager
///     .with_connection(|conn| Box::pin(async move {
///         sqlx::query("SELECT 1").execute(&mut **conn).await?;
///         Ok::<_, DbError>(())
///     }))
///     .await?;
///
/// manager.stop().await?;
/// ```
pub struct ConnectionManager<F: ConnectionFactory> {
    factories: ArcSwapOption<Factories<F>>,
}

impl<F: ConnectionFactory> ConnectionManager<F> {
    /// Create a stopped manager.
    pub fn new() -> Self {
        Self {
            factories: ArcSwapOption::empty(),
        }
    }

    /// Build the connection factory and its session factory.
    ///
    /// Fails with `AlreadyStarted` if the manager is running.
    pub fn start(&self, options: &F::Options) -> Result<(), DbError> {
        if self.is_started() {
            return Err(DbError::AlreadyStarted);
        }

        let connections = Arc::new(F::connect(options)?);
        let sessions = SessionFactory::new(Arc::clone(&connections));
        let fresh = Arc::new(Factories {
            connections,
            sessions,
        });

        // Lost a race with a concurrent start
        let previous = self
            .factories
            .compare_and_swap(&None::<Arc<Factories<F>>>, Some(fresh));
        if previous.is_some() {
            return Err(DbError::AlreadyStarted);
        }

        tracing::debug!("connection manager started");
        Ok(())
    }

    /// Clear both factories and release pooled resources.
    ///
    /// Fails with `NotInitialized` if the manager is not running.
    pub async fn stop(&self) -> Result<(), DbError> {
        let factories = self.factories.swap(None).ok_or(DbError::NotInitialized)?;
        factories.connections.dispose().await;

        tracing::debug!("connection manager stopped");
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.factories.load().is_some()
    }

    fn snapshot(&self) -> Result<Arc<Factories<F>>, DbError> {
        self.factories.load_full().ok_or(DbError::NotInitialized)
    }

    /// Run `scope` on a connection inside a transaction.
    ///
    /// Commits when `scope` returns `Ok`. Rolls back before returning the
    /// error when it returns `Err`. A failed rollback is logged and the
    /// scope's error wins.
    pub async fn with_connection<T, E, S>(&self, scope: S) -> Result<T, E>
    where
        S: for<'c> FnOnce(&'c mut F::Connection) -> BoxFuture<'c, Result<T, E>>,
        E: From<DbError>,
    {
        let factories = self.snapshot()?;
        let mut conn = factories.connections.begin().await?;

        match scope(&mut conn).await {
            Ok(value) => {
                conn.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = conn.rollback().await {
                    tracing::warn!(error = %rollback_err, "transaction rollback failed");
                }
                Err(err)
            }
        }
    }

    /// Run `scope` on a fresh session.
    ///
    /// Rolls the session back when `scope` returns `Err`. The session is
    /// closed on every exit. Sessions never commit on their own.
    pub async fn with_session<T, E, S>(&self, scope: S) -> Result<T, E>
    where
        S: for<'s> FnOnce(&'s mut F::Session) -> BoxFuture<'s, Result<T, E>>,
        E: From<DbError>,
    {
        let factories = self.snapshot()?;
        let mut session = factories.sessions.create();

        let outcome = scope(&mut session).await;
        if outcome.is_err() {
            if let Err(rollback_err) = session.rollback().await {
                tracing::warn!(error = %rollback_err, "session rollback failed");
            }
        }

        match (outcome, session.close().await) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(close_err)) => Err(close_err.into()),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(close_err)) => {
                tracing::warn!(error = %close_err, "session close failed");
                Err(err)
            }
        }
    }
}

impl<F: ConnectionFactory> Default for ConnectionManager<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: ConnectionFactory> fmt::Debug for ConnectionManager<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("started", &self.is_started())
            .finish()
    }
}
