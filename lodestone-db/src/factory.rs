//! Connection factory seam
//!
//! [`ConnectionManager`](crate::ConnectionManager) is generic over
//! [`ConnectionFactory`]. The pooled Postgres factory lives in
//! [`postgres`](crate::postgres); the recording double used by tests lives
//! in `testing`.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::DbError;

/// A connection with an open transaction.
#[async_trait]
pub trait TransactionScope: Send + Sized {
    /// Run a trivial liveness query (`SELECT 1`).
    async fn ping(&mut self) -> Result<(), DbError>;

    async fn commit(self) -> Result<(), DbError>;

    async fn rollback(self) -> Result<(), DbError>;
}

/// A unit of work layered over a connection.
#[async_trait]
pub trait SessionScope: Send + Sized {
    /// Discard pending work. The session stays usable.
    async fn rollback(&mut self) -> Result<(), DbError>;

    /// Release the session and its connection. Uncommitted work is discarded.
    async fn close(self) -> Result<(), DbError>;
}

/// Pooled provider of short-lived connections and sessions.
#[async_trait]
pub trait ConnectionFactory: Send + Sync + Sized + 'static {
    /// Connection string and pool options
    type Options: Send + Sync;
    type Connection: TransactionScope;
    type Session: SessionScope;

    /// Build the factory. Must not perform network I/O.
    fn connect(options: &Self::Options) -> Result<Self, DbError>;

    /// Acquire a connection and begin a transaction on it.
    async fn begin(&self) -> Result<Self::Connection, DbError>;

    /// Create a session bound to this factory.
    fn session(&self) -> Self::Session;

    /// Release pooled resources.
    async fn dispose(&self);
}

/// Session factory derived from a connection factory
pub struct SessionFactory<F> {
    connections: Arc<F>,
}

impl<F: ConnectionFactory> SessionFactory<F> {
    pub fn new(connections: Arc<F>) -> Self {
        Self { connections }
    }

    pub fn create(&self) -> F::Session {
        self.connections.session()
    }
}
