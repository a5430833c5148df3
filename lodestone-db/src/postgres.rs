//! Pooled Postgres connection factory
//!
//! Uses sqlx `PgPool` with explicit connection limits. The pool connects
//! lazily, so building the factory never touches the network.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions as _, PgConnection, PgPool, Postgres, Transaction};

use crate::error::DbError;
use crate::factory::{ConnectionFactory, SessionScope, TransactionScope};
use crate::options::DatabaseConfig;

/// Transaction yielded by `with_connection`. Derefs to `PgConnection`.
pub type PgTransaction = Transaction<'static, Postgres>;

/// Connection factory over a `PgPool`
#[derive(Debug, Clone)]
pub struct PgConnectionFactory {
    pool: PgPool,
}

impl PgConnectionFactory {
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ConnectionFactory for PgConnectionFactory {
    type Options = DatabaseConfig;
    type Connection = PgTransaction;
    type Session = PgSession;

    fn connect(options: &DatabaseConfig) -> Result<Self, DbError> {
        let mut connect =
            PgConnectOptions::from_str(&options.url).map_err(DbError::Connectivity)?;
        if !options.pool.echo {
            connect = connect.disable_statement_logging();
        }

        let pool = PgPoolOptions::new()
            .max_connections(options.pool.max_connections)
            .min_connections(options.pool.min_connections)
            .acquire_timeout(options.pool.acquire_timeout)
            .connect_lazy_with(connect);

        Ok(Self { pool })
    }

    async fn begin(&self) -> Result<PgTransaction, DbError> {
        Ok(self.pool.begin().await?)
    }

    fn session(&self) -> PgSession {
        PgSession::new(self.pool.clone())
    }

    async fn dispose(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl TransactionScope for PgTransaction {
    async fn ping(&mut self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&mut **self).await?;
        Ok(())
    }

    async fn commit(self) -> Result<(), DbError> {
        Transaction::commit(self).await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), DbError> {
        Transaction::rollback(self).await?;
        Ok(())
    }
}

/// Unit of work over a pooled connection.
///
/// A transaction begins on the first call to [`PgSession::connection`] and
/// stays open until [`PgSession::commit`], a rollback, or close. After a
/// commit the next `connection()` begins a new transaction.
#[derive(Debug)]
pub struct PgSession {
    pool: PgPool,
    tx: Option<PgTransaction>,
}

impl PgSession {
    fn new(pool: PgPool) -> Self {
        Self { pool, tx: None }
    }

    /// Connection for the current transaction, beginning one if needed.
    pub async fn connection(&mut self) -> Result<&mut PgConnection, DbError> {
        let tx = match self.tx.take() {
            Some(tx) => tx,
            None => self.pool.begin().await?,
        };
        Ok(&mut **self.tx.insert(tx))
    }

    /// Commit pending work. No-op when nothing has run since the last commit.
    pub async fn commit(&mut self) -> Result<(), DbError> {
        if let Some(tx) = self.tx.take() {
            tx.commit().await?;
        }
        Ok(())
    }

    pub fn in_transaction(&self) -> bool {
        self.tx.is_some()
    }
}

#[async_trait]
impl SessionScope for PgSession {
    async fn rollback(&mut self) -> Result<(), DbError> {
        if let Some(tx) = self.tx.take() {
            tx.rollback().await?;
        }
        Ok(())
    }

    async fn close(mut self) -> Result<(), DbError> {
        SessionScope::rollback(&mut self).await
    }
}
