//! lodestone-db: database connection lifecycle and entities
//!
//! The [`ConnectionManager`] owns one pooled connection factory and hands
//! out scoped connections and sessions. It is constructed explicitly and
//! started/stopped by the host application.

pub mod error;
pub mod factory;
pub mod manager;
pub mod models;
pub mod options;
pub mod postgres;
pub mod repos;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::DbError;
pub use factory::{ConnectionFactory, SessionFactory, SessionScope, TransactionScope};
pub use manager::ConnectionManager;
pub use options::{DatabaseConfig, PoolOptions};
pub use postgres::{PgConnectionFactory, PgSession, PgTransaction};

/// Connection manager over the pooled Postgres factory.
pub type PgConnectionManager = ConnectionManager<PgConnectionFactory>;
