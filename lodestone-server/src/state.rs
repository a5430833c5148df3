//! Application state shared across handlers

use std::sync::Arc;

use lodestone_db::{ConnectionFactory, ConnectionManager, PgConnectionFactory};

/// Shared application state
pub struct AppState<F: ConnectionFactory = PgConnectionFactory> {
    db: Arc<ConnectionManager<F>>,
}

impl<F: ConnectionFactory> AppState<F> {
    pub fn new(db: Arc<ConnectionManager<F>>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &ConnectionManager<F> {
        &self.db
    }
}

// Derived Clone would require F: Clone.
impl<F: ConnectionFactory> Clone for AppState<F> {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
        }
    }
}
