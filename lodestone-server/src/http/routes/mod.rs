//! Route handlers organized by resource

pub mod health;

use axum::Router;
use lodestone_db::ConnectionFactory;

use crate::state::AppState;

/// Routes served under `/api/v1`
pub fn api_router<F: ConnectionFactory>() -> Router<AppState<F>> {
    Router::new().merge(health::router::<F>())
}
