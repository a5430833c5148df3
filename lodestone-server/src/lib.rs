//! lodestone-server: HTTP surface and database lifecycle hooks
//!
//! Serves the health routes under `/api/v1` and owns the startup/shutdown
//! sequence of the shared [`ConnectionManager`](lodestone_db::ConnectionManager).

pub mod http;
pub mod lifecycle;
pub mod state;

pub use http::{build_router, serve, ApiError, ServerConfig, ServerError};
pub use state::AppState;
