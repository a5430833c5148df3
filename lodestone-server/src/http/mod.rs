//! HTTP server layer
//!
//! Axum server with:
//! - Routes nested under `/api/v1`
//! - CORS (localhost only by default)
//! - Request tracing
//! - Graceful shutdown followed by the database shutdown hook
//! - JSON error responses

pub mod error;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, serve, ServerConfig, ServerError};
