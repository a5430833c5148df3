//! Repository implementations for database access
//!
//! Repositories borrow a `&mut PgConnection`, so they run inside either a
//! `with_connection` transaction or a session.

pub mod users;

pub use users::UserRepo;
