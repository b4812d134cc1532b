//! # Pollbox Database Crate
//!
//! This crate acts as a high-level, application-specific interface to the
//! PostgreSQL database. It is the system's sole source of truth.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** This crate encapsulates all database-specific logic. It
//!   provides a clean, abstract API to the rest of the application, hiding
//!   the underlying SQL and the engine's error codes.
//! - **Stateless:** Every operation is a synchronous request/response against
//!   stored rows; no state is held between calls.
//! - **Asynchronous & Pooled:** All operations are asynchronous, over a
//!   connection pool (`PgPool`) shared across the application.
//!
//! ## Public API
//!
//! - `connect`: The async function to establish the database connection pool,
//!   with a bounded fixed-delay retry loop.
//! - `ensure_schema`: Idempotently creates the poll tables at startup.
//! - `PollRepository`: The main struct that holds the connection pool and
//!   provides all the high-level data access methods (e.g., `create_poll`,
//!   `get_poll_and_vote_results`).
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;
pub mod schema;

// Re-export the key components to create a clean, public-facing API.
pub use connection::connect;
pub use error::DbError;
pub use repository::{OptionTally, Poll, PollOptionDetail, PollRepository};
pub use schema::ensure_schema;
