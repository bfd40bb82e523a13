//! # Pepper Journal Database Crate
//!
//! This crate is the application-specific interface to the PostgreSQL database
//! that stores plants and their care journals.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** All SQL lives here. Callers work with the `PlantRepository` and
//!   `JournalRepository` traits and the `core-types` structs, never with rows.
//! - **Parameterized only:** Every statement is a fixed string with bound
//!   parameters; user input is never spliced into SQL.
//! - **Asynchronous & Pooled:** All operations are asynchronous and share one
//!   `PgPool`, opened once at startup with bounded retries.
//!
//! ## Public API
//!
//! - `connect`: Opens the pool (retries, pool limits, liveness check).
//! - `run_migrations`: Applies the embedded schema migrations.
//! - `PlantRepository` / `JournalRepository`: The data access contracts.
//! - `DbRepository`: The Postgres implementation of both.
//! - `MemoryRepository` (feature `testing`): An in-process implementation for tests.
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
#[cfg(any(test, feature = "testing"))]
pub mod memory;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations, with_retries};
pub use error::DbError;
#[cfg(any(test, feature = "testing"))]
pub use memory::MemoryRepository;
pub use repository::{DbRepository, JournalRepository, PlantRepository};
