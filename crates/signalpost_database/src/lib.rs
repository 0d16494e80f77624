//! PostgreSQL storage for signalpost.
//!
//! Diesel models and a [`PostgresRepository`] implementing the
//! [`signalpost_interface::Repository`] trait over an r2d2 pool.
//!
//! # Example
//!
//! ```rust,ignore
//! use signalpost_database::{PostgresRepository, pool_from_env, run_migrations};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = pool_from_env(8)?;
//! run_migrations(&pool)?;
//! let repo = PostgresRepository::new(pool);
//! # Ok(())
//! # }
//! ```

mod connection;
mod models;
mod repository;

pub mod schema;

pub use connection::{MIGRATIONS, PgPool, build_pool, pool_from_env, run_migrations};
pub use models::{
    NewPostRow, NewWinBatchRow, NewWinMessageRow, NewWinPercentRow, PostRow, UpdatePostRow,
    WinBatchRow, WinMessageRow, WinPercentRow,
};
pub use repository::PostgresRepository;

use signalpost_error::DatabaseError;

/// Result type for database operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;
