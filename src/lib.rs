//! # Awesome Sausage
//!
//! Syntactic sugar over `sea-query` expressions.
//!
//! - [`SausageExpr`] decorates any expression node with operator aliases,
//!   `is`/`is_not`, aliased aggregates and `to_sql`.
//! - [`attach`] decorates a [`ModelClass`] with memoized column accessors,
//!   `*`/`none`, finders, `make_if`/`count_if`/`sum_if`, `case_when` and
//!   `function`.
//!
//! Rendering goes through a [`Dialect`]; [`engine::establish`] sets the
//! process-wide one used by [`SausageExpr::to_sql`].

pub mod config;
pub mod connection;
pub mod engine;
pub mod error;
pub mod executor;
pub mod expr;
pub mod logging;
pub mod model;
pub mod relation;

pub use config::DatabaseConfig;
pub use connection::{connect, establish_connection, ConnectionError};
pub use engine::Dialect;
pub use error::SausageError;
pub use executor::{LifeError, LifeExecutor, MayPostgresExecutor, Record};
pub use expr::{Aliased, CompareOp, SausageExpr};
pub use model::{attach, attach_global, ModelClass, Sausage};
pub use relation::Relation;
