//! Error type shared by the expression and model decorators.
//!
//! Every failure in this crate is immediate and synchronous. Errors raised by
//! the executor or the configuration loader are carried through unchanged.

use crate::executor::LifeError;
use std::fmt;

/// Errors produced by `awesome_sausage`
#[derive(Debug)]
pub enum SausageError {
    /// The decorator was attached to a class outside the mapped-model hierarchy
    Attachment(String),
    /// A variadic helper received the wrong number of values
    InvalidArgumentCount {
        /// Number of values actually supplied (after de-duplication)
        given: usize,
        /// Human readable expectation, e.g. `1+`
        expected: &'static str,
    },
    /// `find_by_or_fail` matched no row
    NotFound(String),
    /// Rendering was requested before any engine was established
    NotConfigured,
    /// An operator token with no entry in the alias table
    UnknownOperator(String),
    /// A column accessor that was never registered on the class
    UnknownAccessor(String),
    /// A dialect name that does not map to a query builder
    UnknownDialect(String),
    /// Failure reported by the executor
    Query(LifeError),
    /// Failure reported by the configuration loader
    Config(config::ConfigError),
}

impl fmt::Display for SausageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SausageError::Attachment(s) => write!(f, "Attachment error: {s}"),
            SausageError::InvalidArgumentCount { given, expected } => {
                write!(f, "wrong number of arguments ({given} for {expected})")
            }
            SausageError::NotFound(s) => write!(f, "Not Found: {s}"),
            SausageError::NotConfigured => {
                write!(f, "No database engine established; call engine::establish first")
            }
            SausageError::UnknownOperator(op) => write!(f, "Unknown operator: {op}"),
            SausageError::UnknownAccessor(name) => write!(f, "Unknown column accessor: {name}"),
            SausageError::UnknownDialect(name) => write!(f, "Unknown dialect: {name}"),
            SausageError::Query(e) => write!(f, "{e}"),
            SausageError::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl std::error::Error for SausageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SausageError::Query(e) => Some(e),
            SausageError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LifeError> for SausageError {
    fn from(err: LifeError) -> Self {
        SausageError::Query(err)
    }
}

impl From<config::ConfigError> for SausageError {
    fn from(err: config::ConfigError) -> Self {
        SausageError::Config(err)
    }
}
