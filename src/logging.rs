//! Logging and span helpers.
//!
//! Operator-facing messages go through the `log` facade. With the `tracing`
//! feature enabled, executor calls and attachments are wrapped in spans and
//! [`init_tracing`] installs a `fmt` subscriber for binaries and tests.

#[cfg(feature = "tracing")]
pub mod tracing_helpers {
    use tracing::Span;

    /// Longest SQL prefix recorded on a span
    const SQL_PREVIEW_LEN: usize = 200;

    /// Span around a single executor round trip
    pub fn execute_query_span(query: &str) -> Span {
        let preview: String = query.chars().take(SQL_PREVIEW_LEN).collect();
        tracing::info_span!("sausage.execute_query", db.statement = %preview)
    }

    /// Span around `attach` / `attach_global`
    pub fn attach_span(class: &str) -> Span {
        tracing::debug_span!("sausage.attach", model = %class)
    }

    /// Span around establishing a connection
    pub fn acquire_connection_span() -> Span {
        tracing::info_span!("sausage.acquire_connection")
    }
}

/// Install a global `fmt` subscriber filtering at `max_level`.
///
/// Returns `false` when a global subscriber was already set.
#[cfg(feature = "tracing")]
pub fn init_tracing(max_level: tracing::Level) -> bool {
    tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_test_writer()
        .try_init()
        .is_ok()
}

#[cfg(all(test, feature = "tracing"))]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_is_idempotent() {
        let _ = init_tracing(tracing::Level::DEBUG);
        assert!(!init_tracing(tracing::Level::DEBUG));
    }

    #[test]
    fn test_execute_query_span_truncates_long_sql() {
        let sql = "SELECT ".to_string() + &"x, ".repeat(500);
        let _entered = tracing_helpers::execute_query_span(&sql).entered();
    }
}
