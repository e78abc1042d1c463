//! The rendering engine: which SQL dialect expressions are rendered for.
//!
//! A process-wide engine slot plays the role of "the current connection's
//! visitor". [`SausageExpr::to_sql`](crate::SausageExpr::to_sql) reads it and
//! fails with [`SausageError::NotConfigured`] while it is empty. Everything
//! else can render against an explicit [`Dialect`] instead.

use crate::config::DatabaseConfig;
use crate::error::SausageError;
use once_cell::sync::Lazy;
use sea_query::{
    DynIden, Expr, MysqlQueryBuilder, PostgresQueryBuilder, Query, SelectStatement,
    SqliteQueryBuilder, Value,
};
use std::fmt;
use std::str::FromStr;
use std::sync::RwLock;

static ENGINE: Lazy<RwLock<Option<Dialect>>> = Lazy::new(|| RwLock::new(None));

/// SQL dialect, mapped onto a sea-query `QueryBuilder`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Postgres,
    MySql,
    Sqlite,
}

impl Dialect {
    /// Render a full SELECT statement with values inlined
    pub fn render_select(self, stmt: &SelectStatement) -> String {
        match self {
            Dialect::Postgres => stmt.to_string(PostgresQueryBuilder),
            Dialect::MySql => stmt.to_string(MysqlQueryBuilder),
            Dialect::Sqlite => stmt.to_string(SqliteQueryBuilder),
        }
    }

    /// Render a bare expression
    pub fn render(self, expr: Expr) -> String {
        let stmt = Query::select().expr(expr).to_owned();
        strip_select(self.render_select(&stmt))
    }

    /// Render `<expr> AS <alias>` with the alias quoted for this dialect
    pub fn render_aliased(self, expr: Expr, alias: &str) -> String {
        let stmt = Query::select().expr_as(expr, DynIden::from(alias.to_string())).to_owned();
        strip_select(self.render_select(&stmt))
    }

    /// Quote a literal value the way this dialect's builder does
    pub fn quote<V: Into<Value>>(self, value: V) -> String {
        self.render(Expr::val(value))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Postgres => "postgres",
            Dialect::MySql => "mysql",
            Dialect::Sqlite => "sqlite",
        }
    }
}

fn strip_select(sql: String) -> String {
    match sql.strip_prefix("SELECT ") {
        Some(rest) => rest.to_string(),
        None => sql,
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = SausageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            "mysql" | "mariadb" => Ok(Dialect::MySql),
            "sqlite" | "sqlite3" => Ok(Dialect::Sqlite),
            other => Err(SausageError::UnknownDialect(other.to_string())),
        }
    }
}

/// Install `dialect` as the process-wide engine, replacing any previous one.
pub fn establish(dialect: Dialect) {
    let mut slot = ENGINE.write().unwrap_or_else(|e| e.into_inner());
    if *slot != Some(dialect) {
        log::info!("sausage engine established: {dialect}");
    }
    *slot = Some(dialect);
}

/// Install the engine named by `config.dialect`.
pub fn establish_from_config(config: &DatabaseConfig) -> Result<Dialect, SausageError> {
    let dialect = config.dialect.parse()?;
    establish(dialect);
    Ok(dialect)
}

/// Clear the engine slot; later `to_sql` calls fail until re-established.
pub fn disconnect() {
    let mut slot = ENGINE.write().unwrap_or_else(|e| e.into_inner());
    if slot.take().is_some() {
        log::info!("sausage engine disconnected");
    }
}

/// The currently established dialect.
pub fn current() -> Result<Dialect, SausageError> {
    ENGINE
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .ok_or(SausageError::NotConfigured)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_query::ExprTrait;

    #[test]
    fn test_dialect_from_str() {
        assert_eq!("Postgres".parse::<Dialect>().unwrap(), Dialect::Postgres);
        assert_eq!("sqlite3".parse::<Dialect>().unwrap(), Dialect::Sqlite);
        assert_eq!("mariadb".parse::<Dialect>().unwrap(), Dialect::MySql);
        assert!(matches!(
            "oracle".parse::<Dialect>(),
            Err(SausageError::UnknownDialect(name)) if name == "oracle"
        ));
    }

    #[test]
    fn test_render_bare_expression() {
        let sql = Dialect::Postgres.render(Expr::col("age").gt(18));
        assert_eq!(sql, r#""age" > 18"#);

        let sql = Dialect::MySql.render(Expr::col("age").gt(18));
        assert_eq!(sql, "`age` > 18");
    }

    #[test]
    fn test_render_aliased() {
        let sql = Dialect::Postgres.render_aliased(Expr::col("price"), "price_sum");
        assert_eq!(sql, r#""price" AS "price_sum""#);
    }

    #[test]
    fn test_quote_literals() {
        assert_eq!(Dialect::Sqlite.quote("abc"), "'abc'");
        assert_eq!(Dialect::Postgres.quote(7), "7");
        assert_ne!(Dialect::Postgres.quote("it's"), "'it's'");
    }

    #[test]
    fn test_establish_from_config() {
        let config = DatabaseConfig {
            dialect: "postgres".to_string(),
            ..DatabaseConfig::default()
        };
        assert_eq!(establish_from_config(&config).unwrap(), Dialect::Postgres);
        assert_eq!(current().unwrap(), Dialect::Postgres);

        let bad = DatabaseConfig {
            dialect: "db2".to_string(),
            ..DatabaseConfig::default()
        };
        assert!(establish_from_config(&bad).is_err());
        // A rejected config leaves the engine untouched
        assert_eq!(current().unwrap(), Dialect::Postgres);
    }
}
