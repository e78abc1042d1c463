//! Relations: SELECT statements scoped to a model's table.
//!
//! Wraps a sea-query `SelectStatement` the same way the model layer's finders
//! need it: filters, custom select lists (aggregates with aliases), limits,
//! and execution through a [`LifeExecutor`].

use crate::engine::{self, Dialect};
use crate::error::SausageError;
use crate::executor::{LifeExecutor, Record};
use crate::expr::{Aliased, SausageExpr};
use sea_query::{Asterisk, DynIden, Expr, Query, SelectStatement};

/// Predicate that no row satisfies
pub const FALSE_PREDICATE: &str = "1 = 0";

/// A SELECT over one table
///
/// # Example
///
/// ```
/// use awesome_sausage::{Dialect, Relation, SausageExpr};
///
/// let rel = Relation::new("users")
///     .filter(SausageExpr::table_column("users", "age").gt(30))
///     .limit(5);
/// assert_eq!(
///     rel.to_sql_with(Dialect::Postgres),
///     r#"SELECT "users".* FROM "users" WHERE "users"."age" > 30 LIMIT 5"#
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Relation {
    table: String,
    query: SelectStatement,
    dialect: Option<Dialect>,
}

impl Relation {
    /// `SELECT "<table>".* FROM "<table>"`
    pub fn new(table: &str) -> Self {
        let iden = DynIden::from(table.to_string());
        let mut query = Query::select();
        query.column((iden.clone(), Asterisk)).from(iden);
        Self {
            table: table.to_string(),
            query,
            dialect: None,
        }
    }

    /// A relation guaranteed to match zero rows
    pub fn empty(table: &str) -> Self {
        Self::new(table).filter(Expr::cust(FALSE_PREDICATE))
    }

    /// Render with `dialect` instead of the established engine
    pub fn with_dialect(mut self, dialect: Option<Dialect>) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn statement(&self) -> &SelectStatement {
        &self.query
    }

    /// AND a condition into the WHERE clause
    pub fn filter<E: Into<Expr>>(mut self, condition: E) -> Self {
        self.query.and_where(condition.into());
        self
    }

    /// Drop every select-list entry, including the default `"<table>".*`
    pub fn select_only(mut self) -> Self {
        self.query.clear_selects();
        self
    }

    pub fn select<E: Into<Expr>>(mut self, expr: E) -> Self {
        self.query.expr(expr.into());
        self
    }

    /// Append `<expr> AS <alias>`
    pub fn select_aliased(mut self, aliased: &Aliased) -> Self {
        aliased.select_into(&mut self.query);
        self
    }

    /// Append `<expr> AS <alias>` for an expression without a built-in alias
    pub fn select_as(mut self, expr: SausageExpr, alias: &str) -> Self {
        Aliased::new(expr, alias).select_into(&mut self.query);
        self
    }

    pub fn group_by(mut self, column: &str) -> Self {
        self.query.group_by_col(DynIden::from(column.to_string()));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.query.limit(limit);
        self
    }

    /// Dialect this relation renders with
    ///
    /// # Errors
    ///
    /// [`SausageError::NotConfigured`] when neither the relation nor the
    /// process has a dialect.
    pub fn dialect(&self) -> Result<Dialect, SausageError> {
        match self.dialect {
            Some(d) => Ok(d),
            None => engine::current(),
        }
    }

    pub fn to_sql(&self) -> Result<String, SausageError> {
        Ok(self.to_sql_with(self.dialect()?))
    }

    pub fn to_sql_with(&self, dialect: Dialect) -> String {
        dialect.render_select(&self.query)
    }

    /// Run the query and return every row
    pub fn all<E: LifeExecutor + ?Sized>(&self, executor: &E) -> Result<Vec<Record>, SausageError> {
        let sql = self.to_sql()?;
        Ok(executor.query_all(&sql)?)
    }

    /// Run the query with `LIMIT 1`; `None` when nothing matches
    pub fn first<E: LifeExecutor + ?Sized>(&self, executor: &E) -> Result<Option<Record>, SausageError> {
        let sql = self.clone().limit(1).to_sql()?;
        Ok(executor.query_first(&sql)?)
    }
}
