//! Expression decoration.
//!
//! [`SausageExpr`] wraps a `sea_query::Expr` and adds the convenience surface
//! used throughout the crate:
//!
//! - **Comparisons**: `lt`, `lteq`, `gt`, `gteq`, `eq`, `not_eq`, `matches`,
//!   `does_not_match`, plus symbolic dispatch through [`CompareOp`]
//! - **Arithmetic**: `+ - * / %` via `std::ops`, and [`SausageExpr::int_div`]
//! - **Membership**: [`SausageExpr::is`] / [`SausageExpr::is_not`]
//! - **Aggregates**: `sum`/`count`/`average` and their aliased forms
//! - **Rendering**: [`SausageExpr::to_sql`] against the established engine
//!
//! Every operation consumes the node and returns a new decorated node, so
//! calls chain freely.
//!
//! # Examples
//!
//! ```
//! use awesome_sausage::{Dialect, SausageExpr};
//!
//! let age = SausageExpr::table_column("users", "age");
//! let adult = age.gteq(18).and(SausageExpr::table_column("users", "active").eq(true));
//! let sql = adult.to_sql_with(Dialect::Postgres);
//! assert!(sql.starts_with(r#""users"."age" >= 18 AND "#));
//! ```

mod aggregate;
mod operators;

pub use aggregate::Aliased;
pub use operators::{CompareOp, OPERATOR_TABLE};

use crate::engine::{self, Dialect};
use crate::error::SausageError;
use sea_query::{Asterisk, BinOper, DynIden, Expr, ExprTrait, Value};

/// Alias stem used by aggregate helpers on nodes that carry no name
pub const DEFAULT_ALIAS_STEM: &str = "expr";

/// A decorated expression node
#[derive(Debug, Clone, PartialEq)]
pub struct SausageExpr {
    expr: Expr,
    name: Option<String>,
}

impl SausageExpr {
    /// Decorate an arbitrary node. The result carries no name.
    pub fn new<E: Into<Expr>>(expr: E) -> Self {
        Self {
            expr: expr.into(),
            name: None,
        }
    }

    /// Decorate a node and give it a human-readable name for default aliases
    pub fn named<E: Into<Expr>, N: Into<String>>(expr: E, name: N) -> Self {
        Self {
            expr: expr.into(),
            name: Some(name.into()),
        }
    }

    /// Unqualified column reference
    pub fn column(column: &str) -> Self {
        Self::named(Expr::col(DynIden::from(column.to_string())), column)
    }

    /// Table-qualified column reference, named after the column
    pub fn table_column(table: &str, column: &str) -> Self {
        let col = (
            DynIden::from(table.to_string()),
            DynIden::from(column.to_string()),
        );
        Self::named(Expr::col(col), column)
    }

    /// `"<table>".*`, named `*`
    pub fn table_star(table: &str) -> Self {
        Self::named(Expr::col((DynIden::from(table.to_string()), Asterisk)), "*")
    }

    /// Raw SQL fragment
    pub fn sql<S: Into<String>>(sql: S) -> Self {
        Self::new(Expr::cust(sql.into()))
    }

    /// The node's name, if it has one
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn into_expr(self) -> Expr {
        self.expr
    }

    pub(crate) fn alias_stem(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_ALIAS_STEM)
    }

    /// Render with the established engine.
    ///
    /// # Errors
    ///
    /// Returns [`SausageError::NotConfigured`] when no engine is established.
    pub fn to_sql(&self) -> Result<String, SausageError> {
        let dialect = engine::current()?;
        Ok(self.to_sql_with(dialect))
    }

    /// Render for an explicit dialect
    pub fn to_sql_with(&self, dialect: Dialect) -> String {
        dialect.render(self.expr.clone())
    }

    pub fn lt<R: Into<Expr>>(self, other: R) -> Self {
        Self::new(ExprTrait::lt(self.expr, other))
    }

    pub fn lteq<R: Into<Expr>>(self, other: R) -> Self {
        Self::new(ExprTrait::lte(self.expr, other))
    }

    pub fn gt<R: Into<Expr>>(self, other: R) -> Self {
        Self::new(ExprTrait::gt(self.expr, other))
    }

    pub fn gteq<R: Into<Expr>>(self, other: R) -> Self {
        Self::new(ExprTrait::gte(self.expr, other))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn eq<R: Into<Expr>>(self, other: R) -> Self {
        Self::new(ExprTrait::eq(self.expr, other))
    }

    pub fn not_eq<R: Into<Expr>>(self, other: R) -> Self {
        Self::new(ExprTrait::ne(self.expr, other))
    }

    /// `self LIKE pattern`
    pub fn matches<R: Into<Expr>>(self, pattern: R) -> Self {
        Self::new(ExprTrait::binary(self.expr, BinOper::Like, pattern))
    }

    /// `self NOT LIKE pattern`
    pub fn does_not_match<R: Into<Expr>>(self, pattern: R) -> Self {
        Self::new(ExprTrait::binary(self.expr, BinOper::NotLike, pattern))
    }

    /// Integer division, rendered as infix `DIV`
    pub fn int_div<R: Into<Expr>>(self, other: R) -> Self {
        Self::new(ExprTrait::binary(self.expr, BinOper::Custom("DIV"), other))
    }

    pub fn and<R: Into<Expr>>(self, other: R) -> Self {
        Self::new(ExprTrait::and(self.expr, other))
    }

    pub fn or<R: Into<Expr>>(self, other: R) -> Self {
        Self::new(ExprTrait::or(self.expr, other))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self::new(ExprTrait::not(self.expr))
    }

    #[allow(clippy::wrong_self_convention)]
    pub fn is_in<V, I>(self, values: I) -> Self
    where
        V: Into<Expr>,
        I: IntoIterator<Item = V>,
    {
        Self::new(ExprTrait::is_in(self.expr, values))
    }

    #[allow(clippy::wrong_self_convention)]
    pub fn is_not_in<V, I>(self, values: I) -> Self
    where
        V: Into<Expr>,
        I: IntoIterator<Item = V>,
    {
        Self::new(ExprTrait::is_not_in(self.expr, values))
    }

    #[allow(clippy::wrong_self_convention)]
    pub fn is_null(self) -> Self {
        Self::new(ExprTrait::is_null(self.expr))
    }

    #[allow(clippy::wrong_self_convention)]
    pub fn is_not_null(self) -> Self {
        Self::new(ExprTrait::is_not_null(self.expr))
    }

    /// Equality against one value, membership against several.
    ///
    /// Values are de-duplicated in first-seen order before counting, so
    /// `is([3, 3])` is the same as `is([3])`.
    ///
    /// # Errors
    ///
    /// Returns [`SausageError::InvalidArgumentCount`] for an empty list.
    ///
    /// # Examples
    ///
    /// ```
    /// use awesome_sausage::{Dialect, SausageExpr};
    ///
    /// let one = SausageExpr::column("id").is([7]).unwrap();
    /// assert_eq!(one.to_sql_with(Dialect::Postgres), r#""id" = 7"#);
    ///
    /// let many = SausageExpr::column("id").is([7, 8, 7]).unwrap();
    /// assert_eq!(many.to_sql_with(Dialect::Postgres), r#""id" IN (7, 8)"#);
    /// ```
    #[allow(clippy::wrong_self_convention)]
    pub fn is<V, I>(self, values: I) -> Result<Self, SausageError>
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        let mut unique: Vec<Value> = Vec::new();
        for value in values {
            let value: Value = value.into();
            if !unique.contains(&value) {
                unique.push(value);
            }
        }

        match unique.len() {
            0 => Err(SausageError::InvalidArgumentCount {
                given: 0,
                expected: "1+",
            }),
            1 => {
                let value = unique.remove(0);
                Ok(self.eq(value))
            }
            _ => Ok(self.is_in(unique)),
        }
    }

    /// `NOT (self.is(values))`.
    ///
    /// The whole equality/membership test is negated; the negation is not
    /// distributed over the individual values.
    ///
    /// # Errors
    ///
    /// Same as [`SausageExpr::is`].
    #[allow(clippy::wrong_self_convention)]
    pub fn is_not<V, I>(self, values: I) -> Result<Self, SausageError>
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        Ok(self.is(values)?.not())
    }
}

impl From<SausageExpr> for Expr {
    fn from(node: SausageExpr) -> Self {
        node.expr
    }
}
