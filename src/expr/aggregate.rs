//! Aggregate helpers and output-column aliases.

use super::SausageExpr;
use crate::engine::{self, Dialect};
use crate::error::SausageError;
use sea_query::{DynIden, Expr, Func, SelectStatement};

/// An expression paired with the alias it takes in a select list
#[derive(Debug, Clone, PartialEq)]
pub struct Aliased {
    expr: SausageExpr,
    alias: String,
}

impl Aliased {
    pub fn new<A: Into<String>>(expr: SausageExpr, alias: A) -> Self {
        Self {
            expr,
            alias: alias.into(),
        }
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn expr(&self) -> &SausageExpr {
        &self.expr
    }

    pub fn into_parts(self) -> (SausageExpr, String) {
        (self.expr, self.alias)
    }

    /// Append `<expr> AS <alias>` to a select list
    pub fn select_into(&self, stmt: &mut SelectStatement) {
        stmt.expr_as(self.expr.expr().clone(), DynIden::from(self.alias.clone()));
    }

    /// Render `<expr> AS <alias>` with the established engine.
    ///
    /// # Errors
    ///
    /// Returns [`SausageError::NotConfigured`] when no engine is established.
    pub fn to_sql(&self) -> Result<String, SausageError> {
        Ok(self.to_sql_with(engine::current()?))
    }

    pub fn to_sql_with(&self, dialect: Dialect) -> String {
        dialect.render_aliased(self.expr.expr().clone(), &self.alias)
    }
}

impl SausageExpr {
    /// `SUM(self)` with no alias
    pub fn sum(self) -> SausageExpr {
        SausageExpr::new(Expr::from(Func::sum(self.expr)))
    }

    /// `COUNT(self)` with no alias
    pub fn count(self) -> SausageExpr {
        SausageExpr::new(Expr::from(Func::count(self.expr)))
    }

    /// `AVG(self)` with no alias
    pub fn average(self) -> SausageExpr {
        SausageExpr::new(Expr::from(Func::avg(self.expr)))
    }

    /// `SUM(self) AS "<alias or name>_sum"`
    pub fn sums(self, alias: Option<&str>) -> Aliased {
        let alias = suffixed(alias, &self, "sum");
        Aliased::new(self.sum(), alias)
    }

    /// `COUNT(self) AS "<alias or name>_count"`
    pub fn counts(self, alias: Option<&str>) -> Aliased {
        let alias = suffixed(alias, &self, "count");
        Aliased::new(self.count(), alias)
    }

    /// `AVG(self) AS "<alias or name>_average"`
    pub fn averages(self, alias: Option<&str>) -> Aliased {
        let alias = suffixed(alias, &self, "average");
        Aliased::new(self.average(), alias)
    }

    /// `SUM(self) / SUM(divisor) AS "<alias or name>_pct"`.
    ///
    /// Both inner sums are unaliased so the quotient nests cleanly.
    ///
    /// # Examples
    ///
    /// ```
    /// use awesome_sausage::{Dialect, SausageExpr};
    ///
    /// let won = SausageExpr::column("won");
    /// let played = SausageExpr::column("played");
    /// let pct = won.percentages(played, None);
    /// assert_eq!(pct.alias(), "won_pct");
    /// assert_eq!(
    ///     pct.to_sql_with(Dialect::Postgres),
    ///     r#"SUM("won") / SUM("played") AS "won_pct""#
    /// );
    /// ```
    pub fn percentages(self, divisor: SausageExpr, alias: Option<&str>) -> Aliased {
        let alias = suffixed(alias, &self, "pct");
        Aliased::new(self.sum() / divisor.sum(), alias)
    }
}

fn suffixed(alias: Option<&str>, node: &SausageExpr, suffix: &str) -> String {
    format!("{}_{suffix}", alias.unwrap_or_else(|| node.alias_stem()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_query::{Asterisk, Query};

    #[test]
    fn test_default_aliases_use_node_name() {
        let price = || SausageExpr::table_column("orders", "price");
        assert_eq!(price().sums(None).alias(), "price_sum");
        assert_eq!(price().counts(None).alias(), "price_count");
        assert_eq!(price().averages(None).alias(), "price_average");
    }

    #[test]
    fn test_explicit_alias_wins() {
        let total = SausageExpr::column("price").sums(Some("revenue"));
        assert_eq!(total.alias(), "revenue_sum");
        assert_eq!(
            total.to_sql_with(Dialect::Postgres),
            r#"SUM("price") AS "revenue_sum""#
        );
    }

    #[test]
    fn test_unnamed_node_alias() {
        let node = (SausageExpr::column("a") + SausageExpr::column("b")).sums(None);
        assert_eq!(node.alias(), "expr_sum");
    }

    #[test]
    fn test_average_renders_avg() {
        let sql = SausageExpr::column("score").averages(None).to_sql_with(Dialect::Sqlite);
        assert_eq!(sql, r#"AVG("score") AS "score_average""#);
    }

    #[test]
    fn test_percentages_inner_sums_are_unaliased() {
        let pct = SausageExpr::column("won").percentages(SausageExpr::column("played"), Some("win"));
        assert_eq!(pct.alias(), "win_pct");
        let sql = pct.to_sql_with(Dialect::Postgres);
        assert_eq!(sql.matches(" AS ").count(), 1, "{sql}");
        assert!(sql.starts_with(r#"SUM("won") / SUM("played")"#), "{sql}");
    }

    #[test]
    fn test_select_into_appends_alias() {
        let mut stmt = Query::select();
        stmt.from(DynIden::from("orders".to_string()));
        SausageExpr::column("price").counts(None).select_into(&mut stmt);
        let sql = Dialect::Postgres.render_select(&stmt);
        assert_eq!(sql, r#"SELECT COUNT("price") AS "price_count" FROM "orders""#);
    }

    #[test]
    fn test_count_star() {
        let sql = SausageExpr::new(Expr::col(Asterisk)).count().to_sql_with(Dialect::Postgres);
        assert_eq!(sql, "COUNT(*)");
    }
}
