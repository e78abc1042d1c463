//! Class-level expression helpers: CASE builders, conditional aggregates
//! and named SQL functions.

use super::decorator::Sausage;
use crate::engine::Dialect;
use crate::error::SausageError;
use crate::expr::SausageExpr;
use sea_query::{DynIden, Expr, Func};

impl Sausage {
    /// `CASE WHEN <condition> THEN 1 ELSE NULL END`
    ///
    /// # Errors
    ///
    /// [`SausageError::NotConfigured`] when no dialect is available to render
    /// the condition.
    pub fn make_if<C: Into<Expr>>(&self, condition: C) -> Result<SausageExpr, SausageError> {
        self.make_if_with(condition, None, None)
    }

    /// `CASE WHEN <condition> THEN <then> ELSE <otherwise> END`.
    ///
    /// `then` defaults to `1` and `otherwise` to `NULL`. Expressions are
    /// rendered as SQL; plain values (`Expr::val`) are quoted by the dialect.
    ///
    /// # Examples
    ///
    /// ```
    /// use awesome_sausage::{attach, Dialect, ModelClass};
    /// use sea_query::Expr;
    ///
    /// let orders = ModelClass::subclass(&ModelClass::base(), "Order")
    ///     .columns(["status", "total"])
    ///     .dialect(Dialect::Postgres)
    ///     .build();
    /// attach(&orders).unwrap();
    /// let model = orders.sausage().unwrap();
    ///
    /// let paid = model.col("status").unwrap().eq("paid");
    /// let node = model
    ///     .make_if_with(paid, Some(model.col("total").unwrap().into()), Some(Expr::val(0)))
    ///     .unwrap();
    /// assert_eq!(
    ///     node.to_sql_with(Dialect::Postgres),
    ///     r#"CASE WHEN "orders"."status" = 'paid' THEN "orders"."total" ELSE 0 END"#
    /// );
    /// ```
    pub fn make_if_with<C: Into<Expr>>(
        &self,
        condition: C,
        then: Option<Expr>,
        otherwise: Option<Expr>,
    ) -> Result<SausageExpr, SausageError> {
        let dialect = self.dialect()?;
        let then = sqlify(dialect, then).unwrap_or_else(|| "1".to_string());
        let otherwise = sqlify(dialect, otherwise).unwrap_or_else(|| "NULL".to_string());
        let sql = format!(
            "CASE WHEN {} THEN {then} ELSE {otherwise} END",
            dialect.render(condition.into())
        );
        Ok(SausageExpr::named(Expr::cust(sql), "case"))
    }

    /// `COUNT(CASE WHEN <condition> THEN 1 ELSE NULL END)`: rows where
    /// `condition` holds
    pub fn count_if<C: Into<Expr>>(&self, condition: C) -> Result<SausageExpr, SausageError> {
        Ok(self.make_if(condition)?.count())
    }

    /// `SUM(CASE WHEN <condition> THEN 1 ELSE NULL END)`
    pub fn sum_if<C: Into<Expr>>(&self, condition: C) -> Result<SausageExpr, SausageError> {
        Ok(self.make_if(condition)?.sum())
    }

    /// Multi-branch CASE.
    ///
    /// With a `switch` this is `CASE <switch> WHEN <key> THEN '<value>' ...
    /// ELSE '<default>' END`; without one the switch clause is left empty and
    /// each key acts as a condition. Branch values and the default are always
    /// string literals.
    ///
    /// Keys are rendered like any other expression: a column or condition is
    /// inlined as SQL, while a plain value is quoted by the dialect, so the
    /// key `"a"` becomes `WHEN 'a'`. Use [`SausageExpr::sql`] for a raw key.
    ///
    /// # Errors
    ///
    /// [`SausageError::NotConfigured`] when no dialect is available.
    pub fn case_when<I, K, V>(
        &self,
        switch: Option<Expr>,
        branches: I,
        default: Option<&str>,
    ) -> Result<SausageExpr, SausageError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Expr>,
        V: Into<String>,
    {
        let dialect = self.dialect()?;
        let mut sql = String::from("CASE ");
        if let Some(switch) = sqlify(dialect, switch) {
            sql.push_str(&switch);
        }
        sql.push(' ');
        for (key, value) in branches {
            let value: String = value.into();
            sql.push_str(&format!(
                "WHEN {} THEN {} ",
                dialect.render(key.into()),
                dialect.quote(value)
            ));
        }
        if let Some(default) = default {
            sql.push_str(&format!("ELSE {} ", dialect.quote(default)));
        }
        sql.push_str("END");
        Ok(SausageExpr::named(Expr::cust(sql), "case"))
    }

    /// `<name>(<args>)`, named after the function
    pub fn function<I, A>(&self, name: &str, args: I) -> SausageExpr
    where
        I: IntoIterator<Item = A>,
        A: Into<Expr>,
    {
        let args: Vec<Expr> = args.into_iter().map(Into::into).collect();
        let call = Func::cust(DynIden::from(name.to_string())).args(args);
        SausageExpr::named(Expr::from(call), name)
    }
}

fn sqlify(dialect: Dialect, term: Option<Expr>) -> Option<String> {
    term.map(|t| dialect.render(t))
}
