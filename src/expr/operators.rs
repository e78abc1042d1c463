//! Operator aliases.
//!
//! Comparison symbols map onto the named comparison methods through a static
//! table. Arithmetic goes through `std::ops`, so `price * 2 + tax` builds a
//! decorated node directly.

use super::SausageExpr;
use crate::error::SausageError;
use sea_query::{BinOper, Expr, ExprTrait};
use std::ops::{Add, Div, Mul, Rem, Sub};

/// Named comparison an operator token resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Lt,
    Lteq,
    Gt,
    Gteq,
    Eq,
    NotEq,
    Matches,
    DoesNotMatch,
}

/// Operator token to comparison, in lookup order
pub static OPERATOR_TABLE: [(&str, CompareOp); 8] = [
    ("<", CompareOp::Lt),
    ("<=", CompareOp::Lteq),
    (">", CompareOp::Gt),
    (">=", CompareOp::Gteq),
    ("==", CompareOp::Eq),
    ("!=", CompareOp::NotEq),
    ("=~", CompareOp::Matches),
    ("!~", CompareOp::DoesNotMatch),
];

impl CompareOp {
    /// Resolve an operator token
    pub fn from_token(token: &str) -> Option<Self> {
        OPERATOR_TABLE
            .iter()
            .find(|(t, _)| *t == token)
            .map(|(_, op)| *op)
    }

    /// The operator token this comparison is aliased to
    pub fn token(self) -> &'static str {
        OPERATOR_TABLE
            .iter()
            .find(|(_, op)| *op == self)
            .map(|(t, _)| *t)
            .unwrap_or_default()
    }

    /// Name of the comparison method the token dispatches to
    pub fn method_name(self) -> &'static str {
        match self {
            CompareOp::Lt => "lt",
            CompareOp::Lteq => "lteq",
            CompareOp::Gt => "gt",
            CompareOp::Gteq => "gteq",
            CompareOp::Eq => "eq",
            CompareOp::NotEq => "not_eq",
            CompareOp::Matches => "matches",
            CompareOp::DoesNotMatch => "does_not_match",
        }
    }
}

impl SausageExpr {
    /// Apply a comparison
    pub fn compare<R: Into<Expr>>(self, op: CompareOp, other: R) -> Self {
        match op {
            CompareOp::Lt => self.lt(other),
            CompareOp::Lteq => self.lteq(other),
            CompareOp::Gt => self.gt(other),
            CompareOp::Gteq => self.gteq(other),
            CompareOp::Eq => self.eq(other),
            CompareOp::NotEq => self.not_eq(other),
            CompareOp::Matches => self.matches(other),
            CompareOp::DoesNotMatch => self.does_not_match(other),
        }
    }

    /// Apply the comparison aliased to `token`, e.g. `age.op(">=", 18)`.
    ///
    /// # Errors
    ///
    /// Returns [`SausageError::UnknownOperator`] for tokens outside
    /// [`OPERATOR_TABLE`].
    pub fn op<R: Into<Expr>>(self, token: &str, other: R) -> Result<Self, SausageError> {
        let op = CompareOp::from_token(token)
            .ok_or_else(|| SausageError::UnknownOperator(token.to_string()))?;
        Ok(self.compare(op, other))
    }
}

impl<R: Into<Expr>> Add<R> for SausageExpr {
    type Output = SausageExpr;

    fn add(self, rhs: R) -> SausageExpr {
        SausageExpr::new(ExprTrait::add(self.expr, rhs))
    }
}

impl<R: Into<Expr>> Sub<R> for SausageExpr {
    type Output = SausageExpr;

    fn sub(self, rhs: R) -> SausageExpr {
        SausageExpr::new(ExprTrait::sub(self.expr, rhs))
    }
}

impl<R: Into<Expr>> Mul<R> for SausageExpr {
    type Output = SausageExpr;

    fn mul(self, rhs: R) -> SausageExpr {
        SausageExpr::new(ExprTrait::mul(self.expr, rhs))
    }
}

impl<R: Into<Expr>> Div<R> for SausageExpr {
    type Output = SausageExpr;

    fn div(self, rhs: R) -> SausageExpr {
        SausageExpr::new(ExprTrait::div(self.expr, rhs))
    }
}

impl<R: Into<Expr>> Rem<R> for SausageExpr {
    type Output = SausageExpr;

    fn rem(self, rhs: R) -> SausageExpr {
        SausageExpr::new(ExprTrait::binary(self.expr, BinOper::Mod, rhs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Dialect;

    fn pg(node: &SausageExpr) -> String {
        node.to_sql_with(Dialect::Postgres)
    }

    #[test]
    fn test_every_token_dispatches_to_its_named_method() {
        for (token, op) in OPERATOR_TABLE.iter() {
            let via_token = SausageExpr::column("n").op(token, 5).unwrap();
            let via_name = SausageExpr::column("n").compare(*op, 5);
            assert_eq!(via_token, via_name, "token {token}");
            assert_eq!(op.token(), *token);
        }
    }

    #[test]
    fn test_token_lookup() {
        assert_eq!(CompareOp::from_token("<="), Some(CompareOp::Lteq));
        assert_eq!(CompareOp::from_token("=~").map(CompareOp::method_name), Some("matches"));
        assert_eq!(CompareOp::from_token("<>"), None);
    }

    #[test]
    fn test_unknown_token() {
        let err = SausageExpr::column("n").op("<=>", 1).unwrap_err();
        assert!(matches!(err, SausageError::UnknownOperator(t) if t == "<=>"));
    }

    #[test]
    fn test_op_renders_like_named_method() {
        assert_eq!(pg(&SausageExpr::column("n").op("!=", 2).unwrap()), r#""n" <> 2"#);
        assert_eq!(pg(&SausageExpr::column("s").op("!~", "a%").unwrap()), r#""s" NOT LIKE 'a%'"#);
    }

    #[test]
    fn test_arithmetic_pass_through() {
        assert_eq!(pg(&(SausageExpr::column("a") + 1)), r#""a" + 1"#);
        assert_eq!(pg(&(SausageExpr::column("a") - SausageExpr::column("b"))), r#""a" - "b""#);
        assert_eq!(pg(&(SausageExpr::column("a") * 3)), r#""a" * 3"#);
        assert_eq!(pg(&(SausageExpr::column("a") / 4)), r#""a" / 4"#);
    }

    #[test]
    fn test_modulo_is_infix_percent() {
        assert_eq!(pg(&(SausageExpr::column("a") % 7)), r#""a" % 7"#);
    }

    #[test]
    fn test_arithmetic_result_is_decorated() {
        let node = (SausageExpr::column("a") + 1).gt(10);
        assert!(pg(&node).ends_with("> 10"));
    }
}
