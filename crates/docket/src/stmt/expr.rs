use super::IntoExpr;
use docket_core::stmt;
use std::{marker::PhantomData, ops::Not};

/// A typed expression. `T` is the type the expression evaluates to.
#[derive(Debug)]
pub struct Expr<T> {
    /// The un-typed expression
    pub(crate) untyped: stmt::Expr,

    pub(crate) _p: PhantomData<fn() -> T>,
}

impl<T> Expr<T> {
    pub(crate) fn from_value(value: stmt::Value) -> Self {
        Self::from_untyped(stmt::Expr::Value(value))
    }

    pub fn from_untyped(untyped: impl Into<stmt::Expr>) -> Self {
        Self {
            untyped: untyped.into(),
            _p: PhantomData,
        }
    }

    pub fn cast<U>(self) -> Expr<U> {
        Expr::from_untyped(self.untyped)
    }

    pub fn untyped(&self) -> &stmt::Expr {
        &self.untyped
    }
}

impl Expr<bool> {
    pub fn and(self, rhs: impl IntoExpr<bool>) -> Self {
        Self::from_untyped(stmt::Expr::and(self.untyped, rhs.into_expr().untyped))
    }

    /// Combines every expression with `AND`. An empty input matches every
    /// document.
    pub fn and_all<E>(exprs: impl IntoIterator<Item = E>) -> Self
    where
        E: IntoExpr<bool>,
    {
        exprs
            .into_iter()
            .map(|expr| expr.into_expr().untyped)
            .reduce(stmt::Expr::and)
            .map(Self::from_untyped)
            .unwrap_or_else(|| Self::from_value(stmt::Value::Bool(true)))
    }

    pub fn or(self, rhs: impl IntoExpr<bool>) -> Self {
        Self::from_untyped(stmt::Expr::or(self.untyped, rhs.into_expr().untyped))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        !self
    }
}

impl Not for Expr<bool> {
    type Output = Self;

    fn not(self) -> Self {
        Self::from_untyped(stmt::Expr::not(self.untyped))
    }
}

impl<T> Clone for Expr<T> {
    fn clone(&self) -> Self {
        Self::from_untyped(self.untyped.clone())
    }
}

impl<T> From<Expr<T>> for stmt::Expr {
    fn from(value: Expr<T>) -> Self {
        value.untyped
    }
}
