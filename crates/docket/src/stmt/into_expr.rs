use super::{Expr, Primitive};

/// Converts a value, path or expression into a typed expression.
pub trait IntoExpr<T> {
    fn into_expr(self) -> Expr<T>;
}

impl<T> IntoExpr<T> for Expr<T> {
    fn into_expr(self) -> Self {
        self
    }
}

impl<T: Primitive> IntoExpr<T> for T {
    fn into_expr(self) -> Expr<T> {
        Expr::from_value(self.into_value())
    }
}

impl<T: Primitive + Clone> IntoExpr<T> for &T {
    fn into_expr(self) -> Expr<T> {
        Expr::from_value(self.clone().into_value())
    }
}

impl<T: Primitive> IntoExpr<Option<T>> for T {
    fn into_expr(self) -> Expr<Option<T>> {
        Expr::from_value(self.into_value())
    }
}

impl IntoExpr<String> for &str {
    fn into_expr(self) -> Expr<String> {
        Expr::from_value(self.into())
    }
}

impl IntoExpr<Option<String>> for &str {
    fn into_expr(self) -> Expr<Option<String>> {
        Expr::from_value(self.into())
    }
}
