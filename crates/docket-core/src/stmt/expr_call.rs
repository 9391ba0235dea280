use std::borrow::Cow;

use super::Expr;

/// A method call, such as `name.contains("x")` or `ids.contains(id)`.
///
/// `target` is the receiver; static helpers like `is_null_or_empty` have no
/// receiver and take the member as their first argument.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprCall {
    pub method: Cow<'static, str>,
    pub target: Option<Box<Expr>>,
    pub args: Vec<Expr>,
}

impl ExprCall {
    pub fn arg(&self, index: usize) -> Option<&Expr> {
        self.args.get(index)
    }
}

impl Expr {
    pub fn call(
        method: impl Into<Cow<'static, str>>,
        target: Option<Expr>,
        args: Vec<Expr>,
    ) -> Self {
        ExprCall {
            method: method.into(),
            target: target.map(Box::new),
            args,
        }
        .into()
    }

    pub fn method(target: impl Into<Self>, method: &'static str, args: Vec<Expr>) -> Self {
        Expr::call(method, Some(target.into()), args)
    }
}

impl From<ExprCall> for Expr {
    fn from(value: ExprCall) -> Self {
        Self::Call(value)
    }
}
