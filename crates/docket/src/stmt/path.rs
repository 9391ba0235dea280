use super::{Expr, IntoExpr, Primitive};
use docket_core::stmt::{self, Direction, ExprMember, OrderBy, Segment, Type, Value};
use std::{fmt, marker::PhantomData};

/// A member of the queried document, typed by its Rust type.
pub struct Path<T> {
    pub(crate) untyped: ExprMember,
    _p: PhantomData<fn() -> T>,
}

/// A top-level scalar member.
pub fn field<T: Primitive>(name: &str) -> Path<T> {
    Path::new(ExprMember::new(
        vec![Segment::Field(name.to_string())],
        T::ty(),
        T::NULLABLE,
    ))
}

/// A top-level nested object; reach into it with [`Path::field`].
pub fn object<T>(name: &str) -> Path<T> {
    Path::new(ExprMember::new(
        vec![Segment::Field(name.to_string())],
        Type::Object,
        true,
    ))
}

impl<T> Path<T> {
    pub const fn new(untyped: ExprMember) -> Self {
        Self {
            untyped,
            _p: PhantomData,
        }
    }

    pub fn field<U: Primitive>(&self, name: &str) -> Path<U> {
        Path::new(
            self.untyped
                .push(Segment::Field(name.to_string()), U::ty(), U::NULLABLE),
        )
    }

    pub fn object<U>(&self, name: &str) -> Path<U> {
        Path::new(
            self.untyped
                .push(Segment::Field(name.to_string()), Type::Object, true),
        )
    }

    pub fn untyped(&self) -> &ExprMember {
        &self.untyped
    }

    fn member(&self) -> stmt::Expr {
        self.untyped.clone().into()
    }

    fn compare(&self, op: stmt::BinaryOp, rhs: stmt::Expr) -> Expr<bool> {
        Expr::from_untyped(stmt::Expr::binary_op(self.member(), op, rhs))
    }

    pub fn eq(&self, rhs: impl IntoExpr<T>) -> Expr<bool> {
        self.compare(stmt::BinaryOp::Eq, rhs.into_expr().untyped)
    }

    pub fn ne(&self, rhs: impl IntoExpr<T>) -> Expr<bool> {
        self.compare(stmt::BinaryOp::Ne, rhs.into_expr().untyped)
    }

    pub fn gt(&self, rhs: impl IntoExpr<T>) -> Expr<bool> {
        self.compare(stmt::BinaryOp::Gt, rhs.into_expr().untyped)
    }

    pub fn ge(&self, rhs: impl IntoExpr<T>) -> Expr<bool> {
        self.compare(stmt::BinaryOp::Ge, rhs.into_expr().untyped)
    }

    pub fn lt(&self, rhs: impl IntoExpr<T>) -> Expr<bool> {
        self.compare(stmt::BinaryOp::Lt, rhs.into_expr().untyped)
    }

    pub fn le(&self, rhs: impl IntoExpr<T>) -> Expr<bool> {
        self.compare(stmt::BinaryOp::Le, rhs.into_expr().untyped)
    }

    pub fn is_null(&self) -> Expr<bool> {
        self.compare(stmt::BinaryOp::Eq, Value::Null.into())
    }

    pub fn is_not_null(&self) -> Expr<bool> {
        self.compare(stmt::BinaryOp::Ne, Value::Null.into())
    }

    /// Matches documents whose member equals one of `values`.
    pub fn in_list<I>(&self, values: impl IntoIterator<Item = I>) -> Expr<bool>
    where
        I: IntoExpr<T>,
    {
        let items = values
            .into_iter()
            .map(|value| value.into_expr().untyped)
            .collect::<Vec<_>>();

        // A list holding anything but constants stays a call, which no
        // translator accepts
        let target = if items.iter().all(stmt::Expr::is_value) {
            let values = items
                .into_iter()
                .filter_map(|item| match item {
                    stmt::Expr::Value(value) => Some(value),
                    _ => None,
                })
                .collect();
            stmt::Expr::Value(Value::List(values))
        } else {
            stmt::Expr::call("list", None, items)
        };

        Expr::from_untyped(stmt::Expr::method(target, "contains", vec![self.member()]))
    }

    /// Calls a method by name, for translators registered on the store.
    pub fn call<R>(&self, method: &'static str, args: impl IntoIterator<Item = Value>) -> Expr<R> {
        Expr::from_untyped(stmt::Expr::method(
            self.member(),
            method,
            args.into_iter().map(stmt::Expr::Value).collect(),
        ))
    }

    pub fn asc(&self) -> OrderBy {
        OrderBy {
            member: self.untyped.clone(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(&self) -> OrderBy {
        OrderBy {
            member: self.untyped.clone(),
            direction: Direction::Desc,
        }
    }
}

/// String members, nullable or not.
impl<T: Textual> Path<T> {
    pub fn contains(&self, needle: &str) -> Expr<bool> {
        self.text_call("contains", needle)
    }

    pub fn starts_with(&self, prefix: &str) -> Expr<bool> {
        self.text_call("starts_with", prefix)
    }

    pub fn ends_with(&self, suffix: &str) -> Expr<bool> {
        self.text_call("ends_with", suffix)
    }

    /// Case-insensitive equality.
    pub fn eq_ignore_case(&self, other: &str) -> Expr<bool> {
        Expr::from_untyped(stmt::Expr::method(
            self.member(),
            "equals",
            vec![
                stmt::Expr::value(other),
                stmt::Expr::value(crate::engine::IGNORE_CASE),
            ],
        ))
    }

    pub fn is_null_or_empty(&self) -> Expr<bool> {
        Expr::from_untyped(stmt::Expr::call(
            "is_null_or_empty",
            None,
            vec![self.member()],
        ))
    }

    pub fn is_null_or_whitespace(&self) -> Expr<bool> {
        Expr::from_untyped(stmt::Expr::call(
            "is_null_or_whitespace",
            None,
            vec![self.member()],
        ))
    }

    fn text_call(&self, method: &'static str, arg: &str) -> Expr<bool> {
        Expr::from_untyped(stmt::Expr::method(
            self.member(),
            method,
            vec![stmt::Expr::value(arg)],
        ))
    }
}

impl<T: Primitive> Path<Vec<T>> {
    /// Matches documents whose array member holds `item`.
    pub fn contains(&self, item: impl IntoExpr<T>) -> Expr<bool> {
        Expr::from_untyped(stmt::Expr::method(
            self.member(),
            "contains",
            vec![item.into_expr().untyped],
        ))
    }
}

/// Marker for members stored as JSON strings.
pub trait Textual {}

impl Textual for String {}

impl Textual for Option<String> {}

impl<T> IntoExpr<T> for Path<T> {
    fn into_expr(self) -> Expr<T> {
        Expr::from_untyped(self.untyped)
    }
}

impl<T> IntoExpr<T> for &Path<T> {
    fn into_expr(self) -> Expr<T> {
        Expr::from_untyped(self.untyped.clone())
    }
}

impl<T> Clone for Path<T> {
    fn clone(&self) -> Self {
        Self::new(self.untyped.clone())
    }
}

impl<T> fmt::Debug for Path<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self.untyped)
    }
}
