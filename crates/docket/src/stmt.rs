//! The typed query DSL.
//!
//! Paths name document members and carry the member's Rust type, so
//! comparisons only accept values of that type. Every expression lowers into
//! the untyped [`docket_core::stmt::Expr`] tree the SQL compiler consumes.

mod expr;
pub use expr::Expr;

mod into_expr;
pub use into_expr::IntoExpr;

mod path;
pub use path::{field, object, Path};

mod primitive;
pub use primitive::Primitive;

pub use docket_core::stmt::{Direction, ExprCall, OrderBy, Type, Value, ValueEnum};
