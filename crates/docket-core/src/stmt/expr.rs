use super::*;

/// An untyped expression over a document.
///
/// The tree is deliberately small: logical connectives, comparisons, method
/// calls, member accesses and constants. Anything the query DSL can express
/// lowers into one of these shapes, and the SQL compiler rejects whatever it
/// cannot translate.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Both operands must hold.
    And(ExprAnd),

    /// At least one operand must hold.
    Or(ExprOr),

    /// Negates a boolean expression.
    Not(ExprNot),

    /// Compares two expressions.
    BinaryOp(ExprBinaryOp),

    /// A named method invoked on an optional target.
    Call(ExprCall),

    /// A property path on the queried document.
    Member(ExprMember),

    /// A constant, including values captured from the caller's scope.
    Value(Value),
}

impl Expr {
    pub fn is_member(&self) -> bool {
        matches!(self, Expr::Member(_))
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Expr::Value(_))
    }

    pub fn as_member(&self) -> Option<&ExprMember> {
        match self {
            Expr::Member(member) => Some(member),
            _ => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Expr::Value(value) => Some(value),
            _ => None,
        }
    }
}

impl Expr {
    pub fn value(value: impl Into<Value>) -> Self {
        Expr::Value(value.into())
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Expr::Value(value)
    }
}
