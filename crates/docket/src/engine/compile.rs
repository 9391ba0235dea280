use super::{Engine, Member};

use docket_core::{
    schema::DocumentMapping,
    stmt::{BinaryOp, Expr, ExprBinaryOp, ExprMember, Type, Value},
    Error, Result,
};
use docket_sql::{stmt::OrderBy, Flavor, Fragment};

/// Lowers expression trees over one document type into SQL fragments.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Compiler<'a> {
    engine: &'a Engine,
    mapping: &'a DocumentMapping,
}

impl<'a> Compiler<'a> {
    pub(crate) fn new(engine: &'a Engine, mapping: &'a DocumentMapping) -> Compiler<'a> {
        Compiler { engine, mapping }
    }

    pub(crate) fn flavor(&self) -> Flavor {
        self.engine.flavor
    }

    pub(crate) fn member(&self, member: &ExprMember) -> Result<Member> {
        Member::resolve(member, self.mapping, &self.engine.options)
    }

    pub(crate) fn order_by(&self, order_by: &docket_core::stmt::OrderBy) -> Result<OrderBy> {
        let member = self.member(&order_by.member)?;
        Ok(OrderBy {
            locator: member.typed().clone(),
            direction: order_by.direction,
        })
    }

    /// Compiles a boolean expression.
    pub(crate) fn compile(&self, expr: &Expr) -> Result<Fragment> {
        match expr {
            Expr::And(expr) => Ok(Fragment::and(
                self.compile(&expr.lhs)?,
                self.compile(&expr.rhs)?,
            )),
            Expr::Or(expr) => Ok(Fragment::or(
                self.compile(&expr.lhs)?,
                self.compile(&expr.rhs)?,
            )),
            Expr::Not(expr) => match &*expr.expr {
                // `!active` reads as `active == false`
                Expr::Member(member) => self.bool_member(member, false),
                inner => Ok(Fragment::not(self.compile(inner)?)),
            },
            Expr::Member(member) => self.bool_member(member, true),
            Expr::Value(Value::Bool(true)) => Ok(Fragment::literal("1=1")),
            Expr::Value(Value::Bool(false)) => Ok(Fragment::never()),
            Expr::Value(value) => Err(Error::unsupported_expression(format!(
                "a {} constant is not a predicate",
                value.kind_name()
            ))),
            Expr::BinaryOp(expr) => self.binary_op(expr),
            Expr::Call(call) => self.engine.methods.translate(call, self),
        }
    }

    fn bool_member(&self, member: &ExprMember, expected: bool) -> Result<Fragment> {
        if !member.ty.is_bool() {
            return Err(Error::unsupported_expression(
                "only boolean members can be used as predicates",
            ));
        }

        let member = self.member(member)?;
        let value = member.to_param(Value::Bool(expected))?;
        Ok(Fragment::comparison(
            member.typed().clone(),
            BinaryOp::Eq,
            value,
        ))
    }

    fn binary_op(&self, expr: &ExprBinaryOp) -> Result<Fragment> {
        let (member, op, value) = match (&*expr.lhs, &*expr.rhs) {
            (Expr::Member(member), Expr::Value(value)) => (member, expr.op, value),
            (Expr::Value(value), Expr::Member(member)) => (member, expr.op.mirror(), value),
            _ => {
                return Err(Error::unsupported_expression(
                    "a comparison needs one member side and one constant side",
                ))
            }
        };

        let member = self.member(member)?;

        if value.is_null() {
            return match op {
                BinaryOp::Eq => Ok(Fragment::is_null(member.raw().clone())),
                BinaryOp::Ne => Ok(Fragment::is_not_null(member.raw().clone())),
                op => Err(Error::unsupported_expression(format!(
                    "`{op}` against null"
                ))),
            };
        }

        if matches!(member.ty(), Type::List(_) | Type::Object) {
            return Err(Error::unsupported_expression(
                "comparing a whole list or object member",
            ));
        }

        let value = member.to_param(value.clone())?;
        Ok(Fragment::comparison(member.typed().clone(), op, value))
    }
}
