use super::{Compiler, Member, IGNORE_CASE};

use docket_core::{
    stmt::{Expr, ExprCall, Type, Value},
    Error, Result,
};
use docket_sql::{stmt::LikeKind, Flavor, Fragment};

use std::{fmt, sync::Arc};

/// Translates method calls found in filter expressions into SQL.
///
/// Translators registered on the store are consulted before the built-in
/// ones, in registration order, and the first whose [`matches`] returns
/// `true` handles the call.
///
/// [`matches`]: MethodTranslator::matches
pub trait MethodTranslator: Send + Sync + 'static {
    fn matches(&self, call: &ExprCall) -> bool;

    fn translate(&self, call: &ExprCall, cx: &MethodContext<'_>) -> Result<Fragment>;
}

/// What a translator may ask of the compiler.
pub struct MethodContext<'a> {
    compiler: &'a Compiler<'a>,
}

impl MethodContext<'_> {
    /// Resolves an argument or target that must be a document member.
    pub fn member(&self, expr: &Expr) -> Result<Member> {
        match expr {
            Expr::Member(member) => self.compiler.member(member),
            _ => Err(Error::unsupported_expression(
                "expected a document member argument",
            )),
        }
    }

    /// Reads an argument or target that must be a constant.
    pub fn constant<'e>(&self, expr: &'e Expr) -> Result<&'e Value> {
        match expr {
            Expr::Value(value) => Ok(value),
            _ => Err(Error::unsupported_expression(
                "expected a constant argument",
            )),
        }
    }

    /// Compiles a nested boolean expression.
    pub fn compile(&self, expr: &Expr) -> Result<Fragment> {
        self.compiler.compile(expr)
    }

    pub fn flavor(&self) -> Flavor {
        self.compiler.flavor()
    }
}

#[derive(Default, Clone)]
pub(crate) struct MethodRegistry {
    custom: Vec<Arc<dyn MethodTranslator>>,
}

static BUILTIN: &[&dyn MethodTranslator] = &[
    &TextMatch,
    &Equals,
    &NullOrBlankCheck,
    &ListContains,
    &ArrayContains,
];

impl MethodRegistry {
    pub(crate) fn register(&mut self, translator: impl MethodTranslator) {
        self.custom.push(Arc::new(translator));
    }

    pub(crate) fn translate(&self, call: &ExprCall, compiler: &Compiler<'_>) -> Result<Fragment> {
        let cx = MethodContext { compiler };

        if let Some(translator) = self.custom.iter().find(|t| t.matches(call)) {
            return translator.translate(call, &cx);
        }

        match BUILTIN.iter().find(|t| t.matches(call)) {
            Some(translator) => translator.translate(call, &cx),
            None => Err(Error::unsupported_method(&call.method)),
        }
    }
}

impl fmt::Debug for MethodRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodRegistry")
            .field("custom", &self.custom.len())
            .finish()
    }
}

fn target_member(call: &ExprCall) -> Option<&docket_core::stmt::ExprMember> {
    call.target.as_deref().and_then(Expr::as_member)
}

/// `contains`, `starts_with` and `ends_with` on a string member.
struct TextMatch;

impl MethodTranslator for TextMatch {
    fn matches(&self, call: &ExprCall) -> bool {
        matches!(&call.method[..], "contains" | "starts_with" | "ends_with")
            && target_member(call).is_some_and(|member| member.ty == Type::String)
    }

    fn translate(&self, call: &ExprCall, cx: &MethodContext<'_>) -> Result<Fragment> {
        let kind = match &call.method[..] {
            "contains" => LikeKind::Contains,
            "starts_with" => LikeKind::StartsWith,
            _ => LikeKind::EndsWith,
        };

        let member = cx.member(required(call.target.as_deref(), call)?)?;
        let Value::String(needle) = cx.constant(required(call.arg(0), call)?)? else {
            return Err(Error::unsupported_expression(format!(
                "`{}` needs a string argument",
                call.method
            )));
        };

        Ok(Fragment::like(member.raw().clone(), kind, needle.clone()))
    }
}

/// `equals`, optionally ignoring case.
struct Equals;

impl MethodTranslator for Equals {
    fn matches(&self, call: &ExprCall) -> bool {
        call.method == "equals" && target_member(call).is_some()
    }

    fn translate(&self, call: &ExprCall, cx: &MethodContext<'_>) -> Result<Fragment> {
        let member = cx.member(required(call.target.as_deref(), call)?)?;
        let value = cx.constant(required(call.arg(0), call)?)?;
        let ignore_case = match call.arg(1) {
            Some(arg) => cx.constant(arg)?.as_str() == Some(IGNORE_CASE),
            None => false,
        };

        match value {
            Value::String(value) if ignore_case => Ok(Fragment::CollatedEquals {
                locator: member.raw().clone(),
                value: value.clone(),
            }),
            Value::Null => Ok(Fragment::is_null(member.raw().clone())),
            value => Ok(Fragment::comparison(
                member.typed().clone(),
                docket_core::stmt::BinaryOp::Eq,
                member.to_param(value.clone())?,
            )),
        }
    }
}

/// `is_null_or_empty(member)` and `is_null_or_whitespace(member)`.
struct NullOrBlankCheck;

impl MethodTranslator for NullOrBlankCheck {
    fn matches(&self, call: &ExprCall) -> bool {
        matches!(
            &call.method[..],
            "is_null_or_empty" | "is_null_or_whitespace"
        ) && call.target.is_none()
    }

    fn translate(&self, call: &ExprCall, cx: &MethodContext<'_>) -> Result<Fragment> {
        let member = cx.member(required(call.arg(0), call)?)?;

        Ok(Fragment::NullOrBlank {
            locator: member.raw().clone(),
            whitespace: call.method == "is_null_or_whitespace",
        })
    }
}

/// `[a, b, c].contains(member)`: the member is one of a constant list.
struct ListContains;

impl MethodTranslator for ListContains {
    fn matches(&self, call: &ExprCall) -> bool {
        call.method == "contains"
            && matches!(call.target.as_deref(), Some(Expr::Value(Value::List(_))))
    }

    fn translate(&self, call: &ExprCall, cx: &MethodContext<'_>) -> Result<Fragment> {
        let Some(Value::List(items)) = call.target.as_deref().and_then(Expr::as_value) else {
            return Err(Error::unsupported_expression("`contains` needs a constant list"));
        };
        let member = cx.member(required(call.arg(0), call)?)?;

        let values = items
            .iter()
            .map(|item| member.to_param(item.clone()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Fragment::in_list(member.typed().clone(), values))
    }
}

/// `member.contains(item)` on an array member.
struct ArrayContains;

impl MethodTranslator for ArrayContains {
    fn matches(&self, call: &ExprCall) -> bool {
        call.method == "contains" && target_member(call).is_some_and(|member| member.ty.is_list())
    }

    fn translate(&self, call: &ExprCall, cx: &MethodContext<'_>) -> Result<Fragment> {
        let member = cx.member(required(call.target.as_deref(), call)?)?;
        let item = cx.constant(required(call.arg(0), call)?)?;

        let (Some(path), Some(element)) = (member.path(), member.element()) else {
            return Err(Error::unsupported_expression(
                "`contains` needs an array member",
            ));
        };

        Ok(Fragment::ArrayContains {
            path: path.clone(),
            element: element.conversion(),
            value: element.to_param(item.clone())?,
        })
    }
}

fn required<'e>(expr: Option<&'e Expr>, call: &ExprCall) -> Result<&'e Expr> {
    expr.ok_or_else(|| {
        Error::unsupported_expression(format!("`{}` is missing an argument", call.method))
    })
}
