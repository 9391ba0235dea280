use std::borrow::Cow;

use docket_core::stmt::{BinaryOp, Value};

use super::{Conversion, JsonPath, Locator};

/// A compiled piece of a WHERE clause.
///
/// Fragments are plain values: rendering one appends its SQL text and
/// parameters to a [`crate::CommandBuilder`] and nothing else, so a fragment
/// can be rendered into several commands.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// `locator op @p`
    Comparison {
        locator: Locator,
        op: BinaryOp,
        value: Value,
    },

    /// `locator IS [NOT] NULL`
    IsNull { locator: Locator, negate: bool },

    /// `(lhs AND rhs)`
    And(Box<Fragment>, Box<Fragment>),

    /// `(lhs OR rhs)`
    Or(Box<Fragment>, Box<Fragment>),

    /// `NOT (fragment)`
    Not(Box<Fragment>),

    /// Verbatim SQL with no parameters, such as `1=0`.
    Literal(Cow<'static, str>),

    /// `locator IN (@p1, @p2, ...)`; renders `1=0` when `values` is empty.
    InList { locator: Locator, values: Vec<Value> },

    /// A `LIKE` match with wildcards in `value` escaped.
    Like {
        locator: Locator,
        kind: LikeKind,
        value: String,
    },

    /// Case-insensitive equality through a collation.
    CollatedEquals { locator: Locator, value: String },

    /// `locator IS NULL OR locator = ''`, trimming first when `whitespace`.
    NullOrBlank { locator: Locator, whitespace: bool },

    /// The JSON array at `path` holds an element equal to `value`.
    ArrayContains {
        path: JsonPath,
        element: Conversion,
        value: Value,
    },

    /// Free-form SQL assembled from text, locators and parameters; the
    /// building block for custom method translators.
    Template(Vec<TemplatePart>),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LikeKind {
    Contains,
    StartsWith,
    EndsWith,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    Text(Cow<'static, str>),

    /// Renders the locator with its conversion applied.
    Locator(Locator),

    Param(Value),
}

impl Fragment {
    pub fn comparison(locator: Locator, op: BinaryOp, value: impl Into<Value>) -> Fragment {
        Fragment::Comparison {
            locator,
            op,
            value: value.into(),
        }
    }

    pub fn is_null(locator: Locator) -> Fragment {
        Fragment::IsNull {
            locator,
            negate: false,
        }
    }

    pub fn is_not_null(locator: Locator) -> Fragment {
        Fragment::IsNull {
            locator,
            negate: true,
        }
    }

    pub fn and(lhs: Fragment, rhs: Fragment) -> Fragment {
        Fragment::And(Box::new(lhs), Box::new(rhs))
    }

    pub fn or(lhs: Fragment, rhs: Fragment) -> Fragment {
        Fragment::Or(Box::new(lhs), Box::new(rhs))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(fragment: Fragment) -> Fragment {
        Fragment::Not(Box::new(fragment))
    }

    pub fn literal(sql: impl Into<Cow<'static, str>>) -> Fragment {
        Fragment::Literal(sql.into())
    }

    /// A predicate no row satisfies.
    pub fn never() -> Fragment {
        Fragment::literal("1=0")
    }

    pub fn in_list(locator: Locator, values: Vec<Value>) -> Fragment {
        if values.is_empty() {
            return Fragment::never();
        }

        Fragment::InList { locator, values }
    }

    pub fn like(locator: Locator, kind: LikeKind, value: impl Into<String>) -> Fragment {
        Fragment::Like {
            locator,
            kind,
            value: value.into(),
        }
    }

    pub fn template(parts: Vec<TemplatePart>) -> Fragment {
        Fragment::Template(parts)
    }
}

impl TemplatePart {
    pub fn text(text: impl Into<Cow<'static, str>>) -> TemplatePart {
        TemplatePart::Text(text.into())
    }
}
