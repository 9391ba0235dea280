//! Host-side statement model: the untyped expression tree built by the query
//! DSL and the values that flow between documents, parameters and rows.

mod direction;
pub use direction::Direction;

mod expr;
pub use expr::Expr;

mod expr_and;
pub use expr_and::ExprAnd;

mod expr_binary_op;
pub use expr_binary_op::ExprBinaryOp;

mod expr_call;
pub use expr_call::ExprCall;

mod expr_member;
pub use expr_member::{ExprMember, Segment};

mod expr_not;
pub use expr_not::ExprNot;

mod expr_or;
pub use expr_or::ExprOr;

mod id;
pub use id::{Id, IdType};

mod op_binary;
pub use op_binary::BinaryOp;

mod order_by;
pub use order_by::OrderBy;

mod ty;
pub use ty::Type;

mod ty_chrono;
pub use ty_chrono::parse_datetime;

mod value;
pub use value::Value;

mod value_enum;
pub use value_enum::ValueEnum;

mod value_record;
pub use value_record::ValueRecord;
