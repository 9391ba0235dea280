use super::{Direction, ExprMember};

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub member: ExprMember,
    pub direction: Direction,
}
