use super::Operation;
use crate::stmt::Value;

#[derive(Debug, Clone)]
pub struct QuerySql {
    /// SQL text; may hold several `;`-terminated statements.
    pub sql: String,

    /// Positional parameters, in placeholder order.
    pub params: Vec<Value>,
}

impl From<QuerySql> for Operation {
    fn from(value: QuerySql) -> Self {
        Self::QuerySql(value)
    }
}
