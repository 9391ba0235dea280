use super::{CommandBuilder, ToSql};
use crate::stmt::Statement;

impl ToSql for &Statement {
    fn to_sql(self, f: &mut CommandBuilder) {
        match self {
            Statement::CreateTable(stmt) => stmt.to_sql(f),
            Statement::Delete(stmt) => stmt.to_sql(f),
            Statement::DeleteWhere(stmt) => stmt.to_sql(f),
            Statement::Insert(stmt) => stmt.to_sql(f),
            Statement::Select(stmt) => stmt.to_sql(f),
            Statement::UndeleteWhere(stmt) => stmt.to_sql(f),
            Statement::Update(stmt) => stmt.to_sql(f),
            Statement::Upsert(stmt) => stmt.to_sql(f),
        }
    }
}
