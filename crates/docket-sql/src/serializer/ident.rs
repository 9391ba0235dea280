use docket_core::schema::TableName;

use super::{CommandBuilder, Flavor, ToSql};

/// A quoted identifier: `[name]` on SQL Server, `"name"` on SQLite.
pub(super) struct Ident<S>(pub(super) S);

/// A quoted string literal: `N'text'` on SQL Server, `'text'` on SQLite.
pub(super) struct Quoted<S>(pub(super) S);

impl<S: AsRef<str>> ToSql for Ident<S> {
    fn to_sql(self, f: &mut CommandBuilder) {
        let name = self.0.as_ref();
        match f.flavor {
            Flavor::Mssql => {
                f.sql.push('[');
                f.sql.push_str(&name.replace(']', "]]"));
                f.sql.push(']');
            }
            Flavor::Sqlite => {
                f.sql.push('"');
                f.sql.push_str(&name.replace('"', "\"\""));
                f.sql.push('"');
            }
        }
    }
}

impl<S: AsRef<str>> ToSql for Quoted<S> {
    fn to_sql(self, f: &mut CommandBuilder) {
        if f.flavor.is_mssql() {
            f.sql.push('N');
        }
        f.sql.push('\'');
        f.sql.push_str(&self.0.as_ref().replace('\'', "''"));
        f.sql.push('\'');
    }
}

/// SQLite has no schemas in the SQL Server sense, so only the table name is
/// used there.
impl ToSql for &TableName {
    fn to_sql(self, f: &mut CommandBuilder) {
        match f.flavor {
            Flavor::Mssql => fmt!(f, Ident(&self.schema) "." Ident(&self.name)),
            Flavor::Sqlite => fmt!(f, Ident(&self.name)),
        }
    }
}
