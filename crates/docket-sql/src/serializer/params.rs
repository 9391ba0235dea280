use docket_core::stmt::Value;

use super::{CommandBuilder, Flavor, ToSql};

/// A 1-based positional parameter reference.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Placeholder(pub usize);

impl Placeholder {
    pub fn name(self, flavor: Flavor) -> String {
        match flavor {
            Flavor::Mssql => format!("@P{}", self.0),
            Flavor::Sqlite => format!("?{}", self.0),
        }
    }
}

impl ToSql for Placeholder {
    fn to_sql(self, f: &mut CommandBuilder) {
        let name = self.name(f.flavor);
        f.sql.push_str(&name);
    }
}

/// A value renders as a fresh parameter.
impl ToSql for Value {
    fn to_sql(self, f: &mut CommandBuilder) {
        let placeholder = f.add_param(self);
        placeholder.to_sql(f);
    }
}

impl ToSql for &Value {
    fn to_sql(self, f: &mut CommandBuilder) {
        self.clone().to_sql(f);
    }
}
