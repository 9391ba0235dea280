use docket_core::driver::{Capability, Dialect};

/// The SQL dialect statements are rendered in.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flavor {
    Mssql,
    Sqlite,
}

impl Flavor {
    pub fn is_mssql(self) -> bool {
        matches!(self, Flavor::Mssql)
    }

    pub fn is_sqlite(self) -> bool {
        matches!(self, Flavor::Sqlite)
    }
}

impl From<Dialect> for Flavor {
    fn from(value: Dialect) -> Self {
        match value {
            Dialect::Mssql => Flavor::Mssql,
            Dialect::Sqlite => Flavor::Sqlite,
        }
    }
}

impl From<&Capability> for Flavor {
    fn from(value: &Capability) -> Self {
        value.dialect.into()
    }
}
