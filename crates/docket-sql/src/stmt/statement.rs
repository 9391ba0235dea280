use super::*;

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    CreateTable(CreateTable),
    Delete(Delete),
    DeleteWhere(DeleteWhere),
    Insert(Insert),
    Select(Select),
    UndeleteWhere(UndeleteWhere),
    Update(Update),
    Upsert(Upsert),
}

impl Statement {
    /// Returns `true` if executing the statement yields rows.
    pub fn returns_rows(&self) -> bool {
        matches!(self, Statement::Select(_))
    }
}

macro_rules! impl_from {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Statement {
                fn from(value: $variant) -> Self {
                    Statement::$variant(value)
                }
            }
        )*
    };
}

impl_from!(
    CreateTable,
    Delete,
    DeleteWhere,
    Insert,
    Select,
    UndeleteWhere,
    Update,
    Upsert
);
