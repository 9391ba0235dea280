use docket_core::stmt::IdType;

use super::{CommandBuilder, Flavor, Ident, Quoted, ToSql};
use crate::stmt::CreateTable;

impl ToSql for &CreateTable {
    fn to_sql(self, f: &mut CommandBuilder) {
        let table = &self.table;

        match f.flavor {
            Flavor::Mssql => {
                let schema = &table.schema;
                let create_schema = format!("CREATE SCHEMA [{}]", schema.replace(']', "]]"));
                let qualified = format!(
                    "[{}].[{}]",
                    schema.replace(']', "]]"),
                    table.name.replace(']', "]]")
                );
                let pk = format!("pk_{}", table.name);

                fmt!(
                    f,
                    "IF SCHEMA_ID(" Quoted(schema) ") IS NULL EXEC(" Quoted(&create_schema) ");\n"
                    "IF OBJECT_ID(" Quoted(&qualified) ", N'U') IS NULL CREATE TABLE " table " ("
                    "id " mssql_id_type(self.id_type) " NOT NULL, "
                    "data nvarchar(max) NOT NULL, "
                    "version bigint NOT NULL, "
                    "last_modified datetimeoffset NOT NULL, "
                    "doc_type nvarchar(256) NOT NULL, "
                    "tenant_id nvarchar(256) NOT NULL, "
                );

                if self.soft_delete {
                    fmt!(
                        f,
                        "is_deleted bit NOT NULL DEFAULT 0, deleted_at datetimeoffset NULL, "
                    );
                }

                fmt!(f, "CONSTRAINT " Ident(&pk) " PRIMARY KEY (tenant_id, id))");
            }
            Flavor::Sqlite => {
                fmt!(
                    f,
                    "CREATE TABLE IF NOT EXISTS " table " ("
                    "id " sqlite_id_type(self.id_type) " NOT NULL, "
                    "data TEXT NOT NULL, "
                    "version INTEGER NOT NULL, "
                    "last_modified TEXT NOT NULL, "
                    "doc_type TEXT NOT NULL, "
                    "tenant_id TEXT NOT NULL, "
                );

                if self.soft_delete {
                    fmt!(f, "is_deleted INTEGER NOT NULL DEFAULT 0, deleted_at TEXT NULL, ");
                }

                fmt!(f, "PRIMARY KEY (tenant_id, id))");
            }
        }
    }
}

fn mssql_id_type(ty: IdType) -> &'static str {
    match ty {
        IdType::Uuid => "uniqueidentifier",
        IdType::String => "nvarchar(256)",
        IdType::I32 => "int",
        IdType::I64 => "bigint",
    }
}

fn sqlite_id_type(ty: IdType) -> &'static str {
    match ty {
        IdType::Uuid | IdType::String => "TEXT",
        IdType::I32 | IdType::I64 => "INTEGER",
    }
}
