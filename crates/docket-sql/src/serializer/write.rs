use docket_core::{
    schema::column::*,
    stmt::Value,
};

use super::{
    select::{Condition, Scopes},
    CommandBuilder, Delimited, Flavor, ToSql,
};
use crate::stmt::{Delete, DeleteWhere, DeletedFilter, Insert, UndeleteWhere, Update, Upsert};

const INSERT_COLUMNS: &str = "(id, data, version, last_modified, doc_type, tenant_id)";

impl ToSql for &Insert {
    fn to_sql(self, f: &mut CommandBuilder) {
        let table = &self.table;
        let doc = &self.doc;
        let id = f.add_param(doc.id.clone());
        let data = f.add_param(Value::String(doc.data.clone()));
        let last_modified = f.add_param(Value::DateTime(doc.last_modified));
        let doc_type = f.add_param(Value::String(doc.doc_type.clone()));
        let tenant = f.add_param(Value::String(doc.tenant.clone()));

        fmt!(
            f,
            "INSERT INTO " table " " INSERT_COLUMNS " VALUES ("
            id ", " data ", 1, " last_modified ", " doc_type ", " tenant ")"
        );
    }
}

impl ToSql for &Update {
    fn to_sql(self, f: &mut CommandBuilder) {
        let table = &self.table;
        let doc = &self.doc;

        fmt!(
            f,
            "UPDATE " table " SET "
            DATA " = " Value::String(doc.data.clone()) ", "
            VERSION " = " VERSION " + 1, "
            LAST_MODIFIED " = " Value::DateTime(doc.last_modified) ", "
            DOC_TYPE " = " Value::String(doc.doc_type.clone())
            " WHERE " ID " = " doc.id.clone()
            " AND " TENANT_ID " = " Value::String(doc.tenant.clone())
        );

        if let Some(expected) = self.expected_version {
            fmt!(f, " AND " VERSION " = " Value::I64(expected));
        }
    }
}

impl ToSql for &Upsert {
    fn to_sql(self, f: &mut CommandBuilder) {
        match f.flavor {
            Flavor::Mssql => merge(self, f),
            Flavor::Sqlite => insert_on_conflict(self, f),
        }
    }
}

/// `MERGE ... WITH (HOLDLOCK)` keeps the existence check and the write in one
/// locked statement.
fn merge(upsert: &Upsert, f: &mut CommandBuilder) {
    let table = &upsert.table;
    let doc = &upsert.doc;
    let id = f.add_param(doc.id.clone());
    let tenant = f.add_param(Value::String(doc.tenant.clone()));

    fmt!(
        f,
        "MERGE " table " WITH (HOLDLOCK) AS target USING (SELECT " id " AS id, " tenant
        " AS tenant_id) AS source ON target.id = source.id AND target.tenant_id = source.tenant_id"
        " WHEN MATCHED"
    );

    if let Some(expected) = upsert.expected_version {
        fmt!(f, " AND target.version = " Value::I64(expected));
    }

    let data = f.add_param(Value::String(doc.data.clone()));
    let last_modified = f.add_param(Value::DateTime(doc.last_modified));
    let doc_type = f.add_param(Value::String(doc.doc_type.clone()));

    fmt!(
        f,
        " THEN UPDATE SET target.data = " data
        ", target.version = target.version + 1, target.last_modified = " last_modified
        ", target.doc_type = " doc_type
    );

    if upsert.revive {
        fmt!(f, ", target.is_deleted = 0, target.deleted_at = NULL");
    }

    fmt!(
        f,
        " WHEN NOT MATCHED THEN INSERT " INSERT_COLUMNS " VALUES (source.id, " data ", 1, "
        last_modified ", " doc_type ", source.tenant_id)"
    );
}

fn insert_on_conflict(upsert: &Upsert, f: &mut CommandBuilder) {
    let table = &upsert.table;
    let doc = &upsert.doc;
    let id = f.add_param(doc.id.clone());
    let data = f.add_param(Value::String(doc.data.clone()));
    let last_modified = f.add_param(Value::DateTime(doc.last_modified));
    let doc_type = f.add_param(Value::String(doc.doc_type.clone()));
    let tenant = f.add_param(Value::String(doc.tenant.clone()));

    fmt!(
        f,
        "INSERT INTO " table " " INSERT_COLUMNS " VALUES ("
        id ", " data ", 1, " last_modified ", " doc_type ", " tenant ")"
        " ON CONFLICT (tenant_id, id) DO UPDATE SET data = excluded.data, version = "
        table ".version + 1, last_modified = excluded.last_modified, doc_type = excluded.doc_type"
    );

    if upsert.revive {
        fmt!(f, ", is_deleted = 0, deleted_at = NULL");
    }

    if let Some(expected) = upsert.expected_version {
        fmt!(f, " WHERE " table ".version = " Value::I64(expected));
    }
}

impl ToSql for &Delete {
    fn to_sql(self, f: &mut CommandBuilder) {
        let table = &self.table;

        match self.soft {
            Some(deleted_at) => fmt!(
                f,
                "UPDATE " table " SET " IS_DELETED " = 1, " DELETED_AT " = " Value::DateTime(deleted_at)
            ),
            None => fmt!(f, "DELETE FROM " table),
        }

        fmt!(
            f,
            " WHERE " ID " = " self.id.clone()
            " AND " TENANT_ID " = " Value::String(self.tenant.clone())
        );
    }
}

impl ToSql for &DeleteWhere {
    fn to_sql(self, f: &mut CommandBuilder) {
        let table = &self.table;

        let deleted = match self.soft {
            Some(deleted_at) => {
                fmt!(
                    f,
                    "UPDATE " table " SET " IS_DELETED " = 1, " DELETED_AT " = " Value::DateTime(deleted_at)
                );
                DeletedFilter::NotDeleted
            }
            None => {
                fmt!(f, "DELETE FROM " table);
                DeletedFilter::Any
            }
        };

        let scopes = Scopes {
            tenant: Some(self.tenant.as_str()),
            deleted,
        };
        let conditions = self
            .filters
            .iter()
            .map(Condition::Fragment)
            .chain(scopes.conditions());

        fmt!(f, " WHERE " Delimited(conditions, " AND "));
    }
}

impl ToSql for &UndeleteWhere {
    fn to_sql(self, f: &mut CommandBuilder) {
        let table = &self.table;

        fmt!(
            f,
            "UPDATE " table " SET " IS_DELETED " = 0, " DELETED_AT " = NULL"
        );

        let scopes = Scopes {
            tenant: Some(self.tenant.as_str()),
            deleted: DeletedFilter::Deleted,
        };
        let conditions = self
            .filters
            .iter()
            .map(Condition::Fragment)
            .chain(scopes.conditions());

        fmt!(f, " WHERE " Delimited(conditions, " AND "));
    }
}
