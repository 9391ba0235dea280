use crate::{
    db::PoolConnection,
    engine::Member,
    query::{read_document, Plan},
    stmt::IntoExpr,
    Batch, Document, DocumentId, DocumentStore, Query, Result,
};

use docket_core::{
    driver::operation::Transaction,
    schema::{column, DocumentMapping},
    stmt::{BinaryOp, ExprMember, Id},
    Error,
};
use docket_sql::{
    stmt::{
        Columns, Delete, DeleteWhere, DeletedFilter, DocumentWrite, Insert, Locator, Select,
        Statement, UndeleteWhere, Update, Upsert,
    },
    Command, Fragment,
};

use chrono::Utc;
use std::{any::TypeId, collections::HashMap, sync::Arc};

/// A unit of work over one tenant.
///
/// Reads run immediately. Writes are queued and run together, in the order
/// they were made, inside one transaction by [`Session::save_changes`].
///
/// Every document read through the session has its version recorded. When a
/// type uses optimistic concurrency, writing such a document back fails if
/// another writer moved the version in the meantime.
#[derive(Debug)]
pub struct Session {
    store: DocumentStore,
    tenant: String,
    pending: Vec<PendingOp>,
    pub(crate) versions: Versions,
}

/// Versions of the documents this session has read or written.
#[derive(Debug, Default)]
pub(crate) struct Versions {
    map: HashMap<(TypeId, Id), i64>,
}

#[derive(Debug)]
struct PendingOp {
    mapping: Arc<DocumentMapping>,
    type_id: TypeId,
    kind: WriteKind,
    statement: Statement,
}

#[derive(Debug)]
enum WriteKind {
    Insert(Id),
    Update(Id, Option<i64>),
    Upsert(Id, Option<i64>),
    Delete(Id),

    /// Delete or undelete by predicate.
    Bulk,
}

impl Session {
    pub(crate) fn new(store: DocumentStore, tenant: String) -> Session {
        Session {
            store,
            tenant,
            pending: vec![],
            versions: Versions::default(),
        }
    }

    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    pub fn document_store(&self) -> &DocumentStore {
        &self.store
    }

    /// Starts a query over documents of type `T`.
    pub fn query<T: Document>(&self) -> Query<T> {
        Query::new()
    }

    /// Starts a batch of reads sent in a single round trip.
    pub fn batch(&mut self) -> Batch<'_> {
        Batch::new(self)
    }

    /// Loads a document by id.
    pub async fn load<T: Document>(&mut self, id: impl Into<T::Id>) -> Result<Option<T>> {
        let plan = self.load_plan::<T>(id.into().to_id());
        self.run(plan).await
    }

    /// Loads every document whose id is in `ids`. Missing ids are skipped.
    pub async fn load_many<T, I>(&mut self, ids: I) -> Result<Vec<T>>
    where
        T: Document,
        I: IntoIterator,
        I::Item: Into<T::Id>,
    {
        let ids = ids
            .into_iter()
            .map(|id| id.into().to_id().to_value())
            .collect::<Vec<_>>();

        if ids.is_empty() {
            return Ok(vec![]);
        }

        let mut select = self.by_id::<T>();
        select.filters.push(Fragment::in_list(Locator::column(column::ID), ids));
        let mapping = self.store.mapping::<T>();

        self.run(Plan {
            mapping,
            select,
            read: Box::new(|set, versions| {
                set.rows
                    .into_iter()
                    .map(|row| read_document::<T>(row, versions))
                    .collect()
            }),
        })
        .await
    }

    /// The version recorded for a document, if this session has read or
    /// written it.
    pub fn version_of<T: Document>(&self, id: &T::Id) -> Option<i64> {
        self.versions.get::<T>(&id.to_id())
    }

    /// Queues an insert. Saving fails if the id is taken.
    pub fn insert<T: Document>(&mut self, doc: &T) -> Result<()> {
        let (mapping, id, doc) = self.write(doc)?;

        self.push::<T>(
            &mapping,
            WriteKind::Insert(id),
            Insert {
                table: mapping.table.clone(),
                doc,
            }
            .into(),
        );
        Ok(())
    }

    /// Queues an update of an existing document.
    pub fn update<T: Document>(&mut self, doc: &T) -> Result<()> {
        let (mapping, id, doc) = self.write(doc)?;
        let expected_version = self.expected_version::<T>(&mapping, &id);

        self.push::<T>(
            &mapping,
            WriteKind::Update(id, expected_version),
            Update {
                table: mapping.table.clone(),
                doc,
                expected_version,
            }
            .into(),
        );
        Ok(())
    }

    /// Queues an insert-or-update. A soft-deleted row with the same id is
    /// brought back.
    pub fn store<T: Document>(&mut self, doc: &T) -> Result<()> {
        let (mapping, id, doc) = self.write(doc)?;
        let expected_version = self.expected_version::<T>(&mapping, &id);

        self.push::<T>(
            &mapping,
            WriteKind::Upsert(id, expected_version),
            Upsert {
                table: mapping.table.clone(),
                doc,
                expected_version,
                revive: mapping.is_soft_deleted(),
            }
            .into(),
        );
        Ok(())
    }

    /// Queues a delete; soft-deletable types are flagged rather than removed.
    pub fn delete<T: Document>(&mut self, doc: &T) {
        self.delete_by_id::<T>(doc.id());
    }

    pub fn delete_by_id<T: Document>(&mut self, id: impl Into<T::Id>) {
        let mapping = self.store.mapping::<T>();
        let soft = mapping.is_soft_deleted().then(Utc::now);
        self.push_delete::<T>(mapping, id.into().to_id(), soft);
    }

    /// Queues a physical delete, even for soft-deletable types.
    pub fn hard_delete<T: Document>(&mut self, id: impl Into<T::Id>) {
        let mapping = self.store.mapping::<T>();
        self.push_delete::<T>(mapping, id.into().to_id(), None);
    }

    /// Queues a delete of every document of this tenant matching `filter`.
    ///
    /// The filter is compiled immediately, so translation errors surface here
    /// rather than at save time.
    pub fn delete_where<T: Document>(&mut self, filter: impl IntoExpr<bool>) -> Result<()> {
        let mapping = self.store.mapping::<T>();
        let fragment = self.compile::<T>(&filter.into_expr().untyped)?;

        let statement = DeleteWhere {
            table: mapping.table.clone(),
            filters: vec![fragment],
            tenant: self.tenant.clone(),
            soft: mapping.is_soft_deleted().then(Utc::now),
        };
        self.push::<T>(&mapping, WriteKind::Bulk, statement.into());
        Ok(())
    }

    /// Queues clearing the deleted flag of every soft-deleted document of
    /// this tenant matching `filter`.
    pub fn undelete_where<T: Document>(&mut self, filter: impl IntoExpr<bool>) -> Result<()> {
        let mapping = self.store.mapping::<T>();
        if !mapping.is_soft_deleted() {
            return Err(Error::unsupported_feature(format!(
                "`{}` is not soft-deleted",
                mapping.alias
            )));
        }

        let fragment = self.compile::<T>(&filter.into_expr().untyped)?;
        let statement = UndeleteWhere {
            table: mapping.table.clone(),
            filters: vec![fragment],
            tenant: self.tenant.clone(),
        };
        self.push::<T>(&mapping, WriteKind::Bulk, statement.into());
        Ok(())
    }

    /// Number of queued writes.
    pub fn pending_changes(&self) -> usize {
        self.pending.len()
    }

    /// Drops every queued write.
    pub fn discard_changes(&mut self) {
        self.pending.clear();
    }

    /// Runs every queued write in one transaction.
    ///
    /// On failure the transaction is rolled back, the error that caused it is
    /// returned and the queued writes are kept.
    pub async fn save_changes(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let mut mappings: Vec<Arc<DocumentMapping>> = vec![];
        for op in &self.pending {
            if !mappings.iter().any(|mapping| mapping.table == op.mapping.table) {
                mappings.push(op.mapping.clone());
            }
        }

        let mut conn = self.store.connection().await?;
        self.store.ensure_tables(&mut conn, &mappings).await?;

        let timeout = self.store.engine().options.transaction_timeout;
        conn.exec(Transaction::Start.into()).await?;

        let outcome =
            tokio::time::timeout(timeout, apply(&self.store, &mut conn, &self.pending)).await;

        let result = match outcome {
            Ok(result) => result,
            Err(_) if !self.store.capability().cancel_safe => {
                // The cancelled request may still be answering
                tracing::warn!(
                    operations = self.pending.len(),
                    "transaction timed out; discarding connection"
                );
                self.store.discard(conn);
                return Err(Error::transaction_timed_out(timeout));
            }
            Err(_) => Err(Error::transaction_timed_out(timeout)),
        };

        if let Err(err) = result {
            self.rollback(conn, &err).await;
            return Err(err);
        }

        if let Err(err) = conn.exec(Transaction::Commit.into()).await {
            self.rollback(conn, &err).await;
            return Err(err);
        }

        for op in self.pending.drain(..) {
            match op.kind {
                WriteKind::Insert(id) => self.versions.set(op.type_id, id, 1),
                WriteKind::Update(id, Some(expected)) | WriteKind::Upsert(id, Some(expected)) => {
                    self.versions.set(op.type_id, id, expected + 1)
                }
                WriteKind::Update(id, None) | WriteKind::Upsert(id, None) => {
                    self.versions.bump(op.type_id, id)
                }
                WriteKind::Delete(id) => self.versions.forget(op.type_id, &id),
                WriteKind::Bulk => {}
            }
        }

        Ok(())
    }

    /// Rolls back after `err`; a connection that cannot roll back is not
    /// reused.
    async fn rollback(&self, mut conn: PoolConnection, err: &Error) {
        tracing::warn!(error = %err, operations = self.pending.len(), "rolling back");

        if let Err(rollback) = conn.exec(Transaction::Rollback.into()).await {
            tracing::warn!(error = %rollback, "rollback failed; discarding connection");
            self.store.discard(conn);
        }
    }

    pub(crate) async fn run<O>(&mut self, plan: Plan<O>) -> Result<O> {
        let Plan {
            mapping,
            select,
            read,
        } = plan;

        let mut conn = self.store.connection().await?;
        self.store
            .ensure_tables(&mut conn, std::slice::from_ref(&mapping))
            .await?;

        let command = Command::from_statement(self.store.flavor(), &select.into());
        let mut sets = self.store.query(&mut conn, command).await?;
        drop(conn);

        read(sets.take_current()?, &mut self.versions)
    }

    pub(crate) fn load_plan<T: Document>(&self, id: Id) -> Plan<Option<T>> {
        let mut select = self.by_id::<T>();
        select.filters.push(Fragment::comparison(
            Locator::column(column::ID),
            BinaryOp::Eq,
            id.to_value(),
        ));

        Plan {
            mapping: self.store.mapping::<T>(),
            select,
            read: Box::new(|set, versions| {
                set.rows
                    .into_iter()
                    .next()
                    .map(|row| read_document::<T>(row, versions))
                    .transpose()
            }),
        }
    }

    pub(crate) fn compile_member<T: Document>(&self, member: &ExprMember) -> Result<Member> {
        let mapping = self.store.mapping::<T>();
        self.store.engine().compiler(&mapping).member(member)
    }

    fn compile<T: Document>(&self, expr: &docket_core::stmt::Expr) -> Result<Fragment> {
        let mapping = self.store.mapping::<T>();
        self.store.engine().compiler(&mapping).compile(expr)
    }

    /// A document read scoped the way loads are: this tenant, live rows.
    fn by_id<T: Document>(&self) -> Select {
        let mapping = self.store.mapping::<T>();
        let mut select = Select::new(mapping.table.clone(), Columns::Documents);
        select.tenant = Some(self.tenant.clone());
        if mapping.is_soft_deleted() {
            select.deleted = DeletedFilter::NotDeleted;
        }
        select
    }

    fn write<T: Document>(&self, doc: &T) -> Result<(Arc<DocumentMapping>, Id, DocumentWrite)> {
        let mapping = self.store.mapping::<T>();
        let id = doc.id().to_id();
        let data = serde_json::to_string(doc)?;

        let write = DocumentWrite {
            id: id.to_value(),
            data,
            doc_type: mapping.alias.clone(),
            tenant: self.tenant.clone(),
            last_modified: Utc::now(),
        };

        Ok((mapping, id, write))
    }

    /// The version the row will be at when this write runs: the last queued
    /// write of the same document decides, then the recorded version.
    fn expected_version<T: Document>(&self, mapping: &DocumentMapping, id: &Id) -> Option<i64> {
        if !mapping.optimistic_concurrency {
            return None;
        }

        let type_id = TypeId::of::<T>();
        let queued = self
            .pending
            .iter()
            .rev()
            .find(|op| op.type_id == type_id && op.kind.id() == Some(id));

        match queued {
            Some(op) => op.kind.version_after(),
            None => self.versions.get::<T>(id),
        }
    }

    fn push_delete<T: Document>(
        &mut self,
        mapping: Arc<DocumentMapping>,
        id: Id,
        soft: Option<chrono::DateTime<Utc>>,
    ) {
        let statement = Delete {
            table: mapping.table.clone(),
            id: id.to_value(),
            tenant: self.tenant.clone(),
            soft,
        };
        self.push::<T>(&mapping, WriteKind::Delete(id), statement.into());
    }

    fn push<T: Document>(
        &mut self,
        mapping: &Arc<DocumentMapping>,
        kind: WriteKind,
        statement: Statement,
    ) {
        self.pending.push(PendingOp {
            mapping: mapping.clone(),
            type_id: TypeId::of::<T>(),
            kind,
            statement,
        });
    }
}

async fn apply(store: &DocumentStore, conn: &mut PoolConnection, ops: &[PendingOp]) -> Result<()> {
    for op in ops {
        let command = Command::from_statement(store.flavor(), &op.statement);
        let result = store.execute(conn, command).await;
        op.check(result)?;
    }
    Ok(())
}

impl WriteKind {
    fn id(&self) -> Option<&Id> {
        match self {
            WriteKind::Insert(id)
            | WriteKind::Update(id, _)
            | WriteKind::Upsert(id, _)
            | WriteKind::Delete(id) => Some(id),
            WriteKind::Bulk => None,
        }
    }

    /// The row's version once this write has run, when it is known.
    fn version_after(&self) -> Option<i64> {
        match self {
            WriteKind::Insert(_) => Some(1),
            WriteKind::Update(_, expected) | WriteKind::Upsert(_, expected) => {
                expected.map(|version| version + 1)
            }
            WriteKind::Delete(_) | WriteKind::Bulk => None,
        }
    }
}

impl PendingOp {
    /// Turns a driver outcome into the error the caller should see.
    fn check(&self, result: Result<u64>) -> Result<()> {
        let alias = &self.mapping.alias;

        match (&self.kind, result) {
            (WriteKind::Insert(id), Err(err)) if err.is_duplicate_key() => {
                Err(Error::document_already_exists(alias, id.clone()))
            }
            (_, Err(err)) => Err(err),
            (
                WriteKind::Update(id, Some(expected)) | WriteKind::Upsert(id, Some(expected)),
                Ok(0),
            ) => Err(Error::concurrency_conflict(alias, id.clone(), *expected)),
            (WriteKind::Update(id, None), Ok(0)) => {
                Err(Error::document_not_found(alias, id.clone()))
            }
            (_, Ok(_)) => Ok(()),
        }
    }
}

impl Versions {
    pub(crate) fn record<T: Document>(&mut self, id: Id, version: i64) {
        self.set(TypeId::of::<T>(), id, version);
    }

    pub(crate) fn get<T: Document>(&self, id: &Id) -> Option<i64> {
        self.map.get(&(TypeId::of::<T>(), id.clone())).copied()
    }

    fn set(&mut self, type_id: TypeId, id: Id, version: i64) {
        self.map.insert((type_id, id), version);
    }

    /// Only known versions move; an upsert of an unseen document may have
    /// hit an existing row.
    fn bump(&mut self, type_id: TypeId, id: Id) {
        if let Some(version) = self.map.get_mut(&(type_id, id)) {
            *version += 1;
        }
    }

    fn forget(&mut self, type_id: TypeId, id: &Id) {
        self.map.remove(&(type_id, id.clone()));
    }
}
