use crate::{
    session::Versions,
    stmt::{IntoExpr, Path, Primitive},
    Document, DocumentId, Result, Session,
};

use docket_core::{
    driver::ResultSet,
    schema::DocumentMapping,
    stmt::{self, Value, ValueRecord},
    Error,
};
use docket_sql::{
    stmt::{Aggregate, Columns, DeletedFilter, Locator, Select},
    Command,
};

use chrono::{DateTime, Utc};
use std::{fmt, marker::PhantomData, sync::Arc};

/// A query over documents of type `T`.
///
/// Building a query performs no I/O and does not borrow the session; the
/// terminal operations take the session that runs them.
///
/// ```ignore
/// let adults = session
///     .query::<User>()
///     .filter(field::<i32>("age").ge(18))
///     .order_by(field::<String>("name").asc())
///     .take(10)
///     .to_list(&mut session)
///     .await?;
/// ```
pub struct Query<T> {
    filters: Vec<stmt::Expr>,
    order_by: Vec<stmt::OrderBy>,
    limit: Option<u64>,
    offset: Option<u64>,
    distinct: bool,
    any_tenant: bool,
    deleted: Option<DeletedFilter>,
    _p: PhantomData<fn() -> T>,
}

/// A compiled read: the statement plus how to decode its result set.
pub(crate) struct Plan<O> {
    pub(crate) mapping: Arc<DocumentMapping>,
    pub(crate) select: Select,
    pub(crate) read: Box<dyn FnOnce(ResultSet, &mut Versions) -> Result<O> + Send>,
}

impl<O: 'static> Plan<O> {
    pub(crate) fn map<U: 'static>(
        self,
        f: impl FnOnce(O) -> Result<U> + Send + 'static,
    ) -> Plan<U> {
        let read = self.read;
        Plan {
            mapping: self.mapping,
            select: self.select,
            read: Box::new(move |set, versions| read(set, versions).and_then(f)),
        }
    }
}

impl<T: Document> Query<T> {
    pub fn new() -> Self {
        Query {
            filters: vec![],
            order_by: vec![],
            limit: None,
            offset: None,
            distinct: false,
            any_tenant: false,
            deleted: None,
            _p: PhantomData,
        }
    }

    /// Adds a predicate. Multiple predicates are combined with `AND`.
    pub fn filter(mut self, expr: impl IntoExpr<bool>) -> Self {
        self.filters.push(expr.into_expr().untyped);
        self
    }

    /// Appends an ordering. Earlier orderings take precedence.
    pub fn order_by(mut self, order_by: stmt::OrderBy) -> Self {
        self.order_by.push(order_by);
        self
    }

    /// Skips the first `n` documents.
    pub fn skip(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Returns at most `n` documents.
    pub fn take(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Reads the documents of every tenant.
    pub fn any_tenant(mut self) -> Self {
        self.any_tenant = true;
        self
    }

    /// Includes soft-deleted documents.
    pub fn maybe_deleted(mut self) -> Self {
        self.deleted = Some(DeletedFilter::Any);
        self
    }

    /// Reads soft-deleted documents only.
    pub fn is_deleted(mut self) -> Self {
        self.deleted = Some(DeletedFilter::Deleted);
        self
    }

    /// Reads documents soft-deleted at or after `since`.
    pub fn deleted_since(mut self, since: DateTime<Utc>) -> Self {
        self.deleted = Some(DeletedFilter::DeletedSince(since));
        self
    }

    /// Reads documents soft-deleted before `before`.
    pub fn deleted_before(mut self, before: DateTime<Utc>) -> Self {
        self.deleted = Some(DeletedFilter::DeletedBefore(before));
        self
    }

    /// Projects a single member of each document.
    pub fn select<U: Primitive>(self, path: Path<U>) -> SelectQuery<T, U> {
        SelectQuery {
            query: self,
            path,
            distinct: false,
        }
    }

    pub async fn to_list(&self, session: &mut Session) -> Result<Vec<T>> {
        let plan = self.list_plan(session)?;
        session.run(plan).await
    }

    /// Deserializes every matching document, then applies `f` in memory.
    pub async fn map<U, F>(&self, session: &mut Session, f: F) -> Result<Vec<U>>
    where
        F: FnMut(T) -> U,
    {
        Ok(self.to_list(session).await?.into_iter().map(f).collect())
    }

    /// The first document. Fails when nothing matches.
    pub async fn first(&self, session: &mut Session) -> Result<T> {
        let plan = self.first_plan(session)?;
        session.run(plan).await
    }

    pub async fn first_or_default(&self, session: &mut Session) -> Result<Option<T>> {
        let plan = self.first_or_default_plan(session)?;
        session.run(plan).await
    }

    /// The only document. Fails when nothing or more than one document
    /// matches.
    pub async fn single(&self, session: &mut Session) -> Result<T> {
        let plan = self.single_plan(session)?;
        session.run(plan).await
    }

    /// The only document, if any. Fails when more than one matches.
    pub async fn single_or_default(&self, session: &mut Session) -> Result<Option<T>> {
        let plan = self.single_or_default_plan(session)?;
        session.run(plan).await
    }

    pub async fn count(&self, session: &mut Session) -> Result<u64> {
        let plan = self.count_plan(session)?;
        session.run(plan).await
    }

    pub async fn any(&self, session: &mut Session) -> Result<bool> {
        let plan = self.any_plan(session)?;
        session.run(plan).await
    }

    /// Sum of a numeric member; the default value when nothing matches.
    pub async fn sum<U>(&self, session: &mut Session, path: &Path<U>) -> Result<U>
    where
        U: Primitive + Default,
    {
        let plan = self.aggregate_plan(session, Aggregate::Sum, path)?.map(|value| {
            if value.is_null() {
                Ok(U::default())
            } else {
                U::load(value)
            }
        });
        session.run(plan).await
    }

    pub async fn min<U: Primitive>(
        &self,
        session: &mut Session,
        path: &Path<U>,
    ) -> Result<Option<U>> {
        let plan = self
            .aggregate_plan(session, Aggregate::Min, path)?
            .map(load_optional::<U>);
        session.run(plan).await
    }

    pub async fn max<U: Primitive>(
        &self,
        session: &mut Session,
        path: &Path<U>,
    ) -> Result<Option<U>> {
        let plan = self
            .aggregate_plan(session, Aggregate::Max, path)?
            .map(load_optional::<U>);
        session.run(plan).await
    }

    /// Mean of a numeric member, `None` when nothing matches.
    pub async fn average<U: Primitive>(
        &self,
        session: &mut Session,
        path: &Path<U>,
    ) -> Result<Option<f64>> {
        let plan = self
            .aggregate_plan(session, Aggregate::Avg, path)?
            .map(load_optional::<f64>);
        session.run(plan).await
    }

    /// The command [`Query::to_list`] would run, for inspection.
    pub fn to_command(&self, session: &Session) -> Result<Command> {
        let plan = self.list_plan(session)?;
        Ok(Command::from_statement(
            session.document_store().flavor(),
            &plan.select.into(),
        ))
    }

    pub(crate) fn list_plan(&self, session: &Session) -> Result<Plan<Vec<T>>> {
        let (mapping, select) = self.statement(session, Columns::Documents)?;
        Ok(Plan {
            mapping,
            select,
            read: Box::new(|set, versions| {
                set.rows
                    .into_iter()
                    .map(|row| read_document::<T>(row, versions))
                    .collect()
            }),
        })
    }

    pub(crate) fn first_plan(&self, session: &Session) -> Result<Plan<T>> {
        Ok(self
            .element_plan(session, 1)?
            .map(|docs| docs.into_iter().next().ok_or_else(Error::no_elements)))
    }

    pub(crate) fn first_or_default_plan(&self, session: &Session) -> Result<Plan<Option<T>>> {
        Ok(self
            .element_plan(session, 1)?
            .map(|docs| Ok(docs.into_iter().next())))
    }

    pub(crate) fn single_plan(&self, session: &Session) -> Result<Plan<T>> {
        Ok(self.element_plan(session, 2)?.map(|docs| {
            single(docs)?.ok_or_else(Error::no_elements)
        }))
    }

    pub(crate) fn single_or_default_plan(&self, session: &Session) -> Result<Plan<Option<T>>> {
        Ok(self.element_plan(session, 2)?.map(single))
    }

    pub(crate) fn count_plan(&self, session: &Session) -> Result<Plan<u64>> {
        let (mapping, mut select) = self.statement(session, Columns::Count)?;
        if !select.is_paged() {
            select.order_by.clear();
        }

        Ok(Plan {
            mapping,
            select,
            read: Box::new(|set, _| {
                let count = scalar(set).to_i64()?;
                u64::try_from(count)
                    .map_err(|_| Error::invalid_result(format!("negative row count {count}")))
            }),
        })
    }

    pub(crate) fn any_plan(&self, session: &Session) -> Result<Plan<bool>> {
        let (mapping, mut select) = self.statement(session, Columns::Documents)?;
        select.exists = true;

        Ok(Plan {
            mapping,
            select,
            read: Box::new(|set, _| Ok(scalar(set).to_i64()? != 0)),
        })
    }

    fn element_plan(&self, session: &Session, limit: u64) -> Result<Plan<Vec<T>>> {
        let mut plan = self.list_plan(session)?;
        plan.select.limit = Some(plan.select.limit.map_or(limit, |n| n.min(limit)));
        Ok(plan)
    }

    fn aggregate_plan<U>(
        &self,
        session: &Session,
        aggregate: Aggregate,
        path: &Path<U>,
    ) -> Result<Plan<Value>> {
        let member = session.compile_member::<T>(path.untyped())?;
        let (mapping, mut select) =
            self.statement(session, Columns::Aggregate(aggregate, member.typed().clone()))?;
        if !select.is_paged() {
            select.order_by.clear();
        }

        Ok(Plan {
            mapping,
            select,
            read: Box::new(|set, _| Ok(scalar(set))),
        })
    }

    /// Compiles filters and orderings and applies the session's scopes.
    fn statement(
        &self,
        session: &Session,
        columns: Columns,
    ) -> Result<(Arc<DocumentMapping>, Select)> {
        let store = session.document_store();
        let mapping = store.mapping::<T>();
        let compiler = store.engine().compiler(&mapping);

        let mut select = Select::new(mapping.table.clone(), columns);
        select.filters = self
            .filters
            .iter()
            .map(|filter| compiler.compile(filter))
            .collect::<Result<_>>()?;
        select.order_by = self
            .order_by
            .iter()
            .map(|order_by| compiler.order_by(order_by))
            .collect::<Result<_>>()?;
        select.limit = self.limit;
        select.offset = self.offset;
        select.distinct = self.distinct;
        select.tenant = (!self.any_tenant).then(|| session.tenant().to_string());
        select.deleted = match self.deleted {
            _ if !mapping.is_soft_deleted() => DeletedFilter::Any,
            Some(deleted) => deleted,
            None => DeletedFilter::NotDeleted,
        };

        Ok((mapping, select))
    }
}

/// A single-member projection of a [`Query`].
pub struct SelectQuery<T, U> {
    query: Query<T>,
    path: Path<U>,
    distinct: bool,
}

impl<T: Document, U: Primitive> SelectQuery<T, U> {
    /// Drops duplicate values.
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub async fn to_list(&self, session: &mut Session) -> Result<Vec<U>> {
        let plan = self.plan(session)?;
        session.run(plan).await
    }

    pub(crate) fn plan(&self, session: &Session) -> Result<Plan<Vec<U>>> {
        let member = session.compile_member::<T>(self.path.untyped())?;
        let (mapping, mut select) = self
            .query
            .statement(session, Columns::Locator(member.typed().clone()))?;
        select.distinct |= self.distinct;
        check_distinct_order(&select, member.typed())?;

        Ok(Plan {
            mapping,
            select,
            read: Box::new(|set, _| {
                set.rows
                    .into_iter()
                    .map(|mut row| U::load(row.take(0)))
                    .collect()
            }),
        })
    }
}

/// Distinct values can only be ordered by the value itself.
fn check_distinct_order(select: &Select, projected: &Locator) -> Result<()> {
    let foreign = select
        .order_by
        .iter()
        .any(|order_by| order_by.locator != *projected);

    if select.distinct && foreign {
        return Err(Error::unsupported_feature(
            "a distinct projection can only be ordered by the projected member",
        ));
    }

    Ok(())
}

pub(crate) fn read_document<T: Document>(
    mut row: ValueRecord,
    versions: &mut Versions,
) -> Result<T> {
    let data = match row.take(0) {
        Value::String(data) => data,
        other => {
            return Err(Error::invalid_result(format!(
                "expected a JSON payload, got {}",
                other.kind_name()
            )))
        }
    };

    let doc: T = serde_json::from_str(&data)?;
    let version = row.take(1).to_i64()?;
    versions.record::<T>(doc.id().to_id(), version);

    Ok(doc)
}

fn single<T>(docs: Vec<T>) -> Result<Option<T>> {
    let mut docs = docs.into_iter();
    let first = docs.next();

    if docs.next().is_some() {
        return Err(Error::more_than_one_element());
    }

    Ok(first)
}

/// The first column of the first row; `Null` when there is none.
fn scalar(set: ResultSet) -> Value {
    set.rows
        .into_iter()
        .next()
        .map(|mut row| row.take(0))
        .unwrap_or_default()
}

fn load_optional<U: Primitive>(value: Value) -> Result<Option<U>> {
    if value.is_null() {
        return Ok(None);
    }

    U::load(value).map(Some)
}

impl<T: Document> Default for Query<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Query<T> {
    fn clone(&self) -> Self {
        Query {
            filters: self.filters.clone(),
            order_by: self.order_by.clone(),
            limit: self.limit,
            offset: self.offset,
            distinct: self.distinct,
            any_tenant: self.any_tenant,
            deleted: self.deleted,
            _p: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("filters", &self.filters)
            .field("order_by", &self.order_by)
            .field("limit", &self.limit)
            .field("offset", &self.offset)
            .field("distinct", &self.distinct)
            .field("any_tenant", &self.any_tenant)
            .field("deleted", &self.deleted)
            .finish()
    }
}

impl<T, U> fmt::Debug for SelectQuery<T, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectQuery")
            .field("query", &self.query)
            .field("path", &self.path)
            .field("distinct", &self.distinct)
            .finish()
    }
}
