use crate::{
    query::Plan,
    session::Versions,
    stmt::Primitive,
    Document, DocumentId, Query, Result, SelectQuery, Session,
};

use docket_core::{driver::ResultSet, err, schema::DocumentMapping};
use docket_sql::{stmt::Statement, CommandBuilder};

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};
use tokio::sync::oneshot;

/// Reads collected without I/O and sent together in one command.
///
/// Each read returns a [`Deferred`] that resolves once [`Batch::execute`]
/// has run; results are read back in the order the reads were added.
///
/// ```ignore
/// let mut batch = session.batch();
/// let user = batch.load::<User>(1);
/// let open = batch.count(&session_query)?;
/// batch.execute().await?;
///
/// let user = user.await?;
/// let open = open.await?;
/// ```
pub struct Batch<'s> {
    session: &'s mut Session,
    items: Vec<Item>,
}

struct Item {
    mapping: Arc<DocumentMapping>,
    statement: Statement,
    complete: Box<dyn FnOnce(Result<ResultSet>, &mut Versions) + Send>,
}

/// The result of one batched read. Resolves with an error if the batch is
/// dropped without executing.
#[derive(Debug)]
pub struct Deferred<O> {
    rx: oneshot::Receiver<Result<O>>,
}

impl<'s> Batch<'s> {
    pub(crate) fn new(session: &'s mut Session) -> Batch<'s> {
        Batch {
            session,
            items: vec![],
        }
    }

    /// Loads a document by id, with the same tenant and soft-delete scoping
    /// as [`Session::load`].
    pub fn load<T: Document>(&mut self, id: impl Into<T::Id>) -> Deferred<Option<T>> {
        let plan = self.session.load_plan::<T>(id.into().to_id());
        self.push(plan)
    }

    pub fn list<T: Document>(&mut self, query: &Query<T>) -> Result<Deferred<Vec<T>>> {
        let plan = query.list_plan(self.session)?;
        Ok(self.push(plan))
    }

    pub fn first<T: Document>(&mut self, query: &Query<T>) -> Result<Deferred<T>> {
        let plan = query.first_plan(self.session)?;
        Ok(self.push(plan))
    }

    pub fn first_or_default<T: Document>(
        &mut self,
        query: &Query<T>,
    ) -> Result<Deferred<Option<T>>> {
        let plan = query.first_or_default_plan(self.session)?;
        Ok(self.push(plan))
    }

    pub fn single<T: Document>(&mut self, query: &Query<T>) -> Result<Deferred<T>> {
        let plan = query.single_plan(self.session)?;
        Ok(self.push(plan))
    }

    pub fn single_or_default<T: Document>(
        &mut self,
        query: &Query<T>,
    ) -> Result<Deferred<Option<T>>> {
        let plan = query.single_or_default_plan(self.session)?;
        Ok(self.push(plan))
    }

    pub fn count<T: Document>(&mut self, query: &Query<T>) -> Result<Deferred<u64>> {
        let plan = query.count_plan(self.session)?;
        Ok(self.push(plan))
    }

    pub fn any<T: Document>(&mut self, query: &Query<T>) -> Result<Deferred<bool>> {
        let plan = query.any_plan(self.session)?;
        Ok(self.push(plan))
    }

    pub fn values<T: Document, U: Primitive>(
        &mut self,
        query: &SelectQuery<T, U>,
    ) -> Result<Deferred<Vec<U>>> {
        let plan = query.plan(self.session)?;
        Ok(self.push(plan))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn push<O: Send + 'static>(&mut self, plan: Plan<O>) -> Deferred<O> {
        let (tx, rx) = oneshot::channel();
        let Plan {
            mapping,
            select,
            read,
        } = plan;

        self.items.push(Item {
            mapping,
            statement: select.into(),
            complete: Box::new(move |result, versions| {
                // The receiver may already be gone
                let _ = tx.send(result.and_then(|set| read(set, versions)));
            }),
        });

        Deferred { rx }
    }

    /// Sends every read as one command and resolves each [`Deferred`].
    ///
    /// If the command fails, every read resolves with that error and it is
    /// also returned here. A read whose own result fails to decode does not
    /// affect the others.
    pub async fn execute(self) -> Result<()> {
        let Batch { session, items } = self;

        if items.is_empty() {
            return Ok(());
        }

        let mut mappings: Vec<Arc<DocumentMapping>> = vec![];
        for item in &items {
            if !mappings.iter().any(|mapping| mapping.table == item.mapping.table) {
                mappings.push(item.mapping.clone());
            }
        }

        let store = session.document_store().clone();
        let mut builder = CommandBuilder::new(store.flavor());
        for item in &items {
            builder.append(&item.statement);
        }

        let result = async {
            let mut conn = store.connection().await?;
            store.ensure_tables(&mut conn, &mappings).await?;
            store.query(&mut conn, builder.build()).await
        }
        .await;

        let mut sets = match result {
            Ok(sets) => sets,
            Err(err) => {
                for item in items {
                    (item.complete)(Err(err.clone()), &mut session.versions);
                }
                return Err(err);
            }
        };

        for (index, item) in items.into_iter().enumerate() {
            if index > 0 {
                sets.next_result();
            }

            let set = sets.take_current();
            tracing::trace!(
                index,
                rows = set.as_ref().map_or(0, |set| set.rows.len()),
                "batch item"
            );
            (item.complete)(set, &mut session.versions);
        }

        Ok(())
    }
}

impl<O> Future for Deferred<O> {
    type Output = Result<O>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<O>> {
        Pin::new(&mut self.rx).poll(cx).map(|result| {
            result.unwrap_or_else(|_| Err(err!("batch was dropped before it executed")))
        })
    }
}

impl std::fmt::Debug for Batch<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Batch")
            .field("items", &self.items.len())
            .finish()
    }
}
