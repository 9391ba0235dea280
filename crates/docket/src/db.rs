mod builder;
pub use builder::Builder;

mod connect;
pub use connect::Connect;

mod options;
pub use options::{Casing, EnumStorage};
pub(crate) use options::Options;

mod pool;
pub(crate) use pool::{Pool, PoolConnection};
pub use pool::{PoolConfig, Timeouts};

use crate::{engine::Engine, Document, Result, Session};

use docket_core::{
    driver::{Capability, ResultSets},
    schema::{DocumentMapping, TableName, DEFAULT_TENANT},
    Error,
};
use docket_sql::{stmt::CreateTable, Command, Flavor};

use std::{
    collections::HashSet,
    sync::{Arc, Mutex, PoisonError},
};

/// Shared state between all `DocumentStore` clones.
#[derive(Debug)]
pub(crate) struct Shared {
    pub(crate) engine: Engine,
    pub(crate) pool: Pool,

    /// Tables known to exist.
    pub(crate) ensured: Mutex<HashSet<TableName>>,
}

/// The entry point: document mappings, translation options and the
/// connection pool, shared by every session opened from it.
///
/// Cloning is cheap and every clone shares the same pool.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    pub(crate) shared: Arc<Shared>,
}

impl DocumentStore {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Opens a session for the default tenant.
    pub fn session(&self) -> Session {
        Session::new(self.clone(), DEFAULT_TENANT.to_string())
    }

    /// Opens a session scoped to `tenant_id`, which must be registered when
    /// the store restricts tenants.
    pub fn session_for_tenant(&self, tenant_id: impl Into<String>) -> Result<Session> {
        let tenant_id = tenant_id.into();
        let tenants = &self.shared.engine.options.tenants;

        if !tenants.is_empty() && !tenants.contains(&tenant_id) {
            return Err(Error::unknown_tenant(tenant_id));
        }

        Ok(Session::new(self.clone(), tenant_id))
    }

    pub fn flavor(&self) -> Flavor {
        self.shared.engine.flavor
    }

    pub fn capability(&self) -> &'static Capability {
        self.shared.pool.capability()
    }

    pub(crate) fn engine(&self) -> &Engine {
        &self.shared.engine
    }

    pub(crate) fn mapping<T: Document>(&self) -> Arc<DocumentMapping> {
        self.shared.engine.mapping::<T>()
    }

    pub(crate) async fn connection(&self) -> Result<PoolConnection> {
        self.shared.pool.get().await
    }

    /// Drops a connection left in an unknown state. Tables are checked again
    /// on the next use, since a replacement may see a different database.
    pub(crate) fn discard(&self, conn: PoolConnection) {
        conn.discard();
        self.shared
            .ensured
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Creates the tables of `mappings` that this store has not seen yet.
    pub(crate) async fn ensure_tables(
        &self,
        conn: &mut PoolConnection,
        mappings: &[Arc<DocumentMapping>],
    ) -> Result<()> {
        let missing = {
            let ensured = self
                .shared
                .ensured
                .lock()
                .unwrap_or_else(PoisonError::into_inner);

            let mut missing: Vec<&DocumentMapping> = vec![];
            for mapping in mappings {
                if !ensured.contains(&mapping.table)
                    && !missing.iter().any(|m| m.table == mapping.table)
                {
                    missing.push(mapping);
                }
            }
            missing
        };

        for mapping in missing {
            let command =
                Command::from_statement(self.flavor(), &CreateTable::for_mapping(mapping).into());
            self.execute(conn, command).await?;

            self.shared
                .ensured
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(mapping.table.clone());
        }

        Ok(())
    }

    /// Runs a row-returning command.
    pub(crate) async fn query(
        &self,
        conn: &mut PoolConnection,
        command: Command,
    ) -> Result<ResultSets> {
        self.check_params(&command)?;
        tracing::debug!(sql = %command.sql, params = command.params.len(), "query");

        let response = conn.exec(command.into_query().into()).await?;
        response.rows.into_result_sets()
    }

    /// Runs a write command, returning the affected row count.
    pub(crate) async fn execute(&self, conn: &mut PoolConnection, command: Command) -> Result<u64> {
        self.check_params(&command)?;
        tracing::debug!(sql = %command.sql, params = command.params.len(), "execute");

        let response = conn.exec(command.into_execute().into()).await?;
        response.rows.into_count()
    }

    fn check_params(&self, command: &Command) -> Result<()> {
        let max = self.capability().max_parameters;

        if command.params.len() > max {
            return Err(Error::unsupported_feature(format!(
                "command binds {} parameters; the database accepts at most {max}",
                command.params.len()
            )));
        }

        Ok(())
    }
}
