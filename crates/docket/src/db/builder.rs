use super::{Casing, Connect, DocumentStore, EnumStorage, Options, Pool, PoolConfig, Shared};
use crate::{
    engine::{Engine, MethodRegistry},
    MethodTranslator, Result,
};

use docket_core::driver::Driver;

use std::{sync::Arc, time::Duration};

#[derive(Debug, Default)]
pub struct Builder {
    options: Options,
    methods: MethodRegistry,
    pool: PoolConfig,
}

impl Builder {
    /// Schema holding the document tables. Defaults to `dbo`.
    pub fn schema_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.options.schema_name = name.into();
        self
    }

    /// Set the table name prefix for all tables. Defaults to `doc_`.
    pub fn table_name_prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.options.table_name_prefix = prefix.into();
        self
    }

    pub fn casing(&mut self, casing: Casing) -> &mut Self {
        self.options.casing = casing;
        self
    }

    pub fn enum_storage(&mut self, enum_storage: EnumStorage) -> &mut Self {
        self.options.enum_storage = enum_storage;
        self
    }

    /// Registers the tenants sessions may be opened for. Until one is
    /// registered, any tenant id is accepted.
    pub fn tenants<I>(&mut self, tenants: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.options
            .tenants
            .extend(tenants.into_iter().map(Into::into));
        self
    }

    /// Adds a method translator, consulted before the built-in ones.
    pub fn register_method(&mut self, translator: impl MethodTranslator) -> &mut Self {
        self.methods.register(translator);
        self
    }

    pub fn pool(&mut self, config: PoolConfig) -> &mut Self {
        self.pool = config;
        self
    }

    /// Upper bound on one `save_changes` transaction. Defaults to 5 seconds.
    pub fn transaction_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.options.transaction_timeout = timeout;
        self
    }

    pub async fn connect(&mut self, url: &str) -> Result<DocumentStore> {
        self.build(Connect::new(url)?).await
    }

    pub async fn build(&mut self, driver: impl Driver) -> Result<DocumentStore> {
        let pool = Pool::new(driver, self.pool.clone())?;
        let engine = Engine::new(
            self.options.clone(),
            pool.capability().into(),
            self.methods.clone(),
        );

        Ok(DocumentStore {
            shared: Arc::new(Shared {
                engine,
                pool,
                ensured: Default::default(),
            }),
        })
    }
}
