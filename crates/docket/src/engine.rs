mod compile;
pub(crate) use compile::Compiler;

mod methods;
pub(crate) use methods::MethodRegistry;
pub use methods::{MethodContext, MethodTranslator};

mod resolve;
pub use resolve::Member;

use crate::{db::Options, Document, MappingBuilder};

use docket_core::schema::DocumentMapping;
use docket_sql::Flavor;
use indexmap::IndexMap;

use std::{
    any::TypeId,
    sync::{Arc, PoisonError, RwLock},
};

/// Second argument of a case-insensitive `equals` call.
pub(crate) const IGNORE_CASE: &str = "ignore_case";

/// Translation state shared by every session of a store: options, the SQL
/// flavor, method translators and the mapping cache.
#[derive(Debug)]
pub(crate) struct Engine {
    pub(crate) options: Options,
    pub(crate) flavor: Flavor,
    pub(crate) methods: MethodRegistry,

    /// Built on first use of each document type, then immutable.
    mappings: RwLock<IndexMap<TypeId, Arc<DocumentMapping>>>,
}

impl Engine {
    pub(crate) fn new(options: Options, flavor: Flavor, methods: MethodRegistry) -> Engine {
        Engine {
            options,
            flavor,
            methods,
            mappings: RwLock::new(IndexMap::new()),
        }
    }

    pub(crate) fn mapping<T: Document>(&self) -> Arc<DocumentMapping> {
        let key = TypeId::of::<T>();

        if let Some(mapping) = self
            .mappings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return mapping.clone();
        }

        let mut builder = MappingBuilder::new();
        T::configure(&mut builder);
        let mapping = Arc::new(builder.build::<T>(
            &self.options.schema_name,
            &self.options.table_name_prefix,
        ));

        self.mappings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_insert(mapping)
            .clone()
    }

    pub(crate) fn compiler<'a>(&'a self, mapping: &'a DocumentMapping) -> Compiler<'a> {
        Compiler::new(self, mapping)
    }
}
