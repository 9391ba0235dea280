//! A document store over relational databases.
//!
//! Documents are serialized to JSON and kept one row per document, queried
//! through a typed predicate DSL compiled to parameterized SQL, and written
//! through a [`Session`] that commits queued changes in one transaction.

mod batch;
pub use batch::{Batch, Deferred};

pub mod db;
pub use db::{Builder, Casing, DocumentStore, EnumStorage, PoolConfig};

pub mod document;
pub use document::{Document, DocumentId, MappingBuilder};

pub mod driver;

mod engine;
pub use engine::{Member, MethodContext, MethodTranslator};

mod query;
pub use query::{Query, SelectQuery};

mod session;
pub use session::Session;

pub mod stmt;

pub use docket_core::{bail, err, Error, Result};
pub use docket_sql::{
    stmt::{LikeKind, TemplatePart},
    Command, Flavor, Fragment, Param,
};
