mod capability;
pub use capability::{Capability, Dialect};

mod response;
pub use response::{Response, ResultSet, ResultSets, Rows};

pub mod operation;
pub use operation::Operation;

use crate::async_trait;

use std::{borrow::Cow, fmt::Debug};

#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Returns the URL this driver is connecting to.
    fn url(&self) -> Cow<'_, str>;

    /// Describes the driver's capability, which selects the SQL flavor.
    fn capability(&self) -> &'static Capability;

    /// Creates a new connection to the database.
    ///
    /// Called by the pool whenever it needs a fresh connection.
    async fn connect(&self) -> crate::Result<Box<dyn Connection>>;

    /// Returns the maximum number of simultaneous database connections
    /// supported. For example, this is `Some(1)` for an in-memory SQLite
    /// database, where every connection would otherwise see its own database.
    fn max_connections(&self) -> Option<usize> {
        None
    }
}

#[async_trait]
pub trait Connection: Debug + Send + 'static {
    /// Execute a database operation.
    ///
    /// A [`Operation::QuerySql`] may hold several `;`-terminated statements;
    /// the driver returns one result set per row-returning statement, in
    /// statement order.
    async fn exec(&mut self, op: Operation) -> crate::Result<Response>;
}
