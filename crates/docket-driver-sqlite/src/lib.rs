mod value;
use value::Value;

use docket_core::{
    async_trait,
    driver::{
        operation::{Operation, Transaction},
        Capability, Driver, Response, ResultSet,
    },
    stmt::{self, ValueRecord},
    Error, Result,
};
use rusqlite::{ffi, Batch, Connection as RusqliteConnection};
use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};
use url::Url;

#[derive(Debug)]
pub enum Sqlite {
    File(PathBuf),
    InMemory,
}

impl Sqlite {
    /// Create a new SQLite driver with an arbitrary connection URL
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str)
            .map_err(|err| Error::invalid_connection_url(format!("{url_str}: {err}")))?;

        if url.scheme() != "sqlite" {
            return Err(Error::invalid_connection_url(format!(
                "connection URL does not have a `sqlite` scheme; url={url_str}"
            )));
        }

        if url.path() == ":memory:" {
            Ok(Self::InMemory)
        } else {
            Ok(Self::File(PathBuf::from(url.path())))
        }
    }

    /// Create an in-memory SQLite database
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }
}

#[async_trait]
impl Driver for Sqlite {
    fn url(&self) -> Cow<'_, str> {
        match self {
            Sqlite::InMemory => Cow::Borrowed("sqlite::memory:"),
            Sqlite::File(path) => Cow::Owned(format!("sqlite:{}", path.display())),
        }
    }

    fn capability(&self) -> &'static Capability {
        &Capability::SQLITE
    }

    async fn connect(&self) -> Result<Box<dyn docket_core::driver::Connection>> {
        let connection = match self {
            Sqlite::File(path) => Connection::open(path)?,
            Sqlite::InMemory => Connection::in_memory()?,
        };
        Ok(Box::new(connection))
    }

    /// Every in-memory connection would see its own database.
    fn max_connections(&self) -> Option<usize> {
        matches!(self, Self::InMemory).then_some(1)
    }
}

#[derive(Debug)]
pub struct Connection {
    connection: RusqliteConnection,
}

impl Connection {
    pub fn in_memory() -> Result<Self> {
        let connection =
            RusqliteConnection::open_in_memory().map_err(Error::driver_operation_failed)?;
        Self::configure(connection)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = RusqliteConnection::open(path).map_err(Error::driver_operation_failed)?;
        Self::configure(connection)
    }

    fn configure(connection: RusqliteConnection) -> Result<Self> {
        // `LIKE` matches case-insensitively by default
        connection
            .execute_batch("PRAGMA case_sensitive_like = ON;")
            .map_err(Error::driver_operation_failed)?;
        Ok(Self { connection })
    }

    fn transaction(&mut self, op: Transaction) -> Result<Response> {
        let sql = match op {
            Transaction::Start => "BEGIN",
            Transaction::Commit => "COMMIT",
            Transaction::Rollback => "ROLLBACK",
        };

        self.connection
            .execute(sql, [])
            .map_err(Error::driver_operation_failed)?;
        Ok(Response::count(0))
    }

    /// Runs each `;`-terminated statement of `sql` in turn.
    ///
    /// Placeholders are numbered across the whole text, so every statement
    /// binds the leading slice of `params` its highest placeholder reaches.
    fn run(&self, sql: &str, params: &[stmt::Value]) -> Result<(Vec<ResultSet>, u64)> {
        let mut batch = Batch::new(&self.connection, sql);
        let mut sets = vec![];
        let mut count = 0;

        while let Some(mut statement) = batch.next().map_err(driver_error)? {
            let bound = params
                .get(..statement.parameter_count())
                .ok_or_else(|| {
                    Error::invalid_result(format!(
                        "statement expects {} parameters, {} were supplied",
                        statement.parameter_count(),
                        params.len()
                    ))
                })?
                .iter()
                .map(Value);
            let bound = rusqlite::params_from_iter(bound);

            let width = statement.column_count();
            if width == 0 {
                count += statement.execute(bound).map_err(driver_error)? as u64;
                continue;
            }

            let mut rows = statement.query(bound).map_err(driver_error)?;
            let mut set = vec![];

            while let Some(row) = rows.next().map_err(driver_error)? {
                let fields = (0..width)
                    .map(|index| {
                        let value = row.get_ref(index).map_err(driver_error)?;
                        Value::load(value)
                    })
                    .collect::<Result<Vec<_>>>()?;

                set.push(ValueRecord::from_vec(fields));
            }

            sets.push(ResultSet::from_vec(set));
        }

        Ok((sets, count))
    }
}

#[async_trait]
impl docket_core::driver::Connection for Connection {
    async fn exec(&mut self, op: Operation) -> Result<Response> {
        match op {
            Operation::QuerySql(op) => {
                let (sets, _) = self.run(&op.sql, &op.params)?;
                Ok(Response::result_sets(sets))
            }
            Operation::ExecuteSql(op) => {
                let (_, count) = self.run(&op.sql, &op.params)?;
                Ok(Response::count(count))
            }
            Operation::Transaction(op) => self.transaction(op),
        }
    }
}

/// Key violations become [`Error::duplicate_key`] so the session can report
/// the document that collided.
fn driver_error(err: rusqlite::Error) -> Error {
    let duplicate = err.sqlite_error().is_some_and(|err| {
        matches!(
            err.extended_code,
            ffi::SQLITE_CONSTRAINT_PRIMARYKEY | ffi::SQLITE_CONSTRAINT_UNIQUE
        )
    });

    if duplicate {
        Error::duplicate_key(err)
    } else {
        Error::driver_operation_failed(err)
    }
}
