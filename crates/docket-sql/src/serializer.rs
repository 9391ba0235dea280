#[macro_use]
mod fmt;
use fmt::ToSql;

mod create_table;

mod delim;
use delim::{Comma, Delimited};

mod flavor;
pub use flavor::Flavor;

mod fragment;

mod ident;
use ident::{Ident, Quoted};

mod locator;

mod params;
pub use params::Placeholder;

mod select;

mod statement;

mod write;

use crate::stmt::{Fragment, Statement};

use docket_core::{
    driver::operation::{ExecuteSql, QuerySql},
    stmt::Value,
};

/// Accumulates SQL text and positional parameters for one command.
///
/// Statements are appended one after another, each terminated with `;`, so a
/// single builder can hold every statement of a batch. Each value added gets
/// the next positional placeholder (`@P1`, `@P2`, ... on SQL Server, `?1`,
/// `?2`, ... on SQLite), which keeps values out of the SQL text.
#[derive(Debug)]
pub struct CommandBuilder {
    flavor: Flavor,

    /// The SQL text written so far
    sql: String,

    params: Vec<Param>,
}

/// A bound parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// The placeholder as it appears in the SQL text.
    pub name: String,
    pub value: Value,
}

/// A finished command: SQL text plus its parameters in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub sql: String,
    pub params: Vec<Param>,
}

impl CommandBuilder {
    pub fn new(flavor: Flavor) -> CommandBuilder {
        CommandBuilder {
            flavor,
            sql: String::new(),
            params: vec![],
        }
    }

    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    /// Appends a complete statement, terminated by `;`.
    pub fn append(&mut self, stmt: &Statement) {
        if !self.sql.is_empty() {
            self.sql.push('\n');
        }
        stmt.to_sql(self);
        self.sql.push(';');
    }

    /// Appends a predicate on its own, without a statement around it.
    pub fn append_fragment(&mut self, fragment: &Fragment) {
        fragment.to_sql(self);
    }

    /// Registers a parameter value and returns its placeholder.
    pub fn add_param(&mut self, value: Value) -> Placeholder {
        let placeholder = Placeholder(self.params.len() + 1);
        self.params.push(Param {
            name: placeholder.name(self.flavor),
            value,
        });
        placeholder
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    pub fn build(self) -> Command {
        Command {
            sql: self.sql,
            params: self.params,
        }
    }
}

impl Command {
    /// Renders a single statement into its own command.
    pub fn from_statement(flavor: Flavor, stmt: &Statement) -> Command {
        let mut builder = CommandBuilder::new(flavor);
        builder.append(stmt);
        builder.build()
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.params.iter().map(|param| &param.value)
    }

    pub fn into_query(self) -> QuerySql {
        QuerySql {
            sql: self.sql,
            params: self.params.into_iter().map(|param| param.value).collect(),
        }
    }

    pub fn into_execute(self) -> ExecuteSql {
        ExecuteSql {
            sql: self.sql,
            params: self.params.into_iter().map(|param| param.value).collect(),
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.sql)
    }
}
