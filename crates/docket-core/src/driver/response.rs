use std::collections::VecDeque;

use crate::{stmt::ValueRecord, Error, Result};

#[derive(Debug)]
pub struct Response {
    pub rows: Rows,
}

#[derive(Debug)]
pub enum Rows {
    /// Number of rows impacted by the operation
    Count(u64),

    /// One buffered result set per row-returning statement
    ResultSets(ResultSets),
}

/// A reader over the result sets of a multi-statement command.
///
/// The reader starts positioned on the first result set. Callers consume the
/// current set with [`ResultSets::take_current`] and move to the following
/// one with [`ResultSets::next_result`], so sets are read strictly in the
/// order their statements were issued.
#[derive(Debug, Default)]
pub struct ResultSets {
    current: Option<ResultSet>,
    remaining: VecDeque<ResultSet>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ResultSet {
    pub rows: Vec<ValueRecord>,
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self {
            rows: Rows::Count(count),
        }
    }

    pub fn result_sets(sets: Vec<ResultSet>) -> Self {
        Self {
            rows: Rows::ResultSets(ResultSets::from_vec(sets)),
        }
    }
}

impl Rows {
    pub fn is_count(&self) -> bool {
        matches!(self, Self::Count(_))
    }

    pub fn into_count(self) -> Result<u64> {
        match self {
            Rows::Count(count) => Ok(count),
            Rows::ResultSets(_) => Err(Error::invalid_result(
                "expected a row count, got result sets",
            )),
        }
    }

    pub fn into_result_sets(self) -> Result<ResultSets> {
        match self {
            Rows::ResultSets(sets) => Ok(sets),
            Rows::Count(_) => Err(Error::invalid_result(
                "expected result sets, got a row count",
            )),
        }
    }
}

impl ResultSets {
    pub fn from_vec(sets: Vec<ResultSet>) -> Self {
        let mut remaining = VecDeque::from(sets);
        let current = remaining.pop_front();
        Self { current, remaining }
    }

    /// Takes the rows of the result set the reader is positioned on.
    pub fn take_current(&mut self) -> Result<ResultSet> {
        self.current
            .take()
            .ok_or_else(|| Error::invalid_result("no result set is available to read"))
    }

    /// Advances to the next result set, discarding any unread rows of the
    /// current one. Returns `false` once every set has been visited.
    pub fn next_result(&mut self) -> bool {
        self.current = self.remaining.pop_front();
        self.current.is_some()
    }

    /// Number of sets not yet advanced past, including the current one.
    pub fn len(&self) -> usize {
        self.remaining.len() + usize::from(self.current.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResultSet {
    pub fn from_vec(rows: Vec<ValueRecord>) -> Self {
        Self { rows }
    }
}

impl IntoIterator for ResultSet {
    type Item = ValueRecord;
    type IntoIter = std::vec::IntoIter<ValueRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
