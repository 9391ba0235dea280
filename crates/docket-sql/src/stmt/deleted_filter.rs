use chrono::{DateTime, Utc};

/// Which rows of a soft-deletable table a read sees.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DeletedFilter {
    /// Live and deleted rows alike. Always used for hard-delete tables.
    Any,

    #[default]
    NotDeleted,

    Deleted,

    DeletedSince(DateTime<Utc>),

    DeletedBefore(DateTime<Utc>),
}
