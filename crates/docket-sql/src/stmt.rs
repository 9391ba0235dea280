//! The SQL statement model: locators, fragments, and the statements built
//! from them. Nothing here performs I/O; [`crate::CommandBuilder`] renders
//! these values into text and parameters.

mod cast;
pub use cast::Cast;

mod create_table;
pub use create_table::CreateTable;

mod delete;
pub use delete::{Delete, DeleteWhere, UndeleteWhere};

mod deleted_filter;
pub use deleted_filter::DeletedFilter;

mod fragment;
pub use fragment::{Fragment, LikeKind, TemplatePart};

mod json_path;
pub use json_path::JsonPath;

mod locator;
pub use locator::{Conversion, Locator, Source};

mod select;
pub use select::{Aggregate, Columns, OrderBy, Select};

mod statement;
pub use statement::Statement;

mod write;
pub use write::{DocumentWrite, Insert, Update, Upsert};
