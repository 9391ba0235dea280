pub mod serializer;
pub use serializer::{Command, CommandBuilder, Flavor, Param};

pub mod stmt;
pub use stmt::{Fragment, Locator, Statement};
