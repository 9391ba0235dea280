pub use docket_core::driver::{
    operation::{self, Operation},
    Capability, Connection, Dialect, Driver, Response, ResultSet, ResultSets, Rows,
};
