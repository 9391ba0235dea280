mod exec_log;
pub use exec_log::ExecLog;

mod logging_driver;
pub use logging_driver::{DriverOp, Faults, LoggingDriver};

pub mod models;

use docket::{db::Builder, DocumentStore};
use docket_driver_sqlite::Sqlite;
use tracing_subscriber::EnvFilter;

/// A store over a fresh in-memory database, plus the log of every operation
/// its connections ran.
#[derive(Debug)]
pub struct Fixture {
    pub store: DocumentStore,
    pub log: ExecLog,
    pub faults: Faults,
}

pub async fn setup() -> Fixture {
    setup_with(|_| {}).await
}

pub async fn setup_with(configure: impl FnOnce(&mut Builder)) -> Fixture {
    init_tracing();

    let driver = LoggingDriver::new(Sqlite::in_memory());
    let log = ExecLog::new(driver.ops_log_handle());
    let faults = driver.faults_handle();

    let mut builder = DocumentStore::builder();
    configure(&mut builder);
    let store = builder.build(driver).await.unwrap();

    Fixture { store, log, faults }
}

/// Honors `RUST_LOG`; safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
