pub mod sqlite_warning_store;

pub use sqlite_warning_store::SqliteWarningStore;
