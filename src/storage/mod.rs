// storage/mod.rs
// Database operations module

pub mod migrations;
pub mod models;
pub mod pool;
pub mod store;

// Re-export commonly used items
pub use migrations::bootstrap_schema;
pub use models::LogRecord;
pub use pool::init_db_pool_with_path;
pub use store::RecordStore;
