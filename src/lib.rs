// Library interface for testing

// Declare all modules
pub mod config;
pub mod credentials;
pub mod db_postgres;
pub mod error;
pub mod loaders;
pub mod memory_store;
pub mod models;
pub mod partition;
pub mod payload;
pub mod queries;
pub mod schema;
pub mod serve;
pub mod store;
pub mod timestamp;

pub use error::{IngestError, Result};
pub use loaders::{process_all_metrics, IngestSummary};
