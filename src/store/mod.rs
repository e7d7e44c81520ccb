pub mod config;
pub use config::*;

pub mod record;
pub use record::*;

pub mod staging;
pub use staging::*;

pub mod ingest;
pub use ingest::*;

pub mod record_store;
pub use record_store::*;
