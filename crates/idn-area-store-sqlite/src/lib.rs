//! SQLite backend for the Indonesian area store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Besides the read-only
//! [`idn_area_core::store::AreaStore`] implementation, [`SqliteStore::seed`]
//! bulk-loads the five tables from CSV in a single transaction.

mod encode;
mod schema;
mod seed;
mod source;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use schema::Tables;
pub use store::SqliteStore;
