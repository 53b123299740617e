//! Core types and trait definitions for the Indonesian area store.
//!
//! No HTTP or database code lives here. The SQLite backend and both
//! adapters build on these types.

pub mod area;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod seed;
pub mod store;

pub use error::{Error, Result};
