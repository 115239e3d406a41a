//! Terramark Core - entity model, error taxonomy, config, seed data

pub mod config;
pub mod error;
pub mod seed;
pub mod types;

pub use config::StoreConfig;
pub use error::{Error, Result};
pub use types::*;
