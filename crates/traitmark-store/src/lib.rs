//! traitmark-store: result repositories and configuration.
//!
//! Implements the `ResultRepository` trait in memory and on disk as JSON,
//! and loads the `traitmark.toml` configuration.

pub mod config;
pub mod json;
pub mod memory;

pub use config::{load_config, load_config_from, TraitmarkConfig};
pub use json::JsonFileRepository;
pub use memory::MemoryRepository;
