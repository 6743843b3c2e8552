//! traitmark-core: Test model, scoring, interpretation, and result assembly.
//!
//! This crate defines the data model for psychometric self-assessment tests,
//! the pure scoring and interpretation functions, and the submission engine
//! that wires them to an injected result repository.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod history;
pub mod interpretation;
pub mod model;
pub mod scoring;
pub mod traits;
