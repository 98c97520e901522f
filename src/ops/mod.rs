//! High-level operations.

pub mod generate;

pub use generate::{generate, load_registry, GenerateOutcome};
