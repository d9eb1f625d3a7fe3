//! # readyprobe-core
//!
//! Core library for readyprobe providing:
//! - Validated, immutable retry policies
//! - The generalized poll engine (poll until a predicate holds or the budget
//!   is exhausted, then one unconditional final attempt)
//! - Probe outcomes with expected/actual diagnostics
//! - Hierarchical configuration loading (embedded defaults, user file, env)

pub mod config;
pub mod error;
pub mod retry;
pub mod types;

pub use config::HierarchicalConfigLoader;
pub use error::{Error, Result};
