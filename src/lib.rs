//! Blast Mining - tiered explosive mining ability engine

pub mod core;
pub mod env;
pub mod mining;
pub mod session;

pub use crate::core::{ConfigError, MiningConfig};
pub use env::Env;
pub use mining::BlastMiningEngine;
