pub mod config;
pub mod error;
pub mod types;

pub use config::{BlockRule, DoubleDropsConfig, MiningConfig};
pub use error::{ConfigError, Result, SchedulerError};
pub use types::{
    AbilityKind, ActorId, ActorProfile, BlockKind, BlockPos, Capabilities, Capability, ItemKind,
    Millis, Posture,
};
