//! Blast mining skill
//!
//! Tiered modifiers unlock as the actor's skill level rises. A sneaking actor
//! holding the detonator can ignite explosives from a distance, and the
//! resulting explosion harvests ore at a rate set by the actor's tier.

pub mod check;
pub mod cooldown;
pub mod drops;
pub mod engine;
pub mod gate;
pub mod tiers;

pub use check::{BonusDrops, MiningCheck, MiningCheckOutcome};
pub use cooldown::{Activation, CooldownStatus, CooldownTracker};
pub use drops::{DropResolver, DropSource, HarvestUnit, ItemDrop, ResolutionOutcome};
pub use engine::{BlastMiningEngine, DetonationOutcome, DetonationRejection, DETONATION_FUSE_TICKS};
pub use gate::{AbilityGate, Enhancement, GateFailure};
pub use tiers::{TierEntry, TierTable};
