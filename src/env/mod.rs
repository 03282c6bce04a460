//! Traits describing the host game the engine talks to.
//!
//! Oracles expose the world, leveling, messaging and per-material rules. The
//! [`Env`] aggregate bundles them so engine operations can reach everything
//! they need without coupling to concrete host implementations.
mod blocks;
mod clock;
mod rng;

pub use blocks::{BlockRules, StaticBlockRules};
pub use clock::{Clock, ManualClock, SystemClock};
pub use rng::{ChaChaSource, RandomSource};

use crate::core::types::{AbilityKind, ActorId, BlockKind, BlockPos};

/// Block found by the actor's line-of-sight raycast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetBlock {
    pub pos: BlockPos,
    pub kind: BlockKind,
}

/// World queries and mutations owned by the host.
pub trait WorldOracle: Send + Sync {
    /// First non-transparent block along the actor's line of sight.
    fn target_block(&self, actor: ActorId, max_distance: u32) -> Option<TargetBlock>;

    /// Simulate breaking the block; false if protection or another plugin would cancel it.
    fn can_break(&self, actor: ActorId, pos: BlockPos) -> bool;

    /// Spawn a primed explosive tagged with its owner.
    fn spawn_primed_explosive(&self, owner: ActorId, pos: BlockPos, fuse_ticks: u32);

    /// Replace the block with air.
    fn clear_block(&self, pos: BlockPos);
}

/// Why experience is being awarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XpGainReason {
    Pve,
}

/// Experience sink owned by the host's leveling system.
pub trait LevelingOracle: Send + Sync {
    fn apply_xp_gain(&self, actor: ActorId, amount: u32, reason: XpGainReason);
}

/// Structured message for the actor; the host localizes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Ability is still cooling down
    TooTired {
        ability: AbilityKind,
        remaining_secs: u64,
    },
    /// Ability fired
    AbilityActivated { ability: AbilityKind },
    /// Remote detonation flavor text
    Boom,
    /// Cooldown elapsed; ability usable again
    AbilityRefreshed { ability: AbilityKind },
}

/// Message delivery owned by the host.
pub trait MessagingOracle: Send + Sync {
    fn notify(&self, actor: ActorId, notice: Notice);
}

/// Collaborators needed by a single engine call.
#[derive(Clone, Copy)]
pub struct Env<'a> {
    pub world: &'a dyn WorldOracle,
    pub leveling: &'a dyn LevelingOracle,
    pub messaging: &'a dyn MessagingOracle,
    pub blocks: &'a dyn BlockRules,
}

impl<'a> Env<'a> {
    pub fn new(
        world: &'a dyn WorldOracle,
        leveling: &'a dyn LevelingOracle,
        messaging: &'a dyn MessagingOracle,
        blocks: &'a dyn BlockRules,
    ) -> Self {
        Self {
            world,
            leveling,
            messaging,
            blocks,
        }
    }
}
