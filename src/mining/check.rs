//! Ordinary (non-explosive) block mining
//!
//! Breaking a skill block by hand awards XP, wears the tool harder while the
//! super ability is active, and may double the block's drops.

use serde::{Deserialize, Serialize};

use crate::core::config::DoubleDropsConfig;
use crate::core::types::{ActorProfile, BlockKind, Capability};
use crate::env::{BlockRules, RandomSource};

/// Activation roll ceiling for ordinary actors
pub const ACTIVATION_CHANCE: u32 = 100;

/// Activation roll ceiling with the Lucky perk
pub const LUCKY_ACTIVATION_CHANCE: u32 = 75;

/// Host instruction to mark the block's drops as bonus drops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusDrops {
    /// Drops were earned while the super ability was active
    pub ability_mode: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiningCheckOutcome {
    pub experience: u32,
    /// Extra durability the host should take from the held tool
    pub tool_damage: Option<u32>,
    pub bonus_drops: Option<BonusDrops>,
}

/// Rules for a block broken by hand
#[derive(Debug, Clone, Copy)]
pub struct MiningCheck {
    double_drops: DoubleDropsConfig,
    ability_tool_damage: u32,
}

impl MiningCheck {
    pub fn new(double_drops: DoubleDropsConfig, ability_tool_damage: u32) -> Self {
        Self {
            double_drops,
            ability_tool_damage,
        }
    }

    pub fn evaluate(
        &self,
        actor: &ActorProfile,
        block: &BlockKind,
        rules: &dyn BlockRules,
        rng: &dyn RandomSource,
    ) -> MiningCheckOutcome {
        let mut outcome = MiningCheckOutcome {
            experience: rules.block_xp(block),
            tool_damage: actor.ability_mode.then_some(self.ability_tool_damage),
            bonus_drops: None,
        };

        if !actor.capabilities.contains(Capability::DoubleDrops) {
            return outcome;
        }
        if !rules.double_drops_enabled(block) {
            return outcome;
        }

        if self.roll_double_drops(actor, rng) {
            outcome.bonus_drops = Some(BonusDrops {
                ability_mode: actor.ability_mode,
            });
        }
        outcome
    }

    /// Linear chance up to the bonus cap, rolled against the activation ceiling
    pub fn roll_double_drops(&self, actor: &ActorProfile, rng: &dyn RandomSource) -> bool {
        let ceiling = if actor.capabilities.contains(Capability::Lucky) {
            LUCKY_ACTIVATION_CHANCE
        } else {
            ACTIVATION_CHANCE
        };
        let chance = self.double_drops.chance_at(actor.skill_level);
        chance > rng.next_f32() * ceiling as f32
    }
}
