//! Mining skill configuration with documented defaults
//!
//! Every tunable number the engine reads lives here. The host loads it once
//! (usually from TOML) and hands it to the engine read-only.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::{ConfigError, Result};
use crate::core::types::{BlockKind, ItemKind, Millis};
use crate::env::StaticBlockRules;
use crate::mining::tiers::{TierEntry, TierTable};

/// Configuration for the mining skill
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningConfig {
    // === BLAST MINING ===
    /// Tier brackets, in any order
    pub tiers: Vec<TierEntry>,

    /// Seconds between remote detonations
    ///
    /// Re-arm fires exactly this long after activation.
    pub cooldown_secs: u64,

    /// Item that must be held to detonate remotely
    pub detonator: ItemKind,

    /// Block that remote detonation can ignite
    pub explosive_block: BlockKind,

    /// How far the detonation raycast reaches (blocks)
    pub max_detonation_distance: u32,

    /// Tier rank that unlocks Bigger Bombs
    pub bigger_bombs_rank: u8,

    /// Tier rank that unlocks Demolitions Expertise
    pub demolitions_expertise_rank: u8,

    // === ORDINARY MINING ===
    /// Durability lost per block mined while the super ability is active
    pub ability_tool_damage: u32,

    /// Chance curve for double drops
    pub double_drops: DoubleDropsConfig,

    /// Blocks that award mining XP
    pub blocks: Vec<BlockRule>,
}

/// Linear chance curve for ordinary-mining double drops
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoubleDropsConfig {
    /// Chance in percent reached at `max_bonus_level`
    pub max_chance: f32,
    /// Level at which the chance stops growing
    pub max_bonus_level: u32,
}

impl Default for DoubleDropsConfig {
    fn default() -> Self {
        Self {
            max_chance: 100.0,
            max_bonus_level: 1000,
        }
    }
}

impl DoubleDropsConfig {
    /// Chance in percent for a skill level
    pub fn chance_at(&self, level: u32) -> f32 {
        (self.max_chance / self.max_bonus_level as f32) * level.min(self.max_bonus_level) as f32
    }
}

/// A block that belongs to the mining skill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockRule {
    pub kind: BlockKind,
    pub xp: u32,
    #[serde(default = "default_true")]
    pub double_drops: bool,
}

fn default_true() -> bool {
    true
}

impl BlockRule {
    pub fn new(kind: &str, xp: u32) -> Self {
        Self {
            kind: BlockKind::new(kind),
            xp,
            double_drops: true,
        }
    }
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            tiers: TierTable::stock_entries(),
            cooldown_secs: 60,
            detonator: ItemKind::new("flint_and_steel"),
            explosive_block: BlockKind::new("tnt"),
            max_detonation_distance: 100,
            bigger_bombs_rank: 2,
            demolitions_expertise_rank: 4,
            ability_tool_damage: 1,
            double_drops: DoubleDropsConfig::default(),
            blocks: vec![
                BlockRule::new("stone", 30),
                BlockRule::new("sandstone", 30),
                BlockRule::new("netherrack", 30),
                BlockRule::new("coal_ore", 100),
                BlockRule::new("nether_quartz_ore", 100),
                BlockRule::new("redstone_ore", 150),
                BlockRule::new("obsidian", 150),
                BlockRule::new("iron_ore", 250),
                BlockRule::new("gold_ore", 350),
                BlockRule::new("lapis_ore", 400),
                BlockRule::new("diamond_ore", 750),
                BlockRule::new("emerald_ore", 1000),
            ],
        }
    }
}

impl MiningConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate a config from a TOML file
    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse and validate a config from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: MiningConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }

    /// Build the validated tier table
    pub fn tier_table(&self) -> Result<TierTable> {
        TierTable::new(self.tiers.clone())
    }

    /// Build the per-material rules façade
    pub fn block_rules(&self) -> StaticBlockRules {
        StaticBlockRules::new(&self.blocks)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let table = self.tier_table()?;

        for (name, rank) in [
            ("bigger_bombs_rank", self.bigger_bombs_rank),
            ("demolitions_expertise_rank", self.demolitions_expertise_rank),
        ] {
            if table.threshold(rank).is_none() {
                return Err(ConfigError::InvalidSetting(format!(
                    "{} ({}) must name one of the {} tiers",
                    name,
                    rank,
                    table.len()
                )));
            }
        }

        // Activation timestamps are i64 millis
        if Millis::try_from(self.cooldown().as_millis()).is_err() {
            return Err(ConfigError::InvalidSetting(format!(
                "cooldown_secs ({}) exceeds the millisecond timestamp range",
                self.cooldown_secs
            )));
        }

        if self.max_detonation_distance == 0 {
            return Err(ConfigError::InvalidSetting(
                "max_detonation_distance must be positive".into(),
            ));
        }

        if !(0.0..=100.0).contains(&self.double_drops.max_chance) {
            return Err(ConfigError::InvalidSetting(format!(
                "double_drops.max_chance ({}) must be a percentage",
                self.double_drops.max_chance
            )));
        }

        if self.double_drops.max_bonus_level == 0 {
            return Err(ConfigError::InvalidSetting(
                "double_drops.max_bonus_level must be positive".into(),
            ));
        }

        Ok(())
    }
}
