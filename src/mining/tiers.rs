//! Blast mining tier table
//!
//! Skill level maps to a bracket of modifiers. Brackets are keyed by their
//! minimum level; an actor sits in the highest bracket whose threshold does
//! not exceed their level, or in the neutral bracket below the lowest one.

use serde::{Deserialize, Serialize};

use crate::core::error::ConfigError;

/// Modifiers granted by one tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierEntry {
    /// Minimum skill level for this tier
    pub min_level: u32,
    /// Probability added to the explosion yield for ore blocks (0.0 to 1.0)
    pub ore_bonus_chance: f32,
    /// Probability subtracted from the explosion yield for debris (0.0 to 1.0)
    pub debris_reduction_chance: f32,
    /// Copies of an ore block awarded when its roll succeeds
    pub drop_multiplier: u32,
    /// Added to the explosion radius by Bigger Bombs
    pub blast_radius_delta: f32,
    /// Percent of explosion damage removed by Demolitions Expertise (0 to 100)
    pub blast_damage_reduction_pct: f32,
}

impl TierEntry {
    /// Bracket for actors below every threshold: no benefits
    pub const NEUTRAL: TierEntry = TierEntry {
        min_level: 0,
        ore_bonus_chance: 0.0,
        debris_reduction_chance: 0.0,
        drop_multiplier: 1,
        blast_radius_delta: 0.0,
        blast_damage_reduction_pct: 0.0,
    };

    /// Radius after the Bigger Bombs increase
    pub fn apply_radius(&self, radius: f32) -> f32 {
        radius + self.blast_radius_delta
    }

    /// Damage left after the Demolitions Expertise reduction
    pub fn reduce_damage(&self, damage: f64) -> f64 {
        damage * ((100.0 - self.blast_damage_reduction_pct as f64) / 100.0)
    }
}

static NEUTRAL_TIER: TierEntry = TierEntry::NEUTRAL;

/// Ordered threshold table with a total, monotonic lookup
#[derive(Debug, Clone, PartialEq)]
pub struct TierTable {
    /// Sorted by ascending `min_level`
    entries: Vec<TierEntry>,
}

impl TierTable {
    /// Build a table, rejecting anything that would break the lookup guarantees
    pub fn new(mut entries: Vec<TierEntry>) -> Result<Self, ConfigError> {
        if entries.is_empty() {
            return Err(ConfigError::EmptyTierTable);
        }

        entries.sort_by_key(|entry| entry.min_level);

        for entry in &entries {
            validate_ranges(entry)?;
        }

        for pair in entries.windows(2) {
            let (lower, upper) = (&pair[0], &pair[1]);
            if lower.min_level == upper.min_level {
                return Err(ConfigError::DuplicateThreshold(upper.min_level));
            }
            if upper.drop_multiplier < lower.drop_multiplier {
                return Err(ConfigError::NotMonotonic {
                    level: upper.min_level,
                    field: "drop_multiplier",
                });
            }
            if upper.ore_bonus_chance < lower.ore_bonus_chance {
                return Err(ConfigError::NotMonotonic {
                    level: upper.min_level,
                    field: "ore_bonus_chance",
                });
            }
            if upper.blast_damage_reduction_pct < lower.blast_damage_reduction_pct {
                return Err(ConfigError::NotMonotonic {
                    level: upper.min_level,
                    field: "blast_damage_reduction_pct",
                });
            }
        }

        Ok(Self { entries })
    }

    /// Stock eight-tier table, levels 125 through 1000
    pub fn stock_entries() -> Vec<TierEntry> {
        const ROWS: [(u32, f32, f32, u32, f32, f32); 8] = [
            (125, 0.35, 0.10, 1, 1.0, 0.0),
            (250, 0.40, 0.20, 1, 1.0, 0.0),
            (375, 0.45, 0.30, 1, 2.0, 0.0),
            (500, 0.50, 0.30, 1, 2.0, 25.0),
            (625, 0.55, 0.30, 2, 3.0, 25.0),
            (750, 0.60, 0.30, 2, 3.0, 50.0),
            (875, 0.65, 0.30, 3, 4.0, 50.0),
            (1000, 0.70, 0.30, 3, 4.0, 100.0),
        ];

        ROWS.iter()
            .map(|&(min_level, ore, debris, mult, radius, damage)| TierEntry {
                min_level,
                ore_bonus_chance: ore,
                debris_reduction_chance: debris,
                drop_multiplier: mult,
                blast_radius_delta: radius,
                blast_damage_reduction_pct: damage,
            })
            .collect()
    }

    /// Modifiers for a skill level
    pub fn lookup(&self, level: u32) -> &TierEntry {
        match self.matched_count(level) {
            0 => &NEUTRAL_TIER,
            n => &self.entries[n - 1],
        }
    }

    /// 1-based rank of the matched tier counted from the lowest threshold, 0 if none
    pub fn tier_index(&self, level: u32) -> u8 {
        self.matched_count(level).min(u8::MAX as usize) as u8
    }

    /// Threshold of the tier with the given 1-based rank
    pub fn threshold(&self, rank: u8) -> Option<u32> {
        let idx = (rank as usize).checked_sub(1)?;
        self.entries.get(idx).map(|entry| entry.min_level)
    }

    /// Threshold of tier one
    pub fn lowest_threshold(&self) -> u32 {
        // Non-empty by construction
        self.entries[0].min_level
    }

    pub fn entries(&self) -> &[TierEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn matched_count(&self, level: u32) -> usize {
        self.entries.partition_point(|entry| entry.min_level <= level)
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            entries: Self::stock_entries(),
        }
    }
}

fn validate_ranges(entry: &TierEntry) -> Result<(), ConfigError> {
    let out_of_range = |field: &'static str, value: f64| ConfigError::OutOfRange {
        level: entry.min_level,
        field,
        value,
    };

    if !(0.0..=1.0).contains(&entry.ore_bonus_chance) {
        return Err(out_of_range("ore_bonus_chance", entry.ore_bonus_chance as f64));
    }
    if !(0.0..=1.0).contains(&entry.debris_reduction_chance) {
        return Err(out_of_range(
            "debris_reduction_chance",
            entry.debris_reduction_chance as f64,
        ));
    }
    if entry.drop_multiplier < 1 {
        return Err(out_of_range("drop_multiplier", entry.drop_multiplier as f64));
    }
    if !entry.blast_radius_delta.is_finite() {
        return Err(out_of_range(
            "blast_radius_delta",
            entry.blast_radius_delta as f64,
        ));
    }
    if !(0.0..=100.0).contains(&entry.blast_damage_reduction_pct) {
        return Err(out_of_range(
            "blast_damage_reduction_pct",
            entry.blast_damage_reduction_pct as f64,
        ));
    }
    Ok(())
}
