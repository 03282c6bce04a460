//! Drop resolution for blocks destroyed by an explosion
//!
//! Each affected block gets at most one roll. Ore blocks roll against the
//! explosion yield plus the tier's ore bonus and, on success, drop the full
//! multiplier of copies. Everything else rolls against the yield minus the
//! tier's debris reduction and drops whatever the world normally drops.

use serde::{Deserialize, Serialize};

use crate::core::types::BlockKind;
use crate::env::{BlockRules, RandomSource};
use crate::mining::tiers::TierEntry;

/// One block caught in an explosion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestUnit {
    pub kind: BlockKind,
    pub is_ore: bool,
    /// Inventory-holding block (chest, furnace, ...)
    pub is_container: bool,
    /// Placed by a player or already credited by another system
    pub already_claimed: bool,
}

impl HarvestUnit {
    pub fn ore(kind: &str) -> Self {
        Self {
            kind: BlockKind::new(kind),
            is_ore: true,
            is_container: false,
            already_claimed: false,
        }
    }

    pub fn debris(kind: &str) -> Self {
        Self {
            kind: BlockKind::new(kind),
            is_ore: false,
            is_container: false,
            already_claimed: false,
        }
    }

    pub fn container(mut self) -> Self {
        self.is_container = true;
        self
    }

    pub fn claimed(mut self) -> Self {
        self.already_claimed = true;
        self
    }
}

/// What a drop consists of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropSource {
    /// Copies of the block itself
    Mined,
    /// The world's ordinary break drops for the block
    BreakDrops,
}

/// Items the host should spawn at a destroyed block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDrop {
    pub kind: BlockKind,
    pub count: u32,
    pub source: DropSource,
}

/// Drops and experience from one explosion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionOutcome {
    /// In batch order
    pub drops: Vec<ItemDrop>,
    pub experience: u32,
    /// Yield the host must set on the explosion; always zero so the world adds no drops of its own
    pub explosion_yield: f32,
}

impl ResolutionOutcome {
    pub fn empty() -> Self {
        Self {
            drops: Vec::new(),
            experience: 0,
            explosion_yield: 0.0,
        }
    }

    /// Total copies of mined blocks
    pub fn mined_count(&self) -> u32 {
        self.drops
            .iter()
            .filter(|drop| drop.source == DropSource::Mined)
            .fold(0u32, |total, drop| total.saturating_add(drop.count))
    }
}

/// Per-block drop decisions for an explosion
pub struct DropResolver<'a> {
    rules: &'a dyn BlockRules,
    rng: &'a dyn RandomSource,
}

impl<'a> DropResolver<'a> {
    pub fn new(rules: &'a dyn BlockRules, rng: &'a dyn RandomSource) -> Self {
        Self { rules, rng }
    }

    pub fn resolve(
        &self,
        batch: &[HarvestUnit],
        tier: &TierEntry,
        explosion_yield: f32,
    ) -> ResolutionOutcome {
        let mut outcome = ResolutionOutcome::empty();
        let ore_chance = explosion_yield + tier.ore_bonus_chance;
        let debris_yield = explosion_yield - tier.debris_reduction_chance;

        for unit in batch {
            if !self.rules.is_skill_block(&unit.kind) || unit.is_container || unit.already_claimed {
                continue;
            }

            if unit.is_ore {
                if self.rng.next_f32() < ore_chance {
                    // Drops may duplicate across systems, XP must not
                    if !unit.already_claimed {
                        outcome.experience =
                            outcome.experience.saturating_add(self.rules.block_xp(&unit.kind));
                    }
                    outcome.drops.push(ItemDrop {
                        kind: unit.kind.clone(),
                        count: tier.drop_multiplier.max(1),
                        source: DropSource::Mined,
                    });
                }
            } else if debris_yield > 0.0 && self.rng.next_f32() < debris_yield {
                outcome.drops.push(ItemDrop {
                    kind: unit.kind.clone(),
                    count: 1,
                    source: DropSource::BreakDrops,
                });
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::BlockRule;
    use crate::env::{ChaChaSource, StaticBlockRules};
    use std::sync::Mutex;

    /// Replays a fixed list of draws, then repeats the last one
    struct Scripted(Mutex<Vec<f32>>);

    impl Scripted {
        fn new(draws: &[f32]) -> Self {
            let mut draws = draws.to_vec();
            draws.reverse();
            Self(Mutex::new(draws))
        }
    }

    impl RandomSource for Scripted {
        fn next_f32(&self) -> f32 {
            let mut draws = self.0.lock().unwrap();
            if draws.len() > 1 {
                draws.pop().unwrap()
            } else {
                draws[0]
            }
        }
    }

    fn rules() -> StaticBlockRules {
        StaticBlockRules::new(&[
            BlockRule::new("coal_ore", 100),
            BlockRule::new("iron_ore", 250),
            BlockRule::new("stone", 30),
            BlockRule::new("furnace", 0),
        ])
    }

    fn tier(mult: u32) -> TierEntry {
        TierEntry {
            min_level: 1,
            ore_bonus_chance: 0.1,
            debris_reduction_chance: 0.05,
            drop_multiplier: mult,
            blast_radius_delta: 0.0,
            blast_damage_reduction_pct: 0.0,
        }
    }

    #[test]
    fn test_empty_batch() {
        let rules = rules();
        let rng = ChaChaSource::seeded(1);
        let outcome = DropResolver::new(&rules, &rng).resolve(&[], &tier(3), 1.0);
        assert_eq!(outcome, ResolutionOutcome::empty());
    }

    #[test]
    fn test_successful_ore_roll_awards_full_multiplier_once() {
        let rules = rules();
        let rng = Scripted::new(&[0.0]);
        let outcome =
            DropResolver::new(&rules, &rng).resolve(&[HarvestUnit::ore("iron_ore")], &tier(3), 0.5);

        assert_eq!(outcome.drops.len(), 1);
        assert_eq!(outcome.drops[0].count, 3);
        assert_eq!(outcome.mined_count(), 3);
        assert_eq!(outcome.experience, 250);
    }

    #[test]
    fn test_multiplier_one_drops_exactly_one() {
        let rules = rules();
        let rng = Scripted::new(&[0.0]);
        let outcome =
            DropResolver::new(&rules, &rng).resolve(&[HarvestUnit::ore("coal_ore")], &tier(1), 0.5);
        assert_eq!(outcome.mined_count(), 1);
    }

    #[test]
    fn test_roll_boundary_is_exclusive() {
        let rules = rules();
        let mut quarter = tier(2);
        quarter.ore_bonus_chance = 0.25;
        // 0.5 + 0.25: a draw of exactly 0.75 fails
        let rng = Scripted::new(&[0.75]);
        let outcome =
            DropResolver::new(&rules, &rng).resolve(&[HarvestUnit::ore("coal_ore")], &quarter, 0.5);
        assert!(outcome.drops.is_empty());
        assert_eq!(outcome.experience, 0);
    }

    #[test]
    fn test_skipped_units_consume_no_draws() {
        let rules = rules();
        // A draw taken by any skipped unit would leave 0.99 for the iron ore
        let rng = Scripted::new(&[0.0, 0.99]);
        let batch = [
            HarvestUnit::ore("dirt"),
            HarvestUnit::debris("furnace").container(),
            HarvestUnit::ore("coal_ore").claimed(),
            HarvestUnit::ore("iron_ore"),
        ];
        let outcome = DropResolver::new(&rules, &rng).resolve(&batch, &tier(2), 0.5);

        assert_eq!(outcome.drops.len(), 1);
        assert_eq!(outcome.drops[0].kind, BlockKind::new("iron_ore"));
        assert_eq!(outcome.experience, 250);
    }

    #[test]
    fn test_debris_uses_reduced_yield_without_multiplier() {
        let rules = rules();
        // debris yield = 0.5 - 0.05 = 0.45
        let rng = Scripted::new(&[0.44, 0.46]);
        let batch = [HarvestUnit::debris("stone"), HarvestUnit::debris("stone")];
        let outcome = DropResolver::new(&rules, &rng).resolve(&batch, &tier(3), 0.5);

        assert_eq!(
            outcome.drops,
            vec![ItemDrop {
                kind: BlockKind::new("stone"),
                count: 1,
                source: DropSource::BreakDrops,
            }]
        );
        assert_eq!(outcome.experience, 0);
    }

    #[test]
    fn test_debris_never_rolls_when_reduction_exceeds_yield() {
        let rules = rules();
        let rng = Scripted::new(&[0.0]);
        let outcome = DropResolver::new(&rules, &rng).resolve(
            &[HarvestUnit::debris("stone")],
            &tier(1),
            0.05,
        );
        assert!(outcome.drops.is_empty());
    }

    #[test]
    fn test_boosted_yield_is_not_clamped() {
        let rules = rules();
        let rng = Scripted::new(&[0.999]);
        let outcome =
            DropResolver::new(&rules, &rng).resolve(&[HarvestUnit::debris("stone")], &tier(1), 2.0);
        assert_eq!(outcome.drops.len(), 1);
    }

    #[test]
    fn test_zero_yield_zero_bonus_never_drops_ore() {
        let rules = rules();
        let rng = ChaChaSource::seeded(99);
        let mut no_bonus = tier(3);
        no_bonus.ore_bonus_chance = 0.0;
        let resolver = DropResolver::new(&rules, &rng);
        let batch = [HarvestUnit::ore("coal_ore")];

        let successes = (0..10_000)
            .filter(|_| !resolver.resolve(&batch, &no_bonus, 0.0).drops.is_empty())
            .count();
        assert_eq!(successes, 0);
    }

    #[test]
    fn test_outcome_always_zeroes_explosion_yield() {
        let rules = rules();
        let rng = ChaChaSource::seeded(3);
        let outcome = DropResolver::new(&rules, &rng).resolve(
            &[HarvestUnit::ore("coal_ore"), HarvestUnit::debris("stone")],
            &tier(2),
            0.8,
        );
        assert_eq!(outcome.explosion_yield, 0.0);
    }

    #[test]
    fn test_experience_saturates_instead_of_overflowing() {
        let rules = StaticBlockRules::new(&[BlockRule::new("big_ore", 3_000_000_000)]);
        let rng = Scripted::new(&[0.0]);
        let batch = [HarvestUnit::ore("big_ore"), HarvestUnit::ore("big_ore")];
        let outcome = DropResolver::new(&rules, &rng).resolve(&batch, &tier(1), 0.5);

        assert_eq!(outcome.drops.len(), 2);
        assert_eq!(outcome.experience, u32::MAX);
    }
}
