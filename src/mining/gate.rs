//! Eligibility checks for blast mining abilities
//!
//! Pure predicates over an actor snapshot. Cooldown is handled separately.

use crate::core::types::{ActorProfile, Capability, ItemKind, Posture};
use crate::mining::tiers::TierTable;

/// Passive enhancements unlocked at higher tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Enhancement {
    /// Larger explosion radius
    BiggerBombs,
    /// Reduced damage from one's own explosions
    DemolitionsExpertise,
}

impl Enhancement {
    pub fn capability(&self) -> Capability {
        match self {
            Enhancement::BiggerBombs => Capability::BiggerBombs,
            Enhancement::DemolitionsExpertise => Capability::DemolitionsExpertise,
        }
    }
}

/// Why an actor may not detonate remotely
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateFailure {
    BelowTierOne,
    NotSneaking,
    WrongItem,
    MissingCapability(Capability),
}

/// Skill, authorization and equipment gate
#[derive(Debug, Clone)]
pub struct AbilityGate {
    base_level: u32,
    bigger_bombs_level: u32,
    demolitions_expertise_level: u32,
    detonator: ItemKind,
}

impl AbilityGate {
    pub fn new(
        base_level: u32,
        bigger_bombs_level: u32,
        demolitions_expertise_level: u32,
        detonator: ItemKind,
    ) -> Self {
        Self {
            base_level,
            bigger_bombs_level,
            demolitions_expertise_level,
            detonator,
        }
    }

    /// Gate whose unlock levels come from tier ranks of `table`.
    ///
    /// Ranks outside the table lock the enhancement entirely.
    pub fn from_table(
        table: &TierTable,
        bigger_bombs_rank: u8,
        demolitions_expertise_rank: u8,
        detonator: ItemKind,
    ) -> Self {
        Self::new(
            table.lowest_threshold(),
            table.threshold(bigger_bombs_rank).unwrap_or(u32::MAX),
            table.threshold(demolitions_expertise_rank).unwrap_or(u32::MAX),
            detonator,
        )
    }

    pub fn can_use_base_ability(&self, actor: &ActorProfile) -> bool {
        actor.skill_level >= self.base_level
    }

    pub fn unlock_level(&self, enhancement: Enhancement) -> u32 {
        match enhancement {
            Enhancement::BiggerBombs => self.bigger_bombs_level,
            Enhancement::DemolitionsExpertise => self.demolitions_expertise_level,
        }
    }

    pub fn can_use_enhancement(&self, actor: &ActorProfile, enhancement: Enhancement) -> bool {
        actor.skill_level >= self.unlock_level(enhancement)
            && actor.capabilities.contains(enhancement.capability())
    }

    pub fn can_detonate_remotely(&self, actor: &ActorProfile) -> bool {
        self.evaluate_detonation(actor).is_ok()
    }

    /// Same as [`can_detonate_remotely`](Self::can_detonate_remotely) with the first failing reason
    pub fn evaluate_detonation(&self, actor: &ActorProfile) -> Result<(), GateFailure> {
        if !self.can_use_base_ability(actor) {
            return Err(GateFailure::BelowTierOne);
        }
        if actor.posture != Posture::Sneaking {
            return Err(GateFailure::NotSneaking);
        }
        if actor.held_item.as_ref() != Some(&self.detonator) {
            return Err(GateFailure::WrongItem);
        }
        if !actor.capabilities.contains(Capability::RemoteDetonation) {
            return Err(GateFailure::MissingCapability(Capability::RemoteDetonation));
        }
        Ok(())
    }

    pub fn detonator(&self) -> &ItemKind {
        &self.detonator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{ActorId, Capabilities};

    fn gate() -> AbilityGate {
        AbilityGate::from_table(&TierTable::default(), 2, 4, ItemKind::new("flint_and_steel"))
    }

    fn detonating_actor(level: u32) -> ActorProfile {
        ActorProfile::new(ActorId::new(), level)
            .with_capabilities(Capabilities::all())
            .holding(ItemKind::new("flint_and_steel"))
            .sneaking()
    }

    #[test]
    fn test_base_ability_at_exact_threshold() {
        let gate = gate();
        assert!(!gate.can_use_base_ability(&ActorProfile::new(ActorId::new(), 124)));
        assert!(gate.can_use_base_ability(&ActorProfile::new(ActorId::new(), 125)));
    }

    #[test]
    fn test_unlock_levels_follow_ranks() {
        let gate = gate();
        assert_eq!(gate.unlock_level(Enhancement::BiggerBombs), 250);
        assert_eq!(gate.unlock_level(Enhancement::DemolitionsExpertise), 500);
    }

    #[test]
    fn test_enhancement_needs_level_and_capability() {
        let gate = gate();
        let actor = ActorProfile::new(ActorId::new(), 600);
        assert!(!gate.can_use_enhancement(&actor, Enhancement::BiggerBombs));

        let actor = actor.with_capabilities(Capabilities::new().with(Capability::BiggerBombs));
        assert!(gate.can_use_enhancement(&actor, Enhancement::BiggerBombs));
        assert!(!gate.can_use_enhancement(&actor, Enhancement::DemolitionsExpertise));

        let low = detonating_actor(249);
        assert!(!gate.can_use_enhancement(&low, Enhancement::BiggerBombs));
    }

    #[test]
    fn test_detonation_requires_everything() {
        let gate = gate();
        assert!(gate.can_detonate_remotely(&detonating_actor(125)));

        assert_eq!(
            gate.evaluate_detonation(&detonating_actor(100)),
            Err(GateFailure::BelowTierOne)
        );

        let mut standing = detonating_actor(300);
        standing.posture = Posture::Standing;
        assert_eq!(
            gate.evaluate_detonation(&standing),
            Err(GateFailure::NotSneaking)
        );

        let pickaxe = detonating_actor(300).holding(ItemKind::new("iron_pickaxe"));
        assert_eq!(gate.evaluate_detonation(&pickaxe), Err(GateFailure::WrongItem));

        let mut empty_handed = detonating_actor(300);
        empty_handed.held_item = None;
        assert!(!gate.can_detonate_remotely(&empty_handed));

        let mut unauthorized = detonating_actor(300);
        unauthorized.capabilities.revoke(Capability::RemoteDetonation);
        assert_eq!(
            gate.evaluate_detonation(&unauthorized),
            Err(GateFailure::MissingCapability(Capability::RemoteDetonation))
        );
    }

    #[test]
    fn test_rank_outside_table_locks_enhancement() {
        let gate = AbilityGate::from_table(&TierTable::default(), 0, 9, ItemKind::new("x"));
        let actor = detonating_actor(u32::MAX - 1);
        assert!(!gate.can_use_enhancement(&actor, Enhancement::BiggerBombs));
        assert!(!gate.can_use_enhancement(&actor, Enhancement::DemolitionsExpertise));
    }
}
