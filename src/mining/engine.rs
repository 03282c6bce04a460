//! Blast mining orchestration
//!
//! Composes the tier table, gate, cooldown tracker and drop resolver into the
//! operations the host calls: remote detonation, explosion aftermath, the
//! passive blast modifiers and ordinary block mining.

use std::sync::Arc;
use std::time::Duration;

use crate::core::config::MiningConfig;
use crate::core::error::Result;
use crate::core::types::{AbilityKind, ActorId, ActorProfile, BlockKind, BlockPos, Millis};
use crate::env::{
    ChaChaSource, Clock, Env, MessagingOracle, Notice, RandomSource, SystemClock, XpGainReason,
};
use crate::mining::check::{MiningCheck, MiningCheckOutcome};
use crate::mining::cooldown::{Activation, CooldownStatus, CooldownTracker};
use crate::mining::drops::{DropResolver, HarvestUnit, ResolutionOutcome};
use crate::mining::gate::{AbilityGate, Enhancement, GateFailure};
use crate::mining::tiers::{TierEntry, TierTable};
use crate::session::{RearmScheduler, SessionRegistry};

/// Remote detonation ignites the explosive immediately
pub const DETONATION_FUSE_TICKS: u32 = 0;

/// Why a remote detonation did nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetonationRejection {
    /// Skill, posture, item or authorization check failed
    Ineligible(GateFailure),
    /// Nothing solid within reach
    NoTarget,
    /// Targeted block is not the explosive
    NotExplosive(BlockKind),
    /// The world refused to let the actor break the block
    BreakDenied,
    CoolingDown { remaining: Duration },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetonationOutcome {
    Detonated {
        target: BlockPos,
        activated_at: Millis,
        rearm_scheduled: bool,
    },
    Rejected(DetonationRejection),
}

impl DetonationOutcome {
    pub fn is_detonated(&self) -> bool {
        matches!(self, DetonationOutcome::Detonated { .. })
    }
}

/// The blast mining skill engine
pub struct BlastMiningEngine {
    tiers: TierTable,
    gate: AbilityGate,
    cooldowns: CooldownTracker,
    check: MiningCheck,
    rng: Arc<dyn RandomSource>,
    clock: Arc<dyn Clock>,
    explosive_block: BlockKind,
    max_detonation_distance: u32,
}

impl BlastMiningEngine {
    /// Validate `config` and build an engine using entropy and the system clock
    pub fn new(config: &MiningConfig, scheduler: Arc<dyn RearmScheduler>) -> Result<Self> {
        config.validate()?;
        let tiers = config.tier_table()?;
        let gate = AbilityGate::from_table(
            &tiers,
            config.bigger_bombs_rank,
            config.demolitions_expertise_rank,
            config.detonator.clone(),
        );
        let cooldowns =
            CooldownTracker::new(Arc::new(SessionRegistry::new()), scheduler, config.cooldown());

        Ok(Self {
            tiers,
            gate,
            cooldowns,
            check: MiningCheck::new(config.double_drops, config.ability_tool_damage),
            rng: Arc::new(ChaChaSource::from_entropy()),
            clock: Arc::new(SystemClock),
            explosive_block: config.explosive_block.clone(),
            max_detonation_distance: config.max_detonation_distance,
        })
    }

    pub fn with_rng(mut self, rng: Arc<dyn RandomSource>) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Sink for `AbilityRefreshed` notices sent when a cooldown re-arms
    pub fn with_refresh_notices(mut self, messaging: Arc<dyn MessagingOracle>) -> Self {
        self.cooldowns = self.cooldowns.with_refresh_notices(messaging);
        self
    }

    pub fn tiers(&self) -> &TierTable {
        &self.tiers
    }

    pub fn gate(&self) -> &AbilityGate {
        &self.gate
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        self.cooldowns.registry()
    }

    pub fn open_session(&self, actor: ActorId) -> bool {
        self.registry().open(actor)
    }

    /// Drop the actor's ability state and cancel pending re-arms
    pub fn end_session(&self, actor: ActorId) -> bool {
        self.registry().end(actor)
    }

    /// Modifiers for the actor's current level
    pub fn modifiers(&self, actor: &ActorProfile) -> &TierEntry {
        self.tiers.lookup(actor.skill_level)
    }

    pub fn blast_mining_tier(&self, actor: &ActorProfile) -> u8 {
        self.tiers.tier_index(actor.skill_level)
    }

    pub fn cooldown_status(&self, actor: ActorId) -> CooldownStatus {
        self.cooldowns
            .status(actor, AbilityKind::BlastMining, self.clock.now_millis())
    }

    /// Ignite the explosive the actor is looking at.
    ///
    /// Every rejection leaves the world and the cooldown untouched.
    pub fn remote_detonate(&self, actor: &ActorProfile, env: &Env<'_>) -> DetonationOutcome {
        match self.try_remote_detonate(actor, env) {
            Ok(outcome) => outcome,
            Err(rejection) => {
                tracing::debug!("Remote detonation by {} rejected: {:?}", actor.id, rejection);
                DetonationOutcome::Rejected(rejection)
            }
        }
    }

    fn try_remote_detonate(
        &self,
        actor: &ActorProfile,
        env: &Env<'_>,
    ) -> std::result::Result<DetonationOutcome, DetonationRejection> {
        self.gate
            .evaluate_detonation(actor)
            .map_err(DetonationRejection::Ineligible)?;

        let target = env
            .world
            .target_block(actor.id, self.max_detonation_distance)
            .ok_or(DetonationRejection::NoTarget)?;

        if target.kind != self.explosive_block {
            return Err(DetonationRejection::NotExplosive(target.kind));
        }

        if !env.world.can_break(actor.id, target.pos) {
            return Err(DetonationRejection::BreakDenied);
        }

        let now = self.clock.now_millis();
        let (activated_at, rearm_scheduled) =
            match self.cooldowns.try_activate(actor.id, AbilityKind::BlastMining, now) {
                Activation::Activated {
                    at,
                    rearm_scheduled,
                } => (at, rearm_scheduled),
                Activation::Rejected { remaining } => {
                    let status = CooldownStatus::Cooling { remaining };
                    env.messaging.notify(
                        actor.id,
                        Notice::TooTired {
                            ability: AbilityKind::BlastMining,
                            remaining_secs: status.remaining_secs(),
                        },
                    );
                    return Err(DetonationRejection::CoolingDown { remaining });
                }
            };

        env.messaging.notify(
            actor.id,
            Notice::AbilityActivated {
                ability: AbilityKind::BlastMining,
            },
        );
        env.messaging.notify(actor.id, Notice::Boom);

        env.world
            .spawn_primed_explosive(actor.id, target.pos, DETONATION_FUSE_TICKS);
        env.world.clear_block(target.pos);

        tracing::debug!("{} detonated explosive at {:?}", actor.id, target.pos);

        Ok(DetonationOutcome::Detonated {
            target: target.pos,
            activated_at,
            rearm_scheduled,
        })
    }

    /// Decide drops and XP for blocks destroyed by the actor's explosion.
    ///
    /// The host must apply the returned `explosion_yield` (zero) to the explosion.
    pub fn resolve_explosion_aftermath(
        &self,
        actor: &ActorProfile,
        batch: &[HarvestUnit],
        explosion_yield: f32,
        env: &Env<'_>,
    ) -> ResolutionOutcome {
        let tier = self.tiers.lookup(actor.skill_level);
        let outcome =
            DropResolver::new(env.blocks, self.rng.as_ref()).resolve(batch, tier, explosion_yield);

        if outcome.experience > 0 {
            env.leveling
                .apply_xp_gain(actor.id, outcome.experience, XpGainReason::Pve);
        }

        tracing::debug!(
            "Explosion by {} resolved {} of {} blocks for {} XP",
            actor.id,
            outcome.drops.len(),
            batch.len(),
            outcome.experience
        );

        outcome
    }

    /// Explosion radius after Bigger Bombs
    pub fn bigger_bombs(&self, actor: &ActorProfile, radius: f32) -> f32 {
        if self.gate.can_use_enhancement(actor, Enhancement::BiggerBombs) {
            self.modifiers(actor).apply_radius(radius)
        } else {
            radius
        }
    }

    /// Self-inflicted explosion damage after Demolitions Expertise
    pub fn demolitions_expertise(&self, actor: &ActorProfile, damage: f64) -> f64 {
        if self
            .gate
            .can_use_enhancement(actor, Enhancement::DemolitionsExpertise)
        {
            self.modifiers(actor).reduce_damage(damage)
        } else {
            damage
        }
    }

    /// XP, tool wear and double drops for a block broken by hand
    pub fn process_block_mined(
        &self,
        actor: &ActorProfile,
        block: &BlockKind,
        env: &Env<'_>,
    ) -> MiningCheckOutcome {
        let outcome = self
            .check
            .evaluate(actor, block, env.blocks, self.rng.as_ref());
        if outcome.experience > 0 {
            env.leveling
                .apply_xp_gain(actor.id, outcome.experience, XpGainReason::Pve);
        }
        outcome
    }
}
