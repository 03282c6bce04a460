//! Cooldown state machine for gated abilities
//!
//! `Ready` until the ability fires, then `Cooling` until the cooldown has
//! fully elapsed. The state is derived from the activation timestamp on every
//! query; the re-arm task only flips the `informed` flag and tells the actor.

use std::sync::{Arc, Weak};
use std::time::Duration;

use crate::core::types::{AbilityKind, ActorId, Millis};
use crate::env::{MessagingOracle, Notice};
use crate::session::{lock, AbilityState, RearmScheduler, SessionRegistry};

/// Where an ability sits in its cooldown cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownStatus {
    Ready,
    Cooling { remaining: Duration },
}

impl CooldownStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, CooldownStatus::Ready)
    }

    pub fn remaining(&self) -> Duration {
        match self {
            CooldownStatus::Ready => Duration::ZERO,
            CooldownStatus::Cooling { remaining } => *remaining,
        }
    }

    /// Whole seconds left, rounded up so a cooling ability never reads 0
    pub fn remaining_secs(&self) -> u64 {
        let millis = self.remaining().as_millis() as u64;
        millis.div_ceil(1000)
    }
}

/// Result of trying to fire an ability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Activated {
        at: Millis,
        /// False when the host scheduler refused the re-arm task
        rearm_scheduled: bool,
    },
    Rejected { remaining: Duration },
}

impl Activation {
    pub fn is_activated(&self) -> bool {
        matches!(self, Activation::Activated { .. })
    }
}

/// Millis left on a cooldown; zero or negative means ready
pub fn remaining_millis(state: &AbilityState, cooldown: Duration, now: Millis) -> Millis {
    let cooldown = Millis::try_from(cooldown.as_millis()).unwrap_or(Millis::MAX);
    cooldown.saturating_sub(now.saturating_sub(state.last_activated_at))
}

/// Tracks cooldowns for every actor through the session registry
pub struct CooldownTracker {
    registry: Arc<SessionRegistry>,
    scheduler: Arc<dyn RearmScheduler>,
    cooldown: Duration,
    refresh_notices: Option<Arc<dyn MessagingOracle>>,
}

impl CooldownTracker {
    pub fn new(
        registry: Arc<SessionRegistry>,
        scheduler: Arc<dyn RearmScheduler>,
        cooldown: Duration,
    ) -> Self {
        Self {
            registry,
            scheduler,
            cooldown,
            refresh_notices: None,
        }
    }

    /// Deliver `AbilityRefreshed` through this sink when a re-arm fires
    pub fn with_refresh_notices(mut self, messaging: Arc<dyn MessagingOracle>) -> Self {
        self.refresh_notices = Some(messaging);
        self
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Current status; never creates a record
    pub fn status(&self, actor: ActorId, ability: AbilityKind, now: Millis) -> CooldownStatus {
        match self.registry.state(actor, ability) {
            Some(state) => self.status_of(&state, now),
            None => CooldownStatus::Ready,
        }
    }

    fn status_of(&self, state: &AbilityState, now: Millis) -> CooldownStatus {
        let remaining = remaining_millis(state, self.cooldown, now);
        if remaining <= 0 {
            CooldownStatus::Ready
        } else {
            CooldownStatus::Cooling {
                remaining: Duration::from_millis(remaining as u64),
            }
        }
    }

    /// Fire the ability if it is `Ready`, then schedule its re-arm.
    ///
    /// A rejection leaves the record untouched.
    pub fn try_activate(&self, actor: ActorId, ability: AbilityKind, now: Millis) -> Activation {
        let record = self.registry.record(actor);
        {
            let mut record = lock(&record);
            if let Some(state) = record.state(ability) {
                if let CooldownStatus::Cooling { remaining } = self.status_of(&state, now) {
                    return Activation::Rejected { remaining };
                }
            }
            record.activate(ability, now);
        }

        // Schedule outside the record lock so an eager scheduler cannot deadlock
        let task = rearm_task(
            Arc::downgrade(&self.registry),
            actor,
            ability,
            now,
            self.refresh_notices.clone(),
        );
        let rearm_scheduled = match self.scheduler.schedule(self.cooldown, task) {
            Ok(handle) => {
                let mut record = lock(&record);
                // The task may already have run on another thread
                let still_pending = record
                    .state(ability)
                    .is_some_and(|state| state.last_activated_at == now && !state.informed);
                if still_pending {
                    record.set_pending(ability, handle);
                } else {
                    handle.cancel();
                }
                true
            }
            Err(err) => {
                tracing::warn!(
                    "Could not schedule {} re-arm for {}: {}",
                    ability.name(),
                    actor,
                    err
                );
                false
            }
        };

        Activation::Activated {
            at: now,
            rearm_scheduled,
        }
    }
}

fn rearm_task(
    registry: Weak<SessionRegistry>,
    actor: ActorId,
    ability: AbilityKind,
    activated_at: Millis,
    messaging: Option<Arc<dyn MessagingOracle>>,
) -> crate::session::RearmTask {
    Box::new(move || {
        // Registry or session gone: nothing left to re-arm
        let Some(record) = registry.upgrade().and_then(|registry| registry.existing(actor)) else {
            return;
        };
        let flipped = lock(&record).mark_informed(ability, activated_at);
        if !flipped {
            return;
        }

        tracing::debug!("{} re-armed for {}", ability.name(), actor);
        if let Some(messaging) = messaging {
            messaging.notify(actor, Notice::AbilityRefreshed { ability });
        }
    })
}
