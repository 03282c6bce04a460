//! Per-actor ability records owned by the session manager
//!
//! The registry is the only owner of ability state. Engine components keep
//! an [`ActorId`] and look the record up on every call, so a record never
//! outlives its session: ending a session removes the record and cancels
//! whatever re-arm tasks it still had pending.

pub mod scheduler;

pub use scheduler::{ManualScheduler, RearmHandle, RearmScheduler, RearmTask, TokioScheduler};

use std::sync::{Arc, Mutex, MutexGuard};

use ahash::AHashMap;

use crate::core::types::{AbilityKind, ActorId, Millis};

/// Cooldown bookkeeping for one ability of one actor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbilityState {
    /// When the ability last fired
    pub last_activated_at: Millis,
    /// Whether the actor has been told the ability is ready again
    pub informed: bool,
}

/// Everything the mining skill tracks for one actor
#[derive(Debug, Default)]
pub struct AbilityRecord {
    states: AHashMap<AbilityKind, AbilityState>,
    pending: AHashMap<AbilityKind, RearmHandle>,
}

impl AbilityRecord {
    pub fn state(&self, ability: AbilityKind) -> Option<AbilityState> {
        self.states.get(&ability).copied()
    }

    /// Record a fresh activation; the actor is not yet informed of the re-arm
    pub fn activate(&mut self, ability: AbilityKind, now: Millis) {
        self.states.insert(
            ability,
            AbilityState {
                last_activated_at: now,
                informed: false,
            },
        );
    }

    /// Flip `informed` for the activation made at `activated_at`.
    ///
    /// Returns false when a newer activation replaced it or it was already flipped.
    pub fn mark_informed(&mut self, ability: AbilityKind, activated_at: Millis) -> bool {
        match self.states.get_mut(&ability) {
            Some(state) if state.last_activated_at == activated_at && !state.informed => {
                state.informed = true;
                self.pending.remove(&ability);
                true
            }
            _ => false,
        }
    }

    /// Track the re-arm task for an ability, cancelling any earlier one
    pub fn set_pending(&mut self, ability: AbilityKind, handle: RearmHandle) {
        if let Some(previous) = self.pending.insert(ability, handle) {
            previous.cancel();
        }
    }

    pub fn has_pending(&self, ability: AbilityKind) -> bool {
        self.pending.contains_key(&ability)
    }

    fn cancel_all(&mut self) -> usize {
        let count = self.pending.len();
        for (_, handle) in self.pending.drain() {
            handle.cancel();
        }
        count
    }
}

/// Arena of actor-keyed ability records
#[derive(Debug, Default)]
pub struct SessionRegistry {
    records: Mutex<AHashMap<ActorId, Arc<Mutex<AbilityRecord>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking an actor. Returns false if already tracked.
    pub fn open(&self, actor: ActorId) -> bool {
        let mut records = lock(&self.records);
        if records.contains_key(&actor) {
            return false;
        }
        records.insert(actor, Arc::default());
        tracing::debug!("Session opened for {}", actor);
        true
    }

    /// Drop an actor's record and cancel its pending re-arm tasks.
    ///
    /// Returns false if the actor had no record.
    pub fn end(&self, actor: ActorId) -> bool {
        // Release the map lock before touching the record
        let removed = lock(&self.records).remove(&actor);
        match removed {
            Some(record) => {
                let cancelled = lock(&record).cancel_all();
                tracing::debug!(
                    "Session ended for {}, cancelled {} pending re-arm task(s)",
                    actor,
                    cancelled
                );
                true
            }
            None => false,
        }
    }

    /// Record for an actor, created on first use
    pub fn record(&self, actor: ActorId) -> Arc<Mutex<AbilityRecord>> {
        Arc::clone(lock(&self.records).entry(actor).or_default())
    }

    /// Record for an actor only if the session is live
    pub fn existing(&self, actor: ActorId) -> Option<Arc<Mutex<AbilityRecord>>> {
        lock(&self.records).get(&actor).cloned()
    }

    pub fn state(&self, actor: ActorId, ability: AbilityKind) -> Option<AbilityState> {
        let record = self.existing(actor)?;
        let state = lock(&record).state(ability);
        state
    }

    pub fn contains(&self, actor: ActorId) -> bool {
        lock(&self.records).contains_key(&actor)
    }

    pub fn len(&self) -> usize {
        lock(&self.records).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.records).is_empty()
    }
}

/// Lock ignoring poison; records stay consistent between statements.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_record_created_lazily() {
        let registry = SessionRegistry::new();
        let actor = ActorId::new();
        assert!(!registry.contains(actor));

        let _ = registry.record(actor);
        assert!(registry.contains(actor));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_open_twice_keeps_record() {
        let registry = SessionRegistry::new();
        let actor = ActorId::new();
        assert!(registry.open(actor));
        lock(&registry.record(actor)).activate(AbilityKind::BlastMining, 100);

        assert!(!registry.open(actor));
        assert!(registry.state(actor, AbilityKind::BlastMining).is_some());
    }

    #[test]
    fn test_end_removes_record_and_cancels() {
        let registry = SessionRegistry::new();
        let actor = ActorId::new();
        let cancelled = Arc::new(AtomicBool::new(false));

        {
            let record = registry.record(actor);
            let mut record = lock(&record);
            record.activate(AbilityKind::BlastMining, 0);
            let flag = Arc::clone(&cancelled);
            record.set_pending(
                AbilityKind::BlastMining,
                RearmHandle::new(move || flag.store(true, Ordering::SeqCst)),
            );
        }

        assert!(registry.end(actor));
        assert!(cancelled.load(Ordering::SeqCst));
        assert!(registry.is_empty());
        assert!(registry.existing(actor).is_none());
        assert!(!registry.end(actor));
    }

    #[test]
    fn test_mark_informed_ignores_stale_activation() {
        let mut record = AbilityRecord::default();
        record.activate(AbilityKind::BlastMining, 1_000);
        record.activate(AbilityKind::BlastMining, 2_000);

        assert!(!record.mark_informed(AbilityKind::BlastMining, 1_000));
        assert!(record.mark_informed(AbilityKind::BlastMining, 2_000));
        // Only once per cycle
        assert!(!record.mark_informed(AbilityKind::BlastMining, 2_000));
    }

    #[test]
    fn test_set_pending_cancels_previous() {
        let mut record = AbilityRecord::default();
        let first_cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&first_cancelled);

        record.set_pending(
            AbilityKind::BlastMining,
            RearmHandle::new(move || flag.store(true, Ordering::SeqCst)),
        );
        record.set_pending(AbilityKind::BlastMining, RearmHandle::detached());

        assert!(first_cancelled.load(Ordering::SeqCst));
        assert!(record.has_pending(AbilityKind::BlastMining));
    }
}
