//! In-memory host shared by the integration tests

#![allow(dead_code)]

use std::sync::Mutex;

use blast_mining::core::types::{ActorId, BlockKind, BlockPos};
use blast_mining::env::{
    BlockRules, Env, LevelingOracle, MessagingOracle, Notice, RandomSource, TargetBlock,
    WorldOracle, XpGainReason,
};

/// Records every call the engine makes into the host
#[derive(Default)]
pub struct RecordingHost {
    pub target: Mutex<Option<TargetBlock>>,
    pub deny_break: bool,
    pub spawned: Mutex<Vec<(ActorId, BlockPos, u32)>>,
    pub cleared: Mutex<Vec<BlockPos>>,
    pub xp: Mutex<Vec<(ActorId, u32)>>,
    pub notices: Mutex<Vec<(ActorId, Notice)>>,
}

impl RecordingHost {
    pub fn aiming_at(kind: &str, pos: BlockPos) -> Self {
        let host = Self::default();
        *host.target.lock().unwrap() = Some(TargetBlock {
            pos,
            kind: BlockKind::new(kind),
        });
        host
    }

    pub fn env<'a>(&'a self, blocks: &'a dyn BlockRules) -> Env<'a> {
        Env::new(self, self, self, blocks)
    }

    pub fn notices_for(&self, actor: ActorId) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == actor)
            .map(|(_, notice)| notice.clone())
            .collect()
    }

    pub fn total_xp(&self) -> u32 {
        self.xp.lock().unwrap().iter().map(|(_, xp)| xp).sum()
    }
}

impl WorldOracle for RecordingHost {
    fn target_block(&self, _actor: ActorId, _max_distance: u32) -> Option<TargetBlock> {
        self.target.lock().unwrap().clone()
    }

    fn can_break(&self, _actor: ActorId, _pos: BlockPos) -> bool {
        !self.deny_break
    }

    fn spawn_primed_explosive(&self, owner: ActorId, pos: BlockPos, fuse_ticks: u32) {
        self.spawned.lock().unwrap().push((owner, pos, fuse_ticks));
    }

    fn clear_block(&self, pos: BlockPos) {
        self.cleared.lock().unwrap().push(pos);
    }
}

impl LevelingOracle for RecordingHost {
    fn apply_xp_gain(&self, actor: ActorId, amount: u32, _reason: XpGainReason) {
        self.xp.lock().unwrap().push((actor, amount));
    }
}

impl MessagingOracle for RecordingHost {
    fn notify(&self, actor: ActorId, notice: Notice) {
        self.notices.lock().unwrap().push((actor, notice));
    }
}

/// Returns the same draw forever
pub struct FixedDraw(pub f32);

impl RandomSource for FixedDraw {
    fn next_f32(&self) -> f32 {
        self.0
    }
}
