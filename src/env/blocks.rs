//! Per-material mining rules.

use ahash::AHashMap;

use crate::core::config::BlockRule;
use crate::core::types::BlockKind;

/// Read-only material table consulted by drop resolution and mining checks.
pub trait BlockRules: Send + Sync {
    /// Does this material belong to the mining skill?
    fn is_skill_block(&self, kind: &BlockKind) -> bool;

    /// XP for breaking one block of this material (0 if unknown)
    fn block_xp(&self, kind: &BlockKind) -> u32;

    /// Are double drops enabled for this material?
    fn double_drops_enabled(&self, kind: &BlockKind) -> bool;
}

/// Material table built from configuration
#[derive(Debug, Clone, Default)]
pub struct StaticBlockRules {
    rules: AHashMap<BlockKind, BlockRule>,
}

impl StaticBlockRules {
    pub fn new(rules: &[BlockRule]) -> Self {
        Self {
            rules: rules
                .iter()
                .map(|rule| (rule.kind.clone(), rule.clone()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl BlockRules for StaticBlockRules {
    fn is_skill_block(&self, kind: &BlockKind) -> bool {
        self.rules.contains_key(kind)
    }

    fn block_xp(&self, kind: &BlockKind) -> u32 {
        self.rules.get(kind).map_or(0, |rule| rule.xp)
    }

    fn double_drops_enabled(&self, kind: &BlockKind) -> bool {
        self.rules.get(kind).is_some_and(|rule| rule.double_drops)
    }
}
