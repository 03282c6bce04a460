//! Core type definitions used throughout the codebase

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for actors (players holding a mining skill)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub Uuid);

impl ActorId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Wall-clock timestamp in milliseconds
pub type Millis = i64;

/// Material of a block in the host world (opaque to the engine)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockKind(pub String);

impl BlockKind {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Item type held by an actor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemKind(pub String);

impl ItemKind {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Integer block coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// Body posture reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Posture {
    #[default]
    Standing,
    Sneaking,
}

/// Cooldown-gated abilities owned by the mining skill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum AbilityKind {
    BlastMining,
}

impl AbilityKind {
    pub fn name(&self) -> &'static str {
        match self {
            AbilityKind::BlastMining => "blast_mining",
        }
    }
}

/// Authorization granted to an actor by the host's permission system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    DemolitionsExpertise,
    RemoteDetonation,
    BiggerBombs,
    /// Secondary ability toggle for mining double drops
    DoubleDrops,
    /// Perk that improves activation odds of chance-based abilities
    Lucky,
}

/// Set of capabilities held by one actor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities(AHashSet<Capability>);

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every ability capability; perks such as `Lucky` are granted separately
    pub fn all() -> Self {
        [
            Capability::DemolitionsExpertise,
            Capability::RemoteDetonation,
            Capability::BiggerBombs,
            Capability::DoubleDrops,
        ]
        .into_iter()
        .collect()
    }

    pub fn with(mut self, capability: Capability) -> Self {
        self.0.insert(capability);
        self
    }

    pub fn grant(&mut self, capability: Capability) {
        self.0.insert(capability);
    }

    pub fn revoke(&mut self, capability: Capability) {
        self.0.remove(&capability);
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }
}

impl FromIterator<Capability> for Capabilities {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Snapshot of an actor supplied by the host for a single engine call
#[derive(Debug, Clone)]
pub struct ActorProfile {
    pub id: ActorId,
    /// Mining skill level
    pub skill_level: u32,
    pub capabilities: Capabilities,
    /// Item in the main hand, if any
    pub held_item: Option<ItemKind>,
    pub posture: Posture,
    /// Whether the mining super ability is currently active
    pub ability_mode: bool,
}

impl ActorProfile {
    pub fn new(id: ActorId, skill_level: u32) -> Self {
        Self {
            id,
            skill_level,
            capabilities: Capabilities::new(),
            held_item: None,
            posture: Posture::Standing,
            ability_mode: false,
        }
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn holding(mut self, item: ItemKind) -> Self {
        self.held_item = Some(item);
        self
    }

    pub fn sneaking(mut self) -> Self {
        self.posture = Posture::Sneaking;
        self
    }

    pub fn in_ability_mode(mut self) -> Self {
        self.ability_mode = true;
        self
    }
}
