//! Blast Mining Simulator
//!
//! Runs one remote detonation and its explosion aftermath against an
//! in-memory world and prints what the engine decided.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use blast_mining::core::error::Result;
use blast_mining::core::types::{ActorId, ActorProfile, BlockKind, BlockPos, Capabilities};
use blast_mining::env::{
    ChaChaSource, Env, LevelingOracle, MessagingOracle, Notice, TargetBlock, WorldOracle,
    XpGainReason,
};
use blast_mining::mining::{
    BlastMiningEngine, DetonationOutcome, HarvestUnit, ItemDrop, ResolutionOutcome,
};
use blast_mining::session::TokioScheduler;
use blast_mining::MiningConfig;
use clap::Parser;
use serde::Serialize;
use tokio::runtime::Runtime;

/// Radius of an unmodified explosive
const BASE_BLAST_RADIUS: f32 = 4.0;

/// Damage an unmodified explosive deals to its owner
const BASE_SELF_DAMAGE: f64 = 20.0;

/// Blast Mining Simulator - one detonation against a demo world
#[derive(Parser, Debug)]
#[command(name = "blast-sim")]
#[command(about = "Detonate an explosive and report drops, XP and modifiers")]
struct Args {
    /// Mining config (TOML); stock values when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Actor skill level
    #[arg(long, default_value_t = 500)]
    level: u32,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Ore blocks caught in the explosion
    #[arg(long, default_value_t = 8)]
    ores: usize,

    /// Non-ore blocks caught in the explosion
    #[arg(long, default_value_t = 24)]
    debris: usize,

    /// Base explosion yield
    #[arg(long = "yield", default_value_t = 0.3)]
    explosion_yield: f32,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

/// In-memory host with a single primed target
struct DemoHost {
    target: TargetBlock,
    xp: Mutex<u32>,
    notices: Mutex<Vec<Notice>>,
}

impl DemoHost {
    fn new(explosive: BlockKind) -> Self {
        Self {
            target: TargetBlock {
                pos: BlockPos::new(12, 40, -7),
                kind: explosive,
            },
            xp: Mutex::new(0),
            notices: Mutex::new(Vec::new()),
        }
    }
}

impl WorldOracle for DemoHost {
    fn target_block(&self, _actor: ActorId, _max_distance: u32) -> Option<TargetBlock> {
        Some(self.target.clone())
    }

    fn can_break(&self, _actor: ActorId, _pos: BlockPos) -> bool {
        true
    }

    fn spawn_primed_explosive(&self, owner: ActorId, pos: BlockPos, fuse_ticks: u32) {
        tracing::info!("Primed explosive for {} at {:?} (fuse {})", owner, pos, fuse_ticks);
    }

    fn clear_block(&self, pos: BlockPos) {
        tracing::info!("Cleared block at {:?}", pos);
    }
}

impl LevelingOracle for DemoHost {
    fn apply_xp_gain(&self, _actor: ActorId, amount: u32, _reason: XpGainReason) {
        if let Ok(mut xp) = self.xp.lock() {
            *xp = xp.saturating_add(amount);
        }
    }
}

impl MessagingOracle for DemoHost {
    fn notify(&self, _actor: ActorId, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}

/// Report printed at the end of a run
#[derive(Serialize)]
struct SimReport {
    seed: u64,
    level: u32,
    tier: u8,
    detonated: bool,
    rejection: Option<String>,
    blast_radius: f32,
    self_damage: f64,
    drops: Vec<ItemDrop>,
    mined_count: u32,
    experience: u32,
    cooldown_remaining_secs: u64,
    notices: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("blast_mining=debug,blast_sim=info")
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);

    let config = match &args.config {
        Some(path) => MiningConfig::load_from_toml(path)?,
        None => MiningConfig::default(),
    };

    let rt = Runtime::new()?;
    let host = Arc::new(DemoHost::new(config.explosive_block.clone()));
    let engine = BlastMiningEngine::new(&config, Arc::new(TokioScheduler::new(rt.handle().clone())))?
        .with_rng(Arc::new(ChaChaSource::seeded(seed)))
        .with_refresh_notices(host.clone());

    let actor = ActorProfile::new(ActorId::new(), args.level)
        .with_capabilities(Capabilities::all())
        .holding(config.detonator.clone())
        .sneaking();
    engine.open_session(actor.id);

    let rules = config.block_rules();
    let env = Env::new(host.as_ref(), host.as_ref(), host.as_ref(), &rules);

    let detonation = engine.remote_detonate(&actor, &env);
    let rejection = match &detonation {
        DetonationOutcome::Detonated { .. } => None,
        DetonationOutcome::Rejected(reason) => Some(format!("{:?}", reason)),
    };

    let batch: Vec<HarvestUnit> = (0..args.ores)
        .map(|i| HarvestUnit::ore(if i % 4 == 3 { "diamond_ore" } else { "iron_ore" }))
        .chain((0..args.debris).map(|_| HarvestUnit::debris("stone")))
        .collect();
    let aftermath = if detonation.is_detonated() {
        engine.resolve_explosion_aftermath(&actor, &batch, args.explosion_yield, &env)
    } else {
        ResolutionOutcome::empty()
    };

    let report = SimReport {
        seed,
        level: args.level,
        tier: engine.blast_mining_tier(&actor),
        detonated: detonation.is_detonated(),
        rejection,
        blast_radius: engine.bigger_bombs(&actor, BASE_BLAST_RADIUS),
        self_damage: engine.demolitions_expertise(&actor, BASE_SELF_DAMAGE),
        mined_count: aftermath.mined_count(),
        experience: host.xp.lock().map(|xp| *xp).unwrap_or_default(),
        cooldown_remaining_secs: engine.cooldown_status(actor.id).remaining_secs(),
        notices: host
            .notices
            .lock()
            .map(|notices| notices.iter().map(|n| format!("{:?}", n)).collect())
            .unwrap_or_default(),
        drops: aftermath.drops,
    };

    // Cancels the pending re-arm before the runtime shuts down
    engine.end_session(actor.id);

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(err) => tracing::error!("Could not serialize report: {}", err),
        }
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &SimReport) {
    println!("Blast Mining Result");
    println!("===================");
    println!("Seed:           {}", report.seed);
    println!("Level / tier:   {} / {}", report.level, report.tier);
    match &report.rejection {
        None => println!("Detonation:     fired"),
        Some(reason) => println!("Detonation:     rejected ({})", reason),
    }
    println!("Blast radius:   {:.1}", report.blast_radius);
    println!("Self damage:    {:.1}", report.self_damage);
    println!("Mined copies:   {}", report.mined_count);
    println!("Experience:     {}", report.experience);
    println!("Cooldown left:  {}s", report.cooldown_remaining_secs);
    if !report.drops.is_empty() {
        println!();
        println!("Drops:");
        for drop in &report.drops {
            println!("  {} x{} ({:?})", drop.kind, drop.count, drop.source);
        }
    }
    if !report.notices.is_empty() {
        println!();
        println!("Notices:");
        for notice in &report.notices {
            println!("  {}", notice);
        }
    }
}
