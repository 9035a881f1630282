#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a simulated Reef Rush session.
//!
//! Generates a level table from the default difficulty curve, wires the
//! spawn producers to a counting demo factory, then steps a fixed-tick
//! clock through a slice of each level and reports what spawned.

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use reef_rush_core::{
    FactoryExhausted, InstanceFactory, InstanceHandle, Position, ProgressSink, VariantId,
};
use reef_rush_system_difficulty::DifficultyCurve;
use reef_rush_system_progression::LevelProgression;
use reef_rush_system_sampling::derive_labeled_seed;
use reef_rush_system_spawning::{
    CliffProducer, CloudProducer, EntitySpawnProducer, FieldBounds, PlantProducer,
    SpawnCoordinator, SpawnSide,
};
use tracing::info;

/// Simulated session runner for the Reef Rush spawn core.
#[derive(Debug, Parser)]
#[command(name = "reef-rush", about = "Runs a headless Reef Rush spawn session")]
struct Args {
    /// Number of levels to generate in the difficulty table.
    #[arg(long, default_value_t = 30)]
    levels: usize,

    /// Global seed; every producer derives its own stream from it.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Seconds of simulated play per level.
    #[arg(long, default_value_t = 30.0)]
    duration: f32,

    /// Simulation tick length in milliseconds.
    #[arg(long, default_value_t = 250)]
    tick: u64,
}

/// Unbounded counting stand-in for the engine-side object pool.
#[derive(Default)]
struct DemoFactory {
    next: u64,
    live: usize,
}

impl InstanceFactory for DemoFactory {
    fn acquire(&mut self, _variant: &VariantId) -> Result<InstanceHandle, FactoryExhausted> {
        self.next += 1;
        self.live += 1;
        Ok(InstanceHandle::new(self.next))
    }

    fn release(&mut self, _handle: InstanceHandle) {
        self.live -= 1;
    }
}

/// Sink that prints level announcements to stdout.
#[derive(Default)]
struct PrintingSink;

impl ProgressSink for PrintingSink {
    fn set_target(&mut self, score_target: u32) {
        println!("  score target: {score_target}");
    }

    fn set_budget(&mut self, seconds: f32) {
        println!("  time budget:  {seconds:.0}s");
    }

    fn set_environment(&mut self, environment_id: &str) {
        println!("  environment:  {environment_id}");
    }

    fn notify_complete(&mut self) {
        println!("  level complete");
    }
}

fn build_coordinator(bounds: FieldBounds, seed: u64) -> SpawnCoordinator {
    let mut coordinator = SpawnCoordinator::new();
    coordinator.register(Box::new(CliffProducer::new(
        bounds,
        "Lagoon",
        derive_labeled_seed(seed, "cliffs"),
    )));
    coordinator.register(Box::new(PlantProducer::new(
        bounds,
        derive_labeled_seed(seed, "plants"),
    )));
    coordinator.register(Box::new(CloudProducer::new(
        Position::new(bounds.left() * 0.75, 12.0),
        derive_labeled_seed(seed, "clouds"),
    )));
    coordinator.register(Box::new(EntitySpawnProducer::new(
        SpawnSide::Left,
        bounds,
        derive_labeled_seed(seed, "entities-left"),
    )));
    coordinator.register(Box::new(EntitySpawnProducer::new(
        SpawnSide::Right,
        bounds,
        derive_labeled_seed(seed, "entities-right"),
    )));
    coordinator
}

/// Entry point for the Reef Rush session runner.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    anyhow::ensure!(args.tick > 0, "tick length must be positive");
    anyhow::ensure!(args.duration > 0.0, "per-level duration must be positive");
    info!(levels = args.levels, seed = args.seed, "session starting");

    let table = DifficultyCurve::default()
        .generate_table(args.levels)
        .context("generating the level table")?;
    let mut progression = LevelProgression::new(table);

    let bounds = FieldBounds::new(-40.0, 40.0);
    let mut coordinator = build_coordinator(bounds, args.seed);
    let mut factory = DemoFactory::default();
    let mut sink = PrintingSink;

    let tick = Duration::from_millis(args.tick);
    let ticks_per_level = (args.duration / tick.as_secs_f32()).ceil() as u32;
    let mut clock = Duration::ZERO;
    let mut records = Vec::new();

    for _ in 0..args.levels {
        records.clear();
        progression
            .open_next(clock, &mut sink, &mut coordinator, &mut factory, &mut records)
            .context("opening the next level")?;
        let level = progression
            .current_index()
            .context("a level must be open after open_next")?;
        let placed = records.len();

        for _ in 0..ticks_per_level {
            clock += tick;
            coordinator.tick(clock, &mut factory, &mut records);
        }

        println!(
            "level {level:>2}: {placed} placed at open, {spawned} spawned over {duration:.0}s, {live} live",
            spawned = records.len() - placed,
            duration = args.duration,
            live = factory.live,
        );
    }

    coordinator.stop_all();
    coordinator.clear_all(&mut factory);
    println!("session over: {} instances issued in total", factory.next);
    Ok(())
}
