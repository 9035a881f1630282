#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spawn producers and the coordinator that fans commands out to them.
//!
//! Two producer families live here. The entity producer draws fish variants
//! through the binary-weighted pool on a jittered cadence; the field
//! producers lay out environment instances (cliffs, plants, clouds) using
//! the anti-repeat draw. Every producer borrows the external instance
//! factory per call only and reports what it spawned through an out
//! parameter, so the excluded presentation layer can initialize entities
//! without this crate knowing about it.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use reef_rush_core::{
    ConfigError, InstanceFactory, InstanceHandle, Position, SpawnConfig, VariantId,
};
use reef_rush_system_sampling::{draw_uniform, roll_percent, AntiRepeatDraw, WeightedPool};
use reef_rush_system_scheduling::SpawnScheduler;
use tracing::warn;

/// Number of interchangeable variants each field producer cycles through.
const FIELD_VARIANT_COUNT: usize = 12;

/// Base cloud cadence in seconds; activation adds up to ten seconds of jitter.
const CLOUD_BASE_INTERVAL: f32 = 7.0;
const CLOUD_INTERVAL_JITTER: f32 = 10.0;
const CLOUD_ALTITUDE_JITTER: f32 = 1.5;

const CLIFF_ALTITUDE: f32 = 0.0;
const PLANT_ALTITUDE: f32 = -14.0;
const PLANT_STEP_MIN: f32 = 1.0;
const PLANT_STEP_MAX: f32 = 5.0;

/// Horizontal extent of the playfield in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldBounds {
    left: f32,
    right: f32,
}

impl FieldBounds {
    /// Creates bounds from the left and right edges of the playfield.
    #[must_use]
    pub const fn new(left: f32, right: f32) -> Self {
        Self { left, right }
    }

    /// Left edge in world units.
    #[must_use]
    pub const fn left(&self) -> f32 {
        self.left
    }

    /// Right edge in world units.
    #[must_use]
    pub const fn right(&self) -> f32 {
        self.right
    }

    /// Width of the playfield.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }
}

/// Which edge of the playfield an entity producer spawns from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnSide {
    /// Entities enter from the left edge and travel right.
    Left,
    /// Entities enter from the right edge and travel left.
    Right,
}

/// One instance a producer emitted, for the presentation layer to initialize.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnRecord {
    /// Handle returned by the instance factory.
    pub handle: InstanceHandle,
    /// Variant that was instantiated.
    pub variant: VariantId,
    /// Placement position in world units.
    pub position: Position,
    /// Speed multiplier the instance should move with.
    pub speed_multiplier: f32,
    /// Independent traversal destination, when the instance self-propels.
    pub traversal_target: Option<Position>,
}

/// Role shared by every spawn producer so the coordinator can fan out
/// commands without knowing the concrete family.
pub trait Producer {
    /// Applies the active level's spawn config. Producers that take no
    /// entity spawn parameters ignore the call.
    fn apply_config(&mut self, config: &SpawnConfig, now: Duration) -> Result<(), ConfigError> {
        let _ = (config, now);
        Ok(())
    }

    /// Announces the active environment theme. Producers whose variants are
    /// not themed ignore the call.
    fn set_environment(&mut self, environment_id: &str) {
        let _ = environment_id;
    }

    /// Begins or re-runs the producer's spawning activity.
    fn start(
        &mut self,
        now: Duration,
        factory: &mut dyn InstanceFactory,
        out: &mut Vec<SpawnRecord>,
    );

    /// Ceases periodic spawning; the next tick must not observe a firing.
    fn stop(&mut self);

    /// Returns every tracked instance to the factory and empties the set.
    fn clear(&mut self, factory: &mut dyn InstanceFactory);

    /// Clears all owned instances and re-runs the spawn strategy once.
    fn new_scene(
        &mut self,
        now: Duration,
        factory: &mut dyn InstanceFactory,
        out: &mut Vec<SpawnRecord>,
    ) {
        self.clear(factory);
        self.start(now, factory, out);
    }

    /// Advances the producer by one simulation tick.
    fn tick(
        &mut self,
        now: Duration,
        factory: &mut dyn InstanceFactory,
        out: &mut Vec<SpawnRecord>,
    );
}

/// Draws a one-shot cadence within `[base, base + jitter)` seconds.
fn sample_interval<R: Rng + ?Sized>(base: f32, jitter: f32, rng: &mut R) -> f32 {
    if jitter <= 0.0 {
        base
    } else {
        rng.gen_range(base..base + jitter)
    }
}

fn release_all(spawned: &mut Vec<InstanceHandle>, factory: &mut dyn InstanceFactory) {
    for handle in spawned.drain(..) {
        factory.release(handle);
    }
}

/// Entity producer that spawns fish variants on a jittered cadence.
///
/// Activation validates the config, rebuilds the weighted pool, draws the
/// jittered interval once (not per tick), and starts the scheduler. Each
/// firing performs one weighted category draw plus an independent bonus
/// roll that may add a second instantiation.
#[derive(Clone, Debug)]
pub struct EntitySpawnProducer {
    side: SpawnSide,
    spawn_x: f32,
    scheduler: SpawnScheduler,
    rng: ChaCha8Rng,
    config: Option<SpawnConfig>,
    weighted: Option<WeightedPool>,
    spawned: Vec<InstanceHandle>,
}

impl EntitySpawnProducer {
    /// Creates a producer anchored to one edge of the playfield.
    #[must_use]
    pub fn new(side: SpawnSide, bounds: FieldBounds, seed: u64) -> Self {
        let spawn_x = match side {
            SpawnSide::Left => bounds.left(),
            SpawnSide::Right => bounds.right(),
        };
        Self {
            side,
            spawn_x,
            scheduler: SpawnScheduler::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            config: None,
            weighted: None,
            spawned: Vec::new(),
        }
    }

    /// Edge of the playfield this producer spawns from.
    #[must_use]
    pub const fn side(&self) -> SpawnSide {
        self.side
    }

    /// Number of live instances currently tracked by the producer.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.spawned.len()
    }

    /// Stores a validated config, arms the scheduler with a freshly
    /// jittered cadence, and begins spawning.
    pub fn activate(&mut self, config: SpawnConfig, now: Duration) -> Result<(), ConfigError> {
        config.validate()?;
        self.weighted = Some(WeightedPool::new(
            config.primary_weight,
            config.category_a_pool.clone(),
            config.category_b_pool.clone(),
        )?);
        self.config = Some(config);
        self.arm(now);
        Ok(())
    }

    /// Stops the scheduler and returns every live instance to the factory.
    pub fn deactivate(&mut self, factory: &mut dyn InstanceFactory) {
        self.scheduler.stop();
        release_all(&mut self.spawned, factory);
    }

    fn arm(&mut self, now: Duration) {
        let Some(config) = self.config.as_ref() else {
            return;
        };
        let base = config.base_interval_seconds;
        let jitter = config.interval_jitter_seconds;
        let interval = sample_interval(base, jitter, &mut self.rng);
        self.scheduler
            .configure(Duration::from_secs_f32(interval), now)
            .expect("validated interval is positive");
        self.scheduler.start();
    }

    fn spawn_once(&mut self, factory: &mut dyn InstanceFactory, out: &mut Vec<SpawnRecord>) {
        let (Some(config), Some(weighted)) = (self.config.as_ref(), self.weighted.as_ref()) else {
            return;
        };

        let mut picks = vec![weighted.draw(&mut self.rng).clone()];
        if roll_percent(config.bonus_probability_percent, &mut self.rng) {
            picks.push(draw_uniform(&config.bonus_pool, &mut self.rng).clone());
        }

        let speed_multiplier = config.speed_multiplier;
        for variant in picks {
            match factory.acquire(&variant) {
                Ok(handle) => {
                    self.spawned.push(handle);
                    out.push(SpawnRecord {
                        handle,
                        variant,
                        position: Position::new(self.spawn_x, 0.0),
                        speed_multiplier,
                        traversal_target: None,
                    });
                }
                Err(error) => warn!(%error, "entity spawn skipped"),
            }
        }
    }
}

impl Producer for EntitySpawnProducer {
    fn apply_config(&mut self, config: &SpawnConfig, now: Duration) -> Result<(), ConfigError> {
        self.activate(config.clone(), now)
    }

    fn start(
        &mut self,
        now: Duration,
        _factory: &mut dyn InstanceFactory,
        _out: &mut Vec<SpawnRecord>,
    ) {
        // Re-rolls the jittered cadence exactly like a fresh activation.
        self.arm(now);
    }

    fn stop(&mut self) {
        self.scheduler.stop();
    }

    fn clear(&mut self, factory: &mut dyn InstanceFactory) {
        release_all(&mut self.spawned, factory);
    }

    fn tick(
        &mut self,
        now: Duration,
        factory: &mut dyn InstanceFactory,
        out: &mut Vec<SpawnRecord>,
    ) {
        if self.scheduler.poll(now) {
            self.spawn_once(factory, out);
        }
    }
}

/// Field producer that fills the playfield with themed cliff instances.
///
/// Placement starts one eighth of the span in from the left edge and
/// advances by a randomized step between three and four eighths of the span
/// until the cursor crosses the right edge. Runs once per start or scene.
#[derive(Clone, Debug)]
pub struct CliffProducer {
    bounds: FieldBounds,
    theme: String,
    draw: AntiRepeatDraw,
    rng: ChaCha8Rng,
    spawned: Vec<InstanceHandle>,
}

impl CliffProducer {
    /// Creates a cliff producer spanning the provided bounds.
    #[must_use]
    pub fn new(bounds: FieldBounds, theme: impl Into<String>, seed: u64) -> Self {
        Self {
            bounds,
            theme: theme.into(),
            draw: AntiRepeatDraw::new(FIELD_VARIANT_COUNT).expect("non-zero variant count"),
            rng: ChaCha8Rng::seed_from_u64(seed),
            spawned: Vec::new(),
        }
    }

    /// Number of live instances currently tracked by the producer.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.spawned.len()
    }

    fn fill(&mut self, factory: &mut dyn InstanceFactory, out: &mut Vec<SpawnRecord>) {
        self.draw.reset();
        let width = self.bounds.width();
        let mut cursor = self.bounds.left() + width / 8.0;

        while cursor < self.bounds.right() {
            let index = self.draw.draw(&mut self.rng);
            let variant = VariantId::new(format!("{}_Cliff_{index}", self.theme));
            match factory.acquire(&variant) {
                Ok(handle) => {
                    self.spawned.push(handle);
                    out.push(SpawnRecord {
                        handle,
                        variant,
                        position: Position::new(cursor, CLIFF_ALTITUDE),
                        speed_multiplier: 1.0,
                        traversal_target: None,
                    });
                }
                Err(error) => warn!(%error, "cliff placement skipped"),
            }
            cursor += self.rng.gen_range(3.0 * width / 8.0..4.0 * width / 8.0);
        }
    }
}

impl Producer for CliffProducer {
    fn set_environment(&mut self, environment_id: &str) {
        self.theme = environment_id.to_owned();
    }

    fn start(
        &mut self,
        _now: Duration,
        factory: &mut dyn InstanceFactory,
        out: &mut Vec<SpawnRecord>,
    ) {
        self.fill(factory, out);
    }

    fn stop(&mut self) {}

    fn clear(&mut self, factory: &mut dyn InstanceFactory) {
        release_all(&mut self.spawned, factory);
    }

    fn tick(
        &mut self,
        _now: Duration,
        _factory: &mut dyn InstanceFactory,
        _out: &mut Vec<SpawnRecord>,
    ) {
    }
}

/// Field producer that scatters plant instances along the sea floor.
///
/// The cursor starts at the left edge and advances by one to five world
/// units before each placement until it crosses the right edge.
#[derive(Clone, Debug)]
pub struct PlantProducer {
    bounds: FieldBounds,
    draw: AntiRepeatDraw,
    rng: ChaCha8Rng,
    spawned: Vec<InstanceHandle>,
}

impl PlantProducer {
    /// Creates a plant producer spanning the provided bounds.
    #[must_use]
    pub fn new(bounds: FieldBounds, seed: u64) -> Self {
        Self {
            bounds,
            draw: AntiRepeatDraw::new(FIELD_VARIANT_COUNT).expect("non-zero variant count"),
            rng: ChaCha8Rng::seed_from_u64(seed),
            spawned: Vec::new(),
        }
    }

    /// Number of live instances currently tracked by the producer.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.spawned.len()
    }

    fn fill(&mut self, factory: &mut dyn InstanceFactory, out: &mut Vec<SpawnRecord>) {
        self.draw.reset();
        let mut cursor = self.bounds.left();

        while cursor < self.bounds.right() {
            let index = self.draw.draw(&mut self.rng);
            cursor += self.rng.gen_range(PLANT_STEP_MIN..PLANT_STEP_MAX);

            let variant = VariantId::new(format!("Plants_{index}"));
            match factory.acquire(&variant) {
                Ok(handle) => {
                    self.spawned.push(handle);
                    out.push(SpawnRecord {
                        handle,
                        variant,
                        position: Position::new(cursor, PLANT_ALTITUDE),
                        speed_multiplier: 1.0,
                        traversal_target: None,
                    });
                }
                Err(error) => warn!(%error, "plant placement skipped"),
            }
        }
    }
}

impl Producer for PlantProducer {
    fn start(
        &mut self,
        _now: Duration,
        factory: &mut dyn InstanceFactory,
        out: &mut Vec<SpawnRecord>,
    ) {
        self.fill(factory, out);
    }

    fn stop(&mut self) {}

    fn clear(&mut self, factory: &mut dyn InstanceFactory) {
        release_all(&mut self.spawned, factory);
    }

    fn tick(
        &mut self,
        _now: Duration,
        _factory: &mut dyn InstanceFactory,
        _out: &mut Vec<SpawnRecord>,
    ) {
    }
}

/// Field producer that releases one cloud at a time on a slow cadence.
///
/// Each firing places a single variant at the anchor with bounded vertical
/// jitter and hands it a mirrored traversal target on the far side of the
/// playfield; the instance's journey is owned by the presentation layer.
#[derive(Clone, Debug)]
pub struct CloudProducer {
    anchor: Position,
    scheduler: SpawnScheduler,
    draw: AntiRepeatDraw,
    rng: ChaCha8Rng,
    spawned: Vec<InstanceHandle>,
}

impl CloudProducer {
    /// Creates a cloud producer anchored at the provided position.
    #[must_use]
    pub fn new(anchor: Position, seed: u64) -> Self {
        Self {
            anchor,
            scheduler: SpawnScheduler::new(),
            draw: AntiRepeatDraw::new(FIELD_VARIANT_COUNT).expect("non-zero variant count"),
            rng: ChaCha8Rng::seed_from_u64(seed),
            spawned: Vec::new(),
        }
    }

    /// Number of live instances currently tracked by the producer.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.spawned.len()
    }

    fn spawn_once(&mut self, factory: &mut dyn InstanceFactory, out: &mut Vec<SpawnRecord>) {
        let index = self.draw.draw(&mut self.rng);
        let variant = VariantId::new(format!("Cloud_{index}"));
        let altitude = self.anchor.y()
            + self
                .rng
                .gen_range(-CLOUD_ALTITUDE_JITTER..=CLOUD_ALTITUDE_JITTER);

        match factory.acquire(&variant) {
            Ok(handle) => {
                self.spawned.push(handle);
                out.push(SpawnRecord {
                    handle,
                    variant,
                    position: Position::new(self.anchor.x(), altitude),
                    speed_multiplier: 1.0,
                    traversal_target: Some(Position::new(-self.anchor.x(), self.anchor.y())),
                });
            }
            Err(error) => warn!(%error, "cloud spawn skipped"),
        }
    }
}

impl Producer for CloudProducer {
    fn start(
        &mut self,
        now: Duration,
        _factory: &mut dyn InstanceFactory,
        _out: &mut Vec<SpawnRecord>,
    ) {
        // Stop before re-arming so overlapping starts cannot double the cadence.
        self.scheduler.stop();
        let interval = sample_interval(CLOUD_BASE_INTERVAL, CLOUD_INTERVAL_JITTER, &mut self.rng);
        self.scheduler
            .configure(Duration::from_secs_f32(interval), now)
            .expect("cloud cadence is positive");
        self.scheduler.start();
    }

    fn stop(&mut self) {
        self.scheduler.stop();
    }

    fn clear(&mut self, factory: &mut dyn InstanceFactory) {
        release_all(&mut self.spawned, factory);
    }

    fn tick(
        &mut self,
        now: Duration,
        factory: &mut dyn InstanceFactory,
        out: &mut Vec<SpawnRecord>,
    ) {
        if self.scheduler.poll(now) {
            self.spawn_once(factory, out);
        }
    }
}

/// Owns the active producers for a scene and fans commands out to them in
/// registration order.
#[derive(Default)]
pub struct SpawnCoordinator {
    producers: Vec<Box<dyn Producer>>,
}

impl SpawnCoordinator {
    /// Creates a coordinator with no registered producers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a producer; fan-out follows registration order.
    pub fn register(&mut self, producer: Box<dyn Producer>) {
        self.producers.push(producer);
    }

    /// Number of registered producers.
    #[must_use]
    pub fn producer_count(&self) -> usize {
        self.producers.len()
    }

    /// Pushes the active level's spawn config to every producer.
    pub fn apply_config(&mut self, config: &SpawnConfig, now: Duration) -> Result<(), ConfigError> {
        for producer in &mut self.producers {
            producer.apply_config(config, now)?;
        }
        Ok(())
    }

    /// Announces the active environment theme to every producer.
    pub fn set_environment(&mut self, environment_id: &str) {
        for producer in &mut self.producers {
            producer.set_environment(environment_id);
        }
    }

    /// Starts every producer.
    pub fn start_all(
        &mut self,
        now: Duration,
        factory: &mut dyn InstanceFactory,
        out: &mut Vec<SpawnRecord>,
    ) {
        for producer in &mut self.producers {
            producer.start(now, factory, out);
        }
    }

    /// Stops every producer before the next tick is observed.
    pub fn stop_all(&mut self) {
        for producer in &mut self.producers {
            producer.stop();
        }
    }

    /// Force-clears every producer's live instances.
    pub fn clear_all(&mut self, factory: &mut dyn InstanceFactory) {
        for producer in &mut self.producers {
            producer.clear(factory);
        }
    }

    /// Resets every producer for a new scene: clear, then restart.
    pub fn new_scene(
        &mut self,
        now: Duration,
        factory: &mut dyn InstanceFactory,
        out: &mut Vec<SpawnRecord>,
    ) {
        for producer in &mut self.producers {
            producer.new_scene(now, factory, out);
        }
    }

    /// Advances every producer by one simulation tick in registration order.
    pub fn tick(
        &mut self,
        now: Duration,
        factory: &mut dyn InstanceFactory,
        out: &mut Vec<SpawnRecord>,
    ) {
        for producer in &mut self.producers {
            producer.tick(now, factory, out);
        }
    }
}
