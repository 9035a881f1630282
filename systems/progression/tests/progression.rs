use std::time::Duration;

use reef_rush_core::{
    FactoryExhausted, InstanceFactory, InstanceHandle, LevelSpec, LevelTable, OutOfRangeError,
    ProgressSink, SpawnConfig, VariantId,
};
use reef_rush_system_progression::{LevelProgression, OpenLevelError};
use reef_rush_system_spawning::{
    EntitySpawnProducer, FieldBounds, PlantProducer, SpawnCoordinator, SpawnSide,
};

#[derive(Default)]
struct RecordingSink {
    targets: Vec<u32>,
    budgets: Vec<f32>,
    environments: Vec<String>,
    completions: usize,
}

impl ProgressSink for RecordingSink {
    fn set_target(&mut self, score_target: u32) {
        self.targets.push(score_target);
    }

    fn set_budget(&mut self, seconds: f32) {
        self.budgets.push(seconds);
    }

    fn set_environment(&mut self, environment_id: &str) {
        self.environments.push(environment_id.to_owned());
    }

    fn notify_complete(&mut self) {
        self.completions += 1;
    }
}

#[derive(Default)]
struct PoolFactory {
    next: u64,
    released: Vec<InstanceHandle>,
}

impl InstanceFactory for PoolFactory {
    fn acquire(&mut self, _variant: &VariantId) -> Result<InstanceHandle, FactoryExhausted> {
        self.next += 1;
        Ok(InstanceHandle::new(self.next))
    }

    fn release(&mut self, handle: InstanceHandle) {
        self.released.push(handle);
    }
}

fn level(target: u32, budget: f32, environment: &str, prefix: &str) -> LevelSpec {
    LevelSpec {
        score_target: target,
        time_budget_seconds: budget,
        environment_id: environment.to_owned(),
        spawn_config: SpawnConfig {
            primary_weight: 0.7,
            bonus_probability_percent: 0.0,
            speed_multiplier: 1.0,
            base_interval_seconds: 1.0,
            interval_jitter_seconds: 0.0,
            category_a_pool: vec![VariantId::new(format!("{prefix}_A"))],
            category_b_pool: vec![VariantId::new(format!("{prefix}_B"))],
            bonus_pool: vec![VariantId::new(format!("{prefix}_Bonus"))],
        },
    }
}

fn three_level_table() -> LevelTable {
    LevelTable::new(vec![
        level(100, 90.0, "Lagoon", "First"),
        level(300, 82.0, "Harbour", "Second"),
        level(500, 75.0, "Reef", "Third"),
    ])
    .expect("table")
}

#[test]
fn opening_a_level_announces_it_through_the_sink() {
    let mut progression = LevelProgression::new(three_level_table());
    let mut sink = RecordingSink::default();
    let mut coordinator = SpawnCoordinator::new();
    let mut factory = PoolFactory::default();
    let mut out = Vec::new();

    assert_eq!(progression.current_index(), None);
    progression
        .open_level(
            0,
            Duration::ZERO,
            &mut sink,
            &mut coordinator,
            &mut factory,
            &mut out,
        )
        .expect("open");

    assert_eq!(progression.current_index(), Some(0));
    assert_eq!(sink.targets, vec![100]);
    assert_eq!(sink.budgets, vec![90.0]);
    assert_eq!(sink.environments, vec!["Lagoon".to_owned()]);
    assert_eq!(sink.completions, 0);
}

#[test]
fn out_of_range_index_leaves_the_open_level_untouched() {
    let mut progression = LevelProgression::new(three_level_table());
    let mut sink = RecordingSink::default();
    let mut coordinator = SpawnCoordinator::new();
    let mut factory = PoolFactory::default();
    let mut out = Vec::new();

    progression
        .open_level(
            1,
            Duration::ZERO,
            &mut sink,
            &mut coordinator,
            &mut factory,
            &mut out,
        )
        .expect("open");

    let error = progression
        .open_level(
            3,
            Duration::ZERO,
            &mut sink,
            &mut coordinator,
            &mut factory,
            &mut out,
        )
        .expect_err("index past the end");

    assert_eq!(
        error,
        OpenLevelError::OutOfRange(OutOfRangeError { index: 3, len: 3 }),
    );
    assert_eq!(progression.current_index(), Some(1));
    assert_eq!(sink.targets, vec![300], "failed open must not re-announce");
}

#[test]
fn open_next_wraps_past_the_last_level() {
    let mut progression = LevelProgression::new(three_level_table());
    let mut sink = RecordingSink::default();
    let mut coordinator = SpawnCoordinator::new();
    let mut factory = PoolFactory::default();
    let mut out = Vec::new();

    for _ in 0..4 {
        progression
            .open_next(
                Duration::ZERO,
                &mut sink,
                &mut coordinator,
                &mut factory,
                &mut out,
            )
            .expect("open");
    }

    // First call opens level zero, the fourth wraps back to it.
    assert_eq!(progression.current_index(), Some(0));
    assert_eq!(sink.targets, vec![100, 300, 500, 100]);
}

#[test]
fn reset_reopens_the_first_level() {
    let mut progression = LevelProgression::new(three_level_table());
    let mut sink = RecordingSink::default();
    let mut coordinator = SpawnCoordinator::new();
    let mut factory = PoolFactory::default();
    let mut out = Vec::new();

    progression
        .open_level(
            2,
            Duration::ZERO,
            &mut sink,
            &mut coordinator,
            &mut factory,
            &mut out,
        )
        .expect("open");
    progression
        .reset(
            Duration::ZERO,
            &mut sink,
            &mut coordinator,
            &mut factory,
            &mut out,
        )
        .expect("reset");

    assert_eq!(progression.current_index(), Some(0));
    assert_eq!(
        progression.current_level().map(|level| level.score_target),
        Some(100),
    );
}

#[test]
fn spawn_config_flows_through_to_the_producers() {
    let mut progression = LevelProgression::new(three_level_table());
    let mut sink = RecordingSink::default();
    let mut coordinator = SpawnCoordinator::new();
    coordinator.register(Box::new(EntitySpawnProducer::new(
        SpawnSide::Left,
        FieldBounds::new(-40.0, 40.0),
        7,
    )));
    let mut factory = PoolFactory::default();
    let mut out = Vec::new();

    progression
        .open_level(
            1,
            Duration::ZERO,
            &mut sink,
            &mut coordinator,
            &mut factory,
            &mut out,
        )
        .expect("open");

    coordinator.tick(Duration::from_secs(1), &mut factory, &mut out);
    let record = out.first().expect("one spawn after the base interval");
    assert!(record.variant.get().starts_with("Second_"));
}

#[test]
fn reopening_rebuilds_the_scene_and_releases_the_old_layout() {
    let mut progression = LevelProgression::new(three_level_table());
    let mut sink = RecordingSink::default();
    let mut coordinator = SpawnCoordinator::new();
    coordinator.register(Box::new(PlantProducer::new(FieldBounds::new(-40.0, 40.0), 8)));
    let mut factory = PoolFactory::default();
    let mut out = Vec::new();

    progression
        .open_level(
            0,
            Duration::ZERO,
            &mut sink,
            &mut coordinator,
            &mut factory,
            &mut out,
        )
        .expect("open");
    let first_fill = out.len();
    assert!(first_fill > 0, "field producer filled the scene");

    progression
        .open_level(
            1,
            Duration::ZERO,
            &mut sink,
            &mut coordinator,
            &mut factory,
            &mut out,
        )
        .expect("reopen");

    assert_eq!(
        factory.released.len(),
        first_fill,
        "previous layout returned to the factory",
    );
}
