#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level progression over a validated [`LevelTable`].
//!
//! The progression owns the table and the current index; everything else it
//! touches (progress sink, spawn coordinator, instance factory) is injected
//! per call. Opening a level is transactional with respect to its own state:
//! the index only advances after the bounds check and the config fan-out
//! both succeed.

use std::time::Duration;

use reef_rush_core::{
    ConfigError, InstanceFactory, LevelSpec, LevelTable, OutOfRangeError, ProgressSink,
};
use reef_rush_system_spawning::{SpawnCoordinator, SpawnRecord};
use thiserror::Error;
use tracing::info;

/// Failure to open a level.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum OpenLevelError {
    /// The requested index does not exist in the table.
    #[error(transparent)]
    OutOfRange(#[from] OutOfRangeError),
    /// A producer rejected the level's spawn config.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Walks the level table, opening one level at a time.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelProgression {
    table: LevelTable,
    current_index: Option<usize>,
}

impl LevelProgression {
    /// Creates a progression over a validated table. No level is open until
    /// the first call to [`LevelProgression::open_level`].
    #[must_use]
    pub const fn new(table: LevelTable) -> Self {
        Self {
            table,
            current_index: None,
        }
    }

    /// Index of the currently open level, if any.
    #[must_use]
    pub const fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// Spec of the currently open level, if any.
    #[must_use]
    pub fn current_level(&self) -> Option<&LevelSpec> {
        self.current_index.map(|index| self.table.get(index))
    }

    /// The table this progression walks.
    #[must_use]
    pub const fn table(&self) -> &LevelTable {
        &self.table
    }

    /// Opens the level at `index`: announces target, budget, and environment
    /// through the sink, re-themes and reconfigures every producer, and
    /// rebuilds the scene. Newly placed instances are appended to `out`.
    ///
    /// An explicit out-of-range index is an error, and the previously open
    /// level stays open.
    pub fn open_level(
        &mut self,
        index: usize,
        now: Duration,
        sink: &mut dyn ProgressSink,
        coordinator: &mut SpawnCoordinator,
        factory: &mut dyn InstanceFactory,
        out: &mut Vec<SpawnRecord>,
    ) -> Result<(), OpenLevelError> {
        if index >= self.table.len() {
            return Err(OutOfRangeError {
                index,
                len: self.table.len(),
            }
            .into());
        }
        let level = self.table.get(index).clone();

        coordinator.set_environment(&level.environment_id);
        coordinator.apply_config(&level.spawn_config, now)?;
        coordinator.new_scene(now, factory, out);

        sink.set_target(level.score_target);
        sink.set_budget(level.time_budget_seconds);
        sink.set_environment(&level.environment_id);

        self.current_index = Some(index);
        info!(
            level = index,
            environment = %level.environment_id,
            score_target = level.score_target,
            "level opened"
        );
        Ok(())
    }

    /// Opens the level after the current one, wrapping back to the first
    /// level past the end of the table. Before any level has been opened
    /// this opens level zero.
    pub fn open_next(
        &mut self,
        now: Duration,
        sink: &mut dyn ProgressSink,
        coordinator: &mut SpawnCoordinator,
        factory: &mut dyn InstanceFactory,
        out: &mut Vec<SpawnRecord>,
    ) -> Result<(), OpenLevelError> {
        let next = match self.current_index {
            Some(index) => (index + 1) % self.table.len(),
            None => 0,
        };
        self.open_level(next, now, sink, coordinator, factory, out)
    }

    /// Restarts the sequence from the first level.
    pub fn reset(
        &mut self,
        now: Duration,
        sink: &mut dyn ProgressSink,
        coordinator: &mut SpawnCoordinator,
        factory: &mut dyn InstanceFactory,
        out: &mut Vec<SpawnRecord>,
    ) -> Result<(), OpenLevelError> {
        self.open_level(0, now, sink, coordinator, factory, out)
    }
}
