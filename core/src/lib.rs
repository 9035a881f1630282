#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Reef Rush spawn and progression engine.
//!
//! This crate defines the data model that connects the difficulty generator,
//! the spawn producers, and the level progression: authorable level records,
//! the error taxonomy, and the traits behind which the excluded collaborators
//! (instance pooling, score/timer display) live. Systems crates depend on
//! this crate only; they never reach into each other's state.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier naming one concrete spawnable variant, such as `SmallFish_3`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VariantId(String);

impl VariantId {
    /// Creates a variant identifier from any string-like value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrows the underlying identifier text.
    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Spawn parameters governing the entity producers for a single level.
///
/// The secondary category weight is always derived as `1 - primary_weight`
/// and never stored, so the two weights cannot drift apart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnConfig {
    /// Probability of drawing from category A instead of category B.
    pub primary_weight: f32,
    /// Chance, on the 0..100 percent scale, of an additional bonus spawn.
    pub bonus_probability_percent: f32,
    /// Speed multiplier handed to every spawned entity.
    pub speed_multiplier: f32,
    /// Base cadence between entity spawns in seconds.
    pub base_interval_seconds: f32,
    /// Upper jitter added to the base cadence when a producer activates.
    pub interval_jitter_seconds: f32,
    /// Variants drawn when the primary weight wins.
    pub category_a_pool: Vec<VariantId>,
    /// Variants drawn when the primary weight loses.
    pub category_b_pool: Vec<VariantId>,
    /// Variants drawn when the independent bonus roll succeeds.
    pub bonus_pool: Vec<VariantId>,
}

impl SpawnConfig {
    /// Weight of category B, derived from the primary weight.
    #[must_use]
    pub fn secondary_weight(&self) -> f32 {
        1.0 - self.primary_weight
    }

    /// Checks every range and non-emptiness rule the producers rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.primary_weight) {
            return Err(ConfigError::WeightOutOfRange {
                value: self.primary_weight,
            });
        }
        if !(0.0..=100.0).contains(&self.bonus_probability_percent) {
            return Err(ConfigError::PercentOutOfRange {
                value: self.bonus_probability_percent,
            });
        }
        if self.speed_multiplier <= 0.0 {
            return Err(ConfigError::NonPositiveSpeed {
                value: self.speed_multiplier,
            });
        }
        if self.base_interval_seconds <= 0.0 {
            return Err(ConfigError::NonPositiveInterval {
                seconds: self.base_interval_seconds,
            });
        }
        if self.interval_jitter_seconds < 0.0 {
            return Err(ConfigError::NegativeJitter {
                seconds: self.interval_jitter_seconds,
            });
        }
        if self.category_a_pool.is_empty() {
            return Err(ConfigError::EmptyPool { pool: "category_a" });
        }
        if self.category_b_pool.is_empty() {
            return Err(ConfigError::EmptyPool { pool: "category_b" });
        }
        if self.bonus_pool.is_empty() {
            return Err(ConfigError::EmptyPool { pool: "bonus" });
        }
        Ok(())
    }
}

/// Immutable parameter bundle governing one progression step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelSpec {
    /// Score the player must accumulate to clear the level.
    pub score_target: u32,
    /// Session time budget in seconds.
    pub time_budget_seconds: f32,
    /// Environment theme applied to the scene and its field producers.
    pub environment_id: String,
    /// Spawn parameters pushed to the coordinator when the level opens.
    pub spawn_config: SpawnConfig,
}

impl LevelSpec {
    /// Checks the level's own fields and its embedded spawn config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.time_budget_seconds <= 0.0 {
            return Err(ConfigError::NonPositiveTimeBudget {
                seconds: self.time_budget_seconds,
            });
        }
        self.spawn_config.validate()
    }
}

/// Ordered, non-empty sequence of level specs indexable with wraparound.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelTable {
    levels: Vec<LevelSpec>,
}

impl LevelTable {
    /// Builds a table, validating every level up front.
    pub fn new(levels: Vec<LevelSpec>) -> Result<Self, ConfigError> {
        if levels.is_empty() {
            return Err(ConfigError::EmptyTable);
        }
        for level in &levels {
            level.validate()?;
        }
        Ok(Self { levels })
    }

    /// Number of authored levels in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Reports whether the table holds no levels; always false by construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Retrieves the level at `index`, wrapping past the end of the table so
    /// sequential progression never runs out of levels.
    #[must_use]
    pub fn get(&self, index: usize) -> &LevelSpec {
        &self.levels[index % self.levels.len()]
    }
}

/// Point in world space where an instance is placed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    x: f32,
    y: f32,
}

impl Position {
    /// Creates a position from explicit coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal world coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical world coordinate.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }
}

/// Opaque ticket handed out by the instance factory for one live instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceHandle(u64);

impl InstanceHandle {
    /// Creates a handle with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Configuration-time failures that must prevent activation or arming.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// A spawn pool that must never be empty contained no variants.
    #[error("spawn pool `{pool}` must contain at least one variant")]
    EmptyPool {
        /// Name of the offending pool.
        pool: &'static str,
    },
    /// The primary category weight fell outside the unit interval.
    #[error("primary weight must lie within [0, 1], got {value}")]
    WeightOutOfRange {
        /// Weight that was rejected.
        value: f32,
    },
    /// The bonus probability fell outside the percent scale.
    #[error("bonus probability must lie within [0, 100], got {value}")]
    PercentOutOfRange {
        /// Percent value that was rejected.
        value: f32,
    },
    /// A spawn interval was zero or negative.
    #[error("spawn interval must be strictly positive, got {seconds}s")]
    NonPositiveInterval {
        /// Interval that was rejected, in seconds.
        seconds: f32,
    },
    /// The interval jitter range was negative.
    #[error("interval jitter must be non-negative, got {seconds}s")]
    NegativeJitter {
        /// Jitter that was rejected, in seconds.
        seconds: f32,
    },
    /// The speed multiplier was zero or negative.
    #[error("speed multiplier must be strictly positive, got {value}")]
    NonPositiveSpeed {
        /// Multiplier that was rejected.
        value: f32,
    },
    /// The level time budget was zero or negative.
    #[error("time budget must be strictly positive, got {seconds}s")]
    NonPositiveTimeBudget {
        /// Budget that was rejected, in seconds.
        seconds: f32,
    },
    /// A level table was constructed without any levels.
    #[error("level table must contain at least one level")]
    EmptyTable,
    /// A scheduler operation required a prior `configure` call.
    #[error("spawn scheduler has not been configured")]
    SchedulerNotConfigured,
}

/// Failure reported when a level index falls outside the table bounds.
///
/// The caller's state is left unchanged; wraparound applies only to
/// sequential advancement, never to explicit indexing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("level index {index} is out of range for a table of {len} levels")]
pub struct OutOfRangeError {
    /// Index that was requested.
    pub index: usize,
    /// Number of levels in the table.
    pub len: usize,
}

/// Failure reported when the instance factory cannot supply a variant.
///
/// Recovered locally by producers: the spawn attempt is skipped, never
/// retried within the same tick, and the scheduler cadence is unaffected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("instance factory has no instance available for `{variant}`")]
pub struct FactoryExhausted {
    /// Variant that could not be acquired.
    pub variant: VariantId,
}

/// External pool factory that producers borrow for the duration of one call.
///
/// Producers release each handle at most once and never retain the factory
/// across ticks.
pub trait InstanceFactory {
    /// Acquires a live instance of the requested variant.
    fn acquire(&mut self, variant: &VariantId) -> Result<InstanceHandle, FactoryExhausted>;

    /// Returns a previously acquired instance to the pool.
    fn release(&mut self, handle: InstanceHandle);
}

/// Score, timer, and environment consumers notified when a level opens.
pub trait ProgressSink {
    /// Announces the score target the player must reach.
    fn set_target(&mut self, score_target: u32);

    /// Announces the session time budget in seconds.
    fn set_budget(&mut self, seconds: f32);

    /// Announces the environment theme for the scene.
    fn set_environment(&mut self, environment_id: &str);

    /// Reports that the active level's target has been met.
    fn notify_complete(&mut self);
}
