#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Procedural difficulty curve mapping a level index to a full [`LevelSpec`].
//!
//! Scalar parameters interpolate linearly between authored start and end
//! values across the level span, except for three knobs that accrue per
//! absolute level index and then saturate: the bonus probability and the
//! speed multiplier climb by a fixed increment per level up to a ceiling,
//! and the spawn interval shrinks by a fixed reduction down to a floor.
//! Generation is pure; for fixed tuning and index the output is exactly
//! reproducible.

use reef_rush_core::{ConfigError, LevelSpec, LevelTable, SpawnConfig, VariantId};

/// Authored constants controlling every adjustable aspect of the curve.
#[derive(Clone, Debug)]
pub struct CurveTuning {
    /// Score target at the first level.
    pub initial_score_target: f32,
    /// Score target at the last level.
    pub final_score_target: f32,
    /// Session time budget at the first level, in seconds.
    pub initial_time_budget: f32,
    /// Session time budget at the last level, in seconds.
    pub final_time_budget: f32,
    /// Category-A weight at the first level.
    pub initial_primary_weight: f32,
    /// Category-A weight at the last level.
    pub final_primary_weight: f32,
    /// Percent added to the bonus probability per level index.
    pub bonus_probability_increment: f32,
    /// Saturation ceiling for the bonus probability, on the percent scale.
    pub bonus_probability_ceiling: f32,
    /// Speed multiplier at the first level.
    pub initial_speed_multiplier: f32,
    /// Multiplier added per level index; keeps accruing until the ceiling.
    pub speed_multiplier_increment: f32,
    /// Saturation ceiling for the speed multiplier.
    pub speed_multiplier_ceiling: f32,
    /// Spawn cadence at the first level, in seconds.
    pub initial_spawn_interval: f32,
    /// Seconds removed from the cadence per level index.
    pub spawn_interval_reduction: f32,
    /// Hard floor for the spawn cadence, in seconds.
    pub spawn_interval_floor: f32,
    /// Upper jitter applied on top of the cadence at producer activation.
    pub interval_jitter: f32,
    /// Category-A variants shared by every generated level.
    pub category_a_pool: Vec<VariantId>,
    /// Category-B variants shared by every generated level.
    pub category_b_pool: Vec<VariantId>,
    /// Bonus variants shared by every generated level.
    pub bonus_pool: Vec<VariantId>,
    /// Environment themes cycled across the level sequence.
    pub environments: Vec<String>,
}

impl Default for CurveTuning {
    fn default() -> Self {
        Self {
            initial_score_target: 100.0,
            final_score_target: 500.0,
            initial_time_budget: 90.0,
            final_time_budget: 75.0,
            initial_primary_weight: 0.7,
            final_primary_weight: 0.3,
            bonus_probability_increment: 0.005,
            bonus_probability_ceiling: 15.0,
            initial_speed_multiplier: 1.0,
            speed_multiplier_increment: 0.03,
            speed_multiplier_ceiling: 2.0,
            initial_spawn_interval: 5.0,
            spawn_interval_reduction: 0.02,
            spawn_interval_floor: 0.6,
            interval_jitter: 2.5,
            category_a_pool: numbered_pool("SmallFish", 6),
            category_b_pool: numbered_pool("BigFish", 6),
            bonus_pool: vec![VariantId::new("BonusFish")],
            environments: vec![
                "Lagoon".to_owned(),
                "Harbour".to_owned(),
                "Reef".to_owned(),
            ],
        }
    }
}

fn numbered_pool(prefix: &str, count: usize) -> Vec<VariantId> {
    (1..=count)
        .map(|index| VariantId::new(format!("{prefix}_{index}")))
        .collect()
}

/// Pure generator producing [`LevelSpec`] values from authored tuning.
#[derive(Clone, Debug)]
pub struct DifficultyCurve {
    tuning: CurveTuning,
}

impl Default for DifficultyCurve {
    fn default() -> Self {
        Self::new(CurveTuning::default()).expect("default tuning is valid")
    }
}

impl DifficultyCurve {
    /// Creates a curve, rejecting tuning that would make generation
    /// unusable: empty variant pools or an empty environment cycle.
    pub fn new(tuning: CurveTuning) -> Result<Self, ConfigError> {
        if tuning.category_a_pool.is_empty() {
            return Err(ConfigError::EmptyPool { pool: "category_a" });
        }
        if tuning.category_b_pool.is_empty() {
            return Err(ConfigError::EmptyPool { pool: "category_b" });
        }
        if tuning.bonus_pool.is_empty() {
            return Err(ConfigError::EmptyPool { pool: "bonus" });
        }
        if tuning.environments.is_empty() {
            return Err(ConfigError::EmptyPool { pool: "environments" });
        }
        Ok(Self { tuning })
    }

    /// Authored constants driving the curve.
    #[must_use]
    pub const fn tuning(&self) -> &CurveTuning {
        &self.tuning
    }

    /// Generates the spec for `level_index` within a span of `level_count`
    /// levels. A single-level span pins the progress ratio at zero rather
    /// than dividing by zero.
    #[must_use]
    pub fn generate(&self, level_index: usize, level_count: usize) -> LevelSpec {
        let tuning = &self.tuning;
        let progress = if level_count <= 1 {
            0.0
        } else {
            (level_index as f32 / (level_count - 1) as f32).clamp(0.0, 1.0)
        };
        let index = level_index as f32;

        let spawn_config = SpawnConfig {
            primary_weight: lerp(
                tuning.initial_primary_weight,
                tuning.final_primary_weight,
                progress,
            ),
            bonus_probability_percent: tuning
                .bonus_probability_ceiling
                .min(tuning.bonus_probability_increment * (index + 1.0)),
            speed_multiplier: tuning
                .speed_multiplier_ceiling
                .min(tuning.initial_speed_multiplier + tuning.speed_multiplier_increment * index),
            base_interval_seconds: tuning
                .spawn_interval_floor
                .max(tuning.initial_spawn_interval - tuning.spawn_interval_reduction * index),
            interval_jitter_seconds: tuning.interval_jitter,
            category_a_pool: tuning.category_a_pool.clone(),
            category_b_pool: tuning.category_b_pool.clone(),
            bonus_pool: tuning.bonus_pool.clone(),
        };

        LevelSpec {
            score_target: lerp(
                tuning.initial_score_target,
                tuning.final_score_target,
                progress,
            )
            .round() as u32,
            time_budget_seconds: lerp(
                tuning.initial_time_budget,
                tuning.final_time_budget,
                progress,
            ),
            environment_id: tuning.environments[level_index % tuning.environments.len()].clone(),
            spawn_config,
        }
    }

    /// Generates and validates a complete table of `level_count` levels.
    pub fn generate_table(&self, level_count: usize) -> Result<LevelTable, ConfigError> {
        let levels = (0..level_count)
            .map(|index| self.generate(index, level_count))
            .collect();
        LevelTable::new(levels)
    }
}

fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_level_span_avoids_division_by_zero() {
        let curve = DifficultyCurve::default();
        let level = curve.generate(0, 1);
        assert_eq!(level.score_target, 100);
        assert!((level.time_budget_seconds - 90.0).abs() < f32::EPSILON);
    }

    #[test]
    fn rejects_empty_environment_cycle() {
        let tuning = CurveTuning {
            environments: Vec::new(),
            ..CurveTuning::default()
        };
        assert!(matches!(
            DifficultyCurve::new(tuning),
            Err(ConfigError::EmptyPool {
                pool: "environments"
            })
        ));
    }
}
