#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic sampling policies backing the spawn producers.
//!
//! Two independent policies live here: the binary-weighted category draw
//! used by the entity producers, and the anti-repeat uniform draw used by
//! the field producers. Both are generic over [`rand::Rng`] so callers can
//! drive them from seeded generators and replay sessions exactly.

use rand::{seq::SliceRandom, Rng};
use reef_rush_core::{ConfigError, VariantId};
use sha2::{Digest, Sha256};

/// Two labeled categories with a single authored weight between them.
///
/// Category B's weight is always the complement of category A's, so a draw
/// lands in exactly one category before picking uniformly inside it.
#[derive(Clone, Debug)]
pub struct WeightedPool {
    primary_weight: f32,
    category_a: Vec<VariantId>,
    category_b: Vec<VariantId>,
}

impl WeightedPool {
    /// Builds a weighted pool, rejecting out-of-range weights and empty
    /// categories up front so draws never have to handle them.
    pub fn new(
        primary_weight: f32,
        category_a: Vec<VariantId>,
        category_b: Vec<VariantId>,
    ) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&primary_weight) {
            return Err(ConfigError::WeightOutOfRange {
                value: primary_weight,
            });
        }
        if category_a.is_empty() {
            return Err(ConfigError::EmptyPool { pool: "category_a" });
        }
        if category_b.is_empty() {
            return Err(ConfigError::EmptyPool { pool: "category_b" });
        }
        Ok(Self {
            primary_weight,
            category_a,
            category_b,
        })
    }

    /// Weight assigned to category A at construction.
    #[must_use]
    pub const fn primary_weight(&self) -> f32 {
        self.primary_weight
    }

    /// Draws one variant: `u ~ U(0,1)` selects the category, then a uniform
    /// pick inside the winning category selects the variant.
    #[must_use]
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> &VariantId {
        let pool = if rng.gen::<f32>() < self.primary_weight {
            &self.category_a
        } else {
            &self.category_b
        };
        draw_uniform(pool, rng)
    }
}

/// Picks one variant uniformly from a non-empty pool.
#[must_use]
pub fn draw_uniform<'a, R: Rng + ?Sized>(pool: &'a [VariantId], rng: &mut R) -> &'a VariantId {
    pool.choose(rng).expect("pool validated non-empty")
}

/// Rolls on the 0..100 percent scale and reports whether `percent` won.
///
/// The comparison is against a value drawn from `[0, 100)`, matching the
/// authored percent-scale probabilities even when they are fractions of one.
#[must_use]
pub fn roll_percent<R: Rng + ?Sized>(percent: f32, rng: &mut R) -> bool {
    rng.gen_range(0.0..100.0) < percent
}

/// Uniform draw over `[1, variant_count]` that rejects the immediately
/// preceding result.
///
/// Guarantees no two consecutive draws are equal for one producer; it says
/// nothing about global repetition across a whole layout pass.
#[derive(Clone, Debug)]
pub struct AntiRepeatDraw {
    variant_count: usize,
    last: Option<usize>,
}

impl AntiRepeatDraw {
    /// Creates a draw over `variant_count` one-based variant indices.
    pub fn new(variant_count: usize) -> Result<Self, ConfigError> {
        if variant_count == 0 {
            return Err(ConfigError::EmptyPool { pool: "variant" });
        }
        Ok(Self {
            variant_count,
            last: None,
        })
    }

    /// Number of variant indices the draw ranges over.
    #[must_use]
    pub const fn variant_count(&self) -> usize {
        self.variant_count
    }

    /// Draws the next index, resampling until it differs from the previous
    /// one. A single-variant range returns that value immediately; the
    /// rejection loop would never terminate otherwise.
    #[must_use]
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        if self.variant_count <= 1 {
            self.last = Some(1);
            return 1;
        }
        loop {
            let candidate = rng.gen_range(1..=self.variant_count);
            if Some(candidate) != self.last {
                self.last = Some(candidate);
                return candidate;
            }
        }
    }

    /// Forgets the previous draw so the next layout pass starts fresh.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Derives an independent 64-bit seed from a global seed and a stream label.
///
/// Producers each own one labeled stream so adding or removing a producer
/// never perturbs the sequences of the others.
#[must_use]
pub fn derive_labeled_seed(global_seed: u64, label: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(global_seed.to_le_bytes());
    hasher.update(label.as_bytes());
    let digest = hasher.finalize();
    let bytes: [u8; 8] = digest[0..8].try_into().expect("sha256 digest slice length");
    u64::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labeled_seeds_differ_per_label() {
        let left = derive_labeled_seed(7, "entity-left");
        let right = derive_labeled_seed(7, "entity-right");
        assert_ne!(left, right);
        assert_eq!(left, derive_labeled_seed(7, "entity-left"));
    }

    #[test]
    fn weighted_pool_rejects_bad_weight() {
        let pool = WeightedPool::new(1.5, vec![VariantId::new("a")], vec![VariantId::new("b")]);
        assert!(matches!(
            pool,
            Err(ConfigError::WeightOutOfRange { .. })
        ));
    }

    #[test]
    fn anti_repeat_rejects_zero_variants() {
        assert!(matches!(
            AntiRepeatDraw::new(0),
            Err(ConfigError::EmptyPool { .. })
        ));
    }
}
