//! Range-proportional gene mutation
//!
//! Each gene is perturbed independently by a symmetric offset scaled to the
//! width of its own range, so every gene mutates at a comparable relative
//! strength regardless of its units. Results are clamped back into range.

use serde::{Deserialize, Serialize};

use crate::creature::Creature;
use crate::rng::GeneRng;

/// Configuration for gene mutation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MutationConfig {
    /// Probability that a gene is copied unchanged
    pub skip_probability: f64,
    /// Fraction of a gene's range the offset can span (offset is +/- spread/2)
    pub spread: f64,
}

impl MutationConfig {
    /// Every gene moves on every mutation, with a modest step
    pub fn steady() -> Self {
        Self {
            skip_probability: 0.0,
            spread: 0.2,
        }
    }

    /// Fewer genes move per mutation, but those that do take larger steps
    pub fn noisy() -> Self {
        Self {
            skip_probability: 0.3,
            spread: 0.3,
        }
    }
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self::steady()
    }
}

/// Mutate a single value within `[min, max]`
pub fn mutate_value<R: GeneRng + ?Sized>(
    value: f64,
    min: f64,
    max: f64,
    config: &MutationConfig,
    rng: &mut R,
) -> f64 {
    if config.skip_probability > 0.0 && rng.check_probability(config.skip_probability) {
        return value;
    }

    let delta = (0.5 - rng.gen_f64()) * config.spread * (max - min);
    (value + delta).clamp(min, max)
}

/// Derive a new creature from `parent`, which is left untouched
pub fn mutate<R: GeneRng + ?Sized>(
    parent: &Creature,
    config: &MutationConfig,
    rng: &mut R,
) -> Creature {
    let values: Vec<f64> = parent
        .gene_values()
        .map(|gv| {
            let range = gv.definition.range;
            mutate_value(gv.value, range.min, range.max, config, rng)
        })
        .collect();

    let changed = values
        .iter()
        .zip(parent.values())
        .filter(|(new, old)| new != old)
        .count();
    log::trace!("Mutated {}/{} genes", changed, values.len());

    Creature::from_values(parent.schema().clone(), values)
}

impl Creature {
    /// Derive a mutated child sharing this creature's schema
    pub fn mutate<R: GeneRng + ?Sized>(&self, config: &MutationConfig, rng: &mut R) -> Creature {
        mutate(self, config, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creature::GeneMap;
    use crate::schema::{GeneDefinition, Schema, tree_schema};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    #[test]
    fn test_mutation_leaves_parent_untouched() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(1);
        let parent = Creature::new(tree_schema());
        let snapshot = parent.clone();

        let child = parent.mutate(&MutationConfig::default(), &mut rng);

        assert_eq!(parent, snapshot);
        assert_ne!(child.values(), parent.values());
        assert!(child.same_species(&parent));
    }

    #[test]
    fn test_steady_mutation_moves_first_gene() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(99);
        let parent = Creature::new(tree_schema());

        let child = mutate(&parent, &MutationConfig::steady(), &mut rng);

        assert_ne!(child.values()[0], parent.values()[0]);
    }

    #[test]
    fn test_mutation_step_is_bounded() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(5);
        let config = MutationConfig::steady();
        let parent = Creature::new(tree_schema());

        for _ in 0..200 {
            let child = parent.mutate(&config, &mut rng);
            for (gv, &old) in child.gene_values().zip(parent.values()) {
                let max_step = 0.5 * config.spread * gv.definition.range.span();
                assert!((gv.value - old).abs() <= max_step + 1e-12);
            }
        }
    }

    #[test]
    fn test_mutation_clamps_at_extremes() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(3);
        let schema = tree_schema();
        let config = MutationConfig::noisy();

        let mins: GeneMap = schema
            .genes()
            .iter()
            .map(|g| (g.name.clone(), g.range.min))
            .collect();
        let maxs: GeneMap = schema
            .genes()
            .iter()
            .map(|g| (g.name.clone(), g.range.max))
            .collect();

        let low = Creature::from_mapping(schema.clone(), &mins).unwrap();
        let high = Creature::from_mapping(schema, &maxs).unwrap();

        for _ in 0..500 {
            assert!(low.mutate(&config, &mut rng).is_within_ranges());
            assert!(high.mutate(&config, &mut rng).is_within_ranges());
        }
    }

    #[test]
    fn test_skip_probability_one_copies_everything() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(11);
        let config = MutationConfig {
            skip_probability: 1.0,
            spread: 0.3,
        };
        let parent = Creature::new(tree_schema());

        let child = parent.mutate(&config, &mut rng);

        assert_eq!(child, parent);
    }

    #[test]
    fn test_noisy_mutation_skips_some_genes() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(21);
        let parent = Creature::new(tree_schema());

        let mut unchanged = 0;
        let mut total = 0;
        for _ in 0..200 {
            let child = parent.mutate(&MutationConfig::noisy(), &mut rng);
            for (new, old) in child.values().iter().zip(parent.values()) {
                total += 1;
                if new == old {
                    unchanged += 1;
                }
            }
        }

        let ratio = unchanged as f64 / total as f64;
        assert!((0.2..0.4).contains(&ratio), "skip ratio was {ratio}");
    }

    #[test]
    fn test_zero_width_gene_never_moves() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(8);
        let schema = Schema::new("fixed", vec![GeneDefinition::new("pinned", 2.0, 2.0)])
            .unwrap()
            .shared();
        let parent = Creature::new(schema);

        for _ in 0..50 {
            let child = parent.mutate(&MutationConfig::noisy(), &mut rng);
            assert_eq!(child.get_value("pinned").unwrap(), 2.0);
        }
    }

    #[test]
    fn test_mutation_deterministic_with_seed() {
        let parent = Creature::new(tree_schema());
        let config = MutationConfig::noisy();

        let mut rng1 = Xoshiro256StarStar::seed_from_u64(42);
        let mut rng2 = Xoshiro256StarStar::seed_from_u64(42);

        let a = parent.mutate(&config, &mut rng1);
        let b = parent.clone().mutate(&config, &mut rng2);

        assert_eq!(a, b);
    }
}
