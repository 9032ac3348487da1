//! Automated lineage evolution
//!
//! Each generation breeds a brood of mutants from the newest creature and
//! keeps one of them, recording the full ancestor chain of every entry.

use biomorph_core::creature::{Creature, GeneMap, GeneRng, MutationConfig};
use serde::{Deserialize, Serialize};

/// One creature in a lineage
#[derive(Debug, Clone)]
pub struct LineageEntry {
    pub id: u64,
    /// Ancestor ids, oldest first
    pub parents: Vec<u64>,
    pub creature: Creature,
}

/// Serializable form of a lineage entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineageRecord {
    pub id: u64,
    pub parents: Vec<u64>,
    pub values: GeneMap,
}

/// A chain of creatures, each mutated from the one before
#[derive(Debug, Clone)]
pub struct Lineage {
    entries: Vec<LineageEntry>,
}

impl Lineage {
    /// Start a lineage from a root creature
    pub fn new(root: Creature) -> Self {
        Self {
            entries: vec![LineageEntry {
                id: 0,
                parents: Vec::new(),
                creature: root,
            }],
        }
    }

    pub fn entries(&self) -> &[LineageEntry] {
        &self.entries
    }

    /// Most recent entry
    pub fn latest(&self) -> &LineageEntry {
        // A lineage always holds at least its root
        &self.entries[self.entries.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: the root is never removed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Breed `brood_size` mutants of the latest creature and keep one at random
    ///
    /// A brood size of zero is treated as one.
    pub fn step<R: GeneRng + ?Sized>(
        &mut self,
        brood_size: usize,
        mutation: &MutationConfig,
        rng: &mut R,
    ) -> &LineageEntry {
        let brood_size = brood_size.max(1);
        let parent = self.latest();

        let mut brood: Vec<Creature> = (0..brood_size)
            .map(|_| parent.creature.mutate(mutation, rng))
            .collect();
        let chosen = rng.gen_index(brood.len()).unwrap_or(0);
        let creature = brood.swap_remove(chosen);

        let mut parents = parent.parents.clone();
        parents.push(parent.id);
        let id = parent.id + 1;

        log::debug!(
            "Generation {}: kept mutant {}/{} ({} ancestors)",
            id,
            chosen + 1,
            brood_size,
            parents.len()
        );

        self.entries.push(LineageEntry {
            id,
            parents,
            creature,
        });
        self.latest()
    }

    /// Run `generations` steps
    pub fn evolve<R: GeneRng + ?Sized>(
        &mut self,
        generations: usize,
        brood_size: usize,
        mutation: &MutationConfig,
        rng: &mut R,
    ) {
        for _ in 0..generations {
            self.step(brood_size, mutation, rng);
        }
        log::info!(
            "Evolved {} generations (brood size {})",
            generations,
            brood_size
        );
    }

    /// Trait mappings of every entry, ready for serialization
    pub fn records(&self) -> Vec<LineageRecord> {
        self.entries
            .iter()
            .map(|entry| LineageRecord {
                id: entry.id,
                parents: entry.parents.clone(),
                values: entry.creature.to_mapping(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biomorph_core::creature::tree_schema;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    #[test]
    fn test_new_lineage_has_root() {
        let lineage = Lineage::new(Creature::new(tree_schema()));

        assert_eq!(lineage.len(), 1);
        assert_eq!(lineage.latest().id, 0);
        assert!(lineage.latest().parents.is_empty());
    }

    #[test]
    fn test_evolve_tracks_ancestors() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(4);
        let mut lineage = Lineage::new(Creature::new(tree_schema()));

        lineage.evolve(5, 3, &MutationConfig::default(), &mut rng);

        assert_eq!(lineage.len(), 6);
        let latest = lineage.latest();
        assert_eq!(latest.id, 5);
        assert_eq!(latest.parents, vec![0, 1, 2, 3, 4]);
        for (i, entry) in lineage.entries().iter().enumerate() {
            assert_eq!(entry.id, i as u64);
            assert_eq!(entry.parents.len(), i);
        }
    }

    #[test]
    fn test_every_generation_differs_from_parent() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(6);
        let mut lineage = Lineage::new(Creature::new(tree_schema()));

        lineage.evolve(10, 4, &MutationConfig::steady(), &mut rng);

        for pair in lineage.entries().windows(2) {
            assert_ne!(pair[0].creature, pair[1].creature);
            assert!(pair[1].creature.is_within_ranges());
        }
    }

    #[test]
    fn test_zero_brood_still_advances() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(1);
        let mut lineage = Lineage::new(Creature::new(tree_schema()));

        lineage.step(0, &MutationConfig::default(), &mut rng);

        assert_eq!(lineage.len(), 2);
    }

    #[test]
    fn test_evolution_reproducible_from_seed() {
        let run = |seed| {
            let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
            let mut lineage = Lineage::new(Creature::new(tree_schema()));
            lineage.evolve(8, 5, &MutationConfig::noisy(), &mut rng);
            lineage.records()
        };

        assert_eq!(run(10), run(10));
        assert_ne!(run(10), run(11));
    }

    #[test]
    fn test_records_carry_mappings() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(2);
        let mut lineage = Lineage::new(Creature::new(tree_schema()));
        lineage.evolve(2, 2, &MutationConfig::default(), &mut rng);

        let records = lineage.records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].parents, vec![0, 1]);
        assert_eq!(records[2].values, lineage.latest().creature.to_mapping());
    }
}
