//! Gene schemas (species)
//!
//! A schema is the ordered set of gene definitions shared by every creature
//! of a species. Schemas are validated once at construction and never change
//! afterwards, so creatures share them through an `Arc`.

use std::sync::Arc;

use ahash::HashMap;
use serde::{Deserialize, Serialize};

use crate::error::{GeneError, Result};

/// Side length of the square canvas trees are drawn on, in pixels
pub const CANVAS_SIZE: u32 = 150;

/// Gene names of the "tree" species
pub mod tree_genes {
    pub const BRANCH_LENGTH: &str = "branch_length";
    pub const NUM_GENS: &str = "num_gens";
    pub const BRANCH_ANGLE: &str = "branch_angle";
    pub const BRANCH_INCREASE: &str = "branch_increase";
    pub const ANGLE_INCREASE: &str = "angle_increase";
    pub const NUM_BRANCHES: &str = "num_branches";
    pub const ANGLE_NOISE: &str = "angle_noise";
    pub const LENGTH_NOISE: &str = "length_noise";
}

/// Inclusive numeric range a gene value may take
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneRange {
    pub min: f64,
    pub max: f64,
}

impl GeneRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Center of the range, used as the default gene value
    pub fn midpoint(&self) -> f64 {
        0.5 * (self.min + self.max)
    }

    /// Width of the range
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

/// A named, range-bounded trait definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneDefinition {
    pub name: String,
    pub range: GeneRange,
}

impl GeneDefinition {
    pub fn new(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            range: GeneRange::new(min, max),
        }
    }
}

/// Ordered, validated set of gene definitions for one species
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    genes: Vec<GeneDefinition>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Build a schema, rejecting duplicate names and invalid ranges
    pub fn new(name: impl Into<String>, genes: Vec<GeneDefinition>) -> Result<Self> {
        let name = name.into();
        let mut index = HashMap::default();

        for (i, gene) in genes.iter().enumerate() {
            if !gene.range.is_valid() {
                return Err(GeneError::InvalidRange {
                    name: gene.name.clone(),
                    min: gene.range.min,
                    max: gene.range.max,
                });
            }
            if index.insert(gene.name.clone(), i).is_some() {
                return Err(GeneError::DuplicateGene {
                    name: gene.name.clone(),
                });
            }
        }

        log::debug!("Built schema '{}' with {} genes", name, genes.len());

        Ok(Self { name, genes, index })
    }

    /// Species name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gene definitions in schema order
    pub fn genes(&self) -> &[GeneDefinition] {
        &self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Position of a gene within the schema
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| GeneError::NotFound {
                name: name.to_string(),
            })
    }

    pub fn definition(&self, name: &str) -> Result<&GeneDefinition> {
        self.index_of(name).map(|i| &self.genes[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Wrap in an `Arc` for sharing between creatures
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

/// Gene definitions of the "tree" species
///
/// Branch length spans 10%-40% of the canvas. The per-level multipliers use
/// the tighter [0.6, 1.5] variant so trees stay on the canvas more often.
pub fn tree_gene_definitions() -> Vec<GeneDefinition> {
    use tree_genes::*;

    let canvas = f64::from(CANVAS_SIZE);
    vec![
        GeneDefinition::new(BRANCH_LENGTH, canvas / 10.0, canvas * 2.0 / 5.0),
        GeneDefinition::new(NUM_GENS, 2.0, 7.0),
        GeneDefinition::new(BRANCH_ANGLE, 0.1, 5.0),
        GeneDefinition::new(BRANCH_INCREASE, 0.6, 1.5),
        GeneDefinition::new(ANGLE_INCREASE, 0.6, 1.5),
        GeneDefinition::new(NUM_BRANCHES, 1.0, 4.0),
        GeneDefinition::new(ANGLE_NOISE, -0.1, 0.1),
        GeneDefinition::new(LENGTH_NOISE, -0.1, 0.1),
    ]
}

/// The "tree" species schema, ready for sharing
pub fn tree_schema() -> Arc<Schema> {
    Schema::new("tree", tree_gene_definitions())
        .expect("Built-in tree genes failed validation")
        .shared()
}
