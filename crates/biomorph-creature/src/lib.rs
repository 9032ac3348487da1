//! Genetic trait model for Biomorph creatures
//!
//! This crate implements:
//! - Gene schemas (species) with validated, named numeric ranges
//! - Creatures holding one value per gene of a shared schema
//! - Range-proportional mutation with an injectable random source

pub mod creature;
pub mod error;
pub mod mutation;
pub mod rng;
pub mod schema;

// Re-export main types for convenience
pub use creature::{Creature, GeneMap, GeneValue};
pub use error::GeneError;
pub use mutation::{MutationConfig, mutate};
pub use rng::GeneRng;
pub use schema::{
    CANVAS_SIZE, GeneDefinition, GeneRange, Schema, tree_gene_definitions, tree_genes, tree_schema,
};
