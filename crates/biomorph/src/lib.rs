//! # Biomorph
//!
//! Evolve branching-tree creatures by repeated mutation and export the
//! lineage as images.

pub mod config;
pub mod export;
pub mod lineage;

// Re-export core modules for convenience
pub use biomorph_core::creature;
pub use biomorph_core::{raster, render, tree};

pub use config::BiomorphConfig;
pub use lineage::{Lineage, LineageEntry, LineageRecord};
