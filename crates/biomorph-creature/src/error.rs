//! Error types for gene schemas and creatures

use thiserror::Error;

/// Errors raised by schema construction and gene lookup
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeneError {
    /// No gene with this name exists in the schema
    #[error("Gene not found: {name}")]
    NotFound { name: String },

    /// Two definitions in one schema share a name
    #[error("Duplicate gene in schema: {name}")]
    DuplicateGene { name: String },

    /// A range is reversed or has a non-finite bound
    #[error("Invalid range for gene {name}: [{min}, {max}]")]
    InvalidRange { name: String, min: f64, max: f64 },
}

/// Result type for gene operations
pub type Result<T> = std::result::Result<T, GeneError>;
