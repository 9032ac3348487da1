//! Creature instances: one value per gene of a shared schema

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::Result;
use crate::schema::{GeneDefinition, Schema};

/// Name-keyed trait values, the boundary format for storage and transport
pub type GeneMap = BTreeMap<String, f64>;

/// A gene definition paired with one creature's value for it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneValue<'a> {
    pub definition: &'a GeneDefinition,
    pub value: f64,
}

impl GeneValue<'_> {
    /// Whether the value lies inside the definition's range
    pub fn in_range(&self) -> bool {
        self.definition.range.contains(self.value)
    }
}

/// One concrete assignment of values to a schema's genes
#[derive(Debug, Clone)]
pub struct Creature {
    schema: Arc<Schema>,
    /// Values in schema order
    values: Vec<f64>,
}

impl Creature {
    /// Create a creature with every gene at the midpoint of its range
    pub fn new(schema: Arc<Schema>) -> Self {
        let values = schema.genes().iter().map(|g| g.range.midpoint()).collect();
        Self { schema, values }
    }

    /// Create a midpoint creature, then import the given values
    pub fn from_mapping(schema: Arc<Schema>, mapping: &GeneMap) -> Result<Self> {
        let mut creature = Self::new(schema);
        creature.set_from_mapping(mapping)?;
        Ok(creature)
    }

    /// Build from values already in schema order (used by mutation)
    pub(crate) fn from_values(schema: Arc<Schema>, values: Vec<f64>) -> Self {
        debug_assert_eq!(schema.len(), values.len());
        Self { schema, values }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Raw values in schema order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Definitions paired with values, in schema order
    pub fn gene_values(&self) -> impl Iterator<Item = GeneValue<'_>> + '_ {
        self.schema
            .genes()
            .iter()
            .zip(&self.values)
            .map(|(definition, &value)| GeneValue { definition, value })
    }

    pub fn gene_value(&self, name: &str) -> Result<GeneValue<'_>> {
        let i = self.schema.index_of(name)?;
        Ok(GeneValue {
            definition: &self.schema.genes()[i],
            value: self.values[i],
        })
    }

    /// Value of the named gene
    pub fn get_value(&self, name: &str) -> Result<f64> {
        let i = self.schema.index_of(name)?;
        Ok(self.values[i])
    }

    /// Export every gene as a name-keyed mapping
    pub fn to_mapping(&self) -> GeneMap {
        self.gene_values()
            .map(|gv| (gv.definition.name.clone(), gv.value))
            .collect()
    }

    /// Overwrite the genes named in `mapping`
    ///
    /// Values are stored as given, without clamping, so a previously stored
    /// state is restored exactly. Every key is resolved before anything is
    /// written: an unknown name fails with `NotFound` and leaves the creature
    /// unchanged.
    pub fn set_from_mapping(&mut self, mapping: &GeneMap) -> Result<()> {
        let updates = mapping
            .iter()
            .map(|(name, &value)| self.schema.index_of(name).map(|i| (i, value)))
            .collect::<Result<Vec<_>>>()?;

        for (i, value) in updates {
            self.values[i] = value;
        }
        Ok(())
    }

    /// Clamp every value into its gene's range
    pub fn clamp_to_ranges(&mut self) {
        for (value, gene) in self.values.iter_mut().zip(self.schema.genes()) {
            *value = gene.range.clamp(*value);
        }
    }

    /// Whether every value lies inside its gene's range
    pub fn is_within_ranges(&self) -> bool {
        self.gene_values().all(|gv| gv.in_range())
    }

    /// Whether both creatures share the same schema instance
    pub fn same_species(&self, other: &Creature) -> bool {
        Arc::ptr_eq(&self.schema, &other.schema)
    }
}

impl PartialEq for Creature {
    fn eq(&self, other: &Self) -> bool {
        self.schema.genes() == other.schema.genes() && self.values == other.values
    }
}
