//! Configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `biomorph.ron` file (if exists)
//! 3. Environment variables prefixed with `BIOMORPH_`
//!
//! Example environment variable: `BIOMORPH_MUTATION__SPREAD=0.3`

use anyhow::{Context, Result};
use biomorph_core::RenderConfig;
use biomorph_core::creature::MutationConfig;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BiomorphConfig {
    #[serde(default)]
    pub mutation: MutationConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub evolution: EvolutionConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Lineage evolution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Number of generations to evolve
    pub generations: usize,
    /// Mutants produced per generation, one of which is kept
    pub brood_size: usize,
    /// RNG seed; a random seed is drawn (and logged) when unset
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            generations: 100,
            brood_size: 30,
            seed: None,
        }
    }
}

/// Export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving frames, GIF and lineage JSON
    pub directory: String,
    /// Write one PNG per lineage entry
    pub write_frames: bool,
    /// Write the animated lineage GIF
    pub write_gif: bool,
    /// GIF playback speed
    pub gif_fps: u16,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "biomorph_output".to_string(),
            write_frames: true,
            write_gif: true,
            gif_fps: 10,
        }
    }
}

impl BiomorphConfig {
    /// Load configuration from `biomorph.ron` and the environment
    pub fn load() -> Result<Self> {
        Self::load_from("biomorph")
    }

    /// Load configuration with layered priority:
    /// 1. Compiled defaults (lowest priority)
    /// 2. `<file_stem>.ron` (if exists)
    /// 3. Environment variables prefixed with `BIOMORPH_` (highest priority)
    pub fn load_from(file_stem: &str) -> Result<Self> {
        let defaults = Self::default();

        let builder = Config::builder()
            // Layer 1: Compiled defaults
            .set_default("mutation.skip_probability", defaults.mutation.skip_probability)?
            .set_default("mutation.spread", defaults.mutation.spread)?
            .set_default("render.canvas_size", i64::from(defaults.render.canvas_size))?
            .set_default("render.fan_out", "exact")?
            .set_default("evolution.generations", defaults.evolution.generations as i64)?
            .set_default("evolution.brood_size", defaults.evolution.brood_size as i64)?
            .set_default("output.directory", defaults.output.directory.as_str())?
            .set_default("output.write_frames", defaults.output.write_frames)?
            .set_default("output.write_gif", defaults.output.write_gif)?
            .set_default("output.gif_fps", i64::from(defaults.output.gif_fps))?
            // Layer 2: Config file (optional, won't error if missing)
            .add_source(
                File::with_name(file_stem)
                    .format(config::FileFormat::Ron)
                    .required(false),
            )
            // Layer 3: Environment variables (BIOMORPH_MUTATION__SPREAD, etc.)
            .add_source(
                Environment::with_prefix("BIOMORPH")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
