use std::path::PathBuf;

use anyhow::{Context, Result};
use biomorph::creature::{Creature, GeneMap, MutationConfig, tree_schema};
use biomorph::export::export_lineage;
use biomorph::render::TreeRenderer;
use biomorph::tree::FanOut;
use biomorph::{BiomorphConfig, Lineage};
use clap::Parser;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of generations to evolve
    #[arg(long)]
    generations: Option<usize>,

    /// Mutants bred per generation (one is kept)
    #[arg(long)]
    brood_size: Option<usize>,

    /// RNG seed for reproducible lineages
    #[arg(long)]
    seed: Option<u64>,

    /// Output directory for frames, GIF and lineage JSON
    #[arg(long)]
    output: Option<String>,

    /// Start from a creature stored as a JSON name -> value mapping
    #[arg(long)]
    from: Option<PathBuf>,

    /// Mutate fewer genes per generation, with larger steps
    #[arg(long)]
    noisy_mutation: bool,

    /// Render with exponential branch noise seeded by this value
    #[arg(long)]
    noise_seed: Option<u64>,

    /// Spawn num_branches + 1 children per branch point
    #[arg(long)]
    plus_one_branches: bool,

    /// Skip writing per-creature PNG frames
    #[arg(long)]
    no_frames: bool,

    /// Skip writing the lineage GIF
    #[arg(long)]
    no_gif: bool,

    /// Print the tree species genes and exit
    #[arg(long)]
    print_schema: bool,
}

impl Args {
    /// Command-line flags override loaded configuration
    fn apply(&self, config: &mut BiomorphConfig) {
        if let Some(generations) = self.generations {
            config.evolution.generations = generations;
        }
        if let Some(brood_size) = self.brood_size {
            config.evolution.brood_size = brood_size;
        }
        if self.seed.is_some() {
            config.evolution.seed = self.seed;
        }
        if let Some(output) = &self.output {
            config.output.directory = output.clone();
        }
        if self.noisy_mutation {
            config.mutation = MutationConfig::noisy();
        }
        if self.noise_seed.is_some() {
            config.render.noise_seed = self.noise_seed;
        }
        if self.plus_one_branches {
            config.render.fan_out = FanOut::PlusOne;
        }
        if self.no_frames {
            config.output.write_frames = false;
        }
        if self.no_gif {
            config.output.write_gif = false;
        }
    }
}

fn print_schema() {
    let schema = tree_schema();
    println!("Species: {}", schema.name());
    for gene in schema.genes() {
        println!(
            "  {:<16} [{:>6.2}, {:>6.2}]  default {:.3}",
            gene.name,
            gene.range.min,
            gene.range.max,
            gene.range.midpoint()
        );
    }
}

fn load_root(path: Option<&PathBuf>) -> Result<Creature> {
    let schema = tree_schema();
    let Some(path) = path else {
        return Ok(Creature::new(schema));
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read creature file {}", path.display()))?;
    let mapping: GeneMap = serde_json::from_str(&text).context("Failed to parse creature JSON")?;
    let creature = Creature::from_mapping(schema, &mapping)?;

    if !creature.is_within_ranges() {
        log::warn!("Restored creature has genes outside their ranges; mutation will clamp them");
    }
    log::info!("Loaded root creature from {}", path.display());
    Ok(creature)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.print_schema {
        print_schema();
        return Ok(());
    }

    let mut config = BiomorphConfig::load()?;
    args.apply(&mut config);

    let seed = config.evolution.seed.unwrap_or_else(rand::random);
    log::info!("Evolving with seed {} (pass --seed {} to repeat)", seed, seed);
    let mut rng = Xoshiro256StarStar::seed_from_u64(seed);

    let mut lineage = Lineage::new(load_root(args.from.as_ref())?);
    lineage.evolve(
        config.evolution.generations,
        config.evolution.brood_size,
        &config.mutation,
        &mut rng,
    );

    let renderer = TreeRenderer::new(config.render);
    let summary = export_lineage(&lineage, &renderer, &config.output)?;

    log::info!(
        "Done: {} frames, gif: {}, lineage: {}",
        summary.frames.len(),
        summary
            .gif
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "skipped".to_string()),
        summary.json.display()
    );

    Ok(())
}
