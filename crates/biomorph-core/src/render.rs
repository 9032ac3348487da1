//! Creature to pixel buffer rendering

use biomorph_creature::{CANVAS_SIZE, Creature, GeneError};
use glam::DVec2;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use serde::{Deserialize, Serialize};

use crate::raster::{INK, PixelBuffer, draw_segment};
use crate::tree::{FanOut, LineSegment, TreeParams, visit_noisy_tree, visit_tree};

/// Settings for tree rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Side length of the square canvas
    pub canvas_size: u32,
    /// Children per branch point
    pub fan_out: FanOut,
    /// Seed for branch noise; `None` renders without noise
    pub noise_seed: Option<u64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            canvas_size: CANVAS_SIZE,
            fan_out: FanOut::Exact,
            noise_seed: None,
        }
    }
}

/// Renders creatures of the tree species
#[derive(Debug, Clone, Default)]
pub struct TreeRenderer {
    pub config: RenderConfig,
}

impl TreeRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Root of the tree: horizontally centered, 90% down the canvas
    pub fn origin(&self) -> DVec2 {
        let size = f64::from(self.config.canvas_size);
        DVec2::new(size / 2.0, size * 9.0 / 10.0)
    }

    /// Draw a creature onto a fresh canvas
    pub fn render(&self, creature: &Creature) -> Result<PixelBuffer, GeneError> {
        let params = TreeParams::from_creature(creature)?;
        let mut buffer = PixelBuffer::new(self.config.canvas_size as usize);
        let mut segments = 0usize;

        let mut draw = |segment: LineSegment| {
            draw_segment(&mut buffer, &segment, INK);
            segments += 1;
        };

        match self.config.noise_seed {
            // A fresh generator per call keeps each creature's image stable
            Some(seed) => {
                let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
                visit_noisy_tree(&params, self.origin(), self.config.fan_out, &mut rng, &mut draw);
            }
            None => visit_tree(&params, self.origin(), self.config.fan_out, &mut draw),
        }

        log::trace!(
            "Rendered tree: {} segments, {} gens x {} branches",
            segments,
            params.num_gens,
            params.num_branches
        );

        Ok(buffer)
    }
}

/// Draw a creature with the default canvas and no noise
pub fn draw_tree(creature: &Creature) -> Result<PixelBuffer, GeneError> {
    TreeRenderer::default().render(creature)
}
