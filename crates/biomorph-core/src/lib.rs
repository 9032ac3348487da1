//! # Biomorph core
//!
//! Turns creatures into pictures:
//! - `tree`: recursive expansion of tree genes into line segments
//! - `raster`: monochrome pixel buffer and the line stepper
//! - `render`: canvas setup and the creature to buffer pipeline

pub mod raster;
pub mod render;
pub mod tree;

// Re-export the trait model so callers need a single dependency
pub use biomorph_creature as creature;

pub use raster::{BACKGROUND, INK, PixelBuffer, draw_line};
pub use render::{RenderConfig, TreeRenderer, draw_tree};
pub use tree::{FanOut, LineSegment, TreeParams, generate_tree};
