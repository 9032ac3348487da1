//! Monochrome pixel buffer and line stepping
//!
//! Lines are drawn with a single-pass floating-point stepper: one unit step
//! along the major axis per iteration, a fractional step along the minor
//! axis. The end point is exclusive.

use std::ops::Range;

use glam::DVec2;

use crate::tree::LineSegment;

/// Luma value of the background
pub const BACKGROUND: u8 = 255;
/// Luma value of strokes
pub const INK: u8 = 0;

/// Square 8-bit grayscale canvas, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    size: usize,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Create a buffer filled with the background color
    pub fn new(size: usize) -> Self {
        Self::filled(size, BACKGROUND)
    }

    pub fn filled(size: usize, luma: u8) -> Self {
        Self {
            size,
            pixels: vec![luma; size * size],
        }
    }

    /// Side length in pixels
    pub fn size(&self) -> usize {
        self.size
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        let size = self.size as i64;
        if x >= 0 && x < size && y >= 0 && y < size {
            Some(y as usize * self.size + x as usize)
        } else {
            None
        }
    }

    /// Pixel at (x, y), or None outside the canvas
    pub fn get(&self, x: i64, y: i64) -> Option<u8> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Set a pixel; writes outside the canvas are dropped
    pub fn set(&mut self, x: i64, y: i64, luma: u8) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = luma;
        }
    }

    pub fn fill(&mut self, luma: u8) {
        self.pixels.fill(luma);
    }

    /// Number of pixels that differ from the background
    pub fn ink_count(&self) -> usize {
        self.pixels.iter().filter(|&&p| p != BACKGROUND).count()
    }

    /// Row-major luma bytes, one per pixel
    pub fn as_raw(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
    }
}

/// Draw `segment` into `buffer`
pub fn draw_segment(buffer: &mut PixelBuffer, segment: &LineSegment, luma: u8) {
    draw_line(buffer, segment.start, segment.end, luma);
}

/// Step from `start` toward `end`, writing one pixel per step
///
/// Runs `round(distance)` steps. Each step writes the pixel under the
/// current position, then advances one unit along the major axis. Steps
/// that cannot reach the canvas are skipped, so very long lines cost no more
/// than their visible part.
pub fn draw_line(buffer: &mut PixelBuffer, start: DVec2, end: DVec2, luma: u8) {
    if !start.is_finite() || !end.is_finite() {
        return;
    }

    let delta = end - start;
    let steps = delta.length().round() as usize;
    if steps == 0 {
        return;
    }

    let dir_y = if delta.y < 0.0 { -1.0 } else { 1.0 };
    let dir_x = if delta.x < 0.0 { -1.0 } else { 1.0 };

    let (step_x, step_y) = if delta.x == 0.0 {
        // Vertical: no slope to divide by
        (0.0, dir_y)
    } else {
        let slope = (delta.y / delta.x).abs();
        if slope > 1.0 {
            (dir_x / slope, dir_y)
        } else {
            (dir_x, dir_y * slope)
        }
    };

    let visible = visible_steps(buffer.size() as f64, start, DVec2::new(step_x, step_y), steps);
    let first = visible.start as f64;
    let mut x = start.x + first * step_x;
    let mut y = start.y + first * step_y;
    for _ in visible {
        buffer.set(x.floor() as i64, y.floor() as i64, luma);
        x += step_x;
        y += step_y;
    }
}

/// Step indices whose position can fall inside a `size` x `size` canvas
///
/// Errs by a step on each side; `PixelBuffer::set` drops the extras.
fn visible_steps(size: f64, start: DVec2, step: DVec2, steps: usize) -> Range<usize> {
    let mut lo = 0.0_f64;
    let mut hi = steps as f64;

    for (p, s) in [(start.x, step.x), (start.y, step.y)] {
        if s == 0.0 {
            if p < 0.0 || p >= size {
                return 0..0;
            }
        } else {
            let enter = -p / s;
            let leave = (size - p) / s;
            lo = lo.max(enter.min(leave).floor());
            hi = hi.min(enter.max(leave).ceil() + 1.0);
        }
    }

    if lo < hi { lo as usize..hi as usize } else { 0..0 }
}
