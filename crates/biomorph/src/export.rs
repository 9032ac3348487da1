//! Lineage export: PNG frames, animated GIF and JSON records
//!
//! Encoding is delegated to the `image` and `gif` crates.

use std::borrow::Cow;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use biomorph_core::{PixelBuffer, TreeRenderer};
use gif::{Encoder, Frame, Repeat};

use crate::config::OutputConfig;
use crate::lineage::Lineage;

/// Save a pixel buffer as a grayscale PNG
pub fn save_png(buffer: &PixelBuffer, path: impl AsRef<Path>) -> Result<()> {
    use image::{GrayImage, ImageBuffer};

    let size = buffer.size() as u32;
    let img: GrayImage = ImageBuffer::from_raw(size, size, buffer.as_raw().to_vec())
        .ok_or_else(|| anyhow::anyhow!("Failed to create image buffer"))?;

    img.save(path.as_ref())
        .with_context(|| format!("Failed to write PNG {}", path.as_ref().display()))?;
    Ok(())
}

/// 256-entry grayscale color table, so luma bytes index it directly
fn gray_palette() -> Vec<u8> {
    (0..=255u8).flat_map(|level| [level, level, level]).collect()
}

/// Collects rendered creatures and encodes them as an animated GIF
pub struct LineageGif {
    /// Luma frames, one byte per pixel
    frames: Vec<Vec<u8>>,
    size: u16,
    /// Centiseconds each creature stays on screen
    frame_delay: u16,
}

impl LineageGif {
    /// Create an empty animation of `size` x `size` frames
    pub fn new(size: u16, fps: u16) -> Self {
        let frame_delay = if fps > 0 { 100 / fps } else { 10 };

        Self {
            frames: Vec::new(),
            size,
            frame_delay,
        }
    }

    /// Append a frame; buffers of a different size are rejected
    pub fn capture_frame(&mut self, buffer: PixelBuffer) -> Result<()> {
        if buffer.size() != usize::from(self.size) {
            anyhow::bail!(
                "Frame size {} does not match animation size {}",
                buffer.size(),
                self.size
            );
        }
        self.frames.push(buffer.into_raw());
        Ok(())
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Encode the lineage as a looping animation over a shared gray palette
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if self.frames.is_empty() {
            anyhow::bail!("Lineage GIF has no frames");
        }

        let file = File::create(path)
            .with_context(|| format!("Failed to create GIF {}", path.display()))?;
        let mut encoder = Encoder::new(BufWriter::new(file), self.size, self.size, &gray_palette())
            .context("Failed to start GIF stream")?;
        encoder
            .set_repeat(Repeat::Infinite)
            .context("Failed to mark GIF as looping")?;

        for (generation, luma) in self.frames.iter().enumerate() {
            let frame = Frame {
                width: self.size,
                height: self.size,
                delay: self.frame_delay,
                buffer: Cow::Borrowed(luma.as_slice()),
                ..Frame::default()
            };
            encoder
                .write_frame(&frame)
                .with_context(|| format!("Failed to encode generation {}", generation))?;
        }

        Ok(())
    }
}

/// Write the lineage records as pretty-printed JSON
pub fn write_lineage_json(lineage: &Lineage, path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(path.as_ref()).context("Failed to create lineage JSON file")?;
    serde_json::to_writer_pretty(BufWriter::new(file), &lineage.records())
        .context("Failed to write lineage JSON")?;
    Ok(())
}

/// Files produced by an export
#[derive(Debug, Clone, Default)]
pub struct ExportSummary {
    pub frames: Vec<PathBuf>,
    pub gif: Option<PathBuf>,
    pub json: PathBuf,
}

/// Render every lineage entry and write the configured outputs
pub fn export_lineage(
    lineage: &Lineage,
    renderer: &TreeRenderer,
    output: &OutputConfig,
) -> Result<ExportSummary> {
    let dir = PathBuf::from(&output.directory);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let size = u16::try_from(renderer.config.canvas_size)
        .context("Canvas too large for GIF export")?;
    let mut gif = LineageGif::new(size, output.gif_fps);
    let mut summary = ExportSummary {
        json: dir.join("lineage.json"),
        ..Default::default()
    };

    for entry in lineage.entries() {
        let buffer = renderer
            .render(&entry.creature)
            .with_context(|| format!("Failed to render creature {}", entry.id))?;

        if output.write_frames {
            let path = dir.join(format!("creature_{:03}.png", entry.id));
            save_png(&buffer, &path)?;
            summary.frames.push(path);
        }
        if output.write_gif {
            gif.capture_frame(buffer)?;
        }
    }

    if output.write_gif {
        let path = dir.join("lineage.gif");
        gif.save(&path)?;
        log::info!("Wrote {} frame GIF to {}", gif.frame_count(), path.display());
        summary.gif = Some(path);
    }

    write_lineage_json(lineage, &summary.json)?;
    log::info!(
        "Exported {} creatures to {}",
        lineage.len(),
        dir.display()
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use biomorph_core::INK;

    #[test]
    fn test_lineage_gif_creation() {
        let gif = LineageGif::new(128, 10);
        assert_eq!(gif.size, 128);
        assert_eq!(gif.frame_delay, 10); // 100/10 = 10 centiseconds
        assert_eq!(gif.frame_count(), 0);
    }

    #[test]
    fn test_zero_fps_falls_back() {
        let gif = LineageGif::new(16, 0);
        assert_eq!(gif.frame_delay, 10);
    }

    #[test]
    fn test_frame_capture_checks_size() {
        let mut gif = LineageGif::new(16, 10);

        gif.capture_frame(PixelBuffer::new(16)).unwrap();
        assert_eq!(gif.frame_count(), 1);

        assert!(gif.capture_frame(PixelBuffer::new(8)).is_err());
        assert_eq!(gif.frame_count(), 1);
    }

    #[test]
    fn test_empty_gif_refuses_to_save() {
        let dir = tempfile::tempdir().unwrap();
        let gif = LineageGif::new(16, 10);
        assert!(gif.save(dir.path().join("empty.gif")).is_err());
    }

    #[test]
    fn test_gif_keeps_gray_levels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.gif");

        let mut buffer = PixelBuffer::new(8);
        buffer.set(3, 2, INK);
        buffer.set(4, 2, 128);
        let mut gif = LineageGif::new(8, 10);
        gif.capture_frame(buffer.clone()).unwrap();
        gif.save(&path).unwrap();

        let mut options = gif::DecodeOptions::new();
        options.set_color_output(gif::ColorOutput::Indexed);
        let mut decoder = options.read_info(File::open(&path).unwrap()).unwrap();
        let frame = decoder.read_next_frame().unwrap().unwrap();
        assert_eq!(frame.delay, 10);
        assert_eq!(&frame.buffer[..], buffer.as_raw());
    }

    #[test]
    fn test_png_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");

        let mut buffer = PixelBuffer::new(4);
        buffer.set(2, 1, INK);
        save_png(&buffer, &path).unwrap();

        let decoded = image::open(&path).unwrap().to_luma8();
        assert_eq!(decoded.dimensions(), (4, 4));
        assert_eq!(decoded.get_pixel(2, 1).0, [INK]);
        assert_eq!(decoded.get_pixel(0, 0).0, [255]);
    }
}
