//! Render a framebuffer as a PNG that looks like the physical panel.
//!
//! Each LED becomes a round dot on a black background, so a frame can be
//! checked without hardware.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use log::info;
use png::{BitDepth, ColorType, Encoder};

use crate::Result;
use crate::matrix::Frame2d;

/// Pixel geometry of a preview image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PreviewGeometry {
    /// Side of the square cell each LED sits in.
    pub cell_size: u32,
    /// Radius of the LED dot.
    pub led_radius: u32,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
}

impl PreviewGeometry {
    /// Largest geometry for a `panel_width` × `panel_height` frame whose image
    /// fits in `target_max_dimension` on both axes.
    ///
    /// Cells never shrink below 2 pixels. When even that is too large, the
    /// 2-pixel geometry is returned and the image exceeds the target.
    ///
    /// # Panics
    ///
    /// If `target_max_dimension` is zero.
    #[must_use]
    pub fn fit(panel_width: u32, panel_height: u32, target_max_dimension: u32) -> Self {
        assert!(target_max_dimension > 0, "target_max_dimension must be positive");
        let mut cell_size = target_max_dimension;
        loop {
            let geometry = Self::with_cell_size(panel_width, panel_height, cell_size);
            if cell_size <= 2 || geometry.width.max(geometry.height) <= target_max_dimension {
                return geometry;
            }
            cell_size -= 1;
        }
    }

    fn with_cell_size(panel_width: u32, panel_height: u32, cell_size: u32) -> Self {
        let led_margin = (cell_size / 8).max(1);
        let led_radius = (cell_size.saturating_sub(led_margin * 2) / 2).max(1);
        Self {
            cell_size,
            led_radius,
            width: panel_width * cell_size + led_radius * 2,
            height: panel_height * cell_size + led_radius * 2,
        }
    }

    /// Image coordinates of the center of LED `(x, y)`.
    #[must_use]
    pub const fn led_center(&self, x: u32, y: u32) -> (u32, u32) {
        let center = (self.cell_size - 1) / 2;
        (
            self.led_radius + x * self.cell_size + center,
            self.led_radius + y * self.cell_size + center,
        )
    }
}

/// Render `frame` into a PNG at `output_path`, at most `target_max_dimension`
/// pixels on its longer side. Parent directories are created.
///
/// # Errors
///
/// Returns [`Error::Io`](crate::Error::Io) if the file cannot be written and
/// [`Error::PngEncode`](crate::Error::PngEncode) if encoding fails.
pub fn write_frame_png<const W: usize, const H: usize>(
    frame: &Frame2d<W, H>,
    output_path: impl AsRef<Path>,
    target_max_dimension: u32,
) -> Result<PreviewGeometry> {
    let output_path = output_path.as_ref();
    let geometry = PreviewGeometry::fit(W as u32, H as u32, target_max_dimension);
    let pixels = panel_pixels(frame, &geometry);

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(output_path)?;
    let mut encoder = Encoder::new(BufWriter::new(file), geometry.width, geometry.height);
    encoder.set_color(ColorType::Rgb);
    encoder.set_depth(BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&pixels)?;
    writer.finish()?;
    info!("wrote preview PNG to {}", output_path.display());
    Ok(geometry)
}

fn panel_pixels<const W: usize, const H: usize>(
    frame: &Frame2d<W, H>,
    geometry: &PreviewGeometry,
) -> Vec<u8> {
    let width = geometry.width as usize;
    let mut bytes = vec![0u8; width * geometry.height as usize * 3];
    let center = (geometry.cell_size as i64 - 1) / 2;
    let radius_sq = i64::from(geometry.led_radius) * i64::from(geometry.led_radius);

    for (row_index, row) in frame.iter().enumerate() {
        for (column_index, pixel) in row.iter().enumerate() {
            let (origin_x, origin_y) = geometry.led_center(column_index as u32, row_index as u32);
            let origin_x = origin_x as usize - center as usize;
            let origin_y = origin_y as usize - center as usize;
            for local_y in 0..geometry.cell_size as usize {
                let delta_y = local_y as i64 - center;
                for local_x in 0..geometry.cell_size as usize {
                    let delta_x = local_x as i64 - center;
                    if delta_x * delta_x + delta_y * delta_y > radius_sq {
                        continue;
                    }
                    let pixel_index = ((origin_y + local_y) * width + origin_x + local_x) * 3;
                    if let Some(rgb) = bytes.get_mut(pixel_index..pixel_index + 3) {
                        rgb.copy_from_slice(&[pixel.r, pixel.g, pixel.b]);
                    }
                }
            }
        }
    }

    bytes
}
