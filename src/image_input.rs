//! Turn a screenshot PNG into a matrix frame.
//!
//! Any PNG color type is normalized to 8-bit RGB (alpha is dropped), then
//! downsampled to the matrix size with nearest-neighbour sampling.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::{debug, warn};
use png::{BitDepth, ColorType, Decoder, Transformations};
use smart_leds::RGB8;

use crate::matrix::{HEIGHT, WIDTH, WledMatrix};
use crate::transport::Transport;
use crate::{Error, Result};

/// Owned 8-bit RGB bitmap, stored row by row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbImage {
    width: usize,
    height: usize,
    pixels: Vec<RGB8>,
}

impl RgbImage {
    /// Wrap `pixels` (row-major, `width * height` long).
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyImage`] if either dimension is zero.
    ///
    /// # Panics
    ///
    /// If `pixels.len() != width * height`.
    pub fn new(width: usize, height: usize, pixels: Vec<RGB8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::EmptyImage);
        }
        assert_eq!(pixels.len(), width * height, "pixel count must be width * height");
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Rows.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Color at `(x, y)`, or `None` off the image.
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> Option<RGB8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }

    /// Nearest-neighbour resample to `width` × `height`.
    ///
    /// Each output pixel takes the source pixel under its center.
    ///
    /// # Panics
    ///
    /// If `width` or `height` is zero.
    #[must_use]
    pub fn resize_nearest(&self, width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "target size must be positive");
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            let source_y = nearest_source(y, height, self.height);
            for x in 0..width {
                let source_x = nearest_source(x, width, self.width);
                pixels.push(self.pixels[source_y * self.width + source_x]);
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }
}

// floor((target + 0.5) * source_len / target_len), in integers.
fn nearest_source(target: usize, target_len: usize, source_len: usize) -> usize {
    ((2 * target + 1) * source_len / (2 * target_len)).min(source_len - 1)
}

/// Load a PNG file as 8-bit RGB.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened, plus everything
/// [`decode_png`] returns.
pub fn load_png(path: impl AsRef<Path>) -> Result<RgbImage> {
    let path = path.as_ref();
    let image = decode_png(BufReader::new(File::open(path)?))?;
    debug!(
        "loaded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image)
}

/// Decode a PNG stream as 8-bit RGB.
///
/// Palette and low-bit images are expanded, 16-bit channels are truncated to
/// 8 bits, gray is copied into all three channels and alpha is discarded.
///
/// # Errors
///
/// Returns [`Error::PngDecode`] for malformed data, [`Error::UnsupportedImage`]
/// if the decoded format is not 8-bit, and [`Error::EmptyImage`] for a
/// zero-sized image.
pub fn decode_png<R: Read>(reader: R) -> Result<RgbImage> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
    let mut png_reader = decoder.read_info()?;
    let mut buffer = vec![0; png_reader.output_buffer_size()];
    let info = png_reader.next_frame(&mut buffer)?;
    if info.bit_depth != BitDepth::Eight {
        return Err(Error::UnsupportedImage {
            color_type: info.color_type,
            bit_depth: info.bit_depth,
        });
    }

    let width = info.width as usize;
    let height = info.height as usize;
    let bytes_per_pixel = match info.color_type {
        ColorType::Grayscale => 1,
        ColorType::GrayscaleAlpha => 2,
        ColorType::Rgb => 3,
        ColorType::Rgba => 4,
        ColorType::Indexed => {
            return Err(Error::UnsupportedImage {
                color_type: info.color_type,
                bit_depth: info.bit_depth,
            });
        }
    };

    let mut pixels = Vec::with_capacity(width * height);
    for row in buffer.chunks(info.line_size).take(height) {
        for sample in row.chunks_exact(bytes_per_pixel).take(width) {
            pixels.push(match *sample {
                [gray] | [gray, _] => RGB8::new(gray, gray, gray),
                [r, g, b] | [r, g, b, _] => RGB8::new(r, g, b),
                _ => unreachable!("chunks_exact yields {bytes_per_pixel}-byte samples"),
            });
        }
    }
    RgbImage::new(width, height, pixels)
}

/// Copy `image` into the framebuffer, resizing it to 64×16 first if needed.
///
/// Nothing is sent; call [`WledMatrix::show`] afterwards.
pub fn draw_image<T: Transport>(matrix: &mut WledMatrix<T>, image: &RgbImage) {
    let resized;
    let image = if image.width() == WIDTH && image.height() == HEIGHT {
        image
    } else {
        resized = image.resize_nearest(WIDTH, HEIGHT);
        &resized
    };
    for (y, row) in (0_i32..).zip(image.pixels.chunks(WIDTH)) {
        for (x, color) in (0_i32..).zip(row) {
            matrix.set_pixel(x, y, color.r, color.g, color.b);
        }
    }
}

/// Full render cycle: switch off, redraw from `image`, then show.
///
/// Returns the result of [`WledMatrix::show`].
pub fn show_image<T: Transport>(matrix: &mut WledMatrix<T>, image: &RgbImage) -> bool {
    if !matrix.clear(true) {
        warn!("continuing without power-off");
    }
    draw_image(matrix, image);
    matrix.show()
}
