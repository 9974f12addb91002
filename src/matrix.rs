//! A driver for a 64×16 WLED matrix built from four 8×32 serpentine panels.
//!
//! [`WledMatrix`] owns a logical framebuffer addressed by `(x, y)`. Write pixels
//! with [`WledMatrix::set_pixel`] (or draw on it with
//! [`embedded-graphics`](https://docs.rs/embedded-graphics)), then call
//! [`WledMatrix::show`] to push every lit pixel to the controller in one request.
//! The panel wiring lives in [`layout`].
//!
//! # Example: Mark the corners
//!
//! ```rust,no_run
//! use wled_matrix::{WledConfig, matrix::WledMatrix};
//!
//! let mut matrix = WledMatrix::new(&WledConfig::new("10.0.0.221"));
//! matrix.clear(true);
//! matrix.set_pixel(0, 0, 255, 0, 0); // red, top-left
//! matrix.set_pixel(63, 0, 0, 255, 0); // green, top-right
//! matrix.set_pixel(0, 15, 0, 0, 255); // blue, bottom-left
//! matrix.set_pixel(63, 15, 255, 255, 0); // yellow, bottom-right
//! if !matrix.show() {
//!     eprintln!("controller did not accept the frame");
//! }
//! ```

pub mod layout;
pub mod payload;

pub use embedded_graphics::geometry::{Point, Size};
pub use layout::{HEIGHT, LED_COUNT, WIDTH};

use core::{
    convert::Infallible,
    ops::{Deref, Index, IndexMut},
};

use embedded_graphics::{draw_target::DrawTarget, pixelcolor::Rgb888, prelude::*};
use itertools::iproduct;
use log::{debug, warn};
use smart_leds::RGB8;

use crate::transport::{HttpTransport, Transport};
use crate::{Error, Result, WledConfig};
use payload::StateMessage;

/// Background color; black pixels are never sent.
pub const BLACK: RGB8 = RGB8::new(0, 0, 0);

/// Convert Rgb888 (embedded-graphics) to RGB8 (smart-leds).
#[must_use]
pub fn rgb888_to_rgb8(color: Rgb888) -> RGB8 {
    RGB8::new(color.r(), color.g(), color.b())
}

/// Fixed-size 2D framebuffer, stored row by row.
///
/// Coordinates use a screen-style convention: `(0, 0)` is the top-left corner,
/// `x` increases to the right, and `y` increases downward.
///
/// ```rust
/// use embedded_graphics::{pixelcolor::Rgb888, prelude::*, primitives::{PrimitiveStyle, Rectangle}};
/// use wled_matrix::matrix::Frame2d;
///
/// type Frame = Frame2d<64, 16>;
/// let mut frame = Frame::new();
/// Rectangle::new(Frame::TOP_LEFT, Frame::SIZE)
///     .into_styled(PrimitiveStyle::with_stroke(Rgb888::RED, 1))
///     .draw(&mut frame)
///     .expect("drawing into a frame cannot fail");
/// assert_eq!(frame.lit_pixels().count(), 2 * 64 + 2 * 14);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame2d<const W: usize, const H: usize>(pub [[RGB8; W]; H]);

impl<const W: usize, const H: usize> Frame2d<W, H> {
    /// Frame2d width in pixels (columns).
    pub const WIDTH: usize = W;
    /// Frame2d height in pixels (rows).
    pub const HEIGHT: usize = H;
    /// Frame dimensions as a [`Size`].
    pub const SIZE: Size = Size::new(W as u32, H as u32);
    /// Top-left corner coordinate as a [`Point`].
    pub const TOP_LEFT: Point = Point::new(0, 0);

    /// Create a new blank (all black) frame.
    #[must_use]
    pub const fn new() -> Self {
        Self([[BLACK; W]; H])
    }

    /// Create a frame filled with a single color.
    #[must_use]
    pub const fn filled(color: RGB8) -> Self {
        Self([[color; W]; H])
    }

    /// Color at `(x, y)`, or `None` off the frame.
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Option<RGB8> {
        let (x_index, y_index) = Self::cell(x, y)?;
        Some(self.0[y_index][x_index])
    }

    /// Write `color` at `(x, y)`. Returns `false` (and writes nothing) off the frame.
    pub fn set(&mut self, x: i32, y: i32, color: RGB8) -> bool {
        match Self::cell(x, y) {
            Some((x_index, y_index)) => {
                self.0[y_index][x_index] = color;
                true
            }
            None => false,
        }
    }

    /// Set every pixel to `color`.
    pub fn fill(&mut self, color: RGB8) {
        *self = Self::filled(color);
    }

    /// Non-black pixels as `(x, y, color)`, row by row from the top-left.
    pub fn lit_pixels(&self) -> impl Iterator<Item = (usize, usize, RGB8)> + '_ {
        iproduct!(0..H, 0..W).filter_map(|(y_index, x_index)| {
            let color = self.0[y_index][x_index];
            (color != BLACK).then_some((x_index, y_index, color))
        })
    }

    fn cell(x: i32, y: i32) -> Option<(usize, usize)> {
        let x_index = usize::try_from(x).ok().filter(|&x_index| x_index < W)?;
        let y_index = usize::try_from(y).ok().filter(|&y_index| y_index < H)?;
        Some((x_index, y_index))
    }
}

impl<const W: usize, const H: usize> Deref for Frame2d<W, H> {
    type Target = [[RGB8; W]; H];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<const W: usize, const H: usize> Index<(usize, usize)> for Frame2d<W, H> {
    type Output = RGB8;

    fn index(&self, (x_index, y_index): (usize, usize)) -> &Self::Output {
        assert!(x_index < W, "x_index must be within width");
        assert!(y_index < H, "y_index must be within height");
        &self.0[y_index][x_index]
    }
}

impl<const W: usize, const H: usize> IndexMut<(usize, usize)> for Frame2d<W, H> {
    fn index_mut(&mut self, (x_index, y_index): (usize, usize)) -> &mut Self::Output {
        assert!(x_index < W, "x_index must be within width");
        assert!(y_index < H, "y_index must be within height");
        &mut self.0[y_index][x_index]
    }
}

impl<const W: usize, const H: usize> Default for Frame2d<W, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize, const H: usize> OriginDimensions for Frame2d<W, H> {
    fn size(&self) -> Size {
        Self::SIZE
    }
}

impl<const W: usize, const H: usize> DrawTarget for Frame2d<W, H> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            self.set(coord.x, coord.y, rgb888_to_rgb8(color));
        }
        Ok(())
    }
}

/// Framebuffer covering the whole composite surface.
pub type MatrixFrame = Frame2d<WIDTH, HEIGHT>;

/// Driver for the composite 64×16 WLED matrix.
///
/// The driver keeps the framebuffer; nothing reaches the LEDs until
/// [`show`](Self::show). Each `show` sends the full set of lit pixels, so a
/// failed send is repaired by the next one.
///
/// `set_pixel` and `clear` need `&mut self` while `show` needs `&self`, so a
/// frame can never change halfway through a send. Share one driver across
/// threads behind a `Mutex` held for the whole set-then-show cycle.
///
/// See the [module docs](mod@crate::matrix) for an example.
pub struct WledMatrix<T = HttpTransport> {
    frame: MatrixFrame,
    transport: T,
}

impl WledMatrix<HttpTransport> {
    /// Driver for the controller described by `config`, starting with a black frame.
    #[must_use]
    pub fn new(config: &WledConfig) -> Self {
        Self::with_transport(HttpTransport::new(config))
    }
}

impl<T: Transport> WledMatrix<T> {
    /// Driver sending through `transport`, starting with a black frame.
    #[must_use]
    pub const fn with_transport(transport: T) -> Self {
        Self {
            frame: MatrixFrame::new(),
            transport,
        }
    }

    /// The current framebuffer.
    #[must_use]
    pub const fn frame(&self) -> &MatrixFrame {
        &self.frame
    }

    /// Set the pixel at `(x, y)`. Writes off the 64×16 surface are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8) {
        self.frame.set(x, y, RGB8::new(r, g, b));
    }

    /// Set the pixel at `(x, y)`, reporting writes off the surface.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PixelOutOfBounds`] if `(x, y)` is outside the surface;
    /// the frame is left unchanged.
    pub fn try_set_pixel(&mut self, x: i32, y: i32, color: RGB8) -> Result<()> {
        if self.frame.set(x, y, color) {
            Ok(())
        } else {
            Err(Error::PixelOutOfBounds { x, y })
        }
    }

    /// Black out the framebuffer. With `send`, also switch the display off.
    ///
    /// Returns `false` only if `send` was requested and the controller did not
    /// accept the power-off. The failure is logged.
    pub fn clear(&mut self, send: bool) -> bool {
        match self.try_clear(send) {
            Ok(()) => true,
            Err(err) => {
                warn!("WLED power-off failed: {err}");
                false
            }
        }
    }

    /// Black out the framebuffer. With `send`, also POST `{"on":false}`.
    ///
    /// The framebuffer is cleared even when the send fails.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] or [`Error::HttpStatus`] if the power-off
    /// was not accepted.
    pub fn try_clear(&mut self, send: bool) -> Result<()> {
        self.frame.fill(BLACK);
        if send {
            self.post(&StateMessage::power_off())?;
        }
        Ok(())
    }

    /// `(LED index, color)` for every lit pixel, in row-major framebuffer order.
    #[must_use]
    pub fn update_list(&self) -> Vec<(u16, RGB8)> {
        self.frame
            .lit_pixels()
            .map(|(x_index, y_index, color)| (layout::xy_to_index(x_index, y_index), color))
            .collect()
    }

    /// The message [`show`](Self::show) would send for the current frame.
    #[must_use]
    pub fn state_message(&self) -> StateMessage {
        StateMessage::pixels(self.update_list())
    }

    /// Send every lit pixel to the controller.
    ///
    /// Returns `true` iff the controller answered HTTP 200. Failures are
    /// logged and never retried.
    #[must_use = "a failed show leaves the LEDs showing the previous frame"]
    pub fn show(&self) -> bool {
        match self.try_show() {
            Ok(()) => true,
            Err(err) => {
                warn!("sending frame to WLED failed: {err}");
                false
            }
        }
    }

    /// Send every lit pixel to the controller.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if no answer arrived within the timeout
    /// and [`Error::HttpStatus`] for any answer other than 200.
    pub fn try_show(&self) -> Result<()> {
        let updates = self.update_list();
        let lit = updates.len();
        self.post(&StateMessage::pixels(updates))?;
        debug!("WLED accepted frame with {lit} lit pixels");
        Ok(())
    }

    fn post(&self, message: &StateMessage) -> Result<()> {
        let body = serde_json::to_vec(message)?;
        match self.transport.post_json(&body)? {
            200 => Ok(()),
            status => Err(Error::HttpStatus(status)),
        }
    }
}

impl<T> OriginDimensions for WledMatrix<T> {
    fn size(&self) -> Size {
        MatrixFrame::SIZE
    }
}

impl<T> DrawTarget for WledMatrix<T> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.frame.draw_iter(pixels)
    }
}
