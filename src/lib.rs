//! Drive a 64×16 WLED LED matrix built from four 8×32 panels.
//!
//! The panels sit in a 2×2 block. Two of them are mounted upside down, and all
//! four are wired as column-major serpentines. This crate hides that wiring
//! behind a plain `(x, y)` framebuffer and sends frames to the WLED controller's
//! JSON API.
//!
//! - [`matrix`]: the framebuffer and [`WledMatrix`] driver; [`matrix::layout`]
//!   holds the coordinate-to-LED mapping.
//! - [`transport`]: how requests reach the controller.
//! - [`image_input`]: load and downsample a PNG screenshot.
//! - [`to_png`]: render a frame preview without hardware.
//!
//! # Glossary
//!
//! - **Logical coordinate:** `(x, y)` on the 64×16 surface, independent of wiring.
//! - **LED index:** the 0–1023 position the controller uses for one LED.
//! - **Panel:** one physical 8×32 sub-matrix; four make the surface.
//! - **Serpentine wiring:** column-major wiring where adjacent columns run in opposite directions.
//! - **Sparse update list:** `(LED index, color)` pairs for the lit pixels only.

mod config;
mod error;
pub mod image_input;
pub mod matrix;
pub mod to_png;
pub mod transport;

pub use crate::config::WledConfig;
// Re-export error types and result (used throughout)
pub use crate::error::{Error, Result};
pub use crate::matrix::WledMatrix;

/// Predefined RGB color constants from the `smart_leds` crate.
#[doc(inline)]
pub use smart_leds::colors;

/// RGB color type used by frames.
pub use smart_leds::RGB8;
