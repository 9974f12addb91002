//! Wiring of the 64×16 surface: four 8×32 panels, two of them mounted upside down.
//!
//! See [`xy_to_index`] for the mapping and [`PANELS`] for the panel table.
//!
//! ```text
//! Logical surface (x right, y down):
//!
//!   y 0..8    [ panel 2 (180°) ][ panel 1 (180°) ]
//!   y 8..16   [ panel 3        ][ panel 0        ]
//!              x 0..32           x 32..64
//! ```
//!
//! Every panel is wired column-major in a serpentine: even columns run
//! top-to-bottom, odd columns bottom-to-top. Panel `p` owns LED indexes
//! `p * 256 ..= p * 256 + 255`.

/// Columns in one physical panel.
pub const PANEL_WIDTH: usize = 32;
/// Rows in one physical panel.
pub const PANEL_HEIGHT: usize = 8;
/// LEDs in one physical panel.
pub const LEDS_PER_PANEL: usize = PANEL_WIDTH * PANEL_HEIGHT;

/// Columns on the composite surface.
pub const WIDTH: usize = PANEL_WIDTH * 2;
/// Rows on the composite surface.
pub const HEIGHT: usize = PANEL_HEIGHT * 2;
/// Total LEDs on the composite surface.
pub const LED_COUNT: usize = WIDTH * HEIGHT;

/// One physical 8×32 panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Panel {
    /// Position of the panel on the data line; also selects its LED index range.
    pub id: u8,
    /// Panel is mounted rotated 180° relative to the surface.
    pub rotated_180: bool,
}

impl Panel {
    const fn new(id: u8, rotated_180: bool) -> Self {
        Self { id, rotated_180 }
    }

    /// First LED index owned by this panel.
    #[must_use]
    pub const fn base_index(self) -> u16 {
        self.id as u16 * LEDS_PER_PANEL as u16
    }

    /// Map panel-local `(x, y)` to an LED index.
    ///
    /// Rotation is applied first, then the serpentine correction on the
    /// rotated column.
    ///
    /// ```text
    /// Unrotated panel, first three columns:
    ///   LED0  LED15  LED16
    ///   LED1  LED14  LED17
    ///   ...   ...    ...
    ///   LED7  LED8   LED23
    /// ```
    ///
    /// # Panics
    ///
    /// If `local_x >= 32` or `local_y >= 8`.
    #[must_use]
    pub const fn local_to_index(self, local_x: usize, local_y: usize) -> u16 {
        assert!(local_x < PANEL_WIDTH, "local_x out of bounds");
        assert!(local_y < PANEL_HEIGHT, "local_y out of bounds");

        let (mut column, mut row) = (local_x, local_y);
        if self.rotated_180 {
            column = PANEL_WIDTH - 1 - column;
            row = PANEL_HEIGHT - 1 - row;
        }
        if column % 2 == 1 {
            // Odd column: bottom-to-top
            row = PANEL_HEIGHT - 1 - row;
        }
        self.base_index() + (column * PANEL_HEIGHT + row) as u16
    }
}

/// Panel table indexed by `[block_row][block_column]` of the 2×2 block.
///
/// The assignment follows the data line, not reading order: the line enters
/// bottom-right, runs up, across the top, and back down the left.
pub const PANELS: [[Panel; 2]; 2] = [
    [Panel::new(2, true), Panel::new(1, true)],
    [Panel::new(3, false), Panel::new(0, false)],
];

/// Panel that covers logical `(x, y)`.
///
/// # Panics
///
/// If `(x, y)` is outside the 64×16 surface.
#[must_use]
pub const fn panel_at(x: usize, y: usize) -> Panel {
    assert!(x < WIDTH, "x out of bounds");
    assert!(y < HEIGHT, "y out of bounds");
    PANELS[y / PANEL_HEIGHT][x / PANEL_WIDTH]
}

/// Map logical `(x, y)` to the LED index the controller expects.
///
/// Callers must keep `(x, y)` inside the surface; see [`checked_xy_to_index`]
/// for unvalidated input.
///
/// ```rust
/// use wled_matrix::matrix::layout::xy_to_index;
///
/// assert_eq!(xy_to_index(0, 15), 775); // panel 3, first column, bottom row
/// assert_eq!(xy_to_index(63, 15), 248); // panel 0, last column runs upward
/// ```
///
/// # Panics
///
/// If `(x, y)` is outside the 64×16 surface.
#[must_use]
pub const fn xy_to_index(x: usize, y: usize) -> u16 {
    panel_at(x, y).local_to_index(x % PANEL_WIDTH, y % PANEL_HEIGHT)
}

/// Like [`xy_to_index`], but `None` for coordinates off the surface.
#[must_use]
pub const fn checked_xy_to_index(x: i32, y: i32) -> Option<u16> {
    if x < 0 || y < 0 || x as usize >= WIDTH || y as usize >= HEIGHT {
        return None;
    }
    Some(xy_to_index(x as usize, y as usize))
}

/// Logical `(x, y)` lit by LED `index`, or `None` past the last LED.
#[must_use]
pub fn index_to_xy(index: usize) -> Option<(u16, u16)> {
    INDEX_TO_XY.get(index).copied()
}

// Evaluated at compile time: a wiring table that is not a bijection fails the build.
static INDEX_TO_XY: [(u16, u16); LED_COUNT] = invert_layout();

const fn invert_layout() -> [(u16, u16); LED_COUNT] {
    let mut mapping = [None; LED_COUNT];

    let mut y = 0;
    while y < HEIGHT {
        let mut x = 0;
        while x < WIDTH {
            let led_index = xy_to_index(x, y) as usize;
            assert!(led_index < LED_COUNT, "LED index out of range in panel layout");
            let slot = &mut mapping[led_index];
            assert!(slot.is_none(), "duplicate LED index in panel layout");
            *slot = Some((x as u16, y as u16));
            x += 1;
        }
        y += 1;
    }

    let mut finalized = [(0_u16, 0_u16); LED_COUNT];
    let mut i = 0;
    while i < LED_COUNT {
        match mapping[i] {
            Some(xy) => finalized[i] = xy,
            None => panic!("panel layout does not cover every LED"),
        }
        i += 1;
    }
    finalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_table_matches_block_positions() {
        assert_eq!(panel_at(0, 0), Panel::new(2, true));
        assert_eq!(panel_at(63, 0), Panel::new(1, true));
        assert_eq!(panel_at(0, 15), Panel::new(3, false));
        assert_eq!(panel_at(63, 15), Panel::new(0, false));
    }

    #[test]
    fn unrotated_panel_snakes_down_then_up() {
        let panel = Panel::new(0, false);
        assert_eq!(panel.local_to_index(0, 0), 0);
        assert_eq!(panel.local_to_index(0, 7), 7);
        assert_eq!(panel.local_to_index(1, 7), 8);
        assert_eq!(panel.local_to_index(1, 0), 15);
        assert_eq!(panel.local_to_index(2, 0), 16);
    }

    #[test]
    fn rotated_panel_starts_bottom_right() {
        let panel = Panel::new(1, true);
        assert_eq!(panel.local_to_index(31, 7), 256);
        assert_eq!(panel.local_to_index(31, 0), 263);
        assert_eq!(panel.local_to_index(0, 0), 256 + 255 - 7);
    }

    #[test]
    fn checked_rejects_off_surface() {
        assert_eq!(checked_xy_to_index(-1, 0), None);
        assert_eq!(checked_xy_to_index(0, -1), None);
        assert_eq!(checked_xy_to_index(64, 0), None);
        assert_eq!(checked_xy_to_index(0, 16), None);
        assert_eq!(checked_xy_to_index(0, 0), Some(760));
    }

    #[test]
    #[should_panic(expected = "x out of bounds")]
    fn xy_to_index_panics_past_right_edge() {
        let _ = xy_to_index(64, 0);
    }
}
