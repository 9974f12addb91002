//! Messages for the WLED JSON state endpoint (`POST /json`).
//!
//! Only the two shapes the matrix sends are modelled:
//!
//! ```text
//! {"on":true,"seg":[{"id":0,"i":[760,"FF0000",263,"00FF00"]}]}
//! {"on":false}
//! ```

use core::fmt;

use serde::{Serialize, Serializer};
use smart_leds::RGB8;

/// Body of a request to the WLED state endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StateMessage {
    /// Master power.
    pub on: bool,
    /// Segment updates; omitted from the JSON when `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seg: Option<Vec<Segment>>,
}

impl StateMessage {
    /// Turn the display off without touching individual LEDs.
    #[must_use]
    pub const fn power_off() -> Self {
        Self {
            on: false,
            seg: None,
        }
    }

    /// Power on and set the given LEDs on segment 0.
    ///
    /// LEDs not listed keep whatever the controller already shows.
    #[must_use]
    pub fn pixels(updates: impl IntoIterator<Item = (u16, RGB8)>) -> Self {
        Self {
            on: true,
            seg: Some(vec![Segment::individual(0, updates)]),
        }
    }
}

/// Per-segment update carrying individual LED colors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Segment {
    /// Segment id on the controller.
    pub id: u8,
    /// Flat `[index, "RRGGBB", index, "RRGGBB", ...]` list.
    pub i: Vec<LedEntry>,
}

impl Segment {
    /// Flatten `(index, color)` pairs into WLED's alternating list.
    #[must_use]
    pub fn individual(id: u8, updates: impl IntoIterator<Item = (u16, RGB8)>) -> Self {
        let i = updates
            .into_iter()
            .flat_map(|(index, color)| [LedEntry::Index(index), LedEntry::Color(HexColor(color))])
            .collect();
        Self { id, i }
    }
}

/// One element of a segment's `i` list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LedEntry {
    /// Physical LED index.
    Index(u16),
    /// Color for the preceding index.
    Color(HexColor),
}

/// Color written as six uppercase hex digits, `RRGGBB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HexColor(pub RGB8);

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let RGB8 { r, g, b } = self.0;
        write!(f, "{r:02X}{g:02X}{b:02X}")
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
