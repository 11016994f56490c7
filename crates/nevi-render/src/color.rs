//! Packed-integer color decoding
//!
//! Decodes the 24-bit packed colors carried by redraw commands into an RGB
//! value, memoizing each decode. The protocol packs red in the high byte, so
//! the low byte extracted first is blue; the extraction-order components
//! `(c0, c1, c2)` reassemble as `rgb(c2, c1, c0)`.

use crate::RenderError;
use std::collections::HashMap;
use std::fmt;

/// A decoded 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Packed `0x00RRGGBB` form used by pixel buffers.
    pub fn packed(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Blend `self` over `bg` with an 8-bit coverage value.
    pub fn blend_over(self, bg: Rgb, coverage: u8) -> Rgb {
        let a = coverage as u32;
        let mix = |f: u8, b: u8| (((f as u32) * a + (b as u32) * (255 - a)) / 255) as u8;
        Rgb {
            r: mix(self.r, bg.r),
            g: mix(self.g, bg.g),
            b: mix(self.b, bg.b),
        }
    }
}

impl fmt::Display for Rgb {
    /// CSS-style form, e.g. `rgb(255,0,128)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// Append-only decode cache, keyed by the raw packed integer.
///
/// Unbounded by design: the key space is limited to the colors the editor
/// session actually uses.
#[derive(Debug, Default)]
pub struct ColorCache {
    decoded: HashMap<i64, Rgb>,
}

impl ColorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a packed color. `None` means "no override, use default" and
    /// maps straight through. Values outside 24 bits are rejected.
    pub fn decode(&mut self, packed: Option<i64>) -> Result<Option<Rgb>, RenderError> {
        let packed = match packed {
            Some(v) => v,
            None => return Ok(None),
        };
        if !(0..=0x00FF_FFFF).contains(&packed) {
            return Err(RenderError::InvalidColor(packed));
        }
        if let Some(&rgb) = self.decoded.get(&packed) {
            return Ok(Some(rgb));
        }

        // Successive 8-bit shift extraction: low byte first. The protocol
        // packs red high, so extraction order is (blue, green, red).
        let mut v = packed as u32;
        let mut parts = [0u8; 3];
        for part in parts.iter_mut() {
            *part = (v & 0xff) as u8;
            v >>= 8;
        }
        let rgb = Rgb::new(parts[2], parts[1], parts[0]);

        self.decoded.insert(packed, rgb);
        Ok(Some(rgb))
    }

    /// Number of memoized colors.
    pub fn len(&self) -> usize {
        self.decoded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoded.is_empty()
    }
}
