//! Cell geometry
//!
//! One place owns the step from fractional font advance to whole-pixel cell
//! sizes, and the split between logical pixels (viewport, cursor overlay)
//! and device pixels (the oversampled glyph/surface resolution).

/// Fixed per-cell geometry for the whole grid.
///
/// Logical sizes are floored to whole pixels so no draw ever lands on a
/// sub-pixel boundary. Device sizes are the logical sizes times the
/// oversampling factor; glyphs are rasterized and blitted at device
/// resolution and the surface is presented at logical size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    logical_width: usize,
    logical_height: usize,
    font_size: f32,
    oversample: usize,
}

impl CellMetrics {
    /// Build metrics from a fractional cell advance, flooring to whole
    /// logical pixels.
    pub fn new(cell_width: f64, cell_height: f64, font_size: f32, oversample: usize) -> Self {
        Self {
            logical_width: floor_to_pixel(cell_width),
            logical_height: floor_to_pixel(cell_height),
            font_size,
            oversample: oversample.max(1),
        }
    }

    /// Cell width in logical pixels.
    pub fn logical_width(&self) -> usize {
        self.logical_width
    }

    /// Cell height in logical pixels.
    pub fn logical_height(&self) -> usize {
        self.logical_height
    }

    /// Cell width in device (oversampled) pixels.
    pub fn device_width(&self) -> usize {
        self.logical_width * self.oversample
    }

    /// Cell height in device (oversampled) pixels.
    pub fn device_height(&self) -> usize {
        self.logical_height * self.oversample
    }

    /// Font size at device resolution.
    pub fn device_font_size(&self) -> f32 {
        self.font_size * self.oversample as f32
    }

    /// The oversampling factor.
    pub fn oversample(&self) -> usize {
        self.oversample
    }

    /// Columns that fit in a viewport of `width_px` logical pixels.
    pub fn cols_for(&self, width_px: u32) -> u16 {
        ((width_px as usize / self.logical_width).max(1)).min(u16::MAX as usize) as u16
    }

    /// Rows that fit in a viewport of `height_px` logical pixels.
    pub fn rows_for(&self, height_px: u32) -> u16 {
        ((height_px as usize / self.logical_height).max(1)).min(u16::MAX as usize) as u16
    }
}

impl Default for CellMetrics {
    /// The fixed SFMono-Light geometry: 7.2x15 pt cells, 12 pt font, 2x
    /// oversampling.
    fn default() -> Self {
        Self::new(7.2, 15.0, 12.0, 2)
    }
}

/// Explicit integer-floor step between fractional font metrics and the
/// whole-pixel cell grid.
fn floor_to_pixel(size: f64) -> usize {
    size.floor().max(1.0) as usize
}
