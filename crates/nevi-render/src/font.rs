//! Glyph rasterization seam
//!
//! The glyph cache only needs coverage bitmaps, so rasterization sits behind
//! a trait: `FontdueRasterizer` for real fonts, `HeadlessRasterizer` for
//! tests and environments without font data.

use crate::metrics::CellMetrics;
use crate::RenderError;

/// Style flags that select a face variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GlyphStyle {
    pub italic: bool,
    pub bold: bool,
}

/// The fixed family and size glyphs are drawn with.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size: f32,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }

    /// CSS-style descriptor, e.g. `italic bold 24px SFMono-Light`.
    pub fn descriptor(&self, style: GlyphStyle) -> String {
        let mut parts = Vec::new();
        if style.italic {
            parts.push("italic".to_string());
        }
        if style.bold {
            parts.push("bold".to_string());
        }
        parts.push(format!("{}px", self.size));
        parts.push(self.family.clone());
        parts.join(" ")
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new("SFMono-Light", 12.0)
    }
}

/// Alpha-coverage bitmap for one glyph, positioned relative to the cell's
/// top-left corner.
#[derive(Debug, Clone)]
pub struct RasterGlyph {
    pub coverage: Vec<u8>,
    pub width: usize,
    pub height: usize,
    /// Horizontal offset from the cell's left edge.
    pub left: i32,
    /// Vertical offset from the cell's top edge.
    pub top: i32,
}

impl RasterGlyph {
    pub fn empty() -> Self {
        Self {
            coverage: Vec::new(),
            width: 0,
            height: 0,
            left: 0,
            top: 0,
        }
    }
}

/// Produces coverage bitmaps at the cell's device pixel size.
pub trait GlyphRasterizer: Send {
    fn rasterize(&mut self, c: char, style: GlyphStyle) -> RasterGlyph;
}

/// Real rasterizer backed by a single fontdue face.
///
/// Bold and italic are synthesized (double-strike and row shear) so one face
/// covers the full style space, matching the single fixed family contract.
pub struct FontdueRasterizer {
    font: fontdue::Font,
    size: f32,
    ascent: f32,
}

impl FontdueRasterizer {
    pub fn from_bytes(data: &[u8], metrics: &CellMetrics) -> Result<Self, RenderError> {
        let font = fontdue::Font::from_bytes(data, fontdue::FontSettings::default())
            .map_err(|e| RenderError::Font(e.to_string()))?;
        let size = metrics.device_font_size();
        let ascent = font
            .horizontal_line_metrics(size)
            .map(|m| m.ascent)
            .unwrap_or(size * 0.8);
        Ok(Self { font, size, ascent })
    }

    pub fn from_file(path: &std::path::Path, metrics: &CellMetrics) -> Result<Self, RenderError> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data, metrics)
    }
}

impl GlyphRasterizer for FontdueRasterizer {
    fn rasterize(&mut self, c: char, style: GlyphStyle) -> RasterGlyph {
        let (m, coverage) = self.font.rasterize(c, self.size);
        if m.width == 0 || m.height == 0 {
            return RasterGlyph::empty();
        }

        // fontdue positions the bitmap relative to the baseline; convert to
        // a cell-top offset with the face ascent as the baseline.
        let top = (self.ascent - (m.height as f32 + m.ymin as f32)).round() as i32;
        let glyph = RasterGlyph {
            coverage,
            width: m.width,
            height: m.height,
            left: m.xmin.max(0),
            top,
        };

        let glyph = if style.bold { embolden(&glyph) } else { glyph };
        if style.italic {
            shear(&glyph)
        } else {
            glyph
        }
    }
}

/// Synthetic bold: double-strike one pixel to the right.
fn embolden(glyph: &RasterGlyph) -> RasterGlyph {
    let width = glyph.width + 1;
    let mut coverage = vec![0u8; width * glyph.height];
    for y in 0..glyph.height {
        for x in 0..glyph.width {
            let v = glyph.coverage[y * glyph.width + x];
            let row = y * width;
            coverage[row + x] = coverage[row + x].max(v);
            coverage[row + x + 1] = coverage[row + x + 1].max(v);
        }
    }
    RasterGlyph {
        coverage,
        width,
        height: glyph.height,
        left: glyph.left,
        top: glyph.top,
    }
}

/// Synthetic italic: shear rows rightward toward the top.
fn shear(glyph: &RasterGlyph) -> RasterGlyph {
    const SLANT: f32 = 0.2;
    let max_shift = ((glyph.height as f32) * SLANT) as usize;
    let width = glyph.width + max_shift;
    let mut coverage = vec![0u8; width * glyph.height];
    for y in 0..glyph.height {
        let shift = (((glyph.height - 1 - y) as f32) * SLANT) as usize;
        for x in 0..glyph.width {
            coverage[y * width + x + shift] = glyph.coverage[y * glyph.width + x];
        }
    }
    RasterGlyph {
        coverage,
        width,
        height: glyph.height,
        left: glyph.left,
        top: glyph.top,
    }
}

/// Deterministic rasterizer for tests: a solid block inset one device pixel,
/// with coverage derived from the character and style so distinct inputs
/// produce distinct bitmaps.
pub struct HeadlessRasterizer {
    width: usize,
    height: usize,
}

impl HeadlessRasterizer {
    pub fn new(metrics: &CellMetrics) -> Self {
        Self {
            width: metrics.device_width(),
            height: metrics.device_height(),
        }
    }
}

impl GlyphRasterizer for HeadlessRasterizer {
    fn rasterize(&mut self, c: char, style: GlyphStyle) -> RasterGlyph {
        let width = self.width.saturating_sub(2);
        let height = self.height.saturating_sub(2);
        let mut seed = (c as u32).wrapping_mul(31);
        if style.bold {
            seed = seed.wrapping_add(7);
        }
        if style.italic {
            seed = seed.wrapping_add(13);
        }
        let value = 0x80 | (seed % 0x80) as u8;
        RasterGlyph {
            coverage: vec![value; width * height],
            width,
            height,
            left: 1,
            top: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_descriptor_joins_active_styles() {
        let spec = FontSpec::default();
        assert_eq!(
            spec.descriptor(GlyphStyle::default()),
            "12px SFMono-Light"
        );
        assert_eq!(
            spec.descriptor(GlyphStyle {
                italic: true,
                bold: true
            }),
            "italic bold 12px SFMono-Light"
        );
    }

    #[test]
    fn test_headless_is_deterministic_and_style_sensitive() {
        let metrics = CellMetrics::default();
        let mut r = HeadlessRasterizer::new(&metrics);
        let plain = r.rasterize('a', GlyphStyle::default());
        let again = r.rasterize('a', GlyphStyle::default());
        assert_eq!(plain.coverage, again.coverage);

        let bold = r.rasterize(
            'a',
            GlyphStyle {
                bold: true,
                italic: false,
            },
        );
        assert_ne!(plain.coverage[0], bold.coverage[0]);
    }

    #[test]
    fn test_embolden_widens_by_one() {
        let glyph = RasterGlyph {
            coverage: vec![255, 0, 0, 255],
            width: 2,
            height: 2,
            left: 0,
            top: 0,
        };
        let bold = embolden(&glyph);
        assert_eq!(bold.width, 3);
        assert_eq!(bold.coverage, vec![255, 255, 0, 0, 255, 255]);
    }

    #[test]
    fn test_shear_shifts_top_rows_right() {
        let glyph = RasterGlyph {
            coverage: vec![255; 10 * 10],
            width: 10,
            height: 10,
            left: 0,
            top: 0,
        };
        let italic = shear(&glyph);
        assert!(italic.width > 10);
        // Top row is shifted, bottom row is not.
        assert_eq!(italic.coverage[0], 0);
        assert_eq!(italic.coverage[(10 - 1) * italic.width], 255);
    }
}
