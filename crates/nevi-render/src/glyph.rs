//! Glyph bitmap cache
//!
//! Renders one character cell (character + full attribute set) into an
//! immutable bitmap and memoizes it. Terminal text repeats the same
//! character/attribute combinations constantly, so this cache is the main
//! performance device of the renderer. It is unbounded by design; the key
//! space is bounded by the combinations a session actually paints.

use crate::color::Rgb;
use crate::font::{GlyphRasterizer, GlyphStyle};
use crate::metrics::CellMetrics;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Composite cache key: character plus every attribute that affects pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlyphKey {
    pub c: char,
    pub fg: Rgb,
    pub bg: Rgb,
    pub sp: Rgb,
    pub style: GlyphStyle,
    pub underline: bool,
    pub undercurl: bool,
}

/// A pre-rendered cell bitmap at device (oversampled) resolution.
///
/// Immutable once produced; cache hits hand out the same allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct CellBitmap {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl CellBitmap {
    fn filled(width: usize, height: usize, bg: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: vec![bg.packed(); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Packed `0x00RRGGBB` pixel at `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    fn set(&mut self, x: usize, y: usize, color: u32) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                self.pixels[row * self.width + col] = color;
            }
        }
    }
}

/// Unbounded glyph bitmap cache over a rasterizer.
pub struct GlyphCache {
    metrics: CellMetrics,
    rasterizer: Box<dyn GlyphRasterizer>,
    bitmaps: HashMap<GlyphKey, Arc<CellBitmap>>,
}

impl GlyphCache {
    pub fn new(metrics: CellMetrics, rasterizer: Box<dyn GlyphRasterizer>) -> Self {
        Self {
            metrics,
            rasterizer,
            bitmaps: HashMap::new(),
        }
    }

    pub fn metrics(&self) -> &CellMetrics {
        &self.metrics
    }

    /// Number of cached bitmaps.
    pub fn len(&self) -> usize {
        self.bitmaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bitmaps.is_empty()
    }

    /// Fetch the bitmap for `key`, rendering it on first use.
    pub fn bitmap(&mut self, key: GlyphKey) -> Arc<CellBitmap> {
        if let Some(bitmap) = self.bitmaps.get(&key) {
            return Arc::clone(bitmap);
        }

        debug!(c = %key.c, "rendering glyph cell");
        let bitmap = Arc::new(self.render(key));
        self.bitmaps.insert(key, Arc::clone(&bitmap));
        bitmap
    }

    fn render(&mut self, key: GlyphKey) -> CellBitmap {
        let w = self.metrics.device_width();
        let h = self.metrics.device_height();
        let stroke = self.metrics.oversample();
        let mut cell = CellBitmap::filled(w, h, key.bg);

        let glyph = self.rasterizer.rasterize(key.c, key.style);
        for gy in 0..glyph.height {
            let y = glyph.top + gy as i32;
            if y < 0 || y as usize >= h {
                continue;
            }
            for gx in 0..glyph.width {
                let x = glyph.left + gx as i32;
                if x < 0 || x as usize >= w {
                    continue;
                }
                let coverage = glyph.coverage[gy * glyph.width + gx];
                if coverage == 0 {
                    continue;
                }
                let color = key.fg.blend_over(key.bg, coverage);
                cell.set(x as usize, y as usize, color.packed());
            }
        }

        if key.underline {
            // Stroke of `stroke` thickness centered on the line one
            // oversampled pixel above the bottom edge.
            let y0 = h.saturating_sub(stroke + stroke / 2);
            cell.fill_rect(0, y0, w, stroke, key.fg.packed());
        }

        if key.undercurl {
            stroke_undercurl(&mut cell, stroke, key.sp);
        }

        cell
    }
}

/// Undercurl wave: two symmetric cubic curves spanning the cell width, with
/// amplitude half the cell width, hugging the bottom edge.
fn stroke_undercurl(cell: &mut CellBitmap, stroke: usize, color: Rgb) {
    let w = cell.width() as f32;
    let y = cell.height() as f32 - stroke as f32 / 2.0;
    let amp = w / 2.0;

    let first = [
        (0.0, y - amp / 2.0),
        (w / 4.0, y - amp / 2.0),
        (w / 4.0, y),
        (w / 2.0, y),
    ];
    let second = [
        (w / 2.0, y),
        (w * 3.0 / 4.0, y),
        (w * 3.0 / 4.0, y - amp / 2.0),
        (w, y - amp / 2.0),
    ];

    for curve in [first, second] {
        stroke_cubic(cell, &curve, stroke, color.packed());
    }
}

fn stroke_cubic(cell: &mut CellBitmap, p: &[(f32, f32); 4], stroke: usize, color: u32) {
    // Enough samples that adjacent stamps overlap at any cell size.
    let steps = (cell.width() * 2).max(16);
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let u = 1.0 - t;
        let x = u * u * u * p[0].0
            + 3.0 * u * u * t * p[1].0
            + 3.0 * u * t * t * p[2].0
            + t * t * t * p[3].0;
        let y = u * u * u * p[0].1
            + 3.0 * u * u * t * p[1].1
            + 3.0 * u * t * t * p[2].1
            + t * t * t * p[3].1;
        stamp(cell, x, y, stroke, color);
    }
}

fn stamp(cell: &mut CellBitmap, x: f32, y: f32, size: usize, color: u32) {
    let half = (size / 2) as f32;
    let x0 = (x - half).max(0.0) as usize;
    let y0 = (y - half).max(0.0) as usize;
    for py in y0..(y0 + size) {
        for px in x0..(x0 + size) {
            cell.set(px, py, color);
        }
    }
}
