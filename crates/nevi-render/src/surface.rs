//! Grid pixel surface
//!
//! The addressable pixel surface sized to `cols x rows` cells, backed by an
//! oversampled buffer, plus the cursor overlay's logical-pixel position.
//! Contract violations from upstream (zero dimensions, crossed scroll
//! regions) degrade to a skipped operation rather than a crashed frame.

use crate::color::Rgb;
use crate::glyph::CellBitmap;
use crate::metrics::CellMetrics;
use tracing::warn;

/// Inclusive cell-coordinate rectangle affected by scroll commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRegion {
    pub top: u16,
    pub bottom: u16,
    pub left: u16,
    pub right: u16,
}

impl ScrollRegion {
    /// The whole grid.
    pub fn full(cols: u16, rows: u16) -> Self {
        Self {
            top: 0,
            bottom: rows.saturating_sub(1),
            left: 0,
            right: cols.saturating_sub(1),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.top <= self.bottom && self.left <= self.right
    }
}

/// The pixel surface for the character grid.
///
/// Pixels are stored at device (oversampled) resolution; the cursor overlay
/// sits outside the pixel buffer and is positioned in logical pixels, so the
/// two use different cell sizes on purpose.
pub struct GridSurface {
    metrics: CellMetrics,
    cols: u16,
    rows: u16,
    width_px: usize,
    height_px: usize,
    pixels: Vec<u32>,
    cursor: (u16, u16),
    cursor_overlay: (i32, i32),
}

impl GridSurface {
    pub fn new(metrics: CellMetrics, cols: u16, rows: u16, bg: Rgb) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        let width_px = cols as usize * metrics.device_width();
        let height_px = rows as usize * metrics.device_height();
        let mut surface = Self {
            metrics,
            cols,
            rows,
            width_px,
            height_px,
            pixels: vec![bg.packed(); width_px * height_px],
            cursor: (0, 0),
            cursor_overlay: (0, 0),
        };
        surface.move_cursor_to(0, 0);
        surface
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// Device (oversampled) pixel dimensions.
    pub fn size_px(&self) -> (usize, usize) {
        (self.width_px, self.height_px)
    }

    /// Logical pixel dimensions the surface is presented at.
    pub fn logical_size_px(&self) -> (usize, usize) {
        (
            self.cols as usize * self.metrics.logical_width(),
            self.rows as usize * self.metrics.logical_height(),
        )
    }

    /// Cursor cell position `(row, col)`.
    pub fn cursor(&self) -> (u16, u16) {
        self.cursor
    }

    /// Cursor overlay position in logical pixels.
    pub fn cursor_overlay_px(&self) -> (i32, i32) {
        self.cursor_overlay
    }

    /// Packed pixel at device coordinates.
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width_px + x]
    }

    /// Device pixel origin of a cell.
    pub fn cell_origin(&self, row: u16, col: u16) -> (usize, usize) {
        (
            col as usize * self.metrics.device_width(),
            row as usize * self.metrics.device_height(),
        )
    }

    /// Blit a cell bitmap at a cell position, clipped to the surface.
    pub fn blit(&mut self, bitmap: &CellBitmap, row: u16, col: u16) {
        let (x0, y0) = self.cell_origin(row, col);
        if x0 >= self.width_px || y0 >= self.height_px {
            return;
        }
        let w = bitmap.width().min(self.width_px - x0);
        let h = bitmap.height().min(self.height_px - y0);
        for y in 0..h {
            let dst = (y0 + y) * self.width_px + x0;
            let src = &bitmap.pixels()[y * bitmap.width()..y * bitmap.width() + w];
            self.pixels[dst..dst + w].copy_from_slice(src);
        }
    }

    /// Move the cursor cell and reposition the overlay.
    ///
    /// The overlay is a logical-pixel element above the oversampled buffer,
    /// nudged one pixel up-left so it hugs the glyph edge.
    pub fn move_cursor_to(&mut self, row: u16, col: u16) {
        let row = row.min(self.rows.saturating_sub(1));
        let col = col.min(self.cols.saturating_sub(1));
        self.cursor = (row, col);
        self.cursor_overlay = (
            (col as usize * self.metrics.logical_width()) as i32 - 1,
            (row as usize * self.metrics.logical_height()) as i32 - 1,
        );
    }

    /// Advance the cursor one column rightward without wrapping.
    pub fn advance_cursor(&mut self) {
        self.cursor.1 = self.cursor.1.saturating_add(1);
    }

    /// Reset the cursor to the origin and fill the whole surface.
    pub fn clear_all(&mut self, bg: Rgb) {
        self.cursor = (0, 0);
        self.pixels.fill(bg.packed());
    }

    /// Fill from the cursor's pixel column to the right edge, one cell-row
    /// high.
    pub fn clear_to_eol(&mut self, bg: Rgb) {
        let (row, col) = self.cursor;
        let x0 = col as usize * self.metrics.device_width();
        let y0 = row as usize * self.metrics.device_height();
        if x0 >= self.width_px {
            return;
        }
        self.fill_rect(
            x0,
            y0,
            self.width_px - x0,
            self.metrics.device_height(),
            bg,
        );
    }

    /// Recompute surface dimensions for a new cell count and refill.
    ///
    /// Identical dimensions refill without reallocating. Zero dimensions are
    /// an upstream contract violation; the operation is skipped.
    pub fn resize_to(&mut self, cols: u16, rows: u16, bg: Rgb) {
        if cols == 0 || rows == 0 {
            warn!(cols, rows, "ignoring resize to empty grid");
            return;
        }
        if cols == self.cols && rows == self.rows {
            self.pixels.fill(bg.packed());
            return;
        }
        self.cols = cols;
        self.rows = rows;
        self.width_px = cols as usize * self.metrics.device_width();
        self.height_px = rows as usize * self.metrics.device_height();
        self.pixels = vec![bg.packed(); self.width_px * self.height_px];
        let (row, col) = self.cursor;
        self.move_cursor_to(row, col);
    }

    /// Shift the region's content vertically by `count` cell-rows and fill
    /// the exposed strip.
    ///
    /// Positive `count` scrolls content up (new content exposed at the
    /// bottom), negative scrolls down. A shift larger than the region simply
    /// fills it.
    pub fn scroll_region(&mut self, region: &ScrollRegion, count: i64, bg: Rgb) {
        if count == 0 {
            return;
        }
        let mut region = *region;
        region.bottom = region.bottom.min(self.rows.saturating_sub(1));
        region.right = region.right.min(self.cols.saturating_sub(1));
        if !region.is_valid() {
            warn!(?region, "ignoring scroll with crossed region bounds");
            return;
        }

        let cw = self.metrics.device_width();
        let ch = self.metrics.device_height();
        let region_rows = (region.bottom - region.top + 1) as usize;
        let shift = (count.unsigned_abs() as usize).min(region_rows);

        let x = region.left as usize * cw;
        let w = (region.right - region.left + 1) as usize * cw;
        let copy_h = (region_rows - shift) * ch;

        let (src_y, dst_y, fill_y) = if count > 0 {
            (
                (region.top as usize + shift) * ch,
                region.top as usize * ch,
                (region.bottom as usize + 1 - shift) * ch,
            )
        } else {
            (
                region.top as usize * ch,
                (region.top as usize + shift) * ch,
                region.top as usize * ch,
            )
        };

        if copy_h > 0 {
            self.copy_rows(x, w, src_y, dst_y, copy_h);
        }
        self.fill_rect(x, fill_y, w, shift * ch, bg);
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: Rgb) {
        let packed = color.packed();
        let x1 = (x + w).min(self.width_px);
        let y1 = (y + h).min(self.height_px);
        for row in y..y1 {
            let start = row * self.width_px + x;
            self.pixels[start..row * self.width_px + x1].fill(packed);
        }
    }

    /// Copy a pixel block vertically, safe for overlapping source and
    /// destination: rows are walked away from the overlap.
    fn copy_rows(&mut self, x: usize, w: usize, src_y: usize, dst_y: usize, h: usize) {
        let w = w.min(self.width_px.saturating_sub(x));
        let h = h
            .min(self.height_px.saturating_sub(src_y))
            .min(self.height_px.saturating_sub(dst_y));
        let rows: Box<dyn Iterator<Item = usize>> = if dst_y <= src_y {
            Box::new(0..h)
        } else {
            Box::new((0..h).rev())
        };
        for row in rows {
            let src = (src_y + row) * self.width_px + x;
            let dst = (dst_y + row) * self.width_px + x;
            self.pixels.copy_within(src..src + w, dst);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BG: Rgb = Rgb::new(0, 0, 0);
    const INK: Rgb = Rgb::new(255, 255, 255);

    fn surface(cols: u16, rows: u16) -> GridSurface {
        GridSurface::new(CellMetrics::default(), cols, rows, BG)
    }

    /// Paint a full cell a solid color, bypassing the glyph cache.
    fn paint_cell(s: &mut GridSurface, row: u16, col: u16, color: Rgb) {
        let (x, y) = s.cell_origin(row, col);
        let m = CellMetrics::default();
        s.fill_rect(x, y, m.device_width(), m.device_height(), color);
    }

    fn cell_color(s: &GridSurface, row: u16, col: u16) -> u32 {
        let (x, y) = s.cell_origin(row, col);
        s.pixel(x, y)
    }

    #[test]
    fn test_new_surface_dimensions() {
        let s = surface(80, 24);
        assert_eq!(s.size_px(), (80 * 14, 24 * 30));
        assert_eq!(s.logical_size_px(), (80 * 7, 24 * 15));
    }

    #[test]
    fn test_cursor_overlay_uses_logical_pixels() {
        let mut s = surface(80, 24);
        s.move_cursor_to(3, 10);
        assert_eq!(s.cursor(), (3, 10));
        assert_eq!(s.cursor_overlay_px(), (10 * 7 - 1, 3 * 15 - 1));
    }

    #[test]
    fn test_cursor_clamped_to_grid() {
        let mut s = surface(10, 5);
        s.move_cursor_to(100, 100);
        assert_eq!(s.cursor(), (4, 9));
    }

    #[test]
    fn test_clear_all_resets_cursor_and_fills() {
        let mut s = surface(10, 5);
        s.move_cursor_to(2, 3);
        paint_cell(&mut s, 1, 1, INK);
        s.clear_all(BG);
        assert_eq!(s.cursor(), (0, 0));
        assert_eq!(cell_color(&s, 1, 1), BG.packed());
    }

    #[test]
    fn test_clear_to_eol_spans_cursor_to_right_edge() {
        let mut s = surface(10, 2);
        for col in 0..10 {
            paint_cell(&mut s, 1, col, INK);
        }
        s.move_cursor_to(1, 4);
        s.clear_to_eol(BG);
        assert_eq!(cell_color(&s, 1, 3), INK.packed());
        for col in 4..10 {
            assert_eq!(cell_color(&s, 1, col), BG.packed());
        }
        // Exactly one cell-row high: row 0 stays background.
        assert_eq!(cell_color(&s, 0, 5), BG.packed());
    }

    #[test]
    fn test_resize_is_idempotent_for_same_dims() {
        let mut s = surface(80, 24);
        paint_cell(&mut s, 0, 0, INK);
        s.resize_to(80, 24, BG);
        assert_eq!(s.size_px(), (80 * 14, 24 * 30));
        // Refilled, not preserved.
        assert_eq!(cell_color(&s, 0, 0), BG.packed());
        s.resize_to(80, 24, BG);
        assert_eq!(s.size_px(), (80 * 14, 24 * 30));
    }

    #[test]
    fn test_resize_to_zero_is_skipped() {
        let mut s = surface(10, 5);
        s.resize_to(0, 5, BG);
        assert_eq!((s.cols(), s.rows()), (10, 5));
    }

    #[test]
    fn test_scroll_up_copies_and_fills_bottom() {
        let mut s = surface(80, 10);
        let region = ScrollRegion::full(80, 10);
        // Distinct sentinel per row.
        for row in 0..10 {
            paint_cell(&mut s, row, 0, Rgb::new(row as u8 + 1, 0, 0));
        }
        s.scroll_region(&region, 3, BG);
        // Rows 0..=6 now hold what was in rows 3..=9.
        for row in 0..7u16 {
            assert_eq!(
                cell_color(&s, row, 0),
                Rgb::new(row as u8 + 4, 0, 0).packed(),
                "row {row}"
            );
        }
        // Fill strip at rows 7..=9.
        for row in 7..10 {
            assert_eq!(cell_color(&s, row, 0), BG.packed(), "row {row}");
        }
    }

    #[test]
    fn test_scroll_down_copies_and_fills_top() {
        let mut s = surface(80, 10);
        let region = ScrollRegion::full(80, 10);
        for row in 0..10 {
            paint_cell(&mut s, row, 0, Rgb::new(row as u8 + 1, 0, 0));
        }
        s.scroll_region(&region, -2, BG);
        // Destination top is row 2; rows 2..=9 hold what was in 0..=7.
        for row in 2..10u16 {
            assert_eq!(
                cell_color(&s, row, 0),
                Rgb::new(row as u8 - 1, 0, 0).packed(),
                "row {row}"
            );
        }
        for row in 0..2 {
            assert_eq!(cell_color(&s, row, 0), BG.packed(), "row {row}");
        }
    }

    #[test]
    fn test_scroll_respects_region_bounds() {
        let mut s = surface(10, 10);
        let region = ScrollRegion {
            top: 2,
            bottom: 5,
            left: 1,
            right: 3,
        };
        paint_cell(&mut s, 6, 1, INK); // below the region
        paint_cell(&mut s, 2, 0, INK); // left of the region
        paint_cell(&mut s, 3, 2, INK); // inside, should move up to row 2
        s.scroll_region(&region, 1, BG);
        assert_eq!(cell_color(&s, 6, 1), INK.packed());
        assert_eq!(cell_color(&s, 2, 0), INK.packed());
        assert_eq!(cell_color(&s, 2, 2), INK.packed());
        assert_eq!(cell_color(&s, 5, 2), BG.packed());
    }

    #[test]
    fn test_scroll_larger_than_region_just_fills() {
        let mut s = surface(10, 4);
        let region = ScrollRegion::full(10, 4);
        for row in 0..4 {
            paint_cell(&mut s, row, 0, INK);
        }
        s.scroll_region(&region, 9, BG);
        for row in 0..4 {
            assert_eq!(cell_color(&s, row, 0), BG.packed(), "row {row}");
        }
    }

    #[test]
    fn test_scroll_with_crossed_bounds_is_skipped() {
        let mut s = surface(10, 10);
        paint_cell(&mut s, 0, 0, INK);
        let region = ScrollRegion {
            top: 5,
            bottom: 2,
            left: 0,
            right: 9,
        };
        s.scroll_region(&region, 1, BG);
        assert_eq!(cell_color(&s, 0, 0), INK.packed());
    }
}
