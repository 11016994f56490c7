//! Batch-level interpreter tests against the headless rasterizer.

use nevi_render::{CellMetrics, FontSpec, HeadlessRasterizer, Rgb};
use nevi_screen::{RecordingSink, RedrawInterpreter};
use nevi_test_utils as fx;
use pretty_assertions::assert_eq;
use serde_json::json;

const BLACK: u32 = 0;

fn interpreter(cols: u16, rows: u16) -> RedrawInterpreter<RecordingSink> {
    fx::init_test_logging();
    let metrics = CellMetrics::default();
    RedrawInterpreter::new(
        metrics,
        FontSpec::default(),
        Box::new(HeadlessRasterizer::new(&metrics)),
        cols,
        rows,
        RecordingSink::default(),
    )
}

/// A device pixel inside the glyph block of a cell.
fn ink_probe(interp: &RedrawInterpreter<RecordingSink>, row: u16, col: u16) -> u32 {
    let (x, y) = interp.surface().cell_origin(row, col);
    interp.surface().pixel(x + 4, y + 4)
}

#[test]
fn resize_clear_put_goto_scenario() {
    let mut interp = interpreter(80, 24);
    interp.apply_batch(&[
        fx::resize(10, 3),
        fx::clear(),
        fx::put_str("Hi"),
        fx::cursor_goto(0, 0),
    ]);

    let surface = interp.surface();
    assert_eq!((surface.cols(), surface.rows()), (10, 3));
    // "Hi" painted at row 0, cols 0-1; col 2 untouched background.
    assert_ne!(ink_probe(&interp, 0, 0), BLACK);
    assert_ne!(ink_probe(&interp, 0, 1), BLACK);
    assert_eq!(ink_probe(&interp, 0, 2), BLACK);
    // Cursor visually repositioned to the top-left cell.
    assert_eq!(surface.cursor(), (0, 0));
    assert_eq!(surface.cursor_overlay_px(), (-1, -1));
}

#[test]
fn put_advances_cursor_without_wrapping() {
    let mut interp = interpreter(10, 3);
    interp.apply_batch(&[fx::cursor_goto(1, 7), fx::put_str("abcd")]);
    // Four cells painted from col 7; cursor walked past the right edge.
    assert_ne!(ink_probe(&interp, 1, 7), BLACK);
    assert_ne!(ink_probe(&interp, 1, 9), BLACK);
    assert_eq!(interp.surface().cursor(), (1, 11));
    // Nothing wrapped onto row 2.
    assert_eq!(ink_probe(&interp, 2, 0), BLACK);
}

#[test]
fn unknown_command_does_not_abort_batch() {
    let mut interp = interpreter(10, 3);
    interp.apply_batch(&[
        fx::cmd("mode_change", vec![json!(["insert", 0])]),
        fx::put_str("x"),
    ]);
    assert_ne!(ink_probe(&interp, 0, 0), BLACK);
}

#[test]
fn malformed_command_is_skipped_not_fatal() {
    let mut interp = interpreter(10, 3);
    interp.apply_batch(&[
        fx::cmd("cursor_goto", vec![json!(["not", "cells"])]),
        fx::put_str("x"),
    ]);
    // The bad goto was dropped; put painted at the unmoved cursor.
    assert_eq!(interp.surface().cursor(), (0, 1));
    assert_ne!(ink_probe(&interp, 0, 0), BLACK);
}

#[test]
fn update_bg_notifies_page_background_collaborator() {
    let mut interp = interpreter(10, 3);
    interp.apply_batch(&[fx::update_bg(0x0000FF), fx::update_bg(0xFF0000)]);
    assert_eq!(
        interp.sink().backgrounds,
        vec![Rgb::new(0, 0, 255), Rgb::new(255, 0, 0)]
    );
}

#[test]
fn clear_uses_effective_background() {
    let mut interp = interpreter(10, 3);
    interp.apply_batch(&[
        fx::highlight_set(json!({"background": 0x123456})),
        fx::clear(),
    ]);
    assert_eq!(
        ink_probe(&interp, 2, 9),
        Rgb::new(0x12, 0x34, 0x56).packed()
    );
    assert_eq!(interp.surface().cursor(), (0, 0));
}

#[test]
fn painted_cells_are_frozen_across_highlight_changes() {
    let mut interp = interpreter(10, 3);
    interp.apply_batch(&[
        fx::highlight_set(json!({"foreground": 0xFF0000})),
        fx::put_str("a"),
    ]);
    let before = ink_probe(&interp, 0, 0);

    interp.apply_batch(&[fx::highlight_set(json!({"foreground": 0x00FF00}))]);
    assert_eq!(ink_probe(&interp, 0, 0), before);

    // The same character under the new highlight is a distinct bitmap.
    interp.apply_batch(&[fx::cursor_goto(1, 0), fx::put_str("a")]);
    assert_ne!(ink_probe(&interp, 1, 0), before);
    assert_eq!(interp.glyph_cache().len(), 2);
}

#[test]
fn scroll_moves_painted_content_within_region() {
    let mut interp = interpreter(10, 5);
    interp.apply_batch(&[
        fx::cursor_goto(3, 0),
        fx::put_str("z"),
        fx::set_scroll_region(1, 4, 0, 9),
        fx::scroll(2),
    ]);
    // Row 3 content moved up two rows into row 1.
    assert_ne!(ink_probe(&interp, 1, 0), BLACK);
    assert_eq!(ink_probe(&interp, 3, 0), BLACK);
}

#[test]
fn scroll_defaults_to_full_grid_until_region_set() {
    let mut interp = interpreter(10, 5);
    assert_eq!(interp.scroll_region(), None);
    interp.apply_batch(&[fx::cursor_goto(4, 0), fx::put_str("z"), fx::scroll(4)]);
    assert_ne!(ink_probe(&interp, 0, 0), BLACK);
}

#[test]
fn repeated_resize_is_idempotent() {
    let mut interp = interpreter(80, 24);
    interp.apply_batch(&[fx::resize(80, 24), fx::resize(80, 24)]);
    let (w, h) = interp.surface().size_px();
    assert_eq!((w, h), (80 * 14, 24 * 30));
}

#[test]
fn glyph_cache_reuses_repeated_cells() {
    let mut interp = interpreter(20, 3);
    interp.apply_batch(&[fx::put_str("aaaaabbbbb")]);
    assert_eq!(interp.glyph_cache().len(), 2);
}
