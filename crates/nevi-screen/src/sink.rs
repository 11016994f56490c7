//! Outbound signal seam
//!
//! The interpreter's only outward effects beyond the pixel surface go
//! through this trait, so embedders wire it to window chrome and tests can
//! record it.

use nevi_render::Rgb;

/// Receives signals the interpreter emits toward external collaborators.
pub trait ScreenSink {
    /// The default page background changed; the hosting chrome should
    /// repaint everything outside the grid.
    fn background_changed(&mut self, color: Rgb);
}

/// Sink that drops every signal.
#[derive(Debug, Default)]
pub struct NullSink;

impl ScreenSink for NullSink {
    fn background_changed(&mut self, _color: Rgb) {}
}

/// Sink that records every signal, for tests and embedder debugging.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub backgrounds: Vec<Rgb>,
}

impl ScreenSink for RecordingSink {
    fn background_changed(&mut self, color: Rgb) {
        self.backgrounds.push(color);
    }
}
