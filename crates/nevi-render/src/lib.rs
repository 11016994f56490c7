//! Pixel rendering for Nevi
//!
//! Rasterizes the character grid of an embedded Neovim-style UI into an
//! oversampled pixel surface, with glyph and color caches to keep per-frame
//! cost low.

pub mod color;
pub mod font;
pub mod glyph;
pub mod metrics;
pub mod surface;

pub use color::{ColorCache, Rgb};
pub use font::{FontSpec, FontdueRasterizer, GlyphRasterizer, GlyphStyle, HeadlessRasterizer};
pub use glyph::{CellBitmap, GlyphCache, GlyphKey};
pub use metrics::CellMetrics;
pub use surface::{GridSurface, ScrollRegion};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Packed color out of range: {0}")]
    InvalidColor(i64),

    #[error("Font error: {0}")]
    Font(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
