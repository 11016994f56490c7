//! Redraw protocol interpretation for Nevi
//!
//! Consumes batches of already-decoded redraw commands from an embedded
//! Neovim-style editor and drives the pixel surface, highlight state, and
//! glyph cache in `nevi-render`. Also owns the viewport sizing policy that
//! turns window sizes into debounced grid-resize requests.

pub mod highlight;
pub mod redraw;
pub mod sink;
pub mod viewport;

pub use highlight::{HighlightAttrs, HighlightState};
pub use redraw::{RedrawCommand, RedrawInterpreter};
pub use sink::{NullSink, RecordingSink, ScreenSink};
pub use viewport::{ResizeDebouncer, ViewportPolicy};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScreenError {
    #[error("Malformed arguments for `{command}`: {detail}")]
    BadArgs { command: String, detail: String },

    #[error(transparent)]
    Render(#[from] nevi_render::RenderError),
}
