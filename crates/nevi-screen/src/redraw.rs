//! Redraw command interpreter
//!
//! Turns ordered batches of `(name, args)` tuples into mutations of the
//! highlight state and paints on the grid surface. The vocabulary is a
//! closed enum; names outside it parse to `Unknown` and are logged and
//! skipped without aborting the batch. Each command's args is a sequence of
//! parameter lists, one per coalesced invocation, applied in order.

use crate::highlight::{HighlightAttrs, HighlightState};
use crate::sink::ScreenSink;
use crate::ScreenError;
use nevi_render::{
    CellMetrics, FontSpec, GlyphCache, GlyphRasterizer, GridSurface, ScrollRegion,
};
use serde_json::Value;
use tracing::warn;

/// One decoded redraw command invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum RedrawCommand {
    /// Characters to paint at the cursor, advancing one column each.
    Put(Vec<char>),
    CursorGoto { row: u16, col: u16 },
    Clear,
    EolClear,
    HighlightSet(HighlightAttrs),
    UpdateFg(Option<i64>),
    UpdateBg(Option<i64>),
    UpdateSp(Option<i64>),
    SetScrollRegion(ScrollRegion),
    Scroll(i64),
    Resize { cols: u16, rows: u16 },
    /// A name outside the vocabulary; handled explicitly, never fatal.
    Unknown { name: String },
}

impl RedrawCommand {
    /// Decode every invocation of one command tuple, in arrival order.
    ///
    /// `put` coalesces into a single invocation painting all cells;
    /// everything else yields one command per parameter list.
    pub fn parse(name: &str, args: &[Value]) -> Result<Vec<RedrawCommand>, ScreenError> {
        let cmds = match name {
            "put" => {
                let mut cells = Vec::with_capacity(args.len());
                for list in args {
                    let text = str_arg(name, list, 0)?;
                    cells.extend(text.chars().next());
                }
                vec![RedrawCommand::Put(cells)]
            }
            "cursor_goto" => args
                .iter()
                .map(|list| {
                    Ok(RedrawCommand::CursorGoto {
                        row: cell_arg(name, list, 0)?,
                        col: cell_arg(name, list, 1)?,
                    })
                })
                .collect::<Result<_, ScreenError>>()?,
            "clear" => vec![RedrawCommand::Clear],
            "eol_clear" => vec![RedrawCommand::EolClear],
            "highlight_set" => args
                .iter()
                .map(|list| Ok(RedrawCommand::HighlightSet(attrs_arg(name, list)?)))
                .collect::<Result<_, ScreenError>>()?,
            "update_fg" => colors(name, args, RedrawCommand::UpdateFg)?,
            "update_bg" => colors(name, args, RedrawCommand::UpdateBg)?,
            "update_sp" => colors(name, args, RedrawCommand::UpdateSp)?,
            "set_scroll_region" => args
                .iter()
                .map(|list| {
                    Ok(RedrawCommand::SetScrollRegion(ScrollRegion {
                        top: cell_arg(name, list, 0)?,
                        bottom: cell_arg(name, list, 1)?,
                        left: cell_arg(name, list, 2)?,
                        right: cell_arg(name, list, 3)?,
                    }))
                })
                .collect::<Result<_, ScreenError>>()?,
            "scroll" => args
                .iter()
                .map(|list| Ok(RedrawCommand::Scroll(int_arg(name, list, 0)?)))
                .collect::<Result<_, ScreenError>>()?,
            "resize" => args
                .iter()
                .map(|list| {
                    Ok(RedrawCommand::Resize {
                        cols: cell_arg(name, list, 0)?,
                        rows: cell_arg(name, list, 1)?,
                    })
                })
                .collect::<Result<_, ScreenError>>()?,
            _ => vec![RedrawCommand::Unknown {
                name: name.to_string(),
            }],
        };
        Ok(cmds)
    }
}

fn bad_args(command: &str, detail: impl Into<String>) -> ScreenError {
    ScreenError::BadArgs {
        command: command.to_string(),
        detail: detail.into(),
    }
}

fn element<'a>(command: &str, list: &'a Value, index: usize) -> Result<&'a Value, ScreenError> {
    list.as_array()
        .and_then(|l| l.get(index))
        .ok_or_else(|| bad_args(command, format!("missing argument {index}")))
}

fn str_arg<'a>(command: &str, list: &'a Value, index: usize) -> Result<&'a str, ScreenError> {
    element(command, list, index)?
        .as_str()
        .ok_or_else(|| bad_args(command, format!("argument {index} is not a string")))
}

fn int_arg(command: &str, list: &Value, index: usize) -> Result<i64, ScreenError> {
    element(command, list, index)?
        .as_i64()
        .ok_or_else(|| bad_args(command, format!("argument {index} is not an integer")))
}

/// A cell coordinate or count: a non-negative integer that fits the grid.
fn cell_arg(command: &str, list: &Value, index: usize) -> Result<u16, ScreenError> {
    let v = int_arg(command, list, index)?;
    u16::try_from(v).map_err(|_| bad_args(command, format!("argument {index} out of range: {v}")))
}

/// Packed color argument; `null` means "no override".
fn color_arg(command: &str, list: &Value, index: usize) -> Result<Option<i64>, ScreenError> {
    let v = element(command, list, index)?;
    if v.is_null() {
        return Ok(None);
    }
    v.as_i64()
        .map(Some)
        .ok_or_else(|| bad_args(command, format!("argument {index} is not a color")))
}

/// Highlight attribute map, the first element of a `highlight_set` list.
fn attrs_arg(command: &str, list: &Value) -> Result<HighlightAttrs, ScreenError> {
    let v = element(command, list, 0)?;
    serde_json::from_value(v.clone())
        .map_err(|e| bad_args(command, format!("bad attribute map: {e}")))
}

fn colors(
    command: &str,
    args: &[Value],
    wrap: fn(Option<i64>) -> RedrawCommand,
) -> Result<Vec<RedrawCommand>, ScreenError> {
    args.iter()
        .map(|list| Ok(wrap(color_arg(command, list, 0)?)))
        .collect()
}

/// The redraw state machine: owns all screen state and processes batches to
/// completion, one at a time.
pub struct RedrawInterpreter<S: ScreenSink> {
    highlight: HighlightState,
    glyphs: GlyphCache,
    surface: GridSurface,
    scroll_region: Option<ScrollRegion>,
    sink: S,
}

impl<S: ScreenSink> RedrawInterpreter<S> {
    pub fn new(
        metrics: CellMetrics,
        font: FontSpec,
        rasterizer: Box<dyn GlyphRasterizer>,
        cols: u16,
        rows: u16,
        sink: S,
    ) -> Self {
        let highlight = HighlightState::new(font);
        let surface = GridSurface::new(metrics, cols, rows, highlight.effective_background());
        Self {
            highlight,
            glyphs: GlyphCache::new(metrics, rasterizer),
            surface,
            scroll_region: None,
            sink,
        }
    }

    /// Process one batch to completion, in order. Unknown or malformed
    /// commands are logged and skipped; the batch never aborts partway.
    pub fn apply_batch(&mut self, batch: &[(String, Vec<Value>)]) {
        for (name, args) in batch {
            match RedrawCommand::parse(name, args) {
                Ok(cmds) => {
                    for cmd in cmds {
                        self.apply(cmd);
                    }
                }
                Err(e) => {
                    warn!(command = %name, error = %e, "skipping malformed redraw command");
                }
            }
        }
    }

    /// Apply a single decoded command.
    pub fn apply(&mut self, cmd: RedrawCommand) {
        match cmd {
            RedrawCommand::Put(cells) => {
                for c in cells {
                    let bitmap = self.glyphs.bitmap(self.highlight.glyph_key(c));
                    let (row, col) = self.surface.cursor();
                    self.surface.blit(&bitmap, row, col);
                    self.surface.advance_cursor();
                }
            }
            RedrawCommand::CursorGoto { row, col } => {
                self.surface.move_cursor_to(row, col);
            }
            RedrawCommand::Clear => {
                let bg = self.highlight.effective_background();
                self.surface.clear_all(bg);
            }
            RedrawCommand::EolClear => {
                let bg = self.highlight.effective_background();
                self.surface.clear_to_eol(bg);
            }
            RedrawCommand::HighlightSet(attrs) => {
                if let Err(e) = self.highlight.set_highlight(&attrs) {
                    warn!(error = %e, "skipping highlight with undecodable color");
                }
            }
            RedrawCommand::UpdateFg(color) => {
                if let Err(e) = self.highlight.set_default_foreground(color) {
                    warn!(error = %e, "skipping default foreground update");
                }
            }
            RedrawCommand::UpdateBg(color) => match self.highlight.set_default_background(color) {
                Ok(Some(bg)) => self.sink.background_changed(bg),
                Ok(None) => {}
                Err(e) => warn!(error = %e, "skipping default background update"),
            },
            RedrawCommand::UpdateSp(color) => {
                if let Err(e) = self.highlight.set_default_special(color) {
                    warn!(error = %e, "skipping default special update");
                }
            }
            RedrawCommand::SetScrollRegion(region) => {
                if region.is_valid() {
                    self.scroll_region = Some(region);
                } else {
                    warn!(?region, "ignoring scroll region with crossed bounds");
                }
            }
            RedrawCommand::Scroll(count) => {
                let region = self
                    .scroll_region
                    .unwrap_or_else(|| ScrollRegion::full(self.surface.cols(), self.surface.rows()));
                let bg = self.highlight.effective_background();
                self.surface.scroll_region(&region, count, bg);
            }
            RedrawCommand::Resize { cols, rows } => {
                let bg = self.highlight.effective_background();
                self.surface.resize_to(cols, rows, bg);
            }
            RedrawCommand::Unknown { name } => {
                warn!(command = %name, "unknown redraw command");
            }
        }
    }

    pub fn surface(&self) -> &GridSurface {
        &self.surface
    }

    pub fn highlight(&self) -> &HighlightState {
        &self.highlight
    }

    pub fn glyph_cache(&self) -> &GlyphCache {
        &self.glyphs
    }

    /// The explicitly set scroll region, if any; `None` scrolls the full
    /// grid.
    pub fn scroll_region(&self) -> Option<ScrollRegion> {
        self.scroll_region
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
