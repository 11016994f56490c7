//! Highlight state
//!
//! The process-wide current attribute set and default colors. Highlight
//! changes replace the set wholesale; cells keep whatever attributes were
//! active when they were painted, so nothing here triggers repaints.

use crate::ScreenError;
use nevi_render::{ColorCache, FontSpec, GlyphKey, GlyphStyle, Rgb};
use serde::Deserialize;

/// Built-in fallbacks for colors the editor has not set yet.
const FALLBACK_FG: Rgb = Rgb::new(255, 255, 255);
const FALLBACK_BG: Rgb = Rgb::new(0, 0, 0);
const FALLBACK_SP: Rgb = Rgb::new(255, 0, 0);

/// One highlight attribute map as carried by `highlight_set`.
///
/// Absent colors mean "use default"; absent flags mean off.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct HighlightAttrs {
    pub foreground: Option<i64>,
    pub background: Option<i64>,
    pub special: Option<i64>,
    pub reverse: bool,
    pub italic: bool,
    pub bold: bool,
    pub underline: bool,
    pub undercurl: bool,
}

/// Currently active text attributes plus the process-wide default colors.
pub struct HighlightState {
    fg: Option<Rgb>,
    bg: Option<Rgb>,
    sp: Option<Rgb>,
    reverse: bool,
    italic: bool,
    bold: bool,
    underline: bool,
    undercurl: bool,
    default_fg: Option<Rgb>,
    default_bg: Option<Rgb>,
    default_sp: Option<Rgb>,
    font: FontSpec,
    colors: ColorCache,
}

impl HighlightState {
    pub fn new(font: FontSpec) -> Self {
        Self {
            fg: None,
            bg: None,
            sp: None,
            reverse: false,
            italic: false,
            bold: false,
            underline: false,
            undercurl: false,
            default_fg: None,
            default_bg: None,
            default_sp: None,
            font,
            colors: ColorCache::new(),
        }
    }

    /// Replace the full current attribute set.
    pub fn set_highlight(&mut self, attrs: &HighlightAttrs) -> Result<(), ScreenError> {
        self.fg = self.colors.decode(normalize(attrs.foreground))?;
        self.bg = self.colors.decode(normalize(attrs.background))?;
        self.sp = self.colors.decode(normalize(attrs.special))?;
        self.reverse = attrs.reverse;
        self.italic = attrs.italic;
        self.bold = attrs.bold;
        self.underline = attrs.underline;
        self.undercurl = attrs.undercurl;
        Ok(())
    }

    pub fn set_default_foreground(&mut self, packed: Option<i64>) -> Result<(), ScreenError> {
        self.default_fg = self.colors.decode(normalize(packed))?;
        Ok(())
    }

    /// Returns the decoded color so the page-background collaborator can be
    /// notified.
    pub fn set_default_background(
        &mut self,
        packed: Option<i64>,
    ) -> Result<Option<Rgb>, ScreenError> {
        self.default_bg = self.colors.decode(normalize(packed))?;
        Ok(self.default_bg)
    }

    pub fn set_default_special(&mut self, packed: Option<i64>) -> Result<(), ScreenError> {
        self.default_sp = self.colors.decode(normalize(packed))?;
        Ok(())
    }

    /// Foreground actually painted with: highlight value else default, with
    /// fg/bg swapped under reverse video.
    pub fn effective_foreground(&self) -> Rgb {
        if self.reverse {
            self.bg.or(self.default_bg).unwrap_or(FALLBACK_BG)
        } else {
            self.fg.or(self.default_fg).unwrap_or(FALLBACK_FG)
        }
    }

    pub fn effective_background(&self) -> Rgb {
        if self.reverse {
            self.fg.or(self.default_fg).unwrap_or(FALLBACK_FG)
        } else {
            self.bg.or(self.default_bg).unwrap_or(FALLBACK_BG)
        }
    }

    /// The special (undercurl) color is never swapped by reverse video.
    pub fn effective_special(&self) -> Rgb {
        self.sp.or(self.default_sp).unwrap_or(FALLBACK_SP)
    }

    pub fn style(&self) -> GlyphStyle {
        GlyphStyle {
            italic: self.italic,
            bold: self.bold,
        }
    }

    /// Font descriptor for the current style, e.g. `bold 12px SFMono-Light`.
    pub fn font(&self) -> String {
        self.font.descriptor(self.style())
    }

    /// Glyph cache key for painting `c` under the current attributes.
    pub fn glyph_key(&self, c: char) -> GlyphKey {
        GlyphKey {
            c,
            fg: self.effective_foreground(),
            bg: self.effective_background(),
            sp: self.effective_special(),
            style: self.style(),
            underline: self.underline,
            undercurl: self.undercurl,
        }
    }

    /// Number of distinct packed colors decoded so far.
    pub fn color_cache_len(&self) -> usize {
        self.colors.len()
    }
}

/// Neovim sends negative packed colors (usually `-1`) for "unset"; treat
/// them as no override before the strict decode.
fn normalize(packed: Option<i64>) -> Option<i64> {
    packed.filter(|v| *v >= 0)
}
