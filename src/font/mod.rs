//! Typeface handling for token labels.
//!
//! A [`FontHandle`] is created once at startup and shared read-only by every
//! render call. It wraps either a TrueType/OpenType face parsed by
//! `ab_glyph`, or the embedded bitmap face. Loading a face from disk can fail;
//! [`FontHandle::load_or_builtin`] turns that failure into a logged fallback.

pub mod builtin;

use crate::{Error, Result};
use ab_glyph::{point, Font, FontVec, Glyph, GlyphId, PxScale, ScaleFont};
use log::{info, warn};
use std::fmt;
use std::path::Path;

/// Ink bounding box of a piece of text, relative to the text origin
/// (the top-left corner of its line box). `right` and `bottom` are exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextBounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl TextBounds {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    fn union(self, other: TextBounds) -> TextBounds {
        if self.is_empty() {
            return other;
        }
        TextBounds {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

/// Immutable typeface used to measure and draw labels.
pub enum FontHandle {
    TrueType { font: FontVec, scale: PxScale },
    Builtin { px: f32, scale: u32 },
}

impl fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontHandle::TrueType { scale, .. } => f
                .debug_struct("TrueType")
                .field("px", &scale.y)
                .finish_non_exhaustive(),
            FontHandle::Builtin { px, scale } => f
                .debug_struct("Builtin")
                .field("px", px)
                .field("scale", scale)
                .finish(),
        }
    }
}

impl FontHandle {
    /// Parse a TrueType/OpenType face from memory.
    pub fn from_bytes(data: Vec<u8>, px: f32) -> Result<Self> {
        let font = FontVec::try_from_vec(data)
            .map_err(|e| Error::FontUnavailable(format!("failed to parse font data: {}", e)))?;
        Ok(FontHandle::TrueType {
            font,
            scale: PxScale::from(px),
        })
    }

    /// Load a TrueType/OpenType face from disk.
    pub fn from_file(path: impl AsRef<Path>, px: f32) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|e| Error::FontUnavailable(format!("{}: {}", path.display(), e)))?;
        Self::from_bytes(data, px)
            .map_err(|e| Error::FontUnavailable(format!("{}: {}", path.display(), e)))
    }

    /// The embedded bitmap face, scaled by an integer factor close to `px / 10`.
    pub fn builtin(px: f32) -> Self {
        let scale = (px / 10.0).round().max(1.0) as u32;
        FontHandle::Builtin { px, scale }
    }

    /// Load `path`, falling back to the embedded face when it is missing or corrupt.
    pub fn load_or_builtin(path: impl AsRef<Path>, px: f32) -> Self {
        match Self::from_file(path.as_ref(), px) {
            Ok(font) => {
                info!("Loaded font {} at {}px", path.as_ref().display(), px);
                font
            }
            Err(e) => {
                warn!("{}; using built-in font", e);
                Self::builtin(px)
            }
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, FontHandle::Builtin { .. })
    }

    /// Nominal pixel size the handle was created for.
    pub fn px_size(&self) -> f32 {
        match self {
            FontHandle::TrueType { scale, .. } => scale.y,
            FontHandle::Builtin { px, .. } => *px,
        }
    }

    /// Ink box of `text` drawn at origin (0, 0).
    pub fn text_bounds(&self, text: &str) -> TextBounds {
        match self {
            FontHandle::TrueType { font, scale } => {
                layout_glyphs(font, *scale, text, (0.0, 0.0))
                    .into_iter()
                    .filter_map(|g| font.outline_glyph(g))
                    .map(|outlined| {
                        let b = outlined.px_bounds();
                        TextBounds {
                            left: b.min.x.floor() as i32,
                            top: b.min.y.floor() as i32,
                            right: b.max.x.ceil() as i32,
                            bottom: b.max.y.ceil() as i32,
                        }
                    })
                    .fold(TextBounds::default(), TextBounds::union)
            }
            FontHandle::Builtin { scale, .. } => {
                let s = *scale as i32;
                let mut bounds = TextBounds::default();
                builtin::for_each_lit(text, |x, y| {
                    let (x, y) = (x as i32 * s, y as i32 * s);
                    bounds = bounds.union(TextBounds {
                        left: x,
                        top: y,
                        right: x + s,
                        bottom: y + s,
                    });
                });
                bounds
            }
        }
    }

    /// Rasterize `text` with its origin at `origin`, reporting every covered
    /// pixel to `plot` as `(x, y, coverage)` with coverage in `0.0..=1.0`.
    pub fn rasterize_text(&self, origin: (i32, i32), text: &str, mut plot: impl FnMut(i32, i32, f32)) {
        match self {
            FontHandle::TrueType { font, scale } => {
                let glyphs = layout_glyphs(font, *scale, text, (origin.0 as f32, origin.1 as f32));
                for outlined in glyphs.into_iter().filter_map(|g| font.outline_glyph(g)) {
                    let b = outlined.px_bounds();
                    let (gx, gy) = (b.min.x as i32, b.min.y as i32);
                    outlined.draw(|x, y, coverage| {
                        if coverage > 0.0 {
                            plot(gx + x as i32, gy + y as i32, coverage.min(1.0));
                        }
                    });
                }
            }
            FontHandle::Builtin { scale, .. } => {
                let s = *scale as i32;
                builtin::for_each_lit(text, |x, y| {
                    let (x0, y0) = (origin.0 + x as i32 * s, origin.1 + y as i32 * s);
                    for dy in 0..s {
                        for dx in 0..s {
                            plot(x0 + dx, y0 + dy, 1.0);
                        }
                    }
                });
            }
        }
    }
}

// Baseline sits one ascent below the origin.
fn layout_glyphs(font: &FontVec, scale: PxScale, text: &str, origin: (f32, f32)) -> Vec<Glyph> {
    let scaled = font.as_scaled(scale);
    let mut caret = point(origin.0, origin.1 + scaled.ascent());
    let mut prev: Option<GlyphId> = None;
    let mut glyphs = Vec::new();
    for ch in text.chars().filter(|c| !c.is_control()) {
        let id = scaled.glyph_id(ch);
        if let Some(prev) = prev {
            caret.x += scaled.kern(prev, id);
        }
        glyphs.push(id.with_scale_and_position(scale, caret));
        caret.x += scaled.h_advance(id);
        prev = Some(id);
    }
    glyphs
}
