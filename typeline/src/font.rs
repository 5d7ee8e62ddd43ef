// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The font shaping oracle consumed by the layout pipeline.
//!
//! Typeline does not parse font files. Shaping, glyph lookup, and metrics are
//! provided by an implementation of [`Font`]; the crate reconciles the
//! resulting character/glyph index mappings and positions the output.

use core::fmt;

/// Identifier of a glyph within its font.
///
/// Id `0` is `.notdef` by OpenType convention; the default font substitution
/// treats it as "uncovered".
pub type GlyphId = u32;

/// A four-byte ISO 15924 script tag, e.g. `Latn` or `Arab`.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Script(pub [u8; 4]);

impl Script {
    /// Creates a tag from the first four bytes of a string, inserting spaces
    /// for any missing bytes.
    pub fn from_str_lossy(s: &str) -> Self {
        let mut bytes = [b' '; 4];
        for (i, b) in s.as_bytes().iter().enumerate().take(4) {
            bytes[i] = *b;
        }
        Self(bytes)
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, "{}", b as char)?;
        }
        Ok(())
    }
}

/// Glyph placement in font units.
///
/// Scaled to layout units by `font_size / units_per_em` of the owning run.
#[derive(Copy, Clone, Default, PartialEq, Debug)]
pub struct Position {
    pub x_advance: f32,
    pub y_advance: f32,
    pub x_offset: f32,
    pub y_offset: f32,
}

/// Raw shaping output for one substring.
///
/// `string_indices[i]` is the character offset (within the shaped substring)
/// that produced glyph `i`, and must be non-decreasing. The three vectors
/// must have equal length.
#[derive(Clone, Default, Debug)]
pub struct ShapedRun {
    pub glyphs: Vec<GlyphId>,
    pub positions: Vec<Position>,
    pub string_indices: Vec<usize>,
}

/// Scalar metrics for a font, in font units unless noted.
#[derive(Copy, Clone, Debug)]
pub struct FontMetrics {
    pub units_per_em: u16,
    /// Distance from the baseline to the top of the em box; positive up.
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the em box; negative.
    pub descent: f32,
    pub line_gap: f32,
    /// Position of the top of the underline relative to the baseline;
    /// negative below.
    pub underline_position: f32,
    pub underline_thickness: f32,
}

impl FontMetrics {
    /// Line height in font units.
    pub fn height(&self) -> f32 {
        self.ascent - self.descent + self.line_gap
    }
}

/// A font handle exposing shaping and metrics.
///
/// Implementations are expected to be cheap-to-clone handles (an `Arc` over
/// the decoded font is typical). The backing data is borrowed, not owned, by
/// the layout pipeline and must outlive any [`Block`](crate::Block) tree
/// produced from it.
pub trait Font: Clone + PartialEq + fmt::Debug + Send + Sync {
    /// Returns the scalar metrics for this font.
    fn metrics(&self) -> FontMetrics;

    /// Shapes `text` with the given OpenType features and script, returning
    /// glyphs in visual-run order with a non-decreasing character mapping.
    fn layout(&self, text: &str, features: &[FontFeature], script: Option<Script>) -> ShapedRun;

    /// Returns the glyph for a code point, or `None` when uncovered.
    fn glyph_for_char(&self, ch: char) -> Option<GlyphId>;

    /// Whether the glyph is a nonspacing mark that glues to its base.
    fn is_mark(&self, _glyph: GlyphId) -> bool {
        false
    }

    /// Whether the font carries color glyph tables (`sbix`/`COLR`/`CPAL`).
    /// A renderer hint only; the layout core ignores it.
    fn has_color_glyphs(&self) -> bool {
        false
    }
}

pub use crate::setting::FontFeature;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_tag_from_short_strings() {
        assert_eq!(Script::from_str_lossy("Latn").0, *b"Latn");
        assert_eq!(Script::from_str_lossy("Yi").0, *b"Yi  ");
    }
}
