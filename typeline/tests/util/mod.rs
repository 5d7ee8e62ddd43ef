// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared helpers for the integration tests: a deterministic font oracle and
//! a simple color brush.
//!
//! At `font_size` 10 a letter advances 5.0 layout units, a space 2.5, and a
//! line is 10.0 tall.

use core::ops::RangeInclusive;

use typeline::{
    Brush, Font, FontFeature, FontMetrics, GlyphId, Position, Script, ShapedRun, TextStyle,
};

const UPEM: u16 = 1000;
const LETTER_ADVANCE: f32 = 500.;
const SPACE_ADVANCE: f32 = 250.;
const LIGATURE_ID: GlyphId = 0xF000_0001;

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ColorBrush {
    pub color: [u8; 4],
}

impl Default for ColorBrush {
    fn default() -> Self {
        Self {
            color: [0, 0, 0, 255],
        }
    }
}

impl Brush for ColorBrush {}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TestFont {
    name: &'static str,
    coverage: Option<RangeInclusive<char>>,
    ligatures: bool,
}

impl TestFont {
    pub fn new() -> Self {
        Self {
            name: "test",
            coverage: None,
            ligatures: false,
        }
    }

    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            coverage: None,
            ligatures: false,
        }
    }

    pub fn with_coverage(mut self, coverage: RangeInclusive<char>) -> Self {
        self.coverage = Some(coverage);
        self
    }

    pub fn with_ligatures(mut self) -> Self {
        self.ligatures = true;
        self
    }

    fn advance_for(ch: char) -> f32 {
        match ch {
            '\n' | '\r' => 0.,
            ' ' | '\u{00A0}' | '\t' => SPACE_ADVANCE,
            '\u{0300}'..='\u{036F}' => 0.,
            _ => LETTER_ADVANCE,
        }
    }
}

impl Font for TestFont {
    fn metrics(&self) -> FontMetrics {
        FontMetrics {
            units_per_em: UPEM,
            ascent: 800.,
            descent: -200.,
            line_gap: 0.,
            underline_position: -100.,
            underline_thickness: 50.,
        }
    }

    fn layout(&self, text: &str, features: &[FontFeature], _script: Option<Script>) -> ShapedRun {
        let ligate = self.ligatures || features.contains(&FontFeature::new(*b"liga", 1));
        let chars: Vec<char> = text.chars().collect();
        let mut shaped = ShapedRun::default();
        let mut i = 0;
        while i < chars.len() {
            if ligate && chars[i] == 'f' && chars.get(i + 1) == Some(&'i') {
                shaped.glyphs.push(LIGATURE_ID);
                shaped.positions.push(Position {
                    x_advance: 800.,
                    ..Position::default()
                });
                shaped.string_indices.push(i);
                i += 2;
                continue;
            }
            let ch = chars[i];
            shaped.glyphs.push(self.glyph_for_char(ch).unwrap_or(0));
            shaped.positions.push(Position {
                x_advance: Self::advance_for(ch),
                ..Position::default()
            });
            shaped.string_indices.push(i);
            i += 1;
        }
        shaped
    }

    fn glyph_for_char(&self, ch: char) -> Option<GlyphId> {
        if let Some(coverage) = &self.coverage {
            if !coverage.contains(&ch) && !ch.is_control() && !ch.is_whitespace() {
                return None;
            }
        }
        Some(ch as GlyphId)
    }

    fn is_mark(&self, glyph: GlyphId) -> bool {
        (0x0300..=0x036F).contains(&glyph)
    }
}

/// A default style at size 10 with the test font.
pub fn default_style() -> TextStyle<ColorBrush, TestFont> {
    TextStyle {
        font: Some(TestFont::new()),
        font_size: 10.,
        ..TextStyle::default()
    }
}

pub fn ellipsis_glyph() -> GlyphId {
    '\u{2026}' as GlyphId
}
