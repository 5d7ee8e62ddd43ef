// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic font oracle for unit tests.
//!
//! One glyph per character (id = code point), fixed advances, an optional
//! `fi` ligature, and optional coverage limits for substitution tests. At
//! `font_size` 10 a letter advances 5.0 layout units and a space 2.5.

use core::ops::RangeInclusive;

use crate::font::{Font, FontFeature, FontMetrics, GlyphId, Position, Script, ShapedRun};

pub(crate) const UPEM: u16 = 1000;
pub(crate) const LETTER_ADVANCE: f32 = 500.;
pub(crate) const SPACE_ADVANCE: f32 = 250.;
pub(crate) const LIGATURE_ADVANCE: f32 = 800.;
pub(crate) const LIGATURE_ID: GlyphId = 0xF000_0001;

#[derive(Clone, PartialEq, Eq, Debug)]
pub(crate) struct TestFont {
    name: &'static str,
    coverage: Option<RangeInclusive<char>>,
    ligatures: bool,
}

impl TestFont {
    pub(crate) fn new() -> Self {
        Self {
            name: "test",
            coverage: None,
            ligatures: false,
        }
    }

    pub(crate) fn named(name: &'static str) -> Self {
        Self {
            name,
            coverage: None,
            ligatures: false,
        }
    }

    /// Restricts coverage to the given characters (controls and whitespace
    /// stay covered).
    pub(crate) fn with_coverage(mut self, coverage: RangeInclusive<char>) -> Self {
        self.coverage = Some(coverage);
        self
    }

    /// Enables the `fi` ligature.
    pub(crate) fn with_ligatures(mut self) -> Self {
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
                    x_advance: LIGATURE_ADVANCE,
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
