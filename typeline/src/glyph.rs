// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shaped glyph runs and strings.
//!
//! Glyph and character coordinates are paragraph-local and absolute: slicing
//! a [`GlyphString`] preserves the original indices, so `string_indices` and
//! `glyph_indices` stay valid across slices. Positions are in font units;
//! every consumer scales by `font_size / units_per_em` of the owning run.

use core::ops::Range;
use std::sync::Arc;

use crate::font::{Font, GlyphId, Position, Script};
use crate::style::{Brush, TextStyle};

/// A shaped run: glyphs, positions, and the character/glyph index mappings
/// for one resolved style run.
#[derive(Clone, Debug)]
pub struct GlyphRun<B: Brush, F: Font> {
    pub(crate) style: Arc<TextStyle<B, F>>,
    pub(crate) font: F,
    pub(crate) script: Option<Script>,
    pub(crate) bidi_level: u8,
    /// Absolute glyph range within the paragraph.
    pub(crate) glyph_range: Range<usize>,
    /// Absolute character range within the paragraph.
    pub(crate) text_range: Range<usize>,
    pub(crate) glyphs: Vec<GlyphId>,
    pub(crate) positions: Vec<Position>,
    /// Per glyph, the absolute character offset that produced it.
    /// Monotone non-decreasing.
    pub(crate) string_indices: Vec<usize>,
    /// Per character of `text_range`, the absolute glyph offset it maps to.
    /// Monotone non-decreasing and total.
    pub(crate) glyph_indices: Vec<usize>,
}

impl<B: Brush, F: Font> GlyphRun<B, F> {
    pub fn style(&self) -> &TextStyle<B, F> {
        &self.style
    }

    pub fn font(&self) -> &F {
        &self.font
    }

    pub fn script(&self) -> Option<Script> {
        self.script
    }

    pub fn bidi_level(&self) -> u8 {
        self.bidi_level
    }

    pub fn glyph_range(&self) -> Range<usize> {
        self.glyph_range.clone()
    }

    pub fn text_range(&self) -> Range<usize> {
        self.text_range.clone()
    }

    pub fn glyphs(&self) -> &[GlyphId] {
        &self.glyphs
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub(crate) fn positions_mut(&mut self) -> &mut [Position] {
        &mut self.positions
    }

    pub fn string_indices(&self) -> &[usize] {
        &self.string_indices
    }

    pub fn glyph_indices(&self) -> &[usize] {
        &self.glyph_indices
    }

    /// Layout units per font unit.
    pub fn scale(&self) -> f32 {
        let upem = self.font.metrics().units_per_em.max(1);
        self.style.font_size / upem as f32
    }

    /// Advance width of the run in layout units.
    pub fn advance(&self) -> f32 {
        let scale = self.scale();
        self.positions.iter().map(|p| p.x_advance * scale).sum()
    }

    /// Ascent above the baseline in layout units.
    pub fn ascent(&self) -> f32 {
        self.font.metrics().ascent * self.scale()
    }

    /// Descent below the baseline in layout units; positive down.
    pub fn descent(&self) -> f32 {
        -self.font.metrics().descent * self.scale()
    }

    /// Line height in layout units, honoring the style's override.
    pub fn height(&self) -> f32 {
        self.style
            .line_height
            .unwrap_or_else(|| self.font.metrics().height() * self.scale())
    }

    /// Slices the run to an absolute glyph subrange at a cluster boundary.
    pub(crate) fn slice(&self, range: Range<usize>) -> Self {
        debug_assert!(range.start >= self.glyph_range.start && range.end <= self.glyph_range.end);
        let local = (range.start - self.glyph_range.start)..(range.end - self.glyph_range.start);
        let text_start = self
            .string_indices
            .get(local.start)
            .copied()
            .unwrap_or(self.text_range.end);
        let text_end = if range.end == self.glyph_range.end {
            self.text_range.end
        } else {
            self.string_indices[local.end]
        };
        let index_local =
            (text_start - self.text_range.start)..(text_end - self.text_range.start);
        Self {
            style: self.style.clone(),
            font: self.font.clone(),
            script: self.script,
            bidi_level: self.bidi_level,
            glyph_range: range,
            text_range: text_start..text_end,
            glyphs: self.glyphs[local.clone()].to_vec(),
            positions: self.positions[local.clone()].to_vec(),
            string_indices: self.string_indices[local].to_vec(),
            glyph_indices: self.glyph_indices[index_local].to_vec(),
        }
    }
}

/// An ordered sequence of glyph runs sharing one paragraph's characters.
#[derive(Clone, Debug)]
pub struct GlyphString<B: Brush, F: Font> {
    pub(crate) chars: Arc<[char]>,
    pub(crate) runs: Vec<GlyphRun<B, F>>,
}

impl<B: Brush, F: Font> GlyphString<B, F> {
    pub(crate) fn new(chars: Arc<[char]>, runs: Vec<GlyphRun<B, F>>) -> Self {
        Self { chars, runs }
    }

    pub fn runs(&self) -> &[GlyphRun<B, F>] {
        &self.runs
    }

    pub(crate) fn runs_mut(&mut self) -> &mut [GlyphRun<B, F>] {
        &mut self.runs
    }

    /// Absolute glyph range covered by this string.
    pub fn glyph_range(&self) -> Range<usize> {
        match (self.runs.first(), self.runs.last()) {
            (Some(first), Some(last)) => first.glyph_range.start..last.glyph_range.end,
            _ => 0..0,
        }
    }

    /// Absolute character range covered by this string.
    pub fn text_range(&self) -> Range<usize> {
        match (self.runs.first(), self.runs.last()) {
            (Some(first), Some(last)) => first.text_range.start..last.text_range.end,
            _ => 0..0,
        }
    }

    /// Number of glyphs.
    pub fn len(&self) -> usize {
        self.runs.iter().map(|run| run.glyphs.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|run| run.glyphs.is_empty())
    }

    /// Advance width in layout units.
    pub fn advance(&self) -> f32 {
        self.runs.iter().map(GlyphRun::advance).sum()
    }

    /// Height of the tallest run in layout units.
    pub fn height(&self) -> f32 {
        self.runs.iter().map(GlyphRun::height).fold(0., f32::max)
    }

    /// Ascent of the tallest run in layout units.
    pub fn ascent(&self) -> f32 {
        self.runs.iter().map(GlyphRun::ascent).fold(0., f32::max)
    }

    /// The source character that produced a glyph.
    pub fn char_for_glyph(&self, glyph_index: usize) -> Option<char> {
        let run = self.run_at(glyph_index)?;
        let local = glyph_index - run.glyph_range.start;
        self.chars.get(run.string_indices[local]).copied()
    }

    /// Whether the glyph's source character is whitespace.
    pub fn is_whitespace(&self, glyph_index: usize) -> bool {
        self.char_for_glyph(glyph_index)
            .is_some_and(crate::util::is_whitespace)
    }

    /// Scaled advance of a single glyph in layout units.
    pub fn glyph_advance(&self, glyph_index: usize) -> f32 {
        self.run_at(glyph_index)
            .map(|run| {
                let local = glyph_index - run.glyph_range.start;
                run.positions[local].x_advance * run.scale()
            })
            .unwrap_or(0.)
    }

    /// The absolute glyph offset a character offset maps to.
    ///
    /// A character offset equal to the end of the text range maps to the end
    /// of the glyph range.
    pub fn glyph_for_char(&self, char_offset: usize) -> usize {
        for run in &self.runs {
            if run.text_range.contains(&char_offset) {
                return run.glyph_indices[char_offset - run.text_range.start];
            }
        }
        self.glyph_range().end
    }

    fn run_at(&self, glyph_index: usize) -> Option<&GlyphRun<B, F>> {
        self.runs
            .iter()
            .find(|run| run.glyph_range.contains(&glyph_index))
    }

    /// Slices to an absolute glyph subrange, cloning the overlapped runs so
    /// the result owns its positions.
    pub fn slice(&self, range: Range<usize>) -> Self {
        let mut runs = Vec::new();
        for run in &self.runs {
            let start = run.glyph_range.start.max(range.start);
            let end = run.glyph_range.end.min(range.end);
            if start < end {
                runs.push(run.slice(start..end));
            }
        }
        Self {
            chars: self.chars.clone(),
            runs,
        }
    }

    /// Concatenates the source characters of the covered range.
    pub fn to_text(&self) -> String {
        let range = self.text_range();
        self.chars[range].iter().collect()
    }
}
