// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line breaking.
//!
//! The default breaker is an optimizing best-fit: a dynamic program over the
//! paragraph's break candidates where each candidate stores the optimal line
//! sequence ending there. A line's cost grows with the square of its
//! normalized slack; hyphen breaks and consecutive hyphenated lines pay
//! extra. Overfull lines cost a flat maximum, so a single syllable wider
//! than the available width still lands on its own line instead of
//! disappearing.

use core::ops::Range;

use crate::font::Font;
use crate::glyph::GlyphString;
use crate::style::{Brush, ParagraphStyle};

/// Classification of a break candidate.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum BreakClass {
    /// After a run of spaces; free.
    Normal,
    /// At a syllable boundary inside a word; costs the hyphen penalty.
    Hyphen,
    /// At a `\n` or the end of the paragraph; always taken.
    Mandatory,
}

/// A break candidate in paragraph-local character coordinates.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Breakpoint {
    pub offset: usize,
    pub class: BreakClass,
}

/// The lines chosen for one paragraph at one available width.
///
/// The concatenation of `lines` always equals the input glyph string. When
/// `truncated` is set, the tail of the content was folded into the final
/// line because `max_lines` was reached.
#[derive(Clone, Debug)]
pub struct BrokenLines<B: Brush, F: Font> {
    pub lines: Vec<GlyphString<B, F>>,
    pub truncated: bool,
}

/// Chooses line breaks for a paragraph.
pub trait LineBreak<B: Brush, F: Font>: Send + Sync {
    /// Splits `string` into lines of at most `max_advance` layout units,
    /// honoring `style.max_lines`.
    fn break_lines(
        &self,
        string: &GlyphString<B, F>,
        breakpoints: &[Breakpoint],
        max_advance: f32,
        style: &ParagraphStyle,
    ) -> BrokenLines<B, F>;
}

const MAX_COST: f32 = 1_000_000.;
const COST_CAP: f32 = MAX_COST / 2.;

/// Optimizing breaker over the break candidate list.
#[derive(Copy, Clone, Debug)]
pub struct BestFitBreaker {
    /// Cost of ending a line at a hyphenation opportunity.
    pub hyphen_cost: f32,
    /// Extra cost for two hyphenated lines in a row.
    pub consecutive_hyphen_cost: f32,
}

impl Default for BestFitBreaker {
    fn default() -> Self {
        Self {
            hyphen_cost: 0.5,
            consecutive_hyphen_cost: 0.3,
        }
    }
}

struct Candidate {
    /// Absolute glyph offset of the break.
    glyph: usize,
    class: BreakClass,
}

struct Entry {
    /// Index of the predecessor candidate in the table.
    pred: usize,
    /// Total cost of the optimal sequence ending here.
    total: f32,
    /// Absolute glyph offset where the line ending here starts.
    line_start: usize,
    /// Whether the line ending here breaks at a hyphen.
    hyphen: bool,
}

impl BestFitBreaker {
    fn candidates<B: Brush, F: Font>(
        string: &GlyphString<B, F>,
        breakpoints: &[Breakpoint],
    ) -> Vec<Candidate> {
        let glyph_range = string.glyph_range();
        let text_range = string.text_range();
        let mut candidates: Vec<Candidate> = Vec::with_capacity(breakpoints.len() + 1);
        for point in breakpoints {
            // The string may be a mid-paragraph remainder; candidates
            // outside its text range belong to other lines.
            if point.offset <= text_range.start || point.offset > text_range.end {
                continue;
            }
            let glyph = string.glyph_for_char(point.offset);
            if glyph <= glyph_range.start || glyph > glyph_range.end {
                continue;
            }
            match candidates.last_mut() {
                Some(last) if last.glyph == glyph => {
                    // Prefer the cheaper class when offsets collide.
                    if last.class == BreakClass::Hyphen && point.class != BreakClass::Hyphen {
                        last.class = point.class;
                    }
                }
                _ => candidates.push(Candidate {
                    glyph,
                    class: point.class,
                }),
            }
        }
        match candidates.last_mut() {
            Some(last) if last.glyph == glyph_range.end => last.class = BreakClass::Mandatory,
            _ => candidates.push(Candidate {
                glyph: glyph_range.end,
                class: BreakClass::Mandatory,
            }),
        }
        candidates
    }

    fn cost(ratio: f32, class: BreakClass) -> f32 {
        if ratio < 0. {
            // Overfull. Scaling by the overflow keeps a lone oversized
            // syllable on its own line instead of gluing neighbors to it.
            return MAX_COST * (1. - ratio);
        }
        match class {
            // The last line of a paragraph may be arbitrarily short.
            BreakClass::Mandatory => 0.,
            _ => (ratio * ratio).min(COST_CAP),
        }
    }
}

impl<B: Brush, F: Font> LineBreak<B, F> for BestFitBreaker {
    fn break_lines(
        &self,
        string: &GlyphString<B, F>,
        breakpoints: &[Breakpoint],
        max_advance: f32,
        style: &ParagraphStyle,
    ) -> BrokenLines<B, F> {
        let glyph_range = string.glyph_range();
        if glyph_range.is_empty() {
            return BrokenLines {
                lines: Vec::new(),
                truncated: false,
            };
        }
        let start = glyph_range.start;
        let count = glyph_range.len();

        // Prefix sums of scaled advances, and per-position count of the
        // whitespace glyphs immediately preceding it: trailing spaces hang
        // and do not count against the measure.
        let mut prefix = Vec::with_capacity(count + 1);
        prefix.push(0f32);
        let mut trailing_ws = vec![0usize; count + 1];
        for local in 0..count {
            let glyph = start + local;
            prefix.push(prefix[local] + string.glyph_advance(glyph));
            trailing_ws[local + 1] = if string.is_whitespace(glyph) {
                trailing_ws[local] + 1
            } else {
                0
            };
        }
        let measure = |line_start: usize, line_end: usize| -> f32 {
            let trimmed = (line_end - start).saturating_sub(trailing_ws[line_end - start]);
            let trimmed = trimmed.max(line_start - start);
            prefix[trimmed] - prefix[line_start - start]
        };

        let candidates = Self::candidates(string, breakpoints);

        // Dynamic programming table; entry 0 is the paragraph start.
        let mut table: Vec<Entry> = vec![Entry {
            pred: 0,
            total: 0.,
            line_start: start,
            hyphen: false,
        }];
        let mut active = 0;
        let ends: Vec<usize> = core::iter::once(start)
            .chain(candidates.iter().map(|c| c.glyph))
            .collect();

        for (c_index, candidate) in candidates.iter().enumerate() {
            let k = c_index + 1;
            let mut best: Option<Entry> = None;
            for (i, pred) in table.iter().enumerate().skip(active) {
                let line_start = ends[i];
                let width = measure(line_start, candidate.glyph);
                let delta = max_advance - width;
                let ratio = if delta == 0. || max_advance <= 0. {
                    0.
                } else if max_advance.is_finite() {
                    delta / max_advance
                } else if delta < 0. {
                    -1.
                } else {
                    f32::MAX
                };
                if ratio < 0. && active == i {
                    active += 1;
                }
                let mut cost = Self::cost(ratio, candidate.class);
                if candidate.class == BreakClass::Hyphen {
                    cost += self.hyphen_cost;
                    if pred.hyphen {
                        cost += self.consecutive_hyphen_cost;
                    }
                }
                let total = pred.total + cost;
                if best.as_ref().is_none_or(|b| b.total >= total) {
                    best = Some(Entry {
                        pred: i,
                        total,
                        line_start,
                        hyphen: candidate.class == BreakClass::Hyphen,
                    });
                }
            }
            if candidate.class == BreakClass::Mandatory {
                // No line spans a mandatory break.
                active = k;
            }
            table.push(best.expect("the table always has a reachable predecessor"));
        }

        // Retrace the optimal path into line ranges.
        let mut ranges: Vec<Range<usize>> = Vec::new();
        let mut index = table.len() - 1;
        while index != 0 {
            let entry = &table[index];
            ranges.push(entry.line_start..ends[index]);
            index = entry.pred;
        }
        ranges.reverse();

        // Fold everything past max_lines into the final line.
        let mut truncated = false;
        if let Some(max_lines) = style.max_lines {
            let max_lines = max_lines.max(1);
            if ranges.len() > max_lines {
                let tail_start = ranges[max_lines - 1].start;
                let tail_end = ranges.last().map(|r| r.end).unwrap_or(tail_start);
                ranges.truncate(max_lines - 1);
                ranges.push(tail_start..tail_end);
                truncated = true;
                tracing::debug!(
                    target: "typeline::linebreak",
                    max_lines,
                    "paragraph exceeds max_lines; folding tail"
                );
            }
        }

        BrokenLines {
            lines: ranges.into_iter().map(|r| string.slice(r)).collect(),
            truncated,
        }
    }
}
