// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Justification: distributing horizontal slack across a line.
//!
//! Every glyph carries a stretch/shrink factor with a priority class.
//! Priorities are consumed lowest first; the first class whose capacity
//! covers the remaining slack gets a fractional scale and higher classes
//! stay untouched. Whitespace is unconstrained: once its class is reached it
//! absorbs any remainder outright. Advances are mutated in place, converted
//! through each run's scale.

use crate::font::Font;
use crate::glyph::GlyphString;
use crate::style::Brush;
use crate::util::{nearly_zero, is_space};

/// Stretch/shrink priority, consumed lowest first.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
#[repr(u8)]
pub enum Priority {
    Kashida = 0,
    Whitespace = 1,
    Letter = 2,
    Null = 3,
}

/// Per-glyph justification factor, as fractions of the glyph's advance.
#[derive(Copy, Clone, Debug)]
pub struct StretchFactor {
    pub before: f32,
    pub after: f32,
    pub priority: Priority,
    pub unconstrained: bool,
}

/// Distributes a signed gap across a line's advances.
pub trait Justify<B: Brush, F: Font>: Send + Sync {
    /// Adds `gap` layout units of advance across the line (negative gaps
    /// shrink). The line's total advance changes by exactly `gap`.
    fn justify(&self, line: &mut GlyphString<B, F>, gap: f32);
}

/// The default priority/factor justifier.
#[derive(Copy, Clone, Debug)]
pub struct PriorityJustifier {
    /// Per-side whitespace factor, both directions.
    pub whitespace_factor: f32,
    /// Per-side letter stretch factor.
    pub letter_grow: f32,
    /// Per-side letter shrink factor.
    pub letter_shrink: f32,
}

impl Default for PriorityJustifier {
    fn default() -> Self {
        Self {
            whitespace_factor: 0.5,
            letter_grow: 37. / 256.,
            letter_shrink: 11. / 256.,
        }
    }
}

struct GlyphRef {
    run: usize,
    local: usize,
    /// Scaled advance in layout units.
    advance: f32,
    /// Layout units per font unit of the owning run.
    scale: f32,
}

impl<B: Brush, F: Font> Justify<B, F> for PriorityJustifier {
    fn justify(&self, line: &mut GlyphString<B, F>, gap: f32) {
        if nearly_zero(gap) {
            return;
        }
        let grow = gap > 0.;

        let mut glyphs: Vec<GlyphRef> = Vec::with_capacity(line.len());
        let mut factors: Vec<StretchFactor> = Vec::with_capacity(line.len());
        for (run_index, run) in line.runs().iter().enumerate() {
            let scale = run.scale();
            for (local, (&glyph, position)) in
                run.glyphs().iter().zip(run.positions()).enumerate()
            {
                let source = line.chars[run.string_indices()[local]];
                let factor = if run.font().is_mark(glyph) {
                    // Marks glue to their base: inherit the previous factor,
                    // zero its own leading edge and the base's trailing edge.
                    let mut inherited = factors.last().copied().unwrap_or(StretchFactor {
                        before: 0.,
                        after: 0.,
                        priority: Priority::Null,
                        unconstrained: false,
                    });
                    if let Some(prev) = factors.last_mut() {
                        prev.after = 0.;
                    }
                    inherited.before = 0.;
                    inherited
                } else if is_space(source) || source == '\t' {
                    StretchFactor {
                        before: self.whitespace_factor,
                        after: self.whitespace_factor,
                        priority: Priority::Whitespace,
                        unconstrained: true,
                    }
                } else {
                    let side = if grow {
                        self.letter_grow
                    } else {
                        self.letter_shrink
                    };
                    StretchFactor {
                        before: side,
                        after: side,
                        priority: Priority::Letter,
                        unconstrained: false,
                    }
                };
                factors.push(factor);
                glyphs.push(GlyphRef {
                    run: run_index,
                    local,
                    advance: position.x_advance * scale,
                    scale,
                });
            }
        }
        let count = glyphs.len();
        if count == 0 {
            return;
        }
        factors[0].before = 0.;
        factors[count - 1].after = 0.;

        // Capacity per glyph and per priority class.
        let capacity: Vec<f32> = factors
            .iter()
            .zip(&glyphs)
            .map(|(f, g)| (f.before + f.after) * g.advance.abs())
            .collect();
        let mut sums = [0f32; 4];
        for (f, c) in factors.iter().zip(&capacity) {
            sums[f.priority as usize] += c;
        }

        let mut scales = [0f32; 4];
        let mut extra = vec![0f32; count];
        let mut remaining = gap.abs();
        let mut last_used: Option<usize> = None;
        for p in 0..4 {
            if nearly_zero(sums[p]) {
                continue;
            }
            last_used = Some(p);
            if remaining <= sums[p] {
                scales[p] = remaining / sums[p];
                remaining = 0.;
                break;
            }
            scales[p] = 1.;
            remaining -= sums[p];
            let unconstrained: Vec<usize> = factors
                .iter()
                .enumerate()
                .filter(|(i, f)| f.priority as usize == p && f.unconstrained && capacity[*i] > 0.)
                .map(|(i, _)| i)
                .collect();
            if !unconstrained.is_empty() {
                let total: f32 = unconstrained.iter().map(|&i| capacity[i]).sum();
                for &i in &unconstrained {
                    extra[i] = remaining * capacity[i] / total;
                }
                remaining = 0.;
                break;
            }
        }
        // Slack left after every priority: overdrive the last class that had
        // any capacity, violating its factor. Shrinking never overdrives;
        // squeezing glyphs past their shrink factor would make them overlap,
        // so an overfull line simply stays overfull.
        if remaining > 0. && grow {
            if let Some(p) = last_used {
                scales[p] += remaining / sums[p];
            }
        }

        let sign = if grow { 1. } else { -1. };
        let distance = |i: usize| -> f32 {
            let own = factors[i].after * glyphs[i].advance.abs() * scales[factors[i].priority as usize];
            let next = if i + 1 < count {
                factors[i + 1].before
                    * glyphs[i + 1].advance.abs()
                    * scales[factors[i + 1].priority as usize]
            } else {
                0.
            };
            sign * (own + next + extra[i])
        };

        for i in 0..count {
            let d = distance(i);
            if nearly_zero(d) {
                continue;
            }
            let g = &glyphs[i];
            if nearly_zero(g.scale) {
                continue;
            }
            line.runs_mut()[g.run].positions_mut()[g.local].x_advance += d / g.scale;
        }
    }
}
