// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Truncation: replacing elided content with an ellipsis.
//!
//! Invoked on the last line of a truncated paragraph. The elided glyph range
//! is chosen to minimize overflow of the line box; the ellipsis is shaped
//! with the line's dominant font so it inherits that run's size and style.

use crate::font::Font;
use crate::glyph::{GlyphRun, GlyphString};
use crate::style::{Brush, TruncationMode};
use crate::util::is_whitespace;

/// Elides part of an overlong line, replacing it with an ellipsis.
pub trait Truncate<B: Brush, F: Font>: Send + Sync {
    fn truncate(&self, line: &mut GlyphString<B, F>, max_advance: f32, mode: TruncationMode);
}

/// Default truncation engine.
#[derive(Copy, Clone, Debug)]
pub struct EllipsisTruncator {
    pub ellipsis: char,
}

impl Default for EllipsisTruncator {
    fn default() -> Self {
        Self { ellipsis: '\u{2026}' }
    }
}

impl EllipsisTruncator {
    /// The run carrying the most glyphs decides the ellipsis style.
    fn dominant_run<'s, B: Brush, F: Font>(
        line: &'s GlyphString<B, F>,
    ) -> Option<&'s GlyphRun<B, F>> {
        line.runs().iter().max_by_key(|run| run.glyphs().len())
    }

    fn shape_ellipsis<B: Brush, F: Font>(
        &self,
        template: &GlyphRun<B, F>,
        source_index: usize,
    ) -> GlyphRun<B, F> {
        let text = self.ellipsis.to_string();
        let shaped = template
            .font()
            .layout(&text, &template.style().features, template.script());
        let count = shaped.glyphs.len();
        GlyphRun {
            style: template.style.clone(),
            font: template.font.clone(),
            script: template.script,
            bidi_level: template.bidi_level,
            glyph_range: 0..count,
            // The ellipsis replaces elided text; it covers no characters of
            // its own.
            text_range: source_index..source_index,
            glyphs: shaped.glyphs,
            positions: shaped.positions,
            string_indices: vec![source_index; count],
            glyph_indices: Vec::new(),
        }
    }
}

impl<B: Brush, F: Font> Truncate<B, F> for EllipsisTruncator {
    fn truncate(&self, line: &mut GlyphString<B, F>, max_advance: f32, mode: TruncationMode) {
        let Some(dominant) = Self::dominant_run(line) else {
            return;
        };
        let glyph_range = line.glyph_range();
        let start = glyph_range.start;
        let count = glyph_range.len();
        if count == 0 {
            return;
        }
        let ellipsis_advance = {
            let scale = dominant.scale();
            let shaped =
                dominant
                    .font()
                    .layout(&self.ellipsis.to_string(), &dominant.style().features, None);
            shaped.positions.iter().map(|p| p.x_advance * scale).sum::<f32>()
        };
        let budget = (max_advance - ellipsis_advance).max(0.);

        // Longest prefix of the line that fits `limit`, as a glyph count.
        let fit_prefix = |limit: f32| -> usize {
            let mut advance = 0.;
            for local in 0..count {
                advance += line.glyph_advance(start + local);
                if advance > limit {
                    return local;
                }
            }
            count
        };
        // Longest suffix of the line that fits `limit`, as a glyph count.
        let fit_suffix = |limit: f32| -> usize {
            let mut advance = 0.;
            for local in 0..count {
                advance += line.glyph_advance(start + count - 1 - local);
                if advance > limit {
                    return local;
                }
            }
            count
        };

        let (mut keep_head, mut keep_tail) = match mode {
            TruncationMode::Tail => (fit_prefix(budget), 0),
            TruncationMode::Head => (0, fit_suffix(budget)),
            TruncationMode::Middle => {
                let head = fit_prefix(budget / 2.);
                let head_advance: f32 =
                    (0..head).map(|l| line.glyph_advance(start + l)).sum();
                (head, fit_suffix(budget - head_advance))
            }
        };
        if keep_head + keep_tail >= count {
            // Nothing would be elided; leave the line alone.
            return;
        }
        // Drop whitespace adjacent to the elision so the ellipsis does not
        // float after a space.
        while keep_head > 0 && line.is_whitespace(start + keep_head - 1) {
            keep_head -= 1;
        }
        while keep_tail > 0 && line.is_whitespace(start + count - keep_tail) {
            keep_tail -= 1;
        }

        // The ellipsis reports the first elided non-whitespace character as
        // its source, so finalization never trims it as whitespace.
        let elided = (start + keep_head)..(start + count - keep_tail);
        let mut source_index = line.text_range().end;
        for g in elided.clone() {
            let non_ws = line.char_for_glyph(g).is_some_and(|ch| !is_whitespace(ch));
            if !non_ws {
                continue;
            }
            if let Some(run) = line.runs().iter().find(|r| r.glyph_range().contains(&g)) {
                source_index = run.string_indices()[g - run.glyph_range().start];
                break;
            }
        }

        tracing::debug!(
            target: "typeline::truncate",
            elided = elided.len(),
            ?mode,
            "replacing elided glyphs with ellipsis"
        );

        let head = line.slice(start..start + keep_head);
        let tail = line.slice(start + count - keep_tail..start + count);
        let ellipsis = {
            let template = Self::dominant_run(line).expect("line has runs");
            self.shape_ellipsis(template, source_index)
        };

        let mut runs: Vec<GlyphRun<B, F>> = Vec::new();
        match mode {
            TruncationMode::Head => {
                runs.push(ellipsis);
                runs.extend(tail.runs().iter().cloned());
            }
            TruncationMode::Middle => {
                runs.extend(head.runs().iter().cloned());
                runs.push(ellipsis);
                runs.extend(tail.runs().iter().cloned());
            }
            TruncationMode::Tail => {
                runs.extend(head.runs().iter().cloned());
                runs.push(ellipsis);
            }
        }
        // Renumber glyph ranges so the spliced line stays contiguous.
        let mut cursor = start;
        for run in &mut runs {
            let len = run.glyphs.len();
            let old_start = run.glyph_range.start;
            run.glyph_range = cursor..cursor + len;
            for index in &mut run.glyph_indices {
                *index = (*index + cursor).saturating_sub(old_start);
            }
            cursor += len;
        }
        *line = GlyphString::new(line.chars.clone(), runs);
    }
}
