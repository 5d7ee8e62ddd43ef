// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line fragments and finalization.
//!
//! Finalization runs once per fragment after breaking: alignment selection,
//! truncation, whitespace trimming into the overflow fields, hanging
//! punctuation, the alignment offset, justification, and decoration.

use crate::decorate::{Decorate, DecorationLine};
use crate::font::Font;
use crate::geom::Rect;
use crate::glyph::GlyphString;
use crate::justify::Justify;
use crate::style::{Alignment, Brush, ParagraphStyle};
use crate::truncate::Truncate;
use crate::util::nearly_zero;

/// A positioned line of glyphs within a block.
#[derive(Clone, Debug)]
pub struct LineFragment<B: Brush, F: Font> {
    /// The line box, expanded by the overflow widths during finalization.
    pub rect: Rect,
    /// The glyphs on the line.
    pub string: GlyphString<B, F>,
    /// Width trimmed or hung past the left edge of the original rect.
    pub overflow_left: f32,
    /// Width trimmed or hung past the right edge of the original rect.
    pub overflow_right: f32,
    /// Decoration geometry for the line.
    pub decorations: Vec<DecorationLine<B>>,
    /// Whether content was elided at this line.
    pub truncated: bool,
}

impl<B: Brush, F: Font> LineFragment<B, F> {
    pub(crate) fn new(rect: Rect, string: GlyphString<B, F>) -> Self {
        Self {
            rect,
            string,
            overflow_left: 0.,
            overflow_right: 0.,
            decorations: Vec::new(),
            truncated: false,
        }
    }

    /// Advance width of the line's glyphs in layout units.
    pub fn advance_width(&self) -> f32 {
        self.string.advance()
    }

    /// Ascent of the tallest run on the line.
    pub fn ascent(&self) -> f32 {
        self.string.ascent()
    }

    /// Y coordinate of the alphabetic baseline.
    pub fn baseline(&self) -> f32 {
        self.rect.y + self.string.ascent()
    }
}

/// Punctuation allowed to hang past the start of a line.
fn hangs_at_start(ch: char) -> bool {
    matches!(
        ch,
        '"' | '\'' | '\u{2018}' | '\u{201C}' | '\u{00AB}' | '\u{2039}'
    )
}

/// Punctuation allowed to hang past the end of a line.
fn hangs_at_end(ch: char) -> bool {
    matches!(
        ch,
        '"' | '\''
            | '\u{2019}'
            | '\u{201D}'
            | '\u{00BB}'
            | '\u{203A}'
            | ','
            | '.'
            | '\u{2026}'
            | ':'
            | ';'
            | '!'
            | '?'
            | '-'
            | '\u{2010}'
            | '\u{2013}'
            | '\u{2014}'
    )
}

/// The engine set finalization dispatches to.
pub(crate) struct FinalizeEngines<'a, B: Brush, F: Font> {
    pub(crate) justifier: &'a dyn Justify<B, F>,
    pub(crate) truncator: &'a dyn Truncate<B, F>,
    pub(crate) decorator: &'a dyn Decorate<B, F>,
}

pub(crate) fn finalize_line<B: Brush, F: Font>(
    fragment: &mut LineFragment<B, F>,
    style: &ParagraphStyle,
    is_last_fragment: bool,
    is_truncated: bool,
    engines: &FinalizeEngines<'_, B, F>,
) {
    let align = if is_last_fragment && !is_truncated {
        style.align_last_line
    } else {
        style.align
    };

    if is_truncated {
        if let Some(mode) = style.truncation_mode {
            engines
                .truncator
                .truncate(&mut fragment.string, fragment.rect.width, mode);
            fragment.truncated = true;
        }
    }

    // Trim leading and trailing whitespace into the overflow widths. The
    // glyphs are dropped from the line; alignment below sees the trimmed
    // advance.
    let glyph_range = fragment.string.glyph_range();
    let mut start = glyph_range.start;
    let mut end = glyph_range.end;
    while start < end && fragment.string.is_whitespace(start) {
        fragment.overflow_left += fragment.string.glyph_advance(start);
        start += 1;
    }
    while end > start && fragment.string.is_whitespace(end - 1) {
        fragment.overflow_right += fragment.string.glyph_advance(end - 1);
        end -= 1;
    }
    if (start, end) != (glyph_range.start, glyph_range.end) {
        fragment.string = fragment.string.slice(start..end);
    }

    // Hanging punctuation stays on the line but its width moves into the
    // overflow, letting it protrude into the margin.
    if style.hanging_punctuation && start < end {
        if matches!(align, Alignment::Left | Alignment::Justify)
            && fragment
                .string
                .char_for_glyph(start)
                .is_some_and(hangs_at_start)
        {
            fragment.overflow_left += fragment.string.glyph_advance(start);
        }
        if matches!(align, Alignment::Right | Alignment::Justify)
            && fragment
                .string
                .char_for_glyph(end - 1)
                .is_some_and(hangs_at_end)
        {
            fragment.overflow_right += fragment.string.glyph_advance(end - 1);
        }
    }

    fragment.rect.x -= fragment.overflow_left;
    fragment.rect.width += fragment.overflow_left + fragment.overflow_right;

    let advance = fragment.string.advance();
    let gap = fragment.rect.width - advance;
    if gap.is_finite() {
        fragment.rect.x += gap * align.factor();
    }

    if (align == Alignment::Justify && gap > 0. || gap < 0.)
        && gap.is_finite()
        && !fragment.string.is_empty()
        && !nearly_zero(gap)
    {
        engines
            .justifier
            .justify(&mut fragment.string, gap * style.justification_factor);
    }

    let baseline = fragment.baseline();
    fragment.decorations = engines
        .decorator
        .decorate(&fragment.string, fragment.rect.x, baseline);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributed::Run;
    use crate::decorate::DecorationEngine;
    use crate::itemize::{CascadeSubstitution, UnicodeScriptItemizer};
    use crate::justify::PriorityJustifier;
    use crate::resolve::resolve_runs;
    use crate::shape::shape_paragraph;
    use crate::style::TextStyle;
    use crate::testfont::TestFont;
    use crate::truncate::EllipsisTruncator;
    use std::sync::Arc;

    type Style = TextStyle<[u8; 4], TestFont>;

    fn shape(text: &str) -> GlyphString<[u8; 4], TestFont> {
        let chars: Arc<[char]> = text.chars().collect();
        let style = Style {
            font: Some(TestFont::new()),
            font_size: 10.,
            ..Style::default()
        };
        let resolved = resolve_runs(
            text,
            0,
            &[Run {
                range: 0..chars.len(),
                style,
            }],
            &CascadeSubstitution::<TestFont>::default(),
            &UnicodeScriptItemizer,
        )
        .unwrap();
        shape_paragraph(text, &chars, 0, &resolved).unwrap()
    }

    fn finalize(
        fragment: &mut LineFragment<[u8; 4], TestFont>,
        style: &ParagraphStyle,
        is_last: bool,
        truncated: bool,
    ) {
        let justifier = PriorityJustifier::default();
        let truncator = EllipsisTruncator::default();
        let decorator = DecorationEngine;
        let engines = FinalizeEngines {
            justifier: &justifier,
            truncator: &truncator,
            decorator: &decorator,
        };
        finalize_line(fragment, style, is_last, truncated, &engines);
    }

    #[test]
    fn trailing_whitespace_moves_into_overflow_right() {
        let mut fragment =
            LineFragment::new(Rect::new(10., 0., 50., 10.), shape("abc "));
        let original = fragment.rect;
        finalize(&mut fragment, &ParagraphStyle::default(), false, false);
        assert_eq!(fragment.overflow_right, 2.5);
        assert_eq!(fragment.overflow_left, 0.);
        assert_eq!(fragment.string.to_text(), "abc");
        // Trim symmetry: the right edge grew by exactly overflow_right.
        assert_eq!(
            fragment.rect.max_x(),
            original.max_x() + fragment.overflow_right
        );
    }

    #[test]
    fn leading_whitespace_expands_left() {
        let mut fragment = LineFragment::new(Rect::new(10., 0., 50., 10.), shape(" abc"));
        finalize(&mut fragment, &ParagraphStyle::default(), false, false);
        assert_eq!(fragment.overflow_left, 2.5);
        assert_eq!(fragment.rect.x, 7.5);
        assert_eq!(fragment.string.to_text(), "abc");
    }

    #[test]
    fn right_alignment_offsets_the_rect() {
        let mut fragment = LineFragment::new(Rect::new(0., 0., 50., 10.), shape("abc"));
        let style = ParagraphStyle {
            align: crate::style::Alignment::Right,
            ..ParagraphStyle::default()
        };
        finalize(&mut fragment, &style, false, false);
        // 50 - 15 advance = 35 offset.
        assert_eq!(fragment.rect.x, 35.);
    }

    #[test]
    fn last_line_uses_align_last_line() {
        let style = ParagraphStyle {
            align: crate::style::Alignment::Right,
            align_last_line: crate::style::Alignment::Left,
            ..ParagraphStyle::default()
        };
        let mut fragment = LineFragment::new(Rect::new(0., 0., 50., 10.), shape("abc"));
        finalize(&mut fragment, &style, true, false);
        assert_eq!(fragment.rect.x, 0.);
    }

    #[test]
    fn justified_line_fills_the_rect() {
        let style = ParagraphStyle {
            align: crate::style::Alignment::Justify,
            ..ParagraphStyle::default()
        };
        let mut fragment = LineFragment::new(Rect::new(0., 0., 40., 10.), shape("aa bb"));
        finalize(&mut fragment, &style, false, false);
        assert!((fragment.string.advance() - 40.).abs() < 1e-3);
    }

    #[test]
    fn hanging_punctuation_expands_the_rect() {
        let style = ParagraphStyle {
            hanging_punctuation: true,
            ..ParagraphStyle::default()
        };
        let mut fragment = LineFragment::new(Rect::new(10., 0., 60., 10.), shape("\"abc"));
        finalize(&mut fragment, &style, false, false);
        assert_eq!(fragment.overflow_left, 5.);
        assert_eq!(fragment.rect.x, 5.);
        // The quote is still on the line.
        assert_eq!(fragment.string.to_text(), "\"abc");
    }

    #[test]
    fn underline_decorations_are_emitted() {
        let chars: Arc<[char]> = "ab".chars().collect();
        let style = Style {
            font: Some(TestFont::new()),
            font_size: 10.,
            has_underline: true,
            ..Style::default()
        };
        let resolved = resolve_runs(
            "ab",
            0,
            &[Run {
                range: 0..2,
                style,
            }],
            &CascadeSubstitution::<TestFont>::default(),
            &UnicodeScriptItemizer,
        )
        .unwrap();
        let string = shape_paragraph("ab", &chars, 0, &resolved).unwrap();
        let mut fragment = LineFragment::new(Rect::new(0., 0., 50., 10.), string);
        finalize(&mut fragment, &ParagraphStyle::default(), false, false);
        assert_eq!(fragment.decorations.len(), 1);
        assert_eq!(fragment.decorations[0].rect.width, 10.);
    }
}
