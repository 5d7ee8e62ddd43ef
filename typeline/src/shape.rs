// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph generation: shaping, index reconciliation, attachment and y-offset
//! resolution.
//!
//! Each resolved run is shaped by the font oracle; glyph indices are
//! allocated contiguously across runs in document order. The character to
//! glyph mapping is reconciled so it is monotone non-decreasing and total
//! even across ligatures and decompositions.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::font::Font;
use crate::glyph::{GlyphRun, GlyphString};
use crate::resolve::ResolvedRun;
use crate::style::Brush;
use crate::util::{is_space, nearly_zero, CharMap};

/// Object replacement character marking attachment positions.
pub(crate) const OBJECT_REPLACEMENT: char = '\u{FFFC}';

/// Shapes one paragraph into a glyph string.
///
/// `base_offset` is the paragraph's character offset within the document,
/// used for error coordinates only; all indices in the output are
/// paragraph-local.
pub(crate) fn shape_paragraph<B: Brush, F: Font>(
    text: &str,
    chars: &Arc<[char]>,
    base_offset: usize,
    resolved: &[ResolvedRun<B, F>],
) -> Result<GlyphString<B, F>> {
    let map = CharMap::new(text);
    let mut runs: Vec<GlyphRun<B, F>> = Vec::with_capacity(resolved.len());
    let mut glyph_cursor = 0;
    for run in resolved {
        let sub = map.slice(text, run.range.clone());
        let shaped = run.font.layout(sub, &run.style.features, run.script);
        let char_count = run.range.len();
        validate_shaped(&shaped, char_count).map_err(|_| {
            Error::shaping_failed(base_offset + run.range.start, base_offset + run.range.end)
        })?;

        let glyph_count = shaped.glyphs.len();
        let glyph_range = glyph_cursor..glyph_cursor + glyph_count;
        glyph_cursor = glyph_range.end;

        let string_indices: Vec<usize> = shaped
            .string_indices
            .iter()
            .map(|&i| i + run.range.start)
            .collect();
        let glyph_indices =
            reconcile_indices(&shaped.string_indices, char_count, &glyph_range);

        let mut glyph_run = GlyphRun {
            style: run.style.clone(),
            font: run.font.clone(),
            script: run.script,
            bidi_level: run.level,
            glyph_range,
            text_range: run.range.clone(),
            glyphs: shaped.glyphs,
            positions: shaped.positions,
            string_indices,
            glyph_indices,
        };
        apply_spacing(&mut glyph_run, chars);
        runs.push(glyph_run);
    }

    let mut string = GlyphString::new(chars.clone(), runs);
    resolve_attachments(&mut string);
    resolve_y_offsets(&mut string);
    Ok(string)
}

fn validate_shaped(shaped: &crate::font::ShapedRun, char_count: usize) -> core::result::Result<(), ()> {
    if shaped.glyphs.len() != shaped.positions.len()
        || shaped.glyphs.len() != shaped.string_indices.len()
    {
        return Err(());
    }
    let mut prev = 0;
    for &index in &shaped.string_indices {
        if index < prev || index >= char_count.max(1) {
            return Err(());
        }
        prev = index;
    }
    Ok(())
}

/// Builds the character to glyph mapping for one run.
///
/// Pass 1 assigns each character the first glyph whose string index reaches
/// it; pass 2 back-fills the undefined tail with the last defined value;
/// pass 3 forward-fills the undefined head with the first defined value. The
/// result is monotone non-decreasing and total.
fn reconcile_indices(
    string_indices: &[usize],
    char_count: usize,
    glyph_range: &core::ops::Range<usize>,
) -> Vec<usize> {
    if string_indices.is_empty() {
        return vec![glyph_range.start; char_count];
    }
    let mut indices: Vec<Option<usize>> = vec![None; char_count];
    let mut j = 0;
    for (i, slot) in indices.iter_mut().enumerate() {
        while j < string_indices.len() && string_indices[j] < i {
            j += 1;
        }
        if j < string_indices.len() {
            *slot = Some(glyph_range.start + j);
        }
    }
    let mut last_defined = None;
    for slot in indices.iter_mut().rev() {
        match slot {
            Some(value) => last_defined = Some(*value),
            None => *slot = last_defined,
        }
    }
    let mut first_defined = None;
    for slot in indices.iter_mut() {
        match slot {
            Some(value) => first_defined = Some(*value),
            None => *slot = first_defined,
        }
    }
    indices
        .into_iter()
        .map(|slot| slot.unwrap_or(glyph_range.start))
        .collect()
}

/// Adds character and word spacing to the shaped advances.
fn apply_spacing<B: Brush, F: Font>(run: &mut GlyphRun<B, F>, chars: &Arc<[char]>) {
    let character_spacing = run.style.character_spacing;
    let word_spacing = run.style.word_spacing;
    if nearly_zero(character_spacing) && nearly_zero(word_spacing) {
        return;
    }
    let scale = run.scale();
    if nearly_zero(scale) {
        return;
    }
    for (local, position) in run.positions.iter_mut().enumerate() {
        position.x_advance += character_spacing / scale;
        let source = chars[run.string_indices[local]];
        if is_space(source) {
            position.x_advance += word_spacing / scale;
        }
    }
}

/// Overrides the advance of object replacement glyphs with the attachment
/// width, so the attachment occupies its box on the line.
fn resolve_attachments<B: Brush, F: Font>(string: &mut GlyphString<B, F>) {
    for run in string.runs_mut() {
        let Some(attachment) = run.style.attachment else {
            continue;
        };
        let Some(replacement) = run.font.glyph_for_char(OBJECT_REPLACEMENT) else {
            continue;
        };
        let scale = run.scale();
        if nearly_zero(scale) {
            continue;
        }
        for (glyph, position) in run.glyphs.iter().zip(run.positions.iter_mut()) {
            if *glyph == replacement {
                position.x_advance = attachment.width / scale;
            }
        }
    }
}

/// Shifts glyphs vertically by the style's y-offset, in font units.
///
/// Runs after attachment resolution, so an attachment glyph with a nonzero
/// y-offset also shifts.
fn resolve_y_offsets<B: Brush, F: Font>(string: &mut GlyphString<B, F>) {
    for run in string.runs_mut() {
        let y_offset = run.style.y_offset;
        if nearly_zero(y_offset) {
            continue;
        }
        let upem = run.font.metrics().units_per_em as f32;
        for position in run.positions_mut() {
            position.y_offset += y_offset * upem;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributed::Run;
    use crate::itemize::{CascadeSubstitution, UnicodeScriptItemizer};
    use crate::resolve::resolve_runs;
    use crate::style::{Attachment, TextStyle};
    use crate::testfont::{TestFont, LIGATURE_ID, UPEM};

    type Style = TextStyle<[u8; 4], TestFont>;

    fn shape(text: &str, style: Style) -> GlyphString<[u8; 4], TestFont> {
        let chars: Arc<[char]> = text.chars().collect();
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

    fn base_style(font: TestFont) -> Style {
        Style {
            font: Some(font),
            font_size: 10.,
            ..Style::default()
        }
    }

    #[test]
    fn one_glyph_per_char_without_ligatures() {
        let string = shape("Lorem", base_style(TestFont::new()));
        assert_eq!(string.len(), 5);
        let run = &string.runs()[0];
        assert_eq!(run.glyph_indices(), &[0, 1, 2, 3, 4]);
        assert_eq!(run.string_indices(), &[0, 1, 2, 3, 4]);
        assert_eq!(string.advance(), 25.);
    }

    #[test]
    fn ligature_reconciliation_is_monotone_and_total() {
        let string = shape("office", base_style(TestFont::new().with_ligatures()));
        assert_eq!(string.len(), 5);
        let run = &string.runs()[0];
        assert_eq!(run.glyphs()[2], LIGATURE_ID);
        assert_eq!(run.string_indices(), &[0, 1, 2, 4, 5]);
        // Every character maps to a valid glyph, non-decreasing.
        assert_eq!(run.glyph_indices().len(), 6);
        for pair in run.glyph_indices().windows(2) {
            assert!(pair[0] <= pair[1]);
        }
        for &g in run.glyph_indices() {
            assert!(g < string.len());
        }
    }

    #[test]
    fn trailing_ligature_back_fills() {
        let string = shape("fi", base_style(TestFont::new().with_ligatures()));
        assert_eq!(string.len(), 1);
        assert_eq!(string.runs()[0].glyph_indices(), &[0, 0]);
    }

    #[test]
    fn glyph_ranges_are_contiguous_across_runs() {
        let text = "ab\u{05D0}\u{05D1}";
        let chars: Arc<[char]> = text.chars().collect();
        let resolved = resolve_runs(
            text,
            0,
            &[Run {
                range: 0..4,
                style: base_style(TestFont::new()),
            }],
            &CascadeSubstitution::<TestFont>::default(),
            &UnicodeScriptItemizer,
        )
        .unwrap();
        let string = shape_paragraph(text, &chars, 0, &resolved).unwrap();
        assert_eq!(string.runs().len(), 2);
        assert_eq!(string.runs()[0].glyph_range(), 0..2);
        assert_eq!(string.runs()[1].glyph_range(), 2..4);
        assert_eq!(string.runs()[1].glyph_indices(), &[2, 3]);
    }

    #[test]
    fn attachment_overrides_advance() {
        let mut style = base_style(TestFont::new());
        style.attachment = Some(Attachment {
            width: 40.,
            height: 40.,
            x_offset: 0.,
            y_offset: 0.,
            id: 1,
        });
        let string = shape("a\u{FFFC}b", style);
        // Scaled advance of the replacement glyph equals the attachment width.
        assert_eq!(string.glyph_advance(1), 40.);
        assert_eq!(string.glyph_advance(0), 5.);
    }

    #[test]
    fn y_offset_shifts_in_font_units() {
        let mut style = base_style(TestFont::new());
        style.y_offset = 0.5;
        let string = shape("ab", style);
        let run = &string.runs()[0];
        assert_eq!(run.positions()[0].y_offset, 0.5 * UPEM as f32);
    }

    #[test]
    fn spacing_applies_to_advances() {
        let mut style = base_style(TestFont::new());
        style.character_spacing = 1.;
        style.word_spacing = 2.;
        let string = shape("a b", style);
        // 5 + 1 for letters, 2.5 + 1 + 2 for the space.
        assert!((string.glyph_advance(0) - 6.).abs() < 1e-4);
        assert!((string.glyph_advance(1) - 5.5).abs() < 1e-4);
        assert!((string.glyph_advance(2) - 6.).abs() < 1e-4);
    }

    #[test]
    fn inconsistent_indices_surface_shaping_failed() {
        #[derive(Clone, PartialEq, Debug)]
        struct BadFont(TestFont);
        impl Font for BadFont {
            fn metrics(&self) -> crate::font::FontMetrics {
                self.0.metrics()
            }
            fn layout(
                &self,
                text: &str,
                features: &[crate::font::FontFeature],
                script: Option<crate::font::Script>,
            ) -> crate::font::ShapedRun {
                let mut shaped = self.0.layout(text, features, script);
                shaped.string_indices.reverse();
                shaped
            }
            fn glyph_for_char(&self, ch: char) -> Option<crate::font::GlyphId> {
                self.0.glyph_for_char(ch)
            }
        }
        let text = "abc";
        let chars: Arc<[char]> = text.chars().collect();
        let style = TextStyle::<[u8; 4], BadFont> {
            font: Some(BadFont(TestFont::new())),
            ..TextStyle::default()
        };
        let resolved = resolve_runs(
            text,
            3,
            &[Run {
                range: 0..3,
                style,
            }],
            &CascadeSubstitution::<BadFont>::default(),
            &UnicodeScriptItemizer,
        )
        .unwrap();
        let err = shape_paragraph(text, &chars, 3, &resolved).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::ShapingFailed);
        assert_eq!(err.start(), 3);
        assert_eq!(err.end(), 6);
    }
}
