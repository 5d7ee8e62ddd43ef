// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Run resolution: overlaying style, font-substitution, script, and bidi
//! sources into a single flat run set.
//!
//! Sources are combined in a fixed order (style, substitution, script, bidi)
//! with later sources winning on their attribute key. The walk visits every
//! character once and emits a run whenever any source changes, so adjacent
//! equal runs merge by construction.

use core::ops::Range;
use std::sync::Arc;

use crate::attributed::Run;
use crate::bidi::{self, LevelRun};
use crate::error::{Error, Result};
use crate::font::{Font, Script};
use crate::itemize::{FontRequest, FontRun, ScriptItemize, ScriptRun, SubstituteFonts};
use crate::style::{Brush, TextStyle};

/// One flattened run, ready for shaping.
#[derive(Clone, Debug)]
pub(crate) struct ResolvedRun<B: Brush, F: Font> {
    /// Paragraph-local character range.
    pub(crate) range: Range<usize>,
    pub(crate) style: Arc<TextStyle<B, F>>,
    pub(crate) font: F,
    pub(crate) script: Option<Script>,
    pub(crate) level: u8,
}

/// Resolves one paragraph's style runs against the adapter sources.
///
/// `base_offset` is the paragraph's character offset within the document and
/// is only used to report error coordinates.
pub(crate) fn resolve_runs<B: Brush, F: Font>(
    text: &str,
    base_offset: usize,
    style_runs: &[Run<B, F>],
    substitution: &dyn SubstituteFonts<F>,
    itemizer: &dyn ScriptItemize,
) -> Result<Vec<ResolvedRun<B, F>>> {
    let char_len = text.chars().count();
    if char_len == 0 || style_runs.is_empty() {
        return Ok(Vec::new());
    }

    let requests: Vec<FontRequest<'_, F>> = style_runs
        .iter()
        .map(|run| FontRequest {
            range: run.range.clone(),
            font: run.style.font.as_ref(),
        })
        .collect();
    let font_runs = substitution.runs(text, &requests);
    let script_runs = itemizer.itemize(text);
    let base_level = style_runs[0].style.bidi_level;
    let level_runs = bidi::resolve_levels(text, base_level);

    let styles: Vec<Arc<TextStyle<B, F>>> = style_runs
        .iter()
        .map(|run| Arc::new(run.style.clone()))
        .collect();

    let mut style_cursor = 0;
    let mut font_cursor = 0;
    let mut script_cursor = 0;
    let mut level_cursor = 0;

    let mut resolved: Vec<ResolvedRun<B, F>> = Vec::new();
    let mut segment_start = 0;
    let mut current: Option<(usize, Option<F>, Option<Script>, u8)> = None;

    for i in 0..char_len {
        let style_index = advance_to(style_runs, &mut style_cursor, i, |r| r.range.clone());
        let font = font_at(&font_runs, &mut font_cursor, i);
        let script = script_at(&script_runs, &mut script_cursor, i)
            .or(style_runs[style_index].style.script);
        let level = level_at(&level_runs, &mut level_cursor, i).unwrap_or(0);

        let next = (style_index, font, script, level);
        match &current {
            Some(open) if *open == next => {}
            Some(open) => {
                flush(
                    &mut resolved,
                    &styles,
                    open,
                    segment_start..i,
                    base_offset,
                )?;
                segment_start = i;
                current = Some(next);
            }
            None => current = Some(next),
        }
    }
    if let Some(open) = &current {
        flush(
            &mut resolved,
            &styles,
            open,
            segment_start..char_len,
            base_offset,
        )?;
    }
    Ok(resolved)
}

fn flush<B: Brush, F: Font>(
    resolved: &mut Vec<ResolvedRun<B, F>>,
    styles: &[Arc<TextStyle<B, F>>],
    open: &(usize, Option<F>, Option<Script>, u8),
    range: Range<usize>,
    base_offset: usize,
) -> Result<()> {
    let (style_index, font, script, level) = open;
    let Some(font) = font.clone() else {
        return Err(Error::missing_font(
            base_offset + range.start,
            base_offset + range.end,
        ));
    };
    resolved.push(ResolvedRun {
        range,
        style: styles[*style_index].clone(),
        font,
        script: *script,
        level: *level,
    });
    Ok(())
}

fn advance_to<T>(
    runs: &[T],
    cursor: &mut usize,
    index: usize,
    range_of: impl Fn(&T) -> Range<usize>,
) -> usize {
    while *cursor + 1 < runs.len() && range_of(&runs[*cursor]).end <= index {
        *cursor += 1;
    }
    *cursor
}

fn font_at<F: Font>(runs: &[FontRun<F>], cursor: &mut usize, index: usize) -> Option<F> {
    if runs.is_empty() {
        return None;
    }
    let i = advance_to(runs, cursor, index, |r| r.range.clone());
    runs[i].font.clone()
}

fn script_at(runs: &[ScriptRun], cursor: &mut usize, index: usize) -> Option<Script> {
    if runs.is_empty() {
        return None;
    }
    let i = advance_to(runs, cursor, index, |r| r.range.clone());
    runs[i].range.contains(&index).then(|| runs[i].script)
}

fn level_at(runs: &[LevelRun], cursor: &mut usize, index: usize) -> Option<u8> {
    if runs.is_empty() {
        return None;
    }
    let i = advance_to(runs, cursor, index, |r| r.range.clone());
    runs[i].range.contains(&index).then(|| runs[i].level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::itemize::{CascadeSubstitution, UnicodeScriptItemizer};
    use crate::testfont::TestFont;

    type Style = TextStyle<[u8; 4], TestFont>;

    fn style_with_font() -> Style {
        Style {
            font: Some(TestFont::new()),
            ..Style::default()
        }
    }

    #[test]
    fn single_style_single_script_resolves_to_one_run() {
        let runs = vec![Run {
            range: 0..5,
            style: style_with_font(),
        }];
        let resolved = resolve_runs(
            "Lorem",
            0,
            &runs,
            &CascadeSubstitution::<TestFont>::default(),
            &UnicodeScriptItemizer,
        )
        .unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].range, 0..5);
        assert_eq!(resolved[0].script, Some(Script::from_str_lossy("Latn")));
        assert_eq!(resolved[0].level, 0);
    }

    #[test]
    fn style_boundary_splits_resolved_runs() {
        let mut second = style_with_font();
        second.font_size = 24.;
        let runs = vec![
            Run {
                range: 0..2,
                style: style_with_font(),
            },
            Run {
                range: 2..5,
                style: second,
            },
        ];
        let resolved = resolve_runs(
            "Lorem",
            0,
            &runs,
            &CascadeSubstitution::<TestFont>::default(),
            &UnicodeScriptItemizer,
        )
        .unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].range, 0..2);
        assert_eq!(resolved[1].range, 2..5);
        // Runs partition the paragraph exactly.
        assert_eq!(resolved[0].range.end, resolved[1].range.start);
    }

    #[test]
    fn missing_font_is_surfaced_with_coordinates() {
        let runs = vec![Run {
            range: 0..3,
            style: Style::default(),
        }];
        let err = resolve_runs(
            "abc",
            7,
            &runs,
            &CascadeSubstitution::<TestFont>::default(),
            &UnicodeScriptItemizer,
        )
        .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::MissingFont);
        assert_eq!(err.start(), 7);
        assert_eq!(err.end(), 10);
    }

    #[test]
    fn script_change_splits_resolved_runs() {
        let runs = vec![Run {
            range: 0..4,
            style: style_with_font(),
        }];
        let resolved = resolve_runs(
            "ab\u{05D0}\u{05D1}",
            0,
            &runs,
            &CascadeSubstitution::<TestFont>::default(),
            &UnicodeScriptItemizer,
        )
        .unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].script, Some(Script::from_str_lossy("Latn")));
        assert_eq!(resolved[1].script, Some(Script::from_str_lossy("Hebr")));
        // Hebrew resolves to an odd embedding level.
        assert_eq!(resolved[1].level % 2, 1);
    }
}
