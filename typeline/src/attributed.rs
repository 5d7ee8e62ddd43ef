// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attributed strings: a string plus a partition into style runs.
//!
//! All ranges here are in the character coordinate space (char indices, not
//! byte offsets): the same space the shaping oracle's `string_indices` and
//! the hyphenation opportunities live in.

use core::ops::{Bound, Range, RangeBounds};

use crate::error::{Error, Result};
use crate::font::Font;
use crate::style::{Brush, StyleProperty, TextStyle};

/// A contiguous character range sharing one resolved style.
#[derive(Clone, PartialEq, Debug)]
pub struct Run<B: Brush, F: Font> {
    pub range: Range<usize>,
    pub style: TextStyle<B, F>,
}

/// A string with a sorted, non-overlapping, contiguous set of style runs
/// covering the whole text.
///
/// Immutable after construction; the layout pipeline reads it and produces
/// owned output.
#[derive(Clone, Debug)]
pub struct AttributedString<B: Brush, F: Font> {
    text: String,
    char_len: usize,
    runs: Vec<Run<B, F>>,
}

impl<B: Brush, F: Font> AttributedString<B, F> {
    /// Creates an attributed string with a single style run covering the
    /// whole text.
    pub fn new(text: impl Into<String>, style: TextStyle<B, F>) -> Self {
        let text = text.into();
        let char_len = text.chars().count();
        let runs = if char_len == 0 {
            Vec::new()
        } else {
            vec![Run {
                range: 0..char_len,
                style,
            }]
        };
        Self {
            text,
            char_len,
            runs,
        }
    }

    /// Creates an attributed string from explicit runs, validating that they
    /// are sorted, non-overlapping, contiguous, and cover the text exactly.
    pub fn from_runs(text: impl Into<String>, runs: Vec<Run<B, F>>) -> Result<Self> {
        let text = text.into();
        let char_len = text.chars().count();
        let mut cursor = 0;
        for run in &runs {
            if run.range.start != cursor || run.range.end < run.range.start {
                return Err(Error::invalid_runs(run.range.start, run.range.end));
            }
            cursor = run.range.end;
        }
        if cursor != char_len {
            return Err(Error::invalid_runs(cursor, char_len));
        }
        Ok(Self {
            text,
            char_len,
            runs,
        })
    }

    /// Concatenates styled fragments into one attributed string, offsetting
    /// each fragment's run into the combined coordinate space.
    ///
    /// Each fragment is a string plus the property overrides applied on top
    /// of `root_style` for its whole extent.
    pub fn from_fragments(
        root_style: TextStyle<B, F>,
        fragments: impl IntoIterator<Item = (String, Vec<StyleProperty<B, F>>)>,
    ) -> Self {
        let mut text = String::new();
        let mut runs = Vec::new();
        let mut cursor = 0;
        for (fragment, properties) in fragments {
            let len = fragment.chars().count();
            if len == 0 {
                continue;
            }
            let mut style = root_style.clone();
            for property in properties {
                style.apply(property);
            }
            text.push_str(&fragment);
            runs.push(Run {
                range: cursor..cursor + len,
                style,
            });
            cursor += len;
        }
        // Merge adjacent fragments that resolved to the same style.
        let mut merged: Vec<Run<B, F>> = Vec::with_capacity(runs.len());
        for run in runs {
            match merged.last_mut() {
                Some(prev) if prev.style == run.style => prev.range.end = run.range.end,
                _ => merged.push(run),
            }
        }
        Self {
            text,
            char_len: cursor,
            runs: merged,
        }
    }

    /// Starts a builder that applies ranged property overrides over a root
    /// style.
    pub fn builder(text: impl Into<String>, root_style: TextStyle<B, F>) -> RangedBuilder<B, F> {
        let text = text.into();
        let char_len = text.chars().count();
        RangedBuilder {
            text,
            char_len,
            root_style,
            properties: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.char_len
    }

    pub fn is_empty(&self) -> bool {
        self.char_len == 0
    }

    pub fn runs(&self) -> &[Run<B, F>] {
        &self.runs
    }

    /// The style at a character index.
    pub fn style_at(&self, index: usize) -> Option<&TextStyle<B, F>> {
        let i = self
            .runs
            .binary_search_by(|run| {
                if run.range.end <= index {
                    core::cmp::Ordering::Less
                } else if run.range.start > index {
                    core::cmp::Ordering::Greater
                } else {
                    core::cmp::Ordering::Equal
                }
            })
            .ok()?;
        Some(&self.runs[i].style)
    }

    /// Splits the text into paragraphs: maximal half-open character ranges
    /// ending at (and including) each `\n`, plus a final range for trailing
    /// non-terminated characters.
    pub fn paragraphs(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        Paragraphs {
            chars: self.text.chars(),
            offset: 0,
            len: self.char_len,
        }
    }
}

struct Paragraphs<'a> {
    chars: core::str::Chars<'a>,
    offset: usize,
    len: usize,
}

impl Iterator for Paragraphs<'_> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.len {
            return None;
        }
        let start = self.offset;
        for ch in self.chars.by_ref() {
            self.offset += 1;
            if ch == '\n' {
                return Some(start..self.offset);
            }
        }
        Some(start..self.offset)
    }
}

/// Builder for an [`AttributedString`] from a root style plus ranged
/// property overrides. Later pushes win on overlapping ranges; adjacent runs
/// with equal styles are merged.
#[derive(Debug)]
pub struct RangedBuilder<B: Brush, F: Font> {
    text: String,
    char_len: usize,
    root_style: TextStyle<B, F>,
    properties: Vec<RangedProperty<B, F>>,
}

#[derive(Debug)]
struct RangedProperty<B: Brush, F: Font> {
    property: StyleProperty<B, F>,
    range: Range<usize>,
}

impl<B: Brush, F: Font> RangedBuilder<B, F> {
    /// Changes a property of the root style, covering the full text.
    pub fn push_default(&mut self, property: StyleProperty<B, F>) -> &mut Self {
        self.root_style.apply(property);
        self
    }

    /// Overrides a property for the given character range.
    pub fn push(
        &mut self,
        property: StyleProperty<B, F>,
        range: impl RangeBounds<usize>,
    ) -> &mut Self {
        let range = resolve_range(range, self.char_len);
        self.properties.push(RangedProperty { property, range });
        self
    }

    /// Computes the final run set and returns the attributed string.
    pub fn build(self) -> AttributedString<B, F> {
        let mut styles: Vec<Run<B, F>> = Vec::new();
        if self.char_len > 0 {
            styles.push(Run {
                range: 0..self.char_len,
                style: self.root_style,
            });
        }
        for prop in &self.properties {
            if prop.range.start >= prop.range.end {
                continue;
            }
            apply_ranged(&mut styles, &prop.property, prop.range.clone());
        }
        let mut merged: Vec<Run<B, F>> = Vec::with_capacity(styles.len());
        for run in styles {
            match merged.last_mut() {
                Some(prev) if prev.style == run.style => prev.range.end = run.range.end,
                _ => merged.push(run),
            }
        }
        AttributedString {
            text: self.text,
            char_len: self.char_len,
            runs: merged,
        }
    }
}

/// Applies one property over one range of an ordered, contiguous run list,
/// splitting the boundary runs as needed.
fn apply_ranged<B: Brush, F: Font>(
    styles: &mut Vec<Run<B, F>>,
    property: &StyleProperty<B, F>,
    range: Range<usize>,
) {
    let start_index = match styles.binary_search_by(|run| run.range.start.cmp(&range.start)) {
        Ok(index) => index,
        Err(index) => index.saturating_sub(1),
    };
    let mut i = start_index;
    while i < styles.len() {
        let run = &mut styles[i];
        if run.range.start >= range.end {
            break;
        }
        if run.range.end <= range.start || run.style.check(property) {
            i += 1;
            continue;
        }
        // Split off an unmodified head.
        if run.range.start < range.start {
            let mut tail = run.clone();
            tail.range.start = range.start;
            run.range.end = range.start;
            styles.insert(i + 1, tail);
            i += 1;
            continue;
        }
        // Split off an unmodified tail.
        if run.range.end > range.end {
            let mut tail = run.clone();
            tail.range.start = range.end;
            run.range.end = range.end;
            run.style.apply(property.clone());
            styles.insert(i + 1, tail);
            return;
        }
        run.style.apply(property.clone());
        i += 1;
    }
}

/// Resolves a `RangeBounds` into a concrete range clamped to `0..len`.
fn resolve_range(range: impl RangeBounds<usize>, len: usize) -> Range<usize> {
    let start = match range.start_bound() {
        Bound::Unbounded => 0,
        Bound::Included(n) => *n,
        Bound::Excluded(n) => *n + 1,
    };
    let end = match range.end_bound() {
        Bound::Unbounded => len,
        Bound::Included(n) => *n + 1,
        Bound::Excluded(n) => *n,
    };
    start.min(len)..end.min(len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Alignment;
    use crate::testfont::TestFont;

    type Style = TextStyle<[u8; 4], TestFont>;

    fn plain(text: &str) -> AttributedString<[u8; 4], TestFont> {
        AttributedString::new(text, Style::default())
    }

    fn paragraph_texts(text: &str) -> Vec<String> {
        let s = plain(text);
        let chars: Vec<char> = text.chars().collect();
        s.paragraphs()
            .map(|r| chars[r].iter().collect())
            .collect()
    }

    #[test]
    fn paragraph_without_newline() {
        assert_eq!(paragraph_texts("Lorem"), ["Lorem"]);
    }

    #[test]
    fn paragraph_mid_newline() {
        assert_eq!(paragraph_texts("Lorem\nipsum"), ["Lorem\n", "ipsum"]);
    }

    #[test]
    fn paragraph_leading_newline() {
        assert_eq!(paragraph_texts("\nipsum"), ["\n", "ipsum"]);
    }

    #[test]
    fn paragraph_double_newline() {
        assert_eq!(
            paragraph_texts("Lorem\n\nipsum"),
            ["Lorem\n", "\n", "ipsum"]
        );
    }

    #[test]
    fn paragraphs_cover_the_text() {
        for text in ["", "\n", "a\nb\n", "\n\n\nx"] {
            let joined: String = paragraph_texts(text).concat();
            assert_eq!(joined, text);
        }
    }

    #[test]
    fn ranged_overrides_split_and_merge() {
        let mut builder = AttributedString::builder("hello world", Style::default());
        builder.push(StyleProperty::FontSize(20.), 6..11);
        builder.push(StyleProperty::Align(Alignment::Center), ..);
        let s = builder.build();
        assert_eq!(s.runs().len(), 2);
        assert_eq!(s.runs()[0].range, 0..6);
        assert_eq!(s.runs()[0].style.font_size, 12.);
        assert_eq!(s.runs()[1].range, 6..11);
        assert_eq!(s.runs()[1].style.font_size, 20.);
        for run in s.runs() {
            assert_eq!(run.style.align, Alignment::Center);
        }
    }

    #[test]
    fn overrides_merge_when_equal() {
        let mut builder = AttributedString::builder("abcdef", Style::default());
        builder.push(StyleProperty::FontSize(12.), 2..4);
        let s = builder.build();
        assert_eq!(s.runs().len(), 1);
        assert_eq!(s.runs()[0].range, 0..6);
    }

    #[test]
    fn from_runs_validates_partition() {
        let err = AttributedString::from_runs(
            "abc",
            vec![Run {
                range: 0..2,
                style: Style::default(),
            }],
        )
        .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::InvalidRuns);
        assert!(AttributedString::from_runs(
            "abc",
            vec![Run {
                range: 0..3,
                style: Style::default(),
            }],
        )
        .is_ok());
    }

    #[test]
    fn fragments_concatenate_and_offset() {
        let s = AttributedString::from_fragments(
            Style::default(),
            [
                ("Hello ".to_string(), vec![]),
                ("world".to_string(), vec![StyleProperty::FontSize(24.)]),
            ],
        );
        assert_eq!(s.text(), "Hello world");
        assert_eq!(s.runs().len(), 2);
        assert_eq!(s.runs()[1].range, 6..11);
        assert_eq!(s.style_at(8).unwrap().font_size, 24.);
        assert_eq!(s.style_at(2).unwrap().font_size, 12.);
    }
}
