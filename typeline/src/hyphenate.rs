// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tokenization and word hyphenation.
//!
//! Tokens are runs of spaces or runs of non-space characters; spaces are
//! preserved as their own tokens. Hyphenation produces syllable lists whose
//! concatenation equals the word; hyphens are never inserted into the text,
//! they are surfaced to the line breaker as break opportunities.

use core::ops::Range;

use crate::linebreak::{BreakClass, Breakpoint};

/// Splits words into syllables.
pub trait Hyphenate: Send + Sync {
    /// Returns the syllables of `word`, in order.
    ///
    /// The concatenation of the returned slices must equal `word`. A word
    /// with no break opportunities is returned as a single syllable.
    fn hyphenate_word<'t>(&self, word: &'t str) -> Vec<&'t str>;
}

/// Hyphenator that never breaks words.
#[derive(Copy, Clone, Default, Debug)]
pub struct NoHyphenation;

impl Hyphenate for NoHyphenation {
    fn hyphenate_word<'t>(&self, word: &'t str) -> Vec<&'t str> {
        vec![word]
    }
}

/// Dictionary hyphenator over embedded Knuth-Liang patterns.
#[cfg(feature = "hyphenation")]
pub struct PatternHyphenator {
    dictionary: hyphenation::Standard,
}

#[cfg(feature = "hyphenation")]
impl PatternHyphenator {
    /// Loads the embedded patterns for a language.
    pub fn new(language: hyphenation::Language) -> Option<Self> {
        use hyphenation::Load;
        let dictionary = hyphenation::Standard::from_embedded(language).ok()?;
        Some(Self { dictionary })
    }
}

#[cfg(feature = "hyphenation")]
impl Default for PatternHyphenator {
    fn default() -> Self {
        Self::new(hyphenation::Language::EnglishUS)
            .expect("embedded en-US hyphenation patterns are always available")
    }
}

#[cfg(feature = "hyphenation")]
impl core::fmt::Debug for PatternHyphenator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PatternHyphenator").finish_non_exhaustive()
    }
}

#[cfg(feature = "hyphenation")]
impl Hyphenate for PatternHyphenator {
    fn hyphenate_word<'t>(&self, word: &'t str) -> Vec<&'t str> {
        use hyphenation::Hyphenator;
        let breaks = self.dictionary.hyphenate(word).breaks;
        if breaks.is_empty() {
            return vec![word];
        }
        let mut syllables = Vec::with_capacity(breaks.len() + 1);
        let mut start = 0;
        for b in breaks {
            syllables.push(&word[start..b]);
            start = b;
        }
        syllables.push(&word[start..]);
        syllables
    }
}

/// A token within a run: a word or a run of spaces, in character
/// coordinates relative to the tokenized text.
#[derive(Clone, PartialEq, Eq, Debug)]
pub(crate) struct Token {
    pub(crate) range: Range<usize>,
    pub(crate) is_space: bool,
}

fn is_token_space(ch: char) -> bool {
    matches!(ch, ' ' | '\u{00A0}' | '\t')
}

/// Splits `text` into word and space tokens, preserving spaces.
pub(crate) fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();
    for (index, ch) in text.chars().enumerate() {
        let is_space = is_token_space(ch);
        match tokens.last_mut() {
            Some(token) if token.is_space == is_space && token.range.end == index => {
                token.range.end = index + 1;
            }
            _ => tokens.push(Token {
                range: index..index + 1,
                is_space,
            }),
        }
    }
    tokens
}

/// Derives the break candidates for one paragraph.
///
/// `run_bounds` are the character offsets where style runs begin; words are
/// tokenized within each run, so a word straddling a run boundary hyphenates
/// per part. The final candidate is mandatory and consumes the paragraph's
/// trailing newline when present.
pub(crate) fn breakpoints(
    text: &str,
    run_bounds: &[Range<usize>],
    hyphenator: &dyn Hyphenate,
) -> Vec<Breakpoint> {
    let char_len = text.chars().count();
    if char_len == 0 {
        return Vec::new();
    }
    let map = crate::util::CharMap::new(text);
    let body_len = if text.ends_with('\n') {
        char_len - 1
    } else {
        char_len
    };
    let mut points: Vec<Breakpoint> = Vec::new();
    for bounds in run_bounds {
        let start = bounds.start.min(body_len);
        let end = bounds.end.min(body_len);
        if start >= end {
            continue;
        }
        let sub = map.slice(text, start..end);
        let token_map = crate::util::CharMap::new(sub);
        for token in tokenize(sub) {
            let token_start = start + token.range.start;
            let token_end = start + token.range.end;
            if token.is_space {
                // A line may end after a space run; the spaces stay with
                // the preceding line and are trimmed during finalization.
                if token_end < body_len {
                    points.push(Breakpoint {
                        offset: token_end,
                        class: BreakClass::Normal,
                    });
                }
                continue;
            }
            let word = token_map.slice(sub, token.range.clone());
            let mut offset = token_start;
            let syllables = hyphenator.hyphenate_word(word);
            for syllable in &syllables[..syllables.len().saturating_sub(1)] {
                offset += syllable.chars().count();
                if offset < token_end {
                    points.push(Breakpoint {
                        offset,
                        class: BreakClass::Hyphen,
                    });
                }
            }
        }
    }
    points.push(Breakpoint {
        offset: char_len,
        class: BreakClass::Mandatory,
    });
    points
}
