// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Script itemization and font substitution adapters.
//!
//! Both adapters return run sets in the character coordinate space that the
//! resolver overlays onto the style runs. They are injected; the defaults
//! here cover the common cases without any platform font machinery.

use core::ops::Range;

use unicode_script::{Script as UScript, UnicodeScript};

use crate::font::{Font, GlyphId, Script};

/// A run of characters sharing one Unicode script.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ScriptRun {
    pub range: Range<usize>,
    /// ISO 15924 tag, e.g. `Latn`.
    pub script: Script,
}

/// Splits text into runs of uniform script.
pub trait ScriptItemize: Send + Sync {
    /// Returns script runs covering `0..text.chars().count()`.
    fn itemize(&self, text: &str) -> Vec<ScriptRun>;
}

/// Script itemizer backed by the Unicode script property (UAX #24).
///
/// Common and Inherited characters resolve to the preceding explicit script;
/// a leading stretch of them resolves to the first explicit script that
/// follows, so punctuation never starts a run of its own.
#[derive(Copy, Clone, Default, Debug)]
pub struct UnicodeScriptItemizer;

impl ScriptItemize for UnicodeScriptItemizer {
    fn itemize(&self, text: &str) -> Vec<ScriptRun> {
        let mut runs: Vec<ScriptRun> = Vec::new();
        // Script of the open run; `None` while it has only seen Common.
        let mut current: Option<UScript> = None;
        for (index, ch) in text.chars().enumerate() {
            let explicit = match ch.script() {
                UScript::Common | UScript::Inherited | UScript::Unknown => None,
                s => Some(s),
            };
            if runs.is_empty() {
                runs.push(ScriptRun {
                    range: 0..1,
                    script: to_tag(explicit.unwrap_or(UScript::Latin)),
                });
                current = explicit;
                continue;
            }
            let extend = match (current, explicit) {
                (_, None) | (None, Some(_)) => true,
                (Some(c), Some(s)) => c == s,
            };
            if extend {
                let run = runs.last_mut().expect("runs is non-empty");
                run.range.end = index + 1;
                if current.is_none() {
                    if let Some(s) = explicit {
                        // A leading Common stretch adopts the first explicit
                        // script instead of standing alone.
                        run.script = to_tag(s);
                        current = Some(s);
                    }
                }
            } else if let Some(s) = explicit {
                runs.push(ScriptRun {
                    range: index..index + 1,
                    script: to_tag(s),
                });
                current = Some(s);
            }
        }
        runs
    }
}

fn to_tag(script: UScript) -> Script {
    Script::from_str_lossy(script.short_name())
}

/// A run of characters with a substituted font.
#[derive(Clone, PartialEq, Debug)]
pub struct FontRun<F: Font> {
    pub range: Range<usize>,
    /// `None` when no candidate font covers the run.
    pub font: Option<F>,
}

/// The font requested for a character range, before substitution.
#[derive(Clone, Debug)]
pub struct FontRequest<'a, F: Font> {
    pub range: Range<usize>,
    pub font: Option<&'a F>,
}

/// Chooses a concrete font per character subrange from a cascade.
pub trait SubstituteFonts<F: Font>: Send + Sync {
    /// Returns font runs covering the union of the request ranges.
    fn runs(&self, text: &str, requests: &[FontRequest<'_, F>]) -> Vec<FontRun<F>>;
}

/// Coverage-driven cascade: each character keeps its requested font when that
/// font covers it, otherwise takes the first fallback that does.
///
/// Characters no candidate covers keep the requested font so the shaper can
/// emit `.notdef`; control characters never force a font switch.
#[derive(Clone, Debug)]
pub struct CascadeSubstitution<F: Font> {
    fallbacks: Vec<F>,
}

impl<F: Font> Default for CascadeSubstitution<F> {
    fn default() -> Self {
        Self {
            fallbacks: Vec::new(),
        }
    }
}

impl<F: Font> CascadeSubstitution<F> {
    pub fn new(fallbacks: Vec<F>) -> Self {
        Self { fallbacks }
    }

    fn covers(font: &F, ch: char) -> bool {
        matches!(font.glyph_for_char(ch), Some(glyph) if glyph != 0 as GlyphId)
    }

    fn choose(&self, requested: Option<&F>, ch: char) -> Option<F> {
        if let Some(font) = requested {
            if Self::covers(font, ch) {
                return Some(font.clone());
            }
        }
        if let Some(fallback) = self.fallbacks.iter().find(|f| Self::covers(f, ch)) {
            tracing::debug!(
                target: "typeline::fonts",
                ch = %ch.escape_unicode(),
                "substituting fallback font"
            );
            return Some(fallback.clone());
        }
        requested.cloned()
    }
}

impl<F: Font> SubstituteFonts<F> for CascadeSubstitution<F> {
    fn runs(&self, text: &str, requests: &[FontRequest<'_, F>]) -> Vec<FontRun<F>> {
        let chars: Vec<char> = text.chars().collect();
        let mut runs: Vec<FontRun<F>> = Vec::new();
        for request in requests {
            for index in request.range.clone() {
                let Some(&ch) = chars.get(index) else { break };
                let font = if ch.is_control() {
                    // Keep the current font across controls and newlines.
                    runs.last()
                        .and_then(|r| r.font.clone())
                        .or_else(|| self.choose(request.font, ch))
                } else {
                    self.choose(request.font, ch)
                };
                match runs.last_mut() {
                    Some(run) if run.font == font => run.range.end = index + 1,
                    _ => runs.push(FontRun {
                        range: index..index + 1,
                        font,
                    }),
                }
            }
        }
        runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testfont::TestFont;

    #[test]
    fn latin_with_punctuation_is_one_run() {
        let runs = UnicodeScriptItemizer.itemize("Hello, world!");
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].range, 0..13);
        assert_eq!(runs[0].script, Script::from_str_lossy("Latn"));
    }

    #[test]
    fn leading_punctuation_joins_following_script() {
        let runs = UnicodeScriptItemizer.itemize("\u{00AB}abc");
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].script, Script::from_str_lossy("Latn"));
    }

    #[test]
    fn script_change_splits_runs() {
        let runs = UnicodeScriptItemizer.itemize("ab\u{05D0}\u{05D1}");
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].script, Script::from_str_lossy("Latn"));
        assert_eq!(runs[1].script, Script::from_str_lossy("Hebr"));
        assert_eq!(runs[1].range, 2..4);
    }

    #[test]
    fn cascade_prefers_requested_font() {
        let base = TestFont::new();
        let fallback = TestFont::named("fallback");
        let sub = CascadeSubstitution::new(vec![fallback]);
        let runs = sub.runs(
            "abc",
            &[FontRequest {
                range: 0..3,
                font: Some(&base),
            }],
        );
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].font.as_ref(), Some(&base));
    }

    #[test]
    fn cascade_substitutes_uncovered_chars() {
        let base = TestFont::new().with_coverage('a'..='z');
        let fallback = TestFont::named("fallback");
        let sub = CascadeSubstitution::new(vec![fallback.clone()]);
        let runs = sub.runs(
            "ab\u{0416}cd",
            &[FontRequest {
                range: 0..5,
                font: Some(&base),
            }],
        );
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[1].font.as_ref(), Some(&fallback));
        assert_eq!(runs[1].range, 2..3);
        assert_eq!(runs[2].range, 3..5);
    }
}
