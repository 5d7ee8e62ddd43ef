// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout context: the engine set and the top-level typesetter.
//!
//! The context owns one instance of every pipeline engine. `Default` fills
//! each slot with the built-in implementation; `with_*` methods override
//! individual engines. A context is reusable across layout calls and may be
//! shared between threads once constructed.

use std::sync::Arc;

use crate::attributed::{AttributedString, Run};
use crate::block::{Block, Container};
use crate::decorate::{Decorate, DecorationEngine};
use crate::error::Result;
use crate::font::Font;
use crate::geom::Rect;
use crate::glyph::GlyphString;
use crate::hyphenate::{self, Hyphenate};
use crate::itemize::{CascadeSubstitution, ScriptItemize, SubstituteFonts, UnicodeScriptItemizer};
use crate::justify::{Justify, PriorityJustifier};
use crate::line::{finalize_line, FinalizeEngines, LineFragment};
use crate::linebreak::{BestFitBreaker, Breakpoint, LineBreak};
use crate::resolve::resolve_runs;
use crate::shape::shape_paragraph;
use crate::style::{Brush, ParagraphStyle};
use crate::truncate::{EllipsisTruncator, Truncate};
use crate::util::nearly_zero;

/// The layout pipeline with its injected engines.
pub struct LayoutContext<B: Brush, F: Font> {
    line_breaker: Box<dyn LineBreak<B, F>>,
    justifier: Box<dyn Justify<B, F>>,
    truncator: Box<dyn Truncate<B, F>>,
    decorator: Box<dyn Decorate<B, F>>,
    substitution: Box<dyn SubstituteFonts<F>>,
    itemizer: Box<dyn ScriptItemize>,
    hyphenator: Box<dyn Hyphenate>,
}

impl<B: Brush, F: Font> core::fmt::Debug for LayoutContext<B, F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LayoutContext").finish_non_exhaustive()
    }
}

impl<B: Brush, F: Font + 'static> Default for LayoutContext<B, F> {
    fn default() -> Self {
        Self {
            line_breaker: Box::new(BestFitBreaker::default()),
            justifier: Box::new(PriorityJustifier::default()),
            truncator: Box::new(EllipsisTruncator::default()),
            decorator: Box::new(DecorationEngine),
            substitution: Box::new(CascadeSubstitution::default()),
            itemizer: Box::new(UnicodeScriptItemizer),
            hyphenator: Self::default_hyphenator(),
        }
    }
}

impl<B: Brush, F: Font> LayoutContext<B, F> {
    pub fn new() -> Self
    where
        F: 'static,
    {
        Self::default()
    }

    #[cfg(feature = "hyphenation")]
    fn default_hyphenator() -> Box<dyn Hyphenate> {
        Box::new(crate::hyphenate::PatternHyphenator::default())
    }

    #[cfg(not(feature = "hyphenation"))]
    fn default_hyphenator() -> Box<dyn Hyphenate> {
        Box::new(crate::hyphenate::NoHyphenation)
    }

    pub fn with_line_breaker(mut self, engine: impl LineBreak<B, F> + 'static) -> Self {
        self.line_breaker = Box::new(engine);
        self
    }

    pub fn with_justifier(mut self, engine: impl Justify<B, F> + 'static) -> Self {
        self.justifier = Box::new(engine);
        self
    }

    pub fn with_truncator(mut self, engine: impl Truncate<B, F> + 'static) -> Self {
        self.truncator = Box::new(engine);
        self
    }

    pub fn with_decorator(mut self, engine: impl Decorate<B, F> + 'static) -> Self {
        self.decorator = Box::new(engine);
        self
    }

    pub fn with_font_substitution(mut self, engine: impl SubstituteFonts<F> + 'static) -> Self {
        self.substitution = Box::new(engine);
        self
    }

    pub fn with_script_itemizer(mut self, engine: impl ScriptItemize + 'static) -> Self {
        self.itemizer = Box::new(engine);
        self
    }

    pub fn with_hyphenator(mut self, engine: impl Hyphenate + 'static) -> Self {
        self.hyphenator = Box::new(engine);
        self
    }

    /// Lays out `string` into `containers`, replacing their blocks.
    ///
    /// Containers are filled in order, column by column. Content that fits
    /// nowhere is dropped and the last placed line is marked truncated. On
    /// error the containers are left in an unspecified partial state.
    pub fn layout(
        &self,
        string: &AttributedString<B, F>,
        containers: &mut [Container<B, F>],
    ) -> Result<()> {
        for container in containers.iter_mut() {
            container.blocks.clear();
        }
        let paragraphs = self.prepare_paragraphs(string)?;
        tracing::debug!(
            target: "typeline::layout",
            paragraphs = paragraphs.len(),
            containers = containers.len(),
            "starting flow"
        );
        self.flow(&paragraphs, containers);
        Ok(())
    }

    fn prepare_paragraphs(&self, string: &AttributedString<B, F>) -> Result<Vec<Paragraph<B, F>>> {
        let map = crate::util::CharMap::new(string.text());
        let mut paragraphs = Vec::new();
        for range in string.paragraphs() {
            let text = map.slice(string.text(), range.clone());
            let chars: Arc<[char]> = text.chars().collect();

            let mut local_runs: Vec<Run<B, F>> = Vec::new();
            for run in string.runs() {
                let start = run.range.start.max(range.start);
                let end = run.range.end.min(range.end);
                if start < end {
                    local_runs.push(Run {
                        range: start - range.start..end - range.start,
                        style: run.style.clone(),
                    });
                }
            }
            let style = local_runs
                .first()
                .map(|run| ParagraphStyle::from_style(&run.style))
                .unwrap_or_default();

            let resolved = resolve_runs(
                text,
                range.start,
                &local_runs,
                self.substitution.as_ref(),
                self.itemizer.as_ref(),
            )?;
            let glyphs = shape_paragraph(text, &chars, range.start, &resolved)?;
            let run_bounds: Vec<_> = local_runs.iter().map(|run| run.range.clone()).collect();
            let breaks = hyphenate::breakpoints(text, &run_bounds, self.hyphenator.as_ref());
            paragraphs.push(Paragraph {
                style,
                glyphs,
                breaks,
            });
        }
        Ok(paragraphs)
    }

    fn flow(&self, paragraphs: &[Paragraph<B, F>], containers: &mut [Container<B, F>]) {
        let engines = FinalizeEngines {
            justifier: self.justifier.as_ref(),
            truncator: self.truncator.as_ref(),
            decorator: self.decorator.as_ref(),
        };

        let mut para_index = 0;
        // Glyph offset consumed within the current paragraph, and the number
        // of lines the paragraph has produced so far (across columns).
        let mut para_pos = 0;
        let mut para_lines = 0;

        'containers: for container in containers.iter_mut() {
            for column in container.column_rects() {
                let mut y = column.y;
                // The block being filled in this column, pushed to the
                // container whenever the paragraph or the column ends.
                let mut open: Option<Block<B, F>> = None;

                while para_index < paragraphs.len() && y < column.max_y() {
                    let para = &paragraphs[para_index];
                    let glyph_range = para.glyphs.glyph_range();
                    if para_pos >= glyph_range.end {
                        // Paragraph consumed (or shaped to nothing).
                        if let Some(block) = open.take() {
                            container.blocks.push(block);
                        }
                        if y > column.y {
                            y += para.style.paragraph_spacing;
                        }
                        para_index += 1;
                        para_pos = 0;
                        para_lines = 0;
                        continue;
                    }

                    let style = &para.style;
                    let first_line = para_pos == glyph_range.start;
                    let indent = if first_line { style.indent } else { 0. };
                    let x = column.x + style.margin_left + indent;
                    let width =
                        (column.width - style.margin_left - style.margin_right - indent).max(0.);

                    let lines_left = style.max_lines.map(|m| m.saturating_sub(para_lines).max(1));
                    let remaining = para.glyphs.slice(para_pos..glyph_range.end);
                    let broken = self.line_breaker.break_lines(
                        &remaining,
                        &para.breaks,
                        width,
                        &ParagraphStyle {
                            max_lines: lines_left,
                            ..*style
                        },
                    );
                    if broken.lines.is_empty() {
                        para_pos = glyph_range.end;
                        continue;
                    }
                    // The first line of a paragraph is narrower by the
                    // indent; once placed, the remainder re-breaks at the
                    // full measure.
                    let take = if first_line && !nearly_zero(style.indent) {
                        1
                    } else {
                        broken.lines.len()
                    };

                    for (i, line) in broken.lines.iter().take(take).enumerate() {
                        if y >= column.max_y() {
                            break;
                        }
                        let height = line.height();
                        let is_broken_last = i + 1 == broken.lines.len();
                        let is_truncated = broken.truncated && is_broken_last;
                        let is_last = is_truncated || line.glyph_range().end == glyph_range.end;
                        let mut fragment =
                            LineFragment::new(Rect::new(x, y, width, height), line.clone());
                        finalize_line(&mut fragment, style, is_last, is_truncated, &engines);
                        open.get_or_insert_with(|| Block::new(*style))
                            .fragments
                            .push(fragment);
                        y += height + style.line_spacing;
                        para_pos = line.glyph_range().end;
                        para_lines += 1;
                        if is_truncated {
                            para_pos = glyph_range.end;
                        }
                    }
                    if para_pos >= glyph_range.end {
                        // Paragraph complete; close its block so the next
                        // paragraph starts a fresh one.
                        if let Some(block) = open.take() {
                            container.blocks.push(block);
                        }
                        y += style.paragraph_spacing;
                        para_index += 1;
                        para_pos = 0;
                        para_lines = 0;
                    }
                }

                if let Some(block) = open.take() {
                    container.blocks.push(block);
                }
                if para_index >= paragraphs.len() {
                    break 'containers;
                }
            }
        }

        if para_index < paragraphs.len() {
            tracing::debug!(
                target: "typeline::layout",
                unplaced_paragraphs = paragraphs.len() - para_index,
                "content exceeds all containers; truncating"
            );
            // Mark the last placed line truncated, per the overflow policy.
            if let Some(fragment) = containers
                .iter_mut()
                .rev()
                .flat_map(|c| c.blocks.iter_mut().rev())
                .flat_map(|b| b.fragments.iter_mut().rev())
                .next()
            {
                fragment.truncated = true;
            }
        }
    }
}

struct Paragraph<B: Brush, F: Font> {
    style: ParagraphStyle,
    glyphs: GlyphString<B, F>,
    breaks: Vec<Breakpoint>,
}
