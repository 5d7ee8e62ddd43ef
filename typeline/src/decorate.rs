// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decoration geometry: underline and strikethrough rectangles.
//!
//! Emitted per finalized line. Wavy, dashed, dotted, and double styles are
//! recorded on the decoration for the renderer to expand; the rect here is
//! the stable band the expansion happens within.

use crate::font::Font;
use crate::geom::Rect;
use crate::glyph::{GlyphRun, GlyphString};
use crate::style::{Brush, DecorationStyle};
use crate::util::nearly_eq;

/// A positioned decoration band.
#[derive(Clone, PartialEq, Debug)]
pub struct DecorationLine<B: Brush> {
    pub rect: Rect,
    pub brush: B,
    pub style: DecorationStyle,
    pub opacity: f32,
}

/// Produces decoration geometry for a finalized line.
pub trait Decorate<B: Brush, F: Font>: Send + Sync {
    /// `origin_x` is where the line's first glyph starts; `baseline_y` is
    /// the y coordinate of the alphabetic baseline.
    fn decorate(
        &self,
        line: &GlyphString<B, F>,
        origin_x: f32,
        baseline_y: f32,
    ) -> Vec<DecorationLine<B>>;
}

/// Default decoration engine.
#[derive(Copy, Clone, Default, Debug)]
pub struct DecorationEngine;

impl DecorationEngine {
    fn push_merged<B: Brush>(lines: &mut Vec<DecorationLine<B>>, decoration: DecorationLine<B>) {
        if let Some(last) = lines.last_mut() {
            if last.style == decoration.style
                && last.brush == decoration.brush
                && nearly_eq(last.rect.y, decoration.rect.y)
                && nearly_eq(last.rect.height, decoration.rect.height)
                && nearly_eq(last.rect.max_x(), decoration.rect.x)
            {
                last.rect.width += decoration.rect.width;
                return;
            }
        }
        lines.push(decoration);
    }

    fn underline_for<B: Brush, F: Font>(
        run: &GlyphRun<B, F>,
        x: f32,
        baseline_y: f32,
        advance: f32,
    ) -> DecorationLine<B> {
        let scale = run.scale();
        let metrics = run.font().metrics();
        DecorationLine {
            rect: Rect::new(
                x,
                baseline_y - metrics.underline_position * scale,
                advance,
                metrics.underline_thickness * scale,
            ),
            brush: run
                .style()
                .underline_brush
                .clone()
                .unwrap_or_else(|| run.style().color.clone()),
            style: run.style().underline_style,
            opacity: 1.,
        }
    }

    fn strikethrough_for<B: Brush, F: Font>(
        run: &GlyphRun<B, F>,
        x: f32,
        baseline_y: f32,
        advance: f32,
    ) -> DecorationLine<B> {
        let scale = run.scale();
        let metrics = run.font().metrics();
        DecorationLine {
            rect: Rect::new(
                x,
                baseline_y - run.ascent() / 3.,
                advance,
                metrics.underline_thickness * scale,
            ),
            brush: run
                .style()
                .strikethrough_brush
                .clone()
                .unwrap_or_else(|| run.style().color.clone()),
            style: run.style().strikethrough_style,
            opacity: 1.,
        }
    }
}

impl<B: Brush, F: Font> Decorate<B, F> for DecorationEngine {
    fn decorate(
        &self,
        line: &GlyphString<B, F>,
        origin_x: f32,
        baseline_y: f32,
    ) -> Vec<DecorationLine<B>> {
        let mut underlines: Vec<DecorationLine<B>> = Vec::new();
        let mut strikes: Vec<DecorationLine<B>> = Vec::new();
        let mut x = origin_x;
        for run in line.runs() {
            let advance = run.advance();
            if run.style().has_underline {
                Self::push_merged(
                    &mut underlines,
                    Self::underline_for(run, x, baseline_y, advance),
                );
            }
            if run.style().has_strikethrough {
                Self::push_merged(
                    &mut strikes,
                    Self::strikethrough_for(run, x, baseline_y, advance),
                );
            }
            x += advance;
        }
        underlines.extend(strikes);
        underlines
    }
}
