// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Output aggregates: blocks and containers.

use crate::font::Font;
use crate::geom::{BBox, Rect};
use crate::line::LineFragment;
use crate::style::{Brush, ParagraphStyle};

/// The laid-out portion of one paragraph within one column.
#[derive(Clone, Debug)]
pub struct Block<B: Brush, F: Font> {
    pub fragments: Vec<LineFragment<B, F>>,
    pub style: ParagraphStyle,
}

impl<B: Brush, F: Font> Block<B, F> {
    pub(crate) fn new(style: ParagraphStyle) -> Self {
        Self {
            fragments: Vec::new(),
            style,
        }
    }

    /// Bounding box of the block's line rects.
    pub fn bbox(&self) -> Rect {
        let mut bbox = BBox::new();
        for fragment in &self.fragments {
            bbox.add_rect(&fragment.rect);
        }
        bbox.rect()
    }

    pub fn height(&self) -> f32 {
        self.bbox().height
    }
}

/// A target region text flows into: a rect split into one or more columns.
///
/// `layout` fills `blocks` in flow order; a paragraph spanning columns
/// produces one block per column portion.
#[derive(Clone, Debug)]
pub struct Container<B: Brush, F: Font> {
    pub rect: Rect,
    pub columns: usize,
    pub column_gap: f32,
    pub blocks: Vec<Block<B, F>>,
}

impl<B: Brush, F: Font> Container<B, F> {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            columns: 1,
            column_gap: 0.,
            blocks: Vec::new(),
        }
    }

    pub fn with_columns(mut self, columns: usize, column_gap: f32) -> Self {
        self.columns = columns.max(1);
        self.column_gap = column_gap;
        self
    }

    /// Splits the rect into equal-width column rects separated by the gap.
    pub(crate) fn column_rects(&self) -> Vec<Rect> {
        let columns = self.columns.max(1);
        let gaps = self.column_gap * (columns - 1) as f32;
        let width = ((self.rect.width - gaps) / columns as f32).max(0.);
        (0..columns)
            .map(|i| {
                Rect::new(
                    self.rect.x + (width + self.column_gap) * i as f32,
                    self.rect.y,
                    width,
                    self.rect.height,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testfont::TestFont;

    #[test]
    fn columns_split_the_rect_evenly() {
        let container =
            Container::<[u8; 4], TestFont>::new(Rect::new(0., 0., 110., 200.)).with_columns(2, 10.);
        let rects = container.column_rects();
        assert_eq!(rects.len(), 2);
        assert_eq!(rects[0], Rect::new(0., 0., 50., 200.));
        assert_eq!(rects[1], Rect::new(60., 0., 50., 200.));
    }

    #[test]
    fn single_column_covers_the_rect() {
        let container = Container::<[u8; 4], TestFont>::new(Rect::new(5., 5., 90., 90.));
        let rects = container.column_rects();
        assert_eq!(rects, vec![Rect::new(5., 5., 90., 90.)]);
    }
}
