// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rich text layout.
//!
//! Typeline turns an [`AttributedString`] plus a set of [`Container`]s into
//! positioned blocks of line fragments ready for a renderer: shaped glyphs,
//! decoration geometry, and overflow metadata.
//!
//! The pipeline is a fixed sequence of passes: style runs are flattened with
//! font-substitution, script, and bidi runs; paragraphs are split and shaped
//! through a [`Font`] oracle; lines are chosen by an optimizing breaker;
//! each line is finalized (trimmed, aligned, justified, decorated) and
//! emitted into the containers' blocks.
//!
//! Every engine in the pipeline is injected: construct a [`LayoutContext`]
//! and override any subset of them.
//!
//! ```no_run
//! use typeline::{AttributedString, Container, LayoutContext, Rect, TextStyle};
//! # #[derive(Clone, PartialEq, Debug)] struct MyFont;
//! # impl typeline::Font for MyFont {
//! #     fn metrics(&self) -> typeline::FontMetrics { unimplemented!() }
//! #     fn layout(&self, _: &str, _: &[typeline::FontFeature], _: Option<typeline::Script>) -> typeline::ShapedRun { unimplemented!() }
//! #     fn glyph_for_char(&self, _: char) -> Option<typeline::GlyphId> { unimplemented!() }
//! # }
//! # fn font() -> MyFont { MyFont }
//! let style = TextStyle::<[u8; 4], MyFont> {
//!     font: Some(font()),
//!     font_size: 12.,
//!     ..TextStyle::default()
//! };
//! let text = AttributedString::new("Hello, world!", style);
//! let mut containers = vec![Container::new(Rect::new(0., 0., 200., 400.))];
//! LayoutContext::new().layout(&text, &mut containers)?;
//! for block in &containers[0].blocks {
//!     for line in &block.fragments {
//!         // hand line.string, line.rect, line.decorations to the renderer
//!     }
//! }
//! # Ok::<(), typeline::Error>(())
//! ```

mod attributed;
mod bidi;
mod block;
mod context;
mod decorate;
mod error;
mod font;
mod geom;
mod glyph;
mod hyphenate;
mod itemize;
mod justify;
mod line;
mod linebreak;
mod resolve;
mod setting;
mod shape;
mod style;
#[cfg(test)]
pub(crate) mod testfont;
mod truncate;
mod util;

pub use attributed::{AttributedString, RangedBuilder, Run};
pub use bidi::{resolve_levels, LevelRun};
pub use block::{Block, Container};
pub use context::LayoutContext;
pub use decorate::{Decorate, DecorationEngine, DecorationLine};
pub use error::{Error, ErrorKind, Result};
pub use font::{Font, FontFeature, FontMetrics, GlyphId, Position, Script, ShapedRun};
pub use geom::{BBox, Point, Rect, Size};
pub use glyph::{GlyphRun, GlyphString};
pub use hyphenate::{Hyphenate, NoHyphenation};
#[cfg(feature = "hyphenation")]
pub use hyphenate::PatternHyphenator;
pub use itemize::{
    CascadeSubstitution, FontRequest, FontRun, ScriptItemize, ScriptRun, SubstituteFonts,
    UnicodeScriptItemizer,
};
pub use justify::{Justify, Priority, PriorityJustifier, StretchFactor};
pub use line::LineFragment;
pub use linebreak::{BestFitBreaker, BreakClass, Breakpoint, BrokenLines, LineBreak};
pub use style::{
    Alignment, Attachment, Brush, DecorationStyle, ParagraphStyle, StyleProperty, TextStyle,
    TruncationMode,
};
pub use truncate::{EllipsisTruncator, Truncate};
