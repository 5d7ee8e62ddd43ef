// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rich styling support.

mod brush;

pub use brush::Brush;

use crate::font::{Font, FontFeature, Script};
use smallvec::SmallVec;

/// Horizontal alignment of a line within its rect.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum Alignment {
    /// Align content to the left edge.
    #[default]
    Left,
    /// Align each line centered within the rect.
    Center,
    /// Align content to the right edge.
    Right,
    /// Spread content to fill the rect, except on the last line.
    Justify,
}

impl Alignment {
    /// Fraction of the free space placed before the line content.
    pub(crate) fn factor(self) -> f32 {
        match self {
            Self::Left | Self::Justify => 0.,
            Self::Center => 0.5,
            Self::Right => 1.,
        }
    }
}

/// Visual style of an underline or strikethrough line.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub enum DecorationStyle {
    #[default]
    Solid,
    Double,
    Dashed,
    Dotted,
    Wavy,
}

/// Which part of an overlong last line is elided.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TruncationMode {
    /// Elide the start of the line.
    Head,
    /// Elide the middle of the line.
    Middle,
    /// Elide the end of the line.
    Tail,
}

/// An inline attachment anchored at an object replacement character.
///
/// The attachment occupies `width` layout units of advance on its line; the
/// renderer resolves `id` to the actual content and draws it with the given
/// offsets, analogous to an inline box.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Attachment {
    pub width: f32,
    pub height: f32,
    pub x_offset: f32,
    pub y_offset: f32,
    /// Opaque identifier the renderer maps to an image or widget.
    pub id: u64,
}

/// Fully resolved character style: every attribute populated with either the
/// caller's value or its default.
#[derive(Clone, PartialEq, Debug)]
pub struct TextStyle<B: Brush, F: Font> {
    /// Brush for rendering glyphs.
    pub color: B,
    /// Brush for the run's background rectangle.
    pub background: Option<B>,
    /// Font handle; must be present (directly or via substitution) by
    /// shaping time.
    pub font: Option<F>,
    /// Font size in layout units per em.
    pub font_size: f32,
    /// Absolute line height override in layout units.
    pub line_height: Option<f32>,
    /// Underline decoration.
    pub has_underline: bool,
    /// Brush for the underline; falls back to `color`.
    pub underline_brush: Option<B>,
    pub underline_style: DecorationStyle,
    /// Strikethrough decoration.
    pub has_strikethrough: bool,
    /// Brush for the strikethrough; falls back to `color`.
    pub strikethrough_brush: Option<B>,
    pub strikethrough_style: DecorationStyle,
    /// Hyperlink target, surfaced to the renderer per run.
    pub link: Option<String>,
    /// Whether glyphs are filled.
    pub fill: bool,
    /// Whether glyph outlines are stroked.
    pub stroke: bool,
    /// OpenType features passed to the shaper, in order.
    pub features: SmallVec<[FontFeature; 4]>,
    /// Extra advance added to space glyphs, in layout units.
    pub word_spacing: f32,
    /// Vertical glyph offset as a fraction of the em.
    pub y_offset: f32,
    /// Extra advance added to every glyph, in layout units.
    pub character_spacing: f32,
    /// Attachment bound to U+FFFC characters in this run.
    pub attachment: Option<Attachment>,
    /// ISO 15924 script override; itemized from the text when `None`.
    pub script: Option<Script>,
    /// Bidi embedding level override; resolved from the text when `None`.
    pub bidi_level: Option<u8>,
    /// Alignment for every line but the last of a paragraph.
    pub align: Alignment,
    /// Alignment for the last line of a paragraph.
    pub align_last_line: Alignment,

    // Paragraph-level attributes, read from the first run of a paragraph.
    pub margin_left: f32,
    pub margin_right: f32,
    /// Extra first-line inset.
    pub indent: f32,
    /// Maximum number of lines before the paragraph is truncated.
    pub max_lines: Option<usize>,
    /// Extra vertical space between lines, in layout units.
    pub line_spacing: f32,
    /// Extra vertical space after the paragraph, in layout units.
    pub paragraph_spacing: f32,
    /// Let qualifying punctuation overflow the line rect.
    pub hanging_punctuation: bool,
    /// How the last line of a truncated paragraph is elided.
    pub truncation_mode: Option<TruncationMode>,
    /// Fraction of the justification gap that is distributed.
    pub justification_factor: f32,
}

impl<B: Brush, F: Font> Default for TextStyle<B, F> {
    fn default() -> Self {
        Self {
            color: B::default(),
            background: None,
            font: None,
            font_size: 12.,
            line_height: None,
            has_underline: false,
            underline_brush: None,
            underline_style: DecorationStyle::default(),
            has_strikethrough: false,
            strikethrough_brush: None,
            strikethrough_style: DecorationStyle::default(),
            link: None,
            fill: true,
            stroke: false,
            features: SmallVec::new(),
            word_spacing: 0.,
            y_offset: 0.,
            character_spacing: 0.,
            attachment: None,
            script: None,
            bidi_level: None,
            align: Alignment::default(),
            align_last_line: Alignment::default(),
            margin_left: 0.,
            margin_right: 0.,
            indent: 0.,
            max_lines: None,
            line_spacing: 0.,
            paragraph_spacing: 0.,
            hanging_punctuation: false,
            truncation_mode: None,
            justification_factor: 1.,
        }
    }
}

impl<B: Brush, F: Font> TextStyle<B, F> {
    /// Applies a single property override.
    pub(crate) fn apply(&mut self, property: StyleProperty<B, F>) {
        use self::StyleProperty::*;
        match property {
            Color(value) => self.color = value,
            Background(value) => self.background = value,
            FontHandle(value) => self.font = value,
            FontSize(value) => self.font_size = value,
            LineHeight(value) => self.line_height = value,
            Underline(value) => self.has_underline = value,
            UnderlineBrush(value) => self.underline_brush = value,
            UnderlineStyle(value) => self.underline_style = value,
            Strikethrough(value) => self.has_strikethrough = value,
            StrikethroughBrush(value) => self.strikethrough_brush = value,
            StrikethroughStyle(value) => self.strikethrough_style = value,
            Link(value) => self.link = value,
            Fill(value) => self.fill = value,
            Stroke(value) => self.stroke = value,
            FontFeatures(value) => self.features = value,
            WordSpacing(value) => self.word_spacing = value,
            YOffset(value) => self.y_offset = value,
            CharacterSpacing(value) => self.character_spacing = value,
            AttachmentRef(value) => self.attachment = value,
            ScriptOverride(value) => self.script = value,
            BidiLevel(value) => self.bidi_level = value,
            Align(value) => self.align = value,
            AlignLastLine(value) => self.align_last_line = value,
            MarginLeft(value) => self.margin_left = value,
            MarginRight(value) => self.margin_right = value,
            Indent(value) => self.indent = value,
            MaxLines(value) => self.max_lines = value,
            LineSpacing(value) => self.line_spacing = value,
            ParagraphSpacing(value) => self.paragraph_spacing = value,
            HangingPunctuation(value) => self.hanging_punctuation = value,
            Truncation(value) => self.truncation_mode = value,
            JustificationFactor(value) => self.justification_factor = value,
        }
    }

    /// Whether applying `property` would leave the style unchanged.
    pub(crate) fn check(&self, property: &StyleProperty<B, F>) -> bool {
        use self::StyleProperty::*;
        match property {
            Color(value) => self.color == *value,
            Background(value) => self.background == *value,
            FontHandle(value) => self.font == *value,
            FontSize(value) => self.font_size == *value,
            LineHeight(value) => self.line_height == *value,
            Underline(value) => self.has_underline == *value,
            UnderlineBrush(value) => self.underline_brush == *value,
            UnderlineStyle(value) => self.underline_style == *value,
            Strikethrough(value) => self.has_strikethrough == *value,
            StrikethroughBrush(value) => self.strikethrough_brush == *value,
            StrikethroughStyle(value) => self.strikethrough_style == *value,
            Link(value) => self.link == *value,
            Fill(value) => self.fill == *value,
            Stroke(value) => self.stroke == *value,
            FontFeatures(value) => self.features == *value,
            WordSpacing(value) => self.word_spacing == *value,
            YOffset(value) => self.y_offset == *value,
            CharacterSpacing(value) => self.character_spacing == *value,
            AttachmentRef(value) => self.attachment == *value,
            ScriptOverride(value) => self.script == *value,
            BidiLevel(value) => self.bidi_level == *value,
            Align(value) => self.align == *value,
            AlignLastLine(value) => self.align_last_line == *value,
            MarginLeft(value) => self.margin_left == *value,
            MarginRight(value) => self.margin_right == *value,
            Indent(value) => self.indent == *value,
            MaxLines(value) => self.max_lines == *value,
            LineSpacing(value) => self.line_spacing == *value,
            ParagraphSpacing(value) => self.paragraph_spacing == *value,
            HangingPunctuation(value) => self.hanging_punctuation == *value,
            Truncation(value) => self.truncation_mode == *value,
            JustificationFactor(value) => self.justification_factor == *value,
        }
    }
}

/// A single style attribute override.
#[derive(Clone, PartialEq, Debug)]
pub enum StyleProperty<B: Brush, F: Font> {
    Color(B),
    Background(Option<B>),
    FontHandle(Option<F>),
    FontSize(f32),
    LineHeight(Option<f32>),
    Underline(bool),
    UnderlineBrush(Option<B>),
    UnderlineStyle(DecorationStyle),
    Strikethrough(bool),
    StrikethroughBrush(Option<B>),
    StrikethroughStyle(DecorationStyle),
    Link(Option<String>),
    Fill(bool),
    Stroke(bool),
    FontFeatures(SmallVec<[FontFeature; 4]>),
    WordSpacing(f32),
    YOffset(f32),
    CharacterSpacing(f32),
    AttachmentRef(Option<Attachment>),
    ScriptOverride(Option<Script>),
    BidiLevel(Option<u8>),
    Align(Alignment),
    AlignLastLine(Alignment),
    MarginLeft(f32),
    MarginRight(f32),
    Indent(f32),
    MaxLines(Option<usize>),
    LineSpacing(f32),
    ParagraphSpacing(f32),
    HangingPunctuation(bool),
    Truncation(Option<TruncationMode>),
    JustificationFactor(f32),
}

/// Paragraph-level style, projected once from the first run of a paragraph.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct ParagraphStyle {
    pub align: Alignment,
    pub align_last_line: Alignment,
    pub margin_left: f32,
    pub margin_right: f32,
    pub indent: f32,
    pub max_lines: Option<usize>,
    pub line_spacing: f32,
    pub paragraph_spacing: f32,
    pub hanging_punctuation: bool,
    pub truncation_mode: Option<TruncationMode>,
    pub justification_factor: f32,
}

impl Default for ParagraphStyle {
    fn default() -> Self {
        Self {
            align: Alignment::default(),
            align_last_line: Alignment::default(),
            margin_left: 0.,
            margin_right: 0.,
            indent: 0.,
            max_lines: None,
            line_spacing: 0.,
            paragraph_spacing: 0.,
            hanging_punctuation: false,
            truncation_mode: None,
            justification_factor: 1.,
        }
    }
}

impl ParagraphStyle {
    /// Projects the paragraph-level attributes out of a character style.
    pub fn from_style<B: Brush, F: Font>(style: &TextStyle<B, F>) -> Self {
        Self {
            align: style.align,
            align_last_line: style.align_last_line,
            margin_left: style.margin_left,
            margin_right: style.margin_right,
            indent: style.indent,
            max_lines: style.max_lines,
            line_spacing: style.line_spacing,
            paragraph_spacing: style.paragraph_spacing,
            hanging_punctuation: style.hanging_punctuation,
            truncation_mode: style.truncation_mode,
            justification_factor: style.justification_factor,
        }
    }
}
