// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bidi embedding levels as a run source.
//!
//! The bidi algorithm proper is external (the `unicode-bidi` crate); this
//! adapter turns its per-byte levels into character-coordinate runs that the
//! resolver overlays when styles carry no explicit `bidi_level`. The core
//! performs no visual reordering; levels ride along on glyph runs for the
//! renderer.

use core::ops::Range;

use unicode_bidi::{BidiInfo, Level};

/// A run of characters sharing one embedding level.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LevelRun {
    pub range: Range<usize>,
    pub level: u8,
}

/// Computes embedding level runs for `text` in character coordinates.
///
/// `base_level` forces the paragraph direction; `None` lets the first strong
/// character decide.
pub fn resolve_levels(text: &str, base_level: Option<u8>) -> Vec<LevelRun> {
    if text.is_empty() {
        return Vec::new();
    }
    let base = base_level.and_then(|l| Level::new(l).ok());
    let info = BidiInfo::new(text, base);
    let mut runs: Vec<LevelRun> = Vec::new();
    for (char_index, (byte_index, _)) in text.char_indices().enumerate() {
        let level = info.levels[byte_index].number();
        match runs.last_mut() {
            Some(run) if run.level == level => run.range.end = char_index + 1,
            _ => runs.push(LevelRun {
                range: char_index..char_index + 1,
                level,
            }),
        }
    }
    runs
}
