// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout error type.

/// Error raised by a layout call.
///
/// Carries a non-exhaustive [`ErrorKind`] plus the character range the
/// failure was observed at. All errors are fatal to the current layout call;
/// the caller's containers may be left partially filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,

    /// Start character index of the offending range.
    start: usize,

    /// End character index (exclusive) of the offending range.
    end: usize,
}

impl Error {
    /// The machine-readable category for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The start character index of the offending range.
    pub fn start(&self) -> usize {
        self.start
    }

    /// The end character index of the offending range.
    pub fn end(&self) -> usize {
        self.end
    }

    pub(crate) fn invalid_runs(start: usize, end: usize) -> Self {
        Self {
            kind: ErrorKind::InvalidRuns,
            start,
            end,
        }
    }

    pub(crate) fn missing_font(start: usize, end: usize) -> Self {
        Self {
            kind: ErrorKind::MissingFont,
            start,
            end,
        }
    }

    pub(crate) fn shaping_failed(start: usize, end: usize) -> Self {
        Self {
            kind: ErrorKind::ShapingFailed,
            start,
            end,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind {
            ErrorKind::InvalidRuns => write!(
                f,
                "style runs do not partition the text at characters {}..{}",
                self.start, self.end
            ),
            ErrorKind::MissingFont => write!(
                f,
                "no font resolved for characters {}..{}",
                self.start, self.end
            ),
            ErrorKind::ShapingFailed => write!(
                f,
                "shaper returned inconsistent indices for characters {}..{}",
                self.start, self.end
            ),
        }
    }
}

impl core::error::Error for Error {}

/// The non-exhaustive category of a layout error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The input run set was overlapping, non-contiguous, or extended past
    /// the end of the string.
    InvalidRuns,

    /// A run had no font after substitution.
    MissingFont,

    /// The font oracle returned glyph/character index mappings that are
    /// inconsistent with the shaped substring.
    ShapingFailed,
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
