// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Trait for types that represent the color of glyphs or decorations.
///
/// The default value is used where the spec calls for black: it is the
/// text color when none is set and the fallback for decoration colors.
pub trait Brush: Clone + PartialEq + Default + core::fmt::Debug {}

/// Empty brush.
impl Brush for () {}

/// Brush for a 4-byte color value.
impl Brush for [u8; 4] {}

/// Brush for a 3-byte color value.
impl Brush for [u8; 3] {}
