//! Small display helpers shared across the pager crates.

use std::fmt;

/// A wrapper around a `usize` that represents a size in bytes, for
/// human-readable logging (e.g. "frame table: 64 frames (256 KiB)").
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ByteSize(pub usize);

impl ByteSize {
    pub const UNITS: &'static [&'static str] = &["B", "KiB", "MiB", "GiB", "TiB"];

    #[must_use]
    pub const fn new(size: usize) -> Self {
        Self(size)
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut value = self.0 as f64;
        let mut unit = 0;
        while value >= 1024.0 && unit < ByteSize::UNITS.len() - 1 {
            value /= 1024.0;
            unit += 1;
        }
        if unit == 0 {
            write!(f, "{} {}", self.0, ByteSize::UNITS[unit])
        } else {
            write!(f, "{value:.1} {}", ByteSize::UNITS[unit])
        }
    }
}
