//! Byte-offset source spans.

use serde::Serialize;

/// A half-open byte range `[start, end)` in a compilation unit's source text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Sentinel for nodes that carry no usable position.
    pub const INVALID: Self = Self {
        start: u32::MAX,
        end: u32::MAX,
    };

    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// A span is valid when it is not the sentinel and `start <= end`.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.start != u32::MAX && self.start <= self.end
    }

    #[must_use]
    pub const fn len(self) -> u32 {
        if self.is_valid() {
            self.end - self.start
        } else {
            0
        }
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Whether `pos` falls inside this span (end exclusive).
    #[must_use]
    pub const fn contains(self, pos: u32) -> bool {
        self.is_valid() && self.start <= pos && pos < self.end
    }

    /// Whether `other` lies entirely within this span.
    #[must_use]
    pub const fn encloses(self, other: Span) -> bool {
        self.is_valid() && other.is_valid() && self.start <= other.start && other.end <= self.end
    }
}
