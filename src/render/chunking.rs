use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Series with at least this many items are drawn in chunks spread over
/// clock ticks.
pub const DEFAULT_CHUNK_THRESHOLD: usize = 100_000;
pub const DEFAULT_CHUNK_SIZE: usize = 20_000;

/// Splits a draw of `total` items into consecutive ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkPlan {
    pub total: usize,
    pub chunk_size: usize,
}

impl ChunkPlan {
    /// Plan for `total` items; one chunk unless `total` reaches `threshold`.
    #[must_use]
    pub fn new(total: usize, threshold: usize, chunk_size: usize) -> Self {
        let chunk_size = if total >= threshold && total > 0 {
            chunk_size.max(1)
        } else {
            total.max(1)
        };
        Self { total, chunk_size }
    }

    #[must_use]
    pub fn chunk_count(self) -> usize {
        self.total.div_ceil(self.chunk_size)
    }

    #[must_use]
    pub fn is_chunked(self) -> bool {
        self.chunk_count() > 1
    }

    /// Range of chunk `index`, `None` past the end.
    #[must_use]
    pub fn chunk(self, index: usize) -> Option<Range<usize>> {
        let start = index.checked_mul(self.chunk_size)?;
        if start >= self.total {
            return None;
        }
        Some(start..(start + self.chunk_size).min(self.total))
    }
}
