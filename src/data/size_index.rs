//! Sparse per-axis size index.
//!
//! Rows (or columns) without an explicit entry have the default size. The
//! index keeps the explicit entries sorted together with a prefix sum of
//! their deltas from the default, so both directions of the
//! index <-> pixel-offset mapping are a binary search over the explicit
//! entries followed by arithmetic inside a default-sized run. Neither
//! direction ever walks the full extent of the sheet.

/// One explicit size, in pixels (0 for hidden).
#[derive(Debug, Clone, Copy, PartialEq)]
struct Entry {
    idx: u32,
    px: f64,
}

#[derive(Debug, Clone)]
pub struct SizeIndex {
    default_px: f64,
    entries: Vec<Entry>,
    /// `prefix[i]` = sum of `(px - default_px)` over `entries[..i]`
    prefix: Vec<f64>,
}

impl SizeIndex {
    pub fn new(default_px: f64) -> Self {
        Self {
            default_px,
            entries: Vec::new(),
            prefix: vec![0.0],
        }
    }

    pub fn default_px(&self) -> f64 {
        self.default_px
    }

    /// Number of explicit entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest index with an explicit entry.
    pub fn last_explicit(&self) -> Option<u32> {
        self.entries.last().map(|e| e.idx)
    }

    /// Set the pixel size of `idx`. Returns the previous explicit size, if any.
    pub fn set(&mut self, idx: u32, px: f64) -> Option<f64> {
        let pos = self.entries.partition_point(|e| e.idx < idx);
        let (old, delta) = match self.entries.get_mut(pos) {
            Some(entry) if entry.idx == idx => {
                let old = entry.px;
                entry.px = px;
                (Some(old), px - old)
            }
            _ => {
                self.entries.insert(pos, Entry { idx, px });
                let before = self.prefix.get(pos).copied().unwrap_or(0.0);
                self.prefix.insert(pos + 1, before);
                (None, px - self.default_px)
            }
        };
        if delta != 0.0 {
            for p in self.prefix.iter_mut().skip(pos + 1) {
                *p += delta;
            }
        }
        old
    }

    /// Drop every explicit entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.prefix.clear();
        self.prefix.push(0.0);
    }

    /// Pixel size of `idx` (default when no explicit entry exists).
    pub fn size(&self, idx: u32) -> f64 {
        let pos = self.entries.partition_point(|e| e.idx < idx);
        match self.entries.get(pos) {
            Some(e) if e.idx == idx => e.px,
            _ => self.default_px,
        }
    }

    /// Pixel offset of the leading edge of `idx`, i.e. the summed size of
    /// every index before it.
    pub fn offset(&self, idx: u32) -> f64 {
        let pos = self.entries.partition_point(|e| e.idx < idx);
        f64::from(idx) * self.default_px + self.prefix.get(pos).copied().unwrap_or(0.0)
    }

    /// The index whose extent contains `offset`, with its leading edge.
    ///
    /// Zero-sized (hidden) indices never contain an offset. Offsets below 0
    /// resolve to index 0.
    pub fn index_at(&self, offset: f64) -> (u32, f64) {
        let offset = offset.max(0.0);
        // First explicit entry whose trailing edge lies beyond `offset`.
        let j = self.entries.partition_point(|e| {
            let end = self.offset_after_entry(e.idx);
            end <= offset
        });
        let (run_start, run_base) = match j.checked_sub(1).and_then(|p| self.entries.get(p)) {
            Some(prev) => (prev.idx.saturating_add(1), self.offset_after_entry(prev.idx)),
            None => (0, 0.0),
        };
        let Some(next) = self.entries.get(j) else {
            return self.index_in_default_run(run_start, run_base, offset, u32::MAX);
        };
        if next.idx > run_start {
            let (idx, start) = self.index_in_default_run(run_start, run_base, offset, next.idx);
            if idx < next.idx {
                return (idx, start);
            }
        }
        (next.idx, self.offset(next.idx))
    }

    /// Iterate `(idx, leading_edge, size)` from `start` onward.
    ///
    /// Each step is O(1); the iterator ends at `u32::MAX`.
    pub fn iter_from(&self, start: u32) -> SizeIter<'_> {
        SizeIter {
            index: self,
            next_idx: Some(start),
            offset: self.offset(start),
            cursor: self.entries.partition_point(|e| e.idx < start),
        }
    }

    /// Trailing edge of an explicit entry.
    fn offset_after_entry(&self, idx: u32) -> f64 {
        self.offset(idx.saturating_add(1))
    }

    /// Locate `offset` inside a run of default-sized indices starting at
    /// `run_start` (whose leading edge is `run_base`), stopping at `limit`.
    fn index_in_default_run(&self, run_start: u32, run_base: f64, offset: f64, limit: u32) -> (u32, f64) {
        if self.default_px <= 0.0 {
            return (limit, run_base);
        }
        let steps = ((offset - run_base) / self.default_px).floor();
        let span = f64::from(limit - run_start);
        if steps >= span {
            return (limit, run_base + span * self.default_px);
        }
        let steps = f64_to_u32(steps);
        (run_start + steps, run_base + f64::from(steps) * self.default_px)
    }
}

/// Walks consecutive indices with their running offsets.
pub struct SizeIter<'a> {
    index: &'a SizeIndex,
    next_idx: Option<u32>,
    offset: f64,
    cursor: usize,
}

impl Iterator for SizeIter<'_> {
    type Item = (u32, f64, f64);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.next_idx?;
        let size = match self.index.entries.get(self.cursor) {
            Some(e) if e.idx == idx => {
                self.cursor += 1;
                e.px
            }
            _ => self.index.default_px,
        };
        let start = self.offset;
        self.offset += size;
        self.next_idx = idx.checked_add(1);
        Some((idx, start, size))
    }
}

/// Truncating conversion for a value already known to be in `0..=u32::MAX`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn f64_to_u32(v: f64) -> u32 {
    v.clamp(0.0, f64::from(u32::MAX)) as u32
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    /// Offset by walking every index; reference for the indexed lookups.
    fn linear_offset(index: &SizeIndex, idx: u32) -> f64 {
        (0..idx).map(|i| index.size(i)).sum()
    }

    #[test]
    fn test_default_only() {
        let index = SizeIndex::new(20.0);
        assert_eq!(index.offset(0), 0.0);
        assert_eq!(index.offset(10), 200.0);
        assert_eq!(index.index_at(0.0), (0, 0.0));
        assert_eq!(index.index_at(19.9), (0, 0.0));
        assert_eq!(index.index_at(20.0), (1, 20.0));
        assert_eq!(index.index_at(2_000_000_000.0), (100_000_000, 2_000_000_000.0));
    }

    #[test]
    fn test_explicit_entries_shift_offsets() {
        let mut index = SizeIndex::new(20.0);
        index.set(2, 50.0);
        index.set(5, 0.0);
        assert_eq!(index.offset(3), 90.0);
        assert_eq!(index.offset(6), 150.0);
        for i in 0..10 {
            assert_eq!(index.offset(i), linear_offset(&index, i), "offset({i})");
        }
    }

    #[test]
    fn test_update_existing_entry() {
        let mut index = SizeIndex::new(20.0);
        assert_eq!(index.set(0, 26.0), None);
        assert_eq!(index.set(0, 40.0), Some(26.0));
        assert_eq!(index.offset(1), 40.0);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_index_at_matches_offsets() {
        let mut index = SizeIndex::new(20.0);
        index.set(1, 35.0);
        index.set(2, 0.0);
        index.set(3, 0.0);
        index.set(7, 5.0);
        for i in 0..12 {
            let size = index.size(i);
            if size == 0.0 {
                continue;
            }
            let start = index.offset(i);
            assert_eq!(index.index_at(start), (i, start));
            assert_eq!(index.index_at(start + size / 2.0).0, i);
        }
    }

    #[test]
    fn test_hidden_rows_are_never_hit() {
        let mut index = SizeIndex::new(20.0);
        index.set(1, 0.0);
        assert_eq!(index.index_at(20.0), (2, 20.0));
    }

    #[test]
    fn test_iter_from_walks_sizes() {
        let mut index = SizeIndex::new(10.0);
        index.set(3, 30.0);
        let walked: Vec<_> = index.iter_from(2).take(3).collect();
        assert_eq!(walked, vec![(2, 20.0, 10.0), (3, 30.0, 30.0), (4, 60.0, 10.0)]);
    }

    #[test]
    fn test_clear_restores_defaults() {
        let mut index = SizeIndex::new(20.0);
        index.set(4, 100.0);
        index.clear();
        assert!(index.is_empty());
        assert_eq!(index.offset(5), 100.0);
    }
}
