//! Fixed-size row chunking with an explicit last-chunk marker

use crate::types::{Chunk, WorkingRow};

/// Lazily partitions working rows into contiguous chunks.
///
/// Chunks come out in source order, never overlap, and cover every row once.
/// All chunks hold `chunk_size` rows except possibly the last, which carries
/// `is_last = true`. The iterator is consumed as it goes and cannot be
/// restarted.
pub struct RowChunker {
    rows: std::vec::IntoIter<WorkingRow>,
    /// Maximum rows per chunk
    chunk_size: usize,
    next_index: usize,
}

impl RowChunker {
    /// Create a new chunker. A `chunk_size` of zero is treated as one.
    pub fn new(rows: Vec<WorkingRow>, chunk_size: usize) -> Self {
        Self {
            rows: rows.into_iter(),
            chunk_size: chunk_size.max(1),
            next_index: 0,
        }
    }

    /// Number of chunks still to be produced
    pub fn remaining_chunks(&self) -> usize {
        self.rows.len().div_ceil(self.chunk_size)
    }
}

impl Iterator for RowChunker {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        let rows: Vec<WorkingRow> = self.rows.by_ref().take(self.chunk_size).collect();
        if rows.is_empty() {
            return None;
        }

        let chunk = Chunk {
            index: self.next_index,
            rows,
            is_last: self.rows.as_slice().is_empty(),
        };
        self.next_index += 1;
        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining_chunks();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RowChunker {}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize) -> Vec<WorkingRow> {
        (0..n)
            .map(|i| WorkingRow::new(i, format!("{:06}", i), format!("question {}", i)))
            .collect()
    }

    #[test]
    fn test_short_last_chunk() {
        let chunks: Vec<Chunk> = RowChunker::new(rows(125), 50).collect();

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].row_range(), 0..50);
        assert_eq!(chunks[1].row_range(), 50..100);
        assert_eq!(chunks[2].row_range(), 100..125);
        assert_eq!(
            chunks.iter().map(|c| c.is_last).collect::<Vec<_>>(),
            vec![false, false, true]
        );
        assert_eq!(
            chunks.iter().map(|c| c.index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_exact_multiple_marks_last() {
        let chunks: Vec<Chunk> = RowChunker::new(rows(100), 50).collect();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].len(), 50);
        assert!(chunks[1].is_last);
        assert!(!chunks[0].is_last);
    }

    #[test]
    fn test_chunk_count_and_concatenation() {
        for (len, size) in [(0, 3), (1, 3), (7, 3), (9, 3), (10, 1), (5, 50)] {
            let chunker = RowChunker::new(rows(len), size);
            assert_eq!(chunker.len(), len.div_ceil(size), "len={} size={}", len, size);

            let chunks: Vec<Chunk> = chunker.collect();
            let (last, full) = chunks.split_last().map_or((None, &[][..]), |(l, f)| (Some(l), f));
            assert!(full.iter().all(|c| c.len() == size && !c.is_last));
            if let Some(last) = last {
                assert!(last.is_last);
                assert!(last.len() <= size);
            }

            let rejoined: Vec<WorkingRow> = chunks.into_iter().flat_map(|c| c.rows).collect();
            assert_eq!(rejoined, rows(len));
        }
    }

    #[test]
    fn test_empty_input() {
        let mut chunker = RowChunker::new(Vec::new(), 50);
        assert_eq!(chunker.remaining_chunks(), 0);
        assert!(chunker.next().is_none());
    }

    #[test]
    fn test_not_restartable() {
        let mut chunker = RowChunker::new(rows(3), 2);
        assert_eq!(chunker.by_ref().count(), 2);
        assert!(chunker.next().is_none());
    }
}
