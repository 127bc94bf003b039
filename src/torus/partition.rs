//! Row decomposition for the parallel stepper.
//!
//! Rows are split into `threads` equal chunks of `rows / threads` rows. A
//! worker evaluates only its chunk's interior rows, so the writes it makes
//! (one row up and down) never leave the chunk. The first and last row of
//! every chunk, plus the remainder rows past the last chunk, are ghost rows
//! evaluated sequentially after the join.

use std::ops::Range;

use crate::error::{LifeError, Result};

/// Smallest chunk with at least one interior row.
pub const MIN_ROWS_PER_CHUNK: usize = 3;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowPartition {
    rows: usize,
    threads: usize,
    chunk_rows: usize,
}

impl RowPartition {
    pub fn new(rows: usize, threads: usize) -> Result<Self> {
        if threads == 0 {
            return Err(LifeError::ThreadCount {
                requested: threads,
                reason: "at least one worker is required".to_string(),
            });
        }
        let needed = threads.saturating_mul(MIN_ROWS_PER_CHUNK);
        if rows < needed {
            return Err(LifeError::ThreadCount {
                requested: threads,
                reason: format!(
                    "{rows} rows cannot feed {threads} workers (need at least {needed})"
                ),
            });
        }
        Ok(Self {
            rows,
            threads,
            chunk_rows: rows / threads,
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn threads(&self) -> usize {
        self.threads
    }

    #[inline]
    pub fn chunk_rows(&self) -> usize {
        self.chunk_rows
    }

    /// Rows covered by worker chunks; everything past this is remainder.
    #[inline]
    pub fn chunked_rows(&self) -> usize {
        self.threads * self.chunk_rows
    }

    pub fn chunk(&self, worker: usize) -> Range<usize> {
        let start = worker * self.chunk_rows;
        start..start + self.chunk_rows
    }

    /// Rows the worker evaluates during the parallel phase.
    pub fn worker_rows(&self, worker: usize) -> Range<usize> {
        let chunk = self.chunk(worker);
        chunk.start + 1..chunk.end - 1
    }

    /// Ghost and remainder rows, ascending.
    pub fn deferred_rows(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.threads)
            .flat_map(move |worker| {
                let chunk = self.chunk(worker);
                [chunk.start, chunk.end - 1]
            })
            .chain(self.chunked_rows()..self.rows)
    }

    pub fn deferred_len(&self) -> usize {
        2 * self.threads + (self.rows - self.chunked_rows())
    }
}
