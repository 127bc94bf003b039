//! Generation steppers.
//!
//! Both variants freeze `current` into `previous`, then evaluate every row
//! once against the frozen copy. Mutations land in `current` through
//! `Band`, which keeps neighbour counts exact for the following step.

use rayon::prelude::*;

use super::grid::{Band, Grid};
use super::partition::RowPartition;

pub fn step_sequential(grid: &mut Grid) {
    grid.freeze();
    let columns = grid.columns();
    let (previous, current) = grid.split_buffers();
    let mut band = Band::new(current, columns);
    for (row, previous_row) in previous.chunks_exact(columns).enumerate() {
        band.evolve_row(row, previous_row);
    }
}

/// Fork one task per chunk, join, then run the ghost rows in order.
///
/// Must be called inside the pool that should execute the workers.
pub fn step_parallel(grid: &mut Grid, partition: &RowPartition) {
    debug_assert_eq!(grid.rows(), partition.rows());
    grid.freeze();
    let columns = grid.columns();
    let chunk_rows = partition.chunk_rows();
    let (previous, current) = grid.split_buffers();

    current[..partition.chunked_rows() * columns]
        .par_chunks_mut(chunk_rows * columns)
        .enumerate()
        .for_each(|(worker, chunk)| {
            let first_row = worker * chunk_rows;
            let mut band = Band::new(chunk, columns);
            for row in partition.worker_rows(worker) {
                let previous_row = &previous[row * columns..(row + 1) * columns];
                band.evolve_row(row - first_row, previous_row);
            }
        });

    let mut band = Band::new(current, columns);
    for row in partition.deferred_rows() {
        band.evolve_row(row, &previous[row * columns..(row + 1) * columns]);
    }
}
