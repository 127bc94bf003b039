//! Toroidal grid store.
//!
//! Two equal-size row-major buffers live in one value: `current` is
//! authoritative, `previous` is the frozen copy a step reads its decisions
//! from. Every live cell contributes one count unit to each of its eight
//! toroidal neighbours, and all mutation goes through `Band::activate` /
//! `Band::deactivate` so the counts never drift.

use tracing::debug;

use super::cell::{Cell, CellState};
use super::rules::{RULES, Transition};
use super::snapshot::Snapshot;
use crate::error::{LifeError, Result};

pub const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Flat index of the cell `(dr, dc)` away from `(row, col)` on a
/// `rows x columns` torus.
#[inline(always)]
pub fn neighbor_index(
    rows: usize,
    columns: usize,
    row: usize,
    col: usize,
    dr: isize,
    dc: isize,
) -> usize {
    let r = (row as isize + dr).rem_euclid(rows as isize) as usize;
    let c = (col as isize + dc).rem_euclid(columns as isize) as usize;
    r * columns + c
}

/// A run of whole rows of a cell buffer.
///
/// Vertical neighbours wrap inside the band. For a band spanning the whole
/// grid that is exactly the torus; for a worker's chunk the caller only
/// touches interior rows, so the wrap is never taken.
pub(crate) struct Band<'a> {
    cells: &'a mut [Cell],
    rows: usize,
    columns: usize,
}

impl<'a> Band<'a> {
    #[inline]
    pub(crate) fn new(cells: &'a mut [Cell], columns: usize) -> Self {
        debug_assert!(columns > 0 && cells.len() % columns == 0);
        Self {
            rows: cells.len() / columns,
            cells,
            columns,
        }
    }

    #[inline(always)]
    pub(crate) fn activate(&mut self, row: usize, col: usize) {
        let idx = row * self.columns + col;
        debug_assert!(!self.cells[idx].is_alive(), "double activate at ({row}, {col})");
        self.cells[idx].set_alive();
        for (dr, dc) in NEIGHBOR_OFFSETS {
            let n = neighbor_index(self.rows, self.columns, row, col, dr, dc);
            self.cells[n].add_neighbor();
        }
    }

    #[inline(always)]
    pub(crate) fn deactivate(&mut self, row: usize, col: usize) {
        let idx = row * self.columns + col;
        debug_assert!(self.cells[idx].is_alive(), "deactivate dead cell at ({row}, {col})");
        self.cells[idx].clear_alive();
        for (dr, dc) in NEIGHBOR_OFFSETS {
            let n = neighbor_index(self.rows, self.columns, row, col, dr, dc);
            self.cells[n].remove_neighbor();
        }
    }

    /// Apply B3/S23 to band row `row`, deciding from `previous_row`.
    #[inline]
    pub(crate) fn evolve_row(&mut self, row: usize, previous_row: &[Cell]) {
        debug_assert_eq!(previous_row.len(), self.columns);
        for (col, &cell) in previous_row.iter().enumerate() {
            if cell.is_quiet() {
                continue;
            }
            match RULES.lookup(cell) {
                Transition::Keep => {}
                Transition::Birth => self.activate(row, col),
                Transition::Death => self.deactivate(row, col),
            }
        }
    }
}

fn allocate_cells(len: usize) -> Option<Vec<Cell>> {
    let mut cells = Vec::new();
    cells.try_reserve_exact(len).ok()?;
    cells.resize(len, Cell::DEAD);
    Some(cells)
}

#[derive(Clone, Debug)]
pub struct Grid {
    rows: usize,
    columns: usize,
    current: Vec<Cell>,
    previous: Vec<Cell>,
}

impl Grid {
    /// All-dead grid. Both buffers are reserved up front; failure leaves
    /// nothing behind.
    pub fn new(rows: usize, columns: usize) -> Result<Self> {
        if rows == 0 || columns == 0 {
            return Err(LifeError::InvalidDimensions { rows, columns });
        }
        let alloc_err = || LifeError::Allocation { rows, columns };
        let len = rows.checked_mul(columns).ok_or_else(alloc_err)?;
        let current = allocate_cells(len).ok_or_else(alloc_err)?;
        let previous = allocate_cells(len).ok_or_else(alloc_err)?;
        debug!(rows, columns, "allocated grid");
        Ok(Self {
            rows,
            columns,
            current,
            previous,
        })
    }

    /// Grid with every alive seed cell activated.
    pub fn from_snapshot(seed: &Snapshot) -> Result<Self> {
        let mut grid = Self::new(seed.rows(), seed.columns())?;
        seed.for_each_live(|row, col| grid.band().activate(row, col));
        Ok(grid)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.columns).then_some(row * self.columns + col)
    }

    #[inline]
    fn checked_index(&self, row: usize, col: usize) -> Result<usize> {
        self.index(row, col).ok_or(LifeError::InvalidOperation {
            row,
            column: col,
            reason: "coordinates out of range",
        })
    }

    #[inline]
    pub(crate) fn band(&mut self) -> Band<'_> {
        Band::new(&mut self.current, self.columns)
    }

    /// Bring a dead cell to life and bump its neighbours' counts.
    pub fn activate(&mut self, row: usize, col: usize) -> Result<()> {
        let idx = self.checked_index(row, col)?;
        if self.current[idx].is_alive() {
            return Err(LifeError::InvalidOperation {
                row,
                column: col,
                reason: "cell is already alive",
            });
        }
        self.band().activate(row, col);
        Ok(())
    }

    /// Kill a live cell and drop its neighbours' counts.
    pub fn deactivate(&mut self, row: usize, col: usize) -> Result<()> {
        let idx = self.checked_index(row, col)?;
        if !self.current[idx].is_alive() {
            return Err(LifeError::InvalidOperation {
                row,
                column: col,
                reason: "cell is already dead",
            });
        }
        self.band().deactivate(row, col);
        Ok(())
    }

    /// Set semantics: toggles only when the state differs.
    pub fn set_cell(&mut self, row: usize, col: usize, alive: bool) -> Result<()> {
        let idx = self.checked_index(row, col)?;
        match (self.current[idx].is_alive(), alive) {
            (false, true) => self.band().activate(row, col),
            (true, false) => self.band().deactivate(row, col),
            _ => {}
        }
        Ok(())
    }

    #[inline]
    pub fn cell_state(&self, row: usize, col: usize) -> Option<CellState> {
        self.index(row, col).map(|i| self.current[i].state())
    }

    #[inline]
    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        self.index(row, col)
            .is_some_and(|i| self.current[i].is_alive())
    }

    /// Cached live-neighbour count.
    #[inline]
    pub fn neighbor_count(&self, row: usize, col: usize) -> Option<u8> {
        self.index(row, col)
            .map(|i| self.current[i].neighbor_count())
    }

    #[inline]
    pub fn neighbor_index(&self, row: usize, col: usize, dr: isize, dc: isize) -> usize {
        neighbor_index(self.rows, self.columns, row, col, dr, dc)
    }

    pub fn population(&self) -> usize {
        self.current.iter().filter(|c| c.is_alive()).count()
    }

    pub fn snapshot(&self) -> Snapshot {
        let cells = self.current.iter().map(|c| c.is_alive()).collect();
        Snapshot::from_parts(self.rows, self.columns, cells)
    }

    /// Copy `current` into `previous` for the step about to run.
    #[inline]
    pub(crate) fn freeze(&mut self) {
        self.previous.copy_from_slice(&self.current);
    }

    /// Frozen buffer for reads, live buffer for writes.
    #[inline]
    pub(crate) fn split_buffers(&mut self) -> (&[Cell], &mut [Cell]) {
        (&self.previous, &mut self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::{Grid, NEIGHBOR_OFFSETS};
    use crate::error::LifeError;
    use crate::torus::cell::CellState;

    fn recount(grid: &Grid, row: usize, col: usize) -> u8 {
        NEIGHBOR_OFFSETS
            .iter()
            .filter(|&&(dr, dc)| {
                let n = grid.neighbor_index(row, col, dr, dc);
                grid.is_alive(n / grid.columns(), n % grid.columns())
            })
            .count() as u8
    }

    fn assert_counts_consistent(grid: &Grid) {
        for row in 0..grid.rows() {
            for col in 0..grid.columns() {
                assert_eq!(
                    grid.neighbor_count(row, col),
                    Some(recount(grid, row, col)),
                    "count mismatch at ({row}, {col})"
                );
            }
        }
    }

    #[test]
    fn neighbor_index_wraps_both_axes() {
        let grid = Grid::new(4, 5).unwrap();
        assert_eq!(grid.neighbor_index(0, 0, -1, -1), 3 * 5 + 4);
        assert_eq!(grid.neighbor_index(0, 0, -1, 0), 3 * 5);
        assert_eq!(grid.neighbor_index(0, 0, 0, -1), 4);
        assert_eq!(grid.neighbor_index(3, 4, 1, 1), 0);
        assert_eq!(grid.neighbor_index(2, 2, 1, -1), 3 * 5 + 1);
    }

    #[test]
    fn activate_touches_exactly_nine_cells() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid.activate(2, 2).unwrap();
        let touched = grid.current.iter().filter(|c| !c.is_quiet()).count();
        assert_eq!(touched, 9);
        assert_eq!(grid.neighbor_count(2, 2), Some(0));
        assert_counts_consistent(&grid);
    }

    #[test]
    fn deactivate_restores_quiet_grid() {
        let mut grid = Grid::new(3, 4).unwrap();
        grid.activate(0, 3).unwrap();
        grid.activate(1, 1).unwrap();
        grid.deactivate(0, 3).unwrap();
        grid.deactivate(1, 1).unwrap();
        assert!(grid.current.iter().all(|c| c.is_quiet()));
    }

    #[test]
    fn mutators_reject_precondition_violations() {
        let mut grid = Grid::new(3, 3).unwrap();
        assert!(matches!(
            grid.deactivate(1, 1),
            Err(LifeError::InvalidOperation { row: 1, column: 1, .. })
        ));
        grid.activate(1, 1).unwrap();
        assert!(matches!(
            grid.activate(1, 1),
            Err(LifeError::InvalidOperation { .. })
        ));
        assert!(matches!(
            grid.activate(3, 0),
            Err(LifeError::InvalidOperation { row: 3, column: 0, .. })
        ));
        assert_counts_consistent(&grid);
    }

    #[test]
    fn set_cell_is_idempotent() {
        let mut grid = Grid::new(4, 4).unwrap();
        grid.set_cell(1, 2, true).unwrap();
        grid.set_cell(1, 2, true).unwrap();
        assert_eq!(grid.population(), 1);
        assert_counts_consistent(&grid);
        grid.set_cell(1, 2, false).unwrap();
        grid.set_cell(1, 2, false).unwrap();
        assert_eq!(grid.population(), 0);
        assert_counts_consistent(&grid);
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(matches!(
            Grid::new(0, 4),
            Err(LifeError::InvalidDimensions { rows: 0, columns: 4 })
        ));
        assert!(matches!(
            Grid::new(4, 0),
            Err(LifeError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn oversized_grid_reports_allocation_failure() {
        assert!(matches!(
            Grid::new(usize::MAX / 2, 4),
            Err(LifeError::Allocation { .. })
        ));
        assert!(matches!(
            Grid::new(isize::MAX as usize / 2, 1),
            Err(LifeError::Allocation { .. })
        ));
    }

    #[test]
    fn narrow_grids_count_with_multiplicity() {
        // On a single column the left and right neighbours are the cell itself.
        let mut grid = Grid::new(3, 1).unwrap();
        grid.activate(0, 0).unwrap();
        assert_eq!(grid.neighbor_count(0, 0), Some(2));
        assert_eq!(grid.neighbor_count(1, 0), Some(3));
        assert_eq!(grid.cell_state(0, 0), Some(CellState::Alive));
        assert_counts_consistent(&grid);
    }

    #[test]
    fn snapshot_matches_live_cells() {
        let mut grid = Grid::new(4, 3).unwrap();
        grid.activate(0, 2).unwrap();
        grid.activate(3, 1).unwrap();
        let snap = grid.snapshot();
        assert_eq!((snap.rows(), snap.columns()), (4, 3));
        assert_eq!(snap.population(), 2);
        assert!(snap.is_alive(0, 2));
        assert!(snap.is_alive(3, 1));
        assert!(!snap.is_alive(1, 1));
    }
}
