//! Immutable alive/dead copy of a grid, used for seeding and read-back.

use std::fmt;

use super::cell::{CellState, DEAD_CHAR, LIVE_CHAR};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    rows: usize,
    columns: usize,
    cells: Vec<bool>,
}

impl Snapshot {
    /// Caller guarantees `cells.len() == rows * columns`.
    pub(crate) fn from_parts(rows: usize, columns: usize, cells: Vec<bool>) -> Self {
        debug_assert_eq!(rows.checked_mul(columns), Some(cells.len()));
        Self {
            rows,
            columns,
            cells,
        }
    }

    /// Build from row-major flags. Returns `None` if `cells.len()` does not
    /// equal `rows * columns`.
    pub fn from_cells(rows: usize, columns: usize, cells: Vec<bool>) -> Option<Self> {
        (rows.checked_mul(columns) == Some(cells.len())).then_some(Self {
            rows,
            columns,
            cells,
        })
    }

    /// Build from a rectangular list of rows. Returns `None` for ragged input.
    pub fn from_rows<R: AsRef<[bool]>>(rows: &[R]) -> Option<Self> {
        let columns = rows.first().map_or(0, |r| r.as_ref().len());
        let mut cells = Vec::with_capacity(rows.len() * columns);
        for row in rows {
            let row = row.as_ref();
            if row.len() != columns {
                return None;
            }
            cells.extend_from_slice(row);
        }
        Some(Self {
            rows: rows.len(),
            columns,
            cells,
        })
    }

    /// Parse a picture of `.`/`x` rows, one string per row.
    pub fn from_picture(lines: &[&str]) -> Option<Self> {
        let rows: Option<Vec<Vec<bool>>> = lines
            .iter()
            .map(|line| {
                line.chars()
                    .map(|c| match c {
                        LIVE_CHAR => Some(true),
                        DEAD_CHAR => Some(false),
                        _ => None,
                    })
                    .collect()
            })
            .collect();
        Self::from_rows(&rows?)
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
    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.columns && self.cells[row * self.columns + col]
    }

    pub fn state(&self, row: usize, col: usize) -> Option<CellState> {
        (row < self.rows && col < self.columns)
            .then(|| CellState::from(self.cells[row * self.columns + col]))
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    /// Row slices in order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[bool]> {
        // `max(1)` keeps `chunks` happy on a 0-column snapshot.
        self.cells.chunks(self.columns.max(1)).take(self.rows)
    }

    /// Coordinates of every live cell, row-major.
    pub fn for_each_live<F: FnMut(usize, usize)>(&self, mut f: F) {
        for (i, _) in self.cells.iter().enumerate().filter(|(_, alive)| **alive) {
            f(i / self.columns, i % self.columns);
        }
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.iter_rows() {
            for &alive in row {
                let c = if alive { LIVE_CHAR } else { DEAD_CHAR };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Snapshot;

    #[test]
    fn picture_round_trips_through_display() {
        let snap = Snapshot::from_picture(&[".x.", "xx.", "..."]).unwrap();
        assert_eq!(snap.rows(), 3);
        assert_eq!(snap.columns(), 3);
        assert_eq!(snap.population(), 3);
        assert_eq!(snap.to_string(), ".x.\nxx.\n...\n");
    }

    #[test]
    fn ragged_rows_are_rejected() {
        assert!(Snapshot::from_rows(&[vec![true, false], vec![true]]).is_none());
        assert!(Snapshot::from_picture(&["..", "?."]).is_none());
        assert!(Snapshot::from_cells(2, 2, vec![false; 3]).is_none());
        assert!(Snapshot::from_cells(usize::MAX, 2, Vec::new()).is_none());
    }

    #[test]
    fn out_of_range_reads_are_dead() {
        let snap = Snapshot::from_picture(&["x"]).unwrap();
        assert!(snap.is_alive(0, 0));
        assert!(!snap.is_alive(1, 0));
        assert_eq!(snap.state(0, 1), None);
    }
}
