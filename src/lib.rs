//! Conway's Game of Life (B3/S23) on a toroidal grid.
//!
//! Cells are packed bytes caching their live-neighbour count, kept exact by
//! every toggle, so a generation only scans for cells whose rule fires.

pub mod error;
pub mod torus;

pub use error::{FormatError, LifeError, Result};
pub use torus::{
    CellState, Grid, Phase, RowPartition, Snapshot, StepMode, Timing, TorusLife, TorusLifeConfig,
};
