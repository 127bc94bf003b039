//! TorusLife engine internals and public API.

mod cell;
mod engine;
pub mod format;
mod grid;
mod partition;
mod rules;
mod snapshot;
mod stepper;
mod timing;

pub use cell::CellState;
pub use engine::{StepMode, TorusLife, TorusLifeConfig};
pub use grid::Grid;
pub use partition::RowPartition;
pub use snapshot::Snapshot;
pub use timing::{Phase, Timing};
