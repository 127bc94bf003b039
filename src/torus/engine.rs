use std::path::Path;
use std::sync::OnceLock;

use tracing::{debug, trace};

use super::cell::CellState;
use super::format;
use super::grid::Grid;
use super::partition::{MIN_ROWS_PER_CHUNK, RowPartition};
use super::snapshot::Snapshot;
use super::stepper::{step_parallel, step_sequential};
use super::timing::{Phase, Timing};
use crate::error::{LifeError, Result};

const THREADS_ENV: &str = "TORUS_LIFE_THREADS";

static PHYSICAL_CORES: OnceLock<usize> = OnceLock::new();
static LOGICAL_CORES: OnceLock<usize> = OnceLock::new();

#[inline]
fn physical_core_count() -> usize {
    *PHYSICAL_CORES.get_or_init(|| num_cpus::get_physical().max(1))
}

#[inline]
fn logical_core_count() -> usize {
    *LOGICAL_CORES.get_or_init(|| num_cpus::get().max(1))
}

fn parse_thread_env(value: Option<&str>) -> Option<usize> {
    let v = value?.trim();
    if v.is_empty() {
        return None;
    }
    v.parse().ok()
}

/// Thread count from `TORUS_LIFE_THREADS`, if set to an integer.
fn env_thread_count() -> Option<usize> {
    parse_thread_env(std::env::var(THREADS_ENV).ok().as_deref())
}

/// One worker per physical core, but never more than the rows can feed.
#[inline]
fn auto_thread_count_for(physical: usize, rows: usize) -> usize {
    physical
        .max(1)
        .min(rows / MIN_ROWS_PER_CHUNK)
        .max(1)
}

/// How generations are computed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StepMode {
    #[default]
    Sequential,
    Parallel,
}

/// Configuration for a TorusLife engine instance.
///
/// `TorusLifeConfig::default()` steps sequentially. Call `parallel()` to
/// enable the row-partitioned stepper and optionally pin the worker count.
#[derive(Clone, Debug, Default)]
pub struct TorusLifeConfig {
    pub mode: StepMode,
    /// Worker count for the parallel stepper.
    /// `None` reads `TORUS_LIFE_THREADS`, then falls back to the physical
    /// core count limited by the grid height.
    pub thread_count: Option<usize>,
    /// Hard upper bound on workers, applied after resolution.
    pub max_threads: Option<usize>,
    /// Permit more workers than logical CPUs.
    pub allow_oversubscribe: bool,
}

impl TorusLifeConfig {
    pub fn sequential(mut self) -> Self {
        self.mode = StepMode::Sequential;
        self
    }

    pub fn parallel(mut self) -> Self {
        self.mode = StepMode::Parallel;
        self
    }

    /// Explicit worker count. Also switches to parallel mode. Zero is kept
    /// as given and rejected at engine construction.
    pub fn thread_count(mut self, n: usize) -> Self {
        self.mode = StepMode::Parallel;
        self.thread_count = Some(n);
        self
    }

    pub fn max_threads(mut self, n: usize) -> Self {
        self.max_threads = Some(n.max(1));
        self
    }

    pub fn allow_oversubscribe(mut self, allow: bool) -> Self {
        self.allow_oversubscribe = allow;
        self
    }
}

/// Resolve and validate the parallel worker count for a grid of `rows`.
fn resolve_thread_count(config: &TorusLifeConfig, rows: usize) -> Result<usize> {
    let requested = config
        .thread_count
        .or_else(env_thread_count)
        .unwrap_or_else(|| auto_thread_count_for(physical_core_count(), rows));
    let threads = match config.max_threads {
        Some(cap) => requested.min(cap),
        None => requested,
    };
    let available = logical_core_count();
    if threads > available && !config.allow_oversubscribe {
        return Err(LifeError::ThreadCount {
            requested: threads,
            reason: format!("only {available} hardware threads are available"),
        });
    }
    Ok(threads)
}

enum Stepper {
    Sequential,
    Parallel {
        pool: rayon::ThreadPool,
        partition: RowPartition,
    },
}

pub struct TorusLife {
    grid: Grid,
    stepper: Stepper,
    generation: u64,
}

impl TorusLife {
    /// Sequential engine over `grid`.
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            stepper: Stepper::Sequential,
            generation: 0,
        }
    }

    /// Create an engine with explicit configuration. Parallel settings are
    /// validated against the grid height and the host here, never mid-step.
    pub fn with_config(grid: Grid, config: TorusLifeConfig) -> Result<Self> {
        let stepper = match config.mode {
            StepMode::Sequential => Stepper::Sequential,
            StepMode::Parallel => {
                let threads = resolve_thread_count(&config, grid.rows())?;
                let partition = RowPartition::new(grid.rows(), threads)?;
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("torus-life-{i}"))
                    .build()?;
                debug!(
                    threads,
                    rows = grid.rows(),
                    chunk_rows = partition.chunk_rows(),
                    deferred_rows = partition.deferred_len(),
                    "parallel stepper ready"
                );
                Stepper::Parallel { pool, partition }
            }
        };
        Ok(Self {
            grid,
            stepper,
            generation: 0,
        })
    }

    pub fn from_snapshot(seed: &Snapshot, config: TorusLifeConfig) -> Result<Self> {
        Self::with_config(Grid::from_snapshot(seed)?, config)
    }

    /// Load a grid file and wrap it in an engine.
    pub fn load(path: impl AsRef<Path>, config: TorusLifeConfig) -> Result<Self> {
        Self::with_config(format::load(path)?, config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        format::save(&self.grid, path)
    }

    /// Advance one generation.
    pub fn step(&mut self) {
        match &self.stepper {
            Stepper::Sequential => step_sequential(&mut self.grid),
            Stepper::Parallel { pool, partition } => {
                let grid = &mut self.grid;
                pool.install(|| step_parallel(grid, partition));
            }
        }
        self.generation += 1;
        trace!(generation = self.generation, "stepped");
    }

    /// Advance `generations` generations, each fully settled before the next.
    pub fn update(&mut self, generations: u64) {
        for _ in 0..generations {
            self.step();
        }
    }

    /// `update` with the elapsed time added to `timing`'s computation phase.
    pub fn update_timed(&mut self, generations: u64, timing: &mut Timing) {
        timing.measure(Phase::Computation, || self.update(generations));
    }

    pub fn mode(&self) -> StepMode {
        match self.stepper {
            Stepper::Sequential => StepMode::Sequential,
            Stepper::Parallel { .. } => StepMode::Parallel,
        }
    }

    /// Workers used per step; 1 when sequential.
    pub fn threads(&self) -> usize {
        match &self.stepper {
            Stepper::Sequential => 1,
            Stepper::Parallel { partition, .. } => partition.threads(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn into_grid(self) -> Grid {
        self.grid
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn columns(&self) -> usize {
        self.grid.columns()
    }

    pub fn population(&self) -> usize {
        self.grid.population()
    }

    pub fn cell_state(&self, row: usize, col: usize) -> Option<CellState> {
        self.grid.cell_state(row, col)
    }

    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        self.grid.is_alive(row, col)
    }

    pub fn activate(&mut self, row: usize, col: usize) -> Result<()> {
        self.grid.activate(row, col)
    }

    pub fn deactivate(&mut self, row: usize, col: usize) -> Result<()> {
        self.grid.deactivate(row, col)
    }

    pub fn set_cell(&mut self, row: usize, col: usize, alive: bool) -> Result<()> {
        self.grid.set_cell(row, col, alive)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.grid.snapshot()
    }
}
