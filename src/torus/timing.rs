//! Caller-owned phase timing.

use std::fmt;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Loading and engine construction.
    Setup,
    /// Stepping.
    Computation,
    /// Serialization and teardown.
    Finalization,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Timing {
    setup: Duration,
    computation: Duration,
    finalization: Duration,
}

impl Timing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` and add its wall time to `phase`.
    pub fn measure<T>(&mut self, phase: Phase, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        self.record(phase, start.elapsed());
        out
    }

    pub fn record(&mut self, phase: Phase, elapsed: Duration) {
        *self.slot(phase) += elapsed;
    }

    pub fn get(&self, phase: Phase) -> Duration {
        match phase {
            Phase::Setup => self.setup,
            Phase::Computation => self.computation,
            Phase::Finalization => self.finalization,
        }
    }

    pub fn total(&self) -> Duration {
        self.setup + self.computation + self.finalization
    }

    fn slot(&mut self, phase: Phase) -> &mut Duration {
        match phase {
            Phase::Setup => &mut self.setup,
            Phase::Computation => &mut self.computation,
            Phase::Finalization => &mut self.finalization,
        }
    }

    /// `setup_ms;computation_ms;finalization_ms`, three decimals each.
    pub fn csv_line(&self) -> String {
        format!(
            "{:.3};{:.3};{:.3}",
            millis(self.setup),
            millis(self.computation),
            millis(self.finalization)
        )
    }
}

fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "setup {:.3} ms | computation {:.3} ms | finalization {:.3} ms",
            millis(self.setup),
            millis(self.computation),
            millis(self.finalization)
        )
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{Phase, Timing};

    #[test]
    fn record_accumulates_per_phase() {
        let mut timing = Timing::new();
        timing.record(Phase::Computation, Duration::from_millis(2));
        timing.record(Phase::Computation, Duration::from_millis(3));
        timing.record(Phase::Setup, Duration::from_micros(1500));
        assert_eq!(timing.get(Phase::Computation), Duration::from_millis(5));
        assert_eq!(timing.get(Phase::Finalization), Duration::ZERO);
        assert_eq!(timing.total(), Duration::from_micros(6500));
        assert_eq!(timing.csv_line(), "1.500;5.000;0.000");
    }

    #[test]
    fn measure_returns_closure_output() {
        let mut timing = Timing::new();
        let value = timing.measure(Phase::Finalization, || 42);
        assert_eq!(value, 42);
        assert_eq!(timing.get(Phase::Setup), Duration::ZERO);
    }
}
