//! Sequential vs parallel stepping across grid sizes.
//!
//! Use with `--release` for meaningful results.

use rand::RngCore;
use rand::SeedableRng;
use std::time::Instant;
use torus_life::{Grid, TorusLife, TorusLifeConfig};

const LIVE_DENSITY: f64 = 0.42;

fn seed_grid(size: usize, density: f64) -> Grid {
    let mut rng = rand::rngs::StdRng::seed_from_u64(0x5EED_1234_ABCD_EF01);
    let threshold = (u64::MAX as f64 * density) as u64;
    let mut grid = Grid::new(size, size).expect("benchmark grid fits in memory");

    for row in 0..size {
        for col in 0..size {
            if rng.next_u64() <= threshold {
                grid.activate(row, col).expect("fresh cell is dead");
            }
        }
    }
    grid
}

fn bench(size: usize, iterations: u64, config: TorusLifeConfig) -> (f64, usize, usize) {
    let mut engine =
        TorusLife::with_config(seed_grid(size, LIVE_DENSITY), config).expect("valid config");

    let start = Instant::now();
    engine.update(iterations);
    let duration = start.elapsed();

    let total_ms = duration.as_secs_f64() * 1000.0;
    (total_ms, engine.population(), engine.threads())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let scales: &[(usize, u64)] = &[(256, 200), (512, 100), (1024, 50), (2048, 20), (4096, 10)];

    println!(
        "{:<10} {:>8} {:>8} {:>12} {:>10} {:>10}",
        "Grid", "Mode", "Threads", "Total(ms)", "Avg(ms)", "Pop"
    );
    println!("{}", "-".repeat(64));

    for &(size, iters) in scales {
        for (mode, config) in [
            ("seq", TorusLifeConfig::default()),
            ("par", TorusLifeConfig::default().parallel()),
        ] {
            let (total_ms, pop, threads) = bench(size, iters, config);
            let avg_ms = total_ms / iters as f64;
            println!(
                "{:<10} {:>8} {:>8} {:>12.1} {:>10.4} {:>10}",
                format!("{}x{}", size, size),
                mode,
                threads,
                total_ms,
                avg_ms,
                pop
            );
        }
    }
}
