#[cfg(feature = "mimalloc-global")]
#[global_allocator]
static GLOBAL_ALLOCATOR: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;
use torus_life::{Phase, Result, Timing, TorusLife, TorusLifeConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    Seq,
    Par,
}

/// Run Conway's Game of Life on a toroidal grid loaded from a file.
#[derive(Debug, Parser)]
#[command(name = "torus-life", version)]
struct Args {
    /// Grid file to load.
    #[arg(short, long)]
    load: PathBuf,
    /// Where to write the final grid.
    #[arg(short, long)]
    save: Option<PathBuf>,
    /// Generations to simulate.
    #[arg(short, long, default_value_t = 250)]
    generations: u64,
    /// Print `setup;computation;finalization` timings in milliseconds.
    #[arg(short, long)]
    measure: bool,
    /// Print the final grid to stdout.
    #[arg(short, long)]
    pretty: bool,
    /// Stepper to use (default: `seq`, or `par` when `--threads` is given).
    #[arg(long, value_enum)]
    mode: Option<Mode>,
    /// Worker threads for the parallel stepper (default: physical cores).
    #[arg(long)]
    threads: Option<usize>,
}

impl Args {
    fn config(&self) -> std::result::Result<TorusLifeConfig, clap::Error> {
        match (self.mode, self.threads) {
            (Some(Mode::Seq), Some(_)) => Err(Self::command().error(
                ErrorKind::ArgumentConflict,
                "`--threads` cannot be used with `--mode seq`",
            )),
            (_, Some(n)) => Ok(TorusLifeConfig::default().thread_count(n)),
            (Some(Mode::Par), None) => Ok(TorusLifeConfig::default().parallel()),
            (_, None) => Ok(TorusLifeConfig::default()),
        }
    }
}

fn run(args: &Args, config: TorusLifeConfig) -> Result<()> {
    let mut timing = Timing::new();

    let mut engine = timing.measure(Phase::Setup, || TorusLife::load(&args.load, config))?;
    info!(
        rows = engine.rows(),
        columns = engine.columns(),
        threads = engine.threads(),
        mode = ?engine.mode(),
        "simulating {} generations",
        args.generations
    );

    engine.update_timed(args.generations, &mut timing);

    timing.measure(Phase::Finalization, || match &args.save {
        Some(path) => engine.save(path),
        None => Ok(()),
    })?;

    if args.pretty {
        print!("{}", engine.snapshot());
    }
    if args.measure {
        println!("{}", timing.csv_line());
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.config().unwrap_or_else(|e| e.exit());
    match run(&args, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::Parser;
    use clap::error::ErrorKind;
    use torus_life::StepMode;

    fn parse(extra: &[&str]) -> Args {
        let argv = ["torus-life", "-l", "grid.gol"].iter().chain(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn threads_select_the_parallel_stepper() {
        let config = parse(&["--threads", "2"]).config().unwrap();
        assert_eq!(config.mode, StepMode::Parallel);
        assert_eq!(config.thread_count, Some(2));

        let config = parse(&["--mode", "par", "--threads", "3"]).config().unwrap();
        assert_eq!(config.mode, StepMode::Parallel);
        assert_eq!(config.thread_count, Some(3));
    }

    #[test]
    fn sequential_mode_rejects_threads() {
        let err = parse(&["--mode", "seq", "--threads", "2"]).config().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn default_is_sequential() {
        assert_eq!(parse(&[]).config().unwrap().mode, StepMode::Sequential);
        assert_eq!(parse(&["--mode", "par"]).config().unwrap().mode, StepMode::Parallel);
    }
}
