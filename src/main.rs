//! # parlife
//!
//! Conway's Game of Life on a toroidal grid, stepped in parallel with the
//! `rayon` library and reported to the terminal.
//!
//! ## Features
//!
//! * Row-parallel generation updates on a configurable thread pool
//! * Random or file-based starting patterns
//! * Per-generation population reporting and run timing
//! * Optional animated terminal output and an interactive TUI mode
//! * Toroidal grid implementation

mod engine;
mod grid;
mod render;
mod seed;
mod stats;
mod watch;

use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::engine::Simulation;
use crate::grid::Grid;
use crate::render::{NullRenderer, Renderer, TerminalRenderer};

/// Where the initial pattern comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SeedMode {
    /// Uniform random fill
    Random,
    /// Text file where 'X' marks a live cell
    File,
}

#[derive(Parser, Debug)]
#[command(name = "parlife")]
#[command(version)]
#[command(about = "Parallel Game of Life on a toroidal grid")]
struct Cli {
    /// Grid rows
    #[arg(long, default_value_t = 200, value_parser = parse_dimension)]
    rows: usize,

    /// Grid columns
    #[arg(long, default_value_t = 200, value_parser = parse_dimension)]
    cols: usize,

    /// Generations to simulate
    #[arg(long = "iter", default_value_t = 100)]
    iterations: u64,

    /// Worker threads (0 = all available cores)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Initial pattern source
    #[arg(long = "init", value_enum, default_value = "random")]
    init: SeedMode,

    /// Pattern file for `--init file`
    #[arg(long)]
    file: Option<PathBuf>,

    /// Fix the RNG seed for reproducible random fills
    #[arg(long)]
    seed: Option<u64>,

    /// Probability that a randomly seeded cell starts alive
    #[arg(long, default_value_t = 0.3, value_parser = parse_density)]
    density: f64,

    /// Animation delay per frame in milliseconds
    #[arg(long, default_value_t = 100)]
    delay: u64,

    /// Print the grid every generation
    #[arg(long)]
    visualize: bool,

    /// Reject pattern files that do not match the grid dimensions
    #[arg(long)]
    strict: bool,

    /// Interactive terminal session instead of a batch run
    #[arg(long)]
    watch: bool,
}

fn parse_dimension(s: &str) -> Result<usize, String> {
    let value: usize = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    if value == 0 {
        return Err("must be at least 1".into());
    }
    Ok(value)
}

fn parse_density(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    if !(0.0..=1.0).contains(&value) {
        return Err("must lie in [0, 1]".into());
    }
    Ok(value)
}

fn initial_grid(cli: &Cli) -> Result<Grid, Box<dyn Error>> {
    match cli.init {
        SeedMode::Random => {
            let mut rng = match cli.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            info!("seeding {}x{} grid at density {}", cli.rows, cli.cols, cli.density);
            Ok(seed::random(cli.rows, cli.cols, cli.density, &mut rng))
        }
        SeedMode::File => {
            let path = cli.file.as_deref().ok_or("--init file requires --file")?;
            info!("seeding {}x{} grid from {}", cli.rows, cli.cols, path.display());
            Ok(seed::from_file(path, cli.rows, cli.cols, cli.strict)?)
        }
    }
}

/// Main entry point.
///
/// Builds the worker pool and the initial grid, then either hands off to
/// the interactive session or runs the fixed-length batch loop and prints
/// its summary.
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let initial = initial_grid(&cli)?;

    // One pool for the whole run; every generation dispatches onto it.
    rayon::ThreadPoolBuilder::new()
        .num_threads(cli.threads)
        .build_global()?;
    let threads = rayon::current_num_threads();
    info!("stepping on {threads} threads");

    if cli.watch {
        return watch::run(initial);
    }

    let mut sim = Simulation::new(initial);
    let mut renderer: Box<dyn Renderer> = if cli.visualize {
        Box::new(TerminalRenderer::new())
    } else {
        Box::new(NullRenderer)
    };
    let delay = if cli.visualize {
        Duration::from_millis(cli.delay)
    } else {
        Duration::ZERO
    };

    let elapsed = sim.run(cli.iterations, delay, renderer.as_mut(), |generation, alive| {
        println!("Iteration {generation} Alive: {alive}");
    })?;

    let stats = sim.stats();
    info!(
        "{} cells created, {} destroyed over {} generations",
        stats.cells_created, stats.cells_destroyed, stats.generation
    );

    println!();
    println!("Simulation completed in {} seconds", elapsed.as_secs_f64());
    println!("Using {threads} threads");
    println!("Field size: {}x{}", cli.rows, cli.cols);

    Ok(())
}
