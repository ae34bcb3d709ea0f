//! Generation updates, population counting, and the simulation loop.

use std::io;
use std::mem;
use std::thread;
use std::time::{Duration, Instant};

use log::debug;
use rayon::prelude::*;

use crate::grid::Grid;
use crate::render::Renderer;
use crate::stats::Stats;

/// Computes one generation of the rules from `current` into `next`:
///
/// * Any live cell with fewer than two live neighbors dies (underpopulation)
/// * Any live cell with two or three live neighbors survives
/// * Any live cell with more than three live neighbors dies (overpopulation)
/// * Any dead cell with exactly three live neighbors becomes alive (reproduction)
///
/// Rows of `next` are filled in parallel: every worker reads the shared
/// source grid and writes its own disjoint row slice, so the update needs
/// no locking, and the call only returns once every row is complete.
/// `current` is left untouched.
///
/// # Returns
///
/// The number of cells born and the number of cells that died.
///
/// # Panics
///
/// Panics if the two buffers differ in dimensions.
pub fn step(current: &Grid, next: &mut Grid) -> (u64, u64) {
    assert_eq!(
        current.dimensions(),
        next.dimensions(),
        "generation buffers must match in size"
    );

    let cols = current.cols();
    next.cells_mut()
        .par_chunks_mut(cols)
        .enumerate()
        .map(|(row, out)| {
            let mut births = 0u64;
            let mut deaths = 0u64;
            for (col, slot) in out.iter_mut().enumerate() {
                let alive = current.get(row as i64, col as i64);
                let live_neighbors = current.live_neighbors(row, col);
                let survives = match (alive, live_neighbors) {
                    (true, 2) | (true, 3) => true,
                    (false, 3) => true,
                    _ => false,
                };
                if survives && !alive {
                    births += 1;
                }
                if alive && !survives {
                    deaths += 1;
                }
                *slot = survives;
            }
            (births, deaths)
        })
        .reduce(|| (0, 0), |a, b| (a.0 + b.0, a.1 + b.1))
}

/// Counts the live cells in the grid.
///
/// Partial counts are computed per row in parallel and summed; the
/// partitioning has no effect on the result.
pub fn population(grid: &Grid) -> u64 {
    grid.cells()
        .par_chunks(grid.cols())
        .map(|row| row.iter().filter(|&&cell| cell).count() as u64)
        .sum()
}

/// Drives a grid through successive generations.
///
/// Owns the two generation buffers for the whole run. Each step writes
/// the new generation into the back buffer and then swaps the buffer
/// roles, so no cell contents are ever copied between buffers.
#[derive(Debug)]
pub struct Simulation {
    current: Grid,
    next: Grid,
    stats: Stats,
}

impl Simulation {
    /// Wraps an initial grid together with a back buffer of the same size.
    pub fn new(initial: Grid) -> Simulation {
        let (rows, cols) = initial.dimensions();
        let mut sim = Simulation {
            next: Grid::new(rows, cols),
            current: initial,
            stats: Stats::new(),
        };
        sim.stats.current_population = population(&sim.current);
        sim
    }

    /// The most recently completed generation.
    pub fn grid(&self) -> &Grid {
        &self.current
    }

    /// Counters for the run so far.
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Advances the simulation by one generation.
    pub fn advance(&mut self) {
        let (births, deaths) = step(&self.current, &mut self.next);
        mem::swap(&mut self.current, &mut self.next);
        let alive = population(&self.current);
        self.stats.record(births, deaths, alive);
        debug!(
            "generation {}: {} born, {} died, {} alive",
            self.stats.generation, births, deaths, alive
        );
    }

    /// Runs a fixed number of generations, rendering and reporting each one.
    ///
    /// Per generation: advance, hand the fresh grid to `renderer`, sleep
    /// for `delay` if one is configured, then call `report` with the
    /// generation number and live-cell count. The loop always runs to the
    /// end; a stabilized or extinct pattern keeps being stepped.
    ///
    /// # Returns
    ///
    /// Wall-clock time for the whole loop, rendering and delays included.
    pub fn run<F>(
        &mut self,
        generations: u64,
        delay: Duration,
        renderer: &mut dyn Renderer,
        mut report: F,
    ) -> io::Result<Duration>
    where
        F: FnMut(u64, u64),
    {
        let start = Instant::now();
        for _ in 0..generations {
            self.advance();
            renderer.render(&self.current)?;
            if !delay.is_zero() {
                thread::sleep(delay);
            }
            report(self.stats.generation, self.stats.current_population);
        }
        Ok(start.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{CaptureRenderer, NullRenderer};
    use crate::seed;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn population_sequential(grid: &Grid) -> u64 {
        grid.cells().iter().filter(|&&cell| cell).count() as u64
    }

    fn full_grid(rows: usize, cols: usize) -> Grid {
        let mut grid = Grid::new(rows, cols);
        for row in 0..rows as i64 {
            for col in 0..cols as i64 {
                grid.set(row, col, true);
            }
        }
        grid
    }

    #[test]
    fn lone_cell_dies() {
        let mut start = Grid::new(3, 3);
        start.set(1, 1, true);
        let mut next = Grid::new(3, 3);

        let (births, deaths) = step(&start, &mut next);

        assert_eq!(population(&next), 0);
        assert_eq!((births, deaths), (0, 1));
    }

    #[test]
    fn block_is_a_still_life() {
        let mut start = Grid::new(5, 5);
        for (row, col) in [(1, 1), (1, 2), (2, 1), (2, 2)] {
            start.set(row, col, true);
        }
        let mut next = Grid::new(5, 5);

        let (births, deaths) = step(&start, &mut next);

        assert_eq!(next, start);
        assert_eq!((births, deaths), (0, 0));
    }

    #[test]
    fn blinker_oscillates_with_period_two() {
        let mut horizontal = Grid::new(5, 5);
        for col in 1..=3 {
            horizontal.set(2, col, true);
        }

        let mut sim = Simulation::new(horizontal.clone());
        sim.advance();
        assert_ne!(*sim.grid(), horizontal);
        sim.advance();
        assert_eq!(*sim.grid(), horizontal);
    }

    #[test]
    fn saturated_torus_dies_out() {
        // All 9 cells alive on a 3x3 torus: every cell sees 8 neighbors.
        let mut sim = Simulation::new(full_grid(3, 3));
        sim.advance();
        assert_eq!(sim.stats().current_population, 0);
    }

    #[test]
    fn population_counts_everything_or_nothing() {
        assert_eq!(population(&Grid::new(7, 9)), 0);
        assert_eq!(population(&full_grid(7, 9)), 63);
    }

    #[test]
    fn parallel_and_sequential_counts_agree() {
        let mut rng = StdRng::seed_from_u64(7);
        let grid = seed::random(33, 17, 0.4, &mut rng);
        assert_eq!(population(&grid), population_sequential(&grid));
    }

    #[test]
    fn buffers_swap_without_reallocating() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut sim = Simulation::new(seed::random(16, 16, 0.5, &mut rng));

        let before = [sim.current.cells().as_ptr(), sim.next.cells().as_ptr()];
        for _ in 0..8 {
            sim.advance();
        }
        let after = [sim.current.cells().as_ptr(), sim.next.cells().as_ptr()];

        assert!(before.contains(&after[0]));
        assert!(before.contains(&after[1]));
        assert_ne!(after[0], after[1]);
    }

    #[test]
    fn advance_exposes_the_freshly_stepped_generation() {
        let mut rng = StdRng::seed_from_u64(3);
        let start = seed::random(12, 8, 0.3, &mut rng);

        let mut expected = Grid::new(12, 8);
        step(&start, &mut expected);

        let mut sim = Simulation::new(start);
        sim.advance();
        assert_eq!(*sim.grid(), expected);
    }

    #[test]
    fn advance_tallies_births_and_deaths() {
        // A blinker flips two cells on and two off every generation.
        let mut blinker = Grid::new(5, 5);
        for col in 1..=3 {
            blinker.set(2, col, true);
        }

        let mut sim = Simulation::new(blinker);
        sim.advance();

        assert_eq!(sim.stats().cells_created, 2);
        assert_eq!(sim.stats().cells_destroyed, 2);
        assert_eq!(sim.stats().current_population, 3);
    }

    #[test]
    fn dead_grid_reports_zero_every_generation() {
        let mut sim = Simulation::new(Grid::new(5, 5));
        let mut reports = Vec::new();

        sim.run(3, Duration::ZERO, &mut NullRenderer, |generation, alive| {
            reports.push((generation, alive));
        })
        .unwrap();

        assert_eq!(reports, vec![(1, 0), (2, 0), (3, 0)]);
    }

    #[test]
    fn run_renders_each_generation_after_the_swap() {
        let mut sim = Simulation::new(full_grid(3, 3));
        let mut capture = CaptureRenderer::default();

        sim.run(1, Duration::ZERO, &mut capture, |_, alive| {
            assert_eq!(alive, 0);
        })
        .unwrap();

        assert_eq!(capture.frames, vec!["   \n   \n   \n".to_string()]);
    }
}
