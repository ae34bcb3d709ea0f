//! Initial grid construction, from randomness or from a pattern file.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use rand::Rng;
use thiserror::Error;

use crate::grid::Grid;

/// Errors raised while loading a pattern file.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] io::Error),

    /// Strict mode only: the file's line count differs from the grid's rows.
    #[error("seed file has {found} rows, grid needs {expected}")]
    RowCount { found: usize, expected: usize },

    /// Strict mode only: a line's width differs from the grid's columns.
    #[error("seed file row {row} is {found} cells wide, grid needs {expected}")]
    RowWidth {
        row: usize,
        found: usize,
        expected: usize,
    },
}

/// Fills a fresh grid at random, each cell alive with probability `density`.
///
/// The caller supplies the generator, so a fixed seed reproduces the fill
/// exactly.
pub fn random<R: Rng>(rows: usize, cols: usize, density: f64, rng: &mut R) -> Grid {
    let mut grid = Grid::new(rows, cols);
    for row in 0..rows as i64 {
        for col in 0..cols as i64 {
            grid.set(row, col, rng.gen_bool(density));
        }
    }
    grid
}

/// Loads a grid from a text file where `'X'` marks a live cell.
///
/// Every other character is dead, and rows or columns the file does not
/// cover stay dead; input beyond the grid is ignored. With `strict` set,
/// the file must match the grid dimensions exactly instead.
pub fn from_file(path: &Path, rows: usize, cols: usize, strict: bool) -> Result<Grid, SeedError> {
    let file = File::open(path)?;
    parse(BufReader::new(file), rows, cols, strict)
}

fn parse<R: BufRead>(reader: R, rows: usize, cols: usize, strict: bool) -> Result<Grid, SeedError> {
    let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;

    if strict {
        if lines.len() != rows {
            return Err(SeedError::RowCount {
                found: lines.len(),
                expected: rows,
            });
        }
        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != cols {
                return Err(SeedError::RowWidth {
                    row,
                    found,
                    expected: cols,
                });
            }
        }
    }

    let mut grid = Grid::new(rows, cols);
    for (row, line) in lines.iter().take(rows).enumerate() {
        for (col, ch) in line.chars().take(cols).enumerate() {
            if ch == 'X' {
                grid.set(row as i64, col as i64, true);
            }
        }
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Cursor;

    fn alive(grid: &Grid) -> usize {
        grid.cells().iter().filter(|&&cell| cell).count()
    }

    #[test]
    fn marks_only_x_cells_alive() {
        let grid = parse(Cursor::new("X.X\n.X.\n...\n"), 3, 3, false).unwrap();
        assert!(grid.get(0, 0));
        assert!(grid.get(0, 2));
        assert!(grid.get(1, 1));
        assert_eq!(alive(&grid), 3);
    }

    #[test]
    fn short_input_leaves_the_rest_dead() {
        let grid = parse(Cursor::new("X\n"), 3, 4, false).unwrap();
        assert!(grid.get(0, 0));
        assert_eq!(alive(&grid), 1);
    }

    #[test]
    fn oversized_input_is_truncated() {
        let grid = parse(Cursor::new("XXXXX\nXXXXX\nXXXXX\n"), 2, 2, false).unwrap();
        assert_eq!(alive(&grid), 4);
    }

    #[test]
    fn strict_mode_rejects_missing_rows() {
        let err = parse(Cursor::new("XX\n"), 2, 2, true).unwrap_err();
        assert!(matches!(
            err,
            SeedError::RowCount {
                found: 1,
                expected: 2
            }
        ));
    }

    #[test]
    fn strict_mode_rejects_ragged_rows() {
        let err = parse(Cursor::new("XX\nX\n"), 2, 2, true).unwrap_err();
        assert!(matches!(err, SeedError::RowWidth { row: 1, .. }));
    }

    #[test]
    fn strict_mode_accepts_an_exact_match() {
        let grid = parse(Cursor::new(".X\nX.\n"), 2, 2, true).unwrap();
        assert!(grid.get(0, 1));
        assert!(grid.get(1, 0));
        assert_eq!(alive(&grid), 2);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = from_file(Path::new("definitely-not-here.life"), 3, 3, false).unwrap_err();
        assert!(matches!(err, SeedError::Io(_)));
    }

    #[test]
    fn fixed_rng_seed_reproduces_the_fill() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        assert_eq!(random(10, 10, 0.5, &mut a), random(10, 10, 0.5, &mut b));
    }

    #[test]
    fn density_extremes_fill_or_clear() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(alive(&random(4, 4, 0.0, &mut rng)), 0);
        assert_eq!(alive(&random(4, 4, 1.0, &mut rng)), 16);
    }
}
