//! Rendering the grid during batch runs.

use std::io::{self, Stdout, Write};

use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};

use crate::grid::Grid;

/// Something that can display a generation.
pub trait Renderer {
    fn render(&mut self, grid: &Grid) -> io::Result<()>;
}

/// Formats a grid as text, one line per row, `'#'` for a live cell and a
/// space for a dead one.
pub fn ascii_frame(grid: &Grid) -> String {
    let mut frame = String::with_capacity(grid.rows() * (grid.cols() + 1));
    for row in 0..grid.rows() as i64 {
        for col in 0..grid.cols() as i64 {
            frame.push(if grid.get(row, col) { '#' } else { ' ' });
        }
        frame.push('\n');
    }
    frame
}

/// Clears the terminal and prints the grid from the top-left corner.
pub struct TerminalRenderer {
    out: Stdout,
}

impl TerminalRenderer {
    pub fn new() -> TerminalRenderer {
        TerminalRenderer { out: io::stdout() }
    }
}

impl Renderer for TerminalRenderer {
    fn render(&mut self, grid: &Grid) -> io::Result<()> {
        execute!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        self.out.write_all(ascii_frame(grid).as_bytes())?;
        self.out.flush()
    }
}

/// Discards every frame. Used when visualization is off.
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _grid: &Grid) -> io::Result<()> {
        Ok(())
    }
}

/// Keeps every rendered frame as a string, in order.
#[derive(Debug, Default)]
pub struct CaptureRenderer {
    pub frames: Vec<String>,
}

impl Renderer for CaptureRenderer {
    fn render(&mut self, grid: &Grid) -> io::Result<()> {
        self.frames.push(ascii_frame(grid));
        Ok(())
    }
}
