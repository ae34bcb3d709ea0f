//! Interactive terminal session on top of the simulation engine.

use std::error::Error;
use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
    Terminal,
};
use sysinfo::{System, SystemExt};

use crate::engine::Simulation;
use crate::grid::Grid;

/// Session state: the simulation plus the bits the panels need.
struct App {
    sim: Simulation,
    /// Indicates whether the simulation is currently running
    running: bool,
    /// System information for resource monitoring
    sys: System,
}

impl App {
    fn new(initial: Grid) -> App {
        App {
            sim: Simulation::new(initial),
            running: false,
            sys: System::new_all(),
        }
    }

    /// Toggles the simulation between running and paused states.
    fn toggle_running(&mut self) {
        self.running = !self.running;
    }

    fn tick(&mut self) {
        self.sim.advance();
        self.sys.refresh_memory();
    }
}

/// Draws the game grid to the terminal interface.
fn draw_grid(f: &mut ratatui::Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Game of Life [Space: Play/Pause | Enter: Step | q: Quit]");

    let grid = app.sim.grid();
    let mut cells = String::new();
    for row in 0..grid.rows() as i64 {
        for col in 0..grid.cols() as i64 {
            cells.push(if grid.get(row, col) { '•' } else { ' ' });
        }
        cells.push('\n');
    }

    let paragraph = Paragraph::new(cells)
        .style(Style::default().fg(Color::White))
        .block(block);

    f.render_widget(paragraph, area);
}

/// Draws the statistics panel to the terminal interface.
fn draw_stats(f: &mut ratatui::Frame, app: &App, area: Rect) {
    let memory_used = app.sys.used_memory() / 1024; // Convert to KB
    let memory_total = app.sys.total_memory() / 1024;
    let stats = app.sim.stats();

    let stats_text = format!(
        "Statistics:\n\
        Generation: {}\n\
        Current Population: {}\n\
        Cells Created: {}\n\
        Cells Destroyed: {}\n\
        Birth Rate: {:.2}/gen\n\
        Death Rate: {:.2}/gen\n\
        Memory Usage: {}KB/{:.2}MB\n\
        Status: {}\n",
        stats.generation,
        stats.current_population,
        stats.cells_created,
        stats.cells_destroyed,
        stats.birth_rate(),
        stats.death_rate(),
        memory_used,
        memory_total as f64 / 1024.0,
        if app.running { "Running" } else { "Paused" }
    );

    let stats_widget = Paragraph::new(stats_text)
        .block(Block::default().borders(Borders::ALL).title("Statistics"))
        .wrap(Wrap { trim: true });

    f.render_widget(stats_widget, area);
}

/// Runs the interactive session until the user quits.
///
/// # Controls
///
/// * Space: Play/Pause the simulation
/// * Enter: Step forward one generation (when paused)
/// * q: Quit
///
/// # Errors
///
/// Returns an error if terminal manipulation fails.
pub fn run(initial: Grid) -> Result<(), Box<dyn Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(initial);
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(100);

    loop {
        terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(75), Constraint::Percentage(25)].as_ref())
                .split(f.size());

            draw_grid(f, &app, chunks[0]);
            draw_stats(f, &app, chunks[1]);
        })?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') => break,
                    KeyCode::Char(' ') => app.toggle_running(),
                    KeyCode::Enter => {
                        if !app.running {
                            app.tick();
                        }
                    }
                    _ => {}
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            if app.running {
                app.tick();
            }
            last_tick = Instant::now();
        }
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}
