// Interactive dashboard for a completed backlink analysis

pub mod dashboard;
mod view;

pub use dashboard::{Dashboard, Mode, Tab};

use anyhow::Result;
use backlens_core::Analysis;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;

/// Takes over the terminal and shows `analysis` until the user quits.
pub fn run(analysis: Analysis) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut dashboard = Dashboard::new(analysis);
    let result = run_app(&mut terminal, &mut dashboard);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    dashboard: &mut Dashboard,
) -> Result<()> {
    loop {
        terminal.draw(|f| view::ui(f, dashboard))?;

        if let Event::Key(key) = event::read()? {
            // Only process KeyPress events, ignore KeyRelease
            if key.kind != KeyEventKind::Press {
                continue;
            }
            dashboard.handle_key(key);
        }

        if dashboard.should_quit {
            return Ok(());
        }
    }
}
