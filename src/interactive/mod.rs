//! Interactive terminal UI for filling in the monthly report
//!
//! Shows the month table, lets the user mark working days, previews the
//! report and exports it, while public holidays load in the background.

pub mod app;
pub mod events;
pub mod messages;
pub mod month_view;
pub mod report_view;
pub mod ui;
pub mod utils;

pub use app::App;
pub use events::{AppEvent, EventHandler};

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::commands::{holiday_source, SourceMode};
use crate::config::Config;

/// Run the interactive UI application
pub async fn run_interactive() -> Result<()> {
    let config = Config::load()?;
    let source = holiday_source(&config, SourceMode::Cached)?;
    tracing::info!("Starting interactive session");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, source);
    let res = run_app(&mut terminal, &mut app);
    app.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Some(path) = &app.last_export {
        println!("Last report: {}", path.display());
    }

    res
}

/// Main application loop
fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let event_handler = EventHandler::default();

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        match event_handler.next()? {
            AppEvent::Key(key) => {
                if !app.handle_key(key)? {
                    break;
                }
            }
            AppEvent::Tick => {}
        }
        app.tick();
    }

    Ok(())
}
