use crossterm::{
    event::{
        self, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use std::{error::Error, io, time::Duration};

mod app;
mod config;
mod date_input;
mod form;
mod input;
mod integrations;
mod logging;
mod models;
mod runtime;
mod ui;

use app::App;
use config::Config;

fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::load();
    if let Err(err) = logging::init(&config.log) {
        eprintln!("wppform: logging disabled ({err})");
    }
    tracing::info!(config = ?config::config_path(), "starting session editor");

    let mut app = App::new(config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Needed to tell Shift+Enter from Enter; unsupported terminals ignore it.
    let _ = execute!(
        stdout,
        PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
    );

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    let _ = execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags);
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "terminal loop failed");
        println!("{:?}", err);
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        runtime::tick(app);

        terminal.draw(|f| ui::ui(f, app))?;

        if event::poll(Duration::from_millis(250))? {
            input::handle_event(app, event::read()?);
        }

        if app.should_quit {
            tracing::info!("quit");
            return Ok(());
        }
    }
}
