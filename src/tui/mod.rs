pub mod app;
pub mod ui;

use crate::tui::app::App;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::time::Duration;

/// Frame interval; also bounds how long an arrived response waits to be shown.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Run the preview loop in the context of the current terminal.
/// This will take over the terminal and block until the user quits.
pub async fn run(mut app: App) -> anyhow::Result<()> {
    tracing::info!("Preview started");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    while app.running {
        app.tick();

        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        // Let spawned requests make progress on a current-thread runtime too.
        tokio::task::yield_now().await;
    }
    Ok(())
}
