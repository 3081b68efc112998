// Terminal desk.
// Runs the emulated editor window in the terminal, filled with repo summaries from the proxy.

mod app;
mod ui;

use std::io;
use std::time::Duration;

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture};
use crossterm::{execute, terminal};
use ratatui::prelude::*;
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};
use tracing::{info, warn};

use crate::error::{FolioError, Result};
use crate::proxy::{RepoProxy, RepoTarget};

pub use app::{CardUpdate, DeskApp, Handle, LoadingState, RepoCard, hit_test, terminal_surfaces};
pub use ui::{draw, summary_lines, window_rect};

/// Fetch every configured summary in the background, then run the desk until quit.
pub async fn run(proxy: RepoProxy, urls: Vec<String>) -> Result<()> {
    let (tx, rx) = unbounded_channel();
    for (index, url) in urls.iter().enumerate() {
        tokio::spawn(load_card(proxy.clone(), index, url.clone(), tx.clone()));
    }
    drop(tx);

    let app = DeskApp::new(urls).with_updates(rx);
    tokio::task::spawn_blocking(move || run_terminal(app))
        .await
        .map_err(|e| FolioError::Other(format!("desk task failed: {}", e)))??;
    Ok(())
}

async fn load_card(proxy: RepoProxy, index: usize, url: String, tx: UnboundedSender<CardUpdate>) {
    let summary = match RepoTarget::from_query(Some(&url)) {
        Ok(target) => match proxy.repo_summary(&target).await {
            Ok(served) => {
                info!("{} served as {}", target.slug(), served.status.as_str());
                LoadingState::Loaded(served.body.summary)
            }
            Err(e) => {
                warn!("Failed to load {}: {}", url, e);
                LoadingState::Error(e.to_string())
            }
        },
        Err(e) => LoadingState::Error(e.to_string()),
    };
    // The receiver is gone once the desk has quit.
    let _ = tx.send(CardUpdate { index, summary });
}

fn run_terminal(mut app: DeskApp) -> Result<()> {
    let mut terminal = ratatui::init();
    execute!(io::stdout(), EnableMouseCapture)?;

    let result = event_loop(&mut app, &mut terminal);

    let restore = execute!(io::stdout(), DisableMouseCapture);
    ratatui::restore();
    result?;
    restore?;
    Ok(())
}

fn event_loop(app: &mut DeskApp, terminal: &mut Terminal<impl Backend>) -> Result<()> {
    let (columns, rows) = terminal::size()?;
    app.handle_event(event::Event::Resize(columns, rows));

    while !app.should_quit {
        app.drain_updates();
        terminal.draw(|frame| draw(frame, app))?;
        if event::poll(Duration::from_millis(100))? {
            app.handle_event(event::read()?);
        }
    }
    Ok(())
}
