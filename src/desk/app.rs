// Desk state and input handling.
// Routes mouse and resize events into the window view-model and collects repo summaries.

use crossterm::event::{Event, KeyCode, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::proxy::RepoSummary;
use crate::window::{
    Geometry, Interaction, Point, ResizeDelta, Size, WindowConstraints, WindowViewModel,
};

/// Loading state for async data.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadingState<T> {
    #[default]
    Loading,
    Loaded(T),
    Error(String),
}

impl<T> LoadingState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadingState::Loaded(data) => Some(data),
            _ => None,
        }
    }
}

/// One repository shown in the window.
#[derive(Debug, Clone)]
pub struct RepoCard {
    /// URL as configured.
    pub url: String,
    pub summary: LoadingState<RepoSummary>,
}

/// Result of a background summary fetch, tagged with the card it belongs to.
#[derive(Debug)]
pub struct CardUpdate {
    pub index: usize,
    pub summary: LoadingState<RepoSummary>,
}

/// Part of the window under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    TitleBar,
    ResizeGrip,
    Body,
}

/// Which window handle, if any, contains the cell at (`column`, `row`).
pub fn hit_test(geometry: Geometry, column: i32, row: i32) -> Option<Handle> {
    let right = geometry.x + geometry.width - 1;
    let bottom = geometry.y + geometry.height - 1;
    if column < geometry.x || column > right || row < geometry.y || row > bottom {
        return None;
    }
    if column == right && row == bottom {
        Some(Handle::ResizeGrip)
    } else if row == geometry.y {
        Some(Handle::TitleBar)
    } else {
        Some(Handle::Body)
    }
}

/// Host and viewport for a terminal of `columns` x `rows`; the last row holds the status bar.
pub fn terminal_surfaces(columns: u16, rows: u16) -> (Size, Size) {
    let viewport = Size::new(i32::from(columns), i32::from(rows));
    let host = Size::new(viewport.width, (viewport.height - 1).max(0));
    (host, viewport)
}

/// Main desk state.
pub struct DeskApp {
    pub window: WindowViewModel,
    pub cards: Vec<RepoCard>,
    /// Whether the app should exit.
    pub should_quit: bool,
    updates: Option<UnboundedReceiver<CardUpdate>>,
}

impl DeskApp {
    pub fn new(urls: Vec<String>) -> Self {
        let cards = urls
            .into_iter()
            .map(|url| RepoCard {
                url,
                summary: LoadingState::Loading,
            })
            .collect();
        Self {
            window: WindowViewModel::new(WindowConstraints::terminal()),
            cards,
            should_quit: false,
            updates: None,
        }
    }

    /// Receive summaries from background fetches.
    pub fn with_updates(mut self, updates: UnboundedReceiver<CardUpdate>) -> Self {
        self.updates = Some(updates);
        self
    }

    /// Apply every summary that has arrived since the last frame.
    pub fn drain_updates(&mut self) {
        let Some(rx) = self.updates.as_mut() else {
            return;
        };
        let mut arrived = Vec::new();
        while let Ok(update) = rx.try_recv() {
            arrived.push(update);
        }
        for update in arrived {
            self.apply(update);
        }
    }

    pub fn apply(&mut self, update: CardUpdate) {
        if let Some(card) = self.cards.get_mut(update.index) {
            card.summary = update.summary;
        }
    }

    /// Handle one terminal event.
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                    self.should_quit = true;
                }
            }
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(columns, rows) => {
                let (host, viewport) = terminal_surfaces(columns, rows);
                self.window.on_viewport_change(host, viewport);
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let at = Point::new(i32::from(mouse.column), i32::from(mouse.row));
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                match hit_test(self.window.geometry(), at.x, at.y) {
                    Some(Handle::TitleBar) => self.window.start_drag(at),
                    Some(Handle::ResizeGrip) => self.window.start_resize(at),
                    _ => {}
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => match self.window.interaction() {
                Interaction::Dragging { anchor } => {
                    self.window.drag_move(at.x - anchor.x, at.y - anchor.y);
                }
                Interaction::Resizing { anchor } => self.window.resize_by(ResizeDelta {
                    delta_x: at.x - anchor.x,
                    delta_y: at.y - anchor.y,
                }),
                _ => {}
            },
            MouseEventKind::Up(MouseButton::Left) => self.window.end_drag(),
            _ => {}
        }
    }
}
