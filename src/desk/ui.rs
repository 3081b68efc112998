// Desk rendering.
// Draws the editor window at its view-model geometry, the repo cards inside it, and a status bar.

use ratatui::{prelude::*, widgets::*};

use crate::proxy::RepoSummary;
use crate::window::Geometry;

use super::app::{DeskApp, LoadingState, RepoCard};

/// Main draw function that renders the entire desk.
pub fn draw(frame: &mut Frame, app: &DeskApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Desktop
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let desktop = Block::default().style(Style::default().bg(Color::Black));
    frame.render_widget(desktop, chunks[0]);

    if app.window.is_initialized() {
        let area = window_rect(app.window.geometry(), chunks[0]);
        if area.width > 2 && area.height > 2 {
            draw_window(frame, app, area);
        }
    }

    draw_status_bar(frame, app, chunks[1]);
}

/// Terminal rect for `geometry`, cut to what is visible inside `bounds`.
pub fn window_rect(geometry: Geometry, bounds: Rect) -> Rect {
    let cell = |v: i32| u16::try_from(v.max(0)).unwrap_or(u16::MAX);
    let wanted = Rect {
        x: cell(geometry.x),
        y: cell(geometry.y),
        width: cell(geometry.width),
        height: cell(geometry.height),
    };
    wanted.intersection(bounds)
}

fn draw_window(frame: &mut Frame, app: &DeskApp, area: Rect) {
    let border = if app.window.is_dragging() || app.window.is_resizing() {
        Color::Yellow
    } else {
        Color::Cyan
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(" folio ~ projects ")
        .title_bottom(Line::from("◢").right_aligned());

    frame.render_widget(Clear, area);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.cards.is_empty() {
        let text = Paragraph::new("No repositories configured (FOLIO_DESK_REPOS)")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(text, inner);
        return;
    }

    let items: Vec<ListItem> = app.cards.iter().map(card_item).collect();
    frame.render_widget(List::new(items), inner);
}

fn card_item(card: &RepoCard) -> ListItem<'static> {
    match &card.summary {
        LoadingState::Loading => ListItem::new(vec![
            Line::from(Span::styled(
                card.url.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "  ⏳ Loading...",
                Style::default().fg(Color::Yellow),
            )),
        ]),
        LoadingState::Error(e) => ListItem::new(vec![
            Line::from(Span::styled(
                card.url.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("  ❌ {}", e),
                Style::default().fg(Color::Red),
            )),
        ]),
        LoadingState::Loaded(summary) => ListItem::new(summary_lines(&card.url, summary)),
    }
}

/// Lines describing one summary; degraded records read as temporarily unavailable.
pub fn summary_lines(url: &str, summary: &RepoSummary) -> Vec<Line<'static>> {
    let title = summary.name.clone().unwrap_or_else(|| url.to_string());
    let mut lines = vec![Line::from(Span::styled(
        title,
        Style::default().add_modifier(Modifier::BOLD),
    ))];

    if summary.is_degraded() {
        lines.push(Line::from(Span::styled(
            "  temporarily unavailable",
            Style::default().fg(Color::DarkGray),
        )));
        return lines;
    }

    if let Some(description) = &summary.description {
        lines.push(Line::from(format!("  {}", description)));
    }

    let mut meta = vec![Span::raw("  ")];
    if let Some(language) = &summary.language {
        meta.push(Span::styled(language.clone(), Style::default().fg(Color::Cyan)));
        meta.push(Span::raw("  "));
    }
    meta.push(Span::styled(
        format!("★ {}", summary.stars.unwrap_or(0)),
        Style::default().fg(Color::Yellow),
    ));
    meta.push(Span::raw(format!("  ⑂ {}", summary.forks.unwrap_or(0))));
    lines.push(Line::from(meta));
    lines
}

fn draw_status_bar(frame: &mut Frame, app: &DeskApp, area: Rect) {
    let g = app.window.geometry();
    let mut hints = vec![
        Span::raw(" drag title "),
        Span::styled("Move", Style::default().fg(Color::DarkGray)),
        Span::raw("  drag ◢ "),
        Span::styled("Resize", Style::default().fg(Color::DarkGray)),
        Span::raw("  q "),
        Span::styled("Quit", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("  {}x{} @ {},{}", g.width, g.height, g.x, g.y)),
    ];
    if app.window.is_mobile_view() {
        hints.push(Span::styled("  compact", Style::default().fg(Color::Magenta)));
    }
    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_rect_clipped() {
        let bounds = Rect::new(0, 0, 100, 40);
        let g = Geometry {
            width: 80,
            height: 24,
            x: 50,
            y: -5,
        };
        assert_eq!(window_rect(g, bounds), Rect::new(50, 0, 50, 24));
    }

    #[test]
    fn test_degraded_summary_lines() {
        let lines = summary_lines("https://github.com/a/b", &RepoSummary::rate_limited("b"));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].to_string(), "b");
        assert_eq!(lines[1].to_string(), "  temporarily unavailable");
    }

    #[test]
    fn test_summary_lines() {
        let summary = RepoSummary {
            name: Some("jolt".to_string()),
            description: Some("TUI".to_string()),
            language: Some("Rust".to_string()),
            stars: Some(5),
            forks: Some(1),
            ..RepoSummary::default()
        };
        let lines = summary_lines("u", &summary);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2].to_string(), "  Rust  ★ 5  ⑂ 1");
    }

    #[test]
    fn test_draw_smoke() {
        let backend = ratatui::backend::TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut app = DeskApp::new(vec!["https://github.com/a/b".to_string()]);
        app.handle_event(crossterm::event::Event::Resize(100, 30));
        terminal.draw(|frame| draw(frame, &app)).unwrap();
    }
}
