// codegen-preview: TUI rendering (ratatui widgets and layout).

use super::app::{App, Focus, LogEntry, LogLevel};
use crate::format::Format;
use crate::highlight::pretty_payload;
use crate::orchestrator::Mode;
use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};

const HEADER_ART: &str = " Workflow Code Generator ";
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Render the full preview layout.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // header (3) | base url (3) | tabs (3) | body | footer (3)
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(area);

    render_header(frame, outer[0]);
    render_base_url(frame, outer[1], app);
    render_tabs(frame, outer[2], app.driver.state().selected_format);
    render_body(frame, outer[3], app);
    render_footer(frame, outer[4], app);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            HEADER_ART,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("v{}  ", VERSION),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            "Generate code to test your workflow execution server.",
            Style::default().fg(Color::Gray),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(title, area);
}

fn render_base_url(frame: &mut Frame, area: Rect, app: &App) {
    let editing = app.focus == Focus::BaseUrl;
    let base_url = &app.driver.state().base_url;
    let border = if editing { Color::Yellow } else { Color::DarkGray };

    let widget = Paragraph::new(Line::from(vec![
        Span::styled(" Base URL: ", Style::default().fg(Color::Gray)),
        Span::styled(base_url.clone(), Style::default().fg(Color::White)),
    ]))
    .block(
        Block::default()
            .title(if editing {
                " ◉ Editing (Enter: update configuration, Esc: done) "
            } else {
                " ◉ Configuration "
            })
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    frame.render_widget(widget, area);

    if editing {
        let x = input_cursor_x(area, base_url.chars().count());
        frame.set_cursor_position(Position::new(x, area.y + 1));
    }
}

/// Column just past the typed URL, clamped inside the field's border.
fn input_cursor_x(area: Rect, url_len: usize) -> u16 {
    // 1 border + " Base URL: "
    let offset = u16::try_from(url_len)
        .unwrap_or(u16::MAX)
        .saturating_add(1 + 11);
    area.x
        .saturating_add(offset)
        .min(area.right().saturating_sub(2))
}

fn render_tabs(frame: &mut Frame, area: Rect, selected: Format) {
    let titles: Vec<Line> = Format::ALL
        .iter()
        .enumerate()
        .map(|(i, f)| Line::from(format!("{} {}", i + 1, f.label())))
        .collect();

    let tabs = Tabs::new(titles)
        .select(selected.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(tabs, area);
}

fn render_body(frame: &mut Frame, area: Rect, app: &App) {
    // Horizontal split: code (60%) | payload + activity (40%)
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(columns[1]);

    render_code(frame, columns[0], app);
    render_payload(frame, right[0], app);
    render_logs(frame, right[1], &app.log.entries());
}

fn render_code(frame: &mut Frame, area: Rect, app: &App) {
    let state = app.driver.state();
    let block = Block::default()
        .title(format!(" ◉ {} ", state.selected_format.label()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let widget = match &state.mode {
        Mode::Loading => Paragraph::new(state.displayed_text())
            .style(Style::default().fg(Color::Yellow)),
        Mode::Failure(message) => Paragraph::new(message.as_str())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: false }),
        Mode::Success(result) => Paragraph::new(
            app.highlighter
                .highlight(&result.code, state.selected_format.highlight_tag()),
        )
        .scroll((app.code_scroll, 0)),
    };

    frame.render_widget(widget.block(block), area);
}

fn render_payload(frame: &mut Frame, area: Rect, app: &App) {
    let lines = app
        .driver
        .state()
        .displayed_payload()
        .map(|payload| app.highlighter.highlight(&pretty_payload(payload), "json"))
        .unwrap_or_default();

    let widget = Paragraph::new(lines).block(
        Block::default()
            .title(" ◉ Generated Payload ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(widget, area);
}

fn render_logs(frame: &mut Frame, area: Rect, logs: &[LogEntry]) {
    let items: Vec<ListItem> = logs
        .iter()
        .rev()
        .take((area.height as usize).saturating_sub(2))
        .map(|entry| {
            let color = match entry.level {
                LogLevel::Info => Color::White,
                LogLevel::Warn => Color::Yellow,
                LogLevel::Error => Color::Red,
                LogLevel::Debug => Color::DarkGray,
            };

            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{} ", entry.timestamp),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("{} ", entry.level.symbol()),
                    Style::default().fg(color),
                ),
                Span::styled(entry.message.clone(), Style::default().fg(color)),
            ]))
        })
        .collect();

    let widget = List::new(items).block(
        Block::default()
            .title(" ◉ Activity ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta)),
    );

    frame.render_widget(widget, area);
}

fn key_hint(key: &'static str, label: &'static str) -> [Span<'static>; 2] {
    [
        Span::styled(
            format!(" {} ", key),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        Span::styled(format!(" {}  ", label), Style::default().fg(Color::Gray)),
    ]
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans: Vec<Span> = [
        key_hint("q", "Quit"),
        key_hint("Tab", "Format"),
        key_hint("e", "Edit URL"),
        key_hint("r", "Update"),
        key_hint("y", "Copy code"),
    ]
    .into_iter()
    .flatten()
    .collect();

    if let Some(notice) = &app.notice {
        spans.push(Span::styled(
            notice.text.clone(),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let footer = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::driver::Driver;
    use crate::service::{CodegenService, GenerationRequest, GenerationResult, ServiceError};
    use crate::tui::app::ActivityLog;
    use crate::workflow::WorkflowDefinition;
    use async_trait::async_trait;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::sync::Arc;

    struct Fails;

    #[async_trait]
    impl CodegenService for Fails {
        async fn generate(
            &self,
            _request: &GenerationRequest,
        ) -> Result<GenerationResult, ServiceError> {
            Err(ServiceError::from_status(422, r#"{"detail": "bad workflow"}"#))
        }
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_input_cursor_x_clamps_long_urls() {
        let area = Rect::new(2, 3, 40, 3);
        assert_eq!(input_cursor_x(area, 4), 2 + 12 + 4);
        assert_eq!(input_cursor_x(area, 1_000), area.right() - 2);
        assert_eq!(input_cursor_x(area, usize::MAX), area.right() - 2);

        let edge = Rect::new(u16::MAX - 50, 0, 50, 3);
        assert_eq!(input_cursor_x(edge, 70_000), edge.right() - 2);
    }

    #[tokio::test]
    async fn test_render_editing_very_long_url() {
        let driver = Driver::start(
            Arc::new(Fails),
            WorkflowDefinition::sample(),
            Format::Curl,
            "h".repeat(70_000),
        );
        let mut app = App::new(driver, Box::new(MemoryClipboard::default()), ActivityLog::new())
            .unwrap();
        app.focus = Focus::BaseUrl;

        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();
        assert!(screen_text(&terminal).contains("Editing"));
    }

    #[tokio::test]
    async fn test_render_loading_then_failure() {
        let driver = Driver::start(
            Arc::new(Fails),
            WorkflowDefinition::sample(),
            Format::Ts,
            "http://base",
        );
        let mut app = App::new(driver, Box::new(MemoryClipboard::default()), ActivityLog::new())
            .unwrap();
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();

        terminal.draw(|f| render(f, &app)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("Loading..."));
        assert!(text.contains("TS API"));
        assert!(text.contains("http://base"));

        app.driver.settle().await;
        terminal.draw(|f| render(f, &app)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("bad workflow"));
        assert!(!text.contains("Loading..."));
    }
}
