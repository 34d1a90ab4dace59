// codegen-preview: TUI application state and key handling

use crate::clipboard::Clipboard;
use crate::driver::Driver;
use crate::format::Format;
use crate::highlight::Highlighter;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Maximum log entries kept in memory.
const MAX_LOG_ENTRIES: usize = 200;

/// How long a notice stays in the footer.
const NOTICE_TTL: Duration = Duration::from_secs(3);

// ---------------------------------------------------------------------------
// Activity log
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Debug,
}

impl LogLevel {
    pub fn symbol(&self) -> &str {
        match self {
            LogLevel::Info => "ℹ",
            LogLevel::Warn => "⚠",
            LogLevel::Error => "✖",
            LogLevel::Debug => "·",
        }
    }
}

/// Bounded log shared between the tracing layer and the renderer.
#[derive(Clone, Default)]
pub struct ActivityLog {
    inner: Arc<Mutex<VecDeque<LogEntry>>>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, level: LogLevel, message: impl Into<String>) {
        let Ok(mut logs) = self.inner.lock() else {
            return;
        };
        if logs.len() >= MAX_LOG_ENTRIES {
            logs.pop_front();
        }
        logs.push_back(LogEntry {
            timestamp: chrono::Local::now().format("%H:%M:%S").to_string(),
            level,
            message: message.into(),
        });
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.inner
            .lock()
            .map(|logs| logs.iter().cloned().collect())
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Tabs,
    BaseUrl,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub shown_at: Instant,
}

pub struct App {
    pub driver: Driver,
    pub focus: Focus,
    pub notice: Option<Notice>,
    pub log: ActivityLog,
    pub code_scroll: u16,
    pub running: bool,
    pub highlighter: Highlighter,
    clipboard: Box<dyn Clipboard>,
    last_seq: u64,
}

impl App {
    pub fn new(
        driver: Driver,
        clipboard: Box<dyn Clipboard>,
        log: ActivityLog,
    ) -> anyhow::Result<Self> {
        let last_seq = driver.orchestrator().latest_seq();
        Ok(Self {
            driver,
            focus: Focus::Tabs,
            notice: None,
            log,
            code_scroll: 0,
            running: true,
            highlighter: Highlighter::new()?,
            clipboard,
            last_seq,
        })
    }

    /// Apply arrived responses and expire old notices. Called once per frame.
    pub fn tick(&mut self) {
        self.driver.poll_completions();
        if self
            .notice
            .as_ref()
            .is_some_and(|n| n.shown_at.elapsed() >= NOTICE_TTL)
        {
            self.notice = None;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.running = false;
            return;
        }

        match self.focus {
            Focus::Tabs => self.handle_tabs_key(key),
            Focus::BaseUrl => self.handle_input_key(key),
        }

        // New request issued: the old scroll position means nothing now.
        let seq = self.driver.orchestrator().latest_seq();
        if seq != self.last_seq {
            self.last_seq = seq;
            self.code_scroll = 0;
        }
    }

    fn handle_tabs_key(&mut self, key: KeyEvent) {
        let current = self.driver.state().selected_format;
        match key.code {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Tab | KeyCode::Right => self.driver.select_format(current.next()),
            KeyCode::BackTab | KeyCode::Left => self.driver.select_format(current.prev()),
            KeyCode::Char(c @ '1'..='4') => {
                let idx = c as usize - '1' as usize;
                self.driver.select_format(Format::ALL[idx]);
            }
            KeyCode::Char('e') => self.focus = Focus::BaseUrl,
            KeyCode::Char('r') | KeyCode::Enter => self.driver.confirm_configuration(),
            KeyCode::Char('y') => self.copy(),
            KeyCode::Down | KeyCode::Char('j') => self.code_scroll = self.code_scroll.saturating_add(1),
            KeyCode::Up | KeyCode::Char('k') => self.code_scroll = self.code_scroll.saturating_sub(1),
            KeyCode::PageDown => self.code_scroll = self.code_scroll.saturating_add(10),
            KeyCode::PageUp => self.code_scroll = self.code_scroll.saturating_sub(10),
            _ => {}
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        let mut url = self.driver.state().base_url.clone();
        match key.code {
            KeyCode::Enter => {
                self.focus = Focus::Tabs;
                self.driver.confirm_configuration();
                return;
            }
            KeyCode::Esc => {
                self.focus = Focus::Tabs;
                return;
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => url.clear(),
            KeyCode::Backspace => {
                url.pop();
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                url.push(c)
            }
            _ => return,
        }
        self.driver.update_base_url(url);
    }

    fn copy(&mut self) {
        let outcome = self.driver.copy_current_code(self.clipboard.as_mut());
        self.notice = Some(Notice {
            text: outcome.notice().to_string(),
            shown_at: Instant::now(),
        });
    }
}

// ---------------------------------------------------------------------------
// Tracing Integration
// ---------------------------------------------------------------------------

pub struct TuiLayer {
    log: ActivityLog,
}

impl TuiLayer {
    pub fn new(log: ActivityLog) -> Self {
        Self { log }
    }
}

impl<S> tracing_subscriber::Layer<S> for TuiLayer
where
    S: tracing::Subscriber,
{
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = LogVisitor::default();
        event.record(&mut visitor);

        let level = match *event.metadata().level() {
            tracing::Level::ERROR => LogLevel::Error,
            tracing::Level::WARN => LogLevel::Warn,
            tracing::Level::INFO => LogLevel::Info,
            _ => LogLevel::Debug,
        };

        if !visitor.message.is_empty() {
            let mut line = visitor.message;
            for (name, value) in visitor.fields {
                line.push_str(&format!(" {}={}", name, value));
            }
            self.log.push(level, line);
        }
    }
}

#[derive(Default)]
struct LogVisitor {
    message: String,
    fields: Vec<(&'static str, String)>,
}

impl tracing::field::Visit for LogVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields.push((field.name(), format!("{:?}", value)));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push((field.name(), value.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::orchestrator::{COPY_ACK, NOTHING_TO_COPY};
    use crate::service::{CodegenService, GenerationRequest, GenerationResult, ServiceError};
    use crate::workflow::WorkflowDefinition;
    use async_trait::async_trait;
    use serde_json::json;

    struct Echo;

    #[async_trait]
    impl CodegenService for Echo {
        async fn generate(
            &self,
            request: &GenerationRequest,
        ) -> Result<GenerationResult, ServiceError> {
            Ok(GenerationResult {
                code: format!("{}@{}", request.language, request.base_url),
                payload: json!({"ok": true}),
            })
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        crate::logger::init_test();
        let driver = Driver::start(
            Arc::new(Echo),
            WorkflowDefinition::sample(),
            Format::Curl,
            "http://base",
        );
        App::new(driver, Box::new(MemoryClipboard::default()), ActivityLog::new()).unwrap()
    }

    #[tokio::test]
    async fn test_tab_keys_select_formats() {
        let mut app = app();
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.driver.state().selected_format, Format::Python);
        assert!(app.driver.state().is_loading());

        app.handle_key(key(KeyCode::Char('4')));
        assert_eq!(app.driver.state().selected_format, Format::Ts);

        app.handle_key(key(KeyCode::BackTab));
        assert_eq!(app.driver.state().selected_format, Format::Js);

        assert_eq!(app.driver.settle().await.displayed_text(), "js@http://base");
    }

    #[tokio::test]
    async fn test_editing_base_url_waits_for_enter() {
        let mut app = app();
        app.driver.settle().await;
        let seq = app.driver.orchestrator().latest_seq();

        app.handle_key(key(KeyCode::Char('e')));
        assert_eq!(app.focus, Focus::BaseUrl);
        app.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        for c in "http://x".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(app.driver.state().base_url, "http://x");
        assert_eq!(app.driver.orchestrator().latest_seq(), seq);

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.focus, Focus::Tabs);
        assert_eq!(app.driver.orchestrator().latest_seq(), seq + 1);
        assert_eq!(app.driver.settle().await.displayed_text(), "curl@http://x");
    }

    #[tokio::test]
    async fn test_modified_keys_are_not_typed_into_url() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('e')));
        app.handle_key(KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL));
        app.handle_key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::ALT));
        assert_eq!(app.driver.state().base_url, "http://base");

        app.handle_key(KeyEvent::new(KeyCode::Char('X'), KeyModifiers::SHIFT));
        assert_eq!(app.driver.state().base_url, "http://baseX");
    }

    #[tokio::test]
    async fn test_escape_keeps_url_without_request() {
        let mut app = app();
        let seq = app.driver.orchestrator().latest_seq();
        app.handle_key(key(KeyCode::Char('e')));
        app.handle_key(key(KeyCode::Backspace));
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.focus, Focus::Tabs);
        assert_eq!(app.driver.state().base_url, "http://bas");
        assert_eq!(app.driver.orchestrator().latest_seq(), seq);
    }

    #[tokio::test]
    async fn test_copy_notice() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('y')));
        assert_eq!(app.notice.as_ref().map(|n| n.text.as_str()), Some(NOTHING_TO_COPY));

        app.driver.settle().await;
        app.handle_key(key(KeyCode::Char('y')));
        assert_eq!(app.notice.as_ref().map(|n| n.text.as_str()), Some(COPY_ACK));
    }

    #[tokio::test]
    async fn test_quit_and_scroll_reset() {
        let mut app = app();
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.code_scroll, 2);

        app.handle_key(key(KeyCode::Char('r')));
        assert_eq!(app.code_scroll, 0);

        app.handle_key(key(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn test_activity_log_is_bounded() {
        let log = ActivityLog::new();
        for i in 0..(MAX_LOG_ENTRIES + 5) {
            log.push(LogLevel::Info, format!("entry {}", i));
        }
        let entries = log.entries();
        assert_eq!(entries.len(), MAX_LOG_ENTRIES);
        assert_eq!(entries[0].message, "entry 5");
    }
}
