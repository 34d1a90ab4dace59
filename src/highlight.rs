// codegen-preview: Syntax highlighting for the code and payload panels

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use regex::Regex;

const TOKEN_PATTERN: &str = r#"(?P<str>"(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*'|`(?:[^`\\]|\\.)*`)|(?P<flag>(?:^|\s)--?[A-Za-z][A-Za-z0-9-]*)|(?P<num>\b\d+(?:\.\d+)?\b)|(?P<word>[A-Za-z_$][A-Za-z0-9_$]*)"#;

struct Grammar {
    keywords: &'static [&'static str],
    line_comment: Option<&'static str>,
    flags: bool,
    keys: bool,
}

fn grammar(tag: &str) -> Option<Grammar> {
    let g = match tag {
        "bash" => Grammar {
            keywords: &["curl", "if", "then", "fi", "for", "do", "done", "export", "echo"],
            line_comment: Some("#"),
            flags: true,
            keys: false,
        },
        "python" => Grammar {
            keywords: &[
                "import", "from", "def", "return", "if", "else", "elif", "try", "except", "as",
                "for", "in", "while", "with", "class", "None", "True", "False", "and", "or",
                "not", "print",
            ],
            line_comment: Some("#"),
            flags: false,
            keys: false,
        },
        "javascript" | "typescript" => Grammar {
            keywords: &[
                "async", "await", "function", "const", "let", "var", "return", "if", "else",
                "try", "catch", "throw", "new", "interface", "type", "string", "number",
                "Promise", "void", "true", "false", "null", "undefined", "export", "import",
            ],
            line_comment: Some("//"),
            flags: false,
            keys: false,
        },
        "json" => Grammar {
            keywords: &["true", "false", "null"],
            line_comment: None,
            flags: false,
            keys: true,
        },
        _ => return None,
    };
    Some(g)
}

fn keyword_style() -> Style {
    Style::default()
        .fg(Color::Magenta)
        .add_modifier(Modifier::BOLD)
}

fn comment_style() -> Style {
    Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::ITALIC)
}

/// Turns source text into styled terminal lines. Pure apart from construction.
pub struct Highlighter {
    token: Regex,
}

impl Highlighter {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            token: Regex::new(TOKEN_PATTERN)?,
        })
    }

    /// Render `text` for the language `tag` (bash, python, javascript,
    /// typescript, json). Unknown tags render as plain text.
    pub fn highlight(&self, text: &str, tag: &str) -> Vec<Line<'static>> {
        let Some(g) = grammar(tag) else {
            return text.lines().map(|l| Line::raw(l.to_string())).collect();
        };
        text.lines().map(|line| self.highlight_line(line, &g)).collect()
    }

    fn highlight_line(&self, line: &str, g: &Grammar) -> Line<'static> {
        if let Some(marker) = g.line_comment {
            if line.trim_start().starts_with(marker) {
                return Line::from(Span::styled(line.to_string(), comment_style()));
            }
        }

        let mut spans = Vec::new();
        let mut cursor = 0;
        for caps in self.token.captures_iter(line) {
            let Some(m) = caps.get(0) else { continue };
            if m.start() > cursor {
                spans.push(Span::raw(line[cursor..m.start()].to_string()));
            }
            let text = m.as_str().to_string();

            let style = if caps.name("str").is_some() {
                let is_key = g.keys && line[m.end()..].trim_start().starts_with(':');
                Style::default().fg(if is_key { Color::Cyan } else { Color::Green })
            } else if caps.name("flag").is_some() {
                if g.flags {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default()
                }
            } else if caps.name("num").is_some() {
                Style::default().fg(Color::Yellow)
            } else if g.keywords.contains(&m.as_str()) {
                keyword_style()
            } else {
                Style::default()
            };

            spans.push(Span::styled(text, style));
            cursor = m.end();
        }
        if cursor < line.len() {
            spans.push(Span::raw(line[cursor..].to_string()));
        }
        Line::from(spans)
    }
}

/// Pretty JSON with two-space indentation, as shown in the payload panel.
pub fn pretty_payload(payload: &serde_json::Value) -> String {
    serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string())
}
