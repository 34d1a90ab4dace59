// codegen-preview: Clipboard access

use crossterm::clipboard::CopyToClipboard;
use crossterm::execute;
use std::io;

/// Fire-and-forget "copy string to system clipboard".
pub trait Clipboard {
    fn copy(&mut self, text: &str) -> io::Result<()>;
}

/// Writes an OSC 52 sequence to the terminal, which forwards it to the host clipboard.
#[derive(Debug, Default)]
pub struct TerminalClipboard;

impl Clipboard for TerminalClipboard {
    fn copy(&mut self, text: &str) -> io::Result<()> {
        execute!(io::stdout(), CopyToClipboard::to_clipboard_from(text))
    }
}

/// Keeps everything copied in memory, for exercising copy without a terminal.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    pub contents: Vec<String>,
}

impl Clipboard for MemoryClipboard {
    fn copy(&mut self, text: &str) -> io::Result<()> {
        self.contents.push(text.to_string());
        Ok(())
    }
}
