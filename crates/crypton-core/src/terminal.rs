//! Terminal Line Buffer
//!
//! Oldest-first sequence of display lines. Lines are appended in emission
//! order and never reordered or deduplicated.

use serde::{Deserialize, Serialize};

/// Banner shown by display surfaces while the buffer is empty
pub const IDLE_BANNER: &str = "{> System ready. Type \"help\" for commands.";

/// Append-only sequence of terminal output lines
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TerminalBuffer {
    lines: Vec<String>,
}

impl TerminalBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn last(&self) -> Option<&str> {
        self.lines.last().map(String::as_str)
    }
}

// ----------------------------------------------------------------------------
// Line Classification
// ----------------------------------------------------------------------------

/// Display class of a terminal line, derived from its tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Error,
    Ok,
    System,
    Network,
    Ai,
    Critical,
    Notifier,
    Boxed,
    Plain,
}

impl LineKind {
    /// First matching tag wins, in display-priority order
    pub fn classify(line: &str) -> LineKind {
        const TAGS: &[(&str, LineKind)] = &[
            ("[ERR]", LineKind::Error),
            ("[OK]", LineKind::Ok),
            ("[SYS]", LineKind::System),
            ("[NET]", LineKind::Network),
            ("[AI]", LineKind::Ai),
            ("[CRITICAL]", LineKind::Critical),
            ("[TG]", LineKind::Notifier),
            ("║", LineKind::Boxed),
        ];

        TAGS.iter()
            .find(|(tag, _)| line.contains(tag))
            .map(|(_, kind)| *kind)
            .unwrap_or(LineKind::Plain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let mut buffer = TerminalBuffer::new();
        buffer.append("one");
        buffer.append("two");
        buffer.append("one");

        assert_eq!(buffer.lines(), &["one", "two", "one"]);
        assert_eq!(buffer.last(), Some("one"));
    }

    #[test]
    fn test_clear_empties_buffer() {
        let mut buffer = TerminalBuffer::new();
        buffer.append("line");
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.last(), None);
    }

    #[test]
    fn test_line_classification() {
        assert_eq!(LineKind::classify("[ERR] ✗ Unknown command: x"), LineKind::Error);
        assert_eq!(LineKind::classify("[OK] System stopped"), LineKind::Ok);
        assert_eq!(LineKind::classify("[SYS] >> Shutting down system..."), LineKind::System);
        assert_eq!(LineKind::classify("[NET] Sensors offline"), LineKind::Network);
        assert_eq!(LineKind::classify("[AI] Models unloaded"), LineKind::Ai);
        assert_eq!(LineKind::classify("[TG] Last: hi"), LineKind::Notifier);
        assert_eq!(LineKind::classify("║ Model: v1.3 LSTM (Ready)"), LineKind::Boxed);
        assert_eq!(LineKind::classify("status"), LineKind::Plain);
    }
}
