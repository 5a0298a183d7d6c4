//! Log Stream
//!
//! Append-only, newest-first sequence of structured security events. Entries
//! are immutable once created; the only removal is a whole-stream clear, or
//! tail eviction when a capacity is configured.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

// ----------------------------------------------------------------------------
// Log Entry
// ----------------------------------------------------------------------------

/// Severity class of a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogType {
    Critical,
    Alert,
    Action,
    System,
}

impl LogType {
    pub const ALL: &'static [LogType] = &[
        LogType::Critical,
        LogType::Alert,
        LogType::Action,
        LogType::System,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogType::Critical => "CRITICAL",
            LogType::Alert => "ALERT",
            LogType::Action => "ACTION",
            LogType::System => "SYSTEM",
        }
    }

    /// Severity icon used by terminal listings
    pub fn icon(&self) -> &'static str {
        match self {
            LogType::Critical => "🔴",
            LogType::Alert => "⚠️",
            LogType::Action | LogType::System => "✓",
        }
    }

    /// Case-insensitive lookup by name
    pub fn parse(name: &str) -> Option<LogType> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for LogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single structured security event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Wall-clock time of creation, `HH:MM:SS`
    pub timestamp: String,
    #[serde(rename = "type")]
    pub log_type: LogType,
    pub category: String,
    pub message: String,
}

impl LogEntry {
    /// Create an entry stamped with the current local time
    pub fn new(log_type: LogType, category: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_timestamp(current_timestamp(), log_type, category, message)
    }

    pub fn with_timestamp(
        timestamp: impl Into<String>,
        log_type: LogType,
        category: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            log_type,
            category: category.into(),
            message: message.into(),
        }
    }

    /// Render as a terminal listing line
    pub fn format_line(&self) -> String {
        format!(
            "{} [{}] {} | {} | {}",
            self.log_type.icon(),
            self.timestamp,
            self.log_type,
            self.category,
            self.message
        )
    }
}

/// Current local time formatted the way log entries carry it
pub fn current_timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

// ----------------------------------------------------------------------------
// Filtering
// ----------------------------------------------------------------------------

/// Selection applied by display surfaces (log panel tabs)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFilter {
    #[default]
    All,
    Only(LogType),
}

impl LogFilter {
    pub fn matches(&self, entry: &LogEntry) -> bool {
        match self {
            LogFilter::All => true,
            LogFilter::Only(log_type) => entry.log_type == *log_type,
        }
    }

    /// `"all"` or a log type name, case-insensitive
    pub fn parse(name: &str) -> Option<LogFilter> {
        if name.eq_ignore_ascii_case("all") {
            Some(LogFilter::All)
        } else {
            LogType::parse(name).map(LogFilter::Only)
        }
    }
}

// ----------------------------------------------------------------------------
// Log Stream
// ----------------------------------------------------------------------------

/// Newest-first sequence of log entries, optionally bounded
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogStream {
    entries: VecDeque<LogEntry>,
    #[serde(skip)]
    capacity: Option<usize>,
}

impl LogStream {
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
        }
    }

    /// Put `entry` at index 0, evicting the oldest entries past capacity
    pub fn prepend(&mut self, entry: LogEntry) {
        self.entries.push_front(entry);
        if let Some(capacity) = self.capacity {
            self.entries.truncate(capacity);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent entry
    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    pub fn get(&self, index: usize) -> Option<&LogEntry> {
        self.entries.get(index)
    }

    /// Newest-first iteration
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// The most recent `min(n, len)` entries, newest first
    pub fn tail(&self, n: usize) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().take(n)
    }

    pub fn filtered(&self, filter: LogFilter) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(move |entry| filter.matches(entry))
    }

    pub fn count_of(&self, log_type: LogType) -> usize {
        self.filtered(LogFilter::Only(log_type)).count()
    }
}
