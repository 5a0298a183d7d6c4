//! Text rendering for the console surfaces
//!
//! Terminal lines are coloured by their [`LineKind`] tag, log entries by
//! severity. The dashboard and log panel are plain line lists so they can be
//! printed by the interactive console and by replay alike.

use crossterm::style::{Color, Stylize};

use crypton_core::{LineKind, LogEntry, LogFilter, LogType, SystemState, ThreatSeverity, MAX_SENSORS};

fn line_color(kind: LineKind) -> Option<Color> {
    match kind {
        LineKind::Error => Some(Color::Red),
        LineKind::Ok => Some(Color::Green),
        LineKind::System => Some(Color::Cyan),
        LineKind::Network => Some(Color::Blue),
        LineKind::Ai => Some(Color::Magenta),
        LineKind::Critical => Some(Color::DarkRed),
        LineKind::Notifier => Some(Color::DarkMagenta),
        LineKind::Boxed => Some(Color::DarkCyan),
        LineKind::Plain => None,
    }
}

fn log_color(log_type: LogType) -> Color {
    match log_type {
        LogType::Critical => Color::Red,
        LogType::Alert => Color::Yellow,
        LogType::Action => Color::Green,
        LogType::System => Color::Cyan,
    }
}

fn severity_color(severity: ThreatSeverity) -> Color {
    match severity {
        ThreatSeverity::Safe => Color::Green,
        ThreatSeverity::Warning => Color::Yellow,
        ThreatSeverity::Critical => Color::Red,
    }
}

/// Formats console output, optionally with ANSI colours
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    colored: bool,
}

impl Renderer {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    fn paint(&self, text: &str, color: Option<Color>) -> String {
        match color {
            Some(color) if self.colored => text.with(color).to_string(),
            _ => text.to_string(),
        }
    }

    /// One terminal buffer line
    pub fn terminal_line(&self, line: &str) -> String {
        self.paint(line, line_color(LineKind::classify(line)))
    }

    /// One log entry as shown by the live feed and the log panel
    pub fn log_entry(&self, entry: &LogEntry) -> String {
        self.paint(&entry.format_line(), Some(log_color(entry.log_type)))
    }

    /// Telemetry summary of the dashboard panel
    pub fn dashboard(&self, state: &SystemState) -> Vec<String> {
        let system = if state.is_running {
            self.paint("● ONLINE", Some(Color::Green))
        } else {
            self.paint("● OFFLINE", Some(Color::Red))
        };
        let severity = state.threat_severity();
        let threat = self.paint(
            &format!("{}% ({})", state.threat_percent(), severity.label()),
            Some(severity_color(severity)),
        );
        let telegram = if state.telegram_status {
            "Connected"
        } else {
            "Disconnected"
        };
        let pause = if state.pause_logs { " (paused)" } else { "" };

        vec![
            format!("System:       {}", system),
            format!("Sensors:      {}/{}", state.sensors_online, MAX_SENSORS),
            format!("Attacks:      {}", state.total_attacks),
            format!("Threat Level: {}", threat),
            format!(
                "Logs:         {} total, {} critical, {} alert, {} action, {} system{}",
                state.logs.len(),
                state.logs.count_of(LogType::Critical),
                state.logs.count_of(LogType::Alert),
                state.logs.count_of(LogType::Action),
                state.logs.count_of(LogType::System),
                pause
            ),
            format!(
                "Telegram Bot: {} - {}",
                telegram, state.telegram_last_message
            ),
        ]
    }

    /// Log panel contents for one filter tab, newest first
    pub fn log_panel(&self, state: &SystemState, filter: LogFilter) -> Vec<String> {
        let lines: Vec<String> = state
            .logs
            .filtered(filter)
            .map(|entry| self.log_entry(entry))
            .collect();
        if lines.is_empty() {
            vec!["No logs to display".to_string()]
        } else {
            lines
        }
    }
}
