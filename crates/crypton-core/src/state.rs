//! Session state schema
//!
//! `SystemState` is the single authoritative record of a console session.
//! It is owned by the [`Store`](crate::Store); everything else reads clones.

use serde::{Deserialize, Serialize};

use crate::config::StoreConfig;
use crate::logs::LogStream;
use crate::terminal::TerminalBuffer;

/// Lower bound of the threat score
pub const THREAT_MIN: f64 = 0.0;
/// Upper bound of the threat score
pub const THREAT_MAX: f64 = 100.0;

/// Clamp a threat score into `[0, 100]`; NaN reads back as 0
pub fn clamp_threat(value: f64) -> f64 {
    if value.is_nan() {
        THREAT_MIN
    } else {
        value.clamp(THREAT_MIN, THREAT_MAX)
    }
}

/// Complete telemetry state of one console session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemState {
    /// Whether the detection engine is conceptually active
    pub is_running: bool,
    /// Active sensors, 0..=4
    pub sensors_online: u8,
    /// Confirmed detections; never decreases
    pub total_attacks: u64,
    /// Aggregate threat score in `[0, 100]`
    pub threat_level: f64,
    /// External notifier connectivity
    pub telegram_status: bool,
    pub telegram_last_message: String,
    /// Newest-first event log
    pub logs: LogStream,
    /// Freezes log consumption, not production
    pub pause_logs: bool,
    /// Oldest-first terminal output
    pub terminal_history: TerminalBuffer,
}

impl SystemState {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            is_running: false,
            sensors_online: config.sensors_online,
            total_attacks: 0,
            threat_level: THREAT_MIN,
            telegram_status: false,
            telegram_last_message: config.telegram_initial_message.clone(),
            logs: LogStream::new(config.log_capacity),
            pause_logs: false,
            terminal_history: TerminalBuffer::new(),
        }
    }

    /// Threat level as displayed: rounded to the nearest integer
    pub fn threat_percent(&self) -> u8 {
        clamp_threat(self.threat_level).round() as u8
    }

    pub fn threat_severity(&self) -> ThreatSeverity {
        ThreatSeverity::from_level(self.threat_level)
    }
}

impl Default for SystemState {
    fn default() -> Self {
        Self::new(&StoreConfig::default())
    }
}

/// Display band of the threat score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreatSeverity {
    Safe,
    Warning,
    Critical,
}

impl ThreatSeverity {
    pub fn from_level(level: f64) -> Self {
        let level = clamp_threat(level);
        if level < 30.0 {
            ThreatSeverity::Safe
        } else if level < 60.0 {
            ThreatSeverity::Warning
        } else {
            ThreatSeverity::Critical
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ThreatSeverity::Safe => "Safe",
            ThreatSeverity::Warning => "Warning",
            ThreatSeverity::Critical => "Critical",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = SystemState::default();
        assert!(!state.is_running);
        assert_eq!(state.sensors_online, 4);
        assert_eq!(state.total_attacks, 0);
        assert_eq!(state.threat_level, 0.0);
        assert!(state.logs.is_empty());
        assert!(state.terminal_history.is_empty());
        assert!(!state.pause_logs);
    }

    #[test]
    fn test_clamp_threat() {
        assert_eq!(clamp_threat(-5.0), 0.0);
        assert_eq!(clamp_threat(42.5), 42.5);
        assert_eq!(clamp_threat(250.0), 100.0);
        assert_eq!(clamp_threat(f64::NAN), 0.0);
        assert_eq!(clamp_threat(f64::INFINITY), 100.0);
    }

    #[test]
    fn test_threat_percent_rounds() {
        let mut state = SystemState::default();
        state.threat_level = 49.5;
        assert_eq!(state.threat_percent(), 50);
        state.threat_level = 49.4;
        assert_eq!(state.threat_percent(), 49);
    }

    #[test]
    fn test_threat_severity_bands() {
        assert_eq!(ThreatSeverity::from_level(0.0), ThreatSeverity::Safe);
        assert_eq!(ThreatSeverity::from_level(29.9), ThreatSeverity::Safe);
        assert_eq!(ThreatSeverity::from_level(30.0), ThreatSeverity::Warning);
        assert_eq!(ThreatSeverity::from_level(60.0), ThreatSeverity::Critical);
        assert_eq!(ThreatSeverity::Critical.label(), "Critical");
    }
}
