//! Console-local meta actions
//!
//! Lines starting with `:` are not terminal commands. They reach the store's
//! direct entry points (the dashboard toggle, the log panel's pause, resume
//! and clear buttons) and a few session helpers.

use crypton_core::LogFilter;
use thiserror::Error;

/// Prefix that marks a meta action
pub const META_PREFIX: char = ':';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaAction {
    /// Flip the running flag directly
    Toggle,
    Pause,
    Resume,
    ClearLogs,
    /// Print the telemetry summary
    Dashboard,
    /// Print the log panel for one tab
    Logs(LogFilter),
    /// Sleep for the given milliseconds
    Wait(u64),
    Help,
    Quit,
}

/// Reasons a `:` line was not understood
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetaParseError {
    #[error("unknown meta action :{0}")]
    Unknown(String),
    #[error("bad argument: {0}")]
    BadArgument(String),
}

impl MetaAction {
    /// `None` when the line is an ordinary terminal command
    pub fn parse(line: &str) -> Option<Result<MetaAction, MetaParseError>> {
        let body = line.trim().strip_prefix(META_PREFIX)?;
        let mut parts = body.split_whitespace();
        let name = parts.next().unwrap_or("").to_lowercase();
        let arg = parts.next();

        let action = match name.as_str() {
            "toggle" => Ok(MetaAction::Toggle),
            "pause" => Ok(MetaAction::Pause),
            "resume" => Ok(MetaAction::Resume),
            "clear-logs" => Ok(MetaAction::ClearLogs),
            "dashboard" | "dash" => Ok(MetaAction::Dashboard),
            "logs" => match arg {
                None => Ok(MetaAction::Logs(LogFilter::All)),
                Some(tab) => LogFilter::parse(tab)
                    .map(MetaAction::Logs)
                    .ok_or_else(|| MetaParseError::BadArgument(tab.to_string())),
            },
            "wait" => arg
                .and_then(|ms| ms.parse().ok())
                .map(MetaAction::Wait)
                .ok_or_else(|| MetaParseError::BadArgument(arg.unwrap_or("").to_string())),
            "help" => Ok(MetaAction::Help),
            "quit" | "q" | "exit" => Ok(MetaAction::Quit),
            other => Err(MetaParseError::Unknown(other.to_string())),
        };
        Some(action)
    }
}

/// Reference shown by `:help`
pub const META_HELP: &[&str] = &[
    ":toggle          flip the running flag",
    ":pause / :resume freeze or resume the live log feed",
    ":clear-logs      empty the log stream",
    ":dashboard       telemetry summary",
    ":logs [TYPE]     log panel (all, critical, alert, action, system)",
    ":wait MS         sleep before the next line",
    ":quit            leave the console",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crypton_core::LogType;

    #[test]
    fn test_plain_commands_are_not_meta() {
        assert_eq!(MetaAction::parse("system start"), None);
        assert_eq!(MetaAction::parse(""), None);
    }

    #[test]
    fn test_meta_actions() {
        assert_eq!(MetaAction::parse(":toggle"), Some(Ok(MetaAction::Toggle)));
        assert_eq!(MetaAction::parse("  :PAUSE "), Some(Ok(MetaAction::Pause)));
        assert_eq!(MetaAction::parse(":clear-logs"), Some(Ok(MetaAction::ClearLogs)));
        assert_eq!(MetaAction::parse(":q"), Some(Ok(MetaAction::Quit)));
        assert_eq!(MetaAction::parse(":wait 250"), Some(Ok(MetaAction::Wait(250))));
    }

    #[test]
    fn test_logs_tab() {
        assert_eq!(
            MetaAction::parse(":logs"),
            Some(Ok(MetaAction::Logs(LogFilter::All)))
        );
        assert_eq!(
            MetaAction::parse(":logs critical"),
            Some(Ok(MetaAction::Logs(LogFilter::Only(LogType::Critical))))
        );
        assert_eq!(
            MetaAction::parse(":logs noise"),
            Some(Err(MetaParseError::BadArgument("noise".to_string())))
        );
    }

    #[test]
    fn test_unknown_meta() {
        assert_eq!(
            MetaAction::parse(":launch"),
            Some(Err(MetaParseError::Unknown("launch".to_string())))
        );
        assert!(matches!(
            MetaAction::parse(":wait soon"),
            Some(Err(MetaParseError::BadArgument(_)))
        ));
    }

    #[test]
    fn test_parse_error_messages() {
        assert_eq!(
            MetaParseError::Unknown("launch".to_string()).to_string(),
            "unknown meta action :launch"
        );
        assert_eq!(
            MetaParseError::BadArgument("soon".to_string()).to_string(),
            "bad argument: soon"
        );
    }
}
