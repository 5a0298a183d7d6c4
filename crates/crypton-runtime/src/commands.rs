//! Terminal command vocabulary
//!
//! Parsing is pure: [`Command::parse`] maps any raw input line to exactly one
//! [`Command`] and never fails. Execution lives in the interpreter.

use std::fmt;

const LOGS_TAIL: &str = "logs --tail";
const SIMULATE_ATTACK: &str = "simulate attack";

/// Attack type used when `simulate attack` is given no argument
pub const DEFAULT_ATTACK_TYPE: &str = "generic";

/// Trim and case-fold a raw input line
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Non-negative decimal count; all-digit values too large for `usize` saturate
fn parse_count(token: &str) -> Option<usize> {
    token.parse::<usize>().ok().or_else(|| {
        token
            .bytes()
            .all(|b| b.is_ascii_digit())
            .then_some(usize::MAX)
    })
}

/// A recognized terminal command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Blank submission
    Empty,
    SystemStart,
    SystemStop,
    Status,
    /// `logs --tail [N]`; `None` when the count is absent or unparsable.
    /// Counts past `usize::MAX` saturate.
    LogsTail { count: Option<usize> },
    Clear,
    TelegramStatus,
    SimulateAttack { attack_type: String },
    Help,
    /// Anything else, carrying the normalised input
    Unknown(String),
}

impl Command {
    /// Parse a raw input line. Input is trimmed and lower-cased first.
    pub fn parse(raw: &str) -> Self {
        let text = normalize(raw);

        match text.as_str() {
            "" => return Command::Empty,
            "system start" => return Command::SystemStart,
            "system stop" => return Command::SystemStop,
            "status" => return Command::Status,
            "clear" => return Command::Clear,
            "telegram status" => return Command::TelegramStatus,
            "help" => return Command::Help,
            _ => {}
        }

        if text.starts_with(LOGS_TAIL) {
            let count = text
                .split_whitespace()
                .nth(2)
                .and_then(parse_count);
            return Command::LogsTail { count };
        }

        if text.starts_with(SIMULATE_ATTACK) {
            let rest: Vec<&str> = text.split_whitespace().skip(2).collect();
            let attack_type = if rest.is_empty() {
                DEFAULT_ATTACK_TYPE.to_string()
            } else {
                rest.join(" ")
            };
            return Command::SimulateAttack { attack_type };
        }

        Command::Unknown(text)
    }

    /// Whether the normalised input is echoed before the command's output
    pub fn echoes(&self) -> bool {
        matches!(
            self,
            Command::SystemStart
                | Command::SystemStop
                | Command::Status
                | Command::TelegramStatus
                | Command::SimulateAttack { .. }
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Empty => "empty",
            Command::SystemStart => "system_start",
            Command::SystemStop => "system_stop",
            Command::Status => "status",
            Command::LogsTail { .. } => "logs_tail",
            Command::Clear => "clear",
            Command::TelegramStatus => "telegram_status",
            Command::SimulateAttack { .. } => "simulate_attack",
            Command::Help => "help",
            Command::Unknown(_) => "unknown",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::LogsTail { count: Some(n) } => write!(f, "{} {}", LOGS_TAIL, n),
            Command::LogsTail { count: None } => f.write_str(LOGS_TAIL),
            Command::SimulateAttack { attack_type } => {
                write!(f, "{} {}", SIMULATE_ATTACK, attack_type)
            }
            Command::Unknown(text) => f.write_str(text),
            other => f.write_str(&other.name().replace('_', " ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_commands_are_case_insensitive() {
        assert_eq!(Command::parse("  SYSTEM Start "), Command::SystemStart);
        assert_eq!(Command::parse("system stop"), Command::SystemStop);
        assert_eq!(Command::parse("Status"), Command::Status);
        assert_eq!(Command::parse("CLEAR"), Command::Clear);
        assert_eq!(Command::parse("telegram status"), Command::TelegramStatus);
        assert_eq!(Command::parse("help"), Command::Help);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(Command::parse(""), Command::Empty);
        assert_eq!(Command::parse("   \t"), Command::Empty);
    }

    #[test]
    fn test_logs_tail_count() {
        assert_eq!(
            Command::parse("logs --tail 2"),
            Command::LogsTail { count: Some(2) }
        );
        assert_eq!(Command::parse("logs --tail"), Command::LogsTail { count: None });
        assert_eq!(
            Command::parse("logs --tail many"),
            Command::LogsTail { count: None }
        );
        assert_eq!(
            Command::parse("logs --tail -3"),
            Command::LogsTail { count: None }
        );
    }

    #[test]
    fn test_logs_tail_oversized_count_saturates() {
        assert_eq!(
            Command::parse("logs --tail 999999999999999999999999"),
            Command::LogsTail {
                count: Some(usize::MAX)
            }
        );
        assert_eq!(
            Command::parse("logs --tail 99999999999999999999x"),
            Command::LogsTail { count: None }
        );
    }

    #[test]
    fn test_simulate_attack_type() {
        assert_eq!(
            Command::parse("simulate attack DDoS"),
            Command::SimulateAttack {
                attack_type: "ddos".to_string()
            }
        );
        assert_eq!(
            Command::parse("simulate attack sql   injection"),
            Command::SimulateAttack {
                attack_type: "sql injection".to_string()
            }
        );
        assert_eq!(
            Command::parse("simulate attack"),
            Command::SimulateAttack {
                attack_type: DEFAULT_ATTACK_TYPE.to_string()
            }
        );
    }

    #[test]
    fn test_exact_commands_do_not_prefix_match() {
        assert_eq!(
            Command::parse("status now"),
            Command::Unknown("status now".to_string())
        );
        assert_eq!(
            Command::parse("Bogus"),
            Command::Unknown("bogus".to_string())
        );
    }

    #[test]
    fn test_echo_policy() {
        assert!(Command::SystemStart.echoes());
        assert!(Command::Status.echoes());
        assert!(!Command::Help.echoes());
        assert!(!Command::Clear.echoes());
        assert!(!Command::LogsTail { count: None }.echoes());
        assert!(!Command::Unknown("x".into()).echoes());
    }

    #[test]
    fn test_display() {
        assert_eq!(Command::SystemStart.to_string(), "system start");
        assert_eq!(Command::LogsTail { count: Some(3) }.to_string(), "logs --tail 3");
        assert_eq!(
            Command::parse("simulate attack").to_string(),
            "simulate attack generic"
        );
    }
}
