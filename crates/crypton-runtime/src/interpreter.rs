//! Command Interpreter
//!
//! Maps one line of terminal input to its side effects on the [`Store`].
//! Output due at time zero is written before `interpret` returns; delayed
//! narrative lines are handed to the [`Scheduler`] as one staged sequence per
//! invocation and run to completion even if the system is stopped meanwhile.

use tokio::time::Duration;
use tracing::debug;

use crypton_core::{
    ConsoleResult, InterpreterConfig, LogEntry, LogType, Store, SystemState, MAX_SENSORS,
};

use crate::commands::{normalize, Command};
use crate::random::{shared_random, with_random, SharedRandom};
use crate::scheduler::{SequenceId, Scheduler, Stage};

/// Source address reported by simulated attacks
pub const SIMULATED_SOURCE_IP: &str = "192.168.1.105";

const BOX_WIDTH: usize = 36;

const STARTUP_SEQUENCE: &[(u64, &str)] = &[
    (100, "[SYS] >> Initializing CRYPTON engine..."),
    (300, "[AI] ✓ Model loaded (v1.3 - LSTM)"),
    (600, "[NET] 📡 Sensors online (4/4)"),
    (800, "[AI] ✓ Threat model: READY"),
    (1000, "[OK] ★ SYSTEM OPERATIONAL ★"),
];

const SHUTDOWN_SEQUENCE: &[(u64, &str)] = &[
    (200, "[NET] Sensors offline"),
    (400, "[AI] Models unloaded"),
    (600, "[OK] System stopped"),
];

const ATTACK_REPORT_DELAY: Duration = Duration::from_millis(1000);

const HELP_ENTRIES: &[&str] = &[
    "system start   - Start IDS engine",
    "system stop    - Stop IDS engine",
    "status         - Show system stats",
    "logs --tail N  - Show last N logs",
    "telegram status- Check Telegram",
    "simulate attack- Test detection",
    "clear          - Clear terminal",
    "help           - Show this help",
];

/// Interprets terminal input against a shared store
pub struct CommandInterpreter {
    store: Store,
    scheduler: Scheduler,
    random: SharedRandom,
    config: InterpreterConfig,
}

impl CommandInterpreter {
    /// Create an interpreter on the current tokio runtime
    pub fn new(store: Store, config: InterpreterConfig) -> ConsoleResult<Self> {
        config.validate()?;
        let scheduler = Scheduler::new(store.clone())?;
        let random = shared_random(config.seed);
        Ok(Self::with_parts(store, scheduler, random, config))
    }

    pub fn with_parts(
        store: Store,
        scheduler: Scheduler,
        random: SharedRandom,
        config: InterpreterConfig,
    ) -> Self {
        Self {
            store,
            scheduler,
            random,
            config,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Interpret one line of input. Never fails; every outcome is visible as
    /// terminal lines and store mutations.
    pub fn interpret(&self, raw: &str) {
        let text = normalize(raw);
        let command = Command::parse(&text);
        debug!(command = command.name(), input = %text, "Interpreting command");

        if command.echoes() {
            self.store.append_terminal_line(text.as_str());
        }

        match command {
            Command::Empty => self.store.append_terminal_line(self.config.prompt.as_str()),
            Command::SystemStart => self.system_start(),
            Command::SystemStop => self.system_stop(),
            Command::Status => {
                for line in self.store.read(status_block) {
                    self.store.append_terminal_line(line);
                }
            }
            Command::LogsTail { count } => self.logs_tail(count.unwrap_or(self.config.default_tail)),
            Command::Clear => self.store.clear_terminal(),
            Command::TelegramStatus => {
                let (connected, last) = self
                    .store
                    .read(|s| (s.telegram_status, s.telegram_last_message.clone()));
                let status = if connected { "✓ CONNECTED" } else { "✗ DISCONNECTED" };
                self.store.append_terminal_line(format!("[TG] Bot Status: {}", status));
                self.store.append_terminal_line(format!("[TG] Last: {}", last));
            }
            Command::SimulateAttack { attack_type } => self.simulate_attack(attack_type),
            Command::Help => {
                for line in help_block() {
                    self.store.append_terminal_line(line);
                }
            }
            Command::Unknown(text) => {
                self.store
                    .append_terminal_line(format!("[ERR] ✗ Unknown command: {}", text));
                self.store
                    .append_terminal_line("[HINT] Type \"help\" for available commands");
            }
        }
    }

    fn system_start(&self) {
        self.schedule_lines(STARTUP_SEQUENCE);
        self.store.add_log(LogEntry::new(
            LogType::System,
            "Startup",
            "Intrusion detection engine started",
        ));
        self.store.set_telegram_status(true, "🟢 System Online");
        self.store.set_running(true);
    }

    fn system_stop(&self) {
        self.store
            .append_terminal_line("[SYS] >> Shutting down system...");
        self.schedule_lines(SHUTDOWN_SEQUENCE);
        self.store.add_log(LogEntry::new(
            LogType::System,
            "Shutdown",
            "Intrusion detection engine stopped",
        ));
        self.store.set_telegram_status(false, "🔴 System Offline");
        self.store.set_running(false);
    }

    fn logs_tail(&self, count: usize) {
        let lines: Vec<String> = self
            .store
            .read(|s| s.logs.tail(count).map(LogEntry::format_line).collect());

        self.store
            .append_terminal_line(format!("[LOG] ▼ Last {} events:", lines.len()));
        if lines.is_empty() {
            self.store.append_terminal_line("[LOG] No logs available");
        }
        for line in lines {
            self.store.append_terminal_line(line);
        }
    }

    fn simulate_attack(&self, attack_type: String) {
        let label = attack_type.to_uppercase();
        self.store
            .append_terminal_line(format!("[SIM] ⚡ Simulating {} attack...", label));

        let random = self.random.clone();
        let report = Stage::new(ATTACK_REPORT_DELAY, move |store: &Store| {
            let (confidence, threat) = with_random(&random, |r| {
                (r.gen_range_u32(60, 100), r.gen_range_f64(40.0, 100.0))
            });

            store.append_terminal_line("[DETECT] 🔍 Anomaly detected: 3.2σ deviation from baseline");
            store.append_terminal_line(format!(
                "[CLASSIFY] 🎯 Threat: {} ({}% confidence)",
                label, confidence
            ));
            store.append_terminal_line(format!(
                "[ACTION] 🚫 Blocking source IP: {}",
                SIMULATED_SOURCE_IP
            ));
            store.append_terminal_line("[TG] 📱 Alert sent to Telegram");

            store.add_log(LogEntry::new(
                LogType::Critical,
                capitalize(&attack_type),
                format!("Simulated {} attack detected and blocked", attack_type),
            ));
            store.add_attack();
            store.set_threat_level(threat);
        });
        self.scheduler.schedule(vec![report]);
    }

    fn schedule_lines(&self, sequence: &[(u64, &str)]) -> Option<SequenceId> {
        let stages = sequence
            .iter()
            .map(|(delay, line)| Stage::line(Duration::from_millis(*delay), *line))
            .collect();
        self.scheduler.schedule(stages)
    }
}

/// Upper-case the first character, leaving the rest untouched
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn border(left: char, right: char) -> String {
    format!("{}{}{}", left, "═".repeat(BOX_WIDTH), right)
}

fn boxed_title(title: &str) -> String {
    format!("║  {:<34}║", title)
}

fn boxed_row(text: &str) -> String {
    format!("║ {:<35}║", text)
}

/// Boxed status report for the given state
pub fn status_block(state: &SystemState) -> Vec<String> {
    let system = if state.is_running { "✓ RUNNING" } else { "✗ STOPPED" };
    vec![
        border('╔', '╗'),
        boxed_title("CRYPTON IDS - SYSTEM STATUS"),
        border('╠', '╣'),
        boxed_row(&format!("System: {}", system)),
        boxed_row(&format!(
            "Sensors: {}/{} Online",
            state.sensors_online, MAX_SENSORS
        )),
        boxed_row("Model: v1.3 LSTM (Ready)"),
        boxed_row(&format!("Logs: {} stored", state.logs.len())),
        boxed_row(&format!("Threat Level: {}%", state.threat_percent())),
        border('╚', '╝'),
    ]
}

/// Boxed command reference
pub fn help_block() -> Vec<String> {
    let mut lines = vec![
        border('╔', '╗'),
        boxed_title("CRYPTON IDS - COMMAND REFERENCE"),
        border('╠', '╣'),
    ];
    lines.extend(HELP_ENTRIES.iter().map(|entry| boxed_row(entry)));
    lines.push(border('╚', '╝'));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crypton_core::StoreConfig;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("ddos"), "Ddos");
        assert_eq!(capitalize("sql injection"), "Sql injection");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_status_block_shape() {
        let state = SystemState::new(&StoreConfig::default());
        let block = status_block(&state);

        assert_eq!(block.len(), 9);
        assert!(block[3].contains("✗ STOPPED"));
        assert!(block[4].contains("4/4 Online"));
        assert!(block[6].contains("0 stored"));
        assert!(block[7].contains("0%"));
        for line in &block {
            assert_eq!(line.chars().count(), BOX_WIDTH + 2, "{}", line);
        }
    }

    #[test]
    fn test_help_block_shape() {
        let block = help_block();
        assert_eq!(block.len(), 12);
        assert!(block[1].contains("COMMAND REFERENCE"));
        assert!(block.iter().any(|l| l.contains("logs --tail N")));
    }

    #[tokio::test]
    async fn test_empty_input_echoes_prompt() {
        let store = Store::default();
        let interpreter =
            CommandInterpreter::new(store.clone(), InterpreterConfig::default()).unwrap();

        interpreter.interpret("   ");
        assert_eq!(store.terminal_lines(), vec!["crypton-ids> "]);
    }

    #[tokio::test]
    async fn test_clear_only_touches_terminal() {
        let store = Store::default();
        let interpreter =
            CommandInterpreter::new(store.clone(), InterpreterConfig::default()).unwrap();
        store.add_log(LogEntry::new(LogType::Alert, "Anomaly", "x"));
        store.append_terminal_line("old");

        interpreter.interpret("clear");
        assert!(store.terminal_lines().is_empty());
        assert_eq!(store.log_count(), 1);
    }
}
