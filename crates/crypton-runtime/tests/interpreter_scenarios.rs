//! End-to-end interpreter scenarios on tokio's paused clock
//!
//! Staged delays elapse deterministically: the runtime advances virtual time
//! to the next timer whenever every task is idle.

use crypton_core::{ConsoleConfig, LogEntry, LogType, SystemState};
use crypton_runtime::Console;
use tokio::time::{sleep, Duration};

fn console() -> Console {
    Console::new(ConsoleConfig::default().with_seed(42)).unwrap()
}

fn seed_logs(console: &Console, n: usize) {
    for i in 0..n {
        console.store().add_log(LogEntry::with_timestamp(
            format!("10:00:0{}", i),
            LogType::Action,
            "IP Blocked",
            format!("Blocked malicious IP: 10.0.0.{}", i),
        ));
    }
}

#[tokio::test(start_paused = true)]
async fn status_on_fresh_store() {
    let console = console();
    console.interpret("status");

    let lines = console.store().terminal_lines();
    assert_eq!(lines.len(), 10);
    assert_eq!(lines[0], "status");

    let block = lines[1..].join("\n");
    assert!(block.contains("STOPPED"));
    assert!(block.contains("0 stored"));
    assert!(block.contains("0%"));
    assert!(block.contains("4/4 Online"));
}

#[tokio::test(start_paused = true)]
async fn status_reflects_state_at_invocation() {
    let console = console();
    seed_logs(&console, 3);
    console.store().set_threat_level(66.6);
    console.store().toggle_running();

    console.interpret("STATUS");
    let block = console.store().terminal_lines().join("\n");
    assert!(block.contains("✓ RUNNING"));
    assert!(block.contains("3 stored"));
    assert!(block.contains("67%"));
}

#[tokio::test(start_paused = true)]
async fn logs_tail_two_of_five() {
    let console = console();
    seed_logs(&console, 5);
    let state = console.store().snapshot();

    console.interpret("logs --tail 2");
    let lines = console.store().terminal_lines();

    assert_eq!(lines[0], "[LOG] ▼ Last 2 events:");
    let entries = &lines[1..];
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0], state.logs.get(0).unwrap().format_line());
    assert_eq!(entries[1], state.logs.get(1).unwrap().format_line());
    assert!(entries[0].contains("10.0.0.4"));
    assert!(entries[0].starts_with("✓ [10:00:04] ACTION | IP Blocked |"));
}

#[tokio::test(start_paused = true)]
async fn logs_tail_defaults() {
    let console = console();
    seed_logs(&console, 7);

    console.interpret("logs --tail lots");
    let lines = console.store().terminal_lines();
    assert_eq!(lines[0], "[LOG] ▼ Last 5 events:");
    assert_eq!(lines.len(), 6);

    console.interpret("clear");
    console.interpret("logs --tail 50");
    assert_eq!(console.store().terminal_lines().len(), 8);
}

#[tokio::test(start_paused = true)]
async fn logs_tail_oversized_count_lists_everything() {
    let console = console();
    seed_logs(&console, 7);

    console.interpret("logs --tail 999999999999999999999999");
    let lines = console.store().terminal_lines();
    assert_eq!(lines[0], "[LOG] ▼ Last 7 events:");
    assert_eq!(lines.len(), 8);
    assert!(lines[7].contains("10.0.0.0"));
}

#[tokio::test(start_paused = true)]
async fn logs_tail_on_empty_stream() {
    let console = console();
    console.interpret("logs --tail 3");
    assert_eq!(
        console.store().terminal_lines(),
        vec!["[LOG] ▼ Last 0 events:", "[LOG] No logs available"]
    );
}

#[tokio::test(start_paused = true)]
async fn simulate_attack_ddos() {
    let console = console();
    console.interpret("simulate attack ddos");

    assert_eq!(
        console.store().terminal_lines(),
        vec!["simulate attack ddos", "[SIM] ⚡ Simulating DDOS attack..."]
    );
    assert_eq!(console.store().total_attacks(), 0);

    sleep(Duration::from_millis(1100)).await;

    let state = console.store().snapshot();
    assert_eq!(state.total_attacks, 1);
    assert_eq!(state.logs.len(), 1);
    let entry = state.logs.latest().unwrap();
    assert_eq!(entry.log_type, LogType::Critical);
    assert_eq!(entry.category, "Ddos");
    assert_eq!(entry.message, "Simulated ddos attack detected and blocked");
    assert!((40.0..100.0).contains(&state.threat_level));

    let lines = state.terminal_history.lines();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[2], "[DETECT] 🔍 Anomaly detected: 3.2σ deviation from baseline");
    assert!(lines[3].starts_with("[CLASSIFY] 🎯 Threat: DDOS ("));
    assert!(lines[3].ends_with("% confidence)"));
    assert_eq!(lines[4], "[ACTION] 🚫 Blocking source IP: 192.168.1.105");
    assert_eq!(lines[5], "[TG] 📱 Alert sent to Telegram");
}

#[tokio::test(start_paused = true)]
async fn simulate_attack_defaults_to_generic() {
    let console = console();
    console.interpret("simulate attack");
    console.settle().await;

    let state = console.store().snapshot();
    assert_eq!(state.terminal_history.lines()[1], "[SIM] ⚡ Simulating GENERIC attack...");
    assert_eq!(state.logs.latest().unwrap().category, "Generic");
}

#[tokio::test(start_paused = true)]
async fn unknown_command_touches_only_terminal() {
    let console = console();
    let before = console.store().snapshot();

    console.interpret("bogus");
    sleep(Duration::from_secs(10)).await;

    let after = console.store().snapshot();
    assert_eq!(
        after.terminal_history.lines(),
        [
            "[ERR] ✗ Unknown command: bogus".to_string(),
            "[HINT] Type \"help\" for available commands".to_string(),
        ]
    );
    assert_eq!(
        SystemState {
            terminal_history: before.terminal_history.clone(),
            ..after
        },
        before
    );
}

#[tokio::test(start_paused = true)]
async fn start_then_clear_keeps_later_lines() {
    let console = console();
    console.interpret("system start");
    console.interpret("clear");
    assert!(console.store().terminal_lines().is_empty());

    console.settle().await;
    assert_eq!(
        console.store().terminal_lines(),
        vec![
            "[SYS] >> Initializing CRYPTON engine...",
            "[AI] ✓ Model loaded (v1.3 - LSTM)",
            "[NET] 📡 Sensors online (4/4)",
            "[AI] ✓ Threat model: READY",
            "[OK] ★ SYSTEM OPERATIONAL ★",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn system_start_immediate_effects() {
    let console = console();
    console.interpret("system start");

    let state = console.store().snapshot();
    assert_eq!(state.terminal_history.lines(), ["system start".to_string()]);
    assert!(state.is_running);
    assert!(state.telegram_status);
    assert_eq!(state.telegram_last_message, "🟢 System Online");
    let entry = state.logs.latest().unwrap();
    assert_eq!(entry.log_type, LogType::System);
    assert_eq!(entry.category, "Startup");

    sleep(Duration::from_millis(150)).await;
    assert_eq!(console.store().terminal_lines().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn stop_does_not_cancel_startup_narrative() {
    let console = console();
    console.interpret("system start");
    sleep(Duration::from_millis(350)).await;
    console.interpret("system stop");
    console.settle().await;

    let state = console.store().snapshot();
    assert!(!state.is_running);
    assert!(!state.telegram_status);
    assert_eq!(state.telegram_last_message, "🔴 System Offline");
    assert_eq!(
        state.terminal_history.lines(),
        [
            "system start",
            "[SYS] >> Initializing CRYPTON engine...",
            "[AI] ✓ Model loaded (v1.3 - LSTM)",
            "system stop",
            "[SYS] >> Shutting down system...",
            "[NET] Sensors offline",
            "[NET] 📡 Sensors online (4/4)",
            "[AI] Models unloaded",
            "[AI] ✓ Threat model: READY",
            "[OK] System stopped",
            "[OK] ★ SYSTEM OPERATIONAL ★",
        ]
        .map(String::from)
    );
}

#[tokio::test(start_paused = true)]
async fn overlapping_sequences_interleave_by_timer() {
    let console = console();
    console.interpret("simulate attack ddos");
    sleep(Duration::from_millis(500)).await;
    console.interpret("system start");
    console.settle().await;

    let lines = console.store().terminal_lines();
    let tags: Vec<&str> = lines
        .iter()
        .map(|l| l.split_whitespace().next().unwrap_or(""))
        .collect();
    assert_eq!(
        tags,
        vec![
            "simulate", "[SIM]", "system", "[SYS]", "[AI]", "[DETECT]", "[CLASSIFY]",
            "[ACTION]", "[TG]", "[NET]", "[AI]", "[OK]",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn telegram_status_follows_lifecycle() {
    let console = console();
    console.interpret("telegram status");
    assert_eq!(
        console.store().terminal_lines(),
        vec![
            "telegram status",
            "[TG] Bot Status: ✗ DISCONNECTED",
            "[TG] Last: Waiting for system start",
        ]
    );

    console.interpret("system start");
    console.interpret("clear");
    console.interpret("telegram status");
    assert_eq!(
        console.store().terminal_lines(),
        vec![
            "telegram status",
            "[TG] Bot Status: ✓ CONNECTED",
            "[TG] Last: 🟢 System Online",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn help_and_empty_input() {
    let console = console();
    console.interpret("help");
    let lines = console.store().terminal_lines();
    assert_eq!(lines.len(), 12);
    assert!(lines[0].starts_with('╔'));
    assert!(lines[11].starts_with('╚'));

    console.interpret("clear");
    console.interpret("");
    assert_eq!(console.store().terminal_lines(), vec!["crypton-ids> "]);
}
