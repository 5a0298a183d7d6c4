//! Command handlers for the Crypton CLI

use std::path::Path;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crypton_core::{LogEntry, LogFilter, Mutation, SystemState, IDLE_BANNER};
use crypton_runtime::Console;

use crate::cli::{Cli, Commands};
use crate::config::{ConfigError, ConsoleAppConfig};
use crate::error::{CliError, Result};
use crate::meta::{MetaAction, META_HELP};
use crate::render::Renderer;

// ----------------------------------------------------------------------------
// Store Output Forwarding
// ----------------------------------------------------------------------------

/// What the interactive console prints in response to a store mutation
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleOutput {
    Line(String),
    /// Terminal buffer was emptied
    Cleared,
    /// New log entry for the live feed
    Log(LogEntry),
}

impl ConsoleOutput {
    /// Map a mutation to printable output. Log entries are forwarded only when
    /// a feed filter is set, it matches, and the feed is not paused.
    pub fn from_mutation(
        state: &SystemState,
        mutation: &Mutation,
        feed: Option<LogFilter>,
    ) -> Option<Self> {
        match mutation {
            Mutation::AppendTerminalLine(line) => Some(ConsoleOutput::Line(line.clone())),
            Mutation::ClearTerminal => Some(ConsoleOutput::Cleared),
            Mutation::AddLog(entry) => {
                let filter = feed?;
                (!state.pause_logs && filter.matches(entry))
                    .then(|| ConsoleOutput::Log(entry.clone()))
            }
            _ => None,
        }
    }
}

// ----------------------------------------------------------------------------
// Session
// ----------------------------------------------------------------------------

/// Result of handling one input line
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LineOutcome {
    /// Lines printed directly, outside the terminal buffer
    pub output: Vec<String>,
    pub quit: bool,
}

/// A console plus the presentation needed to drive it from text input
pub struct Session {
    console: Console,
    renderer: Renderer,
}

impl Session {
    pub fn new(config: &ConsoleAppConfig, renderer: Renderer) -> Result<Self> {
        let console = Console::new(config.console_config())?;
        Ok(Self { console, renderer })
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    /// Route a line to a meta action or the command interpreter
    pub async fn handle_line(&self, line: &str) -> LineOutcome {
        let action = match MetaAction::parse(line) {
            None => {
                self.console.interpret(line);
                return LineOutcome::default();
            }
            Some(Ok(action)) => action,
            Some(Err(e)) => {
                return LineOutcome {
                    output: vec![format!("{} (try :help)", e)],
                    quit: false,
                }
            }
        };

        let store = self.console.store();
        let mut outcome = LineOutcome::default();
        match action {
            MetaAction::Toggle => store.toggle_running(),
            MetaAction::Pause => store.pause_logs(),
            MetaAction::Resume => store.resume_logs(),
            MetaAction::ClearLogs => store.clear_logs(),
            MetaAction::Dashboard => outcome.output = store.read(|s| self.renderer.dashboard(s)),
            MetaAction::Logs(filter) => {
                outcome.output = store.read(|s| self.renderer.log_panel(s, filter))
            }
            MetaAction::Wait(ms) => tokio::time::sleep(Duration::from_millis(ms)).await,
            MetaAction::Help => outcome.output = META_HELP.iter().map(|l| l.to_string()).collect(),
            MetaAction::Quit => outcome.quit = true,
        }
        outcome
    }

    pub fn shutdown(&self) {
        self.console.shutdown();
    }
}

// ----------------------------------------------------------------------------
// Replay
// ----------------------------------------------------------------------------

/// Outcome of a scripted session
#[derive(Debug, Clone)]
pub struct ReplayReport {
    pub state: SystemState,
    /// Output of meta actions, in script order
    pub meta_output: Vec<String>,
    pub lines_executed: usize,
    pub generator_ticks: u64,
}

impl ReplayReport {
    pub fn summary(&self) -> Vec<String> {
        vec![
            format!("Lines executed:   {}", self.lines_executed),
            format!("Terminal lines:   {}", self.state.terminal_history.len()),
            format!("Log entries:      {}", self.state.logs.len()),
            format!("Total attacks:    {}", self.state.total_attacks),
            format!("Threat level:     {}%", self.state.threat_percent()),
            format!("Generator ticks:  {}", self.generator_ticks),
        ]
    }
}

/// Lines of a replay script that are executed; blanks and `#` comments are skipped
pub fn script_lines(script: &str) -> impl Iterator<Item = &str> {
    script
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.trim_start().starts_with('#'))
}

/// Run a script to completion: every line, every staged sequence, then
/// `settle` more time for the generator.
pub async fn replay(
    config: &ConsoleAppConfig,
    script: &str,
    settle: Duration,
) -> Result<ReplayReport> {
    let session = Session::new(config, Renderer::new(false))?;
    let mut meta_output = Vec::new();
    let mut lines_executed = 0;

    for line in script_lines(script) {
        let outcome = session.handle_line(line).await;
        lines_executed += 1;
        meta_output.extend(outcome.output);
        if outcome.quit {
            break;
        }
    }

    session.console().settle().await;
    if !settle.is_zero() {
        tokio::time::sleep(settle).await;
        session.console().settle().await;
    }

    let report = ReplayReport {
        state: session.console().store().snapshot(),
        meta_output,
        lines_executed,
        generator_ticks: session.console().generator().ticks(),
    };
    session.shutdown();
    Ok(report)
}

// ----------------------------------------------------------------------------
// Dispatcher
// ----------------------------------------------------------------------------

/// Command dispatcher for handling CLI commands
pub struct CommandDispatcher;

impl CommandDispatcher {
    /// Execute a CLI command
    pub async fn execute(cli: &Cli, config: ConsoleAppConfig) -> Result<()> {
        match cli.command() {
            Commands::Console => Self::handle_console_command(config).await,
            Commands::Replay {
                script,
                settle_ms,
                json,
            } => Self::handle_replay_command(config, &script, settle_ms, json).await,
            Commands::Config { example } => Self::handle_config_command(&config, example),
        }
    }

    /// Interactive console on stdin/stdout
    async fn handle_console_command(config: ConsoleAppConfig) -> Result<()> {
        let renderer = Renderer::new(config.cli.colored_output);
        let session = Session::new(&config, renderer)?;
        let store = session.console().store().clone();

        let (output_tx, mut output_rx) = mpsc::unbounded_channel();
        let feed = config.cli.live_feed.then(|| config.cli.feed_filter());
        let subscription = store.subscribe(move |state, mutation| {
            if let Some(output) = ConsoleOutput::from_mutation(state, mutation, feed) {
                let _ = output_tx.send(output);
            }
        });

        info!("Starting interactive console");
        println!("{}", IDLE_BANNER);

        let mut input = BufReader::new(tokio::io::stdin()).lines();
        loop {
            tokio::select! {
                Some(output) = output_rx.recv() => match output {
                    ConsoleOutput::Line(line) => println!("{}", renderer.terminal_line(&line)),
                    ConsoleOutput::Cleared => println!("{}", IDLE_BANNER),
                    ConsoleOutput::Log(entry) => println!("{}", renderer.log_entry(&entry)),
                },
                line = input.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    let outcome = session.handle_line(&line).await;
                    for text in &outcome.output {
                        println!("{}", text);
                    }
                    if outcome.quit {
                        break;
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    warn!("Interrupted");
                    break;
                }
            }
        }

        store.unsubscribe(subscription);
        session.shutdown();
        info!("Console exited");
        Ok(())
    }

    /// Scripted session printed as terminal history plus summary, or JSON
    async fn handle_replay_command(
        config: ConsoleAppConfig,
        script: &Path,
        settle_ms: u64,
        json: bool,
    ) -> Result<()> {
        let text = std::fs::read_to_string(script).map_err(|e| {
            CliError::Script(format!("Failed to read {}: {}", script.display(), e))
        })?;
        info!("Replaying {}", script.display());

        let report = replay(&config, &text, Duration::from_millis(settle_ms)).await?;

        if json {
            println!("{}", serde_json::to_string_pretty(&report.state)?);
            return Ok(());
        }

        let renderer = Renderer::new(config.cli.colored_output);
        for line in report.state.terminal_history.lines() {
            println!("{}", renderer.terminal_line(line));
        }
        for line in &report.meta_output {
            println!("{}", line);
        }
        println!();
        for line in report.summary() {
            println!("{}", line);
        }
        Ok(())
    }

    /// Print the example or the effective configuration as TOML
    fn handle_config_command(config: &ConsoleAppConfig, example: bool) -> Result<()> {
        let text = if example {
            ConsoleAppConfig::example_config()?
        } else {
            toml::to_string_pretty(config)
                .map_err(|e| ConfigError::Serialization(e.to_string()))?
        };
        println!("{}", text);
        Ok(())
    }
}
