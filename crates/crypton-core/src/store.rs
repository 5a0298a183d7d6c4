//! State Store
//!
//! The single process-wide mutable container of session state. All writers
//! (the command interpreter, the synthetic event generator, direct UI
//! actions) go through [`Store::dispatch`]; all display surfaces observe it
//! through [`Store::subscribe`].
//!
//! Each mutation is applied and then every current subscriber is notified,
//! all under one lock, before `dispatch` returns. Observers therefore never
//! see a partially applied mutation, never see a state older than the one
//! just written, and never miss a notification. Subscribers run while that
//! lock is held and must not call back into the store synchronously; spawn
//! the work instead.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

use crate::config::StoreConfig;
use crate::logs::LogEntry;
use crate::state::{clamp_threat, SystemState};

// ----------------------------------------------------------------------------
// Mutations
// ----------------------------------------------------------------------------

/// Every way the session state can change
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Flip `is_running`; nothing else changes
    ToggleRunning,
    /// Set the threat score, clamped into `[0, 100]`
    SetThreatLevel(f64),
    /// Increment the attack counter by one
    AddAttack,
    /// Prepend an entry to the log stream
    AddLog(LogEntry),
    /// Empty the log stream
    ClearLogs,
    PauseLogs,
    ResumeLogs,
    /// Append a line to the terminal buffer
    AppendTerminalLine(String),
    /// Empty the terminal buffer
    ClearTerminal,
    /// Set notifier connectivity and last message together
    SetTelegramStatus { connected: bool, message: String },
}

impl Mutation {
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::ToggleRunning => "toggle_running",
            Mutation::SetThreatLevel(_) => "set_threat_level",
            Mutation::AddAttack => "add_attack",
            Mutation::AddLog(_) => "add_log",
            Mutation::ClearLogs => "clear_logs",
            Mutation::PauseLogs => "pause_logs",
            Mutation::ResumeLogs => "resume_logs",
            Mutation::AppendTerminalLine(_) => "append_terminal_line",
            Mutation::ClearTerminal => "clear_terminal",
            Mutation::SetTelegramStatus { .. } => "set_telegram_status",
        }
    }

    fn apply(&self, state: &mut SystemState) {
        match self {
            Mutation::ToggleRunning => state.is_running = !state.is_running,
            Mutation::SetThreatLevel(value) => state.threat_level = clamp_threat(*value),
            Mutation::AddAttack => state.total_attacks = state.total_attacks.saturating_add(1),
            Mutation::AddLog(entry) => state.logs.prepend(entry.clone()),
            Mutation::ClearLogs => state.logs.clear(),
            Mutation::PauseLogs => state.pause_logs = true,
            Mutation::ResumeLogs => state.pause_logs = false,
            Mutation::AppendTerminalLine(line) => state.terminal_history.append(line.clone()),
            Mutation::ClearTerminal => state.terminal_history.clear(),
            Mutation::SetTelegramStatus { connected, message } => {
                state.telegram_status = *connected;
                state.telegram_last_message = message.clone();
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Subscriptions
// ----------------------------------------------------------------------------

/// Handle returned by [`Store::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Subscriber = Arc<dyn Fn(&SystemState, &Mutation) + Send + Sync>;

struct StoreInner {
    state: SystemState,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
    revision: u64,
}

impl StoreInner {
    fn apply(&mut self, mutation: &Mutation) {
        mutation.apply(&mut self.state);
        self.revision += 1;
        debug!(
            mutation = mutation.name(),
            revision = self.revision,
            "Store mutation applied"
        );

        for (_, subscriber) in &self.subscribers {
            subscriber(&self.state, mutation);
        }
    }
}

// ----------------------------------------------------------------------------
// Store
// ----------------------------------------------------------------------------

/// Shared handle to the session state; clones observe the same state
#[derive(Clone)]
pub struct Store {
    inner: Arc<Mutex<StoreInner>>,
}

impl Store {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                state: SystemState::new(config),
                subscribers: Vec::new(),
                next_subscription: 0,
                revision: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(|poisoned: PoisonError<_>| {
            warn!("Store lock poisoned by a panicking subscriber; recovering");
            poisoned.into_inner()
        })
    }

    /// Apply one mutation and notify every subscriber before returning
    pub fn dispatch(&self, mutation: Mutation) {
        self.lock().apply(&mutation);
    }

    /// Apply a batch atomically, but only if `predicate` holds for the
    /// current state. Each applied mutation notifies subscribers on its own.
    pub fn dispatch_if<P, I>(&self, predicate: P, mutations: I) -> bool
    where
        P: FnOnce(&SystemState) -> bool,
        I: IntoIterator<Item = Mutation>,
    {
        let mut inner = self.lock();
        if !predicate(&inner.state) {
            return false;
        }
        for mutation in mutations {
            inner.apply(&mutation);
        }
        true
    }

    /// Register an observer called after every mutation with the new state
    pub fn subscribe<F>(&self, subscriber: F) -> SubscriptionId
    where
        F: Fn(&SystemState, &Mutation) + Send + Sync + 'static,
    {
        let mut inner = self.lock();
        let id = SubscriptionId(inner.next_subscription);
        inner.next_subscription += 1;
        inner.subscribers.push((id, Arc::new(subscriber)));
        debug!(subscription = id.0, "Store subscriber added");
        id
    }

    /// Remove an observer; returns false if it was not registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.lock();
        let before = inner.subscribers.len();
        inner.subscribers.retain(|(sub_id, _)| *sub_id != id);
        inner.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    /// Owned copy of the current state
    pub fn snapshot(&self) -> SystemState {
        self.lock().state.clone()
    }

    /// Read the current state in place without cloning it
    pub fn read<R>(&self, f: impl FnOnce(&SystemState) -> R) -> R {
        f(&self.lock().state)
    }

    /// Number of mutations applied since construction
    pub fn revision(&self) -> u64 {
        self.lock().revision
    }

    pub fn is_running(&self) -> bool {
        self.read(|s| s.is_running)
    }

    pub fn threat_level(&self) -> f64 {
        self.read(|s| s.threat_level)
    }

    pub fn total_attacks(&self) -> u64 {
        self.read(|s| s.total_attacks)
    }

    pub fn log_count(&self) -> usize {
        self.read(|s| s.logs.len())
    }

    pub fn terminal_lines(&self) -> Vec<String> {
        self.read(|s| s.terminal_history.lines().to_vec())
    }

    // ------------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------------

    pub fn toggle_running(&self) {
        self.dispatch(Mutation::ToggleRunning);
    }

    /// Drive `is_running` to `running`, toggling only if it differs
    pub fn set_running(&self, running: bool) -> bool {
        self.dispatch_if(|s| s.is_running != running, [Mutation::ToggleRunning])
    }

    pub fn set_threat_level(&self, value: f64) {
        self.dispatch(Mutation::SetThreatLevel(value));
    }

    pub fn add_attack(&self) {
        self.dispatch(Mutation::AddAttack);
    }

    pub fn add_log(&self, entry: LogEntry) {
        self.dispatch(Mutation::AddLog(entry));
    }

    pub fn clear_logs(&self) {
        self.dispatch(Mutation::ClearLogs);
    }

    pub fn pause_logs(&self) {
        self.dispatch(Mutation::PauseLogs);
    }

    pub fn resume_logs(&self) {
        self.dispatch(Mutation::ResumeLogs);
    }

    pub fn append_terminal_line(&self, line: impl Into<String>) {
        self.dispatch(Mutation::AppendTerminalLine(line.into()));
    }

    pub fn clear_terminal(&self) {
        self.dispatch(Mutation::ClearTerminal);
    }

    pub fn set_telegram_status(&self, connected: bool, message: impl Into<String>) {
        self.dispatch(Mutation::SetTelegramStatus {
            connected,
            message: message.into(),
        });
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(&StoreConfig::default())
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("Store")
            .field("state", &inner.state)
            .field("subscribers", &inner.subscribers.len())
            .field("revision", &inner.revision)
            .finish()
    }
}
