//! Synthetic Event Generator
//!
//! Manufactures plausible security events while the system is running. The
//! generator observes the [`Store`]: a `ToggleRunning` to true starts one
//! tick schedule, a toggle to false aborts exactly that schedule. Each tick
//! is written through [`Store::dispatch_if`] so a tick racing a stop is
//! discarded instead of landing after it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};

use crypton_core::{
    ConsoleError, ConsoleResult, GeneratorConfig, LogEntry, LogType, Mutation, Store,
    SubscriptionId,
};

use crate::random::{shared_random, with_random, RandomSource, SharedRandom};

// ----------------------------------------------------------------------------
// Events
// ----------------------------------------------------------------------------

/// One manufactured tick outcome
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticEvent {
    pub entry: LogEntry,
    /// New threat level; set only for CRITICAL detections
    pub threat_level: Option<f64>,
}

impl SyntheticEvent {
    pub fn log_type(&self) -> LogType {
        self.entry.log_type
    }

    /// Store mutations that publish this event, in application order
    pub fn into_mutations(self) -> Vec<Mutation> {
        let mut mutations = vec![Mutation::AddLog(self.entry)];
        if let Some(level) = self.threat_level {
            mutations.push(Mutation::AddAttack);
            mutations.push(Mutation::SetThreatLevel(level));
        }
        mutations
    }
}

/// Draw one weighted event outcome
pub fn synthesize(config: &GeneratorConfig, rng: &mut dyn RandomSource) -> SyntheticEvent {
    let roll = rng.gen_f64();

    if roll < config.critical_weight {
        let index = rng.gen_range_u64(0, config.attack_types.len() as u64) as usize;
        let attack = config
            .attack_types
            .get(index)
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string());
        let ip = rng.gen_ipv4();
        let confidence = rng.gen_range_u32(60, 100);
        let message = format!("{} detected from {} - Confidence: {}%", attack, ip, confidence);
        SyntheticEvent {
            entry: LogEntry::new(LogType::Critical, attack, message),
            threat_level: Some(rng.gen_range_f64(50.0, 100.0)),
        }
    } else if roll < config.critical_weight + config.alert_weight {
        let confidence = rng.gen_range_u32(70, 100);
        SyntheticEvent {
            entry: LogEntry::new(
                LogType::Alert,
                "Anomaly",
                format!(
                    "Traffic pattern deviates 2.8σ from baseline - {}% confidence",
                    confidence
                ),
            ),
            threat_level: None,
        }
    } else {
        let ip = rng.gen_ipv4();
        SyntheticEvent {
            entry: LogEntry::new(
                LogType::Action,
                "IP Blocked",
                format!("Blocked malicious IP: {}", ip),
            ),
            threat_level: None,
        }
    }
}

// ----------------------------------------------------------------------------
// Generator
// ----------------------------------------------------------------------------

#[derive(Default)]
struct GeneratorState {
    subscription: Option<SubscriptionId>,
    schedule: Option<JoinHandle<()>>,
}

/// Shared between the generator handle and its store subscriber
struct Shared {
    store: Store,
    config: GeneratorConfig,
    random: SharedRandom,
    handle: Handle,
    state: Mutex<GeneratorState>,
    ticks: AtomicU64,
    schedules_started: AtomicU64,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, GeneratorState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Start a schedule unless one is already live
    fn start(self: &Arc<Self>) {
        let mut state = self.state();
        if state.schedule.as_ref().is_some_and(|task| !task.is_finished()) {
            return;
        }

        let shared = Arc::clone(self);
        state.schedule = Some(self.handle.spawn(async move { shared.run().await }));
        self.schedules_started.fetch_add(1, Ordering::Relaxed);
        info!("Event generator schedule started");
    }

    /// Abort the live schedule, if any
    fn stop(&self) {
        if let Some(task) = self.state().schedule.take() {
            task.abort();
            info!("Event generator schedule cancelled");
        }
    }

    async fn run(&self) {
        loop {
            let wait = with_random(&self.random, |r| {
                r.gen_range_u64(self.config.min_interval_ms, self.config.max_interval_ms)
            });
            sleep(Duration::from_millis(wait)).await;

            let event = with_random(&self.random, |r| synthesize(&self.config, r));
            let log_type = event.log_type();
            if !self
                .store
                .dispatch_if(|s| s.is_running, event.into_mutations())
            {
                warn!("Generator tick discarded; system is no longer running");
                break;
            }
            let tick = self.ticks.fetch_add(1, Ordering::Relaxed) + 1;
            debug!(tick, log_type = %log_type, "Generator tick applied");
        }
    }
}

/// Background producer of synthetic events bound to one store
pub struct EventGenerator {
    shared: Arc<Shared>,
}

impl EventGenerator {
    /// Create a generator on the current tokio runtime. It stays idle until
    /// [`attach`](Self::attach) is called.
    pub fn new(store: Store, config: GeneratorConfig) -> ConsoleResult<Self> {
        config.validate()?;
        let handle = Handle::try_current().map_err(|e| ConsoleError::RuntimeUnavailable {
            reason: e.to_string(),
        })?;
        let random = shared_random(config.seed);
        Ok(Self::with_parts(store, config, random, handle))
    }

    pub fn with_parts(
        store: Store,
        config: GeneratorConfig,
        random: SharedRandom,
        handle: Handle,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                store,
                config,
                random,
                handle,
                state: Mutex::new(GeneratorState::default()),
                ticks: AtomicU64::new(0),
                schedules_started: AtomicU64::new(0),
            }),
        }
    }

    /// Follow the store's running flag. Starts immediately if the system is
    /// already running. Calling twice is a no-op.
    pub fn attach(&self) {
        if self.is_attached() {
            return;
        }

        // The subscriber runs under the store lock: it only spawns or aborts.
        let shared = Arc::clone(&self.shared);
        let id = self.shared.store.subscribe(move |state, mutation| {
            if matches!(mutation, Mutation::ToggleRunning) {
                if state.is_running {
                    shared.start();
                } else {
                    shared.stop();
                }
            }
        });
        self.shared.state().subscription = Some(id);
        debug!("Event generator attached");

        if self.shared.store.is_running() {
            self.shared.start();
        }
    }

    /// Stop following the store and cancel any live schedule
    pub fn detach(&self) {
        let subscription = self.shared.state().subscription.take();
        if let Some(id) = subscription {
            self.shared.store.unsubscribe(id);
            debug!("Event generator detached");
        }
        self.shared.stop();
    }

    pub fn is_attached(&self) -> bool {
        self.shared.state().subscription.is_some()
    }

    /// Whether a tick schedule is currently live
    pub fn is_active(&self) -> bool {
        self.shared
            .state()
            .schedule
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Ticks applied to the store so far
    pub fn ticks(&self) -> u64 {
        self.shared.ticks.load(Ordering::Relaxed)
    }

    /// Schedules started so far
    pub fn schedules_started(&self) -> u64 {
        self.shared.schedules_started.load(Ordering::Relaxed)
    }
}

impl Drop for EventGenerator {
    fn drop(&mut self) {
        self.detach();
    }
}
