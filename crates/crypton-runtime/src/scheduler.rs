//! Staged-sequence scheduler
//!
//! A staged sequence is an ordered list of actions, each fired at a fixed
//! delay measured from the moment the sequence was scheduled (delays are not
//! cumulative). Every sequence runs as its own tokio task keyed by a
//! [`SequenceId`], so sequences are independently cancellable and overlapping
//! sequences interleave strictly in timer order.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::runtime::Handle;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Duration, Instant};
use tracing::debug;

use crypton_core::{ConsoleError, ConsoleResult, Store};

// ----------------------------------------------------------------------------
// Stages
// ----------------------------------------------------------------------------

type StageAction = Box<dyn FnOnce(&Store) + Send + 'static>;

/// One delayed step of a staged sequence
pub struct Stage {
    delay: Duration,
    action: StageAction,
}

impl Stage {
    /// Run `action` against the store once `delay` has elapsed
    pub fn new<F>(delay: Duration, action: F) -> Self
    where
        F: FnOnce(&Store) + Send + 'static,
    {
        Self {
            delay,
            action: Box::new(action),
        }
    }

    /// Append a fixed terminal line once `delay` has elapsed
    pub fn line(delay: Duration, line: impl Into<String>) -> Self {
        let line = line.into();
        Self::new(delay, move |store| store.append_terminal_line(line))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage").field("delay", &self.delay).finish()
    }
}

/// Identifier of one scheduled sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SequenceId(u64);

impl fmt::Display for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seq-{}", self.0)
    }
}

// ----------------------------------------------------------------------------
// Scheduler
// ----------------------------------------------------------------------------

#[derive(Default)]
struct Registry {
    tasks: Mutex<HashMap<SequenceId, JoinHandle<()>>>,
    idle: Notify,
}

impl Registry {
    fn tasks(&self) -> MutexGuard<'_, HashMap<SequenceId, JoinHandle<()>>> {
        self.tasks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn finish(&self, id: SequenceId) -> Option<JoinHandle<()>> {
        let removed = self.tasks().remove(&id);
        self.idle.notify_waiters();
        removed
    }
}

/// Runs staged sequences against a store on a tokio runtime
pub struct Scheduler {
    store: Store,
    handle: Handle,
    next_id: AtomicU64,
    registry: Arc<Registry>,
}

impl Scheduler {
    /// Create a scheduler bound to the current tokio runtime
    pub fn new(store: Store) -> ConsoleResult<Self> {
        let handle = Handle::try_current().map_err(|e| ConsoleError::RuntimeUnavailable {
            reason: e.to_string(),
        })?;
        Ok(Self::with_handle(store, handle))
    }

    pub fn with_handle(store: Store, handle: Handle) -> Self {
        Self {
            store,
            handle,
            next_id: AtomicU64::new(0),
            registry: Arc::new(Registry::default()),
        }
    }

    /// Schedule `stages` relative to now. Stages sharing a delay fire in the
    /// order given. Returns `None` for an empty sequence.
    pub fn schedule(&self, mut stages: Vec<Stage>) -> Option<SequenceId> {
        if stages.is_empty() {
            return None;
        }
        stages.sort_by_key(Stage::delay);

        let id = SequenceId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let origin = Instant::now();
        let store = self.store.clone();
        let registry = self.registry.clone();

        // Hold the registry while spawning so the task cannot finish and
        // deregister before it has been registered.
        let mut tasks = self.registry.tasks();
        let task = self.handle.spawn(async move {
            for stage in stages {
                sleep_until(origin + stage.delay).await;
                (stage.action)(&store);
            }
            registry.finish(id);
            debug!(sequence = %id, "Staged sequence completed");
        });
        tasks.insert(id, task);
        debug!(sequence = %id, "Staged sequence scheduled");

        Some(id)
    }

    /// Abort a pending sequence; returns false if it already finished
    pub fn cancel(&self, id: SequenceId) -> bool {
        match self.registry.finish(id) {
            Some(task) => {
                task.abort();
                debug!(sequence = %id, "Staged sequence cancelled");
                true
            }
            None => false,
        }
    }

    /// Abort every pending sequence
    pub fn cancel_all(&self) -> usize {
        let drained: Vec<_> = self.registry.tasks().drain().collect();
        for (_, task) in &drained {
            task.abort();
        }
        self.registry.idle.notify_waiters();
        drained.len()
    }

    /// Number of sequences still waiting on a stage
    pub fn pending(&self) -> usize {
        self.registry.tasks().len()
    }

    pub fn is_pending(&self, id: SequenceId) -> bool {
        self.registry.tasks().contains_key(&id)
    }

    /// Resolve once no sequence is pending
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.registry.idle.notified();
            if self.pending() == 0 {
                return;
            }
            notified.await;
        }
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("pending", &self.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[tokio::test(start_paused = true)]
    async fn test_stages_fire_at_absolute_delays() {
        let store = Store::default();
        let scheduler = Scheduler::new(store.clone()).unwrap();

        scheduler.schedule(vec![
            Stage::line(ms(100), "a"),
            Stage::line(ms(300), "b"),
        ]);

        tokio::time::sleep(ms(150)).await;
        assert_eq!(store.terminal_lines(), vec!["a"]);
        tokio::time::sleep(ms(200)).await;
        assert_eq!(store.terminal_lines(), vec!["a", "b"]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_equal_delays_keep_source_order() {
        let store = Store::default();
        let scheduler = Scheduler::new(store.clone()).unwrap();

        scheduler.schedule(vec![
            Stage::line(ms(500), "late"),
            Stage::line(ms(100), "first"),
            Stage::line(ms(100), "second"),
            Stage::line(ms(100), "third"),
        ]);
        scheduler.wait_idle().await;

        assert_eq!(store.terminal_lines(), vec!["first", "second", "third", "late"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_remaining_stages() {
        let store = Store::default();
        let scheduler = Scheduler::new(store.clone()).unwrap();

        let id = scheduler
            .schedule(vec![Stage::line(ms(100), "a"), Stage::line(ms(400), "b")])
            .unwrap();
        assert!(scheduler.is_pending(id));

        tokio::time::sleep(ms(200)).await;
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        tokio::time::sleep(ms(500)).await;

        assert_eq!(store.terminal_lines(), vec!["a"]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_all() {
        let store = Store::default();
        let scheduler = Scheduler::new(store.clone()).unwrap();
        scheduler.schedule(vec![Stage::line(ms(100), "a")]);
        scheduler.schedule(vec![Stage::line(ms(100), "b")]);

        assert_eq!(scheduler.cancel_all(), 2);
        scheduler.wait_idle().await;
        tokio::time::sleep(ms(200)).await;
        assert!(store.terminal_lines().is_empty());
    }

    #[tokio::test]
    async fn test_empty_sequence_not_scheduled() {
        let scheduler = Scheduler::new(Store::default()).unwrap();
        assert!(scheduler.schedule(Vec::new()).is_none());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_requires_runtime() {
        assert!(matches!(
            Scheduler::new(Store::default()),
            Err(ConsoleError::RuntimeUnavailable { .. })
        ));
    }
}
