//! Periodic snapshot writer.
//!
//! Spawns a tokio task that, once per period, saves the store if it has
//! unsaved changes. Saves run on the blocking pool. Failures are logged and
//! retried on the next cycle; nothing a save does can stop the loop.
//!
//! Shutdown is only observed between cycles, so a save that has started
//! always finishes.

use super::store::{SaveOutcome, TaskStore};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// Period between snapshot attempts when none is configured.
pub const DEFAULT_SAVE_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Saving,
}

/// What a single cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The store was clean; nothing was written.
    Skipped,
    /// A snapshot was written.
    Saved,
    /// The save failed; the store stays dirty.
    Failed,
}

/// Counters since the scheduler started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub cycles: u64,
    pub saves: u64,
    pub failures: u64,
}

#[derive(Debug, Default)]
struct Counters {
    saving: AtomicBool,
    cycles: AtomicU64,
    saves: AtomicU64,
    failures: AtomicU64,
}

impl Counters {
    fn stats(&self) -> SchedulerStats {
        SchedulerStats {
            cycles: self.cycles.load(Ordering::Relaxed),
            saves: self.saves.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }

    fn state(&self) -> SchedulerState {
        if self.saving.load(Ordering::Acquire) {
            SchedulerState::Saving
        } else {
            SchedulerState::Idle
        }
    }
}

pub struct SnapshotScheduler {
    store: Arc<TaskStore>,
    period: Duration,
    counters: Arc<Counters>,
}

impl SnapshotScheduler {
    pub fn new(store: Arc<TaskStore>, period: Duration) -> Self {
        SnapshotScheduler {
            store,
            period,
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.counters.state()
    }

    pub fn stats(&self) -> SchedulerStats {
        self.counters.stats()
    }

    /// Runs one `Idle -> Saving -> Idle` cycle.
    pub async fn run_cycle(&self) -> CycleOutcome {
        self.counters.cycles.fetch_add(1, Ordering::Relaxed);
        if !self.store.is_dirty() {
            return CycleOutcome::Skipped;
        }

        self.counters.saving.store(true, Ordering::Release);
        let store = Arc::clone(&self.store);
        let result = tokio::task::spawn_blocking(move || store.save()).await;
        self.counters.saving.store(false, Ordering::Release);

        match result {
            Ok(Ok(SaveOutcome::Written { bytes })) => {
                self.counters.saves.fetch_add(1, Ordering::Relaxed);
                debug!(bytes, "scheduled snapshot written");
                CycleOutcome::Saved
            }
            Ok(Ok(SaveOutcome::Clean | SaveOutcome::Detached)) => CycleOutcome::Skipped,
            Ok(Err(err)) => {
                self.counters.failures.fetch_add(1, Ordering::Relaxed);
                warn!(error = %err, "scheduled snapshot failed; retrying next cycle");
                CycleOutcome::Failed
            }
            Err(join_err) => {
                self.counters.failures.fetch_add(1, Ordering::Relaxed);
                error!(error = %join_err, "snapshot task panicked");
                CycleOutcome::Failed
            }
        }
    }

    /// Starts the loop on the current tokio runtime.
    ///
    /// The first cycle runs immediately, then once per period.
    pub fn spawn(self) -> SchedulerHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let counters = Arc::clone(&self.counters);

        let task = tokio::spawn(async move {
            info!(period_secs = self.period.as_secs_f64(), "snapshot scheduler started");
            let mut ticker = time::interval(self.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = shutdown_rx.changed() => break,
                }
                self.run_cycle().await;
                if *shutdown_rx.borrow() {
                    break;
                }
            }

            info!(stats = ?self.stats(), "snapshot scheduler stopped");
        });

        SchedulerHandle {
            shutdown_tx,
            task,
            counters,
        }
    }
}

/// Control handle of a running [`SnapshotScheduler`].
pub struct SchedulerHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
    counters: Arc<Counters>,
}

impl SchedulerHandle {
    pub fn state(&self) -> SchedulerState {
        self.counters.state()
    }

    pub fn stats(&self) -> SchedulerStats {
        self.counters.stats()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stops the loop after the current cycle and waits for it to exit.
    ///
    /// Returns the final counters.
    pub async fn shutdown(self) -> SchedulerStats {
        let _ = self.shutdown_tx.send(true);
        if let Err(err) = self.task.await {
            error!(error = %err, "snapshot scheduler task failed");
        }
        self.counters.stats()
    }
}
