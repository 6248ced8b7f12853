//! Best-effort draft persistence for an open questionnaire.
//!
//! Every edit replaces the snapshot and restarts a debounce timer; when it
//! fires the status drops back to [`AutosaveStatus::Idle`]. A periodic timer
//! saves the snapshot unless a save is in flight or the previous one failed.
//! Saves are never retried on their own and never time out.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use super::domain::FormValues;
use crate::config::AssessmentSettings;

/// Destination for autosaved answers.
#[async_trait]
pub trait FormPersister: Send + Sync + 'static {
    async fn persist(&self, values: FormValues) -> Result<(), PersistError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct PersistError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AutosaveStatus {
    Idle,
    Saving,
    Saved { at: DateTime<Utc> },
    Error { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Failed(PersistError),
    /// Another save was already in flight; the persister was not called.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutosaveConfig {
    pub debounce: Duration,
    pub interval: Duration,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_secs(1),
            interval: Duration::from_secs(30),
        }
    }
}

impl From<&AssessmentSettings> for AutosaveConfig {
    fn from(settings: &AssessmentSettings) -> Self {
        Self {
            debounce: settings.autosave_debounce(),
            interval: settings.autosave_interval(),
        }
    }
}

struct Shared<P> {
    persister: P,
    snapshot: tokio::sync::Mutex<FormValues>,
    status: watch::Sender<AutosaveStatus>,
    in_flight: AtomicBool,
}

impl<P: FormPersister> Shared<P> {
    async fn save(&self) -> SaveOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("autosave skipped, save already in flight");
            return SaveOutcome::Skipped;
        }

        let mut guard = InFlight {
            flag: &self.in_flight,
            status: &self.status,
            finished: false,
        };

        self.status.send_replace(AutosaveStatus::Saving);
        let snapshot = self.snapshot.lock().await.clone();
        let fields = snapshot.len();

        let outcome = match self.persister.persist(snapshot).await {
            Ok(()) => {
                debug!(fields, "autosave stored draft");
                self.status
                    .send_replace(AutosaveStatus::Saved { at: Utc::now() });
                SaveOutcome::Saved
            }
            Err(err) => {
                warn!(error = %err, "autosave failed");
                self.status.send_replace(AutosaveStatus::Error {
                    message: err.to_string(),
                });
                SaveOutcome::Failed(err)
            }
        };

        guard.finished = true;
        outcome
    }

    fn settle_to_idle(&self) {
        self.status.send_if_modified(|status| match status {
            AutosaveStatus::Idle | AutosaveStatus::Saving => false,
            AutosaveStatus::Saved { .. } | AutosaveStatus::Error { .. } => {
                *status = AutosaveStatus::Idle;
                true
            }
        });
    }
}

/// Releases the in-flight flag when a save ends, including when the save
/// future is dropped or the persister panics. An unfinished save leaves an
/// error status so the form offers a retry instead of staying in `Saving`.
struct InFlight<'a> {
    flag: &'a AtomicBool,
    status: &'a watch::Sender<AutosaveStatus>,
    finished: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.finished {
            warn!("autosave interrupted before the persister finished");
            self.status.send_replace(AutosaveStatus::Error {
                message: INTERRUPTED.to_string(),
            });
        }
        self.flag.store(false, Ordering::Release);
    }
}

const INTERRUPTED: &str = "autosave interrupted";

/// Owns the debounce and periodic timers for one open form.
///
/// Must be created inside a Tokio runtime. Dropping the coordinator clears
/// both timers; a save already in flight runs to completion.
pub struct AutosaveCoordinator<P: FormPersister> {
    shared: Arc<Shared<P>>,
    config: AutosaveConfig,
    debounce: Mutex<Option<JoinHandle<()>>>,
    ticker: Option<JoinHandle<()>>,
}

impl<P: FormPersister> AutosaveCoordinator<P> {
    pub fn new(persister: P, config: AutosaveConfig) -> Self {
        Self::with_initial(persister, config, FormValues::new())
    }

    pub fn with_initial(persister: P, config: AutosaveConfig, values: FormValues) -> Self {
        let (status, _) = watch::channel(AutosaveStatus::Idle);
        let shared = Arc::new(Shared {
            persister,
            snapshot: tokio::sync::Mutex::new(values),
            status,
            in_flight: AtomicBool::new(false),
        });

        let ticker = tokio::spawn(run_periodic(shared.clone(), config.interval));

        Self {
            shared,
            config,
            debounce: Mutex::new(None),
            ticker: Some(ticker),
        }
    }

    pub fn config(&self) -> AutosaveConfig {
        self.config
    }

    /// Replace the snapshot with the latest answers and restart the debounce.
    pub async fn record_change(&self, values: FormValues) {
        *self.shared.snapshot.lock().await = values;

        let shared = self.shared.clone();
        let delay = self.config.debounce;
        let mut slot = self.debounce.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(pending) = slot.take() {
            pending.abort();
        }
        *slot = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            shared.settle_to_idle();
        }));
    }

    /// Save the current snapshot immediately (the "Retry" affordance).
    pub async fn save_now(&self) -> SaveOutcome {
        self.shared.save().await
    }

    pub async fn snapshot(&self) -> FormValues {
        self.shared.snapshot.lock().await.clone()
    }

    pub fn status(&self) -> AutosaveStatus {
        self.shared.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AutosaveStatus> {
        self.shared.status.subscribe()
    }

    /// Leaving the page should only be questioned while a save is running.
    pub fn should_warn_on_unload(&self) -> bool {
        matches!(*self.shared.status.borrow(), AutosaveStatus::Saving)
    }

    /// Clear both timers. In-flight saves are not cancelled.
    pub fn shutdown(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        let mut slot = self.debounce.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(pending) = slot.take() {
            pending.abort();
        }
    }
}

impl<P: FormPersister> Drop for AutosaveCoordinator<P> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn run_periodic<P: FormPersister>(shared: Arc<Shared<P>>, period: Duration) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let blocked = matches!(
            *shared.status.borrow(),
            AutosaveStatus::Saving | AutosaveStatus::Error { .. }
        );
        if blocked {
            debug!("periodic autosave skipped");
            continue;
        }
        // Detached so clearing the timer never cancels a running save.
        let save = shared.clone();
        tokio::spawn(async move {
            save.save().await;
        });
    }
}
