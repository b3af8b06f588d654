use super::reconciler::Reconciler;
use super::registry::PollConfig;
use crate::error::GuardError;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Drives periodic reconciliation with a self-rescheduling timer: sleep the
/// interval, run one cycle to completion, repeat. Cycle starts are therefore
/// `interval + execution time` apart and cycles never overlap.
pub struct Scheduler {
    reconciler: Arc<Reconciler>,
    // Finish-before-start across reconfigurations: a task replaced while
    // mid-cycle holds the gate until its cycle completes.
    cycle_gate: Arc<tokio::sync::Mutex<()>>,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    config: Option<PollConfig>,
    cancel: Option<CancellationToken>,
    task: Option<JoinHandle<()>>,
}

impl Scheduler {
    pub fn new(reconciler: Arc<Reconciler>) -> Self {
        Self {
            reconciler,
            cycle_gate: Arc::new(tokio::sync::Mutex::new(())),
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Whether a timer is currently armed.
    pub fn is_scheduled(&self) -> bool {
        self.inner.lock().unwrap().cancel.is_some()
    }

    /// Replaces the active configuration. One critical section cancels the
    /// pending timer, installs the new config and arms a new timer, so at
    /// most one timer is ever outstanding. A parse failure leaves the
    /// previous configuration and schedule untouched.
    pub fn configure(&self, raw_source_list: &str, interval_seconds: u64) -> Result<(), GuardError> {
        let config = PollConfig::parse(raw_source_list, interval_seconds)?;

        let mut inner = self.inner.lock().unwrap();
        if let Some(cancel) = inner.cancel.take() {
            cancel.cancel();
        }
        inner.task = None;

        if config.is_inert() {
            warn!(
                sources = config.sources.len(),
                interval_seconds, "Inert blocklist configuration, scheduler going idle"
            );
            inner.config = Some(config);
            return Ok(());
        }

        info!(
            sources = config.sources.len(),
            interval_seconds, "Arming reconciliation timer"
        );
        let cancel = CancellationToken::new();
        inner.cancel = Some(cancel.clone());
        let reconciler = self.reconciler.clone();
        let gate = self.cycle_gate.clone();
        let loop_config = config.clone();
        inner.config = Some(config);
        inner.task = Some(tokio::spawn(async move {
            run_loop(reconciler, gate, loop_config, cancel).await;
        }));
        Ok(())
    }

    /// Cancels the pending timer. An in-flight cycle still runs to
    /// completion; no new cycle starts afterwards.
    pub fn shutdown(&self) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(cancel) = inner.cancel.take() {
            cancel.cancel();
        }
        inner.task = None;
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn run_loop(
    reconciler: Arc<Reconciler>,
    gate: Arc<tokio::sync::Mutex<()>>,
    config: PollConfig,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(config.interval) => {}
        }
        let _gate = gate.lock().await;
        // Cancellation is observed between cycles only; once a cycle has
        // started it finishes, ledger write included.
        if cancel.is_cancelled() {
            break;
        }
        let summary = reconciler.run_cycle(&config).await;
        info!(
            sources_checked = summary.sources_checked,
            sources_failed = summary.sources_failed,
            blocked = summary.blocked,
            skipped_local = summary.skipped_local,
            skipped_already_blocked = summary.skipped_already_blocked,
            action_failures = summary.action_failures,
            "Reconciliation cycle complete"
        );
    }
}
