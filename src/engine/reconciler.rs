use super::ledger::LastCheckLedger;
use super::matcher::{host_of_url, hosts_match};
use super::registry::PollConfig;
use super::tracker::{Membership, MembershipTracker};
use super::traits::{CatalogFilter, ContentCatalog, ContentItem, LedgerStore, ModerationGateway};
use crate::error::GuardError;
use chrono::{DateTime, Utc};
use futures::{stream, StreamExt};
use rustc_hash::FxHashSet;
use std::sync::{Arc, Mutex};
use tracing::{error, info, warn};

/// Reason attached to every automatic blacklist action.
pub const BLOCK_REASON: &str = "automatically blocked: origin domain on blocklist";

/// What one reconciliation cycle did. Logged by the scheduler.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleSummary {
    pub sources_checked: usize,
    pub sources_failed: usize,
    pub blocked: usize,
    pub skipped_already_blocked: usize,
    pub skipped_local: usize,
    pub action_failures: usize,
}

/// Computes, per cycle, the delta between "should be blocked" and "is
/// blocked" and issues moderation actions for the difference.
pub struct Reconciler {
    catalog: Arc<dyn ContentCatalog>,
    gateway: Arc<dyn ModerationGateway>,
    store: Arc<dyn LedgerStore>,
    tracker: Mutex<MembershipTracker>,
    concurrent_sources: usize,
}

impl Reconciler {
    pub fn new(
        catalog: Arc<dyn ContentCatalog>,
        gateway: Arc<dyn ModerationGateway>,
        store: Arc<dyn LedgerStore>,
        concurrent_sources: usize,
    ) -> Self {
        Self {
            catalog,
            gateway,
            store,
            tracker: Mutex::new(MembershipTracker::new()),
            concurrent_sources: concurrent_sources.max(1),
        }
    }

    pub fn membership(&self, id: &str) -> Membership {
        self.tracker.lock().unwrap().state(id)
    }

    /// Out-of-band correction hook; reconciliation itself never clears.
    pub fn mark_cleared(&self, id: &str) {
        self.tracker.lock().unwrap().mark_cleared(id);
    }

    /// One full pass over all sources. Never fails: every per-source and
    /// per-item error is caught, logged and isolated so a single bad
    /// source, item or write cannot stop future cycles.
    pub async fn run_cycle(&self, config: &PollConfig) -> CycleSummary {
        let mut summary = CycleSummary::default();
        if config.sources.is_empty() {
            return summary;
        }

        // Fan out the catalog listings with bounded concurrency; each
        // source's attempt time is recorded even if its fetch then fails.
        // Owned hosts, not borrows: the futures outlive this stack frame
        // inside the scheduler's spawned task.
        let hosts: Vec<String> = config.sources.iter().map(|s| s.host.clone()).collect();
        let fetches = hosts.into_iter().map(|host| {
            let catalog = self.catalog.clone();
            async move {
                let attempt = Utc::now();
                let filter = CatalogFilter {
                    host: Some(host.clone()),
                };
                let result = catalog.list(filter).await;
                (host, attempt, result)
            }
        });
        type Fetched = (String, DateTime<Utc>, anyhow::Result<Vec<ContentItem>>);
        let results: Vec<Fetched> = stream::iter(fetches)
            .buffer_unordered(self.concurrent_sources)
            .collect()
            .await;

        // Single-writer pass: tracker and ledger updates are serialized
        // here, and `acted` dedupes gateway calls when two sources resolve
        // to the same hostname within one cycle.
        let mut ledger = LastCheckLedger::new();
        let mut acted: FxHashSet<String> = FxHashSet::default();

        for (host, attempt, result) in results {
            ledger.record(&host, attempt);
            let items = match result {
                Ok(items) => items,
                Err(e) => {
                    summary.sources_failed += 1;
                    let err = GuardError::SourceFetch {
                        source_id: host.clone(),
                        message: format!("{:#}", e),
                    };
                    error!("{}", err);
                    continue;
                }
            };
            summary.sources_checked += 1;
            for item in items {
                self.reconcile_item(&host, &item, &mut acted, &mut summary)
                    .await;
            }
        }

        if let Err(e) = ledger.persist(self.store.as_ref()).await {
            error!("{}", e);
        }

        summary
    }

    async fn reconcile_item(
        &self,
        source_host: &str,
        item: &ContentItem,
        acted: &mut FxHashSet<String>,
        summary: &mut CycleSummary,
    ) {
        let item_host = match host_of_url(&item.origin_url) {
            Ok(host) => host,
            Err(e) => {
                warn!(id = %item.id, "Skipping item: {}", e);
                return;
            }
        };
        if !hosts_match(source_host, &item_host) {
            return;
        }
        if acted.contains(&item.id) || self.tracker.lock().unwrap().is_blocked(&item.id) {
            summary.skipped_already_blocked += 1;
            return;
        }
        if !item.is_remote {
            // Hostname coincidence must never blacklist the instance's own
            // uploads.
            info!(id = %item.id, host = %item_host, "Skipping local content");
            summary.skipped_local += 1;
            return;
        }
        match self.gateway.blacklist(&item.id, BLOCK_REASON).await {
            Ok(()) => {
                self.tracker.lock().unwrap().mark_blocked(&item.id);
                acted.insert(item.id.clone());
                summary.blocked += 1;
                info!(id = %item.id, host = %item_host, "Blacklisted remote content");
            }
            Err(e) => {
                // Not marked blocked, so it is retried next cycle.
                summary.action_failures += 1;
                let err = GuardError::Action {
                    content_id: item.id.clone(),
                    message: format!("{:#}", e),
                };
                error!("{}", err);
            }
        }
    }
}
