use super::traits::LedgerStore;
use crate::error::GuardError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Storage key for the serialized ledger.
pub const LEDGER_KEY: &str = "origin-guard/last-checks";

/// Last-attempt timestamp per configured source host. Rebuilt from scratch
/// every cycle and written with overwrite semantics, so a source removed
/// from configuration drops out of the ledger on the next write.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LastCheckLedger(pub BTreeMap<String, DateTime<Utc>>);

impl LastCheckLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, source_host: &str, at: DateTime<Utc>) {
        self.0.insert(source_host.to_string(), at);
    }

    /// Loads the previous ledger; an absent or unreadable value is an empty
    /// ledger, never an error.
    pub async fn load(store: &dyn LedgerStore) -> Self {
        match store.get(LEDGER_KEY).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Discarding unparseable ledger: {}", e);
                Self::new()
            }),
            Ok(None) => Self::new(),
            Err(e) => {
                warn!("Failed to read ledger, starting empty: {}", e);
                Self::new()
            }
        }
    }

    /// Best effort: a write failure is surfaced to the caller for logging
    /// but must never block the next cycle.
    pub async fn persist(&self, store: &dyn LedgerStore) -> Result<(), GuardError> {
        let raw = serde_json::to_string(self)
            .map_err(|e| GuardError::Persistence(e.to_string()))?;
        store
            .set(LEDGER_KEY, &raw)
            .await
            .map_err(|e| GuardError::Persistence(e.to_string()))
    }
}
