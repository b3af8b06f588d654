use async_trait::async_trait;

/// One piece of content known to the platform. Read-only from our side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    pub id: String,
    pub origin_url: String,
    pub is_remote: bool,
}

/// Narrowing hints for a catalog listing. The engine still verifies the
/// origin hostname itself, so a catalog is free to ignore the hint.
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    pub host: Option<String>,
}

/// Read access to the platform's content listing.
#[async_trait]
pub trait ContentCatalog: Send + Sync {
    /// Full listing each call, no incremental cursor. A transport failure
    /// means "no items available this cycle" for the caller.
    async fn list(&self, filter: CatalogFilter) -> anyhow::Result<Vec<ContentItem>>;
}

/// The moderation side of the platform. Not safe to call twice for an
/// already-blacklisted item; the engine owns the once-per-id guarantee.
#[async_trait]
pub trait ModerationGateway: Send + Sync {
    async fn blacklist(&self, content_id: &str, reason: &str) -> anyhow::Result<()>;
}

/// Key/value persistence for the last-check ledger.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Absence is an empty ledger, not an error.
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
}
