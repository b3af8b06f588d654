pub mod ledger;
pub mod matcher;
pub mod reconciler;
pub mod registry;
pub mod scheduler;
pub mod tracker;
pub mod traits;

pub use ledger::{LastCheckLedger, LEDGER_KEY};
pub use reconciler::{CycleSummary, Reconciler, BLOCK_REASON};
pub use registry::{BlocklistSource, PollConfig};
pub use scheduler::Scheduler;
pub use tracker::{Membership, MembershipTracker};
pub use traits::{CatalogFilter, ContentCatalog, ContentItem, LedgerStore, ModerationGateway};
