use rustc_hash::FxHashSet;

/// Tri-state membership for one content id. An id is in exactly one state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Untracked,
    Blocked,
    Cleared,
}

/// In-memory record of which content this process has already acted on.
/// Deliberately not persisted: after a restart every matching item is
/// re-evaluated against the moderation system from scratch.
#[derive(Debug, Default)]
pub struct MembershipTracker {
    blocked: FxHashSet<String>,
    cleared: FxHashSet<String>,
}

impl MembershipTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent. Also erases a prior cleared marker.
    pub fn mark_blocked(&mut self, id: &str) {
        self.cleared.remove(id);
        self.blocked.insert(id.to_string());
    }

    /// Out-of-band correction only; reconciliation never auto-clears.
    pub fn mark_cleared(&mut self, id: &str) {
        if self.blocked.remove(id) {
            self.cleared.insert(id.to_string());
        }
    }

    /// The idempotence guard used by reconciliation.
    pub fn is_blocked(&self, id: &str) -> bool {
        self.blocked.contains(id)
    }

    pub fn state(&self, id: &str) -> Membership {
        if self.blocked.contains(id) {
            Membership::Blocked
        } else if self.cleared.contains(id) {
            Membership::Cleared
        } else {
            Membership::Untracked
        }
    }

    pub fn blocked_count(&self) -> usize {
        self.blocked.len()
    }
}
