use std::collections::HashSet;

/// Classification of the freshly parsed slug set against the store's
/// current inventory. Pure set arithmetic; retention policy for removed
/// slugs is the orchestrator's call.
#[derive(Debug, Default)]
pub struct Reconciliation {
    pub new: HashSet<String>,
    pub removed: HashSet<String>,
    pub kept: HashSet<String>,
}

pub fn reconcile(current: &HashSet<String>, existing: &HashSet<String>) -> Reconciliation {
    Reconciliation {
        new: current.difference(existing).cloned().collect(),
        removed: existing.difference(current).cloned().collect(),
        kept: current.intersection(existing).cloned().collect(),
    }
}
