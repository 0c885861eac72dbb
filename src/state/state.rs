use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Outcome of [`AllocationState::bind_if_absent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// The claim had no node; it is now bound to the one passed in.
    Created(String),
    /// The claim was already bound. Holds the recorded node, which may differ
    /// from the one passed in.
    Existing(String),
}

impl Binding {
    pub fn node(&self) -> &str {
        match self {
            Binding::Created(n) | Binding::Existing(n) => n,
        }
    }
}

/// Claim uid to node name, for claims bound during deferred allocation.
///
/// Records are never replaced or removed, so a claim keeps the node it was
/// first bound to for the lifetime of the process. Nothing is persisted; a
/// restart starts from an empty map.
#[derive(Debug, Default)]
pub struct AllocationState {
    allocated: Mutex<HashMap<String, String>>,
}

impl AllocationState {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // the map is only ever touched by single inserts, poisoning can't leave it half-written
        self.allocated.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn lookup(&self, claim_uid: &str) -> Option<String> {
        self.lock().get(claim_uid).cloned()
    }

    pub fn bind_if_absent(&self, claim_uid: &str, node_name: &str) -> Binding {
        let mut allocated = self.lock();
        match allocated.get(claim_uid) {
            Some(existing) => Binding::Existing(existing.clone()),
            None => {
                allocated.insert(claim_uid.to_string(), node_name.to_string());
                Binding::Created(node_name.to_string())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
