use crate::util::NamespacedName;
use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};

const BASE_DELAY: Duration = Duration::from_millis(5);
const MAX_DELAY: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WorkItem {
    Claim(NamespacedName),
    Scheduling(NamespacedName),
}

impl Display for WorkItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkItem::Claim(key) => write!(f, "claim:{}", key),
            WorkItem::Scheduling(key) => write!(f, "podscheduling:{}", key),
        }
    }
}

/// Exponential per-item backoff, doubling from 5ms up to 5 minutes.
pub fn backoff(failures: u32) -> Duration {
    BASE_DELAY
        .checked_mul(2u32.saturating_pow(failures))
        .map(|d| d.min(MAX_DELAY))
        .unwrap_or(MAX_DELAY)
}

/// Work queue shared by watchers and workers. An item that is already
/// waiting is not queued twice.
pub struct WorkQueue {
    tx: mpsc::UnboundedSender<WorkItem>,
    rx: Mutex<mpsc::UnboundedReceiver<WorkItem>>,
    pending: std::sync::Mutex<HashSet<WorkItem>>,
    failures: std::sync::Mutex<HashMap<WorkItem, u32>>,
}

impl WorkQueue {
    pub fn new() -> Arc<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        Arc::new(WorkQueue {
            tx,
            rx: Mutex::new(rx),
            pending: Default::default(),
            failures: Default::default(),
        })
    }

    pub fn add(&self, item: WorkItem) {
        let inserted = self
            .pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(item.clone());
        if inserted {
            // the receiver lives as long as the queue
            let _ = self.tx.send(item);
        }
    }

    /// Queues the item again once its backoff has passed.
    pub fn add_rate_limited(self: &Arc<Self>, item: WorkItem) {
        let delay = {
            let mut failures = self.failures.lock().unwrap_or_else(|e| e.into_inner());
            let count = failures.entry(item.clone()).or_insert(0);
            let delay = backoff(*count);
            *count = count.saturating_add(1);
            delay
        };
        let queue = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            queue.add(item);
        });
    }

    pub fn forget(&self, item: &WorkItem) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(item);
    }

    pub fn failures(&self, item: &WorkItem) -> u32 {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(item)
            .copied()
            .unwrap_or_default()
    }

    pub async fn next(&self) -> Option<WorkItem> {
        let item = self.rx.lock().await.recv().await?;
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&item);
        Some(item)
    }
}
