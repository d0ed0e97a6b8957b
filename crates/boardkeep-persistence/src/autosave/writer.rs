//! Background checkpoint writes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::runtime::Handle;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::checkpoint::{RecoveryCheckpoint, RecoveryCheckpointStore};
use crate::identity::ChecksumIdentity;
use crate::types::PersistedSession;

/// Result of [`CheckpointWriter::submit`].
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The write runs on the blocking pool. The handle yields the written
    /// checkpoint, or `None` if the write failed.
    Started(JoinHandle<Option<RecoveryCheckpoint>>),

    /// Another write was in flight; this one was discarded.
    Dropped,
}

impl SubmitOutcome {
    /// Whether the write was started.
    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started(_))
    }
}

/// Writes checkpoints off the calling thread, one at a time.
///
/// Requests arriving while a write is in flight are dropped, not queued.
#[derive(Debug, Clone)]
pub struct CheckpointWriter {
    store: Arc<RecoveryCheckpointStore>,
    runtime: Handle,
    busy: Arc<AtomicBool>,
    idle: Arc<Notify>,
}

impl CheckpointWriter {
    /// Writer that runs on the given runtime.
    pub fn new(store: RecoveryCheckpointStore, runtime: Handle) -> Self {
        Self {
            store: Arc::new(store),
            runtime,
            busy: Arc::new(AtomicBool::new(false)),
            idle: Arc::new(Notify::new()),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &RecoveryCheckpointStore {
        &self.store
    }

    /// Whether a write is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Start writing a checkpoint unless one is already being written.
    pub fn submit(&self, identity: ChecksumIdentity, session: PersistedSession) -> SubmitOutcome {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("Checkpoint write for {} dropped, previous write still running", identity);
            return SubmitOutcome::Dropped;
        }

        let guard = BusyGuard {
            busy: Arc::clone(&self.busy),
            idle: Arc::clone(&self.idle),
        };
        let store = Arc::clone(&self.store);

        let handle = self.runtime.spawn_blocking(move || {
            let _guard = guard;
            match store.write(identity, &session) {
                Ok(checkpoint) => Some(checkpoint),
                Err(e) => {
                    tracing::warn!("Auto-save failed: {}", e);
                    None
                }
            }
        });

        SubmitOutcome::Started(handle)
    }

    #[cfg(test)]
    pub(crate) fn set_busy(&self, busy: bool) {
        self.busy.store(busy, Ordering::Release);
    }

    /// Wait until no write is in flight.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            if !self.is_busy() {
                return;
            }
            notified.await;
        }
    }
}

/// Clears the busy flag when the write finishes, including on panic.
struct BusyGuard {
    busy: Arc<AtomicBool>,
    idle: Arc<Notify>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
        self.idle.notify_waiters();
    }
}
