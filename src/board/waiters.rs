//! Per-cell FIFO queues of one-shot wake-up completions.

use super::coordinate::Coordinate;
use std::collections::{HashMap, VecDeque};
use tokio::sync::oneshot;
use tracing::trace;

/// Pending wake-ups for actors suspended on a controlled cell.
///
/// Each queue entry is a one-shot completion; the suspended flip holds the
/// receiving half and re-enters the rule table when it fires. Completions are
/// single-use: an actor that suspends again enqueues a fresh one. Queues are
/// created on demand and dropped when woken, so the registry holds only
/// in-flight entries.
#[derive(Debug, Default)]
pub(crate) struct WaiterRegistry {
    queues: HashMap<Coordinate, VecDeque<oneshot::Sender<()>>>,
}

impl WaiterRegistry {
    /// Appends a fresh completion to the FIFO for `cell` and returns the half
    /// the caller suspends on.
    pub(crate) fn enqueue(&mut self, cell: Coordinate) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        self.queues.entry(cell).or_default().push_back(tx);
        trace!(%cell, "waiter enqueued");
        rx
    }

    /// Releases every completion queued for `cell`, in enqueue order.
    ///
    /// Idempotent on an empty queue. A receiver whose caller has gone away is
    /// skipped silently.
    pub(crate) fn wake_all(&mut self, cell: Coordinate) {
        if let Some(queue) = self.queues.remove(&cell) {
            trace!(%cell, woken = queue.len(), "waking cell waiters");
            for waiter in queue {
                let _ = waiter.send(());
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn pending(&self, cell: Coordinate) -> usize {
        self.queues.get(&cell).map_or(0, VecDeque::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn wakes_in_enqueue_order() {
        let mut registry = WaiterRegistry::default();
        let cell = Coordinate::new(0, 0);
        let first = registry.enqueue(cell);
        let second = registry.enqueue(cell);
        assert_eq!(registry.pending(cell), 2);

        registry.wake_all(cell);
        assert_eq!(registry.pending(cell), 0);
        first.await.expect("first waiter woken");
        second.await.expect("second waiter woken");
    }

    #[tokio::test]
    async fn wake_is_idempotent_on_empty_queue() {
        let mut registry = WaiterRegistry::default();
        registry.wake_all(Coordinate::new(3, 3));
        registry.wake_all(Coordinate::new(3, 3));
    }

    #[tokio::test]
    async fn wake_is_per_cell() {
        let mut registry = WaiterRegistry::default();
        let here = registry.enqueue(Coordinate::new(0, 0));
        let mut elsewhere = registry.enqueue(Coordinate::new(0, 1));

        registry.wake_all(Coordinate::new(0, 0));
        here.await.expect("woken");
        assert!(elsewhere.try_recv().is_err(), "other cell stays queued");
    }

    #[tokio::test]
    async fn tolerates_dropped_receivers() {
        let mut registry = WaiterRegistry::default();
        let cell = Coordinate::new(1, 1);
        drop(registry.enqueue(cell));
        let survivor = registry.enqueue(cell);
        registry.wake_all(cell);
        survivor.await.expect("surviving waiter woken");
    }
}
