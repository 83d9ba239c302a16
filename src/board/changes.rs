//! One-shot broadcast of board mutations.

use tokio::sync::oneshot;
use tracing::trace;

/// Wakes observers when the board visibly changes.
///
/// Subscribing hands back a one-shot completion that fires on the next
/// publish; publishing drains the whole observer set, so an observer that
/// wants the change after next must subscribe again. Changes between
/// subscriptions are not buffered.
#[derive(Debug, Default)]
pub(crate) struct ChangeBus {
    observers: Vec<oneshot::Sender<()>>,
}

impl ChangeBus {
    /// Registers for the next publish.
    pub(crate) fn subscribe(&mut self) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        self.observers.push(tx);
        rx
    }

    /// Wakes every currently-subscribed observer and clears the set.
    pub(crate) fn publish(&mut self) {
        trace!(observers = self.observers.len(), "publishing board change");
        for observer in self.observers.drain(..) {
            let _ = observer.send(());
        }
    }

    #[cfg(test)]
    pub(crate) fn observer_count(&self) -> usize {
        self.observers.len()
    }
}
