use std::sync::{Mutex, PoisonError, mpsc};

use crate::foundation::core::SurfaceSize;

/// Host-side publisher for surface size changes.
///
/// Subscriptions are explicit handles: the animator holds one for its
/// lifetime and drops it in `destroy`, so repeated create/destroy cycles
/// never accumulate listeners. Senders to dropped subscriptions are pruned
/// on the next publish.
#[derive(Default)]
pub struct ResizeBus {
    senders: Mutex<Vec<mpsc::Sender<SurfaceSize>>>,
}

impl ResizeBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber.
    pub fn subscribe(&self) -> ResizeSubscription {
        let (tx, rx) = mpsc::channel();
        self.senders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        ResizeSubscription { rx }
    }

    /// Broadcast a new surface size to every live subscription.
    pub fn publish(&self, size: SurfaceSize) {
        self.senders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|tx| tx.send(size).is_ok());
    }
}

/// Receiving side of one [`ResizeBus`] registration. Dropping it detaches
/// the subscriber.
pub struct ResizeSubscription {
    rx: mpsc::Receiver<SurfaceSize>,
}

impl ResizeSubscription {
    /// The most recent size published since the last drain, if any.
    /// Intermediate sizes are discarded; only the latest matters to a
    /// pull-based consumer.
    pub fn latest(&self) -> Option<SurfaceSize> {
        self.rx.try_iter().last()
    }
}
