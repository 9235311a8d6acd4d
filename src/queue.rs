//! Message queue for handing work from background threads to the UI thread.
//!
//! Senders may live on any thread. Each send also fires the wake callback so
//! the UI can schedule a frame; the UI thread drains the queue itself.

use std::fmt;
use std::sync::mpsc;
use std::sync::Arc;

pub type Waker = Arc<dyn Fn() + Send + Sync>;

pub struct UiQueue<T> {
    tx: mpsc::Sender<T>,
    rx: mpsc::Receiver<T>,
    waker: Waker,
}

impl<T> UiQueue<T> {
    pub fn with_waker(waker: Waker) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx, waker }
    }

    pub fn sender(&self) -> UiSender<T> {
        UiSender { tx: self.tx.clone(), waker: Arc::clone(&self.waker) }
    }

    /// Everything queued so far, in send order.
    pub fn drain(&self) -> Vec<T> {
        self.rx.try_iter().collect()
    }
}

impl<T> fmt::Debug for UiQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiQueue").finish_non_exhaustive()
    }
}

pub struct UiSender<T> {
    tx: mpsc::Sender<T>,
    waker: Waker,
}

impl<T> UiSender<T> {
    /// Returns false once the UI side has gone away.
    pub fn post(&self, msg: T) -> bool {
        let delivered = self.tx.send(msg).is_ok();
        if delivered {
            (self.waker)();
        }
        delivered
    }
}

impl<T> Clone for UiSender<T> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone(), waker: Arc::clone(&self.waker) }
    }
}
