//! Join barrier for the worker pool.
//!
//! Every worker holds a [`WaitGuard`]; the closer task holds the single
//! [`WaitGroup`] and resumes once every guard has been dropped, i.e. once every
//! worker has returned.
//!
//! # Implementation Details
//!
//! This is a thin wrapper around [`tokio::sync::mpsc::channel`]. The
//! [`WaitGroup`] owns the unique [`Receiver`] and each [`WaitGuard`] owns a
//! [`Sender`]. Nothing is ever sent: receiving `None` means every sender, and
//! thus every guard, is gone.

use futures::never::Never;
use tokio::sync::mpsc::{Receiver, Sender, channel};

/// Waits for a set of [`WaitGuard`]s to be dropped.
///
/// Single-use: [`WaitGroup::wait`] consumes it.
#[derive(Debug)]
pub struct WaitGroup {
    /// No value can ever be received through this channel.
    recv: Receiver<Never>,
}

/// RAII guard held by a task that is being waited for.
///
/// Clone it to register another task with the same [`WaitGroup`].
#[derive(Clone, Debug)]
pub struct WaitGuard {
    /// Keeps the [`Receiver`] of the [`WaitGroup`] open while alive.
    _send: Sender<Never>,
}

impl WaitGroup {
    /// Creates a new [`WaitGroup`] and its first [`WaitGuard`].
    ///
    /// Further guards are created by cloning the returned one.
    #[must_use]
    pub fn new() -> (Self, WaitGuard) {
        let (send, recv) = channel(1);
        (Self { recv }, WaitGuard { _send: send })
    }

    /// Waits until all associated [`WaitGuard`]s have been dropped.
    pub async fn wait(mut self) {
        let None = self.recv.recv().await;
    }
}
