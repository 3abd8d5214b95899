// exposed API of channels

use super::{
    core::{self, TrySendFail},
    error::*,
};


/// Open/closed state of a channel
///
/// Monotonic: once a channel reports `Closed` it never reports `Open` again.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ChanState {
    Open,
    Closed,
}

/// Handle to a channel
///
/// A channel is created with a capacity: `0` makes a rendezvous channel, where a send
/// completes only once a matching receive takes the value directly; `> 0` makes a
/// bounded channel backed by a FIFO buffer of that many elements.
///
/// A handle is a small value holding only a shared reference to the channel state.
/// Cloning a handle is cheap and yields another handle to the same logical channel;
/// the state is freed once the last handle referencing it is dropped. Two handles
/// compare equal iff they reference the same state.
#[derive(Debug)]
pub struct Chan<T>(pub(crate) core::Channel<T>);

impl<T> Chan<T> {
    /// Create a channel with the given capacity
    pub fn new(capacity: usize) -> Self {
        Chan(core::Channel::new(capacity))
    }

    /// Re-point this handle at a fresh channel with the given capacity
    ///
    /// Equivalent to dropping this handle and constructing a new one. Other handles
    /// still referencing the previous channel are unaffected.
    pub fn make(&mut self, capacity: usize) {
        self.0 = core::Channel::new(capacity);
    }

    /// Send a message on this channel, blocking until it is accepted
    ///
    /// On a rendezvous channel this returns only once a receiver has taken the value;
    /// on a bounded channel it returns once the value is buffered, blocking while the
    /// buffer is full.
    ///
    /// Errors if the channel is closed, whether at the time of the call or while
    /// blocked waiting: close takes priority over pending sends, and the undelivered
    /// message is handed back inside the error.
    pub fn send(&self, msg: T) -> Result<(), SendError<T>> {
        self.0.send(msg).map_err(|msg| SendError { msg, cause: ClosedError })
    }

    /// Send a message on this channel without blocking
    ///
    /// On a rendezvous channel this always reports would-block: capacity 0 leaves no
    /// buffer to accept the message without the blocking handshake.
    pub fn try_send(&self, msg: T) -> Result<(), TrySendError<T>> {
        self.0.try_send(msg).map_err(|fail| match fail {
            TrySendFail::Closed(msg) => TrySendError { msg, cause: ClosedError.into() },
            TrySendFail::Full(msg) => TrySendError { msg, cause: WouldBlockError.into() },
        })
    }

    /// Receive a message from this channel, blocking until one is available
    ///
    /// Returns `None` only when the channel is closed and nothing is available; a
    /// closed channel still drains values that arrived before the close. Never blocks
    /// forever on a closed channel.
    pub fn recv(&self) -> Option<T> {
        self.0.recv()
    }

    /// Receive a message from this channel without blocking
    ///
    /// Would-block covers every case where nothing is immediately available, including
    /// a closed channel that has been drained; use [`state`](Self::state) to tell
    /// shutdown apart from a momentarily empty channel.
    pub fn try_recv(&self) -> Result<T, WouldBlockError> {
        self.0.try_recv().ok_or(WouldBlockError)
    }

    /// Close the channel
    ///
    /// Every blocked sender and receiver unwinds, observing the closed state, and
    /// every in-progress [`select`](crate::select) watching this channel is woken.
    /// Closing an already-closed channel is a no-op.
    pub fn close(&self) {
        self.0.close();
    }

    /// The capacity this channel was created with (`0` = rendezvous)
    pub fn capacity(&self) -> usize {
        self.0.capacity()
    }

    /// Number of values immediately receivable
    ///
    /// Buffer length on a bounded channel; `0` or `1` on a rendezvous channel
    /// depending on whether a sender has a value in transit.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no value is immediately receivable
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Open/closed state of the channel
    ///
    /// A fast read that may lag a concurrent `close` by a moment.
    pub fn state(&self) -> ChanState {
        if self.0.is_closed() {
            ChanState::Closed
        } else {
            ChanState::Open
        }
    }

    /// Whether two handles refer to the same logical channel
    pub fn same_channel(&self, other: &Self) -> bool {
        self.0.same_channel(&other.0)
    }
}

impl<T> Clone for Chan<T> {
    fn clone(&self) -> Self {
        Chan(self.0.clone())
    }
}

impl<T> PartialEq for Chan<T> {
    fn eq(&self, other: &Self) -> bool {
        self.same_channel(other)
    }
}

impl<T> Eq for Chan<T> {}


// ==== tests ====
