// channel error types.

use thiserror::Error;


// ==== base error types ====


/// Error for trying to send into a channel that has been closed
#[derive(Error, Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[error("channel is closed")]
pub struct ClosedError;

/// Error for attempting a non-blocking operation that could not complete immediately
///
/// This is not a failure of the channel: "would block" is a normal outcome, distinct
/// from success, and the channel remains fully usable.
#[derive(Error, Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[error("operation would block")]
pub struct WouldBlockError;

/// Advisory error for a channel whose live handles are all held by senders
///
/// Every blocking operation on such a channel deadlocks. The channel core never raises
/// this itself--it performs no liveness detection--but a higher layer that tracks which
/// side holds each handle can use it to report certain deadlock instead of hanging.
#[derive(Error, Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[error("channel has only writers and would block forever")]
pub struct OnlyWritersError;

/// Advisory error for a channel whose live handles are all held by receivers
///
/// Counterpart of [`OnlyWritersError`]; see its docs.
#[derive(Error, Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[error("channel has only readers and would block forever")]
pub struct OnlyReadersError;


// ==== compound error types ====


/// Error for trying to send into a channel
///
/// Returns ownership of the message that was not delivered.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SendError<T> {
    /// The message that could not be sent
    pub msg: T,
    /// The reason the message could not be sent
    pub cause: ClosedError,
}

macro_rules! compound_from {
    ($compound:ident {$(
        $variant:ident($inner:ty),
    )*})=>{$(
        impl From<$inner> for $compound {
            fn from(inner: $inner) -> Self {
                Self::$variant(inner)
            }
        }
    )*};
}

/// Reason a non-blocking send could not complete
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum TrySendErrorCause {
    /// The channel has been closed
    Closed(ClosedError),
    /// The channel could not accept the message without blocking
    WouldBlock(WouldBlockError),
}

compound_from!(TrySendErrorCause {
    Closed(ClosedError),
    WouldBlock(WouldBlockError),
});

/// Error for trying to send into a channel with no blocking
///
/// Returns ownership of the message that was not delivered.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TrySendError<T> {
    /// The message that could not be sent
    pub msg: T,
    /// The reason the message could not be sent
    pub cause: TrySendErrorCause,
}
