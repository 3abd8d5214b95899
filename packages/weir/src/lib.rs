//! Blocking multi-thread channels with a multi-channel `select`.
//!
//! A channel is created with a capacity: `0` makes a rendezvous channel, where a send
//! completes only once a matching receive takes the value directly; `> 0` makes a
//! bounded channel backed by a FIFO buffer. [`select`] blocks on a list of channels of
//! arbitrary message types and returns the first one that becomes ready.

#[macro_use]
extern crate tracing;

mod channel;
pub mod util;

pub use crate::channel::api::*;
pub use crate::channel::select::{select, Selectable};

/// Error types
pub mod error {
    pub use crate::channel::error::*;
}
