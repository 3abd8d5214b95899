// minimal safe core of the channel. the exposed API is a convenience wrapper around this.

use crate::util::sem::Semaphore;
use smallvec::SmallVec;
use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicBool, Ordering::Relaxed},
        Arc, Condvar, Mutex,
    },
};


// handle to a channel's shared state.
#[derive(Debug)]
pub(crate) struct Channel<T>(Arc<Shared<T>>);

// channel shared state.
#[derive(Debug)]
struct Shared<T> {
    // 0 selects rendezvous mode, > 0 selects bounded-buffer mode. immutable.
    capacity: usize,

    // begins as false. may eventually change to true.
    //
    // - once true, never changes again.
    // - written only while `lockable` is held, so a read under the lock is authoritative.
    //   unlocked reads are a fast but possibly stale pre-check.
    closed: AtomicBool,

    // mutex around lockable state.
    lockable: Mutex<Lockable<T>>,

    // signaled when the channel becomes ready for a reader.
    readable: Condvar,
    // signaled when the channel becomes ready for a writer.
    writable: Condvar,
}

// channel lockable state.
#[derive(Debug)]
struct Lockable<T> {
    // buffered elements. used only in bounded mode. len never exceeds capacity.
    buf: VecDeque<T>,
    // in-transit element. used only in rendezvous mode. Some exactly while a sender has
    // published a value no receiver has claimed yet.
    slot: Option<T>,
    // count of completed rendezvous handoffs. lets a sender parked on `writable` tell
    // "my value was claimed" apart from "another sender's value now occupies the slot".
    handoffs: u64,
    // number of threads currently blocked inside recv.
    readers: usize,
    // number of threads currently blocked inside send.
    writers: usize,
    // semaphores registered by in-progress select calls.
    waiters: SmallVec<[Arc<Semaphore>; 2]>,
}

// failure outcomes of a non-blocking send.
pub(crate) enum TrySendFail<T> {
    // the channel is closed. returns ownership of the message.
    Closed(T),
    // the channel cannot accept the message without blocking.
    Full(T),
}

// wake rule after any transition that could make the channel ready for a reader: a
// directly blocked reader is the cheapest wake. only when there is none does a select
// waiter get a permit, so selects are not woken past a receiver that will consume the
// value anyway.
fn notify_reader<T>(lockable: &Lockable<T>, readable: &Condvar) {
    if lockable.readers > 0 {
        readable.notify_one();
    } else if let Some(waiter) = lockable.waiters.first() {
        waiter.release();
    }
}

impl<T> Channel<T> {
    // construct an open, empty channel. capacity 0 means rendezvous mode.
    pub(crate) fn new(capacity: usize) -> Self {
        Channel(Arc::new(Shared {
            capacity,
            closed: AtomicBool::new(false),
            lockable: Mutex::new(Lockable {
                buf: VecDeque::new(),
                slot: None,
                handoffs: 0,
                readers: 0,
                writers: 0,
                waiters: SmallVec::new(),
            }),
            readable: Condvar::new(),
            writable: Condvar::new(),
        }))
    }

    // clone another handle to the channel.
    pub(crate) fn clone(&self) -> Self {
        Channel(Arc::clone(&self.0))
    }

    // whether two handles refer to the same shared state.
    pub(crate) fn same_channel(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    // stable identity of the shared state, for comparisons across message types.
    pub(crate) fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }

    pub(crate) fn capacity(&self) -> usize {
        self.0.capacity
    }

    // atomic-read the closed flag. authoritative only while the lock is held.
    pub(crate) fn is_closed(&self) -> bool {
        self.0.closed.load(Relaxed)
    }

    // number of values immediately receivable: buffer length, or slot occupancy in
    // rendezvous mode.
    pub(crate) fn len(&self) -> usize {
        let lock = self.0.lockable.lock().unwrap();
        if self.0.capacity == 0 {
            lock.slot.is_some() as usize
        } else {
            lock.buf.len()
        }
    }

    // blocking send. Err returns ownership of the message if the channel is closed
    // before the message is delivered (a close observed mid-wait abandons the send).
    pub(crate) fn send(&self, msg: T) -> Result<(), T> {
        // fast pre-check without the lock. possibly stale; the wait loops below
        // re-check under the lock.
        if self.is_closed() {
            return Err(msg);
        }
        let shared = &*self.0;
        let mut lock = shared.lockable.lock().unwrap();
        lock.writers += 1;
        let result;
        if shared.capacity == 0 {
            // rendezvous: claim the slot, publish, then wait until a receiver takes the
            // value or the channel closes.
            while lock.slot.is_some() && !shared.closed.load(Relaxed) {
                lock = shared.writable.wait(lock).unwrap();
            }
            if shared.closed.load(Relaxed) {
                result = Err(msg);
            } else {
                let seq = lock.handoffs;
                lock.slot = Some(msg);
                notify_reader(&lock, &shared.readable);
                while lock.handoffs == seq && !shared.closed.load(Relaxed) {
                    lock = shared.writable.wait(lock).unwrap();
                }
                if lock.handoffs > seq {
                    // a receiver claimed the value.
                    result = Ok(());
                } else {
                    // closed before any receiver claimed it. the slot still holds our
                    // value, since no other sender can publish until a handoff completes.
                    result = match lock.slot.take() {
                        Some(msg) => Err(msg),
                        None => Ok(()),
                    };
                }
            }
        } else {
            // bounded: wait for buffer space.
            while lock.buf.len() == shared.capacity && !shared.closed.load(Relaxed) {
                lock = shared.writable.wait(lock).unwrap();
            }
            if shared.closed.load(Relaxed) {
                result = Err(msg);
            } else {
                lock.buf.push_back(msg);
                notify_reader(&lock, &shared.readable);
                result = Ok(());
            }
        }
        lock.writers -= 1;
        result
    }

    // non-blocking send. a rendezvous channel can never accept a message without the
    // blocking handshake, so capacity 0 always reports Full.
    pub(crate) fn try_send(&self, msg: T) -> Result<(), TrySendFail<T>> {
        if self.is_closed() {
            return Err(TrySendFail::Closed(msg));
        }
        let shared = &*self.0;
        let mut lock = shared.lockable.lock().unwrap();
        if shared.closed.load(Relaxed) {
            return Err(TrySendFail::Closed(msg));
        }
        if shared.capacity == 0 || lock.buf.len() == shared.capacity {
            return Err(TrySendFail::Full(msg));
        }
        lock.buf.push_back(msg);
        notify_reader(&lock, &shared.readable);
        Ok(())
    }

    // blocking receive. None means the channel is closed with nothing available; a
    // closed channel still drains values that arrived before the close.
    pub(crate) fn recv(&self) -> Option<T> {
        let shared = &*self.0;
        let mut lock = shared.lockable.lock().unwrap();
        lock.readers += 1;
        let msg;
        if shared.capacity == 0 {
            while lock.slot.is_none() && !shared.closed.load(Relaxed) {
                lock = shared.readable.wait(lock).unwrap();
            }
            msg = lock.slot.take();
            if msg.is_some() {
                lock.handoffs += 1;
            }
        } else {
            while lock.buf.is_empty() && !shared.closed.load(Relaxed) {
                lock = shared.readable.wait(lock).unwrap();
            }
            msg = lock.buf.pop_front();
        }
        lock.readers -= 1;
        self.notify_writer(&lock);
        msg
    }

    // non-blocking receive. None means nothing is immediately available, whether the
    // channel is open or closed.
    pub(crate) fn try_recv(&self) -> Option<T> {
        let shared = &*self.0;
        let mut lock = shared.lockable.lock().unwrap();
        let msg;
        if shared.capacity == 0 {
            msg = lock.slot.take();
            if msg.is_some() {
                lock.handoffs += 1;
            }
        } else {
            msg = lock.buf.pop_front();
        }
        if msg.is_some() {
            self.notify_writer(&lock);
        }
        msg
    }

    // wake senders after a dequeue. in rendezvous mode every parked sender must recheck,
    // since the one whose handoff just completed is indistinguishable from the next
    // publisher without waking both.
    fn notify_writer(&self, _lock: &Lockable<T>) {
        if self.0.capacity == 0 {
            self.0.writable.notify_all();
        } else {
            self.0.writable.notify_one();
        }
    }

    // close the channel: every blocked reader and writer unwinds, and every registered
    // select waiter gets a permit so it can observe the closed state. idempotent.
    pub(crate) fn close(&self) {
        let shared = &*self.0;
        let lock = shared.lockable.lock().unwrap();
        if shared.closed.swap(true, Relaxed) {
            return;
        }
        debug!(waiters = lock.waiters.len(), "closing channel");
        for waiter in &lock.waiters {
            waiter.release();
        }
        shared.readable.notify_all();
        shared.writable.notify_all();
    }

    // whether a receive could proceed immediately: a pending value, or closed.
    pub(crate) fn ready(&self) -> bool {
        let shared = &*self.0;
        let lock = shared.lockable.lock().unwrap();
        let pending = if shared.capacity == 0 {
            lock.slot.is_some()
        } else {
            !lock.buf.is_empty()
        };
        pending || shared.closed.load(Relaxed)
    }

    // register a select waiter semaphore on this channel.
    pub(crate) fn register_waiter(&self, sm: &Arc<Semaphore>) {
        let mut lock = self.0.lockable.lock().unwrap();
        lock.waiters.push(Arc::clone(sm));
    }

    // remove a previously registered select waiter semaphore, if present.
    pub(crate) fn unregister_waiter(&self, sm: &Arc<Semaphore>) {
        let mut lock = self.0.lockable.lock().unwrap();
        lock.waiters.retain(|waiter| !Arc::ptr_eq(waiter, sm));
    }

    #[cfg(test)]
    pub(crate) fn waiter_count(&self) -> usize {
        self.0.lockable.lock().unwrap().waiters.len()
    }
}
