//! Counting semaphore.

use std::sync::{Condvar, Mutex};


/// Counting semaphore
///
/// The one synchronization primitive the channel protocol needs beyond the standard
/// mutex and condition variable. [`select`](crate::select) registers a fresh semaphore
/// on every candidate channel, so whichever channel becomes ready first can hand the
/// selecting thread a permit.
#[derive(Debug)]
pub struct Semaphore {
    permits: Mutex<usize>,
    cond: Condvar,
}

impl Semaphore {
    /// Construct with an initial number of permits.
    pub fn new(permits: usize) -> Self {
        Semaphore {
            permits: Mutex::new(permits),
            cond: Condvar::new(),
        }
    }

    /// Block until a permit is available, then take it.
    pub fn acquire(&self) {
        let mut permits = self.permits.lock().unwrap();
        while *permits == 0 {
            permits = self.cond.wait(permits).unwrap();
        }
        *permits -= 1;
    }

    /// Add one permit, waking one blocked `acquire` if any.
    pub fn release(&self) {
        let mut permits = self.permits.lock().unwrap();
        *permits += 1;
        self.cond.notify_one();
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::{sync::Arc, thread, time::Duration};

    #[test]
    fn initial_permits_do_not_block() {
        let sm = Semaphore::new(2);
        sm.acquire();
        sm.acquire();
    }

    #[test]
    fn release_wakes_blocked_acquire() {
        let sm = Arc::new(Semaphore::new(0));
        let sm_2 = Arc::clone(&sm);
        let join = thread::spawn(move || sm_2.acquire());
        thread::sleep(Duration::from_millis(50));
        assert!(!join.is_finished());
        sm.release();
        join.join().unwrap();
    }

    #[test]
    fn permits_accumulate() {
        let sm = Semaphore::new(0);
        sm.release();
        sm.release();
        sm.acquire();
        sm.acquire();
    }
}
