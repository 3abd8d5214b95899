// implementation of the weir channel.
//
// the basic architecture is as such:
//
// channel handles wrap around Arc<shared state>
//                                    |
//          /-------------------------/
//          v
//       shared state
//          |
//          |------ it contains the capacity (immutable) and a monotonic closed flag
//          |       (atomic, so handles can pre-check it without locking)
//          |
//          |------ it contains a mutex around the lockable state: the FIFO buffer (bounded
//          |       mode), the rendezvous slot (capacity-0 mode), counts of blocked readers
//          |       and writers, and the list of waiter semaphores registered by in-progress
//          |       select calls
//          |
//          \------ it contains two condvars paired with that mutex: one signaled on
//                  became-ready-for-reader transitions, one on became-ready-for-writer
//                  transitions
//
// every blocking operation follows monitor discipline: lock, loop on a condvar while the
// operation cannot proceed and the channel is open, mutate, wake the appropriate party,
// unlock. select never holds two channel locks at once.
//
// the organization of these modules is as such:
//
//      core: presents a minimal safe abstraction over the shared state and the full
//      ^     lock/condvar protocol, including the two-tier notify rule that prefers a
//      |     directly blocked reader over a select waiter.
//      |
//      api: the public Chan<T> handle, a thin convenience wrapper around core. the crate
//      ^    re-exports this publically.
//      |
//      select: the Selectable capability trait (implemented by Chan<T> for every T) and
//              the blocking select free function.
//
// there is also the error module, which contains the relevant error types, which is also
// re-exported publically.

pub(crate) mod api;
pub(crate) mod error;
pub(crate) mod select;

mod core;
