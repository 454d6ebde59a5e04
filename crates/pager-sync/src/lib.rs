//! Synchronization primitives used by the pager.
//!
//! Currently this just re-exports `std::sync::Mutex` and `once_cell`'s
//! `Lazy`/`OnceCell` under names local to the pager, in case the pager ever
//! needs to swap in a different lock implementation (e.g. a fair mutex) for
//! the single global lock it serializes every entry point behind. See
//! `pager::global` for why a blocking mutex, rather than a spinlock, is the
//! right primitive here: MMU calls simulate disk I/O and may hold the lock
//! for a while, so spinning on contention would waste a core.

pub use once_cell::sync::{Lazy, OnceCell};

/// The pager's single process-wide lock.
pub type Mutex<T> = std::sync::Mutex<T>;

/// A guard returned by [`Mutex::lock`].
pub type MutexGuard<'a, T> = std::sync::MutexGuard<'a, T>;
