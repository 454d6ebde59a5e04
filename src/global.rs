//! A process-wide pager singleton, reachable by the same five free
//! functions a host driving this crate through global state would call.
//!
//! [`Pager::new`] takes `nframes`/`nblocks`/`page_size`/`uvm_base` from
//! the host at run time rather than from a no-argument constructor, so
//! this module uses [`sync::OnceCell`] instead of a lazily-initialized
//! static, set once by [`init`] and read by every call after it. The
//! inner lock is `sync::Mutex` (blocking, not spinning — see
//! `crates/pager-sync`), held across each call including any MMU I/O it
//! triggers.

use sync::{Mutex, MutexGuard, OnceCell};

use crate::mmu::Mmu;
use crate::{Pager, PagerError, Pid, VAddr};

static PAGER: OnceCell<Mutex<Pager>> = OnceCell::new();

/// Builds the singleton pager. `page_size` and `uvm_base` are taken the
/// same way [`Pager::new`] takes them.
///
/// # Panics
/// Panics if called more than once.
pub fn init(nframes: usize, nblocks: usize, page_size: u64, uvm_base: VAddr) {
    PAGER
        .set(Mutex::new(Pager::new(nframes, nblocks, page_size, uvm_base)))
        .unwrap_or_else(|_| panic!("pager: global::init called more than once"));
}

/// Locks and returns the singleton.
///
/// # Panics
/// Panics if [`init`] was never called.
fn lock() -> MutexGuard<'static, Pager> {
    PAGER
        .get()
        .expect("pager: global::init was never called")
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// See [`Pager::create`].
pub fn create(pid: Pid) -> Result<(), PagerError> {
    lock().create(pid)
}

/// See [`Pager::extend`].
pub fn extend(pid: Pid) -> Result<VAddr, PagerError> {
    lock().extend(pid)
}

/// See [`Pager::fault`]. The lock is held across the whole call,
/// including any MMU operations `mmu` performs while resolving it.
pub fn fault(pid: Pid, addr: VAddr, mmu: &mut dyn Mmu) {
    lock().fault(pid, addr, mmu);
}

/// See [`Pager::syslog`].
pub fn syslog(pid: Pid, addr: VAddr, len: usize, mmu: &dyn Mmu) -> i32 {
    lock().syslog(pid, addr, len, mmu)
}

/// See [`Pager::destroy`].
pub fn destroy(pid: Pid) {
    lock().destroy(pid);
}
