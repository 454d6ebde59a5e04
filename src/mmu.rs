//! The MMU interface the pager is a *client* of (spec.md §6).
//!
//! The MMU simulator itself is out of scope (spec.md §1): it is named only
//! by the interface it exposes. That interface is modeled here as a trait
//! so the pager can be driven by a real host simulator in production and by
//! an in-memory mock in tests, the same way the teacher's syscall layer is
//! generic over the scheduler/VMM it drives (see
//! `kernel/src/syscall/mmu.rs` and `kernel/src/mm/vmm/mod.rs` for the
//! pattern this is grounded on).

use std::fmt;

use bitflags::bitflags;

use crate::block::BlockIndex;
use crate::frame::FrameIndex;
use crate::Pid;

bitflags! {
    /// Protection bits installed on a vaddr -> frame mapping.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Protection: u8 {
        const READ = 1 << 0;
        const WRITE = 1 << 1;
    }
}

impl Protection {
    /// No access at all; used by the clock-sweep protection reset
    /// (spec.md §4.3, step 1).
    pub const NONE: Protection = Protection::empty();
}

/// A stable, bitflags-version-independent rendering used in log lines and
/// by the mock MMU in tests (`READ`, `WRITE`, `READ|WRITE`, or `NONE`).
impl fmt::Display for Protection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "NONE");
        }
        let mut first = true;
        for (name, flag) in [("READ", Protection::READ), ("WRITE", Protection::WRITE)] {
            if self.contains(flag) {
                if !first {
                    write!(f, "|")?;
                }
                write!(f, "{name}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Operations the pager drives on the host's MMU simulator.
///
/// All calls are synchronous and may block (e.g. `disk_read`/`disk_write`
/// simulate blocking disk I/O); the pager holds its global lock across
/// them (spec.md §5).
pub trait Mmu {
    /// Bind `vaddr` -> `frame` in `pid`'s map with protection `prot`.
    fn resident(&mut self, pid: Pid, vaddr: u64, frame: FrameIndex, prot: Protection);

    /// Remove the mapping for `vaddr` in `pid`.
    fn nonresident(&mut self, pid: Pid, vaddr: u64);

    /// Change the protection bits of an existing mapping.
    fn chprot(&mut self, pid: Pid, vaddr: u64, prot: Protection);

    /// Copy the backing-store block into the frame.
    fn disk_read(&mut self, block: BlockIndex, frame: FrameIndex);

    /// Copy the frame into the backing-store block.
    fn disk_write(&mut self, frame: FrameIndex, block: BlockIndex);

    /// Zero the frame.
    fn zero_fill(&mut self, frame: FrameIndex);

    /// The physical memory backing every frame, indexed linearly
    /// (`frame * page_size + offset`).
    fn pmem(&self) -> &[u8];
}
