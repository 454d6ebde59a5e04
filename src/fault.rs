//! The fault handler and the eviction orchestration that glues it to the
//! replacement policy.

use addr::VAddr;

use crate::frame::FrameIndex;
use crate::mmu::{Mmu, Protection};
use crate::replace;
use crate::{Pager, Pid};

impl Pager {
    /// Resolve a fault raised by `pid` touching `addr`.
    ///
    /// `addr` may be unaligned; it is aligned down to a page boundary
    /// before lookup.
    ///
    /// # Panics
    /// Panics if `pid` was never `create`d, or if `addr` does not fall
    /// within any page `pid` has `extend`ed — both are fatal host
    /// programming errors, not recoverable conditions.
    pub fn fault(&mut self, pid: Pid, addr: VAddr, mmu: &mut dyn Mmu) {
        let addr = addr.page_align_down(self.page_size);
        let page_index = {
            let table = self.registry.get(pid);
            table.index_of(addr).unwrap_or_else(|| {
                panic!(
                    "pager: fault at {addr} for pid {pid} lies outside any page `extend`ed for it"
                )
            })
        };

        let already_valid = self.registry.get(pid).get(page_index).is_valid();
        if already_valid {
            self.upgrade_protection(pid, page_index, mmu);
        } else {
            self.resolve_major_fault(pid, page_index, mmu);
        }
    }

    /// Case (a): the page is resident but mapped read-only. A write to it
    /// generated this fault; upgrade its protection and mark it dirty,
    /// since the pager has no hardware dirty bit to consult.
    ///
    /// Already-dirty pages are already mapped read+write, so a repeated
    /// fault at the same address is a no-op: this is what makes two
    /// consecutive `fault` calls idempotent (spec.md §8) instead of
    /// re-issuing `chprot` on every call.
    fn upgrade_protection(&mut self, pid: Pid, page_index: usize, mmu: &mut dyn Mmu) {
        let table = self.registry.get_mut(pid);
        let page = table.get_mut(page_index);
        if page.is_dirty() {
            log::trace!(
                "pid {pid}: repeated upgrade fault at {:#x}, already dirty",
                page.vaddr()
            );
            return;
        }
        let frame = page
            .frame()
            .expect("page marked valid without a resident frame");
        let vaddr = page.vaddr();
        page.set_dirty(true);

        log::trace!("mmu.chprot(pid={pid}, vaddr={vaddr:#x}, prot=READ|WRITE)");
        mmu.chprot(pid, vaddr.as_u64(), Protection::READ | Protection::WRITE);
        self.frames.get_mut(frame).set_referenced(true);

        log::debug!("pid {pid}: upgrade fault at {vaddr:#x}, page is now dirty");
    }

    /// Case (b): the page is not resident. Obtain a frame (free, or by
    /// evicting a victim), populate it, and install a fresh read-only
    /// mapping — the next write regenerates a case-(a) fault.
    fn resolve_major_fault(&mut self, pid: Pid, page_index: usize, mmu: &mut dyn Mmu) {
        let target = match self.frames.find_free() {
            Some(frame) => frame,
            None => {
                let victim = replace::select_victim(&mut self.frames);
                log::debug!("no free frame available, evicting frame {}", victim.get());
                self.evict(victim, mmu);
                victim
            }
        };

        self.frames.get_mut(target).assign(pid, page_index);

        let table = self.registry.get_mut(pid);
        let page = table.get_mut(page_index);
        page.make_resident(target);
        let vaddr = page.vaddr();
        let block = page.block();

        if self.blocks.ever_written(block) {
            log::trace!(
                "mmu.disk_read(block={}, frame={})",
                block.get(),
                target.get()
            );
            mmu.disk_read(block, target);
        } else {
            log::trace!("mmu.zero_fill(frame={})", target.get());
            mmu.zero_fill(target);
        }

        log::trace!(
            "mmu.resident(pid={pid}, vaddr={vaddr:#x}, frame={}, prot=READ)",
            target.get()
        );
        mmu.resident(pid, vaddr.as_u64(), target, Protection::READ);

        log::debug!(
            "pid {pid}: major fault at {vaddr:#x} resolved to frame {}",
            target.get()
        );
    }

    /// Evict the chosen victim frame, freeing it for reuse.
    ///
    /// Ordering matters here: the victim's `nonresident` (and `disk_write`
    /// if dirty) must both complete before the caller installs the new
    /// occupant into the same frame. Since this function runs to
    /// completion before [`Pager::resolve_major_fault`] reassigns the
    /// frame, that invariant holds by construction.
    fn evict(&mut self, victim: FrameIndex, mmu: &mut dyn Mmu) {
        // Clock-sweep protection reset: the clock hand has just completed
        // a full revolution when the victim is frame 0. Resetting every
        // resident page to NONE is how the pager refreshes reference-bit
        // information without a hardware bit of its own.
        if victim.get() == 0 {
            for (pid, table) in self.registry.iter_mut() {
                for page in table.iter_mut() {
                    if page.is_valid() {
                        log::trace!("mmu.chprot(pid={pid}, vaddr={:#x}, prot=NONE)", page.vaddr());
                        mmu.chprot(*pid, page.vaddr().as_u64(), Protection::NONE);
                    }
                }
            }
        }

        let occupant = self
            .frames
            .get(victim)
            .occupant()
            .expect("evicting a frame that the replacement policy reported as occupied");

        let table = self.registry.get_mut(occupant.pid);
        let page = table.get_mut(occupant.page_index);
        page.make_nonresident();
        let vaddr = page.vaddr();

        log::trace!("mmu.nonresident(pid={}, vaddr={vaddr:#x})", occupant.pid);
        mmu.nonresident(occupant.pid, vaddr.as_u64());

        if page.is_dirty() {
            let block = page.block();
            self.blocks.mark_written(block);
            log::trace!(
                "mmu.disk_write(frame={}, block={})",
                victim.get(),
                block.get()
            );
            mmu.disk_write(victim, block);
        }

        self.frames.get_mut(victim).release();
    }
}
