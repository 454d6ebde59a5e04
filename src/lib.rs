//! A demand-paged virtual memory pager.
//!
//! This crate is the page/frame/block bookkeeping engine described in
//! SPEC_FULL.md: per-process page tables, a physical frame table, a
//! backing-store block table, a page-fault handler, and a second-chance
//! (clock) replacement policy. It does not implement an MMU, a process
//! scheduler, or a fault-trap delivery mechanism — those are the host's
//! job, and are modeled here only as the [`mmu::Mmu`] trait the pager
//! drives.
//!
//! The five entry points a host drives are [`Pager::create`],
//! [`Pager::extend`], [`Pager::fault`], [`Pager::syslog`] and
//! [`Pager::destroy`], plus [`Pager::new`] standing in for `init`. For a
//! process-wide singleton reachable by the same five free-function names
//! the original interface uses, see the [`global`] module.

pub mod block;
pub mod config;
pub mod error;
mod fault;
pub mod frame;
pub mod global;
pub mod mmu;
pub mod page;
pub mod registry;
mod syslog;

mod replace;

pub use addr::VAddr;
pub use error::PagerError;
pub use mmu::{Mmu, Protection};

use block::BlockTable;
use frame::FrameTable;
use registry::Registry;

/// Process identifier. Matches the host's notion of a pid; the pager
/// never interprets it beyond using it as a registry key.
pub type Pid = i32;

/// The pager's bookkeeping state: the Frame Table, the Block Table and the
/// Page Table Registry, plus the page size and user virtual memory base
/// the host supplied at `init` time (spec.md §4.1, §9 "Global mutable
/// state").
///
/// All mutating methods (`create`, `extend`, `fault`, `syslog`, `destroy`)
/// are designed to be called with the pager already behind a single
/// process-wide lock; see the [`global`] module for that wiring, and
/// spec.md §5 for why the lock must be held across MMU calls rather than
/// released around them.
pub struct Pager {
    frames: FrameTable,
    blocks: BlockTable,
    registry: Registry,
    page_size: u64,
    uvm_base: VAddr,
}

impl Pager {
    /// Corresponds to `init(nframes, nblocks)` (spec.md §4.1): allocates
    /// the Frame Table with all frames free, the Block Table with all
    /// blocks unowned and not-yet-written, and an empty Page Table
    /// Registry.
    ///
    /// `page_size` and `uvm_base` are taken as explicit parameters rather
    /// than queried from a global host function, since the host's
    /// page-size/base-address query mechanism is out of scope (spec.md
    /// §1) and isn't part of the in-scope [`mmu::Mmu`] interface (spec.md
    /// §6); see SPEC_FULL.md §12.
    #[must_use]
    pub fn new(nframes: usize, nblocks: usize, page_size: u64, uvm_base: VAddr) -> Self {
        assert!(nframes > 0, "a pager with zero frames can never resolve a fault");
        assert!(page_size.is_power_of_two(), "page size must be a power of two");
        log::info!(
            "pager init: {nframes} frames, {nblocks} blocks, page size {} ({})",
            page_size,
            utils::ByteSize::new(page_size as usize),
        );
        Self {
            frames: FrameTable::new(nframes),
            blocks: BlockTable::new(nblocks),
            registry: Registry::new(),
            page_size,
            uvm_base,
        }
    }

    #[must_use]
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    #[must_use]
    pub fn uvm_base(&self) -> VAddr {
        self.uvm_base
    }

    /// Corresponds to `create(pid)` (spec.md §4.1): registers `pid` with
    /// an empty page table.
    ///
    /// # Errors
    /// Returns [`PagerError::DuplicateProcess`] if `pid` is already
    /// registered.
    pub fn create(&mut self, pid: Pid) -> Result<(), PagerError> {
        self.registry.create(pid, self.uvm_base, self.page_size)?;
        log::info!("pid {pid}: created");
        Ok(())
    }

    /// Corresponds to `extend(pid)` (spec.md §4.1): reserves one
    /// additional virtual page for `pid` and returns its vaddr.
    ///
    /// # Errors
    /// Returns [`PagerError::NoFreeBlock`] if the Block Table has no free
    /// block, making no state change.
    ///
    /// # Panics
    /// Panics if `pid` was never `create`d.
    pub fn extend(&mut self, pid: Pid) -> Result<VAddr, PagerError> {
        let page_index = self.registry.get(pid).len();
        let block = self
            .blocks
            .reserve_free(pid, page_index)
            .ok_or(PagerError::NoFreeBlock)
            .map_err(|e| {
                log::warn!("pid {pid}: extend failed, no free block available");
                e
            })?;

        let table = self.registry.get_mut(pid);
        let (_, vaddr) = table.push(block);
        log::debug!("pid {pid}: extended to {vaddr:#x} (block {})", block.get());
        Ok(vaddr)
    }

    /// Corresponds to `destroy(pid)` (spec.md §4.1): frees every block and
    /// resident frame belonging to `pid`'s pages and discards its page
    /// table.
    ///
    /// The MMU is *not* invoked here: the host is responsible for tearing
    /// down `pid`'s mappings wholesale (SPEC_FULL.md's resolution of the
    /// matching Open Question), since once the page table is dropped the
    /// pager no longer has a record of which vaddrs were mapped.
    ///
    /// # Panics
    /// Panics if `pid` was never `create`d.
    pub fn destroy(&mut self, pid: Pid) {
        let mut table = self.registry.remove(pid);
        for page in table.iter_mut() {
            self.blocks.release(page.block());
            if let Some(frame) = page.frame() {
                self.frames.get_mut(frame).release();
            }
        }
        log::info!("pid {pid}: destroyed ({} pages freed)", table.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mmu::Protection;

    /// A minimal [`Mmu`] that records every call it receives and backs
    /// `pmem` with a plain byte vector, used to exercise the engine
    /// end-to-end the way a host simulator would drive it.
    #[derive(Default)]
    pub(crate) struct MockMmu {
        pub calls: Vec<String>,
        pub pmem: Vec<u8>,
    }

    impl MockMmu {
        pub(crate) fn new(nframes: usize, page_size: usize) -> Self {
            Self {
                calls: Vec::new(),
                pmem: vec![0xAA; nframes * page_size],
            }
        }
    }

    impl Mmu for MockMmu {
        fn resident(&mut self, pid: Pid, vaddr: u64, frame: frame::FrameIndex, prot: Protection) {
            self.calls
                .push(format!("resident({pid},{vaddr:#x},{},{prot})", frame.get()));
        }

        fn nonresident(&mut self, pid: Pid, vaddr: u64) {
            self.calls.push(format!("nonresident({pid},{vaddr:#x})"));
        }

        fn chprot(&mut self, pid: Pid, vaddr: u64, prot: Protection) {
            self.calls.push(format!("chprot({pid},{vaddr:#x},{prot})"));
        }

        fn disk_read(&mut self, block: block::BlockIndex, frame: frame::FrameIndex) {
            self.calls
                .push(format!("disk_read({},{})", block.get(), frame.get()));
        }

        fn disk_write(&mut self, frame: frame::FrameIndex, block: block::BlockIndex) {
            self.calls
                .push(format!("disk_write({},{})", frame.get(), block.get()));
            let page_size = self.pmem.len();
            let _ = (frame, block, page_size);
        }

        fn zero_fill(&mut self, frame: frame::FrameIndex) {
            self.calls.push(format!("zero_fill({})", frame.get()));
            let page_size = 4096;
            let start = frame.get() * page_size;
            self.pmem[start..start + page_size].fill(0);
        }

        fn pmem(&self) -> &[u8] {
            &self.pmem
        }
    }

    fn pager(nframes: usize, nblocks: usize) -> Pager {
        Pager::new(nframes, nblocks, 4096, VAddr::new(0x1000_0000))
    }

    #[test]
    fn create_then_extend_returns_the_base_address() {
        let mut p = pager(2, 4);
        p.create(7).unwrap();
        let a = p.extend(7).unwrap();
        assert_eq!(a, p.uvm_base());
    }

    #[test]
    fn extend_reserves_consecutive_pages() {
        let mut p = pager(2, 4);
        p.create(7).unwrap();
        let a0 = p.extend(7).unwrap();
        let a1 = p.extend(7).unwrap();
        assert_eq!(a1.as_u64() - a0.as_u64(), 4096);
    }

    #[test]
    fn extend_fails_once_blocks_are_exhausted_and_makes_no_state_change() {
        let mut p = pager(2, 2);
        p.create(9).unwrap();
        p.extend(9).unwrap();
        p.extend(9).unwrap();
        assert_eq!(p.extend(9), Err(PagerError::NoFreeBlock));
        assert_eq!(p.registry.get(9).len(), 2);
    }

    #[test]
    fn destroy_frees_blocks_for_reuse_by_a_later_process() {
        let mut p = pager(2, 4);
        p.create(9).unwrap();
        for _ in 0..4 {
            p.extend(9).unwrap();
        }
        assert_eq!(p.extend(9), Err(PagerError::NoFreeBlock));

        p.destroy(9);

        p.create(10).unwrap();
        assert!(p.extend(10).is_ok());
    }

    #[test]
    fn fault_on_a_fresh_page_zero_fills_then_installs_read_only() {
        let mut p = pager(2, 2);
        let mut mmu = MockMmu::new(2, 4096);
        p.create(7).unwrap();
        let a = p.extend(7).unwrap();

        p.fault(7, a, &mut mmu);

        assert_eq!(
            mmu.calls,
            vec!["zero_fill(0)".to_string(), format!("resident(7,{:#x},0,READ)", a.as_u64())]
        );
    }

    #[test]
    fn write_after_read_fault_upgrades_protection_and_marks_dirty() {
        let mut p = pager(2, 2);
        let mut mmu = MockMmu::new(2, 4096);
        p.create(7).unwrap();
        let a = p.extend(7).unwrap();
        p.fault(7, a, &mut mmu);
        mmu.calls.clear();

        p.fault(7, a, &mut mmu);

        assert_eq!(mmu.calls, vec![format!("chprot(7,{:#x},READ|WRITE)", a.as_u64())]);
    }

    #[test]
    fn repeated_fault_on_the_same_address_is_idempotent() {
        let mut p = pager(2, 2);
        let mut mmu = MockMmu::new(2, 4096);
        p.create(7).unwrap();
        let a = p.extend(7).unwrap();
        p.fault(7, a, &mut mmu);
        p.fault(7, a, &mut mmu);
        let after_first_upgrade = mmu.calls.clone();
        p.fault(7, a, &mut mmu);
        assert_eq!(mmu.calls, after_first_upgrade);
    }

    #[test]
    fn eviction_writes_back_a_dirty_victim_and_loads_the_new_page() {
        let mut p = pager(2, 4);
        let mut mmu = MockMmu::new(2, 4096);

        p.create(8).unwrap();
        let b1 = p.extend(8).unwrap();
        let b2 = p.extend(8).unwrap();
        p.fault(8, b1, &mut mmu);
        p.fault(8, b2, &mut mmu);
        // Dirty both pages.
        p.fault(8, b1, &mut mmu);
        p.fault(8, b2, &mut mmu);
        mmu.calls.clear();

        let b3 = p.extend(8).unwrap();
        p.fault(8, b3, &mut mmu);

        // Both frames are referenced, so the clock sweeps once (clearing
        // both bits) and lands back on frame 0. Frame 0 victim triggers
        // the clock-sweep protection reset over every resident page
        // before the evicted page is written back and the new one loaded.
        assert!(mmu.calls[0].starts_with("chprot(8,"));
        assert!(mmu.calls.iter().any(|c| c.starts_with("nonresident(8,")));
        assert!(mmu.calls.iter().any(|c| c.starts_with("disk_write(0,")));
        assert_eq!(mmu.calls.last().unwrap(), &format!("resident(8,{:#x},0,READ)", b3.as_u64()));
    }

    #[test]
    fn eviction_of_a_clean_page_zero_fills_rather_than_disk_reads() {
        let mut p = pager(1, 4);
        let mut mmu = MockMmu::new(1, 4096);
        p.create(8).unwrap();
        let a0 = p.extend(8).unwrap();
        let a1 = p.extend(8).unwrap();

        p.fault(8, a0, &mut mmu);
        mmu.calls.clear();
        // a0 was never written, so evicting it to load a1 must zero_fill.
        p.fault(8, a1, &mut mmu);

        assert!(mmu.calls.iter().any(|c| c == "zero_fill(0)"));
        assert!(!mmu.calls.iter().any(|c| c.starts_with("disk_write")));
    }
}
